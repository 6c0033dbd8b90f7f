// src/api/http/auth.rs

use std::sync::Arc;

use axum::{
    Router,
    extract::{Json, State},
    http::HeaderMap,
    http::header::SET_COOKIE,
    response::IntoResponse,
    routing::{get, post},
};

use crate::auth::AuthSession;
use crate::auth::cookie::{clear_session_cookie, set_session_cookie};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::users::models::{LoginRequest, User};

pub fn create_auth_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let (_user, token) = state
        .auth_service
        .login(&req.username, &req.password)
        .await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        SET_COOKIE,
        set_session_cookie(&token, state.auth_service.token_ttl_seconds()),
    );
    Ok((headers, Json(serde_json::json!({ "msg": "Login successful" }))))
}

/// Logout is a client-side contract: the cookie is cleared, the token
/// itself stays valid until its natural expiry (stateless sessions).
async fn logout(_session: AuthSession) -> impl IntoResponse {
    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, clear_session_cookie());
    (headers, Json(serde_json::json!({ "msg": "Logout successful" })))
}

async fn me(session: AuthSession, State(state): State<Arc<AppState>>) -> ApiResult<Json<User>> {
    let record = state
        .user_store
        .find_by_id(session.subject_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(Json(record.into()))
}
