// src/api/http/users.rs
// Admin-only user administration endpoints.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};

use crate::auth::RequireAdmin;
use crate::error::ApiResult;
use crate::state::AppState;
use crate::users::models::{
    ChangePasswordRequest, CreateUserRequest, Role, UpdateUserRequest, User,
};

pub fn create_users_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/{id}", put(update_user).delete(delete_user))
        .route("/{id}/change-password", post(change_password))
}

async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(state.user_store.list().await?))
}

async fn create_user(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<impl IntoResponse> {
    let role = req.role.unwrap_or(Role::User);
    let user = state
        .user_store
        .create(&req.username, &req.password, role)
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn update_user(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<User>> {
    let user = state
        .user_store
        .update(id, req.username.as_deref(), req.role)
        .await?;
    Ok(Json(user))
}

async fn delete_user(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<serde_json::Value>> {
    state.user_store.delete(id).await?;
    Ok(Json(
        serde_json::json!({ "message": "User deleted successfully" }),
    ))
}

async fn change_password(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<ChangePasswordRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    state.user_store.set_password(id, &req.password).await?;
    Ok(Json(
        serde_json::json!({ "message": "Password changed successfully" }),
    ))
}
