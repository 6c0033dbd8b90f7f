// src/auth/extract.rs
// Authorization guard: composable extractors applied per route.
//
// The role is re-derived from the database on every request rather than
// trusted from the token, so role downgrades and deletions take effect on
// the next call without waiting for token expiry.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::auth::cookie::session_token_from_headers;
use crate::error::ApiError;
use crate::state::AppState;
use crate::users::models::{Role, User};

/// A validated session: signature and expiry checked, nothing else.
/// Use this when the handler wants to decide itself what a missing user
/// row means (e.g. /auth/me answers 404).
pub struct AuthSession {
    pub subject_id: i64,
}

impl FromRequestParts<Arc<AppState>> for AuthSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token =
            session_token_from_headers(&parts.headers).ok_or(ApiError::Unauthenticated)?;
        let subject_id = state.auth_service.validate(&token)?;
        Ok(Self { subject_id })
    }
}

/// An authenticated caller with a live account, freshly loaded.
pub struct CurrentUser(pub User);

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let session = AuthSession::from_request_parts(parts, state).await?;
        let record = state
            .user_store
            .find_by_id(session.subject_id)
            .await?
            .ok_or_else(|| ApiError::forbidden("User access required"))?;
        Ok(Self(record.into()))
    }
}

/// An authenticated caller holding the admin role.
pub struct RequireAdmin(pub User);

impl FromRequestParts<Arc<AppState>> for RequireAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if user.role != Role::Admin {
            return Err(ApiError::forbidden("Admin access required"));
        }
        Ok(Self(user))
    }
}
