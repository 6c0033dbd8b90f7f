// src/api/http/mod.rs

pub mod auth;
pub mod health;
pub mod system_info;
pub mod users;

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::cors::{Any, CorsLayer};

use crate::state::AppState;

pub use auth::create_auth_router;
pub use health::health_check;
pub use system_info::create_system_info_router;
pub use users::create_users_router;

/// Assemble the full application router. Shared between main and the
/// integration tests.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/auth", create_auth_router())
        .nest("/users", create_users_router())
        .nest("/modules", create_system_info_router())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
