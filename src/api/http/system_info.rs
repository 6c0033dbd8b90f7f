// src/api/http/system_info.rs
// Read-only host telemetry endpoints. Role scope is configurable:
// admin-only by default, or any authenticated user with a live account.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    Router,
    extract::{Json, State},
    routing::get,
};

use crate::auth::CurrentUser;
use crate::config::TelemetryScope;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::telemetry::collector::InterfaceInfo;
use crate::telemetry::{ProcessInfo, SystemInfoSnapshot};
use crate::users::models::{Role, User};

pub fn create_system_info_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/system-info", get(system_info))
        .route("/system-info/processes", get(processes))
        .route("/system-info/network", get(network))
}

fn ensure_scope(state: &AppState, user: &User) -> ApiResult<()> {
    if state.config.telemetry.scope == TelemetryScope::Admin && user.role != Role::Admin {
        return Err(ApiError::forbidden("Admin access required"));
    }
    Ok(())
}

async fn system_info(
    CurrentUser(user): CurrentUser,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<SystemInfoSnapshot>> {
    ensure_scope(&state, &user)?;
    Ok(Json(state.collector.snapshot().await))
}

async fn processes(
    CurrentUser(user): CurrentUser,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<ProcessInfo>>> {
    ensure_scope(&state, &user)?;
    Ok(Json(state.collector.processes().await))
}

async fn network(
    CurrentUser(user): CurrentUser,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<BTreeMap<String, InterfaceInfo>>> {
    ensure_scope(&state, &user)?;
    Ok(Json(state.collector.network()))
}
