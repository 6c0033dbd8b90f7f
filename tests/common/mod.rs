// tests/common/mod.rs
// Shared test harness: in-memory database, seeded admin, full router.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

use hostpanel_backend::api::http::create_router;
use hostpanel_backend::config::{
    AuthConfig, Config, DatabaseConfig, ServerConfig, TelemetryConfig, TelemetryScope,
};
use hostpanel_backend::state::AppState;
use hostpanel_backend::telemetry::SystemInfoCollector;
use hostpanel_backend::users::store::UserStore;

pub fn test_config(scope: TelemetryScope) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        },
        auth: AuthConfig {
            jwt_secret: "test-secret".to_string(),
            token_ttl_hours: 24,
        },
        telemetry: TelemetryConfig { scope },
        debug: false,
    }
}

/// In-memory application with the schema created and admin/admin seeded,
/// mirroring first-run bootstrap.
pub async fn test_app_with_scope(scope: TelemetryScope) -> (Router, Arc<AppState>) {
    // A single connection keeps the in-memory database alive and shared.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool");

    UserStore::init_schema(&pool).await.expect("schema");

    let mut state = AppState::new(pool, test_config(scope));
    // Short CPU sampling window so telemetry tests stay fast.
    state.collector = Arc::new(SystemInfoCollector::with_cpu_sample_interval(
        Duration::from_millis(50),
    ));
    let state = Arc::new(state);

    state.user_store.seed_default_admin().await.expect("seed");

    (create_router(state.clone()), state)
}

pub async fn test_app() -> (Router, Arc<AppState>) {
    test_app_with_scope(TelemetryScope::Admin).await
}

pub struct TestResponse {
    pub status: StatusCode,
    pub set_cookie: Option<String>,
    pub body: serde_json::Value,
}

async fn send(app: &Router, req: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(req).await.expect("request");
    let status = response.status();
    let set_cookie = response
        .headers()
        .get(SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());
    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    TestResponse {
        status,
        set_cookie,
        body,
    }
}

pub async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: Option<serde_json::Value>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    let req = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    send(app, req).await
}

/// Log in and return the session cookie pair for subsequent requests.
pub async fn login(app: &Router, username: &str, password: &str) -> String {
    let response = request(
        app,
        "POST",
        "/auth/login",
        None,
        Some(serde_json::json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK, "login failed: {}", response.body);
    let set_cookie = response.set_cookie.expect("login sets a session cookie");
    set_cookie
        .split(';')
        .next()
        .expect("cookie pair")
        .to_string()
}
