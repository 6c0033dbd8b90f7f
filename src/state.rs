// src/state.rs
// Application state shared across handlers. Built once in main and passed
// by reference everywhere; there are no process-wide singletons.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::jwt::TokenSigner;
use crate::auth::service::AuthService;
use crate::config::Config;
use crate::telemetry::SystemInfoCollector;
use crate::users::store::UserStore;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
    pub user_store: Arc<UserStore>,
    pub auth_service: Arc<AuthService>,
    pub collector: Arc<SystemInfoCollector>,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: Config) -> Self {
        let user_store = Arc::new(UserStore::new(pool.clone()));
        let signer = TokenSigner::new(&config.auth);
        let auth_service = Arc::new(AuthService::new(user_store.clone(), signer));
        Self {
            pool,
            config,
            user_store,
            auth_service,
            collector: Arc::new(SystemInfoCollector::default()),
        }
    }
}
