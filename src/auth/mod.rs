// src/auth/mod.rs

pub mod cookie;
pub mod extract;
pub mod jwt;
pub mod password;
pub mod service;

pub use extract::{AuthSession, CurrentUser, RequireAdmin};
pub use service::AuthService;
