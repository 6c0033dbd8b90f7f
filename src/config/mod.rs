// src/config/mod.rs
// Central configuration for the hostpanel backend.
//
// Built once in main() and handed to AppState; handlers never read the
// environment directly.

pub mod helpers;

use serde::{Deserialize, Serialize};

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            host: helpers::env_or("HOSTPANEL_HOST", "0.0.0.0"),
            port: helpers::env_parsed_or("HOSTPANEL_PORT", 5000),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn from_env() -> Self {
        Self {
            url: helpers::env_or("DATABASE_URL", "sqlite:hostpanel.db?mode=rwc"),
            max_connections: helpers::env_parsed_or("HOSTPANEL_SQLITE_MAX_CONNECTIONS", 5),
        }
    }
}

/// Session signing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Fixed session lifetime in hours.
    pub token_ttl_hours: i64,
}

impl AuthConfig {
    pub fn from_env() -> Self {
        Self {
            jwt_secret: helpers::env_or(
                "JWT_SECRET_KEY",
                "hostpanel-jwt-secret-change-in-production-please",
            ),
            token_ttl_hours: 24,
        }
    }
}

/// Who may read the system-info endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TelemetryScope {
    /// Admin role required.
    Admin,
    /// Any authenticated user with a live account.
    Authenticated,
}

/// Telemetry endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    pub scope: TelemetryScope,
}

impl TelemetryConfig {
    pub fn from_env() -> Self {
        let scope = match helpers::env_or("HOSTPANEL_SYSTEM_INFO_SCOPE", "admin")
            .to_lowercase()
            .as_str()
        {
            "authenticated" | "any" | "user" => TelemetryScope::Authenticated,
            _ => TelemetryScope::Admin,
        };
        Self { scope }
    }
}

/// Main configuration structure - composes all domain configs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub telemetry: TelemetryConfig,
    pub debug: bool,
}

impl Config {
    pub fn from_env() -> Self {
        // Don't panic if .env doesn't exist (for production)
        dotenv::dotenv().ok();

        Self {
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            auth: AuthConfig::from_env(),
            telemetry: TelemetryConfig::from_env(),
            debug: helpers::env_bool("HOSTPANEL_DEBUG", false),
        }
    }
}
