// src/auth/service.rs
// Session issuer: credential verification and token issue/validate.

use std::sync::Arc;

use tracing::{info, warn};

use crate::auth::jwt::TokenSigner;
use crate::auth::password::verify_password;
use crate::error::{ApiError, ApiResult};
use crate::users::models::User;
use crate::users::store::UserStore;

pub struct AuthService {
    store: Arc<UserStore>,
    signer: TokenSigner,
}

impl AuthService {
    pub fn new(store: Arc<UserStore>, signer: TokenSigner) -> Self {
        Self { store, signer }
    }

    pub fn token_ttl_seconds(&self) -> i64 {
        self.signer.ttl_seconds()
    }

    /// Verify credentials and issue a signed 24h token bound to the user id.
    ///
    /// Unknown usernames and wrong passwords return the identical error so
    /// responses carry no user-enumeration signal. Passwords and hashes are
    /// never logged.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<(User, String)> {
        let username = crate::users::models::normalize_username(username);
        if username.is_empty() || password.is_empty() {
            return Err(ApiError::invalid_input("Username and password required"));
        }

        let Some(record) = self.store.find_by_username(&username).await? else {
            warn!(username = %username, "Failed login attempt");
            return Err(ApiError::Unauthenticated);
        };

        if !verify_password(password, &record.password_hash)? {
            warn!(username = %record.username, "Failed login attempt");
            return Err(ApiError::Unauthenticated);
        }

        let token = self.signer.create_token(record.id)?;
        info!(username = %record.username, "User logged in");
        Ok((record.into(), token))
    }

    /// Verify signature and expiry; returns the subject user id.
    pub fn validate(&self, token: &str) -> ApiResult<i64> {
        let claims = self
            .signer
            .verify_token(token)
            .map_err(|_| ApiError::Unauthenticated)?;
        claims
            .sub
            .parse::<i64>()
            .map_err(|_| ApiError::Unauthenticated)
    }
}
