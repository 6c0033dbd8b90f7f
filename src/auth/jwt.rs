// src/auth/jwt.rs
// Signed, time-limited session tokens. Stateless: nothing is stored
// server-side, validity is signature + expiry alone.

use anyhow::{Result, anyhow};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub exp: usize,  // expiration timestamp
    pub iat: usize,  // issued at timestamp
}

/// Token signer holding the configured secret. Constructed once in main
/// and injected through AppState; no process-wide key lookup.
#[derive(Clone)]
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: chrono::Duration,
}

impl TokenSigner {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            ttl: chrono::Duration::hours(config.token_ttl_hours),
        }
    }

    pub fn ttl_seconds(&self) -> i64 {
        self.ttl.num_seconds()
    }

    pub fn create_token(&self, user_id: i64) -> Result<String> {
        self.create_token_with_ttl(user_id, self.ttl)
    }

    fn create_token_with_ttl(&self, user_id: i64, ttl: chrono::Duration) -> Result<String> {
        let now = chrono::Utc::now();
        let expiration = now
            .checked_add_signed(ttl)
            .ok_or_else(|| anyhow!("Failed to calculate expiration"))?
            .timestamp() as usize;

        let claims = Claims {
            sub: user_id.to_string(),
            exp: expiration,
            iat: now.timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| anyhow!("Failed to create token: {}", e))
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::default();
        // Token validity requires now < expires_at, no grace window.
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| anyhow!("Invalid token: {}", e))
    }
}
