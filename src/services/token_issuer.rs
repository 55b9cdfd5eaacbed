//! Token issuer - signs and verifies session tokens (HS256 JWT).

use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::AuthSettings;
use crate::errors::{AppError, AppResult};

/// JWT claims payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: Uuid,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// Why a token was rejected. Callers only ever see `Unauthorized`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token is malformed or has a bad signature: {0}")]
    Malformed(String),

    #[error("token has expired")]
    Expired,
}

/// A freshly signed token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    /// Lifetime as configured, e.g. "24h"
    pub expires_in: String,
}

/// Session token signing and verification.
pub trait TokenIssuer: Send + Sync {
    /// Sign a token for a user with the configured lifetime.
    fn issue(&self, user_id: Uuid, email: &str) -> AppResult<IssuedToken>;

    /// Check signature and expiry, returning the embedded claims.
    fn verify(&self, token: &str) -> Result<Claims, TokenError>;
}

/// HS256 JWT issuer keyed by the process-wide secret.
pub struct JwtIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
    ttl_label: String,
}

impl JwtIssuer {
    pub fn new(settings: &AuthSettings) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked by hand so that it is strict and has no leeway.
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(settings.jwt_secret_bytes()),
            decoding_key: DecodingKey::from_secret(settings.jwt_secret_bytes()),
            validation,
            ttl: settings.token_ttl,
            ttl_label: settings.token_ttl_label.clone(),
        }
    }

    /// Sign a token with an explicit lifetime.
    pub fn issue_with_ttl(&self, user_id: Uuid, email: &str, ttl: Duration) -> AppResult<IssuedToken> {
        let label = humantime::format_duration(ttl).to_string();
        self.sign(user_id, email, ttl, label)
    }

    fn sign(&self, user_id: Uuid, email: &str, ttl: Duration, label: String) -> AppResult<IssuedToken> {
        let now = Utc::now();
        let lifetime = chrono::Duration::from_std(ttl)
            .map_err(|e| AppError::internal(format!("Token lifetime out of range: {}", e)))?;
        let expires_at = now + lifetime;

        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Token signing failed: {}", e)))?;

        Ok(IssuedToken {
            token,
            expires_at,
            expires_in: label,
        })
    }
}

impl TokenIssuer for JwtIssuer {
    fn issue(&self, user_id: Uuid, email: &str) -> AppResult<IssuedToken> {
        self.sign(user_id, email, self.ttl, self.ttl_label.clone())
    }

    fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            tracing::warn!("Rejected malformed token: {}", e);
            TokenError::Malformed(e.to_string())
        })?;

        if data.claims.exp <= Utc::now().timestamp() {
            tracing::debug!(user_id = %data.claims.sub, "Rejected expired token");
            return Err(TokenError::Expired);
        }

        Ok(data.claims)
    }
}
