//! Application settings loaded from environment variables.

use std::env;
use std::time::Duration;

use super::constants::{
    DEFAULT_DATABASE_URL, DEFAULT_HASH_ITERATIONS, DEFAULT_HASH_MEMORY_KIB,
    DEFAULT_HASH_PARALLELISM, DEFAULT_JWT_EXPIRES_IN, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
    INSECURE_DEV_JWT_SECRET, MIN_JWT_SECRET_LENGTH,
};
use crate::errors::{AppError, AppResult};

/// Deployment environment, selected with `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn from_env() -> Self {
        match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            _ => Environment::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashingSettings {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashingSettings {
    fn default() -> Self {
        Self {
            memory_kib: DEFAULT_HASH_MEMORY_KIB,
            iterations: DEFAULT_HASH_ITERATIONS,
            parallelism: DEFAULT_HASH_PARALLELISM,
        }
    }
}

/// Token signing configuration, resolved once at startup.
#[derive(Clone)]
pub struct AuthSettings {
    jwt_secret: String,
    /// How long issued tokens stay valid
    pub token_ttl: Duration,
    /// The TTL as configured (e.g. "24h"), reported back to clients
    pub token_ttl_label: String,
}

impl std::fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSettings")
            .field("jwt_secret", &"[REDACTED]")
            .field("token_ttl", &self.token_ttl)
            .field("token_ttl_label", &self.token_ttl_label)
            .finish()
    }
}

impl AuthSettings {
    /// Build settings from an explicit secret and TTL label such as `"24h"`.
    pub fn new(jwt_secret: impl Into<String>, ttl_label: &str) -> AppResult<Self> {
        let token_ttl = parse_ttl(ttl_label)?;
        Ok(Self {
            jwt_secret: jwt_secret.into(),
            token_ttl,
            token_ttl_label: ttl_label.trim().to_string(),
        })
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }
}

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub environment: Environment,
    pub database_url: String,
    pub auth: AuthSettings,
    pub hashing: HashingSettings,
    pub server_host: String,
    pub server_port: u16,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("environment", &self.environment)
            .field("database_url", &"[REDACTED]")
            .field("auth", &self.auth)
            .field("hashing", &self.hashing)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In production a missing or short `JWT_SECRET` is a startup error.
    /// In development it is reported with a warning and an insecure default
    /// is used instead.
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let environment = Environment::from_env();
        let jwt_secret = resolve_jwt_secret(env::var("JWT_SECRET").ok(), environment)?;
        let ttl_label =
            env::var("JWT_EXPIRES_IN").unwrap_or_else(|_| DEFAULT_JWT_EXPIRES_IN.to_string());

        let defaults = HashingSettings::default();
        let hashing = HashingSettings {
            memory_kib: parse_env("PASSWORD_HASH_MEMORY_KIB").unwrap_or(defaults.memory_kib),
            iterations: parse_env("PASSWORD_HASH_ITERATIONS").unwrap_or(defaults.iterations),
            parallelism: parse_env("PASSWORD_HASH_PARALLELISM").unwrap_or(defaults.parallelism),
        };

        Ok(Self {
            environment,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            auth: AuthSettings::new(jwt_secret, &ttl_label)?,
            hashing,
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: parse_env("SERVER_PORT").unwrap_or(DEFAULT_SERVER_PORT),
        })
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

fn resolve_jwt_secret(value: Option<String>, environment: Environment) -> AppResult<String> {
    let secret = match value.filter(|s| !s.trim().is_empty()) {
        Some(secret) => secret,
        None if environment.is_production() => {
            return Err(AppError::internal(
                "JWT_SECRET environment variable must be set in production",
            ));
        }
        None => {
            tracing::warn!("JWT_SECRET not set, using insecure default for development");
            INSECURE_DEV_JWT_SECRET.to_string()
        }
    };

    if secret.len() < MIN_JWT_SECRET_LENGTH {
        if environment.is_production() {
            return Err(AppError::internal(format!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            )));
        }
        tracing::warn!(
            "JWT_SECRET is shorter than {} characters; do not use it in production",
            MIN_JWT_SECRET_LENGTH
        );
    }

    Ok(secret)
}

/// Parse a token lifetime such as `"24h"`, `"90m"` or a bare number of seconds.
fn parse_ttl(label: &str) -> AppResult<Duration> {
    let label = label.trim();
    if let Ok(secs) = label.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }
    humantime::parse_duration(label)
        .map_err(|e| AppError::internal(format!("Invalid JWT_EXPIRES_IN '{}': {}", label, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ttl_humantime() {
        assert_eq!(parse_ttl("24h").unwrap(), Duration::from_secs(24 * 3600));
        assert_eq!(parse_ttl("30m").unwrap(), Duration::from_secs(1800));
        assert_eq!(parse_ttl(" 7d ").unwrap(), Duration::from_secs(7 * 86400));
    }

    #[test]
    fn test_parse_ttl_bare_seconds() {
        assert_eq!(parse_ttl("3600").unwrap(), Duration::from_secs(3600));
        assert_eq!(parse_ttl("0").unwrap(), Duration::ZERO);
    }

    #[test]
    fn test_parse_ttl_rejects_garbage() {
        assert!(parse_ttl("forever").is_err());
    }

    #[test]
    fn test_auth_settings_keeps_label() {
        let settings = AuthSettings::new("x".repeat(32), "12h").unwrap();
        assert_eq!(settings.token_ttl_label, "12h");
        assert_eq!(settings.token_ttl, Duration::from_secs(12 * 3600));
    }

    #[test]
    fn test_missing_secret_is_fatal_in_production() {
        let result = resolve_jwt_secret(None, Environment::Production);
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[test]
    fn test_missing_secret_falls_back_in_development() {
        let secret = resolve_jwt_secret(None, Environment::Development).unwrap();
        assert_eq!(secret, INSECURE_DEV_JWT_SECRET);
    }

    #[test]
    fn test_short_secret_rules() {
        assert!(resolve_jwt_secret(Some("short".into()), Environment::Production).is_err());
        assert!(resolve_jwt_secret(Some("short".into()), Environment::Development).is_ok());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let settings = AuthSettings::new("super-secret-value-that-is-long-enough", "1h").unwrap();
        let rendered = format!("{:?}", settings);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
