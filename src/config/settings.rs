//! Application settings loaded from environment variables.

use std::env;

use super::constants::{
    DEFAULT_ACCESS_TOKEN_TTL_SECONDS, DEFAULT_DATABASE_URL, DEFAULT_DB_CONNECT_TIMEOUT_SECONDS,
    DEFAULT_DB_MAX_CONNECTIONS, DEFAULT_PROFILE,
    DEFAULT_REFRESH_TOKEN_TTL_SECONDS, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
    MIN_JWT_SECRET_LENGTH, PROFILE_PROD,
};
use crate::errors::{AppError, AppResult};

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_connect_timeout_seconds: u64,
    jwt_secret: String,
    pub access_token_ttl_seconds: i64,
    pub refresh_token_ttl_seconds: i64,
    pub server_host: String,
    pub server_port: u16,
    /// Runtime profile (`dev`, `docker`, `prod`)
    pub profile: String,
    /// Mark auth cookies `Secure`
    pub cookie_secure: bool,
    pub cors_allowed_origins: Vec<String>,
    pub seed_admin_email: Option<String>,
    pub seed_admin_password: Option<String>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_connect_timeout_seconds", &self.db_connect_timeout_seconds)
            .field("jwt_secret", &"[REDACTED]")
            .field("access_token_ttl_seconds", &self.access_token_ttl_seconds)
            .field("refresh_token_ttl_seconds", &self.refresh_token_ttl_seconds)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("profile", &self.profile)
            .field("cookie_secure", &self.cookie_secure)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("seed_admin_email", &self.seed_admin_email)
            .field("seed_admin_password", &"[REDACTED]")
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    /// Fails if JWT_SECRET is missing in a release build or shorter than
    /// the minimum length.
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) => secret,
            Err(_) if cfg!(debug_assertions) => {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                "dev-secret-key-minimum-32-chars!!".to_string()
            }
            Err(_) => {
                return Err(AppError::internal(
                    "JWT_SECRET environment variable must be set in production",
                ))
            }
        };

        Self::with_secret(jwt_secret).map(|config| Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            db_max_connections: parse_env("DATABASE_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS),
            db_connect_timeout_seconds: parse_env(
                "DATABASE_CONNECT_TIMEOUT_SECONDS",
                DEFAULT_DB_CONNECT_TIMEOUT_SECONDS,
            ),
            access_token_ttl_seconds: parse_env(
                "JWT_ACCESS_EXPIRATION_SECONDS",
                DEFAULT_ACCESS_TOKEN_TTL_SECONDS,
            ),
            refresh_token_ttl_seconds: parse_env(
                "JWT_REFRESH_EXPIRATION_SECONDS",
                DEFAULT_REFRESH_TOKEN_TTL_SECONDS,
            ),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: parse_env("SERVER_PORT", DEFAULT_SERVER_PORT),
            profile: env::var("APP_PROFILE").unwrap_or_else(|_| DEFAULT_PROFILE.to_string()),
            cookie_secure: env::var("COOKIE_SECURE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(str::trim)
                        .filter(|o| !o.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
            seed_admin_email: env::var("SEED_ADMIN_EMAIL").ok(),
            seed_admin_password: env::var("SEED_ADMIN_PASSWORD").ok(),
            ..config
        })
    }

    /// Build a configuration with defaults around the given secret.
    ///
    /// # Errors
    /// Fails if the secret is shorter than the minimum length.
    pub fn with_secret(jwt_secret: impl Into<String>) -> AppResult<Self> {
        let jwt_secret = jwt_secret.into();
        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(AppError::internal(format!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            )));
        }

        Ok(Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            db_connect_timeout_seconds: DEFAULT_DB_CONNECT_TIMEOUT_SECONDS,
            jwt_secret,
            access_token_ttl_seconds: DEFAULT_ACCESS_TOKEN_TTL_SECONDS,
            refresh_token_ttl_seconds: DEFAULT_REFRESH_TOKEN_TTL_SECONDS,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            profile: DEFAULT_PROFILE.to_string(),
            cookie_secure: false,
            cors_allowed_origins: Vec::new(),
            seed_admin_email: None,
            seed_admin_password: None,
        })
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Demo workers are seeded everywhere except production.
    pub fn seeds_demo_data(&self) -> bool {
        !self.profile.eq_ignore_ascii_case(PROFILE_PROD)
    }

    /// Admin credentials to seed, when both are configured.
    pub fn seed_admin(&self) -> Option<(&str, &str)> {
        match (&self.seed_admin_email, &self.seed_admin_password) {
            (Some(email), Some(password)) => Some((email.as_str(), password.as_str())),
            _ => None,
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_secret_rejected() {
        assert!(Config::with_secret("too-short").is_err());
    }

    #[test]
    fn test_defaults() {
        let config = Config::with_secret("a".repeat(MIN_JWT_SECRET_LENGTH)).unwrap();
        assert_eq!(config.access_token_ttl_seconds, 3600);
        assert_eq!(config.refresh_token_ttl_seconds, 86_400);
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.db_max_connections, 10);
        assert_eq!(config.db_connect_timeout_seconds, 8);
        assert!(config.seeds_demo_data());
        assert!(config.seed_admin().is_none());
    }

    #[test]
    fn test_prod_profile_disables_seeding() {
        let mut config = Config::with_secret("a".repeat(MIN_JWT_SECRET_LENGTH)).unwrap();
        config.profile = "PROD".to_string();
        assert!(!config.seeds_demo_data());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = Config::with_secret("super-secret-value-that-is-long-enough").unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret-value"));
        assert!(debug.contains("[REDACTED]"));
    }
}
