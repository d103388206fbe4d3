//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::Database;
use crate::services::{ServiceContainer, Services};

/// Attributes of the auth cookies
#[derive(Debug, Clone, Copy)]
pub struct CookieSettings {
    pub secure: bool,
    pub access_max_age_seconds: i64,
    pub refresh_max_age_seconds: i64,
}

impl CookieSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            secure: config.cookie_secure,
            access_max_age_seconds: config.access_token_ttl_seconds,
            refresh_max_age_seconds: config.refresh_token_ttl_seconds,
        }
    }
}

/// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<dyn ServiceContainer>,
    /// Pinged by the health check; absent in router tests
    pub database: Option<Arc<Database>>,
    pub cookies: CookieSettings,
    pub cors_allowed_origins: Arc<Vec<String>>,
}

impl AppState {
    /// Create application state from an open database and config.
    pub fn from_config(database: Arc<Database>, config: &Config) -> Self {
        let services = Arc::new(Services::from_connection(database.get_connection(), config));
        Self::new(services, Some(database), config)
    }

    /// Create application state with manually injected services.
    pub fn new(
        services: Arc<dyn ServiceContainer>,
        database: Option<Arc<Database>>,
        config: &Config,
    ) -> Self {
        Self {
            services,
            database,
            cookies: CookieSettings::from_config(config),
            cors_allowed_origins: Arc::new(config.cors_allowed_origins.clone()),
        }
    }
}
