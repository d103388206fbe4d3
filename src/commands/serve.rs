//! Serve command - Starts the HTTP server.

use std::sync::Arc;
use std::time::Duration;

use crate::api::{create_router, AppState};
use crate::cli::args::ServeArgs;
use crate::commands::seed;
use crate::config::{Config, REFRESH_TOKEN_PURGE_INTERVAL_SECONDS};
use crate::errors::{AppError, AppResult};
use crate::infra::{Database, Persistence};
use crate::services::ServiceContainer;

/// Execute the serve command
pub async fn execute(args: ServeArgs, config: Config) -> AppResult<()> {
    tracing::info!(profile = %config.profile, "Starting server...");

    // Connect and apply pending migrations
    let db = Arc::new(
        Database::connect(&config)
            .await
            .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?,
    );

    if config.seeds_demo_data() {
        seed::run(&Persistence::new(db.get_connection()), &config).await?;
    }

    let app_state = AppState::from_config(db, &config);
    spawn_token_purge(app_state.services.clone());

    // Build router
    let app = create_router(app_state);

    // Start server
    let addr = format!(
        "{}:{}",
        args.host.unwrap_or(config.server_host),
        args.port.unwrap_or(config.server_port)
    );
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    Ok(())
}

/// Delete expired refresh tokens on a fixed interval until the process exits
fn spawn_token_purge(services: Arc<dyn ServiceContainer>) {
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(Duration::from_secs(REFRESH_TOKEN_PURGE_INTERVAL_SECONDS));
        loop {
            interval.tick().await;
            match services.auth().purge_expired_tokens().await {
                Ok(0) => tracing::debug!("No expired refresh tokens"),
                Ok(count) => tracing::info!(count, "Purged expired refresh tokens"),
                Err(e) => tracing::error!("Refresh token purge failed: {}", e),
            }
        }
    });
}
