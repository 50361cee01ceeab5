//! # mks-api — Binary Entry Point
//!
//! Starts the Axum HTTP server for the makerspace operations API.
//! Binds to configurable port (default 8080).

use std::sync::Arc;

use mks_api::auth::SecretString;
use mks_api::state::{AppConfig, AppState};
use mks_api::storage::{FilesystemStorage, MemoryStorage, ObjectStorage};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Build configuration from environment.
    let port: u16 = std::env::var("MKS_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let auth_token = std::env::var("MKS_AUTH_TOKEN").ok().map(SecretString::new);
    if auth_token.is_none() {
        tracing::warn!("MKS_AUTH_TOKEN not set — API runs unauthenticated");
    }
    let config = AppConfig { port, auth_token };

    // Initialize database pool (optional — absent means in-memory only).
    let db_pool = mks_api::db::init_pool().await.map_err(|e| {
        tracing::error!("Database initialization failed: {e}");
        e
    })?;

    // Object storage: filesystem-backed when a root is configured,
    // otherwise in-process (photo objects will not survive restarts).
    let storage: Arc<dyn ObjectStorage> = match std::env::var("MKS_STORAGE_ROOT") {
        Ok(root) => {
            let public_base = std::env::var("MKS_PUBLIC_BASE_URL")
                .unwrap_or_else(|_| format!("http://localhost:{port}/files"));
            tracing::info!(root = %root, public_base = %public_base, "using filesystem object storage");
            Arc::new(FilesystemStorage::new(root, public_base))
        }
        Err(_) => {
            tracing::warn!(
                "MKS_STORAGE_ROOT not set — photo objects held in memory only. \
                 They will not survive restarts."
            );
            Arc::new(MemoryStorage::new())
        }
    };

    let state = AppState::with_config(config, db_pool, storage);

    // Hydrate in-memory stores from database (if connected).
    if let Some(pool) = state.db_pool.clone() {
        mks_api::db::hydrate(&state, &pool).await.map_err(|e| {
            tracing::error!("Database hydration failed: {e}");
            e
        })?;
    }

    let app = mks_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("MKS API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
