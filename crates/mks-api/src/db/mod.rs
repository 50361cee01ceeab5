//! # Database Persistence Layer
//!
//! Postgres persistence via SQLx.
//!
//! ## Architecture
//!
//! The database layer is **optional**. When `DATABASE_URL` is set, every
//! accepted write goes through to PostgreSQL and the in-memory stores are
//! hydrated from it at startup. When absent, the API operates in
//! in-memory-only mode (suitable for development and testing).
//!
//! ## What is persisted
//!
//! - Asset records and their photo records
//! - Inventory item records and their photo records
//!
//! Photo *objects* (the image bytes) live in object storage, not here; the
//! photo tables only hold the derived public URL and metadata.

pub mod assets;
pub mod inventory;
pub mod photos;

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::state::{AppState, PhotoParent};

/// Initialize the database connection pool and run migrations.
///
/// Returns `None` if `DATABASE_URL` is not set (in-memory-only mode).
/// Returns `Err` if the URL is set but the connection or migration fails.
pub async fn init_pool() -> Result<Option<PgPool>, sqlx::Error> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            tracing::warn!(
                "DATABASE_URL not set — running in-memory only mode. \
                 State will not survive restarts."
            );
            return Ok(None);
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(20)
        .min_connections(2)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect(&url)
        .await?;

    tracing::info!("Connected to PostgreSQL");

    // Run embedded migrations.
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    Ok(Some(pool))
}

/// Load all persisted records into the in-memory stores at startup.
pub async fn hydrate(state: &AppState, pool: &PgPool) -> Result<(), sqlx::Error> {
    let assets = assets::load_all(pool).await?;
    let asset_count = assets.len();
    for asset in assets {
        state.assets.insert(asset.id, asset);
    }

    let items = inventory::load_all(pool).await?;
    let item_count = items.len();
    for item in items {
        state.inventory.insert(item.id, item);
    }

    let mut photo_count = 0;
    for parent in [PhotoParent::Asset, PhotoParent::InventoryItem] {
        let records = photos::load_all(pool, parent).await?;
        photo_count += records.len();
        let store = state.photos_for(parent);
        // Rows come back in created_at order; inserting in that order
        // reproduces the insertion-order view the stores expose.
        for photo in records {
            store.insert(photo);
        }
    }

    tracing::info!(
        assets = asset_count,
        inventory_items = item_count,
        photos = photo_count,
        "hydrated in-memory stores from database"
    );
    Ok(())
}
