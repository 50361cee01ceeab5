//! Asset persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `assets` table. Enum
//! columns are stored as their wire-format text values.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use mks_core::{Asset, AssetCategory, AssetStatus, Shop};

/// Insert a new asset record.
pub async fn insert(pool: &PgPool, asset: &Asset) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO assets (id, name, description, category, status, shop,
         serial_number, model_number, manufacturer, purchase_date, purchase_price,
         warranty_expiry, location, notes, last_maintenance_date,
         next_maintenance_date, maintenance_notes, battery_compatibility,
         created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                 $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)",
    )
    .bind(asset.id)
    .bind(&asset.name)
    .bind(&asset.description)
    .bind(asset.category.as_str())
    .bind(asset.status.as_str())
    .bind(asset.shop.as_str())
    .bind(&asset.serial_number)
    .bind(&asset.model_number)
    .bind(&asset.manufacturer)
    .bind(asset.purchase_date)
    .bind(asset.purchase_price)
    .bind(asset.warranty_expiry)
    .bind(&asset.location)
    .bind(&asset.notes)
    .bind(asset.last_maintenance_date)
    .bind(asset.next_maintenance_date)
    .bind(&asset.maintenance_notes)
    .bind(&asset.battery_compatibility)
    .bind(asset.created_at)
    .bind(asset.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Persist the full current state of an asset after a partial update has
/// been applied in memory.
pub async fn update(pool: &PgPool, asset: &Asset) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE assets SET name = $2, description = $3, category = $4, status = $5,
         shop = $6, serial_number = $7, model_number = $8, manufacturer = $9,
         purchase_date = $10, purchase_price = $11, warranty_expiry = $12,
         location = $13, notes = $14, last_maintenance_date = $15,
         next_maintenance_date = $16, maintenance_notes = $17,
         battery_compatibility = $18, updated_at = $19
         WHERE id = $1",
    )
    .bind(asset.id)
    .bind(&asset.name)
    .bind(&asset.description)
    .bind(asset.category.as_str())
    .bind(asset.status.as_str())
    .bind(asset.shop.as_str())
    .bind(&asset.serial_number)
    .bind(&asset.model_number)
    .bind(&asset.manufacturer)
    .bind(asset.purchase_date)
    .bind(asset.purchase_price)
    .bind(asset.warranty_expiry)
    .bind(&asset.location)
    .bind(&asset.notes)
    .bind(asset.last_maintenance_date)
    .bind(asset.next_maintenance_date)
    .bind(&asset.maintenance_notes)
    .bind(&asset.battery_compatibility)
    .bind(asset.updated_at)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Load all assets from the database into the in-memory store on startup.
pub async fn load_all(pool: &PgPool) -> Result<Vec<Asset>, sqlx::Error> {
    let rows = sqlx::query_as::<_, AssetRow>(
        "SELECT id, name, description, category, status, shop, serial_number,
         model_number, manufacturer, purchase_date, purchase_price,
         warranty_expiry, location, notes, last_maintenance_date,
         next_maintenance_date, maintenance_notes, battery_compatibility,
         created_at, updated_at
         FROM assets ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;

    let mut assets = Vec::with_capacity(rows.len());
    for row in rows {
        match row.into_asset() {
            Some(asset) => assets.push(asset),
            None => {
                tracing::error!("skipping asset row with invalid enum value during load_all");
            }
        }
    }
    Ok(assets)
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct AssetRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    category: String,
    status: String,
    shop: String,
    serial_number: Option<String>,
    model_number: Option<String>,
    manufacturer: Option<String>,
    purchase_date: Option<NaiveDate>,
    purchase_price: Option<f64>,
    warranty_expiry: Option<NaiveDate>,
    location: Option<String>,
    notes: Option<String>,
    last_maintenance_date: Option<NaiveDate>,
    next_maintenance_date: Option<NaiveDate>,
    maintenance_notes: Option<String>,
    battery_compatibility: Option<Vec<String>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AssetRow {
    fn into_asset(self) -> Option<Asset> {
        let category = match AssetCategory::parse(&self.category) {
            Ok(c) => c,
            Err(_) => {
                tracing::warn!(id = %self.id, category = %self.category, "invalid category in assets row");
                return None;
            }
        };
        let status = match AssetStatus::parse(&self.status) {
            Ok(s) => s,
            Err(_) => {
                tracing::warn!(id = %self.id, status = %self.status, "invalid status in assets row");
                return None;
            }
        };
        let shop = match Shop::parse(&self.shop) {
            Ok(s) => s,
            Err(_) => {
                tracing::warn!(id = %self.id, shop = %self.shop, "invalid shop in assets row");
                return None;
            }
        };
        Some(Asset {
            id: self.id,
            name: self.name,
            description: self.description,
            category,
            status,
            shop,
            serial_number: self.serial_number,
            model_number: self.model_number,
            manufacturer: self.manufacturer,
            purchase_date: self.purchase_date,
            purchase_price: self.purchase_price,
            warranty_expiry: self.warranty_expiry,
            location: self.location,
            notes: self.notes,
            last_maintenance_date: self.last_maintenance_date,
            next_maintenance_date: self.next_maintenance_date,
            maintenance_notes: self.maintenance_notes,
            battery_compatibility: self.battery_compatibility,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
