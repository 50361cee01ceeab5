//! Inventory item persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `inventory_items`
//! table. Enum columns are stored as their wire-format text values.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use mks_core::{ConsumableType, InventoryCategory, InventoryItem, InventoryStatus};

/// Insert a new inventory item record.
pub async fn insert(pool: &PgPool, item: &InventoryItem) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO inventory_items (id, name, description, category,
         consumable_type, status, quantity, unit, min_quantity, location,
         supplier, supplier_part_number, last_ordered, last_restocked, notes,
         created_by, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                 $11, $12, $13, $14, $15, $16, $17, $18)",
    )
    .bind(item.id)
    .bind(&item.name)
    .bind(&item.description)
    .bind(item.category.as_str())
    .bind(item.consumable_type.map(|t| t.as_str()))
    .bind(item.status.as_str())
    .bind(item.quantity)
    .bind(&item.unit)
    .bind(item.min_quantity)
    .bind(&item.location)
    .bind(&item.supplier)
    .bind(&item.supplier_part_number)
    .bind(item.last_ordered)
    .bind(item.last_restocked)
    .bind(&item.notes)
    .bind(item.created_by)
    .bind(item.created_at)
    .bind(item.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Persist the full current state of an inventory item after a partial
/// update has been applied in memory.
pub async fn update(pool: &PgPool, item: &InventoryItem) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE inventory_items SET name = $2, description = $3, category = $4,
         consumable_type = $5, status = $6, quantity = $7, unit = $8,
         min_quantity = $9, location = $10, supplier = $11,
         supplier_part_number = $12, last_ordered = $13, last_restocked = $14,
         notes = $15, updated_at = $16
         WHERE id = $1",
    )
    .bind(item.id)
    .bind(&item.name)
    .bind(&item.description)
    .bind(item.category.as_str())
    .bind(item.consumable_type.map(|t| t.as_str()))
    .bind(item.status.as_str())
    .bind(item.quantity)
    .bind(&item.unit)
    .bind(item.min_quantity)
    .bind(&item.location)
    .bind(&item.supplier)
    .bind(&item.supplier_part_number)
    .bind(item.last_ordered)
    .bind(item.last_restocked)
    .bind(&item.notes)
    .bind(item.updated_at)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Load all inventory items from the database into the in-memory store on
/// startup.
pub async fn load_all(pool: &PgPool) -> Result<Vec<InventoryItem>, sqlx::Error> {
    let rows = sqlx::query_as::<_, InventoryItemRow>(
        "SELECT id, name, description, category, consumable_type, status,
         quantity, unit, min_quantity, location, supplier,
         supplier_part_number, last_ordered, last_restocked, notes,
         created_by, created_at, updated_at
         FROM inventory_items ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;

    let mut items = Vec::with_capacity(rows.len());
    for row in rows {
        match row.into_item() {
            Some(item) => items.push(item),
            None => {
                tracing::error!(
                    "skipping inventory item row with invalid enum value during load_all"
                );
            }
        }
    }
    Ok(items)
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct InventoryItemRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    category: String,
    consumable_type: Option<String>,
    status: String,
    quantity: f64,
    unit: String,
    min_quantity: f64,
    location: Option<String>,
    supplier: Option<String>,
    supplier_part_number: Option<String>,
    last_ordered: Option<NaiveDate>,
    last_restocked: Option<NaiveDate>,
    notes: Option<String>,
    created_by: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl InventoryItemRow {
    fn into_item(self) -> Option<InventoryItem> {
        let category = match InventoryCategory::parse(&self.category) {
            Ok(c) => c,
            Err(_) => {
                tracing::warn!(
                    id = %self.id,
                    category = %self.category,
                    "invalid category in inventory_items row"
                );
                return None;
            }
        };
        let status = match InventoryStatus::parse(&self.status) {
            Ok(s) => s,
            Err(_) => {
                tracing::warn!(
                    id = %self.id,
                    status = %self.status,
                    "invalid status in inventory_items row"
                );
                return None;
            }
        };
        let consumable_type = match &self.consumable_type {
            Some(raw) => match ConsumableType::parse(raw) {
                Ok(t) => Some(t),
                Err(_) => {
                    tracing::warn!(
                        id = %self.id,
                        consumable_type = %raw,
                        "invalid consumable_type in inventory_items row"
                    );
                    return None;
                }
            },
            None => None,
        };
        Some(InventoryItem {
            id: self.id,
            name: self.name,
            description: self.description,
            category,
            consumable_type,
            status,
            quantity: self.quantity,
            unit: self.unit,
            min_quantity: self.min_quantity,
            location: self.location,
            supplier: self.supplier,
            supplier_part_number: self.supplier_part_number,
            last_ordered: self.last_ordered,
            last_restocked: self.last_restocked,
            notes: self.notes,
            created_by: self.created_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
