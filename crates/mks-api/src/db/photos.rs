//! Photo record persistence operations.
//!
//! Asset photos and inventory item photos live in two structurally
//! identical tables; [`PhotoParent`] selects the table and parent column.
//!
//! The single-primary invariant is enforced here inside one transaction:
//! inserting a primary photo first clears the primary flag on every sibling
//! of the same parent, then inserts the new row. Concurrent primary inserts
//! for one parent serialize on the row locks the UPDATE takes, so the
//! invariant holds without a read-then-write window.

use sqlx::PgPool;
use uuid::Uuid;

use mks_core::Photo;

use crate::state::PhotoParent;

fn table(parent: PhotoParent) -> &'static str {
    match parent {
        PhotoParent::Asset => "asset_photos",
        PhotoParent::InventoryItem => "inventory_item_photos",
    }
}

fn parent_column(parent: PhotoParent) -> &'static str {
    match parent {
        PhotoParent::Asset => "asset_id",
        PhotoParent::InventoryItem => "inventory_item_id",
    }
}

/// Insert a photo record, demoting any existing primary of the same parent
/// in the same transaction when the new photo is primary.
pub async fn insert(pool: &PgPool, parent: PhotoParent, photo: &Photo) -> Result<(), sqlx::Error> {
    let table = table(parent);
    let parent_column = parent_column(parent);

    let mut tx = pool.begin().await?;

    if photo.is_primary {
        sqlx::query(&format!(
            "UPDATE {table} SET is_primary = FALSE WHERE {parent_column} = $1 AND is_primary"
        ))
        .bind(photo.parent_id)
        .execute(&mut *tx)
        .await?;
    }

    sqlx::query(&format!(
        "INSERT INTO {table} (id, {parent_column}, photo_url, caption, is_primary,
         created_at, created_by)
         VALUES ($1, $2, $3, $4, $5, $6, $7)"
    ))
    .bind(photo.id)
    .bind(photo.parent_id)
    .bind(&photo.photo_url)
    .bind(&photo.caption)
    .bind(photo.is_primary)
    .bind(photo.created_at)
    .bind(photo.created_by)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}

/// Load all photo records of one family in creation order, for startup
/// hydration of the in-memory stores.
pub async fn load_all(pool: &PgPool, parent: PhotoParent) -> Result<Vec<Photo>, sqlx::Error> {
    let table = table(parent);
    let parent_column = parent_column(parent);

    let rows = sqlx::query_as::<_, PhotoRow>(&format!(
        "SELECT id, {parent_column} AS parent_id, photo_url, caption, is_primary,
         created_at, created_by
         FROM {table} ORDER BY created_at"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(PhotoRow::into_photo).collect())
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct PhotoRow {
    id: Uuid,
    parent_id: Uuid,
    photo_url: String,
    caption: Option<String>,
    is_primary: bool,
    created_at: chrono::DateTime<chrono::Utc>,
    created_by: Option<Uuid>,
}

impl PhotoRow {
    fn into_photo(self) -> Photo {
        Photo {
            id: self.id,
            parent_id: self.parent_id,
            photo_url: self.photo_url,
            caption: self.caption,
            is_primary: self.is_primary,
            created_at: self.created_at,
            created_by: self.created_by,
        }
    }
}
