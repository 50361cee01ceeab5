//! # Application State
//!
//! Shared state for the Axum application. The in-memory stores are
//! authoritative for request handling; when a database pool is configured
//! every write goes through to Postgres as well (write-through), and the
//! stores are hydrated from Postgres at startup.
//!
//! [`PhotoStore`] is the enforcement point for the single-primary
//! invariant: inserting a primary photo clears the sibling flags inside the
//! same write-lock scope, so no reader ever observes two primary photos on
//! one parent.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use mks_core::upload::{
    asset_photo_path, inventory_photo_path, ASSET_PHOTOS_BUCKET, INVENTORY_PHOTOS_BUCKET,
};
use mks_core::{Asset, InventoryItem, Photo};
use parking_lot::RwLock;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::SecretString;
use crate::storage::{MemoryStorage, ObjectStorage};

/// Application configuration, read from the environment in `main`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub auth_token: Option<SecretString>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            auth_token: None,
        }
    }
}

/// Which entity family a photo belongs to. Determines the storage bucket,
/// the path prefix, and the photo table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoParent {
    Asset,
    InventoryItem,
}

impl PhotoParent {
    pub fn bucket(&self) -> &'static str {
        match self {
            Self::Asset => ASSET_PHOTOS_BUCKET,
            Self::InventoryItem => INVENTORY_PHOTOS_BUCKET,
        }
    }

    /// Storage path for one photo object of this family.
    pub fn storage_path(&self, parent_id: Uuid, file_name: &str) -> String {
        match self {
            Self::Asset => asset_photo_path(&parent_id.to_string(), file_name),
            Self::InventoryItem => inventory_photo_path(&parent_id.to_string(), file_name),
        }
    }
}

/// Per-parent photo collections in insertion order.
///
/// All mutations happen under one write lock, which is what makes
/// concurrent primary-flag updates on the same parent serialize.
#[derive(Clone, Default)]
pub struct PhotoStore {
    inner: Arc<RwLock<HashMap<Uuid, Vec<Photo>>>>,
}

impl PhotoStore {
    /// Insert a photo. If it is marked primary, clear the primary flag on
    /// every sibling of the same parent within the same lock scope.
    pub fn insert(&self, photo: Photo) {
        let mut parents = self.inner.write();
        let siblings = parents.entry(photo.parent_id).or_default();
        if photo.is_primary {
            for sibling in siblings.iter_mut() {
                sibling.is_primary = false;
            }
        }
        siblings.push(photo);
    }

    /// All photos of a parent, in insertion order.
    pub fn for_parent(&self, parent_id: Uuid) -> Vec<Photo> {
        self.inner
            .read()
            .get(&parent_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of photos of a parent currently flagged primary. The
    /// invariant keeps this at 0 or 1.
    pub fn primary_count(&self, parent_id: Uuid) -> usize {
        self.inner
            .read()
            .get(&parent_id)
            .map(|photos| photos.iter().filter(|p| p.is_primary).count())
            .unwrap_or(0)
    }
}

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub assets: Arc<DashMap<Uuid, Asset>>,
    pub inventory: Arc<DashMap<Uuid, InventoryItem>>,
    pub asset_photos: PhotoStore,
    pub inventory_photos: PhotoStore,
    pub db_pool: Option<PgPool>,
    pub storage: Arc<dyn ObjectStorage>,
}

impl AppState {
    /// In-memory-only state with default configuration (development/tests).
    pub fn new() -> Self {
        Self::with_config(AppConfig::default(), None, Arc::new(MemoryStorage::new()))
    }

    pub fn with_config(
        config: AppConfig,
        db_pool: Option<PgPool>,
        storage: Arc<dyn ObjectStorage>,
    ) -> Self {
        Self {
            config,
            assets: Arc::new(DashMap::new()),
            inventory: Arc::new(DashMap::new()),
            asset_photos: PhotoStore::default(),
            inventory_photos: PhotoStore::default(),
            db_pool,
            storage,
        }
    }

    /// The photo store for one entity family.
    pub fn photos_for(&self, parent: PhotoParent) -> &PhotoStore {
        match parent {
            PhotoParent::Asset => &self.asset_photos,
            PhotoParent::InventoryItem => &self.inventory_photos,
        }
    }

    /// Whether the referenced parent entity exists.
    pub fn parent_exists(&self, parent: PhotoParent, id: Uuid) -> bool {
        match parent {
            PhotoParent::Asset => self.assets.contains_key(&id),
            PhotoParent::InventoryItem => self.inventory.contains_key(&id),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn photo(parent_id: Uuid, is_primary: bool) -> Photo {
        Photo::new(parent_id, "memory://x", None, is_primary, None, Utc::now())
    }

    #[test]
    fn insert_preserves_insertion_order() {
        let store = PhotoStore::default();
        let parent = Uuid::new_v4();
        let first = photo(parent, false);
        let second = photo(parent, false);
        store.insert(first.clone());
        store.insert(second.clone());

        let photos = store.for_parent(parent);
        assert_eq!(photos.len(), 2);
        assert_eq!(photos[0].id, first.id);
        assert_eq!(photos[1].id, second.id);
    }

    #[test]
    fn primary_insert_demotes_previous_primary() {
        let store = PhotoStore::default();
        let parent = Uuid::new_v4();
        let p1 = photo(parent, true);
        let p2 = photo(parent, true);
        store.insert(p1.clone());
        store.insert(p2.clone());

        let photos = store.for_parent(parent);
        assert!(!photos[0].is_primary, "P1 must be demoted");
        assert!(photos[1].is_primary, "P2 must be primary");
        assert_eq!(store.primary_count(parent), 1);
    }

    #[test]
    fn primary_count_never_exceeds_one() {
        let store = PhotoStore::default();
        let parent = Uuid::new_v4();
        for primary in [true, false, true, true, false] {
            store.insert(photo(parent, primary));
        }
        assert!(store.primary_count(parent) <= 1);
        assert_eq!(store.for_parent(parent).len(), 5);
    }

    #[test]
    fn non_primary_inserts_leave_flags_alone() {
        let store = PhotoStore::default();
        let parent = Uuid::new_v4();
        store.insert(photo(parent, true));
        store.insert(photo(parent, false));
        let photos = store.for_parent(parent);
        assert!(photos[0].is_primary);
        assert!(!photos[1].is_primary);
    }

    #[test]
    fn parents_are_isolated() {
        let store = PhotoStore::default();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        store.insert(photo(a, true));
        store.insert(photo(b, true));
        assert_eq!(store.primary_count(a), 1);
        assert_eq!(store.primary_count(b), 1);
    }

    #[test]
    fn photo_parent_storage_paths() {
        let id = Uuid::nil();
        assert_eq!(
            PhotoParent::Asset.storage_path(id, "x.png"),
            format!("assets/{id}/x.png")
        );
        assert_eq!(
            PhotoParent::InventoryItem.storage_path(id, "y.jpg"),
            format!("inventory/{id}/y.jpg")
        );
        assert_eq!(PhotoParent::Asset.bucket(), "asset-photos");
        assert_eq!(PhotoParent::InventoryItem.bucket(), "inventory-photos");
    }
}
