//! # Photo Records
//!
//! An attached image belonging to exactly one parent entity (an asset or an
//! inventory item). The parent reference is immutable after creation; there
//! is no re-parenting operation anywhere in the API.
//!
//! The single-primary invariant (at most one photo per parent with
//! `is_primary == true`) is a property of the photo *collection*, not of an
//! individual record, so it is enforced by the stores in `mks-api` — the
//! in-memory store clears sibling flags under one write lock, the Postgres
//! layer does the same inside one transaction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// An attached photo. `photo_url` is only ever produced after the binary
/// content has been durably stored — a record never precedes its object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Photo {
    pub id: Uuid,
    /// The owning asset or inventory item. Immutable after creation.
    pub parent_id: Uuid,
    pub photo_url: String,
    pub caption: Option<String>,
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
}

impl Photo {
    pub fn new(
        parent_id: Uuid,
        photo_url: impl Into<String>,
        caption: Option<String>,
        is_primary: bool,
        created_by: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            parent_id,
            photo_url: photo_url.into(),
            caption,
            is_primary,
            created_at: now,
            created_by,
        }
    }
}

/// Select the representative photo for display: the primary photo when one
/// exists, otherwise the first photo in insertion order.
pub fn display_photo(photos: &[Photo]) -> Option<&Photo> {
    photos.iter().find(|p| p.is_primary).or_else(|| photos.first())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(is_primary: bool) -> Photo {
        Photo::new(
            Uuid::new_v4(),
            "https://cdn.example/asset-photos/assets/a/1.png",
            None,
            is_primary,
            None,
            Utc::now(),
        )
    }

    #[test]
    fn display_photo_prefers_primary() {
        let photos = vec![photo(false), photo(true), photo(false)];
        assert!(display_photo(&photos).unwrap().is_primary);
        assert_eq!(display_photo(&photos).unwrap().id, photos[1].id);
    }

    #[test]
    fn display_photo_falls_back_to_first() {
        let photos = vec![photo(false), photo(false)];
        assert_eq!(display_photo(&photos).unwrap().id, photos[0].id);
    }

    #[test]
    fn display_photo_empty_collection() {
        assert!(display_photo(&[]).is_none());
    }
}
