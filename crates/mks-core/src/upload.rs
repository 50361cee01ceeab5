//! # Photo Upload Policy
//!
//! Fixed upload policy shared by every submission surface: the image MIME
//! allow-list, the size ceiling, the bucket names, and deterministic storage
//! path derivation. These constants are a compatibility contract with the
//! existing stored objects — changing any of them orphans previously
//! uploaded photos.
//!
//! Everything in this module is pure: no I/O, no existence checks. Path
//! derivation is deterministic, so per-upload uniqueness is the caller's
//! job via [`unique_file_name`].

use thiserror::Error;
use uuid::Uuid;

/// Image MIME types accepted for photo uploads.
pub const ALLOWED_MIME_TYPES: &[&str] =
    &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Maximum accepted upload size: 5 MiB.
pub const MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

/// Object storage bucket for asset photos.
pub const ASSET_PHOTOS_BUCKET: &str = "asset-photos";

/// Object storage bucket for inventory photos.
pub const INVENTORY_PHOTOS_BUCKET: &str = "inventory-photos";

const ASSETS_PATH_PREFIX: &str = "assets";
const INVENTORY_PATH_PREFIX: &str = "inventory";

/// Why an uploaded file was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FileRejection {
    /// The MIME type is outside the fixed allow-list.
    #[error("file type `{mime}` not allowed, allowed types: {}", .allowed.join(", "))]
    UnsupportedType {
        mime: String,
        allowed: &'static [&'static str],
    },

    /// The file exceeds the fixed size ceiling.
    #[error("file too large ({size} bytes), maximum size: {limit} bytes")]
    TooLarge { size: u64, limit: u64 },
}

/// Validate an uploaded file's MIME type and size against the fixed policy.
///
/// The type check runs first, so an oversized file of a disallowed type is
/// reported as `UnsupportedType`.
pub fn validate_upload(mime: &str, size: u64) -> Result<(), FileRejection> {
    if !ALLOWED_MIME_TYPES.contains(&mime) {
        return Err(FileRejection::UnsupportedType {
            mime: mime.to_string(),
            allowed: ALLOWED_MIME_TYPES,
        });
    }
    if size > MAX_FILE_SIZE {
        return Err(FileRejection::TooLarge {
            size,
            limit: MAX_FILE_SIZE,
        });
    }
    Ok(())
}

/// Storage path for an asset photo: `assets/<asset_id>/<file_name>`.
pub fn asset_photo_path(asset_id: &str, file_name: &str) -> String {
    format!("{ASSETS_PATH_PREFIX}/{asset_id}/{file_name}")
}

/// Storage path for an inventory photo: `inventory/<item_id>/<file_name>`.
pub fn inventory_photo_path(item_id: &str, file_name: &str) -> String {
    format!("{INVENTORY_PATH_PREFIX}/{item_id}/{file_name}")
}

/// Generate a fresh, collision-resistant object name for one upload,
/// preserving the original file's extension (defaulting to `bin` when the
/// original name has none).
pub fn unique_file_name(original: &str) -> String {
    let ext = std::path::Path::new(original)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .unwrap_or("bin");
    format!("{}.{ext}", Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn accepts_all_allowed_types_at_limit() {
        for mime in ALLOWED_MIME_TYPES {
            assert_eq!(validate_upload(mime, MAX_FILE_SIZE), Ok(()));
        }
    }

    #[test]
    fn rejects_disallowed_type_regardless_of_size() {
        let err = validate_upload("application/pdf", 10).unwrap_err();
        match err {
            FileRejection::UnsupportedType { mime, allowed } => {
                assert_eq!(mime, "application/pdf");
                assert_eq!(allowed, ALLOWED_MIME_TYPES);
            }
            other => panic!("expected UnsupportedType, got: {other:?}"),
        }
        // Type check wins even when the file is also oversized.
        assert!(matches!(
            validate_upload("text/html", MAX_FILE_SIZE + 1).unwrap_err(),
            FileRejection::UnsupportedType { .. }
        ));
    }

    #[test]
    fn rejects_oversized_allowed_type() {
        let err = validate_upload("image/jpeg", MAX_FILE_SIZE + 1).unwrap_err();
        assert_eq!(
            err,
            FileRejection::TooLarge {
                size: MAX_FILE_SIZE + 1,
                limit: MAX_FILE_SIZE,
            }
        );
    }

    #[test]
    fn size_limit_is_exactly_five_mebibytes() {
        assert_eq!(MAX_FILE_SIZE, 5 * 1024 * 1024);
        assert!(validate_upload("image/png", MAX_FILE_SIZE).is_ok());
        assert!(validate_upload("image/png", MAX_FILE_SIZE + 1).is_err());
    }

    #[test]
    fn path_derivation_is_pinned() {
        assert_eq!(asset_photo_path("A1", "x.png"), "assets/A1/x.png");
        assert_eq!(inventory_photo_path("I1", "y.jpg"), "inventory/I1/y.jpg");
    }

    #[test]
    fn path_derivation_is_deterministic() {
        let a = asset_photo_path("7d3", "photo.webp");
        let b = asset_photo_path("7d3", "photo.webp");
        assert_eq!(a, b);
    }

    #[test]
    fn unique_file_name_preserves_extension() {
        let name = unique_file_name("workbench photo.JPG");
        assert!(name.ends_with(".JPG"));
        let name = unique_file_name("no-extension");
        assert!(name.ends_with(".bin"));
    }

    #[test]
    fn unique_file_name_is_fresh_per_call() {
        assert_ne!(unique_file_name("a.png"), unique_file_name("a.png"));
    }

    proptest! {
        #[test]
        fn arbitrary_mime_outside_allowlist_is_rejected(mime in "[a-z]{3,10}/[a-z]{3,10}", size in 0u64..MAX_FILE_SIZE) {
            prop_assume!(!ALLOWED_MIME_TYPES.contains(&mime.as_str()));
            let rejected_as_unsupported = matches!(
                validate_upload(&mime, size),
                Err(FileRejection::UnsupportedType { .. })
            );
            prop_assert!(rejected_as_unsupported);
        }

        #[test]
        fn valid_type_and_size_is_accepted(size in 0u64..=MAX_FILE_SIZE) {
            prop_assert!(validate_upload("image/webp", size).is_ok());
        }
    }
}
