//! # Object Storage Backends
//!
//! Abstraction over the hosted object storage consumed by photo
//! submissions: `upload(bucket, path, bytes)` plus `public_url(bucket,
//! path)`. Two backends:
//!
//! - [`FilesystemStorage`] — local directory tree, one subdirectory per
//!   bucket, atomic temp-file-and-rename writes. Production default.
//! - [`MemoryStorage`] — in-process map, used in tests and when no storage
//!   root is configured (in-memory-only mode).
//!
//! Uploads never overwrite silently by accident in practice because object
//! names are freshly generated per upload; the backends themselves are
//! last-write-wins.

use std::path::PathBuf;

use async_trait::async_trait;
use dashmap::DashMap;
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Object storage failure.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error at {bucket}/{path}: {source}")]
    Io {
        bucket: String,
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// The object storage contract: durably store bytes under `bucket/path`
/// and derive the public URL a stored object is served from.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Durably store `bytes` at `path` inside `bucket`.
    async fn upload(&self, bucket: &str, path: &str, bytes: &[u8]) -> Result<(), StorageError>;

    /// Public URL for an object. Pure derivation; does not check existence.
    fn public_url(&self, bucket: &str, path: &str) -> String;
}

/// Filesystem-backed object storage.
///
/// Objects live at `<root>/<bucket>/<path>` and are served from
/// `<public_base>/<bucket>/<path>` by whatever fronts the directory.
pub struct FilesystemStorage {
    root: PathBuf,
    public_base: String,
}

impl FilesystemStorage {
    pub fn new(root: impl Into<PathBuf>, public_base: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base: public_base.into().trim_end_matches('/').to_string(),
        }
    }

    fn object_path(&self, bucket: &str, path: &str) -> PathBuf {
        self.root.join(bucket).join(path)
    }
}

#[async_trait]
impl ObjectStorage for FilesystemStorage {
    async fn upload(&self, bucket: &str, path: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let full_path = self.object_path(bucket, path);
        let io_err = |source| StorageError::Io {
            bucket: bucket.to_string(),
            path: path.to_string(),
            source,
        };

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).await.map_err(io_err)?;
        }

        // Atomic write: temp file + rename, so a crashed upload never leaves
        // a half-written object at the public path.
        let temp_path = full_path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path).await.map_err(io_err)?;
        file.write_all(bytes).await.map_err(io_err)?;
        file.sync_all().await.map_err(io_err)?;
        drop(file);
        fs::rename(&temp_path, &full_path).await.map_err(io_err)?;

        tracing::debug!(bucket, path, size = bytes.len(), "stored object");
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/{bucket}/{path}", self.public_base)
    }
}

/// In-process object storage for tests and in-memory-only mode.
#[derive(Default)]
pub struct MemoryStorage {
    objects: DashMap<String, Vec<u8>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects (test observability).
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Fetch a stored object's bytes (test observability).
    pub fn get(&self, bucket: &str, path: &str) -> Option<Vec<u8>> {
        self.objects.get(&format!("{bucket}/{path}")).map(|v| v.clone())
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn upload(&self, bucket: &str, path: &str, bytes: &[u8]) -> Result<(), StorageError> {
        self.objects
            .insert(format!("{bucket}/{path}"), bytes.to_vec());
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("memory://{bucket}/{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_storage_round_trip() {
        let storage = MemoryStorage::new();
        storage
            .upload("asset-photos", "assets/a1/x.png", b"png-bytes")
            .await
            .unwrap();
        assert_eq!(
            storage.get("asset-photos", "assets/a1/x.png").as_deref(),
            Some(b"png-bytes".as_slice())
        );
        assert_eq!(
            storage.public_url("asset-photos", "assets/a1/x.png"),
            "memory://asset-photos/assets/a1/x.png"
        );
    }

    #[tokio::test]
    async fn filesystem_storage_writes_under_bucket() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FilesystemStorage::new(dir.path(), "https://cdn.example/");

        storage
            .upload("inventory-photos", "inventory/i1/y.jpg", b"jpeg-bytes")
            .await
            .unwrap();

        let stored = std::fs::read(dir.path().join("inventory-photos/inventory/i1/y.jpg")).unwrap();
        assert_eq!(stored, b"jpeg-bytes");
        // No temp file left behind.
        assert!(!dir
            .path()
            .join("inventory-photos/inventory/i1/y.tmp")
            .exists());
    }

    #[tokio::test]
    async fn filesystem_public_url_strips_trailing_slash() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FilesystemStorage::new(dir.path(), "https://cdn.example/");
        assert_eq!(
            storage.public_url("asset-photos", "assets/a/x.png"),
            "https://cdn.example/asset-photos/assets/a/x.png"
        );
    }
}
