//! # Form Submission Orchestration
//!
//! Translates a multipart submission (named scalar fields plus zero or more
//! file attachments) into typed entity fields and per-file photo outcomes.
//!
//! The failure policy follows the submission contract: field coercion and
//! parent-entity creation failures abort the whole submission before any
//! write, while per-file failures during photo processing are isolated —
//! a single bad photo is reported in the response but never blocks sibling
//! files or the parent entity.

use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::Multipart;
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use mks_core::upload::{unique_file_name, validate_upload};
use mks_core::{
    AssetCategory, AssetStatus, ConsumableType, InventoryCategory, InventoryStatus, NewAsset,
    NewInventoryItem, Photo, Shop, ValidationError,
};

use crate::auth::CallerIdentity;
use crate::error::AppError;
use crate::state::{AppState, PhotoParent};

/// One file attachment from a submission, paired with its caption and
/// primary flag (matched by position, the way the form emits them).
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
    pub caption: Option<String>,
    pub is_primary: bool,
}

/// A parsed multipart submission: scalar fields plus file attachments.
pub struct Submission {
    pub fields: HashMap<String, String>,
    pub files: Vec<UploadedFile>,
}

/// Read an entire multipart body into a [`Submission`].
///
/// File parts are named `photos`; `photo_captions` and `photo_is_primary`
/// are parallel arrays zipped with the files by index. Every other part is
/// a scalar field (last occurrence wins).
pub async fn parse_submission(mut multipart: Multipart) -> Result<Submission, AppError> {
    let mut fields = HashMap::new();
    let mut files = Vec::new();
    let mut captions: Vec<String> = Vec::new();
    let mut primaries: Vec<String> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "photos" => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    AppError::BadRequest(format!("failed to read file part: {e}"))
                })?;
                files.push(UploadedFile {
                    file_name,
                    content_type,
                    bytes,
                    caption: None,
                    is_primary: false,
                });
            }
            "photo_captions" => {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("failed to read field: {e}"))
                })?;
                captions.push(text);
            }
            "photo_is_primary" => {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("failed to read field: {e}"))
                })?;
                primaries.push(text);
            }
            _ => {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("failed to read field: {e}"))
                })?;
                fields.insert(name, text);
            }
        }
    }

    for (i, file) in files.iter_mut().enumerate() {
        file.caption = captions.get(i).map(|c| c.trim()).filter(|c| !c.is_empty()).map(String::from);
        file.is_primary = primaries.get(i).map(|p| p == "true").unwrap_or(false);
    }

    Ok(Submission { fields, files })
}

// ── Field coercion ───────────────────────────────────────────────

fn optional(fields: &HashMap<String, String>, key: &str) -> Option<String> {
    fields
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(String::from)
}

fn required<'a>(
    fields: &'a HashMap<String, String>,
    key: &'static str,
) -> Result<&'a str, ValidationError> {
    fields
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .ok_or(ValidationError::MissingField { field: key })
}

fn optional_date(
    fields: &HashMap<String, String>,
    key: &'static str,
) -> Result<Option<NaiveDate>, ValidationError> {
    match optional(fields, key) {
        Some(raw) => raw
            .parse::<NaiveDate>()
            .map(Some)
            .map_err(|_| ValidationError::InvalidDate { field: key, value: raw }),
        None => Ok(None),
    }
}

fn optional_number(
    fields: &HashMap<String, String>,
    key: &'static str,
) -> Result<Option<f64>, ValidationError> {
    match optional(fields, key) {
        Some(raw) => raw
            .parse::<f64>()
            .map(Some)
            .map_err(|_| ValidationError::InvalidNumber { field: key, value: raw }),
        None => Ok(None),
    }
}

/// Coerce submitted scalar fields into a validated [`NewAsset`].
pub fn new_asset_from_fields(
    fields: &HashMap<String, String>,
) -> Result<NewAsset, ValidationError> {
    let new = NewAsset {
        name: required(fields, "name")?.to_string(),
        description: optional(fields, "description"),
        category: AssetCategory::parse(required(fields, "category")?)?,
        status: AssetStatus::parse(required(fields, "status")?)?,
        shop: Shop::parse(required(fields, "shop")?)?,
        serial_number: optional(fields, "serial_number"),
        model_number: optional(fields, "model_number"),
        manufacturer: optional(fields, "manufacturer"),
        purchase_date: optional_date(fields, "purchase_date")?,
        purchase_price: optional_number(fields, "purchase_price")?,
        warranty_expiry: optional_date(fields, "warranty_expiry")?,
        location: optional(fields, "location"),
        notes: optional(fields, "notes"),
        last_maintenance_date: optional_date(fields, "last_maintenance_date")?,
        next_maintenance_date: optional_date(fields, "next_maintenance_date")?,
        maintenance_notes: optional(fields, "maintenance_notes"),
        battery_compatibility: optional(fields, "battery_compatibility").map(|raw| {
            raw.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        }),
    };
    new.validate()?;
    Ok(new)
}

/// Coerce submitted scalar fields into a validated [`NewInventoryItem`].
pub fn new_inventory_item_from_fields(
    fields: &HashMap<String, String>,
) -> Result<NewInventoryItem, ValidationError> {
    let consumable_type = match optional(fields, "consumable_type") {
        Some(raw) => Some(ConsumableType::parse(&raw)?),
        None => None,
    };
    let new = NewInventoryItem {
        name: required(fields, "name")?.to_string(),
        description: optional(fields, "description"),
        category: InventoryCategory::parse(required(fields, "category")?)?,
        consumable_type,
        status: InventoryStatus::parse(required(fields, "status")?)?,
        quantity: optional_number(fields, "quantity")?.unwrap_or(0.0),
        unit: required(fields, "unit")?.to_string(),
        min_quantity: optional_number(fields, "min_quantity")?.unwrap_or(0.0),
        location: optional(fields, "location"),
        supplier: optional(fields, "supplier"),
        supplier_part_number: optional(fields, "supplier_part_number"),
        last_ordered: optional_date(fields, "last_ordered")?,
        last_restocked: optional_date(fields, "last_restocked")?,
        notes: optional(fields, "notes"),
    };
    new.validate()?;
    Ok(new)
}

// ── Photo processing ─────────────────────────────────────────────

/// Result of processing one attached file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PhotoUploadStatus {
    /// Uploaded and recorded.
    Created,
    /// Rejected by the upload policy before any write.
    Rejected,
    /// Upload or record write failed after validation passed.
    Failed,
}

/// Per-file outcome reported back to the submitter. Failures here are
/// warnings — the parent entity's creation already succeeded.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PhotoOutcome {
    pub file_name: String,
    pub status: PhotoUploadStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<Photo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response body for a standalone photo submission on an existing parent.
#[derive(Debug, Serialize, ToSchema)]
pub struct AddPhotosResponse {
    pub photos: Vec<PhotoOutcome>,
}

impl PhotoOutcome {
    fn created(file_name: String, photo: Photo) -> Self {
        Self {
            file_name,
            status: PhotoUploadStatus::Created,
            photo: Some(photo),
            error: None,
        }
    }

    fn rejected(file_name: String, error: String) -> Self {
        Self {
            file_name,
            status: PhotoUploadStatus::Rejected,
            photo: None,
            error: Some(error),
        }
    }

    fn failed(file_name: String, error: String) -> Self {
        Self {
            file_name,
            status: PhotoUploadStatus::Failed,
            photo: None,
            error: Some(error),
        }
    }
}

/// Process each attached file independently: validate, upload, then record.
///
/// The photo record is created only after the bytes are durably stored. A
/// record-write failure after a successful upload leaves the stored object
/// orphaned; that is reported (not masked) and no cleanup is attempted.
pub async fn process_photos(
    state: &AppState,
    parent: PhotoParent,
    parent_id: Uuid,
    files: Vec<UploadedFile>,
    caller: &CallerIdentity,
) -> Vec<PhotoOutcome> {
    let mut outcomes = Vec::with_capacity(files.len());

    for file in files {
        if let Err(rejection) = validate_upload(&file.content_type, file.bytes.len() as u64) {
            tracing::warn!(
                file_name = %file.file_name,
                error = %rejection,
                "skipping invalid photo upload"
            );
            outcomes.push(PhotoOutcome::rejected(file.file_name, rejection.to_string()));
            continue;
        }

        let object_name = unique_file_name(&file.file_name);
        let path = parent.storage_path(parent_id, &object_name);
        let bucket = parent.bucket();

        if let Err(e) = state.storage.upload(bucket, &path, &file.bytes).await {
            tracing::error!(
                file_name = %file.file_name,
                bucket,
                path = %path,
                error = %e,
                "photo upload failed"
            );
            outcomes.push(PhotoOutcome::failed(
                file.file_name,
                "upload to object storage failed".to_string(),
            ));
            continue;
        }

        let photo_url = state.storage.public_url(bucket, &path);
        let photo = Photo::new(
            parent_id,
            photo_url,
            file.caption,
            file.is_primary,
            caller.user_id,
            Utc::now(),
        );

        state.photos_for(parent).insert(photo.clone());

        // Write-through. A failure here leaves the uploaded object orphaned;
        // surfaced to the submitter rather than silently masked.
        if let Some(pool) = &state.db_pool {
            if let Err(e) = crate::db::photos::insert(pool, parent, &photo).await {
                tracing::error!(
                    photo_id = %photo.id,
                    parent_id = %parent_id,
                    error = %e,
                    "failed to persist photo record to database"
                );
                outcomes.push(PhotoOutcome::failed(
                    file.file_name,
                    "photo stored but record persist failed".to_string(),
                ));
                continue;
            }
        }

        outcomes.push(PhotoOutcome::created(file.file_name, photo));
    }

    outcomes
}
