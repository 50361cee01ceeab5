//! # Request Extraction Helpers
//!
//! JSON body extraction with domain validation. Handlers take the body as
//! `Result<Json<T>, JsonRejection>` so a deserialization failure surfaces
//! as a structured 422 instead of axum's default plain-text response.

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::error::AppError;

/// Request types that carry their own field-level validation.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

/// Unwrap a JSON extraction result and run the payload's validation.
///
/// Deserialization failures (including enum values outside their fixed
/// sets) become `BadRequest`; semantic failures become `Validation`. Both
/// map to 422.
pub fn extract_validated_json<T: Validate>(
    body: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let Json(payload) = body.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    payload.validate().map_err(AppError::Validation)?;
    Ok(payload)
}

impl Validate for mks_core::AssetUpdate {
    fn validate(&self) -> Result<(), String> {
        self.validate().map_err(|e| e.to_string())
    }
}

impl Validate for mks_core::InventoryItemUpdate {
    fn validate(&self) -> Result<(), String> {
        self.validate().map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mks_core::AssetUpdate;

    #[test]
    fn valid_update_passes_through() {
        let update = AssetUpdate {
            name: Some("Bandsaw".to_string()),
            ..Default::default()
        };
        let extracted = extract_validated_json(Ok(Json(update))).unwrap();
        assert_eq!(extracted.name.as_deref(), Some("Bandsaw"));
    }

    #[test]
    fn invalid_update_becomes_validation_error() {
        let update = AssetUpdate {
            name: Some("  ".to_string()),
            ..Default::default()
        };
        let err = extract_validated_json(Ok(Json(update))).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
