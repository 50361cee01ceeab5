//! # mks-core — Foundational Types for the Makerstack
//!
//! The Makerstack is the operations backend for a community makerspace:
//! physical asset tracking, consumable inventory, and photo attachments.
//! This crate holds the domain model shared by every other crate:
//!
//! - Closed enums for the fixed value sets (asset category/status, shop,
//!   inventory category/status, consumable type). Unknown values are a
//!   compile-time impossibility past the validation boundary.
//! - Entity records ([`Asset`], [`InventoryItem`]) and their form/update
//!   counterparts with field-level validation.
//! - The [`Photo`] record and its single-primary contract (enforced by the
//!   stores in `mks-api`; the record itself is plain data).
//! - The photo [`upload`] policy: MIME allow-list, size limit, bucket names,
//!   and deterministic storage path derivation.
//!
//! ## Crate Policy
//!
//! - No I/O, no async, no web-framework types. Everything here is pure data
//!   and pure functions.
//! - Wire format is snake_case JSON via serde derive; `utoipa::ToSchema` is
//!   derived on public types so the API layer can reference them in the
//!   generated OpenAPI document.

pub mod asset;
pub mod error;
pub mod inventory;
pub mod photo;
pub mod upload;

pub use asset::{Asset, AssetCategory, AssetStatus, AssetUpdate, NewAsset, Shop};
pub use error::ValidationError;
pub use inventory::{
    ConsumableType, InventoryCategory, InventoryItem, InventoryItemUpdate, InventoryStatus,
    NewInventoryItem,
};
pub use photo::Photo;
pub use upload::{validate_upload, FileRejection};
