//! # Asset Domain Model
//!
//! A physical item owned by the makerspace: tools, machines, safety gear.
//! The category/status/shop columns are closed enums — the fixed value sets
//! live here as Rust sum types, and the only way to obtain a value is via
//! serde deserialization or [`AssetCategory::parse`]-style constructors,
//! both of which reject anything outside the set.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ValidationError;

/// Fixed asset categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AssetCategory {
    HandTool,
    PowerTool,
    Machine,
    SafetyEquipment,
    Other,
}

impl AssetCategory {
    /// The wire-format value set, in declaration order.
    pub const ALLOWED: &'static [&'static str] =
        &["hand_tool", "power_tool", "machine", "safety_equipment", "other"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HandTool => "hand_tool",
            Self::PowerTool => "power_tool",
            Self::Machine => "machine",
            Self::SafetyEquipment => "safety_equipment",
            Self::Other => "other",
        }
    }

    /// Parse a wire-format value, rejecting anything outside the fixed set.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value {
            "hand_tool" => Ok(Self::HandTool),
            "power_tool" => Ok(Self::PowerTool),
            "machine" => Ok(Self::Machine),
            "safety_equipment" => Ok(Self::SafetyEquipment),
            "other" => Ok(Self::Other),
            other => Err(ValidationError::InvalidEnumValue {
                field: "category",
                value: other.to_string(),
                allowed: Self::ALLOWED,
            }),
        }
    }
}

/// Fixed asset lifecycle statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AssetStatus {
    Available,
    InUse,
    Maintenance,
    Retired,
    Broken,
}

impl AssetStatus {
    pub const ALLOWED: &'static [&'static str] =
        &["available", "in_use", "maintenance", "retired", "broken"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::InUse => "in_use",
            Self::Maintenance => "maintenance",
            Self::Retired => "retired",
            Self::Broken => "broken",
        }
    }

    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value {
            "available" => Ok(Self::Available),
            "in_use" => Ok(Self::InUse),
            "maintenance" => Ok(Self::Maintenance),
            "retired" => Ok(Self::Retired),
            "broken" => Ok(Self::Broken),
            other => Err(ValidationError::InvalidEnumValue {
                field: "status",
                value: other.to_string(),
                allowed: Self::ALLOWED,
            }),
        }
    }
}

/// Shops/work areas an asset can be grouped under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Shop {
    Woodshop,
    Metalshop,
    Electronics,
    #[serde(rename = "3d_printing")]
    ThreeDPrinting,
    LaserCutting,
    Cnc,
    General,
    Storage,
}

impl Shop {
    pub const ALLOWED: &'static [&'static str] = &[
        "woodshop",
        "metalshop",
        "electronics",
        "3d_printing",
        "laser_cutting",
        "cnc",
        "general",
        "storage",
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Woodshop => "woodshop",
            Self::Metalshop => "metalshop",
            Self::Electronics => "electronics",
            Self::ThreeDPrinting => "3d_printing",
            Self::LaserCutting => "laser_cutting",
            Self::Cnc => "cnc",
            Self::General => "general",
            Self::Storage => "storage",
        }
    }

    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value {
            "woodshop" => Ok(Self::Woodshop),
            "metalshop" => Ok(Self::Metalshop),
            "electronics" => Ok(Self::Electronics),
            "3d_printing" => Ok(Self::ThreeDPrinting),
            "laser_cutting" => Ok(Self::LaserCutting),
            "cnc" => Ok(Self::Cnc),
            "general" => Ok(Self::General),
            "storage" => Ok(Self::Storage),
            other => Err(ValidationError::InvalidEnumValue {
                field: "shop",
                value: other.to_string(),
                allowed: Self::ALLOWED,
            }),
        }
    }
}

/// A physical asset record.
///
/// `id`, `created_at`, and `updated_at` are server-assigned; `updated_at`
/// is never earlier than `created_at`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Asset {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: AssetCategory,
    pub status: AssetStatus,
    pub shop: Shop,
    pub serial_number: Option<String>,
    pub model_number: Option<String>,
    pub manufacturer: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub purchase_price: Option<f64>,
    pub warranty_expiry: Option<NaiveDate>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub last_maintenance_date: Option<NaiveDate>,
    pub next_maintenance_date: Option<NaiveDate>,
    pub maintenance_notes: Option<String>,
    pub battery_compatibility: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Asset {
    /// Materialize a validated form into a record with server-assigned
    /// identity and timestamps.
    pub fn from_new(new: NewAsset, id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: new.name,
            description: new.description,
            category: new.category,
            status: new.status,
            shop: new.shop,
            serial_number: new.serial_number,
            model_number: new.model_number,
            manufacturer: new.manufacturer,
            purchase_date: new.purchase_date,
            purchase_price: new.purchase_price,
            warranty_expiry: new.warranty_expiry,
            location: new.location,
            notes: new.notes,
            last_maintenance_date: new.last_maintenance_date,
            next_maintenance_date: new.next_maintenance_date,
            maintenance_notes: new.maintenance_notes,
            battery_compatibility: new.battery_compatibility,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A new asset as submitted by a form, before identity assignment.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct NewAsset {
    pub name: String,
    pub description: Option<String>,
    pub category: AssetCategory,
    pub status: AssetStatus,
    pub shop: Shop,
    pub serial_number: Option<String>,
    pub model_number: Option<String>,
    pub manufacturer: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub purchase_price: Option<f64>,
    pub warranty_expiry: Option<NaiveDate>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub last_maintenance_date: Option<NaiveDate>,
    pub next_maintenance_date: Option<NaiveDate>,
    pub maintenance_notes: Option<String>,
    pub battery_compatibility: Option<Vec<String>>,
}

impl NewAsset {
    /// Validate field constraints that the type system cannot express.
    ///
    /// Enum fields are already closed by construction; this checks the
    /// required-non-empty and non-negative rules.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "name" });
        }
        if let Some(price) = self.purchase_price {
            if price < 0.0 || !price.is_finite() {
                return Err(ValidationError::NegativeNumber {
                    field: "purchase_price",
                    value: price,
                });
            }
        }
        Ok(())
    }
}

/// Partial update for an asset. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct AssetUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<AssetCategory>,
    pub status: Option<AssetStatus>,
    pub shop: Option<Shop>,
    pub serial_number: Option<String>,
    pub model_number: Option<String>,
    pub manufacturer: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub purchase_price: Option<f64>,
    pub warranty_expiry: Option<NaiveDate>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub last_maintenance_date: Option<NaiveDate>,
    pub next_maintenance_date: Option<NaiveDate>,
    pub maintenance_notes: Option<String>,
    pub battery_compatibility: Option<Vec<String>>,
}

impl AssetUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(ValidationError::MissingField { field: "name" });
            }
        }
        if let Some(price) = self.purchase_price {
            if price < 0.0 || !price.is_finite() {
                return Err(ValidationError::NegativeNumber {
                    field: "purchase_price",
                    value: price,
                });
            }
        }
        Ok(())
    }

    /// Apply the update in place, bumping `updated_at`.
    pub fn apply(self, asset: &mut Asset, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            asset.name = name;
        }
        if let Some(description) = self.description {
            asset.description = Some(description);
        }
        if let Some(category) = self.category {
            asset.category = category;
        }
        if let Some(status) = self.status {
            asset.status = status;
        }
        if let Some(shop) = self.shop {
            asset.shop = shop;
        }
        if let Some(serial_number) = self.serial_number {
            asset.serial_number = Some(serial_number);
        }
        if let Some(model_number) = self.model_number {
            asset.model_number = Some(model_number);
        }
        if let Some(manufacturer) = self.manufacturer {
            asset.manufacturer = Some(manufacturer);
        }
        if let Some(purchase_date) = self.purchase_date {
            asset.purchase_date = Some(purchase_date);
        }
        if let Some(purchase_price) = self.purchase_price {
            asset.purchase_price = Some(purchase_price);
        }
        if let Some(warranty_expiry) = self.warranty_expiry {
            asset.warranty_expiry = Some(warranty_expiry);
        }
        if let Some(location) = self.location {
            asset.location = Some(location);
        }
        if let Some(notes) = self.notes {
            asset.notes = Some(notes);
        }
        if let Some(date) = self.last_maintenance_date {
            asset.last_maintenance_date = Some(date);
        }
        if let Some(date) = self.next_maintenance_date {
            asset.next_maintenance_date = Some(date);
        }
        if let Some(maintenance_notes) = self.maintenance_notes {
            asset.maintenance_notes = Some(maintenance_notes);
        }
        if let Some(batteries) = self.battery_compatibility {
            asset.battery_compatibility = Some(batteries);
        }
        asset.updated_at = now;
    }
}

impl Default for AssetCategory {
    fn default() -> Self {
        Self::Other
    }
}

impl Default for AssetStatus {
    fn default() -> Self {
        Self::Available
    }
}

impl Default for Shop {
    fn default() -> Self {
        Self::General
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_new_asset() -> NewAsset {
        NewAsset {
            name: "Table Saw".to_string(),
            category: AssetCategory::PowerTool,
            status: AssetStatus::Available,
            shop: Shop::Woodshop,
            ..Default::default()
        }
    }

    #[test]
    fn category_parse_round_trips_all_values() {
        for value in AssetCategory::ALLOWED {
            let parsed = AssetCategory::parse(value).unwrap();
            assert_eq!(parsed.as_str(), *value);
        }
    }

    #[test]
    fn category_parse_rejects_unknown_value() {
        let err = AssetCategory::parse("spaceship").unwrap_err();
        match err {
            ValidationError::InvalidEnumValue { field, value, .. } => {
                assert_eq!(field, "category");
                assert_eq!(value, "spaceship");
            }
            other => panic!("expected InvalidEnumValue, got: {other:?}"),
        }
    }

    #[test]
    fn shop_serializes_3d_printing_rename() {
        let json = serde_json::to_string(&Shop::ThreeDPrinting).unwrap();
        assert_eq!(json, "\"3d_printing\"");
        let back: Shop = serde_json::from_str("\"3d_printing\"").unwrap();
        assert_eq!(back, Shop::ThreeDPrinting);
    }

    #[test]
    fn shop_parse_round_trips_all_values() {
        for value in Shop::ALLOWED {
            assert_eq!(Shop::parse(value).unwrap().as_str(), *value);
        }
    }

    #[test]
    fn status_parse_round_trips_all_values() {
        for value in AssetStatus::ALLOWED {
            assert_eq!(AssetStatus::parse(value).unwrap().as_str(), *value);
        }
    }

    #[test]
    fn empty_name_fails_validation() {
        let mut new = sample_new_asset();
        new.name = "   ".to_string();
        assert_eq!(
            new.validate().unwrap_err(),
            ValidationError::MissingField { field: "name" }
        );
    }

    #[test]
    fn negative_price_fails_validation() {
        let mut new = sample_new_asset();
        new.purchase_price = Some(-10.0);
        assert!(matches!(
            new.validate().unwrap_err(),
            ValidationError::NegativeNumber { field: "purchase_price", .. }
        ));
    }

    #[test]
    fn valid_new_asset_passes() {
        assert!(sample_new_asset().validate().is_ok());
    }

    #[test]
    fn from_new_assigns_identity_and_equal_timestamps() {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let asset = Asset::from_new(sample_new_asset(), id, now);
        assert_eq!(asset.id, id);
        assert_eq!(asset.created_at, now);
        assert_eq!(asset.updated_at, now);
    }

    #[test]
    fn update_leaves_unspecified_fields_unchanged() {
        let now = Utc::now();
        let mut asset = Asset::from_new(sample_new_asset(), Uuid::new_v4(), now);
        asset.serial_number = Some("SN-100".to_string());

        let later = now + chrono::Duration::seconds(5);
        let update = AssetUpdate {
            status: Some(AssetStatus::Maintenance),
            ..Default::default()
        };
        update.apply(&mut asset, later);

        assert_eq!(asset.status, AssetStatus::Maintenance);
        assert_eq!(asset.serial_number.as_deref(), Some("SN-100"));
        assert_eq!(asset.name, "Table Saw");
        assert_eq!(asset.updated_at, later);
        assert!(asset.updated_at >= asset.created_at);
    }

    #[test]
    fn update_with_empty_name_fails_validation() {
        let update = AssetUpdate {
            name: Some(String::new()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }
}
