//! # Inventory Domain Model
//!
//! Consumables and repair parts tracked by quantity. Same closed-enum
//! discipline as the asset model; quantity fields are decimals because
//! consumables are measured in fractional units (kg of filament, meters
//! of vinyl).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ValidationError;

/// Fixed inventory categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum InventoryCategory {
    Consumable,
    RepairPart,
}

impl InventoryCategory {
    pub const ALLOWED: &'static [&'static str] = &["consumable", "repair_part"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Consumable => "consumable",
            Self::RepairPart => "repair_part",
        }
    }

    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value {
            "consumable" => Ok(Self::Consumable),
            "repair_part" => Ok(Self::RepairPart),
            other => Err(ValidationError::InvalidEnumValue {
                field: "category",
                value: other.to_string(),
                allowed: Self::ALLOWED,
            }),
        }
    }
}

/// Consumable sub-types (only meaningful for `InventoryCategory::Consumable`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ConsumableType {
    Filament,
    Vinyl,
    Sublimation,
    Other,
}

impl ConsumableType {
    pub const ALLOWED: &'static [&'static str] = &["filament", "vinyl", "sublimation", "other"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Filament => "filament",
            Self::Vinyl => "vinyl",
            Self::Sublimation => "sublimation",
            Self::Other => "other",
        }
    }

    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value {
            "filament" => Ok(Self::Filament),
            "vinyl" => Ok(Self::Vinyl),
            "sublimation" => Ok(Self::Sublimation),
            "other" => Ok(Self::Other),
            other => Err(ValidationError::InvalidEnumValue {
                field: "consumable_type",
                value: other.to_string(),
                allowed: Self::ALLOWED,
            }),
        }
    }
}

/// Fixed inventory stock statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum InventoryStatus {
    InStock,
    LowStock,
    OutOfStock,
    Discontinued,
}

impl InventoryStatus {
    pub const ALLOWED: &'static [&'static str] =
        &["in_stock", "low_stock", "out_of_stock", "discontinued"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InStock => "in_stock",
            Self::LowStock => "low_stock",
            Self::OutOfStock => "out_of_stock",
            Self::Discontinued => "discontinued",
        }
    }

    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value {
            "in_stock" => Ok(Self::InStock),
            "low_stock" => Ok(Self::LowStock),
            "out_of_stock" => Ok(Self::OutOfStock),
            "discontinued" => Ok(Self::Discontinued),
            other => Err(ValidationError::InvalidEnumValue {
                field: "status",
                value: other.to_string(),
                allowed: Self::ALLOWED,
            }),
        }
    }
}

/// An inventory item record.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InventoryItem {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: InventoryCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumable_type: Option<ConsumableType>,
    pub status: InventoryStatus,
    pub quantity: f64,
    pub unit: String,
    pub min_quantity: f64,
    pub location: Option<String>,
    pub supplier: Option<String>,
    pub supplier_part_number: Option<String>,
    pub last_ordered: Option<NaiveDate>,
    pub last_restocked: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InventoryItem {
    /// Materialize a validated form into a record with server-assigned
    /// identity and timestamps.
    pub fn from_new(
        new: NewInventoryItem,
        id: Uuid,
        created_by: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: new.name,
            description: new.description,
            category: new.category,
            consumable_type: new.consumable_type,
            status: new.status,
            quantity: new.quantity,
            unit: new.unit,
            min_quantity: new.min_quantity,
            location: new.location,
            supplier: new.supplier,
            supplier_part_number: new.supplier_part_number,
            last_ordered: new.last_ordered,
            last_restocked: new.last_restocked,
            notes: new.notes,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A new inventory item as submitted by a form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct NewInventoryItem {
    pub name: String,
    pub description: Option<String>,
    pub category: InventoryCategory,
    pub consumable_type: Option<ConsumableType>,
    pub status: InventoryStatus,
    #[serde(default)]
    pub quantity: f64,
    pub unit: String,
    #[serde(default)]
    pub min_quantity: f64,
    pub location: Option<String>,
    pub supplier: Option<String>,
    pub supplier_part_number: Option<String>,
    pub last_ordered: Option<NaiveDate>,
    pub last_restocked: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl NewInventoryItem {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "name" });
        }
        if self.unit.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "unit" });
        }
        if self.quantity < 0.0 || !self.quantity.is_finite() {
            return Err(ValidationError::NegativeNumber {
                field: "quantity",
                value: self.quantity,
            });
        }
        if self.min_quantity < 0.0 || !self.min_quantity.is_finite() {
            return Err(ValidationError::NegativeNumber {
                field: "min_quantity",
                value: self.min_quantity,
            });
        }
        Ok(())
    }
}

/// Partial update for an inventory item. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct InventoryItemUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<InventoryCategory>,
    pub consumable_type: Option<ConsumableType>,
    pub status: Option<InventoryStatus>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub min_quantity: Option<f64>,
    pub location: Option<String>,
    pub supplier: Option<String>,
    pub supplier_part_number: Option<String>,
    pub last_ordered: Option<NaiveDate>,
    pub last_restocked: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl InventoryItemUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(ValidationError::MissingField { field: "name" });
            }
        }
        if let Some(unit) = &self.unit {
            if unit.trim().is_empty() {
                return Err(ValidationError::MissingField { field: "unit" });
            }
        }
        if let Some(quantity) = self.quantity {
            if quantity < 0.0 || !quantity.is_finite() {
                return Err(ValidationError::NegativeNumber {
                    field: "quantity",
                    value: quantity,
                });
            }
        }
        if let Some(min_quantity) = self.min_quantity {
            if min_quantity < 0.0 || !min_quantity.is_finite() {
                return Err(ValidationError::NegativeNumber {
                    field: "min_quantity",
                    value: min_quantity,
                });
            }
        }
        Ok(())
    }

    /// Apply the update in place, bumping `updated_at`.
    pub fn apply(self, item: &mut InventoryItem, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            item.name = name;
        }
        if let Some(description) = self.description {
            item.description = Some(description);
        }
        if let Some(category) = self.category {
            item.category = category;
        }
        if let Some(consumable_type) = self.consumable_type {
            item.consumable_type = Some(consumable_type);
        }
        if let Some(status) = self.status {
            item.status = status;
        }
        if let Some(quantity) = self.quantity {
            item.quantity = quantity;
        }
        if let Some(unit) = self.unit {
            item.unit = unit;
        }
        if let Some(min_quantity) = self.min_quantity {
            item.min_quantity = min_quantity;
        }
        if let Some(location) = self.location {
            item.location = Some(location);
        }
        if let Some(supplier) = self.supplier {
            item.supplier = Some(supplier);
        }
        if let Some(part) = self.supplier_part_number {
            item.supplier_part_number = Some(part);
        }
        if let Some(date) = self.last_ordered {
            item.last_ordered = Some(date);
        }
        if let Some(date) = self.last_restocked {
            item.last_restocked = Some(date);
        }
        if let Some(notes) = self.notes {
            item.notes = Some(notes);
        }
        item.updated_at = now;
    }
}

impl Default for InventoryCategory {
    fn default() -> Self {
        Self::Consumable
    }
}

impl Default for InventoryStatus {
    fn default() -> Self {
        Self::InStock
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_new_item() -> NewInventoryItem {
        NewInventoryItem {
            name: "PLA Filament".to_string(),
            category: InventoryCategory::Consumable,
            consumable_type: Some(ConsumableType::Filament),
            status: InventoryStatus::InStock,
            quantity: 12.5,
            unit: "kg".to_string(),
            min_quantity: 2.0,
            ..Default::default()
        }
    }

    #[test]
    fn inventory_enums_round_trip() {
        for value in InventoryCategory::ALLOWED {
            assert_eq!(InventoryCategory::parse(value).unwrap().as_str(), *value);
        }
        for value in ConsumableType::ALLOWED {
            assert_eq!(ConsumableType::parse(value).unwrap().as_str(), *value);
        }
        for value in InventoryStatus::ALLOWED {
            assert_eq!(InventoryStatus::parse(value).unwrap().as_str(), *value);
        }
    }

    #[test]
    fn unknown_category_is_rejected() {
        assert!(matches!(
            InventoryCategory::parse("furniture").unwrap_err(),
            ValidationError::InvalidEnumValue { field: "category", .. }
        ));
    }

    #[test]
    fn missing_unit_fails_validation() {
        let mut new = sample_new_item();
        new.unit = String::new();
        assert_eq!(
            new.validate().unwrap_err(),
            ValidationError::MissingField { field: "unit" }
        );
    }

    #[test]
    fn negative_quantity_fails_validation() {
        let mut new = sample_new_item();
        new.quantity = -1.0;
        assert!(matches!(
            new.validate().unwrap_err(),
            ValidationError::NegativeNumber { field: "quantity", .. }
        ));
    }

    #[test]
    fn valid_item_passes_and_materializes() {
        let new = sample_new_item();
        assert!(new.validate().is_ok());
        let now = Utc::now();
        let item = InventoryItem::from_new(new, Uuid::new_v4(), None, now);
        assert_eq!(item.quantity, 12.5);
        assert_eq!(item.created_at, item.updated_at);
    }

    #[test]
    fn partial_update_preserves_quantity() {
        let now = Utc::now();
        let mut item = InventoryItem::from_new(sample_new_item(), Uuid::new_v4(), None, now);
        let update = InventoryItemUpdate {
            status: Some(InventoryStatus::LowStock),
            ..Default::default()
        };
        update.apply(&mut item, now + chrono::Duration::seconds(1));
        assert_eq!(item.status, InventoryStatus::LowStock);
        assert_eq!(item.quantity, 12.5);
        assert_eq!(item.unit, "kg");
    }
}
