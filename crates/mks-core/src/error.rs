//! # Validation Error Hierarchy
//!
//! Structured field-validation errors shared by the form-coercion layer and
//! the record-level `validate()` methods. Each variant names the offending
//! field so the API layer can surface a precise message without string
//! matching.

use thiserror::Error;

/// A field-level validation failure.
///
/// Produced before any write happens: a submission that fails validation
/// never reaches the stores.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field was absent or empty after trimming.
    #[error("{field} is required and must not be empty")]
    MissingField { field: &'static str },

    /// An enum-typed field carried a value outside its fixed set.
    #[error("invalid {field} value `{value}`, expected one of: {}", .allowed.join(", "))]
    InvalidEnumValue {
        field: &'static str,
        value: String,
        allowed: &'static [&'static str],
    },

    /// A date field could not be parsed as an ISO calendar date.
    #[error("invalid {field} value `{value}`, expected an ISO date (YYYY-MM-DD)")]
    InvalidDate { field: &'static str, value: String },

    /// A numeric field could not be parsed.
    #[error("invalid {field} value `{value}`, expected a number")]
    InvalidNumber { field: &'static str, value: String },

    /// A numeric field that must be non-negative carried a negative value.
    #[error("{field} must not be negative (got {value})")]
    NegativeNumber { field: &'static str, value: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_enum_message_lists_allowed_values() {
        let err = ValidationError::InvalidEnumValue {
            field: "category",
            value: "spaceship".to_string(),
            allowed: &["hand_tool", "power_tool"],
        };
        let msg = err.to_string();
        assert!(msg.contains("spaceship"));
        assert!(msg.contains("hand_tool, power_tool"));
    }

    #[test]
    fn missing_field_names_the_field() {
        let err = ValidationError::MissingField { field: "name" };
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn negative_number_carries_value() {
        let err = ValidationError::NegativeNumber {
            field: "purchase_price",
            value: -4.5,
        };
        assert!(err.to_string().contains("-4.5"));
    }
}
