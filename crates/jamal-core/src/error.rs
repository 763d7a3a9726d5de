//! # Error Types
//!
//! Validation error types for jamal-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  jamal-core errors (this file)                                         │
//! │  └── ValidationError  - Input validation failures (French messages)    │
//! │                                                                         │
//! │  jamal-db errors (separate crate)                                      │
//! │  └── DbError          - Database failures + defensive re-validation    │
//! │                                                                         │
//! │  REST API errors (apps/server)                                         │
//! │  └── ApiError         - What the client sees (HTTP status + message)   │
//! │                                                                         │
//! │  Flow: ValidationError → DbError → ApiError → Client                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Errors are enum variants, never bare strings
//! 3. Messages are French: they surface directly in the dashboard

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when input doesn't meet business requirements. Validation
/// runs at the API boundary AND again inside the ledger/recorder, which
/// are also reachable as a library.
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} est requis")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} ne doit pas dépasser {max} caractères")]
    TooLong { field: String, max: usize },

    /// Value must be at least 1 (quantities).
    #[error("{field} doit être supérieur ou égal à 1")]
    MustBePositive { field: String },

    /// Value may not be negative (prices, stock levels).
    #[error("{field} ne peut pas être négatif")]
    Negative { field: String },

    /// Numeric value is out of range.
    #[error("{field} doit être compris entre {min} et {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g. bad characters in an identifier).
    #[error("{field} est invalide : {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates a Required error for the given field.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_are_french() {
        let err = ValidationError::required("productName");
        assert_eq!(err.to_string(), "productName est requis");

        let err = ValidationError::Negative {
            field: "unitPrice".to_string(),
        };
        assert_eq!(err.to_string(), "unitPrice ne peut pas être négatif");

        let err = ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: 9999,
        };
        assert_eq!(
            err.to_string(),
            "quantity doit être compris entre 1 et 9999"
        );
    }
}
