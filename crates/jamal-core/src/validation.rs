//! # Validation Module
//!
//! Input validation for the store management backend.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: REST boundary (apps/server)                                  │
//! │  ├── Type validation (JSON deserialization)                            │
//! │  └── THIS MODULE: field-level rules → 400 with a French message        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Ledger / Recorder (jamal-db)                                 │
//! │  └── THIS MODULE again: the services are reachable as a library and    │
//! │      re-validate defensively                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  ├── UNIQUE constraints (barcode, category name)                       │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::{ValidationResult, MAX_SALE_QUANTITY};

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - Must be at most 200 characters
///
/// ## Example
/// ```rust
/// use jamal_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Marteau arrache-clou").is_ok());
/// assert!(validate_product_name("   ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::required("productName"));
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "productName".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a barcode.
///
/// ## Rules
/// - Must not be empty (callers skip validation entirely for absent
///   barcodes; `None` is always fine)
/// - Must be at most 64 characters
/// - Digits, letters and hyphens only (EAN/UPC and internal codes)
pub fn validate_barcode(barcode: &str) -> ValidationResult<()> {
    let barcode = barcode.trim();

    if barcode.is_empty() {
        return Err(ValidationError::required("barcode"));
    }

    if barcode.len() > 64 {
        return Err(ValidationError::TooLong {
            field: "barcode".to_string(),
            max: 64,
        });
    }

    if !barcode.chars().all(|c| c.is_alphanumeric() || c == '-') {
        return Err(ValidationError::InvalidFormat {
            field: "barcode".to_string(),
            reason: "chiffres, lettres et tirets uniquement".to_string(),
        });
    }

    Ok(())
}

/// Validates a store identifier.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 50 characters
/// - Letters, numbers, hyphens and underscores only
pub fn validate_store_id(id: &str) -> ValidationResult<()> {
    let id = id.trim();

    if id.is_empty() {
        return Err(ValidationError::required("storeId"));
    }

    if id.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "storeId".to_string(),
            max: 50,
        });
    }

    if !id
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "storeId".to_string(),
            reason: "lettres, chiffres, tirets et tirets bas uniquement".to_string(),
        });
    }

    Ok(())
}

/// Validates a category name.
pub fn validate_category_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::required("name"));
    }

    if name.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 100,
        });
    }

    Ok(())
}

/// Validates a settings key.
pub fn validate_setting_key(key: &str) -> ValidationResult<()> {
    let key = key.trim();

    if key.is_empty() {
        return Err(ValidationError::required("key"));
    }

    if key.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "key".to_string(),
            max: 100,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a sale quantity.
///
/// ## Rules
/// - Must be at least 1
/// - Must not exceed MAX_SALE_QUANTITY (9999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 1 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_SALE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_SALE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in centimes.
///
/// ## Rules
/// - Must be non-negative (zero is allowed: giveaways, unpriced items)
///
/// ## Example
/// ```rust
/// use jamal_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents("unitPrice", 4000).is_ok());
/// assert!(validate_price_cents("unitPrice", 0).is_ok());
/// assert!(validate_price_cents("unitPrice", -100).is_err());
/// ```
pub fn validate_price_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a stock level or low-stock threshold.
pub fn validate_stock_level(field: &str, level: i64) -> ValidationResult<()> {
    if level < 0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Marteau").is_ok());
        assert!(validate_product_name("Vis à bois 4x40").is_ok());

        assert!(validate_product_name("").is_err());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_barcode() {
        assert!(validate_barcode("6111024000015").is_ok());
        assert!(validate_barcode("QJ-0042").is_ok());

        assert!(validate_barcode("").is_err());
        assert!(validate_barcode("has space").is_err());
        assert!(validate_barcode(&"9".repeat(80)).is_err());
    }

    #[test]
    fn test_validate_store_id() {
        assert!(validate_store_id("main").is_ok());
        assert!(validate_store_id("depot_2").is_ok());

        assert!(validate_store_id("").is_err());
        assert!(validate_store_id("bad id").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(9999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-2).is_err());
        assert!(validate_quantity(10000).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents("unitPrice", 0).is_ok());
        assert!(validate_price_cents("unitPrice", 4000).is_ok());
        assert!(validate_price_cents("unitPrice", -1).is_err());
    }

    #[test]
    fn test_validate_stock_level() {
        assert!(validate_stock_level("stock", 0).is_ok());
        assert!(validate_stock_level("minStock", 5).is_ok());
        assert!(validate_stock_level("stock", -1).is_err());
    }
}
