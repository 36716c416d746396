//! # Validation Module
//!
//! Input validation for operator-entered values.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: THIS MODULE - field-level rules on raw input                 │
//! │  Layer 2: Cart / session - business rules (price guard, bounds)        │
//! │  Layer 3: Database - NOT NULL, UNIQUE, foreign keys                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a barcode.
///
/// ## Rules
/// - Digits only
/// - Standard lengths pass outright: EAN-8 (8), UPC-A (12), EAN-13 (13)
/// - Other lengths are accepted from 4 digits up, for in-store codes
///   printed by label scales
pub fn validate_barcode(barcode: &str) -> ValidationResult<()> {
    let barcode = barcode.trim();

    if barcode.is_empty() {
        return Err(ValidationError::Required {
            field: "barcode".to_string(),
        });
    }

    if !barcode.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "barcode".to_string(),
            reason: "must contain only digits".to_string(),
        });
    }

    if !matches!(barcode.len(), 8 | 12 | 13) && barcode.len() < 4 {
        return Err(ValidationError::InvalidFormat {
            field: "barcode".to_string(),
            reason: "must be at least 4 digits".to_string(),
        });
    }

    Ok(())
}

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Input Parsing
// =============================================================================

/// Parses an operator-typed stock quantity.
///
/// Empty input means zero (an untouched form field); anything else must be
/// a non-negative whole number.
pub fn parse_quantity(input: &str) -> ValidationResult<i64> {
    let input = input.trim();

    if input.is_empty() {
        return Ok(0);
    }

    let qty: i64 = input
        .parse()
        .map_err(|_| ValidationError::NotANumber {
            field: "quantity".to_string(),
            value: input.to_string(),
        })?;

    if qty < 0 {
        return Err(ValidationError::Negative {
            field: "quantity".to_string(),
        });
    }

    Ok(qty)
}

/// Validates a stock quantity value.
pub fn validate_stock_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::Negative {
            field: "quantity".to_string(),
        });
    }
    Ok(())
}

/// Validates a price in cents. Zero is allowed: it marks "price not set".
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
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
    fn test_validate_barcode_standard_lengths() {
        assert!(validate_barcode("48700010").is_ok()); // EAN-8
        assert!(validate_barcode("487000100001").is_ok()); // UPC-A
        assert!(validate_barcode("4870001000013").is_ok()); // EAN-13
    }

    #[test]
    fn test_validate_barcode_free_form() {
        assert!(validate_barcode("2100").is_ok()); // store code
        assert!(validate_barcode("123").is_err()); // too short
        assert!(validate_barcode("").is_err());
        assert!(validate_barcode("12ab5678").is_err());
        assert!(validate_barcode(" 4870001000013 ").is_ok()); // trimmed
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Mineral water 0.5l").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("12").unwrap(), 12);
        assert_eq!(parse_quantity("").unwrap(), 0);
        assert_eq!(parse_quantity(" 3 ").unwrap(), 3);

        assert!(parse_quantity("-1").is_err());
        assert!(parse_quantity("1.5").is_err());
        assert!(parse_quantity("abc").is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(1099).is_ok());
        assert!(validate_price_cents(-100).is_err());
    }
}
