//! # Error Types
//!
//! Domain-specific error types for vend-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  vend-core errors (this file)                                          │
//! │  ├── CoreError        - Cart and domain rule violations                │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  vend-db errors       - DbError (database operation failures)          │
//! │  vend-cloud errors    - CloudError (HTTP/auth failures)                │
//! │  terminal errors      - AppError (what the user sees)                  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → AppError → user message           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (barcode, name, index)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These represent business rule violations. They are caught at the
/// application boundary and shown to the operator as-is.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found locally.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// A zero-priced product was scanned into the cart.
    ///
    /// ## When This Occurs
    /// Products pulled from the cloud catalog are stored with price 0 until
    /// the operator fills one in. The cart refuses them until that happens,
    /// so an invoice can never silently contain a free line.
    #[error("Price required for '{name}' before it can be sold")]
    PriceRequired { name: String },

    /// The cart is empty and the operation needs at least one line.
    #[error("Cart is empty")]
    EmptyCart,

    /// A cart edit referenced a line index that does not exist.
    #[error("No cart line at position {index}")]
    LineOutOfRange { index: usize },

    /// Cart has exceeded maximum allowed lines.
    #[error("Cart cannot have more than {max} lines")]
    CartTooLarge { max: usize },

    /// Line quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when user input doesn't meet requirements. Used for early
/// validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} cannot be negative")]
    Negative { field: String },

    /// Text input that should have been a number.
    #[error("{field} is not a valid number: '{value}'")]
    NotANumber { field: String, value: String },

    /// Invalid format (e.g., bad barcode).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::PriceRequired {
            name: "Mineral water 0.5l".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Price required for 'Mineral water 0.5l' before it can be sold"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "barcode".to_string(),
        };
        assert_eq!(err.to_string(), "barcode is required");

        let err = ValidationError::NotANumber {
            field: "price".to_string(),
            value: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "price is not a valid number: 'abc'");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
