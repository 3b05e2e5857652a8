//! # Error Types
//!
//! Domain-specific error types for basket-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  basket-core errors (this file)                                         │
//! │  ├── CartError        - Reducer rejections (invalid line, caps)         │
//! │  └── ValidationError  - Field-level validation failures                 │
//! │                                                                         │
//! │  basket-store errors (separate crate)                                   │
//! │  └── StoreError       - Backend read/write failures                     │
//! │                                                                         │
//! │  basket-sync errors (separate crate)                                    │
//! │  └── SyncError        - Remote/catalog/order failures, stale responses  │
//! │                                                                         │
//! │  Flow: ValidationError → CartError → SyncError → UI message             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product id, limits)
//! 3. Errors are enum variants, never String
//! 4. Business-rule edge cases (absent key, zero quantity) clamp or no-op
//!    in the reducer instead of surfacing here

use thiserror::Error;

// =============================================================================
// Cart Error
// =============================================================================

/// Cart business logic errors.
///
/// These are the only conditions under which the reducer refuses an action.
/// Everything else (removing an absent line, re-clearing an empty cart,
/// setting a quantity below 1) is a clamp or a no-op by design.
#[derive(Debug, Error)]
pub enum CartError {
    /// The action carried a structurally invalid line.
    ///
    /// ## When This Occurs
    /// - `Add` with an empty `product_id`
    /// - a deserialized action assembled without its identity fields
    ///
    /// Invalid lines are rejected before they can reach the persistent
    /// store; nothing about the cart changes.
    #[error("Invalid cart line: {0}")]
    InvalidLine(String),

    /// Cart has reached the maximum number of unique lines.
    #[error("Cart cannot have more than {max} lines")]
    CartFull { max: usize },

    /// Line quantity would exceed the maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Field-level validation errors.
///
/// Used both by the reducer (action input) and by the store adapter when
/// screening deserialized lines on load.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CartError.
pub type CartResult<T> = Result<T, CartError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CartError::QuantityTooLarge {
            requested: 1500,
            max: 999,
        };
        assert_eq!(
            err.to_string(),
            "Quantity 1500 exceeds maximum allowed (999)"
        );

        let err = CartError::InvalidLine("missing product id".to_string());
        assert_eq!(err.to_string(), "Invalid cart line: missing product id");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "productId".to_string(),
        };
        assert_eq!(err.to_string(), "productId is required");
    }

    #[test]
    fn test_validation_converts_to_cart_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        let cart_err: CartError = validation_err.into();
        assert!(matches!(cart_err, CartError::Validation(_)));
    }
}
