//! # Validation Module
//!
//! Field validation rules shared by the reducer (action input) and the
//! store adapter (screening deserialized lines on load).
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Storefront UI (TypeScript)                                   │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Reducer (Rust)                                               │
//! │  └── THIS MODULE: identity and range validation before any mutation    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Store load (Rust)                                            │
//! │  └── THIS MODULE again: lines failing validation are dropped and       │
//! │      the blob is rewritten (self-healing)                              │
//! │                                                                         │
//! │  Defense in depth: the blob may have been written by an older build    │
//! │  or edited by hand, so load-time screening never trusts it.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::CartLine;
use crate::MAX_LINE_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a product identifier.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - Must be at most 100 characters
///
/// The id is otherwise opaque: the catalog owns its format.
///
/// ## Example
/// ```rust
/// use basket_core::validation::validate_product_id;
///
/// assert!(validate_product_id("p1").is_ok());
/// assert!(validate_product_id("").is_err());
/// assert!(validate_product_id("   ").is_err());
/// ```
pub fn validate_product_id(id: &str) -> ValidationResult<()> {
    let id = id.trim();

    if id.is_empty() {
        return Err(ValidationError::Required {
            field: "productId".to_string(),
        });
    }

    if id.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "productId".to_string(),
            max: 100,
        });
    }

    Ok(())
}

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_LINE_QUANTITY (999)
///
/// Note the reducer clamps `SetQuantity` instead of calling this: a zero
/// or negative requested quantity becomes 1 rather than an error. This
/// validator is for contexts where an out-of-range quantity indicates a
/// broken caller (adds) or a broken blob (store load).
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items)
///
/// ## Example
/// ```rust
/// use basket_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(1099).is_ok());  // $10.99
/// assert!(validate_price_cents(0).is_ok());     // Free item
/// assert!(validate_price_cents(-100).is_err()); // Invalid
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "unitPrice".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a discount in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
pub fn validate_discount_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "discount".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

// =============================================================================
// Line Screening
// =============================================================================

/// Validates a full deserialized line.
///
/// Used by the store adapter on load: any line failing this check is
/// dropped silently and the filtered blob is rewritten.
pub fn validate_line(line: &CartLine) -> ValidationResult<()> {
    validate_product_id(&line.product_id)?;

    if line.name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    validate_price_cents(line.unit_price_cents)?;
    validate_discount_bps(line.discount_bps)?;
    validate_quantity(line.quantity)?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
