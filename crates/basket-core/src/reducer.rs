//! # Cart Reducer
//!
//! Pure state transitions for the cart: `reduce(cart, action) -> cart`.
//!
//! ## Action Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Reducer Transitions                                │
//! │                                                                         │
//! │  UI Action               CartAction              State Change           │
//! │  ─────────               ──────────              ────────────           │
//! │                                                                         │
//! │  Click "Add to cart" ──► Add { snapshot, .. } ─► merge-by-key or push  │
//! │                                                                         │
//! │  Change quantity ──────► SetQuantity { key, q }► line.quantity = q     │
//! │                                                  (clamped to >= 1)     │
//! │                                                                         │
//! │  Click remove ─────────► Remove { key } ───────► drop matching line    │
//! │                                                  (no-op if absent)     │
//! │                                                                         │
//! │  Order placed ─────────► Clear ────────────────► lines = []            │
//! │                                                                         │
//! │  NOTE: The reducer performs no I/O. Persisting the next state is the   │
//! │        façade's job, after the transition succeeds.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Edge-Case Policy
//! Business-rule edge cases never error:
//! - `Remove` of an absent key is a no-op
//! - `SetQuantity` below 1 clamps to 1 (removal is a distinct action),
//!   above the cap clamps to the cap
//! - `Clear` of an empty cart yields an empty cart
//! - re-applying the same `SetQuantity` or `Clear` is idempotent
//!
//! Only structurally invalid input errors: an `Add` whose snapshot has no
//! product id ([`CartError::InvalidLine`]), or one that would breach the
//! cart-size / line-quantity caps.

use serde::{Deserialize, Serialize};

use crate::error::{CartError, CartResult};
use crate::types::{Cart, CartLine, LineKey, ProductSnapshot};
use crate::validation::{validate_discount_bps, validate_price_cents, validate_product_id};
use crate::{MAX_CART_LINES, MAX_LINE_QUANTITY};

// =============================================================================
// Cart Action
// =============================================================================

/// An action the cart can be advanced with.
///
/// Actions are plain data so they can cross an IPC or wire boundary
/// unchanged; the remote cart service mirrors the same four operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CartAction {
    /// Add a product (by catalog snapshot) with variant selectors.
    ///
    /// If a line with the same identity key exists, its quantity is
    /// incremented; otherwise a new line is appended.
    Add {
        snapshot: ProductSnapshot,
        color: Option<String>,
        size: Option<String>,
        quantity: i64,
    },

    /// Delete the matching line. No-op if absent.
    Remove { key: LineKey },

    /// Replace the quantity of the matching line. No-op if absent.
    SetQuantity { key: LineKey, quantity: i64 },

    /// Empty the cart.
    Clear,
}

impl CartAction {
    /// Convenience constructor for [`CartAction::Add`].
    pub fn add(
        snapshot: ProductSnapshot,
        color: Option<String>,
        size: Option<String>,
        quantity: i64,
    ) -> Self {
        CartAction::Add {
            snapshot,
            color,
            size,
            quantity,
        }
    }
}

// =============================================================================
// Reducer
// =============================================================================

/// Computes the next cart state from an action.
///
/// Consumes the previous cart and returns the next one; the caller owns
/// persistence and remote mirroring. Synchronous, side-effect free.
///
/// ## Example
/// ```rust
/// use basket_core::{reduce, Cart, CartAction, LineKey, ProductSnapshot};
///
/// let snapshot = ProductSnapshot {
///     product_id: "p1".into(),
///     name: "Mug".into(),
///     image_url: None,
///     unit_price_cents: 1250,
///     discount_bps: 0,
/// };
///
/// let cart = reduce(Cart::new(), CartAction::add(snapshot.clone(), None, None, 1)).unwrap();
/// let cart = reduce(cart, CartAction::add(snapshot, None, None, 3)).unwrap();
/// assert_eq!(cart.find(&LineKey::new("p1", None, None)).unwrap().quantity, 4);
/// ```
pub fn reduce(cart: Cart, action: CartAction) -> CartResult<Cart> {
    match action {
        CartAction::Add {
            snapshot,
            color,
            size,
            quantity,
        } => add_line(cart, snapshot, color, size, quantity),
        CartAction::Remove { key } => Ok(remove_line(cart, &key)),
        CartAction::SetQuantity { key, quantity } => Ok(set_quantity(cart, &key, quantity)),
        CartAction::Clear => Ok(clear(cart)),
    }
}

/// Adds a product to the cart, merging by identity key.
fn add_line(
    mut cart: Cart,
    snapshot: ProductSnapshot,
    color: Option<String>,
    size: Option<String>,
    quantity: i64,
) -> CartResult<Cart> {
    // Structural validation first: a snapshot without a product id can
    // never be persisted or mirrored remotely.
    validate_product_id(&snapshot.product_id)
        .map_err(|_| CartError::InvalidLine("missing product id".to_string()))?;
    validate_price_cents(snapshot.unit_price_cents)?;
    validate_discount_bps(snapshot.discount_bps)?;

    // A non-positive add quantity is a caller slip, not a removal request.
    let quantity = quantity.max(1);

    let key = LineKey::new(snapshot.product_id.clone(), color.clone(), size.clone());

    if let Some(line) = cart.lines.iter_mut().find(|l| l.matches(&key)) {
        let new_qty = line.quantity + quantity;
        if new_qty > MAX_LINE_QUANTITY {
            return Err(CartError::QuantityTooLarge {
                requested: new_qty,
                max: MAX_LINE_QUANTITY,
            });
        }
        // The original capture wins: price and added_at stay frozen from
        // the first add.
        line.quantity = new_qty;
        return Ok(cart);
    }

    if quantity > MAX_LINE_QUANTITY {
        return Err(CartError::QuantityTooLarge {
            requested: quantity,
            max: MAX_LINE_QUANTITY,
        });
    }

    if cart.lines.len() >= MAX_CART_LINES {
        return Err(CartError::CartFull {
            max: MAX_CART_LINES,
        });
    }

    cart.lines
        .push(CartLine::from_snapshot(snapshot, color, size, quantity));
    Ok(cart)
}

/// Removes the line matching `key`. Absent key is a no-op.
fn remove_line(mut cart: Cart, key: &LineKey) -> Cart {
    cart.lines.retain(|l| !l.matches(key));
    cart
}

/// Replaces the quantity of the line matching `key`, clamped to
/// `[1, MAX_LINE_QUANTITY]`. Absent key is a no-op.
fn set_quantity(mut cart: Cart, key: &LineKey, quantity: i64) -> Cart {
    let quantity = quantity.clamp(1, MAX_LINE_QUANTITY);
    if let Some(line) = cart.lines.iter_mut().find(|l| l.matches(key)) {
        line.quantity = quantity;
    }
    cart
}

/// Empties the cart. `created_at` is preserved so re-clearing is idempotent.
fn clear(mut cart: Cart) -> Cart {
    cart.lines.clear();
    cart
}

// =============================================================================
// Unit Tests
// =============================================================================
