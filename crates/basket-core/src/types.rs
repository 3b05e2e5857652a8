//! # Domain Types
//!
//! Core domain types for the cart module.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    CartLine     │   │     LineKey     │   │ ProductSnapshot │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  product_id     │   │  product_id     │   │  product_id     │       │
//! │  │  name, image    │   │  color          │   │  name, image    │       │
//! │  │  unit_price     │   │  size           │   │  unit_price     │       │
//! │  │  discount_bps   │   └─────────────────┘   │  discount_bps   │       │
//! │  │  color, size    │                         └─────────────────┘       │
//! │  │  quantity       │   ┌─────────────────┐                             │
//! │  │  added_at       │   │      Cart       │                             │
//! │  └─────────────────┘   │  lines: Vec<_>  │                             │
//! │                        │  created_at     │                             │
//! │                        └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity Invariant
//! Two lines are the **same line** iff their `(product_id, color, size)`
//! tuples are equal. Adding a product already present with the same variant
//! selectors increments its quantity; a different variant selector creates
//! a new line.
//!
//! ## Snapshot Pattern
//! `name`, `image_url`, `unit_price_cents` and `discount_bps` are frozen
//! copies of catalog data captured at add time. The catalog stays the
//! source of truth; the cart never re-fetches a live price.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Line Key
// =============================================================================

/// The identity key of a cart line: `(product_id, color, size)`.
///
/// `None` for a selector means "this axis does not apply to the product",
/// and is a distinct identity from any concrete selector value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineKey {
    /// Opaque catalog identifier.
    pub product_id: String,

    /// Selected color variant, if the product has a color axis.
    pub color: Option<String>,

    /// Selected size variant, if the product has a size axis.
    pub size: Option<String>,
}

impl LineKey {
    /// Creates a key from its parts.
    pub fn new(
        product_id: impl Into<String>,
        color: Option<String>,
        size: Option<String>,
    ) -> Self {
        LineKey {
            product_id: product_id.into(),
            color,
            size,
        }
    }
}

// =============================================================================
// Product Snapshot
// =============================================================================

/// Catalog data captured at add time.
///
/// The catalog service is consulted exactly once, when the product is added;
/// the snapshot is what gets frozen onto the resulting [`CartLine`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    /// Opaque catalog identifier.
    pub product_id: String,

    /// Display name at capture time.
    pub name: String,

    /// Display image at capture time.
    pub image_url: Option<String>,

    /// Price in cents at capture time.
    pub unit_price_cents: i64,

    /// Per-line discount in basis points (0 = none, 10000 = 100%).
    pub discount_bps: u32,
}

// =============================================================================
// Cart Line
// =============================================================================

/// One purchasable configuration of a product in the cart.
///
/// ## Design Notes
/// - `product_id` + variant selectors form the identity key
/// - price and display fields are frozen at add time (snapshot pattern):
///   the cart displays consistent data even if the catalog entry changes
///   after the product was added
/// - `added_at` drives freshness when a guest cart is merged with a
///   remote cart at login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Product ID (opaque, stable foreign key to the catalog).
    pub product_id: String,

    /// Product name at time of adding (frozen, display cache).
    pub name: String,

    /// Product image at time of adding (frozen, display cache).
    pub image_url: Option<String>,

    /// Price in cents at time of adding (frozen).
    /// This is critical: we lock in the price when added to cart.
    pub unit_price_cents: i64,

    /// Per-line discount in basis points at time of adding (frozen).
    pub discount_bps: u32,

    /// Selected color variant (`None` = not applicable).
    pub color: Option<String>,

    /// Selected size variant (`None` = not applicable).
    pub size: Option<String>,

    /// Quantity in cart, always >= 1.
    pub quantity: i64,

    /// When this line was added (or last captured from the catalog).
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    /// Creates a new cart line from a catalog snapshot and variant selectors.
    ///
    /// ## Price Freezing
    /// The price is captured at this moment. If the catalog price changes
    /// afterwards, this line retains the original price.
    pub fn from_snapshot(
        snapshot: ProductSnapshot,
        color: Option<String>,
        size: Option<String>,
        quantity: i64,
    ) -> Self {
        CartLine {
            product_id: snapshot.product_id,
            name: snapshot.name,
            image_url: snapshot.image_url,
            unit_price_cents: snapshot.unit_price_cents,
            discount_bps: snapshot.discount_bps,
            color,
            size,
            quantity,
            added_at: Utc::now(),
        }
    }

    /// Returns the identity key of this line.
    pub fn key(&self) -> LineKey {
        LineKey {
            product_id: self.product_id.clone(),
            color: self.color.clone(),
            size: self.size.clone(),
        }
    }

    /// Checks whether this line matches an identity key without cloning.
    pub fn matches(&self, key: &LineKey) -> bool {
        self.product_id == key.product_id && self.color == key.color && self.size == key.size
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart: an ordered sequence of lines, unique by identity key.
///
/// ## Invariants
/// - Lines are unique by `(product_id, color, size)`; adding an existing
///   key increases its quantity
/// - Quantity is always >= 1 (removal is an explicit, distinct action)
/// - Insertion order is preserved for display; it is irrelevant to totals
/// - Maximum lines: [`crate::MAX_CART_LINES`]
/// - Maximum quantity per line: [`crate::MAX_LINE_QUANTITY`]
///
/// ## Lifecycle
/// Created empty on first app load (or restored from the persistent store),
/// mutated only through reducer actions, cleared on successful order
/// placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Lines in the cart, in insertion order.
    pub lines: Vec<CartLine>,

    /// When the cart was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart {
            lines: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns the number of unique lines in the cart.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns the total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Finds a line by identity key.
    pub fn find(&self, key: &LineKey) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.matches(key))
    }

    /// Checks whether a line with the given key exists.
    pub fn contains(&self, key: &LineKey) -> bool {
        self.find(key).is_some()
    }
}

impl Default for Cart {
    fn default() -> Self {
        Cart::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
