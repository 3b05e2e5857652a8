//! # basket-core: Pure Business Logic for the Basket Cart Module
//!
//! This crate is the **heart** of the cart module. It contains all business
//! logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Basket Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     Storefront UI                               │   │
//! │  │    Product page ──► Cart drawer ──► Checkout ──► Confirmation   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              CartFacade (basket-sync)                           │   │
//! │  │    add_item, set_quantity, remove_item, totals, checkout        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ basket-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐   │   │
//! │  │   │   types   │  │   money   │  │  reducer  │  │  totals   │   │   │
//! │  │   │ CartLine  │  │   Money   │  │CartAction │  │ Pricing   │   │   │
//! │  │   │  LineKey  │  │  TaxRate  │  │  reduce   │  │  Rules    │   │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO NETWORK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                basket-store (Persistence Layer)                 │   │
//! │  │          versioned cart blob over a key-value backend           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Cart, CartLine, LineKey, ProductSnapshot)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`reducer`] - Pure cart state transitions (add/remove/set-quantity/clear)
//! - [`totals`] - Derived totals (subtotal, shipping, tax, grand total)
//! - [`error`] - Domain error types
//! - [`validation`] - Line and field validation rules
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: every transition is `reduce(cart, action) -> cart`
//! 2. **No I/O**: storage, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: all monetary values are in cents (i64) to avoid
//!    float errors; totals accumulate at 1/10000-cent precision and round
//!    exactly once per displayed figure
//! 4. **Explicit Errors**: structurally invalid input is a typed error;
//!    business-rule edge cases clamp or no-op instead of throwing
//!
//! ## Example Usage
//!
//! ```rust
//! use basket_core::{reduce, Cart, CartAction, ProductSnapshot};
//! use basket_core::totals::{compute_totals, PricingRules};
//!
//! let snapshot = ProductSnapshot {
//!     product_id: "p1".into(),
//!     name: "Linen Shirt".into(),
//!     image_url: None,
//!     unit_price_cents: 10_000, // $100.00
//!     discount_bps: 1_000,      // 10% off
//! };
//!
//! let cart = reduce(Cart::new(), CartAction::add(snapshot, None, None, 2)).unwrap();
//! let totals = compute_totals(&cart, &PricingRules::default());
//! assert_eq!(totals.subtotal.cents(), 18_000); // $180.00
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod reducer;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use basket_core::Money` instead of
// `use basket_core::money::Money`

pub use error::{CartError, CartResult, ValidationError};
pub use money::{Money, TaxRate};
pub use reducer::{reduce, CartAction};
pub use totals::{compute_totals, PricingRules, Totals};
pub use types::{Cart, CartLine, LineKey, ProductSnapshot};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum unique lines allowed in a single cart.
///
/// ## Business Reason
/// Prevents runaway carts and keeps the persisted blob bounded.
/// Can be made configurable per-storefront in future versions.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single line in the cart.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
/// Also bounds the quantity sum produced by the guest/auth cart merge.
pub const MAX_LINE_QUANTITY: i64 = 999;
