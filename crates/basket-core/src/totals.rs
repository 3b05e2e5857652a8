//! # Totals Calculator
//!
//! Derives the displayed money figures from cart contents and pricing rules.
//!
//! ## Derivation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Totals Derivation                                    │
//! │                                                                         │
//! │  Cart lines                       PricingRules                          │
//! │  ──────────                       ────────────                          │
//! │  unit_price × (1 − disc) × qty    tax_rate (bps)                        │
//! │        │                          flat_shipping                         │
//! │        ▼                          free_shipping_threshold               │
//! │  Σ at 1/10000-cent precision            │                               │
//! │        │                                │                               │
//! │        ├──► subtotal (rounded once) ◄───┘                               │
//! │        │                                                                │
//! │        ├──► shipping: 0 if exact subtotal ≥ threshold, else flat        │
//! │        │                                                                │
//! │        ├──► tax: exact subtotal × rate, rounded once                    │
//! │        │                                                                │
//! │        └──► total = subtotal + shipping + tax (of rounded figures)      │
//! │                                                                         │
//! │  Totals are recomputed on every read and never persisted: a stored     │
//! │  total could go stale against its own lines.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rounding Policy
//! Per-line rounding before summation drifts: three lines worth 0.5¢ each
//! must contribute 1.5¢ → 2¢, not 1¢ + 1¢ + 1¢ = 3¢. Line values therefore
//! accumulate exactly (i128, scaled by 10000), and each displayed figure is
//! rounded half-up exactly once. The grand total is defined over the
//! rounded subtotal and tax so the displayed lines always add up.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{Money, TaxRate};
use crate::types::Cart;

// =============================================================================
// Scaled Arithmetic
// =============================================================================

/// Basis-point scale: line values are held in units of 1/10000 cent.
const BPS_SCALE: i128 = 10_000;

/// Rounds a bps-scaled value (1/10000 cent) half-up to whole cents.
///
/// All inputs are non-negative (prices >= 0, discounts <= 100%), so plain
/// truncating division after the half-step offset is exact half-up.
fn round_scaled(scaled: i128) -> Money {
    Money::from_cents(((scaled + BPS_SCALE / 2) / BPS_SCALE) as i64)
}

/// Exact value of one line in 1/10000 cents:
/// `unit_price × (10000 − discount_bps) × quantity`.
fn line_value_scaled(unit_price_cents: i64, discount_bps: u32, quantity: i64) -> i128 {
    unit_price_cents as i128 * (BPS_SCALE - discount_bps as i128) * quantity as i128
}

// =============================================================================
// Pricing Rules
// =============================================================================

/// Business rules the totals are derived under.
///
/// Owned by configuration, passed in by the caller: the calculator itself
/// has no defaults baked in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricingRules {
    /// Tax rate applied to the subtotal.
    pub tax_rate: TaxRate,

    /// Flat shipping fee below the free-shipping threshold.
    pub flat_shipping: Money,

    /// Subtotal at or above which shipping is waived.
    pub free_shipping_threshold: Money,
}

impl Default for PricingRules {
    /// Storefront defaults: 8% tax, $15.00 flat shipping, free above $600.
    fn default() -> Self {
        PricingRules {
            tax_rate: TaxRate::from_bps(800),
            flat_shipping: Money::from_cents(1500),
            free_shipping_threshold: Money::from_cents(60_000),
        }
    }
}

// =============================================================================
// Totals
// =============================================================================

/// The four displayed money figures, derived and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    /// Sum of discounted line values.
    pub subtotal: Money,

    /// Flat fee, or zero at/above the free-shipping threshold.
    pub shipping: Money,

    /// Tax on the subtotal.
    pub tax: Money,

    /// Grand total: subtotal + shipping + tax.
    pub total: Money,
}

impl Totals {
    /// All-zero totals (empty cart).
    pub const fn zero() -> Self {
        Totals {
            subtotal: Money::zero(),
            shipping: Money::zero(),
            tax: Money::zero(),
            total: Money::zero(),
        }
    }
}

// =============================================================================
// Calculator
// =============================================================================

/// Derives [`Totals`] from cart contents and pricing rules.
///
/// ## Edge Case
/// An empty cart yields all-zero totals. In particular shipping is zero
/// regardless of how a zero subtotal compares to the threshold: an empty
/// cart never incurs shipping.
///
/// ## Example
/// ```rust
/// use basket_core::{compute_totals, reduce, Cart, CartAction, ProductSnapshot};
/// use basket_core::totals::PricingRules;
///
/// let snapshot = ProductSnapshot {
///     product_id: "p1".into(),
///     name: "Jacket".into(),
///     image_url: None,
///     unit_price_cents: 10_000, // $100.00
///     discount_bps: 1_000,      // 10% off
/// };
/// let cart = reduce(Cart::new(), CartAction::add(snapshot, None, None, 2)).unwrap();
///
/// let totals = compute_totals(&cart, &PricingRules::default());
/// assert_eq!(totals.subtotal.cents(), 18_000); // $180.00
/// assert_eq!(totals.shipping.cents(), 1_500);  // below $600 threshold
/// assert_eq!(totals.tax.cents(), 1_440);       // 8% of $180.00
/// assert_eq!(totals.total.cents(), 20_940);    // $209.40
/// ```
pub fn compute_totals(cart: &Cart, rules: &PricingRules) -> Totals {
    if cart.is_empty() {
        return Totals::zero();
    }

    let subtotal_scaled: i128 = cart
        .lines
        .iter()
        .map(|l| line_value_scaled(l.unit_price_cents, l.discount_bps, l.quantity))
        .sum();

    let subtotal = round_scaled(subtotal_scaled);

    // Threshold comparison on the exact value: a subtotal of exactly the
    // threshold ships free, one 1/10000 cent below it does not.
    let threshold_scaled = rules.free_shipping_threshold.cents() as i128 * BPS_SCALE;
    let shipping = if subtotal_scaled >= threshold_scaled {
        Money::zero()
    } else {
        rules.flat_shipping
    };

    // Tax from the exact subtotal, scaled by 10000 × 10000, rounded once.
    let tax_scaled = subtotal_scaled * rules.tax_rate.bps() as i128;
    let tax = Money::from_cents(((tax_scaled + (BPS_SCALE * BPS_SCALE) / 2)
        / (BPS_SCALE * BPS_SCALE)) as i64);

    Totals {
        subtotal,
        shipping,
        tax,
        total: subtotal + shipping + tax,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
