//! # Remote Service Seams
//!
//! The three collaborators the façade is constructed with. All are
//! external systems, out of scope here; the traits pin down exactly what
//! the cart module consumes so embedders (and tests) can supply
//! implementations.
//!
//! ## Collaborators
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Catalog ──────── consulted ONCE per add, to capture the price/name/    │
//! │                   image snapshot; never polled afterwards               │
//! │                                                                         │
//! │  RemoteCart ───── the authenticated server-side cart; mirrors the       │
//! │                   same four reducer operations plus fetch               │
//! │                                                                         │
//! │  OrderGateway ─── consumes the final Cart + Totals snapshot at          │
//! │                   checkout; success clears the cart                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Request timeouts are deliberately NOT handled at this layer; the
//! transport behind each implementation owns them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use basket_core::money::Money;
use basket_core::totals::Totals;
use basket_core::types::{Cart, CartLine, LineKey, ProductSnapshot};

// =============================================================================
// Catalog
// =============================================================================

/// Catalog lookup failures.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No product with the given id.
    #[error("Product not found: {0}")]
    NotFound(String),

    /// The catalog service could not be reached.
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}

/// Product catalog client.
///
/// Used only at add time to capture the price/name/image snapshot that
/// gets frozen onto the cart line.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Fetches the current snapshot for a product.
    async fn product(&self, product_id: &str) -> Result<ProductSnapshot, CatalogError>;
}

// =============================================================================
// Remote Cart
// =============================================================================

/// Remote cart failures. All of these are transient from the façade's
/// point of view: local state stays authoritative and the operation can
/// be retried.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The service could not be reached or the call failed in transit.
    #[error("Remote cart unavailable: {0}")]
    Unavailable(String),

    /// The service answered but refused the operation.
    #[error("Remote cart rejected the request: {0}")]
    Rejected(String),
}

/// Result type alias for remote cart operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// The authenticated server-side cart.
///
/// Mirrors the local reducer's operations one-for-one; the server applies
/// the same merge-by-key and clamping semantics.
#[async_trait]
pub trait RemoteCart: Send + Sync {
    /// Fetches the server's current cart (used once, at login merge).
    async fn fetch(&self) -> RemoteResult<Cart>;

    /// Mirrors an `Add`: the full frozen line, so the server sees the
    /// same captured price the local cart does.
    async fn add_line(&self, line: CartLine) -> RemoteResult<()>;

    /// Mirrors a `SetQuantity`.
    async fn set_quantity(&self, key: &LineKey, quantity: i64) -> RemoteResult<()>;

    /// Mirrors a `Remove`.
    async fn remove_line(&self, key: &LineKey) -> RemoteResult<()>;

    /// Mirrors a `Clear`.
    async fn clear(&self) -> RemoteResult<()>;
}

// =============================================================================
// Order Gateway
// =============================================================================

/// Order placement failures.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The order service refused the snapshot (stock, payment, address).
    #[error("Order rejected: {0}")]
    Rejected(String),

    /// The order service could not be reached.
    #[error("Order service unavailable: {0}")]
    Unavailable(String),
}

/// Receipt returned by a successful order placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    /// Order identifier assigned by the order service.
    pub order_id: Uuid,

    /// When the order was accepted.
    pub placed_at: DateTime<Utc>,

    /// The grand total the order was placed at.
    pub total: Money,
}

/// Order placement service.
///
/// Consumes the final cart + totals snapshot; on success the façade
/// clears both the local and remote carts.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Places an order for the given snapshot.
    async fn place(&self, cart: &Cart, totals: &Totals) -> Result<OrderReceipt, OrderError>;
}
