//! # Sync Error Types
//!
//! Error taxonomy for the façade.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Sync Error Categories                              │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Local (fatal   │  │  Transient      │  │  Internal               │ │
//! │  │  to the action) │  │  (retryable)    │  │  (never surfaced)       │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Cart           │  │  Remote         │  │  Stale                  │ │
//! │  │  NotAuthenticated│ │  Catalog        │  │                         │ │
//! │  │  SessionBusy    │  │  Order          │  │                         │ │
//! │  │  Config         │  │                 │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  A transient error leaves already-applied local state untouched; the   │
//! │  UI shows a recoverable message and may retry. Stale completions are   │
//! │  logged and dropped inside the façade.                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use basket_core::error::CartError;

use crate::remote::{CatalogError, OrderError, RemoteError};

/// Result type alias for façade operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Façade error type covering all cart-module failures the UI can see.
#[derive(Debug, Error)]
pub enum SyncError {
    // =========================================================================
    // Local Errors
    // =========================================================================
    /// The reducer refused the action (invalid line, caps).
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// The operation requires an authenticated session.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// A login is already in flight; the session machine allows exactly
    /// one `Guest → Authenticating` transition at a time.
    #[error("Session transition already in progress")]
    SessionBusy,

    /// Configuration file could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    // =========================================================================
    // Transient Errors (retryable)
    // =========================================================================
    /// Remote cart call failed; local state remains authoritative.
    #[error("Sync failed: {0}")]
    Remote(#[from] RemoteError),

    /// Catalog lookup failed; nothing was added.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Order placement failed; the cart is left intact.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    // =========================================================================
    // Internal Errors
    // =========================================================================
    /// An out-of-order remote completion. Discarded silently inside the
    /// façade; exists as a variant so the discard site is typed and
    /// testable, never returned to the UI.
    #[error("Stale sync response: seq {seq} is older than newest {newest}")]
    Stale { seq: u64, newest: u64 },
}

// =============================================================================
// Error Categorization
// =============================================================================

impl SyncError {
    /// Returns true if the operation can be retried as-is.
    ///
    /// ## Retryable
    /// - remote cart failures (network, server hiccup)
    /// - catalog/order service unavailability
    ///
    /// ## Non-Retryable
    /// - reducer rejections (the action itself is wrong)
    /// - catalog "not found" / order "rejected" (retrying changes nothing)
    /// - configuration problems
    pub fn is_retryable(&self) -> bool {
        match self {
            SyncError::Remote(_) => true,
            SyncError::Catalog(CatalogError::Unavailable(_)) => true,
            SyncError::Order(OrderError::Unavailable(_)) => true,
            _ => false,
        }
    }
}
