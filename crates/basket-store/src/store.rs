//! # Cart Store
//!
//! The versioned blob codec and the never-throw load/save contract.
//!
//! ## Load Decision Tree
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         CartStore::load()                               │
//! │                                                                         │
//! │  backend.get(key)                                                       │
//! │       │                                                                 │
//! │       ├── Err(_) ──────────────────────────► empty cart (warn)          │
//! │       ├── Ok(None) ────────────────────────► empty cart                 │
//! │       └── Ok(Some(blob))                                                │
//! │             │                                                           │
//! │             ├── versioned envelope, v == 1 ─► screen lines              │
//! │             ├── bare JSON array (legacy v0) ► screen lines + upgrade    │
//! │             ├── versioned envelope, v > 1 ──► corrupt: discard, empty   │
//! │             └── anything else ──────────────► corrupt: discard, empty   │
//! │                                                                         │
//! │  screen lines: validate each; drop failures silently; if any were      │
//! │  dropped (or the blob was legacy) rewrite the filtered set at once     │
//! │  (self-healing)                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Unknown *newer* schema versions are treated as corrupt rather than
//! best-effort parsed: a downgraded build cannot know what a future field
//! meant, and the blob is a cache the user can rebuild in seconds.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use basket_core::types::{Cart, CartLine};
use basket_core::validation::validate_line;

use crate::backend::StorageBackend;

// =============================================================================
// Persisted Envelope
// =============================================================================

/// Current schema version of the persisted blob.
pub const SCHEMA_VERSION: u32 = 1;

/// The on-disk shape: a version tag plus the line array.
///
/// Earlier builds persisted the bare line array with no version field;
/// [`CartStore::load`] still accepts that shape as version 0 and upgrades
/// it on the next write.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedCart {
    schema_version: u32,
    lines: Vec<CartLine>,
}

// =============================================================================
// Cart Store
// =============================================================================

/// The persistent store adapter: one cart blob under one storage key.
///
/// ## Error Policy
/// Neither `load` nor `save` ever returns an error. The blob is a
/// non-critical cache: on the read side every failure mode degrades to an
/// empty cart (and discards the bad entry), on the write side failures
/// are logged at `warn` and swallowed. Data-loss risk is accepted here.
pub struct CartStore {
    backend: Arc<dyn StorageBackend>,
    key: String,
}

impl CartStore {
    /// Default storage key, matching the storefront's local-storage key.
    pub const DEFAULT_KEY: &'static str = "basket.cart";

    /// Creates a store over `backend` using [`Self::DEFAULT_KEY`].
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self::with_key(backend, Self::DEFAULT_KEY)
    }

    /// Creates a store over `backend` with an explicit storage key.
    pub fn with_key(backend: Arc<dyn StorageBackend>, key: impl Into<String>) -> Self {
        CartStore {
            backend,
            key: key.into(),
        }
    }

    /// Loads the cart. Never fails: missing, unreadable, corrupt, or
    /// schema-invalid data yields an empty cart, and a corrupt entry is
    /// discarded so the next load is clean.
    pub fn load(&self) -> Cart {
        let blob = match self.backend.get(&self.key) {
            Ok(Some(blob)) => blob,
            Ok(None) => return Cart::new(),
            Err(e) => {
                warn!(key = %self.key, error = %e, "cart blob unreadable, starting empty");
                return Cart::new();
            }
        };

        let (lines, needs_rewrite) = match decode(&blob) {
            Some(decoded) => decoded,
            None => {
                warn!(key = %self.key, "cart blob corrupt, discarding");
                self.save(&Cart::new());
                return Cart::new();
            }
        };

        // Screen every line; drop silently on failure.
        let total = lines.len();
        let valid: Vec<CartLine> = lines
            .into_iter()
            .filter(|line| match validate_line(line) {
                Ok(()) => true,
                Err(e) => {
                    debug!(key = %self.key, error = %e, "dropping invalid persisted line");
                    false
                }
            })
            .collect();
        let dropped = total - valid.len();

        let mut cart = Cart::new();
        cart.lines = valid;

        // Self-healing: if anything was dropped (or the blob predates the
        // version envelope) rewrite the filtered set immediately.
        if dropped > 0 || needs_rewrite {
            if dropped > 0 {
                warn!(key = %self.key, dropped, "dropped invalid lines, rewriting blob");
            }
            self.save(&cart);
        }

        cart
    }

    /// Serializes and writes the cart. Failures (quota, permissions) are
    /// logged and swallowed, never propagated as a crash.
    pub fn save(&self, cart: &Cart) {
        let envelope = PersistedCart {
            schema_version: SCHEMA_VERSION,
            lines: cart.lines.clone(),
        };

        let blob = match serde_json::to_string(&envelope) {
            Ok(blob) => blob,
            Err(e) => {
                warn!(key = %self.key, error = %e, "cart blob serialization failed");
                return;
            }
        };

        if let Err(e) = self.backend.put(&self.key, &blob) {
            warn!(key = %self.key, error = %e, "cart blob write failed, state kept in memory");
        }
    }

    /// Discards the persisted blob entirely (explicit user/application
    /// reset; normal clears persist an empty cart instead).
    pub fn reset(&self) {
        if let Err(e) = self.backend.remove(&self.key) {
            warn!(key = %self.key, error = %e, "cart blob removal failed");
        }
    }
}

/// Decodes a blob into `(lines, needs_rewrite)`, or `None` if corrupt.
fn decode(blob: &str) -> Option<(Vec<CartLine>, bool)> {
    if let Ok(envelope) = serde_json::from_str::<PersistedCart>(blob) {
        if envelope.schema_version > SCHEMA_VERSION {
            return None;
        }
        return Some((envelope.lines, false));
    }

    // Legacy shape (version 0): the bare line array.
    if let Ok(lines) = serde_json::from_str::<Vec<CartLine>>(blob) {
        return Some((lines, true));
    }

    None
}

// =============================================================================
// Unit Tests
// =============================================================================
