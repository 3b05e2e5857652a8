//! # Cart Façade
//!
//! The single API surface the storefront UI calls.
//!
//! ## Mutation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     CartFacade Mutation Flow                            │
//! │                                                                         │
//! │  UI action (add_item / set_quantity / remove_item / clear)              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. reduce(cart, action)      pure transition; typed error on reject   │
//! │  2. store.save(cart)          durable local write (never throws)       │
//! │  3. stamp sequence number     monotonic, under the state lock          │
//! │       │                                                                 │
//! │       ├── Guest ────────────► done                                     │
//! │       │                                                                 │
//! │       └── Authenticated ────► 4. mirror to RemoteCart (async)          │
//! │                                    │                                    │
//! │                                    ├── ok, newest seq ──► mark synced  │
//! │                                    ├── ok, older seq ───► DISCARD      │
//! │                                    │                      (stale)      │
//! │                                    └── err ─────────────► surface      │
//! │                                                           retryable    │
//! │                                                           error; local │
//! │                                                           state kept   │
//! │                                                                         │
//! │  Local state is ALWAYS authoritative. A remote completion can only     │
//! │  advance the synced watermark, never roll back a local mutation.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Thread Safety
//! Internal state lives behind a `std::sync::Mutex`, never held across an
//! await. Remote calls run outside the lock, so the UI can issue a new
//! action while a previous sync is in flight; the sequence watermark is
//! what keeps out-of-order completions from clobbering newer state.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use basket_core::error::CartError;
use basket_core::reducer::{reduce, CartAction};
use basket_core::totals::{compute_totals, PricingRules, Totals};
use basket_core::types::{Cart, CartLine, LineKey};
use basket_store::CartStore;

use crate::error::{SyncError, SyncResult};
use crate::merge::merge_carts;
use crate::remote::{Catalog, OrderGateway, OrderReceipt, RemoteCart, RemoteResult};
use crate::session::Session;

// =============================================================================
// Construction
// =============================================================================

/// Everything a façade is built from.
///
/// Constructed once at startup and injected; the façade is an explicit
/// context object the UI root owns, not a process-wide singleton.
pub struct FacadeParts {
    /// Local persistent store (the cart is restored from it on startup).
    pub store: CartStore,

    /// Catalog client, consulted once per add.
    pub catalog: Arc<dyn Catalog>,

    /// Remote cart client, used only while authenticated.
    pub remote: Arc<dyn RemoteCart>,

    /// Order placement service.
    pub orders: Arc<dyn OrderGateway>,

    /// Pricing rules for totals derivation.
    pub rules: PricingRules,
}

// =============================================================================
// Status
// =============================================================================

/// Snapshot of the façade's sync bookkeeping, for the UI and for tests.
#[derive(Debug, Clone)]
pub struct SyncStatus {
    /// Current session state.
    pub session: Session,

    /// Sequence number of the newest local mutation.
    pub newest_seq: u64,

    /// Highest sequence number whose remote completion was applied.
    pub last_synced_seq: u64,

    /// Number of remote calls currently in flight.
    pub in_flight: u64,

    /// Whether any remote call is in flight right now.
    pub is_syncing: bool,
}

// =============================================================================
// Internal State
// =============================================================================

/// State guarded by the façade mutex.
struct FacadeState {
    cart: Cart,
    session: Session,
    newest_seq: u64,
    last_synced_seq: u64,
    in_flight: u64,
}

// =============================================================================
// Cart Façade
// =============================================================================

/// The single entry point used by UI layers.
///
/// Decides whether operations act on the local persistent store alone
/// (guest) or are also mirrored to the remote authenticated cart, and
/// keeps both consistent across login.
pub struct CartFacade {
    state: Mutex<FacadeState>,
    store: CartStore,
    catalog: Arc<dyn Catalog>,
    remote: Arc<dyn RemoteCart>,
    orders: Arc<dyn OrderGateway>,
    rules: PricingRules,

    /// Monotonic counter for outgoing sync stamps.
    seq: AtomicU64,

    syncing_tx: watch::Sender<bool>,
    /// Kept so the channel always has a receiver.
    _syncing_rx: watch::Receiver<bool>,
}

impl CartFacade {
    /// Builds the façade, restoring the cart from the persistent store.
    pub fn new(parts: FacadeParts) -> Self {
        let cart = parts.store.load();
        debug!(lines = cart.line_count(), "cart restored from store");

        let (syncing_tx, syncing_rx) = watch::channel(false);

        CartFacade {
            state: Mutex::new(FacadeState {
                cart,
                session: Session::Guest,
                newest_seq: 0,
                last_synced_seq: 0,
                in_flight: 0,
            }),
            store: parts.store,
            catalog: parts.catalog,
            remote: parts.remote,
            orders: parts.orders,
            rules: parts.rules,
            seq: AtomicU64::new(0),
            syncing_tx,
            _syncing_rx: syncing_rx,
        }
    }

    // =========================================================================
    // Read Side
    // =========================================================================

    /// Current cart lines, in display order.
    pub fn lines(&self) -> Vec<CartLine> {
        self.lock().cart.lines.clone()
    }

    /// Full cart snapshot.
    pub fn cart(&self) -> Cart {
        self.lock().cart.clone()
    }

    /// Derived totals under the configured pricing rules. Recomputed on
    /// every call; totals are never stored.
    pub fn totals(&self) -> Totals {
        let state = self.lock();
        compute_totals(&state.cart, &self.rules)
    }

    /// Current sync bookkeeping.
    pub fn status(&self) -> SyncStatus {
        let state = self.lock();
        SyncStatus {
            session: state.session.clone(),
            newest_seq: state.newest_seq,
            last_synced_seq: state.last_synced_seq,
            in_flight: state.in_flight,
            is_syncing: state.in_flight > 0,
        }
    }

    /// Observable `is_syncing` flag. The receiver yields `true` while any
    /// remote call is in flight.
    pub fn subscribe_syncing(&self) -> watch::Receiver<bool> {
        self.syncing_tx.subscribe()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds a product to the cart.
    ///
    /// The catalog is consulted exactly here, to capture the price/name/
    /// image snapshot; it is never polled again for this line. Adding an
    /// identical `(product, color, size)` increments the existing line.
    pub async fn add_item(
        &self,
        product_id: &str,
        color: Option<String>,
        size: Option<String>,
        quantity: i64,
    ) -> SyncResult<()> {
        let snapshot = self.catalog.product(product_id).await?;
        debug!(product_id, quantity, "add_item");

        // The delta line mirrored to the remote: the remote increments by
        // the added quantity, exactly like the local reducer.
        let delta = CartLine::from_snapshot(
            snapshot.clone(),
            color.clone(),
            size.clone(),
            quantity.max(1),
        );

        let (seq, mirror) = self.apply(CartAction::add(snapshot, color, size, quantity))?;
        if mirror {
            self.mirror(seq, self.remote.add_line(delta)).await?;
        }
        Ok(())
    }

    /// Removes the line with the given identity key. No-op if absent.
    pub async fn remove_item(&self, key: LineKey) -> SyncResult<()> {
        debug!(product_id = %key.product_id, "remove_item");
        let (seq, mirror) = self.apply(CartAction::Remove { key: key.clone() })?;
        if mirror {
            self.mirror(seq, self.remote.remove_line(&key)).await?;
        }
        Ok(())
    }

    /// Replaces the quantity of the line with the given key, clamped to a
    /// minimum of 1. No-op if absent.
    pub async fn set_quantity(&self, key: LineKey, quantity: i64) -> SyncResult<()> {
        debug!(product_id = %key.product_id, quantity, "set_quantity");
        let (seq, mirror) = self.apply(CartAction::SetQuantity {
            key: key.clone(),
            quantity,
        })?;
        if mirror {
            self.mirror(seq, self.remote.set_quantity(&key, quantity.max(1)))
                .await?;
        }
        Ok(())
    }

    /// Empties the cart.
    pub async fn clear(&self) -> SyncResult<()> {
        debug!("clear");
        let (seq, mirror) = self.apply(CartAction::Clear)?;
        if mirror {
            self.mirror(seq, self.remote.clear()).await?;
        }
        Ok(())
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Logs in: fetches the remote cart, merges it with the local one
    /// (exactly once per Guest → Authenticated transition), persists the
    /// result and pushes it back to the remote.
    ///
    /// On fetch failure the session returns to Guest and a retryable error
    /// is surfaced; the local cart is untouched. On push failure the
    /// session still becomes Authenticated (local state is authoritative,
    /// the next successful mirror converges the remote).
    pub async fn login(&self, account_id: impl Into<String>) -> SyncResult<()> {
        let account_id = account_id.into();
        {
            let mut state = self.lock();
            match state.session {
                Session::Authenticated { .. } => {
                    debug!("login: already authenticated, no-op");
                    return Ok(());
                }
                Session::Authenticating => return Err(SyncError::SessionBusy),
                Session::Guest => state.session = Session::Authenticating,
            }
        }
        info!(account_id = %account_id, "login: fetching remote cart for merge");

        self.begin_sync();
        let fetched = self.remote.fetch().await;
        self.end_sync();

        let remote_cart = match fetched {
            Ok(cart) => cart,
            Err(e) => {
                warn!(error = %e, "login: remote fetch failed, staying guest");
                self.lock().session = Session::Guest;
                return Err(e.into());
            }
        };

        // The one merge for this transition.
        let (merged, seq) = {
            let mut state = self.lock();
            let merged = merge_carts(state.cart.clone(), remote_cart);
            state.cart = merged.clone();
            let seq = self.next_seq(&mut state);
            self.store.save(&state.cart);
            state.session = Session::Authenticated { account_id };
            (merged, seq)
        };
        info!(lines = merged.line_count(), "login: carts merged");

        // Push the merged cart: a clear followed by per-line adds, the
        // same operations the remote exposes for normal mirroring.
        self.mirror(seq, async {
            self.remote.clear().await?;
            for line in merged.lines {
                self.remote.add_line(line).await?;
            }
            Ok(())
        })
        .await
    }

    /// Logs out: drops the remote binding, keeps the last-synced snapshot
    /// in the local store untouched.
    pub fn logout(&self) {
        let mut state = self.lock();
        if state.session.is_authenticated() {
            info!("logout: keeping local snapshot");
        }
        state.session = Session::Guest;
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Places an order for the current cart + totals snapshot. On success
    /// the cart is cleared locally (and on the remote when authenticated).
    pub async fn checkout(&self) -> SyncResult<OrderReceipt> {
        let (cart, totals) = {
            let state = self.lock();
            (state.cart.clone(), compute_totals(&state.cart, &self.rules))
        };

        if cart.is_empty() {
            return Err(SyncError::Cart(CartError::InvalidLine(
                "cannot place an order for an empty cart".to_string(),
            )));
        }

        let receipt = self.orders.place(&cart, &totals).await?;
        info!(order_id = %receipt.order_id, total = %receipt.total, "order placed");

        // Success: clear. The order exists regardless of how the clears
        // go, so mirror failures are logged rather than surfaced.
        match self.apply(CartAction::Clear) {
            Ok((seq, true)) => {
                if let Err(e) = self.mirror(seq, self.remote.clear()).await {
                    warn!(error = %e, "post-checkout remote clear failed, will converge on next sync");
                }
            }
            Ok((_, false)) => {}
            Err(e) => warn!(error = %e, "post-checkout local clear failed"),
        }

        Ok(receipt)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn lock(&self) -> std::sync::MutexGuard<'_, FacadeState> {
        self.state.lock().expect("facade state mutex poisoned")
    }

    /// Stamps the next sequence number and records it as the newest local
    /// mutation. Must be called under the state lock so stamping order
    /// matches mutation order.
    fn next_seq(&self, state: &mut FacadeState) -> u64 {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        state.newest_seq = seq;
        seq
    }

    /// Applies an action locally: reduce, persist, stamp.
    ///
    /// Returns the stamped sequence number and whether the mutation should
    /// be mirrored to the remote cart.
    fn apply(&self, action: CartAction) -> SyncResult<(u64, bool)> {
        let mut state = self.lock();
        let next = reduce(state.cart.clone(), action)?;
        state.cart = next;
        let seq = self.next_seq(&mut state);
        self.store.save(&state.cart);
        Ok((seq, state.session.is_authenticated()))
    }

    /// Runs one remote mirror call stamped with `seq`.
    ///
    /// A successful completion advances the synced watermark only if it is
    /// newer than anything applied so far; older completions are the
    /// out-of-order case and are discarded silently. A failed completion
    /// surfaces a retryable error; local state is untouched either way.
    async fn mirror(&self, seq: u64, op: impl Future<Output = RemoteResult<()>>) -> SyncResult<()> {
        self.begin_sync();
        let result = op.await;
        self.end_sync();

        match result {
            Ok(()) => {
                let mut state = self.lock();
                if seq <= state.last_synced_seq {
                    // Out-of-order completion: a newer sync already landed.
                    let stale = SyncError::Stale {
                        seq,
                        newest: state.last_synced_seq,
                    };
                    debug!(error = %stale, "discarding stale remote completion");
                } else {
                    state.last_synced_seq = seq;
                }
                Ok(())
            }
            Err(e) => {
                warn!(seq, error = %e, "remote mirror failed, local state kept");
                Err(SyncError::Remote(e))
            }
        }
    }

    fn begin_sync(&self) {
        let mut state = self.lock();
        state.in_flight += 1;
        let _ = self.syncing_tx.send(true);
    }

    fn end_sync(&self) {
        let mut state = self.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
        if state.in_flight == 0 {
            let _ = self.syncing_tx.send(false);
        }
    }
}
