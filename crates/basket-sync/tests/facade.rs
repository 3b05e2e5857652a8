//! Integration tests for `CartFacade` with in-memory service doubles.
//!
//! Everything here runs against `MemoryBackend` storage and hand-rolled
//! `Catalog`/`RemoteCart`/`OrderGateway` fakes, so the full local-first
//! mutation flow, login merge, checkout and the out-of-order completion
//! guard are exercised deterministically.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Notify;
use uuid::Uuid;

use basket_core::totals::PricingRules;
use basket_core::types::{Cart, CartLine, LineKey, ProductSnapshot};
use basket_core::Money;
use basket_store::{CartStore, MemoryBackend, StorageBackend};
use basket_sync::{
    Catalog, CatalogError, CartFacade, FacadeParts, OrderError, OrderGateway, OrderReceipt,
    RemoteCart, RemoteError, RemoteResult, Session, SyncError,
};

// =============================================================================
// Test Doubles
// =============================================================================

struct FakeCatalog {
    products: HashMap<String, ProductSnapshot>,
}

impl FakeCatalog {
    fn with_products(products: Vec<ProductSnapshot>) -> Arc<Self> {
        Arc::new(FakeCatalog {
            products: products
                .into_iter()
                .map(|p| (p.product_id.clone(), p))
                .collect(),
        })
    }
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn product(&self, product_id: &str) -> Result<ProductSnapshot, CatalogError> {
        self.products
            .get(product_id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(product_id.to_string()))
    }
}

/// Remote cart double. Serves a configurable cart on `fetch`, records every
/// mirrored call, can be switched into a failing mode, and can gate
/// `add_line` / `fetch` on a [`Notify`] pair to script completion order.
#[derive(Default)]
struct FakeRemote {
    server_cart: Mutex<Cart>,
    calls: Mutex<Vec<String>>,
    failing: AtomicBool,
    gate_adds: AtomicBool,
    gate_fetch: AtomicBool,
    entered: Notify,
    release: Notify,
}

impl FakeRemote {
    fn new() -> Arc<Self> {
        Arc::new(FakeRemote::default())
    }

    fn serving(cart: Cart) -> Arc<Self> {
        let remote = FakeRemote::default();
        *remote.server_cart.lock().unwrap() = cart;
        Arc::new(remote)
    }

    fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn check(&self) -> RemoteResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(RemoteError::Unavailable("connection refused".into()))
        } else {
            Ok(())
        }
    }

    async fn gate(&self) {
        self.entered.notify_one();
        self.release.notified().await;
    }
}

#[async_trait]
impl RemoteCart for FakeRemote {
    async fn fetch(&self) -> RemoteResult<Cart> {
        if self.gate_fetch.load(Ordering::SeqCst) {
            self.gate().await;
        }
        self.calls.lock().unwrap().push("fetch".into());
        self.check()?;
        Ok(self.server_cart.lock().unwrap().clone())
    }

    async fn add_line(&self, line: CartLine) -> RemoteResult<()> {
        if self.gate_adds.load(Ordering::SeqCst) {
            self.gate().await;
        }
        self.calls
            .lock()
            .unwrap()
            .push(format!("add:{}x{}", line.product_id, line.quantity));
        self.check()
    }

    async fn set_quantity(&self, key: &LineKey, quantity: i64) -> RemoteResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("set:{}={}", key.product_id, quantity));
        self.check()
    }

    async fn remove_line(&self, key: &LineKey) -> RemoteResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("remove:{}", key.product_id));
        self.check()
    }

    async fn clear(&self) -> RemoteResult<()> {
        self.calls.lock().unwrap().push("clear".into());
        self.check()
    }
}

struct FakeOrders {
    reject: bool,
}

#[async_trait]
impl OrderGateway for FakeOrders {
    async fn place(
        &self,
        _cart: &Cart,
        totals: &basket_core::totals::Totals,
    ) -> Result<OrderReceipt, OrderError> {
        if self.reject {
            return Err(OrderError::Rejected("card declined".into()));
        }
        Ok(OrderReceipt {
            order_id: Uuid::new_v4(),
            placed_at: Utc::now(),
            total: totals.total,
        })
    }
}

// =============================================================================
// Fixtures
// =============================================================================

fn snapshot(id: &str, price: i64, discount_bps: u32) -> ProductSnapshot {
    ProductSnapshot {
        product_id: id.to_string(),
        name: format!("Product {}", id),
        image_url: None,
        unit_price_cents: price,
        discount_bps,
    }
}

struct Harness {
    facade: Arc<CartFacade>,
    backend: Arc<MemoryBackend>,
    remote: Arc<FakeRemote>,
}

fn harness(remote: Arc<FakeRemote>, reject_orders: bool) -> Harness {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
    let backend = Arc::new(MemoryBackend::new());
    let store = CartStore::new(backend.clone() as Arc<dyn StorageBackend>);
    let facade = CartFacade::new(FacadeParts {
        store,
        catalog: FakeCatalog::with_products(vec![
            snapshot("shirt", 10_000, 1_000), // $100.00, 10% off
            snapshot("mug", 1_250, 0),        // $12.50
        ]),
        remote: remote.clone() as Arc<dyn RemoteCart>,
        orders: Arc::new(FakeOrders {
            reject: reject_orders,
        }),
        rules: PricingRules::default(),
    });
    Harness {
        facade: Arc::new(facade),
        backend,
        remote,
    }
}

fn key(id: &str) -> LineKey {
    LineKey::new(id, None, None)
}

// =============================================================================
// Guest Flow
// =============================================================================

#[tokio::test]
async fn test_guest_mutations_are_local_and_persisted() {
    let h = harness(FakeRemote::new(), false);

    h.facade.add_item("shirt", None, None, 2).await.unwrap();
    h.facade.add_item("mug", None, None, 1).await.unwrap();
    h.facade.set_quantity(key("mug"), 4).await.unwrap();
    h.facade.remove_item(key("shirt")).await.unwrap();

    let lines = h.facade.lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].product_id, "mug");
    assert_eq!(lines[0].quantity, 4);

    // Nothing reached the remote while in guest mode.
    assert!(h.remote.calls().is_empty());

    // A fresh store over the same backend sees the persisted cart.
    let reloaded = CartStore::new(h.backend.clone() as Arc<dyn StorageBackend>).load();
    assert_eq!(reloaded.lines, lines);
}

#[tokio::test]
async fn test_cart_survives_facade_restart() {
    let backend = Arc::new(MemoryBackend::new());
    {
        let store = CartStore::new(backend.clone() as Arc<dyn StorageBackend>);
        let facade = CartFacade::new(FacadeParts {
            store,
            catalog: FakeCatalog::with_products(vec![snapshot("shirt", 10_000, 0)]),
            remote: FakeRemote::new() as Arc<dyn RemoteCart>,
            orders: Arc::new(FakeOrders { reject: false }),
            rules: PricingRules::default(),
        });
        facade.add_item("shirt", None, None, 3).await.unwrap();
    }

    let store = CartStore::new(backend as Arc<dyn StorageBackend>);
    let facade = CartFacade::new(FacadeParts {
        store,
        catalog: FakeCatalog::with_products(vec![]),
        remote: FakeRemote::new() as Arc<dyn RemoteCart>,
        orders: Arc::new(FakeOrders { reject: false }),
        rules: PricingRules::default(),
    });
    assert_eq!(facade.lines()[0].quantity, 3);
}

#[tokio::test]
async fn test_totals_follow_pricing_rules() {
    let h = harness(FakeRemote::new(), false);

    // 2 x $100.00 at 10% off = $180.00 subtotal, under the $600 threshold
    h.facade.add_item("shirt", None, None, 2).await.unwrap();

    let totals = h.facade.totals();
    assert_eq!(totals.subtotal, Money::from_cents(18_000));
    assert_eq!(totals.shipping, Money::from_cents(1_500));
    assert_eq!(totals.tax, Money::from_cents(1_440));
    assert_eq!(totals.total, Money::from_cents(20_940));
}

#[tokio::test]
async fn test_unknown_product_is_a_catalog_error() {
    let h = harness(FakeRemote::new(), false);

    let err = h.facade.add_item("ghost", None, None, 1).await.unwrap_err();
    assert!(matches!(err, SyncError::Catalog(CatalogError::NotFound(_))));
    assert!(!err.is_retryable());
    assert!(h.facade.lines().is_empty());
}

// =============================================================================
// Login / Logout
// =============================================================================

#[tokio::test]
async fn test_login_merges_and_pushes_once() {
    // Server already holds 1 shirt (older capture, different price) + 1 mug.
    let mut server = Cart::new();
    server.lines.push({
        let mut l = CartLine::from_snapshot(snapshot("shirt", 9_000, 0), None, None, 1);
        l.added_at = Utc::now() - chrono::Duration::days(2);
        l
    });
    server
        .lines
        .push(CartLine::from_snapshot(snapshot("mug", 1_250, 0), None, None, 1));
    let h = harness(FakeRemote::serving(server), false);

    h.facade.add_item("shirt", None, None, 2).await.unwrap();
    h.facade.login("acct-1").await.unwrap();

    assert_eq!(
        h.facade.status().session,
        Session::Authenticated {
            account_id: "acct-1".into()
        }
    );

    // Conflict summed (2 + 1) with the fresher local capture winning the
    // price; the remote-only mug is appended.
    let lines = h.facade.lines();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].product_id, "shirt");
    assert_eq!(lines[0].quantity, 3);
    assert_eq!(lines[0].unit_price_cents, 10_000);
    assert_eq!(lines[1].product_id, "mug");

    // Push = one clear then one add per merged line.
    let calls = h.remote.calls();
    assert_eq!(calls, vec!["fetch", "clear", "add:shirtx3", "add:mugx1"]);

    // The merge ran exactly once; a second login is a no-op.
    h.facade.login("acct-1").await.unwrap();
    assert_eq!(h.remote.calls().len(), 4);
}

#[tokio::test]
async fn test_login_fetch_failure_stays_guest() {
    let remote = FakeRemote::new();
    remote.set_failing(true);
    let h = harness(remote, false);

    h.facade.add_item("shirt", None, None, 1).await.unwrap();
    let err = h.facade.login("acct-1").await.unwrap_err();

    assert!(err.is_retryable());
    assert_eq!(h.facade.status().session, Session::Guest);
    assert_eq!(h.facade.lines().len(), 1);

    // Retry succeeds once the remote recovers.
    h.remote.set_failing(false);
    h.facade.login("acct-1").await.unwrap();
    assert!(h.facade.status().session.is_authenticated());
}

#[tokio::test]
async fn test_concurrent_login_is_busy() {
    let remote = FakeRemote::new();
    remote.gate_fetch.store(true, Ordering::SeqCst);
    let h = harness(remote, false);

    let facade = h.facade.clone();
    let first = tokio::spawn(async move { facade.login("acct-1").await });

    // Wait until the first login is inside the remote fetch.
    h.remote.entered.notified().await;
    let err = h.facade.login("acct-2").await.unwrap_err();
    assert!(matches!(err, SyncError::SessionBusy));

    h.remote.release.notify_one();
    first.await.unwrap().unwrap();
    assert_eq!(
        h.facade.status().session,
        Session::Authenticated {
            account_id: "acct-1".into()
        }
    );
}

#[tokio::test]
async fn test_logout_keeps_local_snapshot() {
    let h = harness(FakeRemote::new(), false);

    h.facade.login("acct-1").await.unwrap();
    h.facade.add_item("shirt", None, None, 2).await.unwrap();
    h.facade.logout();

    assert_eq!(h.facade.status().session, Session::Guest);
    assert_eq!(h.facade.lines().len(), 1);

    // Post-logout mutations are local only.
    let calls_before = h.remote.calls().len();
    h.facade.set_quantity(key("shirt"), 5).await.unwrap();
    assert_eq!(h.remote.calls().len(), calls_before);
    assert_eq!(h.facade.lines()[0].quantity, 5);
}

// =============================================================================
// Authenticated Mirroring
// =============================================================================

#[tokio::test]
async fn test_authenticated_mutations_mirror_to_remote() {
    let h = harness(FakeRemote::new(), false);
    h.facade.login("acct-1").await.unwrap();

    h.facade.add_item("shirt", None, None, 2).await.unwrap();
    h.facade.set_quantity(key("shirt"), 3).await.unwrap();
    h.facade.remove_item(key("shirt")).await.unwrap();

    let calls = h.remote.calls();
    // After the login handshake: the three mirrored mutations, in order.
    assert_eq!(
        &calls[2..],
        &["add:shirtx2".to_string(), "set:shirt=3".into(), "remove:shirt".into()]
    );

    let status = h.facade.status();
    assert_eq!(status.last_synced_seq, status.newest_seq);
    assert!(!status.is_syncing);
}

#[tokio::test]
async fn test_remote_failure_keeps_local_state() {
    let h = harness(FakeRemote::new(), false);
    h.facade.login("acct-1").await.unwrap();

    h.remote.set_failing(true);
    let err = h.facade.add_item("shirt", None, None, 2).await.unwrap_err();

    assert!(err.is_retryable());
    // The local mutation was applied and persisted before the mirror ran.
    assert_eq!(h.facade.lines()[0].quantity, 2);
    let reloaded = CartStore::new(h.backend.clone() as Arc<dyn StorageBackend>).load();
    assert_eq!(reloaded.lines[0].quantity, 2);

    // The failed mirror did not advance the synced watermark.
    let status = h.facade.status();
    assert!(status.last_synced_seq < status.newest_seq);
}

#[tokio::test]
async fn test_stale_completion_is_discarded() {
    let h = harness(FakeRemote::new(), false);
    h.facade.login("acct-1").await.unwrap();
    h.facade.add_item("shirt", None, None, 1).await.unwrap();

    // Gate the next add mirror so a later mutation can complete first.
    h.remote.gate_adds.store(true, Ordering::SeqCst);

    let facade = h.facade.clone();
    let slow_add = tokio::spawn(async move { facade.add_item("mug", None, None, 1).await });

    // The slow add has applied locally and is blocked inside its mirror.
    h.remote.entered.notified().await;
    assert!(h.facade.status().is_syncing);

    // A newer mutation lands and syncs while the add is still in flight.
    h.facade.set_quantity(key("shirt"), 7).await.unwrap();
    let synced_at = h.facade.status().last_synced_seq;

    // Release the gated add: its completion carries an older sequence
    // number and must not move the watermark backwards.
    h.remote.gate_adds.store(false, Ordering::SeqCst);
    h.remote.release.notify_one();
    slow_add.await.unwrap().unwrap();

    let status = h.facade.status();
    assert_eq!(status.last_synced_seq, synced_at);
    assert_eq!(status.last_synced_seq, status.newest_seq);
    assert!(!status.is_syncing);

    // Local state reflects both mutations regardless of completion order.
    let lines = h.facade.lines();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].quantity, 7);
}

#[tokio::test]
async fn test_is_syncing_observable() {
    let h = harness(FakeRemote::new(), false);
    let mut syncing = h.facade.subscribe_syncing();
    assert!(!*syncing.borrow());

    h.facade.login("acct-1").await.unwrap();
    h.remote.gate_adds.store(true, Ordering::SeqCst);

    let facade = h.facade.clone();
    let add = tokio::spawn(async move { facade.add_item("shirt", None, None, 1).await });

    h.remote.entered.notified().await;
    syncing.changed().await.unwrap();
    assert!(*syncing.borrow());

    h.remote.gate_adds.store(false, Ordering::SeqCst);
    h.remote.release.notify_one();
    add.await.unwrap().unwrap();
    assert!(!*h.facade.subscribe_syncing().borrow());
}

// =============================================================================
// Checkout
// =============================================================================

#[tokio::test]
async fn test_checkout_clears_cart_and_returns_receipt() {
    let h = harness(FakeRemote::new(), false);
    h.facade.login("acct-1").await.unwrap();
    h.facade.add_item("shirt", None, None, 2).await.unwrap();
    let expected_total = h.facade.totals().total;

    let receipt = h.facade.checkout().await.unwrap();
    assert_eq!(receipt.total, expected_total);

    assert!(h.facade.lines().is_empty());
    let reloaded = CartStore::new(h.backend.clone() as Arc<dyn StorageBackend>).load();
    assert!(reloaded.is_empty());
    assert_eq!(h.remote.calls().last().unwrap(), "clear");
}

#[tokio::test]
async fn test_rejected_order_leaves_cart_intact() {
    let h = harness(FakeRemote::new(), true);
    h.facade.add_item("shirt", None, None, 2).await.unwrap();

    let err = h.facade.checkout().await.unwrap_err();
    assert!(matches!(err, SyncError::Order(OrderError::Rejected(_))));
    assert!(!err.is_retryable());
    assert_eq!(h.facade.lines().len(), 1);
}

#[tokio::test]
async fn test_checkout_on_empty_cart_is_refused() {
    let h = harness(FakeRemote::new(), false);
    let err = h.facade.checkout().await.unwrap_err();
    assert!(matches!(err, SyncError::Cart(_)));
    assert!(h.remote.calls().is_empty());
}
