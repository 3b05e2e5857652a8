//! # basket-sync: Sync Façade for the Basket Cart Module
//!
//! The single entry point UI code calls. The façade decides whether an
//! operation acts on the local persistent store alone (guest) or is also
//! mirrored to the remote authenticated cart service, and keeps both
//! consistent when a guest logs in.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  UI action                                                              │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  CartFacade ──► reduce() ──► CartStore.save() ──► compute_totals()      │
//! │     │           (pure)       (durable write)      (derived view)        │
//! │     │                                                                   │
//! │     └──► RemoteCart mirror (authenticated only, async, seq-stamped)     │
//! │                                                                         │
//! │  Local state is authoritative: a failed or out-of-order remote          │
//! │  completion never rolls back an already-applied local mutation.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`facade`] - `CartFacade`: add/remove/set-quantity/clear/totals,
//!   login/logout/checkout, the `is_syncing` observable
//! - [`session`] - the `Guest ⇄ Authenticating ⇄ Authenticated` machine
//! - [`merge`] - the one-shot guest/remote cart merge
//! - [`remote`] - injected service seams: `RemoteCart`, `Catalog`,
//!   `OrderGateway`
//! - [`config`] - TOML configuration (storage location, pricing rules)
//! - [`error`] - `SyncError` taxonomy with retryability

pub mod config;
pub mod error;
pub mod facade;
pub mod merge;
pub mod remote;
pub mod session;

pub use config::FacadeConfig;
pub use error::{SyncError, SyncResult};
pub use facade::{CartFacade, FacadeParts, SyncStatus};
pub use merge::merge_carts;
pub use remote::{
    Catalog, CatalogError, OrderError, OrderGateway, OrderReceipt, RemoteCart, RemoteError,
    RemoteResult,
};
pub use session::Session;
