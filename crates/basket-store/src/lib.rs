//! # basket-store: Persistence Layer for the Basket Cart Module
//!
//! Reads and writes the serialized cart blob to a durable key-value store.
//! This is the Rust analog of the browser's per-origin local storage: one
//! key, one serialized array of lines, overwritten wholesale on every save.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Persistence Flow                                  │
//! │                                                                         │
//! │  CartFacade (basket-sync)                                               │
//! │       │ save(cart) / load()                                             │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 CartStore (store.rs)                            │   │
//! │  │                                                                 │   │
//! │  │  • serializes Cart ⇄ versioned JSON envelope                    │   │
//! │  │  • screens every loaded line, drops invalid ones                │   │
//! │  │  • rewrites the blob when lines were dropped (self-healing)     │   │
//! │  │  • NEVER propagates a read failure: degrades to empty cart      │   │
//! │  │  • NEVER propagates a write failure: logs and swallows          │   │
//! │  └────────────────────────────┬────────────────────────────────────┘   │
//! │                               │ get/put/remove (strings)                │
//! │                               ▼                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │             StorageBackend (backend.rs)                         │   │
//! │  │                                                                 │   │
//! │  │   MemoryBackend (tests, ephemeral)   FileBackend (atomic fs)    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The cart blob is a non-critical cache of user intent: losing it costs a
//! re-add, not money. That is why the error policy here is deliberately
//! lossy where the rest of the workspace is strict.

pub mod backend;
pub mod error;
pub mod store;

pub use backend::{FileBackend, MemoryBackend, StorageBackend};
pub use error::{StoreError, StoreResult};
pub use store::{CartStore, SCHEMA_VERSION};
