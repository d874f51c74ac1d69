//! `stockroom-infra` — storage adapters and the ledger engine.
//!
//! Two store backends implement the same contracts: an in-memory store for
//! dev/test and a Postgres store for production. The atomic units the
//! ledger depends on (check-append-recompute, item-create-with-initial-
//! stock) live *inside* the backends, behind single trait methods, so no
//! caller can interleave their steps.

pub mod engine;
pub mod store;


pub use engine::LedgerEngine;
pub use store::{
    AppendOutcome, CatalogStore, EntryWithNames, ItemWithCategory, LedgerStore, MemoryStore,
    PostgresStore, Store, UserStore,
};
