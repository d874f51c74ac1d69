//! `stockroom-ledger` — the inventory ledger's domain rules.
//!
//! An item's stock is never written directly: it is derived from an
//! append-only log of movements. This crate holds the pure half of that
//! contract — entry types, sign normalization, the stock-derivation sum,
//! and the insufficient-stock guard. The atomic check-append-recompute
//! unit is implemented by the store adapters against these rules.

pub mod entry;
pub mod movement;

pub use entry::{EntryType, LedgerEntry};
pub use movement::{check_stock, derived_stock, signed_delta, INITIAL_STOCK_NOTE};
