//! Sign normalization, stock derivation, and the insufficient-stock guard.

use stockroom_core::{DomainError, DomainResult};

use crate::entry::{EntryType, LedgerEntry};

/// Note attached to the adjustment that seeds an item's initial stock,
/// making the seed itself ledger-traceable.
pub const INITIAL_STOCK_NOTE: &str = "Initial stock set";

/// Normalize a requested quantity into the signed delta that gets stored.
///
/// - INBOUND is always `+abs(quantity)`
/// - OUTBOUND is always `-abs(quantity)`
/// - ADJUSTMENT is stored as given (negative = loss/damage, positive =
///   found stock or correction)
///
/// A zero quantity is meaningless in a movement ledger and is rejected.
pub fn signed_delta(entry_type: EntryType, quantity: i64) -> DomainResult<i64> {
    if quantity == 0 {
        return Err(DomainError::validation("Quantity must be a non-zero number"));
    }
    Ok(match entry_type {
        EntryType::Inbound => quantity.abs(),
        EntryType::Outbound => -quantity.abs(),
        EntryType::Adjustment => quantity,
    })
}

/// Guard a planned delta against the stock observed inside the atomic unit.
///
/// Stock must never go negative, so any delta that would push it below zero
/// is an insufficient-stock conflict. Callers must evaluate this against a
/// stock figure that cannot move before the entry is appended (row lock or
/// exclusive in-memory guard) — checking against a stale read re-opens the
/// two-concurrent-issues race.
pub fn check_stock(current_stock: i64, delta: i64) -> DomainResult<()> {
    if current_stock + delta < 0 {
        return Err(DomainError::conflict(format!(
            "Insufficient stock. Only {current_stock} available."
        )));
    }
    Ok(())
}

/// Derive an item's stock from its full entry history.
///
/// This is the definition `Item::current_stock` caches; the two must agree
/// at all times.
pub fn derived_stock<'a>(entries: impl IntoIterator<Item = &'a LedgerEntry>) -> i64 {
    entries.into_iter().map(|e| e.quantity).sum()
}
