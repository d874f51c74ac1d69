//! Ledger engine: the single writer of stock.
//!
//! Handlers never touch `LedgerEntry` construction or `current_stock`
//! directly — they hand the engine a movement request and the engine
//! normalizes it, builds the immutable entry, and drives the store's
//! atomic unit. Post-append stock comes back with the entry, so a caller
//! observes its own write immediately.

use std::sync::Arc;

use chrono::Utc;

use stockroom_catalog::{validate_new_item, Item, NewItem};
use stockroom_core::{DomainError, DomainResult, ItemId, UserId};
use stockroom_ledger::{signed_delta, EntryType, LedgerEntry, INITIAL_STOCK_NOTE};

use crate::store::{AppendOutcome, Store};

#[derive(Clone)]
pub struct LedgerEngine {
    store: Arc<dyn Store>,
}

impl LedgerEngine {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Record a stock movement.
    ///
    /// Normalizes the quantity's sign per entry type, then appends through
    /// the store's atomic check-append-recompute unit. Insufficient stock
    /// on a negative delta surfaces as a `Conflict`.
    pub async fn record(
        &self,
        item_id: ItemId,
        entry_type: EntryType,
        quantity: i64,
        user_id: Option<UserId>,
        note: Option<String>,
    ) -> DomainResult<AppendOutcome> {
        let delta = signed_delta(entry_type, quantity)?;
        let entry = LedgerEntry::new(item_id, user_id, entry_type, delta, note, Utc::now());
        self.store.append_entry(entry).await
    }

    /// Create an item and, when `initial_stock > 0`, seed its stock through
    /// the ledger — one all-or-nothing unit, so the seed entry and the item
    /// can never exist without each other.
    ///
    /// The seed is an ADJUSTMENT attributed to the creating user, making
    /// initial stock ledger-traceable instead of a bypass write.
    pub async fn create_item_with_initial_stock(
        &self,
        fields: NewItem,
        initial_stock: i64,
        user_id: UserId,
    ) -> DomainResult<Item> {
        validate_new_item(&fields)?;
        if initial_stock < 0 {
            return Err(DomainError::validation("Initial stock must not be negative"));
        }

        let item = Item::create(fields, Utc::now());
        let initial = if initial_stock > 0 {
            let delta = signed_delta(EntryType::Adjustment, initial_stock)?;
            Some(LedgerEntry::new(
                item.id,
                Some(user_id),
                EntryType::Adjustment,
                delta,
                Some(INITIAL_STOCK_NOTE.to_string()),
                item.created_at,
            ))
        } else {
            None
        };

        self.store.insert_item(item, initial).await
    }
}
