use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, EntryId, ItemId, UserId};

/// Kind of stock movement.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntryType {
    /// Stock received; stored as a positive delta.
    Inbound,
    /// Stock issued; stored as a negative delta.
    Outbound,
    /// Correction (damage, loss, found stock, initial stock); stored as given.
    Adjustment,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Inbound => "INBOUND",
            EntryType::Outbound => "OUTBOUND",
            EntryType::Adjustment => "ADJUSTMENT",
        }
    }
}

impl core::fmt::Display for EntryType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INBOUND" => Ok(EntryType::Inbound),
            "OUTBOUND" => Ok(EntryType::Outbound),
            "ADJUSTMENT" => Ok(EntryType::Adjustment),
            _ => Err(DomainError::validation(
                "Type must be one of INBOUND, OUTBOUND, ADJUSTMENT",
            )),
        }
    }
}

/// One immutable record of a stock movement.
///
/// Entries are append-only: corrections are new ADJUSTMENT entries, never
/// edits or deletes of prior ones. `quantity` is the signed, normalized
/// delta (see [`crate::movement::signed_delta`]); the sum of an item's
/// entries *is* its stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: EntryId,
    pub item_id: ItemId,
    /// Who performed the movement; `None` for system-originated entries.
    pub user_id: Option<UserId>,
    pub entry_type: EntryType,
    pub quantity: i64,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Build an entry from an already-normalized delta.
    pub fn new(
        item_id: ItemId,
        user_id: Option<UserId>,
        entry_type: EntryType,
        quantity: i64,
        note: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: EntryId::new(),
            item_id,
            user_id,
            entry_type,
            quantity,
            note,
            created_at,
        }
    }
}
