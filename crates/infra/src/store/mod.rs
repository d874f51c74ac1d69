//! Store contracts shared by the in-memory and Postgres backends.
//!
//! Implementations translate their engine's failures into the domain error
//! taxonomy: unique/foreign-key violations become `Conflict` with a
//! domain-specific message, everything else transient becomes `Store`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use stockroom_auth::{User, UserUpdate};
use stockroom_catalog::{Category, Item, ItemUpdate};
use stockroom_core::{CategoryId, DomainResult, ItemId, UserId};
use stockroom_ledger::LedgerEntry;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// An item joined with its category's name, as the item list renders it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemWithCategory {
    pub item: Item,
    pub category_name: Option<String>,
}

/// A ledger entry joined with display names for the audit log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryWithNames {
    pub entry: LedgerEntry,
    pub item_name: String,
    /// `None` when the entry was system-originated or the user is gone.
    pub user_name: Option<String>,
}

/// Result of an atomic ledger append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendOutcome {
    pub entry: LedgerEntry,
    /// The item's derived stock immediately after the append; read-your-writes
    /// consistent for the caller.
    pub stock_after: i64,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `Conflict` ("Username already exists") on a duplicate name.
    async fn insert_user(&self, user: User) -> DomainResult<User>;

    async fn user_by_username(&self, username: &str) -> DomainResult<Option<User>>;

    async fn user(&self, id: UserId) -> DomainResult<Option<User>>;

    /// All users, ordered by username.
    async fn list_users(&self) -> DomainResult<Vec<User>>;

    /// Updates role/active flag only; the self-lockout rule is checked by the
    /// caller before this point.
    async fn update_user(&self, id: UserId, update: UserUpdate) -> DomainResult<User>;
}

#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Fails with `Conflict` ("Category name already exists") on a duplicate name.
    async fn insert_category(&self, category: Category) -> DomainResult<Category>;

    /// All categories, ordered by name.
    async fn list_categories(&self) -> DomainResult<Vec<Category>>;

    async fn rename_category(&self, id: CategoryId, name: String) -> DomainResult<Category>;

    /// Fails with `Conflict` while any **active** item references the
    /// category; references held by deactivated items are released instead.
    async fn delete_category(&self, id: CategoryId) -> DomainResult<()>;

    /// Atomic unit: persist the item and, when present, its initial-stock
    /// ledger entry — all or nothing. Returns the item with the entry's
    /// delta already reflected in `current_stock`.
    async fn insert_item(&self, item: Item, initial: Option<LedgerEntry>) -> DomainResult<Item>;

    async fn item(&self, id: ItemId) -> DomainResult<Option<Item>>;

    /// Active items with their category names, ordered by item name.
    async fn list_active_items(&self) -> DomainResult<Vec<ItemWithCategory>>;

    /// Every item, active or not (cost lookups for reporting).
    async fn all_items(&self) -> DomainResult<Vec<Item>>;

    /// Updates the non-stock fields only; `current_stock` is untouchable here.
    async fn update_item(&self, id: ItemId, update: ItemUpdate) -> DomainResult<Item>;

    /// Always permitted on an existing item; never a hard delete.
    async fn deactivate_item(&self, id: ItemId) -> DomainResult<Item>;
}

#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// The atomic unit of the ledger: verify the item exists and is active,
    /// guard the delta against the stock observed under the same exclusive
    /// hold, append the entry, and bump `current_stock` — as one
    /// all-or-nothing step. Two concurrent over-draws can never both pass.
    async fn append_entry(&self, entry: LedgerEntry) -> DomainResult<AppendOutcome>;

    /// Full audit log, newest first, with display names joined in.
    async fn list_entries(&self) -> DomainResult<Vec<EntryWithNames>>;

    /// An item's entries in append order.
    async fn entries_for_item(&self, item_id: ItemId) -> DomainResult<Vec<LedgerEntry>>;

    /// Entries created at or after `cutoff` (reporting window).
    async fn entries_since(&self, cutoff: DateTime<Utc>) -> DomainResult<Vec<LedgerEntry>>;
}

/// The full persistence surface, as one object-safe bound for wiring.
pub trait Store: UserStore + CatalogStore + LedgerStore {}

impl<T: UserStore + CatalogStore + LedgerStore> Store for T {}
