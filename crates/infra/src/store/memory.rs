//! In-memory store backend.
//!
//! Intended for tests/dev. Not optimized for performance. A single `RwLock`
//! over the whole state doubles as the exclusive hold the ledger's atomic
//! unit requires: the write guard is taken once per mutation and never held
//! across an await point.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use stockroom_auth::{User, UserUpdate};
use stockroom_catalog::{Category, Item, ItemUpdate};
use stockroom_core::{CategoryId, DomainError, DomainResult, ItemId, UserId};
use stockroom_ledger::{check_stock, LedgerEntry};

use super::{AppendOutcome, CatalogStore, EntryWithNames, ItemWithCategory, LedgerStore, UserStore};

#[derive(Debug, Default)]
struct MemoryState {
    users: HashMap<UserId, User>,
    categories: HashMap<CategoryId, Category>,
    items: HashMap<ItemId, Item>,
    entries: Vec<LedgerEntry>,
}

/// In-memory store: `HashMap`s plus an append-only entry log.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> DomainResult<std::sync::RwLockReadGuard<'_, MemoryState>> {
        self.state
            .read()
            .map_err(|_| DomainError::store("lock poisoned"))
    }

    fn write(&self) -> DomainResult<std::sync::RwLockWriteGuard<'_, MemoryState>> {
        self.state
            .write()
            .map_err(|_| DomainError::store("lock poisoned"))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: User) -> DomainResult<User> {
        let mut state = self.write()?;
        if state.users.values().any(|u| u.username == user.username) {
            return Err(DomainError::conflict("Username already exists"));
        }
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn user_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        let state = self.read()?;
        Ok(state.users.values().find(|u| u.username == username).cloned())
    }

    async fn user(&self, id: UserId) -> DomainResult<Option<User>> {
        let state = self.read()?;
        Ok(state.users.get(&id).cloned())
    }

    async fn list_users(&self) -> DomainResult<Vec<User>> {
        let state = self.read()?;
        let mut users: Vec<User> = state.users.values().cloned().collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }

    async fn update_user(&self, id: UserId, update: UserUpdate) -> DomainResult<User> {
        let mut state = self.write()?;
        let user = state
            .users
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("User"))?;
        user.role = update.role;
        user.is_active = update.is_active;
        Ok(user.clone())
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn insert_category(&self, category: Category) -> DomainResult<Category> {
        let mut state = self.write()?;
        if state.categories.values().any(|c| c.name == category.name) {
            return Err(DomainError::conflict("Category name already exists"));
        }
        state.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn list_categories(&self) -> DomainResult<Vec<Category>> {
        let state = self.read()?;
        let mut categories: Vec<Category> = state.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn rename_category(&self, id: CategoryId, name: String) -> DomainResult<Category> {
        let mut state = self.write()?;
        if state
            .categories
            .values()
            .any(|c| c.id != id && c.name == name)
        {
            return Err(DomainError::conflict("Category name already exists"));
        }
        let category = state
            .categories
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("Category"))?;
        category.name = name;
        Ok(category.clone())
    }

    async fn delete_category(&self, id: CategoryId) -> DomainResult<()> {
        let mut state = self.write()?;
        if !state.categories.contains_key(&id) {
            return Err(DomainError::not_found("Category"));
        }
        let in_use = state
            .items
            .values()
            .any(|i| i.is_active && i.category_id == Some(id));
        if in_use {
            return Err(DomainError::conflict(
                "Cannot delete category. It is still being used by one or more items.",
            ));
        }
        // Release references held by deactivated items, then drop the row.
        for item in state.items.values_mut() {
            if item.category_id == Some(id) {
                item.category_id = None;
            }
        }
        state.categories.remove(&id);
        Ok(())
    }

    async fn insert_item(&self, mut item: Item, initial: Option<LedgerEntry>) -> DomainResult<Item> {
        let mut state = self.write()?;
        if state.items.values().any(|i| i.sku == item.sku) {
            return Err(DomainError::conflict("SKU already exists"));
        }
        if let Some(category_id) = item.category_id {
            if !state.categories.contains_key(&category_id) {
                return Err(DomainError::not_found("Category"));
            }
        }
        if let Some(entry) = initial {
            check_stock(item.current_stock, entry.quantity)?;
            item.current_stock += entry.quantity;
            state.entries.push(entry);
        }
        state.items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn item(&self, id: ItemId) -> DomainResult<Option<Item>> {
        let state = self.read()?;
        Ok(state.items.get(&id).cloned())
    }

    async fn list_active_items(&self) -> DomainResult<Vec<ItemWithCategory>> {
        let state = self.read()?;
        let mut rows: Vec<ItemWithCategory> = state
            .items
            .values()
            .filter(|i| i.is_active)
            .map(|item| ItemWithCategory {
                item: item.clone(),
                category_name: item
                    .category_id
                    .and_then(|id| state.categories.get(&id))
                    .map(|c| c.name.clone()),
            })
            .collect();
        rows.sort_by(|a, b| a.item.name.cmp(&b.item.name));
        Ok(rows)
    }

    async fn all_items(&self) -> DomainResult<Vec<Item>> {
        let state = self.read()?;
        Ok(state.items.values().cloned().collect())
    }

    async fn update_item(&self, id: ItemId, update: ItemUpdate) -> DomainResult<Item> {
        let mut state = self.write()?;
        if let Some(category_id) = update.category_id {
            if !state.categories.contains_key(&category_id) {
                return Err(DomainError::not_found("Category"));
            }
        }
        let item = state
            .items
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("Item"))?;
        item.apply_update(update);
        Ok(item.clone())
    }

    async fn deactivate_item(&self, id: ItemId) -> DomainResult<Item> {
        let mut state = self.write()?;
        let item = state
            .items
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("Item"))?;
        item.is_active = false;
        Ok(item.clone())
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn append_entry(&self, entry: LedgerEntry) -> DomainResult<AppendOutcome> {
        // One write guard spans check, append, and recompute.
        let mut state = self.write()?;
        let item = state
            .items
            .get_mut(&entry.item_id)
            .ok_or_else(|| DomainError::not_found("Item"))?;
        if !item.is_active {
            return Err(DomainError::validation("Item is inactive"));
        }
        check_stock(item.current_stock, entry.quantity)?;

        let stock_after = item.current_stock + entry.quantity;
        item.current_stock = stock_after;
        state.entries.push(entry.clone());

        Ok(AppendOutcome { entry, stock_after })
    }

    async fn list_entries(&self) -> DomainResult<Vec<EntryWithNames>> {
        let state = self.read()?;
        let mut rows: Vec<EntryWithNames> = state
            .entries
            .iter()
            .map(|entry| EntryWithNames {
                entry: entry.clone(),
                item_name: state
                    .items
                    .get(&entry.item_id)
                    .map(|i| i.name.clone())
                    .unwrap_or_default(),
                user_name: entry
                    .user_id
                    .and_then(|id| state.users.get(&id))
                    .map(|u| u.username.clone()),
            })
            .collect();
        // Newest first; the log itself is append-ordered.
        rows.reverse();
        Ok(rows)
    }

    async fn entries_for_item(&self, item_id: ItemId) -> DomainResult<Vec<LedgerEntry>> {
        let state = self.read()?;
        Ok(state
            .entries
            .iter()
            .filter(|e| e.item_id == item_id)
            .cloned()
            .collect())
    }

    async fn entries_since(&self, cutoff: DateTime<Utc>) -> DomainResult<Vec<LedgerEntry>> {
        let state = self.read()?;
        Ok(state
            .entries
            .iter()
            .filter(|e| e.created_at >= cutoff)
            .cloned()
            .collect())
    }
}
