//! Wire shapes for requests and responses.
//!
//! Role and entry-type fields arrive as plain strings and are parsed
//! explicitly so a bad spelling becomes a 400 with a domain message, not a
//! body-rejection. `current_stock` never appears in any request shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_auth::User;
use stockroom_catalog::{AttributeMap, Category, Item};
use stockroom_core::{CategoryId, EntryId, ItemId, UserId};
use stockroom_infra::{AppendOutcome, EntryWithNames, ItemWithCategory};
use stockroom_ledger::EntryType;

// ── auth / users ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    /// Role name ("Admin", "Keeper", "Worker").
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub role: String,
    pub is_active: bool,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub username: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role.as_str().to_string(),
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

// ── categories ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CategoryNameRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub id: CategoryId,
    pub name: String,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
        }
    }
}

// ── items ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub reorder_level: i64,
    #[serde(default)]
    pub unit_cost: i64,
    #[serde(default)]
    pub attributes: AttributeMap,
    #[serde(default)]
    pub initial_stock: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub reorder_level: i64,
    #[serde(default)]
    pub unit_cost: i64,
    #[serde(default)]
    pub attributes: AttributeMap,
}

#[derive(Debug, Serialize)]
pub struct ItemResponse {
    pub id: ItemId,
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<CategoryId>,
    pub category_name: Option<String>,
    pub reorder_level: i64,
    pub unit_cost: i64,
    pub attributes: AttributeMap,
    pub current_stock: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl ItemResponse {
    pub fn from_item(item: Item, category_name: Option<String>) -> Self {
        Self {
            id: item.id,
            sku: item.sku,
            name: item.name,
            description: item.description,
            category_id: item.category_id,
            category_name,
            reorder_level: item.reorder_level,
            unit_cost: item.unit_cost,
            attributes: item.attributes,
            current_stock: item.current_stock,
            is_active: item.is_active,
            created_at: item.created_at,
        }
    }
}

impl From<ItemWithCategory> for ItemResponse {
    fn from(row: ItemWithCategory) -> Self {
        Self::from_item(row.item, row.category_name)
    }
}

// ── transactions ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    pub item_id: ItemId,
    /// Entry type name ("INBOUND", "OUTBOUND", "ADJUSTMENT").
    #[serde(rename = "type")]
    pub entry_type: String,
    pub quantity: i64,
    #[serde(default)]
    pub note: Option<String>,
}

/// Audit-log row: the entry joined with display names.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    pub id: EntryId,
    pub item_id: ItemId,
    pub item_name: String,
    pub user_name: Option<String>,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub quantity: i64,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<EntryWithNames> for TransactionResponse {
    fn from(row: EntryWithNames) -> Self {
        Self {
            id: row.entry.id,
            item_id: row.entry.item_id,
            item_name: row.item_name,
            user_name: row.user_name,
            entry_type: row.entry.entry_type,
            quantity: row.entry.quantity,
            note: row.entry.note,
            created_at: row.entry.created_at,
        }
    }
}

/// A just-recorded entry, with the item's post-append stock alongside so
/// the caller observes its own write immediately.
#[derive(Debug, Serialize)]
pub struct RecordedTransactionResponse {
    pub id: EntryId,
    pub item_id: ItemId,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub quantity: i64,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub stock_after: i64,
}

impl From<AppendOutcome> for RecordedTransactionResponse {
    fn from(outcome: AppendOutcome) -> Self {
        Self {
            id: outcome.entry.id,
            item_id: outcome.entry.item_id,
            entry_type: outcome.entry.entry_type,
            quantity: outcome.entry.quantity,
            note: outcome.entry.note,
            created_at: outcome.entry.created_at,
            stock_after: outcome.stock_after,
        }
    }
}

// ── reports ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct LowStockItemResponse {
    pub id: ItemId,
    pub sku: String,
    pub name: String,
    pub current_stock: i64,
    pub reorder_level: i64,
}

impl From<&Item> for LowStockItemResponse {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id,
            sku: item.sku.clone(),
            name: item.name.clone(),
            current_stock: item.current_stock,
            reorder_level: item.reorder_level,
        }
    }
}
