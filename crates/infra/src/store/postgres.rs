//! Postgres store backend (sqlx).
//!
//! Every query is tenant-free and runtime-bound (`query` + `bind` +
//! `try_get`). The ledger's atomic unit takes a `SELECT ... FOR UPDATE` row
//! lock so the check-append-recompute sequence for one item is linear even
//! under concurrent load; cross-item appends do not contend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use stockroom_auth::{Role, User, UserUpdate};
use stockroom_catalog::{AttributeMap, Category, Item, ItemUpdate};
use stockroom_core::{CategoryId, DomainError, DomainResult, EntryId, ItemId, UserId};
use stockroom_ledger::{check_stock, EntryType, LedgerEntry};

use super::{AppendOutcome, CatalogStore, EntryWithNames, ItemWithCategory, LedgerStore, UserStore};

/// Postgres-backed store.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> DomainResult<Self> {
        let pool = PgPool::connect(database_url).await.map_err(store_err)?;
        Ok(Self::new(pool))
    }

    /// Apply the embedded schema migrations.
    pub async fn migrate(&self) -> DomainResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| DomainError::store(e.to_string()))?;
        tracing::info!("database migrations applied");
        Ok(())
    }
}

fn store_err(err: sqlx::Error) -> DomainError {
    DomainError::store(err.to_string())
}

/// Duplicate unique key (Postgres error 23505).
fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .map(|code| code == "23505")
        .unwrap_or(false)
}

fn conflict_on_unique(err: sqlx::Error, msg: &'static str) -> DomainError {
    if is_unique_violation(&err) {
        DomainError::conflict(msg)
    } else {
        store_err(err)
    }
}

fn user_from_row(row: &PgRow) -> DomainResult<User> {
    let role: String = row.try_get("role").map_err(store_err)?;
    Ok(User {
        id: UserId::from_uuid(row.try_get("id").map_err(store_err)?),
        username: row.try_get("username").map_err(store_err)?,
        password_hash: row.try_get("password_hash").map_err(store_err)?,
        role: role
            .parse::<Role>()
            .map_err(|_| DomainError::store(format!("corrupt role value '{role}'")))?,
        is_active: row.try_get("is_active").map_err(store_err)?,
        created_at: row.try_get("created_at").map_err(store_err)?,
    })
}

fn item_from_row(row: &PgRow) -> DomainResult<Item> {
    let attributes: JsonValue = row.try_get("attributes").map_err(store_err)?;
    let attributes = match attributes {
        JsonValue::Object(map) => map,
        _ => AttributeMap::new(),
    };
    Ok(Item {
        id: ItemId::from_uuid(row.try_get("id").map_err(store_err)?),
        sku: row.try_get("sku").map_err(store_err)?,
        name: row.try_get("name").map_err(store_err)?,
        description: row.try_get("description").map_err(store_err)?,
        category_id: row
            .try_get::<Option<Uuid>, _>("category_id")
            .map_err(store_err)?
            .map(CategoryId::from_uuid),
        reorder_level: row.try_get("reorder_level").map_err(store_err)?,
        unit_cost: row.try_get("unit_cost").map_err(store_err)?,
        attributes,
        current_stock: row.try_get("current_stock").map_err(store_err)?,
        is_active: row.try_get("is_active").map_err(store_err)?,
        created_at: row.try_get("created_at").map_err(store_err)?,
    })
}

fn entry_from_row(row: &PgRow) -> DomainResult<LedgerEntry> {
    let entry_type: String = row.try_get("entry_type").map_err(store_err)?;
    let entry_type = entry_type
        .parse::<EntryType>()
        .map_err(|_| DomainError::store(format!("corrupt entry_type value '{entry_type}'")))?;
    Ok(LedgerEntry {
        id: EntryId::from_uuid(row.try_get("id").map_err(store_err)?),
        item_id: ItemId::from_uuid(row.try_get("item_id").map_err(store_err)?),
        user_id: row
            .try_get::<Option<Uuid>, _>("user_id")
            .map_err(store_err)?
            .map(UserId::from_uuid),
        entry_type,
        quantity: row.try_get("quantity").map_err(store_err)?,
        note: row.try_get("note").map_err(store_err)?,
        created_at: row.try_get("created_at").map_err(store_err)?,
    })
}

#[async_trait]
impl UserStore for PostgresStore {
    async fn insert_user(&self, user: User) -> DomainResult<User> {
        sqlx::query(
            "INSERT INTO users (id, username, password_hash, role, is_active, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(user.id.as_uuid())
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.is_active)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "Username already exists"))?;
        Ok(user)
    }

    async fn user_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_err)?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn user(&self, id: UserId) -> DomainResult<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(store_err)?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn list_users(&self) -> DomainResult<Vec<User>> {
        let rows = sqlx::query("SELECT * FROM users ORDER BY username ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(store_err)?;
        rows.iter().map(user_from_row).collect()
    }

    async fn update_user(&self, id: UserId, update: UserUpdate) -> DomainResult<User> {
        let row = sqlx::query(
            "UPDATE users SET role = $1, is_active = $2 WHERE id = $3 RETURNING *",
        )
        .bind(update.role.as_str())
        .bind(update.is_active)
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err)?;
        match row {
            Some(row) => user_from_row(&row),
            None => Err(DomainError::not_found("User")),
        }
    }
}

#[async_trait]
impl CatalogStore for PostgresStore {
    async fn insert_category(&self, category: Category) -> DomainResult<Category> {
        sqlx::query("INSERT INTO categories (id, name) VALUES ($1, $2)")
            .bind(category.id.as_uuid())
            .bind(&category.name)
            .execute(&self.pool)
            .await
            .map_err(|e| conflict_on_unique(e, "Category name already exists"))?;
        Ok(category)
    }

    async fn list_categories(&self) -> DomainResult<Vec<Category>> {
        let rows = sqlx::query("SELECT id, name FROM categories ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(store_err)?;
        rows.iter()
            .map(|row| {
                Ok(Category {
                    id: CategoryId::from_uuid(row.try_get("id").map_err(store_err)?),
                    name: row.try_get("name").map_err(store_err)?,
                })
            })
            .collect()
    }

    async fn rename_category(&self, id: CategoryId, name: String) -> DomainResult<Category> {
        let row = sqlx::query("UPDATE categories SET name = $1 WHERE id = $2 RETURNING id, name")
            .bind(&name)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| conflict_on_unique(e, "Category name already exists"))?;
        match row {
            Some(row) => Ok(Category {
                id: CategoryId::from_uuid(row.try_get("id").map_err(store_err)?),
                name: row.try_get("name").map_err(store_err)?,
            }),
            None => Err(DomainError::not_found("Category")),
        }
    }

    async fn delete_category(&self, id: CategoryId) -> DomainResult<()> {
        let mut tx = self.pool.begin().await.map_err(store_err)?;

        let row = sqlx::query(
            "SELECT EXISTS(SELECT 1 FROM items WHERE category_id = $1 AND is_active) AS in_use",
        )
        .bind(id.as_uuid())
        .fetch_one(&mut *tx)
        .await
        .map_err(store_err)?;
        let in_use: bool = row.try_get("in_use").map_err(store_err)?;
        if in_use {
            return Err(DomainError::conflict(
                "Cannot delete category. It is still being used by one or more items.",
            ));
        }

        // Deactivated items release their reference (FK is ON DELETE SET NULL).
        let deleted = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(store_err)?;
        if deleted.rows_affected() == 0 {
            return Err(DomainError::not_found("Category"));
        }

        tx.commit().await.map_err(store_err)
    }

    async fn insert_item(&self, mut item: Item, initial: Option<LedgerEntry>) -> DomainResult<Item> {
        let mut tx = self.pool.begin().await.map_err(store_err)?;

        if let Some(category_id) = item.category_id {
            let exists = sqlx::query("SELECT 1 FROM categories WHERE id = $1")
                .bind(category_id.as_uuid())
                .fetch_optional(&mut *tx)
                .await
                .map_err(store_err)?;
            if exists.is_none() {
                return Err(DomainError::not_found("Category"));
            }
        }

        sqlx::query(
            "INSERT INTO items (id, sku, name, description, category_id, reorder_level, unit_cost, attributes, current_stock, is_active, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(item.id.as_uuid())
        .bind(&item.sku)
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.category_id.map(|c| *c.as_uuid()))
        .bind(item.reorder_level)
        .bind(item.unit_cost)
        .bind(JsonValue::Object(item.attributes.clone()))
        .bind(item.current_stock)
        .bind(item.is_active)
        .bind(item.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| conflict_on_unique(e, "SKU already exists"))?;

        if let Some(entry) = initial {
            check_stock(item.current_stock, entry.quantity)?;
            insert_entry_row(&mut tx, &entry).await?;
            let row = sqlx::query(
                "UPDATE items SET current_stock = current_stock + $2 WHERE id = $1 RETURNING current_stock",
            )
            .bind(item.id.as_uuid())
            .bind(entry.quantity)
            .fetch_one(&mut *tx)
            .await
            .map_err(store_err)?;
            item.current_stock = row.try_get("current_stock").map_err(store_err)?;
        }

        tx.commit().await.map_err(store_err)?;
        Ok(item)
    }

    async fn item(&self, id: ItemId) -> DomainResult<Option<Item>> {
        let row = sqlx::query("SELECT * FROM items WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(store_err)?;
        row.as_ref().map(item_from_row).transpose()
    }

    async fn list_active_items(&self) -> DomainResult<Vec<ItemWithCategory>> {
        let rows = sqlx::query(
            "SELECT i.id, i.sku, i.name, i.description, i.category_id, i.reorder_level,
                    i.unit_cost, i.attributes, i.current_stock, i.is_active, i.created_at,
                    c.name AS category_name
             FROM items i
             LEFT JOIN categories c ON i.category_id = c.id
             WHERE i.is_active
             ORDER BY i.name ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;
        rows.iter()
            .map(|row| {
                Ok(ItemWithCategory {
                    item: item_from_row(row)?,
                    category_name: row.try_get("category_name").map_err(store_err)?,
                })
            })
            .collect()
    }

    async fn all_items(&self) -> DomainResult<Vec<Item>> {
        let rows = sqlx::query("SELECT * FROM items")
            .fetch_all(&self.pool)
            .await
            .map_err(store_err)?;
        rows.iter().map(item_from_row).collect()
    }

    async fn update_item(&self, id: ItemId, update: ItemUpdate) -> DomainResult<Item> {
        let mut tx = self.pool.begin().await.map_err(store_err)?;

        if let Some(category_id) = update.category_id {
            let exists = sqlx::query("SELECT 1 FROM categories WHERE id = $1")
                .bind(category_id.as_uuid())
                .fetch_optional(&mut *tx)
                .await
                .map_err(store_err)?;
            if exists.is_none() {
                return Err(DomainError::not_found("Category"));
            }
        }

        let row = sqlx::query(
            "UPDATE items
             SET name = $1, description = $2, category_id = $3, reorder_level = $4, unit_cost = $5, attributes = $6
             WHERE id = $7
             RETURNING *",
        )
        .bind(&update.name)
        .bind(&update.description)
        .bind(update.category_id.map(|c| *c.as_uuid()))
        .bind(update.reorder_level)
        .bind(update.unit_cost)
        .bind(JsonValue::Object(update.attributes.clone()))
        .bind(id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(store_err)?;

        let item = match row {
            Some(row) => item_from_row(&row)?,
            None => return Err(DomainError::not_found("Item")),
        };

        tx.commit().await.map_err(store_err)?;
        Ok(item)
    }

    async fn deactivate_item(&self, id: ItemId) -> DomainResult<Item> {
        let row = sqlx::query("UPDATE items SET is_active = FALSE WHERE id = $1 RETURNING *")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(store_err)?;
        match row {
            Some(row) => item_from_row(&row),
            None => Err(DomainError::not_found("Item")),
        }
    }
}

async fn insert_entry_row(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    entry: &LedgerEntry,
) -> DomainResult<()> {
    sqlx::query(
        "INSERT INTO inventory_transactions (id, item_id, user_id, entry_type, quantity, note, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(entry.id.as_uuid())
    .bind(entry.item_id.as_uuid())
    .bind(entry.user_id.map(|u| *u.as_uuid()))
    .bind(entry.entry_type.as_str())
    .bind(entry.quantity)
    .bind(&entry.note)
    .bind(entry.created_at)
    .execute(&mut **tx)
    .await
    .map_err(store_err)?;
    Ok(())
}

#[async_trait]
impl LedgerStore for PostgresStore {
    async fn append_entry(&self, entry: LedgerEntry) -> DomainResult<AppendOutcome> {
        let mut tx = self.pool.begin().await.map_err(store_err)?;

        // Row lock: concurrent appends against the same item serialize here,
        // so the stock figure the guard sees cannot go stale before commit.
        let row = sqlx::query("SELECT current_stock, is_active FROM items WHERE id = $1 FOR UPDATE")
            .bind(entry.item_id.as_uuid())
            .fetch_optional(&mut *tx)
            .await
            .map_err(store_err)?;
        let Some(row) = row else {
            return Err(DomainError::not_found("Item"));
        };
        let current_stock: i64 = row.try_get("current_stock").map_err(store_err)?;
        let is_active: bool = row.try_get("is_active").map_err(store_err)?;
        if !is_active {
            return Err(DomainError::validation("Item is inactive"));
        }
        check_stock(current_stock, entry.quantity)?;

        insert_entry_row(&mut tx, &entry).await?;

        let row = sqlx::query(
            "UPDATE items SET current_stock = current_stock + $2 WHERE id = $1 RETURNING current_stock",
        )
        .bind(entry.item_id.as_uuid())
        .bind(entry.quantity)
        .fetch_one(&mut *tx)
        .await
        .map_err(store_err)?;
        let stock_after: i64 = row.try_get("current_stock").map_err(store_err)?;

        tx.commit().await.map_err(store_err)?;
        Ok(AppendOutcome { entry, stock_after })
    }

    async fn list_entries(&self) -> DomainResult<Vec<EntryWithNames>> {
        let rows = sqlx::query(
            "SELECT t.id, t.item_id, t.user_id, t.entry_type, t.quantity, t.note, t.created_at,
                    i.name AS item_name, u.username AS user_name
             FROM inventory_transactions t
             JOIN items i ON t.item_id = i.id
             LEFT JOIN users u ON t.user_id = u.id
             ORDER BY t.created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;
        rows.iter()
            .map(|row| {
                Ok(EntryWithNames {
                    entry: entry_from_row(row)?,
                    item_name: row.try_get("item_name").map_err(store_err)?,
                    user_name: row.try_get("user_name").map_err(store_err)?,
                })
            })
            .collect()
    }

    async fn entries_for_item(&self, item_id: ItemId) -> DomainResult<Vec<LedgerEntry>> {
        let rows = sqlx::query(
            "SELECT * FROM inventory_transactions WHERE item_id = $1 ORDER BY created_at ASC",
        )
        .bind(item_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;
        rows.iter().map(entry_from_row).collect()
    }

    async fn entries_since(&self, cutoff: DateTime<Utc>) -> DomainResult<Vec<LedgerEntry>> {
        let rows = sqlx::query(
            "SELECT * FROM inventory_transactions WHERE created_at >= $1 ORDER BY created_at ASC",
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;
        rows.iter().map(entry_from_row).collect()
    }
}
