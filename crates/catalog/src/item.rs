use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use stockroom_core::{CategoryId, DomainError, DomainResult, ItemId};

/// Free-form item attributes: string keys to scalar values.
///
/// The map is opaque to the domain — it is validated for shape (scalars
/// only) and otherwise passed through untouched.
pub type AttributeMap = serde_json::Map<String, JsonValue>;

/// A stock item.
///
/// `current_stock` is a derived projection of the item's ledger history and
/// is written exclusively by the ledger engine's atomic append; everything
/// else here is plain catalog data. Items are never hard-deleted — only
/// deactivated — so ledger entries keep a valid referent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<CategoryId>,
    /// Stock level at or below which the item shows up in the low-stock report.
    pub reorder_level: i64,
    /// Unit cost in the smallest currency unit (e.g. cents).
    pub unit_cost: i64,
    pub attributes: AttributeMap,
    pub current_stock: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields accepted when creating an item. Stock is always created at zero;
/// initial stock arrives as a ledger adjustment, never a direct write.
#[derive(Debug, Clone, Default)]
pub struct NewItem {
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<CategoryId>,
    pub reorder_level: i64,
    pub unit_cost: i64,
    pub attributes: AttributeMap,
}

/// Full replacement of an item's mutable (non-stock) fields.
#[derive(Debug, Clone)]
pub struct ItemUpdate {
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<CategoryId>,
    pub reorder_level: i64,
    pub unit_cost: i64,
    pub attributes: AttributeMap,
}

impl Item {
    /// Materialize a new item at stock zero.
    pub fn create(fields: NewItem, now: DateTime<Utc>) -> Self {
        Self {
            id: ItemId::new(),
            sku: fields.sku,
            name: fields.name,
            description: fields.description,
            category_id: fields.category_id,
            reorder_level: fields.reorder_level,
            unit_cost: fields.unit_cost,
            attributes: fields.attributes,
            current_stock: 0,
            is_active: true,
            created_at: now,
        }
    }

    /// Apply a validated update. `current_stock` and `is_active` are
    /// deliberately untouchable through this path.
    pub fn apply_update(&mut self, update: ItemUpdate) {
        self.name = update.name;
        self.description = update.description;
        self.category_id = update.category_id;
        self.reorder_level = update.reorder_level;
        self.unit_cost = update.unit_cost;
        self.attributes = update.attributes;
    }
}

pub fn validate_new_item(fields: &NewItem) -> DomainResult<()> {
    if fields.sku.trim().is_empty() {
        return Err(DomainError::validation("Please provide a SKU"));
    }
    validate_common(&fields.name, fields.reorder_level, fields.unit_cost, &fields.attributes)
}

pub fn validate_item_update(update: &ItemUpdate) -> DomainResult<()> {
    validate_common(&update.name, update.reorder_level, update.unit_cost, &update.attributes)
}

/// Attributes must stay an open key/value bag of scalars; nested structures
/// are rejected rather than silently flattened.
pub fn validate_attributes(attributes: &AttributeMap) -> DomainResult<()> {
    for (key, value) in attributes {
        match value {
            JsonValue::Null | JsonValue::Bool(_) | JsonValue::Number(_) | JsonValue::String(_) => {}
            JsonValue::Array(_) | JsonValue::Object(_) => {
                return Err(DomainError::validation(format!(
                    "attribute '{key}' must be a scalar value"
                )));
            }
        }
    }
    Ok(())
}

fn validate_common(
    name: &str,
    reorder_level: i64,
    unit_cost: i64,
    attributes: &AttributeMap,
) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("Please provide a name"));
    }
    if reorder_level < 0 {
        return Err(DomainError::validation("Reorder level must not be negative"));
    }
    if unit_cost < 0 {
        return Err(DomainError::validation("Unit cost must not be negative"));
    }
    validate_attributes(attributes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn widget() -> NewItem {
        NewItem {
            sku: "WID-001".to_string(),
            name: "Widget".to_string(),
            reorder_level: 5,
            unit_cost: 250,
            ..Default::default()
        }
    }

    #[test]
    fn new_items_start_at_zero_stock_and_active() {
        let item = Item::create(widget(), Utc::now());
        assert_eq!(item.current_stock, 0);
        assert!(item.is_active);
    }

    #[test]
    fn blank_sku_or_name_is_rejected() {
        let mut fields = widget();
        fields.sku = " ".to_string();
        assert!(validate_new_item(&fields).is_err());

        let mut fields = widget();
        fields.name = String::new();
        assert!(validate_new_item(&fields).is_err());
    }

    #[test]
    fn negative_reorder_level_is_rejected() {
        let mut fields = widget();
        fields.reorder_level = -1;
        assert!(validate_new_item(&fields).is_err());
    }

    #[test]
    fn scalar_attributes_pass_nested_values_fail() {
        let mut fields = widget();
        fields.attributes.insert("color".to_string(), json!("red"));
        fields.attributes.insert("weight_g".to_string(), json!(120));
        fields.attributes.insert("fragile".to_string(), json!(true));
        assert!(validate_new_item(&fields).is_ok());

        fields.attributes.insert("dims".to_string(), json!({"w": 3}));
        assert!(validate_new_item(&fields).is_err());
    }

    #[test]
    fn update_leaves_stock_untouched() {
        let mut item = Item::create(widget(), Utc::now());
        item.current_stock = 42;

        item.apply_update(ItemUpdate {
            name: "Widget v2".to_string(),
            description: Some("improved".to_string()),
            category_id: None,
            reorder_level: 10,
            unit_cost: 300,
            attributes: AttributeMap::new(),
        });

        assert_eq!(item.current_stock, 42);
        assert_eq!(item.name, "Widget v2");
    }
}
