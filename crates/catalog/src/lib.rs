//! `stockroom-catalog` — categories and the non-stock side of items.
//!
//! Pure domain types and validation; persistence lives in the store
//! adapters. `Item::current_stock` is owned by the ledger engine — nothing
//! in this crate assigns it.

pub mod category;
pub mod item;

pub use category::{validate_category_name, Category};
pub use item::{
    validate_attributes, validate_item_update, validate_new_item, AttributeMap, Item, ItemUpdate,
    NewItem,
};
