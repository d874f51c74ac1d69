//! Low-stock list and dashboard totals.

use serde::Serialize;

use stockroom_catalog::Item;

/// Headline numbers for the dashboard. Inactive items are invisible here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardTotals {
    pub item_count: u64,
    pub total_stock: i64,
    pub low_stock_count: u64,
}

fn is_low(item: &Item) -> bool {
    item.current_stock <= item.reorder_level
}

/// Active items at or below their reorder threshold.
pub fn low_stock_items(items: &[Item]) -> Vec<&Item> {
    items
        .iter()
        .filter(|item| item.is_active && is_low(item))
        .collect()
}

pub fn dashboard_totals(items: &[Item]) -> DashboardTotals {
    let active: Vec<&Item> = items.iter().filter(|item| item.is_active).collect();
    DashboardTotals {
        item_count: active.len() as u64,
        total_stock: active.iter().map(|item| item.current_stock).sum(),
        low_stock_count: active.iter().filter(|item| is_low(item)).count() as u64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use stockroom_catalog::NewItem;

    fn item(sku: &str, stock: i64, reorder_level: i64, is_active: bool) -> Item {
        let mut item = Item::create(
            NewItem {
                sku: sku.to_string(),
                name: sku.to_string(),
                reorder_level,
                ..Default::default()
            },
            Utc::now(),
        );
        item.current_stock = stock;
        item.is_active = is_active;
        item
    }

    #[test]
    fn low_stock_includes_the_boundary() {
        let items = vec![
            item("AT", 5, 5, true),    // at threshold: low
            item("BELOW", 2, 5, true), // below: low
            item("ABOVE", 6, 5, true), // above: fine
        ];
        let low: Vec<&str> = low_stock_items(&items).iter().map(|i| i.sku.as_str()).collect();
        assert_eq!(low, vec!["AT", "BELOW"]);
    }

    #[test]
    fn inactive_items_are_excluded_everywhere() {
        let items = vec![item("GONE", 0, 5, false), item("LIVE", 10, 5, true)];

        assert!(low_stock_items(&items).is_empty());

        let totals = dashboard_totals(&items);
        assert_eq!(totals.item_count, 1);
        assert_eq!(totals.total_stock, 10);
        assert_eq!(totals.low_stock_count, 0);
    }

    #[test]
    fn totals_sum_active_stock() {
        let items = vec![
            item("A", 3, 0, true),
            item("B", 4, 10, true),
        ];
        let totals = dashboard_totals(&items);
        assert_eq!(totals.item_count, 2);
        assert_eq!(totals.total_stock, 7);
        assert_eq!(totals.low_stock_count, 1);
    }
}
