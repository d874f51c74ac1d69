//! Stock-value time series for the dashboard chart.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use stockroom_catalog::Item;
use stockroom_core::ItemId;
use stockroom_ledger::LedgerEntry;

/// Trailing window length, in days, including today.
pub const STOCK_VALUE_WINDOW_DAYS: i64 = 30;

/// One point per calendar day.
///
/// The series is continuous: days with no movements still appear, carrying
/// the running total forward, so the consuming chart gets an unbroken
/// x-axis. `cumulative_value` runs from a zero base at the window start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockValuePoint {
    pub date: NaiveDate,
    pub cumulative_value: i64,
}

/// Value of stock movements per day, accumulated chronologically over the
/// trailing window ending at `today`.
///
/// Each entry contributes `quantity × unit_cost` of its item (active or
/// not — movements of since-deactivated items still happened). Entries
/// outside the window or referencing an unknown item contribute nothing.
/// Deterministic for a given snapshot.
pub fn stock_value_series(
    items: &[Item],
    entries: &[LedgerEntry],
    today: NaiveDate,
) -> Vec<StockValuePoint> {
    let cost_by_item: HashMap<ItemId, i64> =
        items.iter().map(|item| (item.id, item.unit_cost)).collect();

    let window_start = today - chrono::Duration::days(STOCK_VALUE_WINDOW_DAYS - 1);

    let mut delta_by_day: HashMap<NaiveDate, i64> = HashMap::new();
    for entry in entries {
        let day = entry.created_at.date_naive();
        if day < window_start || day > today {
            continue;
        }
        let Some(unit_cost) = cost_by_item.get(&entry.item_id) else {
            continue;
        };
        *delta_by_day.entry(day).or_default() += entry.quantity * unit_cost;
    }

    let mut series = Vec::with_capacity(STOCK_VALUE_WINDOW_DAYS as usize);
    let mut cumulative = 0i64;
    let mut day = window_start;
    while day <= today {
        cumulative += delta_by_day.get(&day).copied().unwrap_or(0);
        series.push(StockValuePoint {
            date: day,
            cumulative_value: cumulative,
        });
        day += chrono::Duration::days(1);
    }
    series
}
