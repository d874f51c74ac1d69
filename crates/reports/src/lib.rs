//! `stockroom-reports` — read-only aggregates over catalog + ledger state.
//!
//! Everything here is a pure function of the snapshots it is handed; the
//! API layer fetches store state and feeds it in. No mutation, no IO.

pub mod stock_value;
pub mod summary;

pub use stock_value::{stock_value_series, StockValuePoint, STOCK_VALUE_WINDOW_DAYS};
pub use summary::{dashboard_totals, low_stock_items, DashboardTotals};
