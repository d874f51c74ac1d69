use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use chrono::Utc;

use stockroom_auth::{authorize, STOCK_STAFF};
use stockroom_reports::{
    dashboard_totals, low_stock_items, stock_value_series, STOCK_VALUE_WINDOW_DAYS,
};

use crate::app::{dto, errors, services::AppServices};
use crate::context::RequestIdentity;

pub fn router() -> Router {
    Router::new()
        .route("/stock-value", get(stock_value))
        .route("/low-stock", get(low_stock))
        .route("/dashboard", get(dashboard))
}

/// Trailing 30-day cumulative stock-value series for the dashboard chart.
pub async fn stock_value(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let items = match services.store().all_items().await {
        Ok(items) => items,
        Err(e) => return errors::domain_error_response(e),
    };

    let now = Utc::now();
    let today = now.date_naive();
    let window_start = today - chrono::Duration::days(STOCK_VALUE_WINDOW_DAYS - 1);
    let cutoff = window_start
        .and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
        .unwrap_or(now);

    let entries = match services.store().entries_since(cutoff).await {
        Ok(entries) => entries,
        Err(e) => return errors::domain_error_response(e),
    };

    let series = stock_value_series(&items, &entries, today);
    (StatusCode::OK, Json(series)).into_response()
}

pub async fn low_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<RequestIdentity>,
) -> axum::response::Response {
    if let Err(e) = authorize(identity.role(), STOCK_STAFF) {
        return errors::forbidden(e);
    }

    let items = match services.store().all_items().await {
        Ok(items) => items,
        Err(e) => return errors::domain_error_response(e),
    };

    let low: Vec<dto::LowStockItemResponse> = low_stock_items(&items)
        .into_iter()
        .map(dto::LowStockItemResponse::from)
        .collect();
    (StatusCode::OK, Json(low)).into_response()
}

pub async fn dashboard(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let items = match services.store().all_items().await {
        Ok(items) => items,
        Err(e) => return errors::domain_error_response(e),
    };

    (StatusCode::OK, Json(dashboard_totals(&items))).into_response()
}
