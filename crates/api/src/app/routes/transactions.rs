use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use stockroom_auth::{authorize, STOCK_STAFF};
use stockroom_ledger::EntryType;

use crate::app::{dto, errors, services::AppServices};
use crate::context::RequestIdentity;

pub fn router() -> Router {
    Router::new().route("/", get(list_transactions).post(record_transaction))
}

/// Audit log, newest first.
pub async fn list_transactions(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<RequestIdentity>,
) -> axum::response::Response {
    if let Err(e) = authorize(identity.role(), STOCK_STAFF) {
        return errors::forbidden(e);
    }

    match services.store().list_entries().await {
        Ok(rows) => {
            let rows: Vec<dto::TransactionResponse> =
                rows.into_iter().map(dto::TransactionResponse::from).collect();
            (StatusCode::OK, Json(rows)).into_response()
        }
        Err(e) => errors::domain_error_response(e),
    }
}

/// Record a stock movement. Any authenticated role may do this — the floor
/// worker issuing parts is exactly who the ledger is for.
pub async fn record_transaction(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<RequestIdentity>,
    Json(body): Json<dto::CreateTransactionRequest>,
) -> axum::response::Response {
    let entry_type: EntryType = match body.entry_type.parse() {
        Ok(entry_type) => entry_type,
        Err(e) => return errors::domain_error_response(e),
    };

    let outcome = match services
        .engine()
        .record(
            body.item_id,
            entry_type,
            body.quantity,
            Some(identity.user_id()),
            body.note,
        )
        .await
    {
        Ok(outcome) => outcome,
        Err(e) => return errors::domain_error_response(e),
    };

    (
        StatusCode::CREATED,
        Json(dto::RecordedTransactionResponse::from(outcome)),
    )
        .into_response()
}
