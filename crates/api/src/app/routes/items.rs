use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, put},
    Json, Router,
};

use stockroom_auth::{authorize, STOCK_STAFF};
use stockroom_catalog::{validate_item_update, ItemUpdate, NewItem};
use stockroom_core::ItemId;

use crate::app::{dto, errors, services::AppServices};
use crate::context::RequestIdentity;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_items).post(create_item))
        .route("/:id", put(update_item))
        .route("/:id/deactivate", delete(deactivate_item))
}

pub async fn list_items(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    // Workers can see items too; authentication alone is enough here.
    match services.store().list_active_items().await {
        Ok(rows) => {
            let items: Vec<dto::ItemResponse> =
                rows.into_iter().map(dto::ItemResponse::from).collect();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => errors::domain_error_response(e),
    }
}

pub async fn create_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<RequestIdentity>,
    Json(body): Json<dto::CreateItemRequest>,
) -> axum::response::Response {
    if let Err(e) = authorize(identity.role(), STOCK_STAFF) {
        return errors::forbidden(e);
    }

    let fields = NewItem {
        sku: body.sku,
        name: body.name,
        description: body.description,
        category_id: body.category_id,
        reorder_level: body.reorder_level,
        unit_cost: body.unit_cost,
        attributes: body.attributes,
    };

    // Item creation at stock zero plus the optional initial-stock adjustment
    // is one atomic engine call; there is no separate stock write.
    let item = match services
        .engine()
        .create_item_with_initial_stock(fields, body.initial_stock, identity.user_id())
        .await
    {
        Ok(item) => item,
        Err(e) => return errors::domain_error_response(e),
    };

    (
        StatusCode::CREATED,
        Json(dto::ItemResponse::from_item(item, None)),
    )
        .into_response()
}

pub async fn update_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<RequestIdentity>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateItemRequest>,
) -> axum::response::Response {
    if let Err(e) = authorize(identity.role(), STOCK_STAFF) {
        return errors::forbidden(e);
    }

    let item_id: ItemId = match id.parse() {
        Ok(id) => id,
        Err(e) => return errors::domain_error_response(e),
    };

    let update = ItemUpdate {
        name: body.name,
        description: body.description,
        category_id: body.category_id,
        reorder_level: body.reorder_level,
        unit_cost: body.unit_cost,
        attributes: body.attributes,
    };
    if let Err(e) = validate_item_update(&update) {
        return errors::domain_error_response(e);
    }

    match services.store().update_item(item_id, update).await {
        Ok(item) => (StatusCode::OK, Json(dto::ItemResponse::from_item(item, None))).into_response(),
        Err(e) => errors::domain_error_response(e),
    }
}

pub async fn deactivate_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<RequestIdentity>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = authorize(identity.role(), STOCK_STAFF) {
        return errors::forbidden(e);
    }

    let item_id: ItemId = match id.parse() {
        Ok(id) => id,
        Err(e) => return errors::domain_error_response(e),
    };

    match services.store().deactivate_item(item_id).await {
        Ok(item) => (StatusCode::OK, Json(dto::ItemResponse::from_item(item, None))).into_response(),
        Err(e) => errors::domain_error_response(e),
    }
}
