use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use stockroom_auth::{authorize, STOCK_STAFF};
use stockroom_catalog::{validate_category_name, Category};
use stockroom_core::CategoryId;

use crate::app::{dto, errors, services::AppServices};
use crate::context::RequestIdentity;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route("/:id", axum::routing::put(update_category).delete(delete_category))
}

pub async fn list_categories(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.store().list_categories().await {
        Ok(categories) => {
            let categories: Vec<dto::CategoryResponse> = categories
                .into_iter()
                .map(dto::CategoryResponse::from)
                .collect();
            (StatusCode::OK, Json(categories)).into_response()
        }
        Err(e) => errors::domain_error_response(e),
    }
}

pub async fn create_category(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<RequestIdentity>,
    Json(body): Json<dto::CategoryNameRequest>,
) -> axum::response::Response {
    if let Err(e) = authorize(identity.role(), STOCK_STAFF) {
        return errors::forbidden(e);
    }
    if let Err(e) = validate_category_name(&body.name) {
        return errors::domain_error_response(e);
    }

    match services.store().insert_category(Category::new(body.name)).await {
        Ok(category) => {
            (StatusCode::CREATED, Json(dto::CategoryResponse::from(category))).into_response()
        }
        Err(e) => errors::domain_error_response(e),
    }
}

pub async fn update_category(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<RequestIdentity>,
    Path(id): Path<String>,
    Json(body): Json<dto::CategoryNameRequest>,
) -> axum::response::Response {
    if let Err(e) = authorize(identity.role(), STOCK_STAFF) {
        return errors::forbidden(e);
    }

    let category_id: CategoryId = match id.parse() {
        Ok(id) => id,
        Err(e) => return errors::domain_error_response(e),
    };
    if let Err(e) = validate_category_name(&body.name) {
        return errors::domain_error_response(e);
    }

    match services.store().rename_category(category_id, body.name).await {
        Ok(category) => (StatusCode::OK, Json(dto::CategoryResponse::from(category))).into_response(),
        Err(e) => errors::domain_error_response(e),
    }
}

pub async fn delete_category(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<RequestIdentity>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = authorize(identity.role(), STOCK_STAFF) {
        return errors::forbidden(e);
    }

    let category_id: CategoryId = match id.parse() {
        Ok(id) => id,
        Err(e) => return errors::domain_error_response(e),
    };

    match services.store().delete_category(category_id).await {
        Ok(()) => errors::json_msg(StatusCode::OK, "Category deleted successfully"),
        Err(e) => errors::domain_error_response(e),
    }
}
