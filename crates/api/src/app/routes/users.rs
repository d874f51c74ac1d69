use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
    Json, Router,
};

use stockroom_auth::{authorize, Role, UserUpdate, validate_user_update, ADMIN_ONLY};
use stockroom_core::UserId;

use crate::app::{dto, errors, services::AppServices};
use crate::context::RequestIdentity;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_users))
        .route("/:id", put(update_user))
}

pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<RequestIdentity>,
) -> axum::response::Response {
    if let Err(e) = authorize(identity.role(), ADMIN_ONLY) {
        return errors::forbidden(e);
    }

    match services.store().list_users().await {
        Ok(users) => {
            let users: Vec<dto::UserResponse> =
                users.into_iter().map(dto::UserResponse::from).collect();
            (StatusCode::OK, Json(users)).into_response()
        }
        Err(e) => errors::domain_error_response(e),
    }
}

pub async fn update_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<RequestIdentity>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateUserRequest>,
) -> axum::response::Response {
    if let Err(e) = authorize(identity.role(), ADMIN_ONLY) {
        return errors::forbidden(e);
    }

    let user_id: UserId = match id.parse() {
        Ok(id) => id,
        Err(e) => return errors::domain_error_response(e),
    };
    let role: Role = match body.role.parse() {
        Ok(role) => role,
        Err(e) => return errors::domain_error_response(e),
    };

    let update = UserUpdate {
        role,
        is_active: body.is_active,
    };
    // Self-lockout prevention: an admin cannot deactivate their own account.
    if let Err(e) = validate_user_update(identity.user_id(), user_id, &update) {
        return errors::domain_error_response(e);
    }

    match services.store().update_user(user_id, update).await {
        Ok(user) => (StatusCode::OK, Json(dto::UserResponse::from(user))).into_response(),
        Err(e) => errors::domain_error_response(e),
    }
}
