use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;

use stockroom_auth::{
    authorize, hash_password, validate_registration, verify_password, NewUser, Role, User,
    ADMIN_ONLY,
};
use stockroom_core::UserId;

use crate::app::{dto, errors, services::AppServices};
use crate::context::RequestIdentity;

/// Wrong username and wrong password are indistinguishable on the wire —
/// same status, same message — so the endpoint leaks no username signal.
fn invalid_credentials() -> axum::response::Response {
    errors::json_msg(StatusCode::BAD_REQUEST, "Invalid credentials")
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    let user = match services.store().user_by_username(&body.username).await {
        Ok(user) => user,
        Err(e) => return errors::domain_error_response(e),
    };

    let Some(user) = user else {
        return invalid_credentials();
    };
    // Deactivated accounts fail the same way as bad credentials.
    if !user.is_active || !verify_password(&body.password, &user.password_hash) {
        return invalid_credentials();
    }

    let token = match services.tokens().issue(user.id, user.role, Utc::now()) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("token issuance failed: {e}");
            return errors::json_msg(StatusCode::INTERNAL_SERVER_ERROR, "Server Error");
        }
    };

    (StatusCode::OK, Json(serde_json::json!({ "token": token }))).into_response()
}

pub async fn me(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<RequestIdentity>,
) -> axum::response::Response {
    let user = match services.store().user(identity.user_id()).await {
        Ok(user) => user,
        Err(e) => return errors::domain_error_response(e),
    };

    match user {
        Some(user) => (
            StatusCode::OK,
            Json(serde_json::json!({ "user": dto::UserResponse::from(user) })),
        )
            .into_response(),
        None => errors::json_msg(StatusCode::NOT_FOUND, "User not found"),
    }
}

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<RequestIdentity>,
    Json(body): Json<dto::RegisterRequest>,
) -> axum::response::Response {
    if let Err(e) = authorize(identity.role(), ADMIN_ONLY) {
        return errors::forbidden(e);
    }

    let role: Role = match body.role.parse() {
        Ok(role) => role,
        Err(e) => return errors::domain_error_response(e),
    };

    let new_user = NewUser {
        username: body.username,
        password: body.password,
        role,
    };
    if let Err(e) = validate_registration(&new_user) {
        return errors::domain_error_response(e);
    }

    let password_hash = match hash_password(&new_user.password) {
        Ok(hash) => hash,
        Err(e) => return errors::domain_error_response(e),
    };

    let user = User {
        id: UserId::new(),
        username: new_user.username,
        password_hash,
        role: new_user.role,
        is_active: true,
        created_at: Utc::now(),
    };

    match services.store().insert_user(user).await {
        Ok(user) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "msg": "User created successfully",
                "user": dto::UserResponse::from(user),
            })),
        )
            .into_response(),
        Err(e) => errors::domain_error_response(e),
    }
}
