use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use stockroom_auth::AuthzError;
use stockroom_core::DomainError;

/// The error envelope every failure wears: `{ "msg": ... }`.
pub fn json_msg(status: StatusCode, msg: impl Into<String>) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "msg": msg.into(),
        })),
    )
        .into_response()
}

/// Map a domain error onto its fixed status code.
///
/// Storage failures are logged and degrade to a generic message — engine
/// details never reach the wire.
pub fn domain_error_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_msg(StatusCode::BAD_REQUEST, msg),
        DomainError::Authentication(msg) => json_msg(StatusCode::UNAUTHORIZED, msg),
        DomainError::Authorization(msg) => json_msg(StatusCode::FORBIDDEN, msg),
        DomainError::NotFound(entity) => {
            json_msg(StatusCode::NOT_FOUND, format!("{entity} not found"))
        }
        DomainError::Conflict(msg) => json_msg(StatusCode::CONFLICT, msg),
        DomainError::Store(msg) => {
            tracing::error!("storage failure: {msg}");
            json_msg(StatusCode::INTERNAL_SERVER_ERROR, "Server Error")
        }
    }
}

pub fn forbidden(err: AuthzError) -> axum::response::Response {
    json_msg(StatusCode::FORBIDDEN, err.to_string())
}
