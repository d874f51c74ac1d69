use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use stockroom_auth::TokenCodec;

use crate::app::errors;
use crate::context::RequestIdentity;

/// Credential transport: an opaque bearer token in this request header.
pub const AUTH_HEADER: &str = "x-auth-token";

#[derive(Clone)]
pub struct AuthState {
    pub tokens: Arc<TokenCodec>,
}

pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let token = req
        .headers()
        .get(AUTH_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|token| !token.is_empty());

    let Some(token) = token else {
        return errors::json_msg(StatusCode::UNAUTHORIZED, "No token, authorization denied");
    };

    match state.tokens.verify(token, Utc::now()) {
        Ok(claims) => {
            req.extensions_mut()
                .insert(RequestIdentity::new(claims.sub, claims.role));
            next.run(req).await
        }
        Err(_) => errors::json_msg(StatusCode::UNAUTHORIZED, "Token is not valid"),
    }
}
