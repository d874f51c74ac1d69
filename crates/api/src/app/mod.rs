use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;

use stockroom_auth::TokenCodec;
use stockroom_infra::Store;

use crate::middleware::{auth_middleware, AuthState};

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Assemble the full router.
///
/// `/health` and `/auth/login` are public; everything else sits behind the
/// token middleware and then behind each handler's explicit role check.
pub fn build_app(store: Arc<dyn Store>, jwt_secret: String) -> Router {
    let tokens = Arc::new(TokenCodec::new(jwt_secret.as_bytes()));
    let auth_state = AuthState {
        tokens: tokens.clone(),
    };
    let services = Arc::new(AppServices::new(store, tokens));

    let protected = Router::new()
        .route("/auth/me", get(routes::auth::me))
        .route("/auth/register", post(routes::auth::register))
        .nest("/users", routes::users::router())
        .nest("/items", routes::items::router())
        .nest("/categories", routes::categories::router())
        .nest("/transactions", routes::transactions::router())
        .nest("/reports", routes::reports::router())
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health))
        .route("/auth/login", post(routes::auth::login))
        .merge(protected)
        .layer(ServiceBuilder::new().layer(Extension(services)))
}

async fn health() -> StatusCode {
    StatusCode::OK
}
