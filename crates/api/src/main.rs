use std::sync::Arc;

use stockroom_auth::{hash_password, Role, User};
use stockroom_core::UserId;
use stockroom_infra::{MemoryStore, PostgresStore, Store};

#[tokio::main]
async fn main() {
    stockroom_observability::init();

    let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
        tracing::warn!("JWT_SECRET not set; using insecure dev default");
        "dev-secret".to_string()
    });

    let store: Arc<dyn Store> = match std::env::var("DATABASE_URL") {
        Ok(url) => {
            let store = PostgresStore::connect(&url)
                .await
                .expect("failed to connect to database");
            store.migrate().await.expect("failed to run migrations");
            Arc::new(store)
        }
        Err(_) => {
            tracing::warn!("DATABASE_URL not set; using in-memory store (state is not durable)");
            Arc::new(MemoryStore::new())
        }
    };

    bootstrap_admin(store.as_ref()).await;

    let app = stockroom_api::app::build_app(store, jwt_secret);

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(5000);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .expect("failed to bind listener");

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}

/// Seed the first admin account from `ADMIN_USERNAME`/`ADMIN_PASSWORD`, so a
/// fresh deployment has a way in. No-op when the vars are absent or the
/// username is taken.
async fn bootstrap_admin(store: &dyn Store) {
    let (Ok(username), Ok(password)) = (
        std::env::var("ADMIN_USERNAME"),
        std::env::var("ADMIN_PASSWORD"),
    ) else {
        return;
    };

    match store.user_by_username(&username).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            let password_hash = match hash_password(&password) {
                Ok(hash) => hash,
                Err(e) => {
                    tracing::error!("bootstrap admin hashing failed: {e}");
                    return;
                }
            };
            let user = User {
                id: UserId::new(),
                username: username.clone(),
                password_hash,
                role: Role::Admin,
                is_active: true,
                created_at: chrono::Utc::now(),
            };
            match store.insert_user(user).await {
                Ok(_) => tracing::info!("bootstrap admin '{username}' created"),
                Err(e) => tracing::error!("bootstrap admin creation failed: {e}"),
            }
        }
        Err(e) => tracing::error!("bootstrap admin lookup failed: {e}"),
    }
}
