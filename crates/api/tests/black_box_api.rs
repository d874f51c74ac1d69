//! Black-box tests over the real router: every request goes through the
//! token middleware and role checks exactly as in production, against the
//! in-memory store.

use std::sync::Arc;

use chrono::Utc;
use reqwest::StatusCode;
use serde_json::json;

use stockroom_auth::{Role, TokenCodec};
use stockroom_core::UserId;
use stockroom_infra::{MemoryStore, Store};

const JWT_SECRET: &str = "test-secret";

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let app = stockroom_api::app::build_app(store, JWT_SECRET.to_string());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{addr}");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint_token(role: Role) -> String {
    TokenCodec::new(JWT_SECRET.as_bytes())
        .issue(UserId::new(), role, Utc::now())
        .expect("failed to mint token")
}

async fn create_item(
    client: &reqwest::Client,
    base_url: &str,
    token: &str,
    sku: &str,
    initial_stock: i64,
) -> serde_json::Value {
    let res = client
        .post(format!("{base_url}/items"))
        .header("x-auth-token", token)
        .json(&json!({
            "sku": sku,
            "name": format!("Item {sku}"),
            "reorder_level": 2,
            "unit_cost": 150,
            "initial_stock": initial_stock,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    res.json().await.unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(format!("{}/health", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn protected_routes_require_a_valid_token() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/items", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["msg"], "No token, authorization denied");

    let res = client
        .get(format!("{}/items", srv.base_url))
        .header("x-auth-token", "garbage")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["msg"], "Token is not valid");
}

#[tokio::test]
async fn register_login_me_round_trip() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let admin_token = mint_token(Role::Admin);

    let res = client
        .post(format!("{}/auth/register", srv.base_url))
        .header("x-auth-token", &admin_token)
        .json(&json!({ "username": "casey", "password": "a long password", "role": "Keeper" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .post(format!("{}/auth/login", srv.base_url))
        .json(&json!({ "username": "casey", "password": "a long password" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    let token = body["token"].as_str().unwrap().to_string();

    let res = client
        .get(format!("{}/auth/me", srv.base_url))
        .header("x-auth-token", &token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["user"]["username"], "casey");
    assert_eq!(body["user"]["role"], "Keeper");
}

#[tokio::test]
async fn login_failure_reveals_no_username_signal() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let admin_token = mint_token(Role::Admin);

    client
        .post(format!("{}/auth/register", srv.base_url))
        .header("x-auth-token", &admin_token)
        .json(&json!({ "username": "casey", "password": "a long password", "role": "Worker" }))
        .send()
        .await
        .unwrap();

    let wrong_password = client
        .post(format!("{}/auth/login", srv.base_url))
        .json(&json!({ "username": "casey", "password": "wrong" }))
        .send()
        .await
        .unwrap();
    let unknown_user = client
        .post(format!("{}/auth/login", srv.base_url))
        .json(&json!({ "username": "nobody", "password": "wrong" }))
        .send()
        .await
        .unwrap();

    assert_eq!(wrong_password.status(), StatusCode::BAD_REQUEST);
    assert_eq!(unknown_user.status(), StatusCode::BAD_REQUEST);

    let a: serde_json::Value = wrong_password.json().await.unwrap();
    let b: serde_json::Value = unknown_user.json().await.unwrap();
    assert_eq!(a, b);
    assert_eq!(a["msg"], "Invalid credentials");
}

#[tokio::test]
async fn item_creation_is_gated_by_role() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/items", srv.base_url))
        .header("x-auth-token", mint_token(Role::Worker))
        .json(&json!({ "sku": "SKU-1", "name": "Widget" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .post(format!("{}/items", srv.base_url))
        .header("x-auth-token", mint_token(Role::Keeper))
        .json(&json!({ "sku": "SKU-1", "name": "Widget" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn initial_stock_arrives_through_the_ledger() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = mint_token(Role::Keeper);

    let item = create_item(&client, &srv.base_url, &token, "SKU-LEDGER", 10).await;
    assert_eq!(item["current_stock"], 10);

    let res = client
        .get(format!("{}/transactions", srv.base_url))
        .header("x-auth-token", &token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let log: serde_json::Value = res.json().await.unwrap();
    let log = log.as_array().unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0]["type"], "ADJUSTMENT");
    assert_eq!(log[0]["quantity"], 10);
    assert_eq!(log[0]["note"], "Initial stock set");
}

#[tokio::test]
async fn outbound_beyond_stock_is_a_conflict() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = mint_token(Role::Keeper);

    let item = create_item(&client, &srv.base_url, &token, "SKU-OUT", 5).await;

    let res = client
        .post(format!("{}/transactions", srv.base_url))
        .header("x-auth-token", &token)
        .json(&json!({ "item_id": item["id"], "type": "OUTBOUND", "quantity": 6 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["msg"], "Insufficient stock. Only 5 available.");
}

#[tokio::test]
async fn outbound_quantities_are_stored_negative() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = mint_token(Role::Keeper);

    let item = create_item(&client, &srv.base_url, &token, "SKU-SIGN", 9).await;

    let res = client
        .post(format!("{}/transactions", srv.base_url))
        .header("x-auth-token", &token)
        .json(&json!({ "item_id": item["id"], "type": "OUTBOUND", "quantity": 7 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["quantity"], -7);
    assert_eq!(body["stock_after"], 2);
}

#[tokio::test]
async fn concurrent_outbounds_cannot_both_succeed() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = mint_token(Role::Keeper);

    let item = create_item(&client, &srv.base_url, &token, "SKU-RACE", 5).await;
    let body = json!({ "item_id": item["id"], "type": "OUTBOUND", "quantity": 3 });

    let first = client
        .post(format!("{}/transactions", srv.base_url))
        .header("x-auth-token", &token)
        .json(&body)
        .send();
    let second = client
        .post(format!("{}/transactions", srv.base_url))
        .header("x-auth-token", &token)
        .json(&body)
        .send();

    let (first, second) = tokio::join!(first, second);
    let statuses = [first.unwrap().status(), second.unwrap().status()];

    assert_eq!(statuses.iter().filter(|s| **s == StatusCode::CREATED).count(), 1);
    assert_eq!(statuses.iter().filter(|s| **s == StatusCode::CONFLICT).count(), 1);

    // Stock ends at 2, never negative.
    let res = client
        .get(format!("{}/items", srv.base_url))
        .header("x-auth-token", &token)
        .send()
        .await
        .unwrap();
    let items: serde_json::Value = res.json().await.unwrap();
    let listed = items
        .as_array()
        .unwrap()
        .iter()
        .find(|i| i["sku"] == "SKU-RACE")
        .unwrap();
    assert_eq!(listed["current_stock"], 2);
}

#[tokio::test]
async fn admins_cannot_deactivate_themselves() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let bootstrap_token = mint_token(Role::Admin);

    // A real admin account, so the caller identity matches a stored row.
    let res = client
        .post(format!("{}/auth/register", srv.base_url))
        .header("x-auth-token", &bootstrap_token)
        .json(&json!({ "username": "root", "password": "a long password", "role": "Admin" }))
        .send()
        .await
        .unwrap();
    let created: serde_json::Value = res.json().await.unwrap();
    let admin_id = created["user"]["id"].as_str().unwrap().to_string();

    let res = client
        .post(format!("{}/auth/login", srv.base_url))
        .json(&json!({ "username": "root", "password": "a long password" }))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    let admin_token = body["token"].as_str().unwrap().to_string();

    let res = client
        .put(format!("{}/users/{admin_id}", srv.base_url))
        .header("x-auth-token", &admin_token)
        .json(&json!({ "role": "Admin", "is_active": false }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // The account is still active: login keeps working.
    let res = client
        .post(format!("{}/auth/login", srv.base_url))
        .json(&json!({ "username": "root", "password": "a long password" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn user_management_is_admin_only() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for role in [Role::Keeper, Role::Worker] {
        let res = client
            .get(format!("{}/users", srv.base_url))
            .header("x-auth-token", mint_token(role))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    let res = client
        .get(format!("{}/users", srv.base_url))
        .header("x-auth-token", mint_token(Role::Admin))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn category_deletion_guard() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = mint_token(Role::Admin);

    let res = client
        .post(format!("{}/categories", srv.base_url))
        .header("x-auth-token", &token)
        .json(&json!({ "name": "Electronics" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let category: serde_json::Value = res.json().await.unwrap();
    let category_id = category["id"].as_str().unwrap().to_string();

    // Duplicate name is a conflict.
    let res = client
        .post(format!("{}/categories", srv.base_url))
        .header("x-auth-token", &token)
        .json(&json!({ "name": "Electronics" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    // An active item pins the category.
    let res = client
        .post(format!("{}/items", srv.base_url))
        .header("x-auth-token", &token)
        .json(&json!({ "sku": "SKU-CAT", "name": "Cabled thing", "category_id": category_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let item: serde_json::Value = res.json().await.unwrap();
    let item_id = item["id"].as_str().unwrap().to_string();

    let res = client
        .delete(format!("{}/categories/{category_id}", srv.base_url))
        .header("x-auth-token", &token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    // Deactivating the item releases it.
    let res = client
        .delete(format!("{}/items/{item_id}/deactivate", srv.base_url))
        .header("x-auth-token", &token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .delete(format!("{}/categories/{category_id}", srv.base_url))
        .header("x-auth-token", &token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn repeated_item_listings_are_identical() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = mint_token(Role::Keeper);

    create_item(&client, &srv.base_url, &token, "SKU-A", 4).await;
    create_item(&client, &srv.base_url, &token, "SKU-B", 0).await;

    let mut bodies = Vec::new();
    for _ in 0..2 {
        let res = client
            .get(format!("{}/items", srv.base_url))
            .header("x-auth-token", &token)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        bodies.push(res.text().await.unwrap());
    }
    assert_eq!(bodies[0], bodies[1]);
}

#[tokio::test]
async fn stock_value_report_is_a_continuous_series() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = mint_token(Role::Keeper);

    // 4 units at unit_cost 150 today.
    create_item(&client, &srv.base_url, &token, "SKU-CHART", 4).await;

    let res = client
        .get(format!("{}/reports/stock-value", srv.base_url))
        .header("x-auth-token", mint_token(Role::Worker))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let series: serde_json::Value = res.json().await.unwrap();
    let series = series.as_array().unwrap();

    assert_eq!(series.len(), 30);
    assert_eq!(series[0]["cumulative_value"], 0);
    assert_eq!(series.last().unwrap()["cumulative_value"], 600);
}

#[tokio::test]
async fn any_role_records_movements_but_only_staff_read_the_log() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let keeper = mint_token(Role::Keeper);
    let worker = mint_token(Role::Worker);

    let item = create_item(&client, &srv.base_url, &keeper, "SKU-FLOOR", 6).await;

    // The floor worker issues parts.
    let res = client
        .post(format!("{}/transactions", srv.base_url))
        .header("x-auth-token", &worker)
        .json(&json!({ "item_id": item["id"], "type": "OUTBOUND", "quantity": 2 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    // But cannot read the audit log.
    let res = client
        .get(format!("{}/transactions", srv.base_url))
        .header("x-auth-token", &worker)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn dashboard_totals_reflect_active_items() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = mint_token(Role::Keeper);

    // reorder_level is 2 in the helper: the zero-stock item counts as low.
    create_item(&client, &srv.base_url, &token, "SKU-D1", 4).await;
    create_item(&client, &srv.base_url, &token, "SKU-D2", 0).await;

    let res = client
        .get(format!("{}/reports/dashboard", srv.base_url))
        .header("x-auth-token", mint_token(Role::Worker))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let totals: serde_json::Value = res.json().await.unwrap();
    assert_eq!(totals["item_count"], 2);
    assert_eq!(totals["total_stock"], 4);
    assert_eq!(totals["low_stock_count"], 1);
}

#[tokio::test]
async fn low_stock_report_flags_threshold_items() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = mint_token(Role::Keeper);

    // reorder_level is 2 in the helper: one item at the threshold, one above.
    create_item(&client, &srv.base_url, &token, "SKU-LOW", 2).await;
    create_item(&client, &srv.base_url, &token, "SKU-OK", 8).await;

    let res = client
        .get(format!("{}/reports/low-stock", srv.base_url))
        .header("x-auth-token", &token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let low: serde_json::Value = res.json().await.unwrap();
    let low = low.as_array().unwrap();
    assert_eq!(low.len(), 1);
    assert_eq!(low[0]["sku"], "SKU-LOW");

    // Workers cannot read it.
    let res = client
        .get(format!("{}/reports/low-stock", srv.base_url))
        .header("x-auth-token", mint_token(Role::Worker))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}
