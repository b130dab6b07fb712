//! The inventory → product notification cascade: best-effort,
//! fire-and-forget, and observably decoupled from the write response.

mod common;

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use minimart::notify::StockNotifier;
use minimart::services::inventory;
use minimart::verify::RemoteVerifier;

async fn spawn_inventory(auth_url: &str, product_url: &str) -> String {
    let verifier = Arc::new(RemoteVerifier::new(auth_url.to_string()));
    let notifier = StockNotifier::new(product_url.to_string());
    common::spawn(inventory::router(Arc::new(inventory::InventoryState::new(
        verifier, notifier,
    ))))
    .await
}

/// Wait for the mock server to observe `n` requests (the cascade runs on
/// a detached task, so delivery lags the write response).
async fn await_deliveries(server: &MockServer, n: usize) {
    for _ in 0..50 {
        if server.received_requests().await.unwrap_or_default().len() >= n {
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("product service never received {n} notification(s)");
}

#[tokio::test]
async fn stock_depletion_sends_out_of_stock_notification() {
    let auth = common::spawn_auth().await;
    let product = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/products/8/notify"))
        .and(body_json(json!({
            "stock": 0,
            "message": "Product is out of stock",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "received": true })))
        .expect(1)
        .mount(&product)
        .await;

    let svc = spawn_inventory(&auth, &product.uri()).await;
    let client = reqwest::Client::new();
    let token = common::login(&client, &auth, "bob", "password456").await;

    let resp = client
        .put(format!("{svc}/inventory/8"))
        .bearer_auth(&token)
        .json(&json!({ "stock": 0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    await_deliveries(&product, 1).await;
}

#[tokio::test]
async fn low_stock_threshold_is_inclusive_at_five() {
    let auth = common::spawn_auth().await;
    let product = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/products/3/notify"))
        .and(body_json(json!({
            "stock": 5,
            "message": "Product has low stock",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "received": true })))
        .expect(1)
        .mount(&product)
        .await;

    let svc = spawn_inventory(&auth, &product.uri()).await;
    let client = reqwest::Client::new();
    let token = common::login(&client, &auth, "bob", "password456").await;

    let resp = client
        .put(format!("{svc}/inventory/3"))
        .bearer_auth(&token)
        .json(&json!({ "stock": 5 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    await_deliveries(&product, 1).await;
}

#[tokio::test]
async fn restock_sends_normal_update_message() {
    let auth = common::spawn_auth().await;
    let product = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/products/5/notify"))
        .and(body_json(json!({
            "stock": 80,
            "message": "Stock level updated",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "received": true })))
        .expect(1)
        .mount(&product)
        .await;

    let svc = spawn_inventory(&auth, &product.uri()).await;
    let client = reqwest::Client::new();
    let token = common::login(&client, &auth, "alice", "password123").await;

    let resp = client
        .put(format!("{svc}/inventory/5"))
        .bearer_auth(&token)
        .json(&json!({ "stock": 80 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    await_deliveries(&product, 1).await;
}

#[tokio::test]
async fn cascade_failure_never_fails_the_write() {
    let auth = common::spawn_auth().await;
    // Nothing listens here: every notification attempt fails.
    let dead_product = common::unreachable_url().await;
    let svc = spawn_inventory(&auth, &dead_product).await;
    let client = reqwest::Client::new();
    let token = common::login(&client, &auth, "bob", "password456").await;

    let resp = client
        .put(format!("{svc}/inventory/4"))
        .bearer_auth(&token)
        .json(&json!({ "stock": 2 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["inventory"]["stock"], 2);

    // The mutation committed and survives the delivery failure.
    let rec: Value = client
        .get(format!("{svc}/inventory/4"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(rec["stock"], 2);
}

#[tokio::test]
async fn cascade_rejection_is_swallowed_too() {
    let auth = common::spawn_auth().await;
    let product = MockServer::start().await;
    // Product service answers, but with a 404 (record for an unknown product).
    Mock::given(method("POST"))
        .and(path("/products/77/notify"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": "Product not found",
        })))
        .expect(1)
        .mount(&product)
        .await;

    let svc = spawn_inventory(&auth, &product.uri()).await;
    let client = reqwest::Client::new();
    let token = common::login(&client, &auth, "bob", "password456").await;

    // Upsert for a product the catalog has never heard of — referential
    // integrity across services is not enforced.
    let resp = client
        .put(format!("{svc}/inventory/77"))
        .bearer_auth(&token)
        .json(&json!({ "stock": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    await_deliveries(&product, 1).await;
}
