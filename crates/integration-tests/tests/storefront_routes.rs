//! End-to-end tests of the storefront HTTP surface.
//!
//! Starts a mock catalog and a storefront wired to it, then talks to the
//! storefront over HTTP with a cookie-keeping client so the session cart
//! persists between requests.

#![allow(clippy::unwrap_used)]

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use vitrine_integration_tests::{CategoryShape, MockCatalog, session_client, spawn_storefront};

struct TestContext {
    _catalog: MockCatalog,
    base_url: String,
    client: Client,
}

impl TestContext {
    async fn new() -> Self {
        let catalog = MockCatalog::start(CategoryShape::Names).await;
        let base_url = spawn_storefront(&catalog, 12).await;
        Self {
            _catalog: catalog,
            base_url,
            client: session_client(),
        }
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        let resp = self
            .client
            .get(format!("{}{path}", self.base_url))
            .send()
            .await
            .unwrap();
        let status = resp.status();
        (status, resp.json().await.unwrap_or(Value::Null))
    }

    async fn post(&self, path: &str, body: &Value) -> (StatusCode, Value) {
        let resp = self
            .client
            .post(format!("{}{path}", self.base_url))
            .json(body)
            .send()
            .await
            .unwrap();
        let status = resp.status();
        (status, resp.json().await.unwrap_or(Value::Null))
    }
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_has_request_id() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .client
        .get(format!("{}/health", ctx.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
    assert_eq!(resp.text().await.unwrap(), "ok");
}

// ============================================================================
// Products
// ============================================================================

#[tokio::test]
async fn test_product_listing_page() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx.get("/products?page=2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["products"].as_array().unwrap().len(), 12);
    assert_eq!(body["products"][0]["id"], 13);
    assert_eq!(body["total"], 25);
    assert_eq!(body["pagination"]["current_page"], 2);
    assert_eq!(body["pagination"]["total_pages"], 3);
    assert_eq!(body["pagination"]["pages"], json!([1, 2, 3, null, null]));
    assert_eq!(body["pagination"]["has_previous"], true);
    assert_eq!(body["pagination"]["has_next"], true);
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn test_product_listing_past_last_page() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx.get("/products?page=999&page_size=3").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["products"], json!([]));
    assert_eq!(body["total"], 25);
    assert_eq!(body["pagination"]["current_page"], 999);
    assert_eq!(body["pagination"]["total_pages"], 9);
    assert_eq!(body["pagination"]["pages"], json!([5, 6, 7, 8, 9]));
    assert_eq!(body["pagination"]["has_next"], false);
}

#[tokio::test]
async fn test_product_listing_by_category_and_search() {
    let ctx = TestContext::new().await;

    let (_, body) = ctx.get("/products?category=laptops&page_size=4").await;
    assert_eq!(body["total"], 10);
    assert_eq!(body["category"], "laptops");
    assert_eq!(body["pagination"]["total_pages"], 3);

    let (_, body) = ctx.get("/products?q=Item%203&category=laptops").await;
    assert_eq!(body["query"], "Item 3");
    assert_eq!(body["total"], 1);
    assert_eq!(body["products"][0]["final_price"], "$80.00");
    assert_eq!(body["products"][0]["discount_badge"], "-20%");
}

#[tokio::test]
async fn test_product_listing_error_is_reported_in_body() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx.get("/products?category=broken").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["products"], json!([]));
    assert_eq!(body["error"], "server error, retry later");
}

#[tokio::test]
async fn test_product_detail() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx.get("/products/16").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Laptop 16");
    assert_eq!(body["brand"], "Lapco");
    assert_eq!(body["images"], json!(["https://cdn.test/16/1.png"]));

    let (status, _) = ctx.get("/products/404").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_categories_with_counts() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx.get("/categories").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 25);
    let categories = body["categories"].as_array().unwrap();
    assert_eq!(categories.len(), 2);
    assert_eq!(categories[0]["slug"], "beauty");
    assert_eq!(categories[0]["name"], "Beauty");
    assert_eq!(categories[0]["count"], 15);
    assert_eq!(categories[1]["slug"], "laptops");
}

// ============================================================================
// Cart
// ============================================================================

#[tokio::test]
async fn test_cart_flow() {
    let ctx = TestContext::new().await;

    let (status, _) = ctx.post("/cart/add", &json!({"product_id": 3})).await;
    assert_eq!(status, StatusCode::OK);
    ctx.post("/cart/add", &json!({"product_id": 3})).await;
    let (_, cart) = ctx.post("/cart/add", &json!({"product_id": 7})).await;

    assert_eq!(cart["item_count"], 3);
    assert_eq!(cart["subtotal"], "$170.00");
    assert_eq!(cart["items"][0]["product_id"], 3);
    assert_eq!(cart["items"][0]["quantity"], 2);
    assert_eq!(cart["items"][0]["line_price"], "$160.00");

    let (_, count) = ctx.get("/cart/count").await;
    assert_eq!(count["count"], 3);

    let (_, cart) = ctx
        .post("/cart/update", &json!({"product_id": 7, "quantity": 4}))
        .await;
    assert_eq!(cart["item_count"], 6);

    let (_, cart) = ctx
        .post("/cart/update", &json!({"product_id": 3, "quantity": 0}))
        .await;
    assert_eq!(cart["item_count"], 4);
    assert_eq!(cart["items"].as_array().unwrap().len(), 1);

    let (_, cart) = ctx.post("/cart/remove", &json!({"product_id": 7})).await;
    assert_eq!(cart["item_count"], 0);
    assert_eq!(cart["subtotal"], "$0.00");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adds_on_one_session_are_all_kept() {
    const ADDS: usize = 20;
    let ctx = TestContext::new().await;

    // establish the session cookie
    let (status, _) = ctx.post("/cart/add", &json!({"product_id": 4})).await;
    assert_eq!(status, StatusCode::OK);

    let mut adds = tokio::task::JoinSet::new();
    for _ in 0..ADDS {
        let client = ctx.client.clone();
        let url = format!("{}/cart/add", ctx.base_url);
        adds.spawn(async move {
            client
                .post(url)
                .json(&json!({"product_id": 4}))
                .send()
                .await
                .unwrap()
                .status()
        });
    }
    while let Some(status) = adds.join_next().await {
        assert_eq!(status.unwrap(), StatusCode::OK);
    }

    let (_, cart) = ctx.get("/cart").await;
    assert_eq!(cart["item_count"], ADDS + 1);
    assert_eq!(cart["items"][0]["quantity"], ADDS + 1);
}

#[tokio::test]
async fn test_adding_missing_product_leaves_cart_unchanged() {
    let ctx = TestContext::new().await;
    ctx.post("/cart/add", &json!({"product_id": 1})).await;

    let (status, _) = ctx.post("/cart/add", &json!({"product_id": 404})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, cart) = ctx.get("/cart").await;
    assert_eq!(cart["item_count"], 1);
}

#[tokio::test]
async fn test_carts_are_per_session() {
    let ctx = TestContext::new().await;
    ctx.post("/cart/add", &json!({"product_id": 2})).await;

    let stranger = session_client();
    let body: Value = stranger
        .get(format!("{}/cart/count", ctx.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["count"], 0);
    let (_, mine) = ctx.get("/cart/count").await;
    assert_eq!(mine["count"], 1);
}

#[tokio::test]
async fn test_checkout_placeholder_keeps_cart() {
    let ctx = TestContext::new().await;
    ctx.post("/cart/add", &json!({"product_id": 2})).await;

    let (status, body) = ctx.post("/checkout", &json!({})).await;

    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["message"], "Checkout functionality coming soon!");
    assert_eq!(body["cart"]["item_count"], 1);
}
