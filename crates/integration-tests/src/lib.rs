//! Integration tests for Vitrine.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p vitrine-integration-tests
//! ```
//!
//! No external services are needed. [`MockCatalog`] serves a small catalog in
//! the same wire format as the real one on an ephemeral local port, and
//! [`spawn_storefront`] runs the storefront against it.
//!
//! # Mock catalog contents
//!
//! - Products 1-15 are in `beauty`, 16-25 in `laptops`
//! - Product 3 costs $100.00 with a 20% discount; everything else is
//!   $10.00 undiscounted
//! - Category `broken` always answers 500, category `empty` has no products
//! - Product 404 answers 404 with a catalog-style message

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};
use vitrine_storefront::config::{CatalogConfig, StorefrontConfig};
use vitrine_storefront::routes;
use vitrine_storefront::state::AppState;

/// Number of products in the mock catalog.
pub const PRODUCT_COUNT: i64 = 25;

/// How `/products/categories` answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryShape {
    /// `["beauty", ...]`
    Names,
    /// `[{"slug": ..., "name": ..., "url": ...}, ...]`
    Records,
}

struct MockState {
    base_url: String,
    category_shape: CategoryShape,
    products: Vec<Value>,
    requests: AtomicUsize,
}

/// A running mock catalog.
pub struct MockCatalog {
    addr: SocketAddr,
    state: Arc<MockState>,
}

impl MockCatalog {
    /// Start a mock catalog answering categories in `shape`.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start(shape: CategoryShape) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock catalog");
        let addr = listener.local_addr().expect("Mock catalog has no address");

        let state = Arc::new(MockState {
            base_url: format!("http://{addr}"),
            category_shape: shape,
            products: (1..=PRODUCT_COUNT).map(product_json).collect(),
            requests: AtomicUsize::new(0),
        });

        let app = Router::new()
            .route("/products", get(list_products))
            .route("/products/search", get(search_products))
            .route("/products/categories", get(list_categories))
            .route("/products/category/{slug}", get(list_by_category))
            .route("/products/{id}", get(get_product))
            .with_state(Arc::clone(&state));

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Mock catalog stopped");
        });

        Self { addr, state }
    }

    /// Base URL of the mock, e.g. `http://127.0.0.1:41234`.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.state.base_url
    }

    /// Address the mock listens on.
    #[must_use]
    pub const fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Requests served so far.
    #[must_use]
    pub fn requests(&self) -> usize {
        self.state.requests.load(Ordering::SeqCst)
    }

    /// Catalog settings pointing at this mock.
    ///
    /// # Panics
    ///
    /// Panics if the mock URL is rejected, which cannot happen for a local
    /// http address.
    #[must_use]
    pub fn catalog_config(&self) -> CatalogConfig {
        CatalogConfig::new(self.base_url()).expect("Mock catalog URL is valid")
    }
}

fn product_json(id: i64) -> Value {
    let (category, title) = if id <= 15 {
        ("beauty", format!("Beauty Item {id}"))
    } else {
        ("laptops", format!("Laptop {id}"))
    };
    let (price, discount) = if id == 3 { (100.0, 20.0) } else { (10.0, 0.0) };

    let mut product = json!({
        "id": id,
        "title": title,
        "description": format!("Description of {title}"),
        "category": category,
        "price": price,
        "discountPercentage": discount,
        "rating": 4.2,
        "stock": if id == 5 { 0 } else { 10 },
        "images": [format!("https://cdn.test/{id}/1.png")],
        "thumbnail": format!("https://cdn.test/{id}/thumb.png"),
    });
    // beauty items carry no brand
    if category == "laptops" {
        product["brand"] = json!("Lapco");
    }
    product
}

#[derive(Debug, Deserialize)]
struct ListParams {
    q: Option<String>,
    limit: Option<usize>,
    skip: Option<usize>,
    #[serde(rename = "sortBy")]
    sort_by: Option<String>,
    order: Option<String>,
}

/// Apply `sortBy`/`order`/`skip`/`limit` the way the real catalog does.
fn listing(mut matching: Vec<Value>, params: &ListParams) -> Value {
    if let Some(field) = &params.sort_by {
        matching.sort_by(|a, b| {
            let (a, b) = (&a[field.as_str()], &b[field.as_str()]);
            match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                _ => a.as_str().cmp(&b.as_str()),
            }
        });
        if params.order.as_deref() == Some("desc") {
            matching.reverse();
        }
    }

    let total = matching.len();
    let skip = params.skip.unwrap_or(0);
    // limit=0 means "everything"
    let limit = params.limit.filter(|&l| l > 0).unwrap_or(total);
    let products: Vec<Value> = matching.into_iter().skip(skip).take(limit).collect();

    json!({
        "products": products,
        "total": total,
        "skip": skip,
        "limit": limit,
    })
}

async fn list_products(
    State(state): State<Arc<MockState>>,
    Query(params): Query<ListParams>,
) -> Json<Value> {
    state.requests.fetch_add(1, Ordering::SeqCst);
    Json(listing(state.products.clone(), &params))
}

async fn search_products(
    State(state): State<Arc<MockState>>,
    Query(params): Query<ListParams>,
) -> Json<Value> {
    state.requests.fetch_add(1, Ordering::SeqCst);
    let needle = params.q.clone().unwrap_or_default().to_lowercase();
    let matching = state
        .products
        .iter()
        .filter(|p| {
            p["title"]
                .as_str()
                .is_some_and(|t| t.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect();
    Json(listing(matching, &params))
}

async fn list_by_category(
    State(state): State<Arc<MockState>>,
    Path(slug): Path<String>,
    Query(params): Query<ListParams>,
) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);
    if slug == "broken" {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }
    let matching = state
        .products
        .iter()
        .filter(|p| p["category"] == slug.as_str())
        .cloned()
        .collect();
    Json(listing(matching, &params)).into_response()
}

async fn list_categories(State(state): State<Arc<MockState>>) -> Json<Value> {
    state.requests.fetch_add(1, Ordering::SeqCst);
    let slugs = ["beauty", "laptops", "broken", "empty"];
    match state.category_shape {
        CategoryShape::Names => Json(json!(slugs)),
        CategoryShape::Records => Json(Value::Array(
            slugs
                .iter()
                .map(|slug| {
                    json!({
                        "slug": slug,
                        "name": format!("{} (catalog)", slug.to_uppercase()),
                        "url": format!("{}/products/category/{slug}", state.base_url),
                    })
                })
                .collect(),
        )),
    }
}

async fn get_product(State(state): State<Arc<MockState>>, Path(id): Path<String>) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);
    let found = state
        .products
        .iter()
        .find(|p| p["id"].as_i64().map(|n| n.to_string()).as_deref() == Some(id.as_str()));
    match found {
        Some(product) => Json(product.clone()).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": format!("Product with id '{id}' not found") })),
        )
            .into_response(),
    }
}

/// Start the storefront against `catalog` and return its base URL.
///
/// # Panics
///
/// Panics if no local port can be bound.
pub async fn spawn_storefront(catalog: &MockCatalog, page_size: u32) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind storefront");
    let addr = listener.local_addr().expect("Storefront has no address");

    let config = StorefrontConfig {
        host: addr.ip(),
        port: addr.port(),
        page_size,
        secure_cookies: false,
        catalog: catalog.catalog_config(),
        sentry_dsn: None,
        sentry_environment: None,
    };
    let app = routes::app(AppState::new(config));

    tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("Storefront stopped");
    });

    format!("http://{addr}")
}

/// HTTP client that keeps the session cookie between requests.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn session_client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}
