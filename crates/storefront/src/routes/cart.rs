//! Cart route handlers.
//!
//! Carts live in the [`CartStore`]; the visitor's session only carries the
//! key of their cart. Every mutating handler applies its operation under the
//! cart's lock, so concurrent requests from one session are applied one after
//! the other.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;
use vitrine_core::{Cart, CartLine, ProductId};

use crate::error::{Result, add_breadcrumb};
use crate::models::{cart_key, find_cart_key};
use crate::services::CartStore;
use crate::state::AppState;

/// Shown when the checkout button is pressed.
pub const CHECKOUT_PLACEHOLDER: &str = "Checkout functionality coming soon!";

/// Header telling the client to refresh cart widgets.
const CART_UPDATED_TRIGGER: (&str, &str) = ("HX-Trigger", "cart-updated");

/// Cart line display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemView {
    pub product_id: ProductId,
    pub title: String,
    pub thumbnail: String,
    pub quantity: u32,
    /// Discounted unit price.
    pub price: String,
    pub line_price: String,
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product.id,
            title: line.product.title.clone(),
            thumbnail: line.product.primary_image().to_string(),
            quantity: line.quantity,
            price: line.unit_price().display(),
            line_price: line.line_total().display(),
        }
    }
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u64,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.lines().iter().map(CartItemView::from).collect(),
            subtotal: cart.total_price().display(),
            item_count: cart.total_items(),
        }
    }
}

/// Cart count badge data.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CartCountView {
    pub count: u64,
}

/// Add to cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
}

/// Update cart request body.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: ProductId,
    /// Zero or negative removes the line.
    pub quantity: i64,
}

/// Remove from cart request body.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: ProductId,
}

/// Checkout acknowledgment.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutView {
    pub message: &'static str,
    pub cart: CartView,
}

fn updated(view: CartView) -> Response {
    (AppendHeaders([CART_UPDATED_TRIGGER]), Json(view)).into_response()
}

/// The visitor's cart without creating one.
async fn current_cart(carts: &CartStore, session: &Session) -> Result<Cart> {
    Ok(match find_cart_key(session).await? {
        Some(key) => carts.snapshot(key).await,
        None => Cart::default(),
    })
}

/// Apply `mutate` to the visitor's cart and return the resulting view.
async fn mutate_cart(
    carts: &CartStore,
    session: &Session,
    mutate: impl FnOnce(&mut Cart),
) -> Result<CartView> {
    let key = cart_key(session).await?;
    Ok(carts
        .update(key, |cart| {
            mutate(cart);
            CartView::from(&*cart)
        })
        .await)
}

/// Display the cart.
#[instrument(skip(carts, session))]
pub async fn show(State(carts): State<CartStore>, session: Session) -> Result<Json<CartView>> {
    let cart = current_cart(&carts, &session).await?;
    Ok(Json(CartView::from(&cart)))
}

/// Cart count badge.
#[instrument(skip(carts, session))]
pub async fn count(
    State(carts): State<CartStore>,
    session: Session,
) -> Result<Json<CartCountView>> {
    let cart = current_cart(&carts, &session).await?;
    Ok(Json(CartCountView {
        count: cart.total_items(),
    }))
}

/// Add one unit of a product to the cart.
///
/// The product is fetched from the catalog so the line holds a snapshot of
/// its price and discount at the time it was added.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<AddToCartForm>,
) -> Result<Response> {
    let product = state.browser().fetch_product(form.product_id).await?;

    let view = mutate_cart(state.carts(), &session, |cart| cart.add(&product)).await?;

    let product_id = form.product_id.to_string();
    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("product_id", product_id.as_str())]),
    );

    Ok(updated(view))
}

/// Set a line's quantity.
#[instrument(skip(carts, session))]
pub async fn update(
    State(carts): State<CartStore>,
    session: Session,
    Json(form): Json<UpdateCartForm>,
) -> Result<Response> {
    let view = mutate_cart(&carts, &session, |cart| {
        cart.update_quantity(form.product_id, form.quantity);
    })
    .await?;

    Ok(updated(view))
}

/// Remove a line.
#[instrument(skip(carts, session))]
pub async fn remove(
    State(carts): State<CartStore>,
    session: Session,
    Json(form): Json<RemoveFromCartForm>,
) -> Result<Response> {
    let view = mutate_cart(&carts, &session, |cart| cart.remove(form.product_id)).await?;

    Ok(updated(view))
}

/// Checkout placeholder.
///
/// There is no order flow yet; the cart is left untouched.
#[instrument(skip(carts, session))]
pub async fn checkout(
    State(carts): State<CartStore>,
    session: Session,
) -> Result<impl IntoResponse> {
    let cart = current_cart(&carts, &session).await?;
    add_breadcrumb("cart", "Checkout requested", None);

    Ok((
        StatusCode::ACCEPTED,
        Json(CheckoutView {
            message: CHECKOUT_PLACEHOLDER,
            cart: CartView::from(&cart),
        }),
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, header},
        routing::{get, post},
    };
    use tower::ServiceExt;
    use tower_sessions::{MemoryStore, SessionManagerLayer};

    use super::*;

    /// Cart routes that need no catalog, over fresh session and cart stores.
    fn app() -> Router {
        Router::new()
            .route("/cart", get(show))
            .route("/cart/count", get(count))
            .route("/cart/update", post(update))
            .route("/cart/remove", post(remove))
            .route("/checkout", post(checkout))
            .layer(SessionManagerLayer::new(MemoryStore::default()))
            .with_state(CartStore::new())
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_empty_cart() {
        let response = app()
            .oneshot(Request::builder().uri("/cart").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["item_count"], 0);
        assert_eq!(body["subtotal"], "$0.00");
        assert_eq!(body["items"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_count_starts_at_zero() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/cart/count")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(json_body(response).await["count"], 0);
    }

    #[tokio::test]
    async fn test_update_and_remove_on_empty_cart_are_noops() {
        let response = app()
            .oneshot(post_json("/cart/update", r#"{"product_id": 3, "quantity": 2}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("HX-Trigger").unwrap(),
            "cart-updated"
        );
        assert_eq!(json_body(response).await["item_count"], 0);

        let response = app()
            .oneshot(post_json("/cart/remove", r#"{"product_id": 3}"#))
            .await
            .unwrap();
        assert_eq!(json_body(response).await["item_count"], 0);
    }

    #[tokio::test]
    async fn test_reading_does_not_start_a_session() {
        let response = app()
            .oneshot(Request::builder().uri("/cart").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(response.headers().get(header::SET_COOKIE).is_none());

        let response = app()
            .oneshot(post_json("/cart/remove", r#"{"product_id": 3}"#))
            .await
            .unwrap();
        assert!(response.headers().get(header::SET_COOKIE).is_some());
    }

    #[tokio::test]
    async fn test_update_rejects_malformed_body() {
        let response = app()
            .oneshot(post_json("/cart/update", r#"{"product_id": "abc"}"#))
            .await
            .unwrap();
        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_checkout_placeholder() {
        let response = app()
            .oneshot(post_json("/checkout", "{}"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let body = json_body(response).await;
        assert_eq!(body["message"], CHECKOUT_PLACEHOLDER);
        assert_eq!(body["cart"]["item_count"], 0);
    }
}
