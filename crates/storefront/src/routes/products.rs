//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use vitrine_core::{PageRequest, Paginator, Product, ProductId, Sort, SortOrder};

use crate::catalog::ErrorClassification;
use crate::error::Result;
use crate::state::AppState;

/// Largest page size a client may ask for.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Product card data for listings.
#[derive(Debug, Clone, Serialize)]
pub struct ProductCardView {
    pub id: ProductId,
    pub title: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    pub thumbnail: String,
    /// List price.
    pub price: String,
    /// Price after discount.
    pub final_price: String,
    /// `-N%`, only when discounted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_badge: Option<String>,
    pub stars: u8,
    pub in_stock: bool,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            title: product.title.clone(),
            category: product.category.clone(),
            brand: product.brand.clone(),
            thumbnail: product.primary_image().to_string(),
            price: product.price.display(),
            final_price: product.effective_price().display(),
            discount_badge: product.discount_badge(),
            stars: product.whole_stars(),
            in_stock: product.in_stock(),
        }
    }
}

/// Product detail data.
#[derive(Debug, Clone, Serialize)]
pub struct ProductDetailView {
    #[serde(flatten)]
    pub card: ProductCardView,
    pub description: String,
    pub images: Vec<String>,
    pub rating: f64,
    pub stock: u32,
}

impl From<&Product> for ProductDetailView {
    fn from(product: &Product) -> Self {
        Self {
            card: ProductCardView::from(product),
            description: product.description.clone(),
            images: product.images.clone(),
            rating: product.rating,
            stock: product.stock,
        }
    }
}

/// Product listing response.
#[derive(Debug, Clone, Serialize)]
pub struct ProductListView {
    pub products: Vec<ProductCardView>,
    pub total: u64,
    pub pagination: Paginator,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Set when the catalog could not be reached; the list is then empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorClassification>,
}

/// Listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub category: Option<String>,
    pub q: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<SortOrder>,
}

impl ListingQuery {
    /// Build the page request, using `default_page_size` when none is given.
    #[must_use]
    pub fn to_page_request(&self, default_page_size: u32) -> PageRequest {
        let page_size = self
            .page_size
            .unwrap_or(default_page_size)
            .min(MAX_PAGE_SIZE);
        let sort = self
            .sort_by
            .as_deref()
            .map(str::trim)
            .filter(|field| !field.is_empty())
            .map(|field| Sort {
                field: field.to_string(),
                order: self.order.unwrap_or(SortOrder::Asc),
            });

        PageRequest::new(self.page.unwrap_or(1), page_size)
            .with_category(self.category.as_deref())
            .with_search(self.q.as_deref())
            .with_sort(sort)
    }
}

/// Product listing, optionally scoped to a category or a search.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> Json<ProductListView> {
    let request = query.to_page_request(state.config().page_size);
    let outcome = state.browser().fetch_page(&request).await;

    Json(ProductListView {
        products: outcome.page.products.iter().map(ProductCardView::from).collect(),
        total: outcome.page.total,
        pagination: Paginator::new(request.page(), outcome.page.total, request.page_size()),
        category: request.category().map(String::from),
        query: request.search().map(String::from),
        error: outcome.error,
    })
}

/// Product detail.
#[instrument(skip(state), fields(product_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductDetailView>> {
    let product = state.browser().fetch_product(id).await?;
    Ok(Json(ProductDetailView::from(&product)))
}
