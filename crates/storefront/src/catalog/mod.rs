//! Catalog API access.
//!
//! # Architecture
//!
//! - The remote catalog is the source of truth - NO local sync, direct API calls
//! - [`CatalogApi`] is the seam between query orchestration and transport
//! - [`CatalogClient`] implements it over HTTP with `reqwest`
//! - In-memory caching via `moka` for listing and product responses
//!
//! # Endpoints
//!
//! ```text
//! GET /products?limit&skip[&sortBy&order]          - product listing
//! GET /products/category/{slug}?limit&skip[...]    - category listing
//! GET /products/search?q&limit&skip[...]           - search
//! GET /products/categories                         - category listing
//! GET /products/{id}                               - single product
//! ```

mod cache;
mod client;

use std::fmt;
use std::future::Future;

use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;
use vitrine_core::{CategoryRecord, PageRequest, Product, ProductId, ProductPage, Sort};

pub use client::CatalogClient;

/// Errors that can occur when talking to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The request could not complete (connection, TLS, body read).
    #[error("Network error: {0}")]
    Transport(String),

    /// The catalog answered with a non-success status.
    #[error("HTTP error! status: {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The response body did not match the expected record shape.
    #[error("Malformed catalog response: {0}")]
    Shape(String),
}

impl CatalogError {
    /// Whether the catalog reported the resource as missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404 })
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Shape(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Status {
                status: status.as_u16(),
            }
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        Self::Shape(err.to_string())
    }
}

/// User-facing description of a failed catalog fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorClassification {
    /// HTTP 404.
    NotFound,
    /// HTTP 500.
    ServerError,
    /// The request never completed.
    Network,
    /// Any other failure, described by its own message.
    Other(String),
}

impl ErrorClassification {
    /// Message shown in place of the product grid.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::NotFound => "resource not found",
            Self::ServerError => "server error, retry later",
            Self::Network => "network error occurred",
            Self::Other(message) => message,
        }
    }
}

impl From<&CatalogError> for ErrorClassification {
    fn from(err: &CatalogError) -> Self {
        match err {
            CatalogError::Status { status: 404 } => Self::NotFound,
            CatalogError::Status { status: 500 } => Self::ServerError,
            CatalogError::Transport(_) => Self::Network,
            other @ (CatalogError::Status { .. } | CatalogError::Shape(_)) => {
                Self::Other(other.to_string())
            }
        }
    }
}

impl fmt::Display for ErrorClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl Serialize for ErrorClassification {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.message())
    }
}

/// `limit`/`skip`/sort parameters of a listing call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListQuery {
    pub limit: u32,
    pub skip: u64,
    pub sort: Option<Sort>,
}

impl ListQuery {
    /// Smallest listing that still reports the total count.
    #[must_use]
    pub const fn count_only() -> Self {
        Self {
            limit: 1,
            skip: 0,
            sort: None,
        }
    }
}

impl From<&PageRequest> for ListQuery {
    fn from(request: &PageRequest) -> Self {
        Self {
            limit: request.limit(),
            skip: request.skip(),
            sort: request.sort().cloned(),
        }
    }
}

/// Listing response body: `{products, total, skip, limit}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductsResponse {
    pub products: Vec<Product>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub skip: u64,
    #[serde(default)]
    pub limit: u64,
}

impl From<ProductsResponse> for ProductPage {
    fn from(response: ProductsResponse) -> Self {
        Self {
            products: response.products,
            total: response.total,
        }
    }
}

/// Read access to a product catalog.
///
/// Implemented over HTTP by [`CatalogClient`]; tests provide in-memory
/// implementations.
pub trait CatalogApi: Send + Sync {
    /// Base URL used to build category links.
    fn base_url(&self) -> &str;

    /// Unscoped product listing.
    fn list_products(
        &self,
        query: &ListQuery,
    ) -> impl Future<Output = Result<ProductPage, CatalogError>> + Send;

    /// Product listing scoped to a category slug.
    fn list_by_category(
        &self,
        slug: &str,
        query: &ListQuery,
    ) -> impl Future<Output = Result<ProductPage, CatalogError>> + Send;

    /// Full-text product search.
    fn search_products(
        &self,
        text: &str,
        query: &ListQuery,
    ) -> impl Future<Output = Result<ProductPage, CatalogError>> + Send;

    /// Category listing in whichever shape the catalog returns.
    fn list_categories(
        &self,
    ) -> impl Future<Output = Result<Vec<CategoryRecord>, CatalogError>> + Send;

    /// A single product by id.
    fn get_product(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<Product, CatalogError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_mapping() {
        let cases = [
            (CatalogError::Status { status: 404 }, "resource not found"),
            (CatalogError::Status { status: 500 }, "server error, retry later"),
            (
                CatalogError::Transport("connection refused".to_string()),
                "network error occurred",
            ),
            (
                CatalogError::Status { status: 503 },
                "HTTP error! status: 503",
            ),
            (
                CatalogError::Shape("missing field `products`".to_string()),
                "Malformed catalog response: missing field `products`",
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(ErrorClassification::from(&err).message(), expected);
        }
    }

    #[test]
    fn test_classification_serializes_as_message() {
        let json = serde_json::to_string(&ErrorClassification::Network).ok();
        assert_eq!(json.as_deref(), Some("\"network error occurred\""));
    }

    #[test]
    fn test_list_query_from_page_request() {
        let request = PageRequest::new(3, 10);
        let query = ListQuery::from(&request);
        assert_eq!(query.limit, 10);
        assert_eq!(query.skip, 20);
        assert!(query.sort.is_none());
    }

    #[test]
    fn test_products_response_defaults() {
        let response: Result<ProductsResponse, _> = serde_json::from_str(r#"{"products": []}"#);
        let page = response.map(ProductPage::from).ok();
        assert_eq!(page, Some(ProductPage::empty()));
    }

    #[test]
    fn test_not_found() {
        assert!(CatalogError::Status { status: 404 }.is_not_found());
        assert!(!CatalogError::Status { status: 410 }.is_not_found());
    }
}
