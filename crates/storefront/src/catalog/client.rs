//! HTTP catalog client.
//!
//! Uses `reqwest` for HTTP and `url` to build endpoint URLs so category slugs
//! and search text are always percent-encoded. Listings, categories and
//! products are cached with `moka`; search results never are.

use std::sync::Arc;

use moka::future::Cache;
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;
use vitrine_core::{CategoryRecord, Product, ProductId, ProductPage};

use super::cache::{CacheKey, CacheValue};
use super::{CatalogApi, CatalogError, ListQuery, ProductsResponse};
use crate::config::CatalogConfig;

/// Upper bound on cached responses.
const CACHE_CAPACITY: u64 = 1000;

// =============================================================================
// CatalogClient
// =============================================================================

/// Client for the remote catalog API.
///
/// Cheap to clone; clones share the HTTP connection pool and the cache.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: Url,
    base: String,
    cache: Cache<CacheKey, CacheValue>,
}

impl CatalogClient {
    /// Create a new catalog client.
    #[must_use]
    pub fn new(config: &CatalogConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(config.cache_ttl)
            .build();

        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
                base: config.base().to_string(),
                cache,
            }),
        }
    }

    /// Build `{base}/{segments...}`, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.inner.base_url.clone();
        // cannot-be-a-base URLs are rejected when the config is parsed
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Fetch and decode a JSON body.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, CatalogError> {
        debug!(url = %url, "Catalog request");

        let response = self
            .inner
            .client
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                url = %url,
                status = %status,
                body = %body.chars().take(200).collect::<String>(),
                "Catalog returned non-success status"
            );
            return Err(CatalogError::Status {
                status: status.as_u16(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                url = %url,
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse catalog response"
            );
            CatalogError::from(e)
        })
    }

    /// Fetch a listing page, consulting the cache first.
    async fn cached_page(&self, key: CacheKey, url: Url) -> Result<ProductPage, CatalogError> {
        if let Some(CacheValue::Page(page)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for listing");
            return Ok(page);
        }

        let response: ProductsResponse = self.get_json(url).await?;
        let page = ProductPage::from(response);

        self.inner
            .cache
            .insert(key, CacheValue::Page(page.clone()))
            .await;

        Ok(page)
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Invalidate a cached product.
    pub async fn invalidate_product(&self, id: ProductId) {
        self.inner.cache.invalidate(&CacheKey::Product(id)).await;
    }

    /// Invalidate all cached data.
    pub async fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}

/// Append `limit`, `skip` and the optional sort to a listing URL.
fn apply_list_query(url: &mut Url, query: &ListQuery) {
    let mut pairs = url.query_pairs_mut();
    pairs
        .append_pair("limit", &query.limit.to_string())
        .append_pair("skip", &query.skip.to_string());
    if let Some(sort) = &query.sort {
        pairs
            .append_pair("sortBy", &sort.field)
            .append_pair("order", sort.order.as_str());
    }
}

impl CatalogApi for CatalogClient {
    fn base_url(&self) -> &str {
        &self.inner.base
    }

    #[instrument(skip(self))]
    async fn list_products(&self, query: &ListQuery) -> Result<ProductPage, CatalogError> {
        let mut url = self.endpoint(&["products"]);
        apply_list_query(&mut url, query);
        self.cached_page(CacheKey::Products(query.clone()), url)
            .await
    }

    #[instrument(skip(self))]
    async fn list_by_category(
        &self,
        slug: &str,
        query: &ListQuery,
    ) -> Result<ProductPage, CatalogError> {
        let mut url = self.endpoint(&["products", "category", slug]);
        apply_list_query(&mut url, query);
        let key = CacheKey::Category {
            slug: slug.to_string(),
            query: query.clone(),
        };
        self.cached_page(key, url).await
    }

    #[instrument(skip(self))]
    async fn search_products(
        &self,
        text: &str,
        query: &ListQuery,
    ) -> Result<ProductPage, CatalogError> {
        let mut url = self.endpoint(&["products", "search"]);
        url.query_pairs_mut().append_pair("q", text);
        apply_list_query(&mut url, query);

        // Search is never cached
        let response: ProductsResponse = self.get_json(url).await?;
        Ok(response.into())
    }

    #[instrument(skip(self))]
    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, CatalogError> {
        if let Some(CacheValue::Categories(records)) =
            self.inner.cache.get(&CacheKey::Categories).await
        {
            debug!("Cache hit for categories");
            return Ok(records);
        }

        let url = self.endpoint(&["products", "categories"]);
        let records: Vec<CategoryRecord> = self.get_json(url).await?;

        self.inner
            .cache
            .insert(CacheKey::Categories, CacheValue::Categories(records.clone()))
            .await;

        Ok(records)
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn get_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        let key = CacheKey::Product(id);

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let url = self.endpoint(&["products", &id.to_string()]);
        let product: Product = self.get_json(url).await?;

        self.inner
            .cache
            .insert(key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use vitrine_core::{Sort, SortOrder};

    use super::*;

    fn client(base: &str) -> CatalogClient {
        CatalogClient::new(&CatalogConfig::new(base).unwrap())
    }

    #[test]
    fn test_endpoint_on_bare_host() {
        let url = client("https://dummyjson.com").endpoint(&["products", "categories"]);
        assert_eq!(url.as_str(), "https://dummyjson.com/products/categories");
    }

    #[test]
    fn test_endpoint_keeps_path_prefix_and_encodes() {
        let url = client("http://127.0.0.1:9000/api/").endpoint(&["products", "category", "home decor"]);
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:9000/api/products/category/home%20decor"
        );
    }

    #[test]
    fn test_list_query_parameters() {
        let mut url = client("https://dummyjson.com").endpoint(&["products"]);
        apply_list_query(
            &mut url,
            &ListQuery {
                limit: 12,
                skip: 24,
                sort: Some(Sort {
                    field: "price".to_string(),
                    order: SortOrder::Desc,
                }),
            },
        );
        assert_eq!(
            url.as_str(),
            "https://dummyjson.com/products?limit=12&skip=24&sortBy=price&order=desc"
        );
    }

    #[test]
    fn test_base_url_has_no_trailing_slash() {
        assert_eq!(
            client("https://dummyjson.com/").base_url(),
            "https://dummyjson.com"
        );
    }
}
