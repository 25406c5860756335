//! Catalog query orchestration.
//!
//! [`CatalogBrowser`] turns what a shopper asked for (a page of a category,
//! a search, the category list) into catalog calls and turns the answers
//! into something a view can render. List operations never fail: a failed
//! fetch yields an empty result and, separately, an [`ErrorClassification`]
//! for display.

use std::collections::HashMap;

use futures::future::join_all;
use serde::Serialize;
use tracing::{instrument, warn};
use vitrine_core::pagination::total_pages;
use vitrine_core::{Category, CategoryFilter, PageRequest, Product, ProductId, ProductPage};

use super::sequence::LatestSlot;
use crate::catalog::{CatalogApi, CatalogError, ErrorClassification, ListQuery};

/// Result of fetching one listing page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageOutcome {
    /// Products and total; empty when the fetch failed.
    #[serde(flatten)]
    pub page: ProductPage,
    /// Why the fetch failed, if it did.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorClassification>,
}

impl PageOutcome {
    #[must_use]
    pub const fn success(page: ProductPage) -> Self {
        Self { page, error: None }
    }

    /// Empty page carrying the classification of `err`.
    #[must_use]
    pub fn failed(err: &CatalogError) -> Self {
        Self {
            page: ProductPage::empty(),
            error: Some(ErrorClassification::from(err)),
        }
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// `ceil(total / page_size)`.
    #[must_use]
    pub fn total_pages(&self, page_size: u32) -> u64 {
        total_pages(self.page.total, page_size)
    }
}

/// Slot holding the newest page outcome.
pub type LatestPage = LatestSlot<PageOutcome>;

/// Query orchestrator over a catalog.
#[derive(Debug, Clone)]
pub struct CatalogBrowser<C> {
    catalog: C,
}

impl<C: CatalogApi> CatalogBrowser<C> {
    #[must_use]
    pub const fn new(catalog: C) -> Self {
        Self { catalog }
    }

    /// The wrapped catalog.
    #[must_use]
    pub const fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Fetch one page of products with exactly one catalog call.
    ///
    /// Search text takes precedence over a category filter; with neither the
    /// unscoped listing is used.
    #[instrument(skip(self), fields(page = request.page(), skip = request.skip()))]
    pub async fn fetch_page(&self, request: &PageRequest) -> PageOutcome {
        let query = ListQuery::from(request);

        let result = if let Some(text) = request.search() {
            self.catalog.search_products(text, &query).await
        } else if let Some(slug) = request.category() {
            self.catalog.list_by_category(slug, &query).await
        } else {
            self.catalog.list_products(&query).await
        };

        match result {
            Ok(page) => PageOutcome::success(page),
            Err(e) => {
                warn!(error = %e, "Failed to fetch product page");
                PageOutcome::failed(&e)
            }
        }
    }

    /// Fetch a page into `slot`, unless a newer request starts meanwhile.
    ///
    /// Returns whether the outcome was committed.
    pub async fn fetch_page_latest(&self, slot: &LatestPage, request: &PageRequest) -> bool {
        let token = slot.begin();
        let outcome = self.fetch_page(request).await;
        let committed = slot.commit(token, outcome);
        if !committed {
            tracing::debug!(
                sequence = token.sequence(),
                "Discarding superseded page response"
            );
        }
        committed
    }

    /// Fetch all categories, normalized to `{slug, name, url}` records.
    ///
    /// Returns an empty list if the fetch fails.
    #[instrument(skip(self))]
    pub async fn fetch_categories(&self) -> Vec<Category> {
        match self.catalog.list_categories().await {
            Ok(records) => {
                let base = self.catalog.base_url();
                records
                    .into_iter()
                    .map(|record| record.normalize(base))
                    .collect()
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch categories");
                Vec::new()
            }
        }
    }

    /// Product count per category slug.
    ///
    /// All count requests are issued together and awaited together. A failed
    /// request counts as 0 for its own category only.
    #[instrument(skip(self, categories), fields(categories = categories.len()))]
    pub async fn fetch_category_counts(&self, categories: &[Category]) -> HashMap<String, u64> {
        let query = ListQuery::count_only();

        let fetches = categories.iter().map(|category| {
            let query = &query;
            async move {
                let count = match self.catalog.list_by_category(&category.slug, query).await {
                    Ok(page) => page.total,
                    Err(e) => {
                        warn!(slug = %category.slug, error = %e, "Failed to fetch category count");
                        0
                    }
                };
                (category.slug.clone(), count)
            }
        });

        join_all(fetches).await.into_iter().collect()
    }

    /// Categories with counts, ready for the filter bar.
    pub async fn fetch_category_filter(&self) -> CategoryFilter {
        let categories = self.fetch_categories().await;
        let counts = self.fetch_category_counts(&categories).await;
        CategoryFilter::build(&categories, &counts)
    }

    /// Fetch a single product for the detail view.
    ///
    /// # Errors
    ///
    /// Returns the catalog error unchanged so callers can tell "not found"
    /// from other failures.
    #[instrument(skip(self))]
    pub async fn fetch_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.catalog.get_product(id).await
    }
}
