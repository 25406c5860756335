//! Application state shared across handlers.

use std::sync::Arc;

use axum::extract::FromRef;

use crate::catalog::CatalogClient;
use crate::config::StorefrontConfig;
use crate::services::{CartStore, CatalogBrowser};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the catalog client, the carts and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    browser: CatalogBrowser<CatalogClient>,
    carts: CartStore,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let browser = CatalogBrowser::new(CatalogClient::new(&config.catalog));

        Self {
            inner: Arc::new(AppStateInner {
                config,
                browser,
                carts: CartStore::new(),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog query orchestrator.
    #[must_use]
    pub fn browser(&self) -> &CatalogBrowser<CatalogClient> {
        &self.inner.browser
    }

    /// Get a reference to the catalog API client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        self.inner.browser.catalog()
    }

    /// Get a reference to the visitors' carts.
    #[must_use]
    pub fn carts(&self) -> &CartStore {
        &self.inner.carts
    }
}

impl FromRef<AppState> for CartStore {
    fn from_ref(state: &AppState) -> Self {
        state.carts().clone()
    }
}
