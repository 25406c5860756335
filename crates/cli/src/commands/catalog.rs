//! Catalog browsing commands.
//!
//! Each command runs one orchestrator call and prints the result, as text by
//! default or as JSON with `--json`. A listing that fails prints its error
//! classification instead of products and the command still succeeds, the
//! same as the storefront page would.

use std::fmt::Write as _;

use thiserror::Error;
use vitrine_core::{Category, CategoryFilter, PageRequest, Paginator, Product, ProductId};
use vitrine_storefront::catalog::{CatalogClient, CatalogError};
use vitrine_storefront::config::{CatalogConfig, ConfigError};
use vitrine_storefront::services::{CatalogBrowser, PageOutcome};

/// Errors that can occur during catalog commands.
#[derive(Debug, Error)]
pub enum CatalogCommandError {
    /// Catalog settings could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A single-item fetch failed.
    #[error("{0}")]
    Catalog(#[from] CatalogError),

    /// JSON output could not be produced.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

/// Build an orchestrator from `CATALOG_*` environment variables.
///
/// # Errors
///
/// Returns `CatalogCommandError::Config` if a variable cannot be parsed.
pub fn connect() -> Result<CatalogBrowser<CatalogClient>, CatalogCommandError> {
    dotenvy::dotenv().ok();

    let config = CatalogConfig::from_env()?;
    tracing::debug!(catalog = %config.base(), "Using catalog");

    Ok(CatalogBrowser::new(CatalogClient::new(&config)))
}

/// Print one page of products.
///
/// # Errors
///
/// Returns `CatalogCommandError::Json` if JSON output fails.
pub async fn products(
    browser: &CatalogBrowser<CatalogClient>,
    request: &PageRequest,
    format: Format,
) -> Result<(), CatalogCommandError> {
    let outcome = browser.fetch_page(request).await;

    let output = match format {
        Format::Json => serde_json::to_string_pretty(&outcome)?,
        Format::Text => render_page(request, &outcome),
    };
    emit(&output);
    Ok(())
}

/// Print a single product.
///
/// # Errors
///
/// Returns `CatalogCommandError::Catalog` if the product cannot be fetched.
pub async fn product(
    browser: &CatalogBrowser<CatalogClient>,
    id: ProductId,
    format: Format,
) -> Result<(), CatalogCommandError> {
    let product = browser.fetch_product(id).await.map_err(|e| {
        if e.is_not_found() {
            tracing::warn!(product_id = %id, "Product not found");
        }
        e
    })?;

    let output = match format {
        Format::Json => serde_json::to_string_pretty(&product)?,
        Format::Text => render_product(&product),
    };
    emit(&output);
    Ok(())
}

/// Print categories, optionally with product counts.
///
/// # Errors
///
/// Returns `CatalogCommandError::Json` if JSON output fails.
pub async fn categories(
    browser: &CatalogBrowser<CatalogClient>,
    counts: bool,
    format: Format,
) -> Result<(), CatalogCommandError> {
    let output = if counts {
        let filter = browser.fetch_category_filter().await;
        match format {
            Format::Json => serde_json::to_string_pretty(&filter)?,
            Format::Text => render_filter(&filter),
        }
    } else {
        let categories = browser.fetch_categories().await;
        match format {
            Format::Json => serde_json::to_string_pretty(&categories)?,
            Format::Text => render_categories(&categories),
        }
    };
    emit(&output);
    Ok(())
}

#[allow(clippy::print_stdout)]
fn emit(output: &str) {
    println!("{output}");
}

// =============================================================================
// Text Rendering
// =============================================================================

/// One listing row: id, title, price and badge, stock.
fn render_row(product: &Product) -> String {
    let mut row = format!(
        "{:>5}  {:<40}  {:>10}",
        product.id,
        product.title,
        product.effective_price().display()
    );
    if let Some(badge) = product.discount_badge() {
        let _ = write!(row, " {badge} (was {})", product.price.display());
    }
    if !product.in_stock() {
        row.push_str("  out of stock");
    }
    row
}

fn render_page(request: &PageRequest, outcome: &PageOutcome) -> String {
    if let Some(error) = &outcome.error {
        return format!("Error: {error}");
    }
    if outcome.page.products.is_empty() {
        return "No products found.".to_string();
    }

    let paginator = Paginator::new(request.page(), outcome.page.total, request.page_size());
    let mut out = String::new();
    for product in &outcome.page.products {
        let _ = writeln!(out, "{}", render_row(product));
    }
    let _ = write!(
        out,
        "Page {} of {} ({} products)",
        paginator.current_page, paginator.total_pages, outcome.page.total
    );
    out
}

fn render_product(product: &Product) -> String {
    let mut out = format!("{} (#{})\n", product.title, product.id);
    if let Some(brand) = &product.brand {
        let _ = writeln!(out, "Brand:    {brand}");
    }
    let _ = writeln!(out, "Category: {}", product.category);
    let _ = write!(out, "Price:    {}", product.effective_price().display());
    if let Some(badge) = product.discount_badge() {
        let _ = write!(out, " {badge} (was {})", product.price.display());
    }
    let _ = writeln!(
        out,
        "\nRating:   {}{} ({:.1})",
        "*".repeat(usize::from(product.whole_stars())),
        ".".repeat(usize::from(vitrine_core::types::product::MAX_RATING - product.whole_stars())),
        product.rating
    );
    let stock = if product.in_stock() {
        format!("{} in stock", product.stock)
    } else {
        "out of stock".to_string()
    };
    let _ = writeln!(out, "Stock:    {stock}");
    if !product.description.is_empty() {
        let _ = write!(out, "\n{}", product.description);
    }
    out.trim_end().to_string()
}

fn render_categories(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found.".to_string();
    }
    categories
        .iter()
        .map(|c| format!("{:<24}  {}", c.slug, c.name))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_filter(filter: &CategoryFilter) -> String {
    let mut out = format!("{:<24}  {:>5}\n", "All Categories", filter.total);
    for entry in &filter.categories {
        let _ = writeln!(out, "{:<24}  {:>5}", entry.category.name, entry.count);
    }
    out.trim_end().to_string()
}
