//! Offset pagination over the catalog.
//!
//! The catalog pages with `limit`/`skip`. A [`PageRequest`] turns a 1-based
//! page number into that pair, and [`Paginator`] describes the page selector
//! shown under a product grid.

use serde::{Deserialize, Serialize};

/// Products per page when none is requested.
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Number of page buttons in the selector.
pub const PAGE_WINDOW: u32 = 5;

/// Sort direction accepted by the catalog's `order` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Sort requested for a listing (`sortBy` + `order`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sort {
    /// Product field name, e.g. `price` or `title`.
    pub field: String,
    pub order: SortOrder,
}

/// A request for one page of products.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRequest {
    page: u32,
    page_size: u32,
    category: Option<String>,
    search: Option<String>,
    sort: Option<Sort>,
}

impl PageRequest {
    /// Create a request for `page` (1-based).
    ///
    /// Page numbers below 1 are clamped to 1 and a zero page size is raised
    /// to 1 rather than rejected.
    #[must_use]
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
            category: None,
            search: None,
            sort: None,
        }
    }

    /// Restrict to a category slug. Blank filters are treated as absent.
    #[must_use]
    pub fn with_category(mut self, category: Option<impl Into<String>>) -> Self {
        self.category = non_blank(category);
        self
    }

    /// Full-text search. Blank queries are treated as absent.
    #[must_use]
    pub fn with_search(mut self, query: Option<impl Into<String>>) -> Self {
        self.search = non_blank(query);
        self
    }

    #[must_use]
    pub fn with_sort(mut self, sort: Option<Sort>) -> Self {
        self.sort = sort;
        self
    }

    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    #[must_use]
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    #[must_use]
    pub const fn sort(&self) -> Option<&Sort> {
        self.sort.as_ref()
    }

    /// Number of leading products to omit: `(page - 1) * page_size`.
    #[must_use]
    pub fn skip(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }

    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.page_size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}

fn non_blank(value: Option<impl Into<String>>) -> Option<String> {
    value
        .map(Into::into)
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// `ceil(total / page_size)`.
#[must_use]
pub fn total_pages(total: u64, page_size: u32) -> u64 {
    total.div_ceil(u64::from(page_size.max(1)))
}

/// Page numbers shown in the selector.
///
/// With `PAGE_WINDOW` or fewer pages every page is listed and the rest of
/// the window is padded with `None`. Otherwise a full window roughly centered
/// on `current` is returned, pinned to the first and last page at the edges.
/// A `current` past the last page is treated as the last page.
#[must_use]
pub fn page_window(current: u64, total_pages: u64) -> Vec<Option<u64>> {
    let window = u64::from(PAGE_WINDOW);

    if total_pages <= window {
        let mut pages: Vec<Option<u64>> = (1..=total_pages).map(Some).collect();
        pages.resize(PAGE_WINDOW as usize, None);
        return pages;
    }

    let current = current.clamp(1, total_pages);
    let half = window / 2;
    let mut start = current.saturating_sub(half).max(1);
    let end = (start + window - 1).min(total_pages);
    if end + 1 - start < window {
        start = (end + 1).saturating_sub(window).max(1);
    }
    (start..=end).map(Some).collect()
}

/// The page selector under a product grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Paginator {
    pub current_page: u64,
    pub total_pages: u64,
    pub pages: Vec<Option<u64>>,
    pub has_previous: bool,
    pub has_next: bool,
}

impl Paginator {
    #[must_use]
    pub fn new(current_page: u32, total: u64, page_size: u32) -> Self {
        let current_page = u64::from(current_page.max(1));
        let total_pages = total_pages(total, page_size);
        Self {
            current_page,
            total_pages,
            pages: page_window(current_page, total_pages),
            has_previous: current_page > 1,
            has_next: current_page < total_pages,
        }
    }

    /// Whether a selector is worth rendering at all.
    #[must_use]
    pub const fn is_needed(&self) -> bool {
        self.total_pages > 1
    }
}
