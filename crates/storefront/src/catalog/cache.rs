//! Cache types for catalog API responses.

use vitrine_core::{CategoryRecord, Product, ProductId, ProductPage};

use super::ListQuery;

/// Cache key for listings, categories and products.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Product(ProductId),
    Products(ListQuery),
    Category { slug: String, query: ListQuery },
    Categories,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<Product>),
    Page(ProductPage),
    Categories(Vec<CategoryRecord>),
}
