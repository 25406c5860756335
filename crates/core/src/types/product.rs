//! Catalog product records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// Highest rating the catalog hands out.
pub const MAX_RATING: u8 = 5;

/// A product as returned by the catalog.
///
/// Products are owned by the remote catalog and treated as read-only
/// snapshots here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Category slug.
    pub category: String,
    pub price: Price,
    /// Discount in percent, 0 to 100.
    #[serde(default, with = "rust_decimal::serde::float")]
    pub discount_percentage: Decimal,
    /// Average rating, 0 to 5.
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub stock: u32,
    /// Some catalog entries (groceries, mostly) carry no brand.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub thumbnail: String,
}

impl Product {
    /// Price after the discount percentage is applied.
    #[must_use]
    pub fn effective_price(&self) -> Price {
        self.price.discounted(self.discount_percentage)
    }

    #[must_use]
    pub fn has_discount(&self) -> bool {
        self.discount_percentage > Decimal::ZERO
    }

    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Discount badge label such as `-13%`, or `None` without a discount.
    #[must_use]
    pub fn discount_badge(&self) -> Option<String> {
        self.has_discount()
            .then(|| format!("-{}%", self.discount_percentage.round()))
    }

    /// Number of filled stars for the rating.
    #[must_use]
    pub fn whole_stars(&self) -> u8 {
        if !self.rating.is_finite() || self.rating <= 0.0 {
            return 0;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        // clamped into 0..=5 before the cast
        let stars = self.rating.floor().min(f64::from(MAX_RATING)) as u8;
        stars
    }

    /// Primary image, falling back to the thumbnail.
    #[must_use]
    pub fn primary_image(&self) -> &str {
        self.images.first().map_or(&self.thumbnail, String::as_str)
    }
}

/// One page of products plus the catalog's total match count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub total: u64,
}

impl ProductPage {
    /// The page substituted when a fetch fails.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            products: Vec::new(),
            total: 0,
        }
    }
}
