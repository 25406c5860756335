//! Catalog categories and the category filter.
//!
//! The catalog has answered the categories listing in two shapes over time:
//! a plain array of names and an array of `{slug, name, url}` records.
//! [`CategoryRecord`] accepts either and [`CategoryRecord::normalize`]
//! turns both into a [`Category`] using a single rule.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    pub slug: String,
    pub name: String,
    pub url: String,
}

impl Category {
    /// Build a category from a bare name.
    ///
    /// The name is trimmed first. `slug` is the trimmed name lowercased with
    /// every inner whitespace run replaced by a single `-`, so `" Home  Decor "`
    /// becomes `home-decor`; leading or trailing whitespace never turns into a
    /// hyphen. `name` is the trimmed name with its first character
    /// upper-cased, and `url` points at the catalog's category listing for
    /// the slug.
    #[must_use]
    pub fn from_name(raw: &str, catalog_base: &str) -> Self {
        let slug = slugify(raw);
        let url = category_url(catalog_base, &slug);
        Self {
            name: capitalize(raw.trim()),
            slug,
            url,
        }
    }
}

/// A categories-listing entry in either wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CategoryRecord {
    Name(String),
    Record(Category),
}

impl CategoryRecord {
    /// Normalize into a [`Category`].
    #[must_use]
    pub fn normalize(self, catalog_base: &str) -> Category {
        match self {
            Self::Name(name) => Category::from_name(&name, catalog_base),
            Self::Record(category) => category,
        }
    }
}

/// Lowercase and join the whitespace-separated words with `-`.
///
/// Leading and trailing whitespace is dropped, not hyphenated.
#[must_use]
pub fn slugify(raw: &str) -> String {
    raw.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Upper-case the first character, leaving the rest untouched.
#[must_use]
pub fn capitalize(raw: &str) -> String {
    let mut chars = raw.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Catalog URL listing the products of a category.
#[must_use]
pub fn category_url(catalog_base: &str, slug: &str) -> String {
    format!(
        "{}/products/category/{slug}",
        catalog_base.trim_end_matches('/')
    )
}

/// A category paired with its product count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    #[serde(flatten)]
    pub category: Category,
    pub count: u64,
}

/// Categories shown in the filter bar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryFilter {
    /// Non-empty categories, largest first.
    pub categories: Vec<CategoryCount>,
    /// Sum of all counts, used for the "All Categories" entry.
    pub total: u64,
}

impl CategoryFilter {
    /// Pair categories with their counts.
    ///
    /// Categories whose count is zero (or missing) are dropped. This cannot
    /// tell a genuinely empty category from one whose count fetch failed.
    #[must_use]
    pub fn build(categories: &[Category], counts: &HashMap<String, u64>) -> Self {
        let total = counts.values().sum();
        let mut categories: Vec<CategoryCount> = categories
            .iter()
            .filter_map(|category| {
                let count = counts.get(&category.slug).copied().unwrap_or(0);
                (count > 0).then(|| CategoryCount {
                    category: category.clone(),
                    count,
                })
            })
            .collect();
        // stable: equal counts keep catalog order
        categories.sort_by(|a, b| b.count.cmp(&a.count));
        Self { categories, total }
    }

    /// Look up a category's entry by slug.
    #[must_use]
    pub fn find(&self, slug: &str) -> Option<&CategoryCount> {
        self.categories.iter().find(|c| c.category.slug == slug)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const BASE: &str = "https://dummyjson.com";

    #[test]
    fn test_from_bare_hyphenated_name() {
        let category = Category::from_name("smart-phones", BASE);
        assert_eq!(category.slug, "smart-phones");
        assert_eq!(category.name, "Smart-phones");
        assert_eq!(
            category.url,
            "https://dummyjson.com/products/category/smart-phones"
        );
    }

    #[test]
    fn test_from_name_trims_outer_whitespace() {
        let category = Category::from_name("  a b\t", BASE);
        assert_eq!(category.slug, "a-b");
        assert_eq!(category.name, "A b");
        assert_eq!(slugify(" a"), "a");
        assert_eq!(slugify("   "), "");
    }

    #[test]
    fn test_from_name_with_whitespace() {
        let category = Category::from_name("Home  Decoration", "https://catalog.test/");
        assert_eq!(category.slug, "home-decoration");
        assert_eq!(category.name, "Home  Decoration");
        assert_eq!(
            category.url,
            "https://catalog.test/products/category/home-decoration"
        );
    }

    #[test]
    fn test_capitalize_edge_cases() {
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("é"), "É");
        assert_eq!(capitalize("laptops"), "Laptops");
    }

    #[test]
    fn test_record_accepts_both_shapes() {
        let json = r#"[
            "groceries",
            {"slug": "beauty", "name": "Beauty", "url": "https://dummyjson.com/products/category/beauty"}
        ]"#;
        let records: Vec<CategoryRecord> = serde_json::from_str(json).unwrap();
        let categories: Vec<Category> = records.into_iter().map(|r| r.normalize(BASE)).collect();

        assert_eq!(categories[0].slug, "groceries");
        assert_eq!(categories[0].name, "Groceries");
        assert_eq!(categories[1].name, "Beauty");
    }

    #[test]
    fn test_filter_drops_empty_and_sorts() {
        let categories: Vec<Category> = ["a", "b", "c", "d"]
            .iter()
            .map(|n| Category::from_name(n, BASE))
            .collect();
        let counts = HashMap::from([
            ("a".to_string(), 5),
            ("b".to_string(), 0),
            ("c".to_string(), 7),
            ("d".to_string(), 5),
        ]);

        let filter = CategoryFilter::build(&categories, &counts);
        let slugs: Vec<&str> = filter
            .categories
            .iter()
            .map(|c| c.category.slug.as_str())
            .collect();

        assert_eq!(slugs, vec!["c", "a", "d"]);
        assert_eq!(filter.total, 17);
        assert!(filter.find("b").is_none());
        assert_eq!(filter.find("c").map(|c| c.count), Some(7));
    }
}
