//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `browse` - Catalog query orchestration (listing pages, categories, counts)
//! - `carts` - Per-visitor carts, one lock per cart
//! - `sequence` - Newest-request-wins slots for overlapping fetches

pub mod browse;
pub mod carts;
pub mod sequence;

pub use browse::{CatalogBrowser, LatestPage, PageOutcome};
pub use carts::{CartKey, CartStore};
pub use sequence::{LatestSlot, RequestToken};
