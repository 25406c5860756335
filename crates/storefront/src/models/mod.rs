//! Domain models for storefront.
//!
//! Catalog types live in `vitrine_core`; this module holds what the storefront
//! keeps per visitor.

pub mod session;

pub use session::{cart_key, find_cart_key, keys};
