//! Core types for Vitrine.
//!
//! This module provides type-safe wrappers for catalog domain concepts.

pub mod category;
pub mod id;
pub mod price;
pub mod product;

pub use category::{Category, CategoryCount, CategoryFilter, CategoryRecord};
pub use id::*;
pub use price::Price;
pub use product::{Product, ProductPage};
