//! Vitrine Core - Shared types library.
//!
//! This crate provides types and logic shared between the binaries:
//! - `storefront` - Catalog client, query orchestration and HTTP surface
//! - `cli` - Command-line catalog browser
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product ids, prices, products and categories
//! - [`cart`] - The session cart store
//! - [`pagination`] - Page requests, page counts and the page window

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod pagination;
pub mod types;

pub use cart::{Cart, CartLine};
pub use pagination::{PageRequest, Paginator, Sort, SortOrder};
pub use types::*;
