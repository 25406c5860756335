//! Vitrine Storefront library.
//!
//! This crate provides the catalog client, query orchestration and the JSON
//! storefront routes as a library, allowing them to be tested and reused by
//! the CLI.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
