//! CLI subcommands.

pub mod catalog;
