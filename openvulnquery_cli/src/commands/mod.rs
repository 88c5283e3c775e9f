//! CLI command implementations.

pub mod query;
