//! CLI command implementations.

pub mod common;
pub mod cost;
pub mod graph;
pub mod list;
pub mod version;
