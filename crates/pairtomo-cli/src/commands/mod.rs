//! CLI command implementations.

pub mod common;
pub mod generate;
pub mod plan;
pub mod version;
