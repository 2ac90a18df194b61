//! CLI command implementations.

pub mod info;
