//! Shared wire types and logging helpers used across the mock server crates.

pub mod types;
pub mod utils;

pub use types::{default_network_table, NetworkTable};
