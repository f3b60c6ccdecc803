//! Storage abstractions for the service layer
//!
//! The network table lives entirely in memory; restarting the server
//! reinstalls the seed table.

pub mod network_store;
