//! State layer for the mock network-setup service.
//! - Holds the single network table behind the `NetworkStore` trait.
//! - Decodes incoming tables against an explicit schema.

pub mod errors;
pub mod storage;

pub use storage::network_store::{decode_table, InMemoryNetworkStore, NetworkStore};
