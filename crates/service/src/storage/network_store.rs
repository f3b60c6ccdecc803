use std::{path::Path, sync::Arc};

use async_trait::async_trait;
use common::{default_network_table, NetworkTable};
use tokio::{fs, sync::RwLock};
use tracing::debug;

use crate::errors::ServiceError;

/// Trait abstraction over the network table.
/// The table is only ever read whole, read by key subset, or replaced whole.
#[async_trait]
pub trait NetworkStore: Send + Sync {
    /// Copy of the current table.
    async fn get_all(&self) -> NetworkTable;
    /// Install `table` in place of the current one and return what is now current.
    async fn replace_all(&self, table: NetworkTable) -> NetworkTable;
    /// Network names in table order.
    async fn names(&self) -> Vec<String>;
    /// Identifiers for each requested name, empty for names the table lacks.
    async fn lookup(&self, names: &[String]) -> NetworkTable;
}

/// Decode a request body into a network table.
///
/// Only a JSON object whose values are arrays of strings is accepted; anything
/// else is rejected whole rather than partially installed.
pub fn decode_table(bytes: &[u8]) -> Result<NetworkTable, ServiceError> {
    serde_json::from_slice(bytes).map_err(|e| ServiceError::Decode(e.to_string()))
}

/// In-memory store guarded by a read/write lock.
/// Readers never observe a partially replaced table.
#[derive(Debug, Default)]
pub struct InMemoryNetworkStore {
    inner: RwLock<NetworkTable>,
}

impl InMemoryNetworkStore {
    pub fn new(table: NetworkTable) -> Arc<Self> {
        Arc::new(Self { inner: RwLock::new(table) })
    }

    /// Store seeded with the built-in network table.
    pub fn with_defaults() -> Arc<Self> {
        Self::new(default_network_table())
    }

    /// Store seeded from a JSON file holding a network table.
    pub async fn from_seed_file<P: AsRef<Path>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let path = path.as_ref();
        let bytes = fs::read(path).await.map_err(|e| ServiceError::seed(path.display(), e))?;
        let table = decode_table(&bytes).map_err(|e| ServiceError::seed(path.display(), e))?;
        debug!(path = %path.display(), networks = table.len(), "loaded seed table");
        Ok(Self::new(table))
    }
}

#[async_trait]
impl NetworkStore for InMemoryNetworkStore {
    async fn get_all(&self) -> NetworkTable {
        self.inner.read().await.clone()
    }

    async fn replace_all(&self, table: NetworkTable) -> NetworkTable {
        let mut current = self.inner.write().await;
        *current = table;
        current.clone()
    }

    async fn names(&self) -> Vec<String> {
        self.inner.read().await.keys().cloned().collect()
    }

    async fn lookup(&self, names: &[String]) -> NetworkTable {
        let table = self.inner.read().await;
        let mut found = NetworkTable::with_capacity(names.len());
        for name in names {
            if found.contains_key(name) {
                continue;
            }
            let ids = table.get(name).cloned().unwrap_or_default();
            found.insert(name.clone(), ids);
        }
        found
    }
}
