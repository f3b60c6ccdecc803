//! Graceful shutdown signalling shared between the serve loop and handlers.

use std::sync::Arc;

use tokio::sync::watch;

/// Cloneable one-way switch. Once triggered it stays triggered.
#[derive(Clone, Debug)]
pub struct ShutdownTrigger {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for ShutdownTrigger {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownTrigger {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Request shutdown. Returns `true` only for the call that flipped the switch.
    pub fn trigger(&self) -> bool {
        !self.tx.send_replace(true)
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolve once `trigger` has been called, including calls made before waiting.
    pub async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        // the sender lives as long as `self`, so this cannot observe a closed channel
        let _ = rx.wait_for(|fired| *fired).await;
    }
}
