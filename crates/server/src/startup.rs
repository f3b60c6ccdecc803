use std::{io, net::SocketAddr, sync::Arc};

use configs::{AppConfig, StoreConfig};
use service::{InMemoryNetworkStore, NetworkStore};
use tokio::{net::TcpListener, task::JoinHandle};
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes::{build_router, AppState};
use crate::shutdown::ShutdownTrigger;

/// Seed table from the configured file, or the built-in defaults
pub async fn build_store(cfg: &StoreConfig) -> Result<Arc<dyn NetworkStore>, StartupError> {
    let store: Arc<dyn NetworkStore> = match &cfg.seed_file {
        Some(path) => InMemoryNetworkStore::from_seed_file(path).await?,
        None => InMemoryNetworkStore::with_defaults(),
    };
    Ok(store)
}

/// A running mock server bound to a local address.
///
/// Serving stops when `stop` is called or a client hits `/shutdown`; either
/// way the listener is dropped and later connections are refused.
pub struct MockServer {
    addr: SocketAddr,
    shutdown: ShutdownTrigger,
    handle: JoinHandle<io::Result<()>>,
}

impl MockServer {
    pub async fn bind(addr: &str, store: Arc<dyn NetworkStore>) -> Result<Self, StartupError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| StartupError::Bind { addr: addr.to_string(), source })?;
        Self::serve(listener, store)
    }

    /// Serve on an already bound listener (tests bind port 0).
    pub fn serve(listener: TcpListener, store: Arc<dyn NetworkStore>) -> Result<Self, StartupError> {
        let addr = listener
            .local_addr()
            .map_err(|source| StartupError::Bind { addr: "<listener>".to_string(), source })?;
        let shutdown = ShutdownTrigger::new();
        let app = build_router(AppState::new(store).with_shutdown(shutdown.clone()));

        let signal = shutdown.clone();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move { signal.wait().await })
                .await
        });

        info!(%addr, "mock server listening");
        Ok(Self { addr, shutdown, handle })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn shutdown_trigger(&self) -> ShutdownTrigger {
        self.shutdown.clone()
    }

    /// Trigger graceful shutdown and wait for the serve loop to finish.
    pub async fn stop(self) -> anyhow::Result<()> {
        self.shutdown.trigger();
        self.wait().await
    }

    /// Wait for the serve loop to finish without triggering shutdown.
    pub async fn wait(self) -> anyhow::Result<()> {
        let addr = self.addr;
        self.handle.await??;
        info!(%addr, "mock server stopped");
        Ok(())
    }
}

/// Public entry: serve until `/shutdown` or Ctrl+C
pub async fn run(mut config: AppConfig) -> anyhow::Result<()> {
    config
        .normalize_and_validate()
        .map_err(|e| StartupError::InvalidConfig(e.to_string()))?;

    let store = build_store(&config.store).await?;
    let server = MockServer::bind(&config.server.bind_addr(), store).await?;

    let trigger = server.shutdown_trigger();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!(event = "shutdown_signal", "received Ctrl+C, shutting down");
                trigger.trigger();
            }
            Err(e) => warn!(error = %e, "cannot listen for Ctrl+C"),
        }
    });

    server.wait().await
}
