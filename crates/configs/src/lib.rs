use std::{io, path::PathBuf};

use anyhow::{anyhow, Result};
use serde::Deserialize;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_WORKER_THREADS: usize = 4;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port(), worker_threads: Some(DEFAULT_WORKER_THREADS) }
    }
}

/// Where the initial network table comes from.
/// Without a seed file the built-in default table is installed.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct StoreConfig {
    #[serde(default)]
    pub seed_file: Option<PathBuf>,
}

fn default_host() -> String { DEFAULT_HOST.to_string() }
fn default_port() -> u16 { DEFAULT_PORT }

pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_default() -> Result<AppConfig> {
    load_from_file(&config_path())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

fn is_not_found(err: &anyhow::Error) -> bool {
    err.downcast_ref::<io::Error>()
        .is_some_and(|e| e.kind() == io::ErrorKind::NotFound)
}

impl AppConfig {
    /// Config file when one exists, otherwise environment variables
    /// (`SERVER_HOST`, `SERVER_PORT`, `TOKIO_WORKER_THREADS`, `SEED_FILE`).
    /// A config file that exists but cannot be read or parsed is an error.
    pub fn load_or_env() -> Result<Self> {
        let path = config_path();
        let mut cfg = match load_from_file(&path) {
            Ok(cfg) => cfg,
            Err(e) if is_not_found(&e) => Self::from_env()?,
            Err(e) => return Err(e.context(format!("cannot load config file {path}"))),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from a variable lookup; blank values count as unset, unparsable ones are errors.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let port = match var("SERVER_PORT") {
            Some(p) => p
                .trim()
                .parse::<u16>()
                .map_err(|e| anyhow!("SERVER_PORT={p:?} is not a valid port: {e}"))?,
            None => DEFAULT_PORT,
        };
        let worker_threads = match var("TOKIO_WORKER_THREADS") {
            Some(v) => Some(
                v.trim()
                    .parse::<usize>()
                    .map_err(|e| anyhow!("TOKIO_WORKER_THREADS={v:?} is not a valid thread count: {e}"))?,
            ),
            None => None,
        };
        let server = ServerConfig {
            host: var("SERVER_HOST").unwrap_or_else(default_host),
            port,
            worker_threads,
        };
        let store = StoreConfig { seed_file: var("SEED_FILE").map(PathBuf::from) };
        Ok(Self { server, store })
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = DEFAULT_HOST.to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(0) => return Err(anyhow!("server.worker_threads must be >= 1")),
            Some(_) => {}
            None => self.worker_threads = Some(DEFAULT_WORKER_THREADS),
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
