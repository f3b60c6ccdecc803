use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid network table: {0}")]
    Decode(String),
    #[error("cannot load seed table from {path}: {reason}")]
    Seed { path: String, reason: String },
}

impl ServiceError {
    pub fn seed(path: impl std::fmt::Display, reason: impl std::fmt::Display) -> Self {
        Self::Seed { path: path.to_string(), reason: reason.to_string() }
    }
}
