use std::io;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::warn;

/// Errors surfaced to HTTP callers as `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("missing required query parameter `{0}`")]
    MissingParameter(&'static str),
    #[error("cannot decode request body: {0}")]
    Decode(String),
    #[error("{0}")]
    UnsupportedOperation(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingParameter(_) | Self::Decode(_) => StatusCode::BAD_REQUEST,
            Self::UnsupportedOperation(_) => StatusCode::NOT_IMPLEMENTED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Decode(msg) => Self::Decode(msg),
            // seed loading happens at startup, never while serving a request
            seed @ ServiceError::Seed { .. } => Self::Internal(seed.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let msg = self.to_string();
        warn!(status = status.as_u16(), error = %msg, "request rejected");
        (status, Json(serde_json::json!({"error": msg}))).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("cannot bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Store(#[from] ServiceError),
}
