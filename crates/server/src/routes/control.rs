use axum::{extract::State, Json};
use common::types::Health;
use tracing::info;

use super::AppState;
use crate::errors::ApiError;

pub const SHUTDOWN_MESSAGE: &str = "Server shutting down...";

pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

/// Stop accepting connections once this response has been written.
pub async fn shutdown(State(state): State<AppState>) -> Result<&'static str, ApiError> {
    let trigger = state.shutdown.as_ref().ok_or_else(|| {
        ApiError::UnsupportedOperation("server is not running with graceful shutdown support".into())
    })?;
    if trigger.trigger() {
        info!(event = "shutdown_requested", "shutdown requested over HTTP");
    }
    Ok(SHUTDOWN_MESSAGE)
}
