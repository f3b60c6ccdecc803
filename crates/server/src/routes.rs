use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use service::NetworkStore;
use tower_http::trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::shutdown::ShutdownTrigger;

pub mod control;
pub mod networks;

/// State injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn NetworkStore>,
    /// `None` when the router is served without graceful shutdown support.
    pub shutdown: Option<ShutdownTrigger>,
}

impl AppState {
    pub fn new(store: Arc<dyn NetworkStore>) -> Self {
        Self { store, shutdown: None }
    }

    pub fn with_shutdown(mut self, trigger: ShutdownTrigger) -> Self {
        self.shutdown = Some(trigger);
        self
    }
}

/// Build the mock network-setup router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/networks", get(networks::list_networks))
        .route("/plist", get(networks::plist))
        .route("/set_data", post(networks::set_data))
        .route("/get_data", get(networks::get_data))
        .route("/shutdown", get(control::shutdown))
        .route("/health", get(control::health))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
