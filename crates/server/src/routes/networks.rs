use axum::{
    body::Bytes,
    extract::{Query, State},
    Json,
};
use common::{types::NetworksResponse, NetworkTable};
use tracing::{debug, info};

use super::AppState;
use crate::errors::ApiError;

pub const NETWORK_LIST_PARAM: &str = "network_list";

/// First `network_list` value; repeated parameters after it are ignored.
pub fn network_list_param(pairs: &[(String, String)]) -> Option<&str> {
    pairs
        .iter()
        .find(|(key, _)| key == NETWORK_LIST_PARAM)
        .map(|(_, value)| value.as_str())
}

pub async fn list_networks(State(state): State<AppState>) -> Json<NetworksResponse> {
    let networks = state.store.names().await;
    Json(NetworksResponse { networks })
}

/// Identifiers for each comma-separated name; unknown names map to `[]`.
pub async fn plist(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<NetworkTable>, ApiError> {
    let raw = network_list_param(&pairs).ok_or(ApiError::MissingParameter(NETWORK_LIST_PARAM))?;
    let names: Vec<String> = raw.split(',').map(str::to_string).collect();
    info!(?names, "plist requested");
    Ok(Json(state.store.lookup(&names).await))
}

// Body is decoded regardless of Content-Type; clients post with `curl -d`.
pub async fn set_data(State(state): State<AppState>, body: Bytes) -> Result<Json<NetworkTable>, ApiError> {
    let table = service::decode_table(&body)?;
    info!(networks = table.len(), "replacing network table");
    debug!(body = %String::from_utf8_lossy(&body), "set_data payload");
    Ok(Json(state.store.replace_all(table).await))
}

pub async fn get_data(State(state): State<AppState>) -> Json<NetworkTable> {
    Json(state.store.get_all().await)
}
