use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Network name -> SKAdNetwork identifiers.
///
/// Iteration follows insertion order, so `/networks` lists keys in the order
/// the table was seeded or posted.
pub type NetworkTable = IndexMap<String, Vec<String>>;

/// Table installed when the server starts without a seed file.
pub fn default_network_table() -> NetworkTable {
    let entries: [(&str, &[&str]); 5] = [
        ("AdColony", &["4PFYVQ9L8R.skadnetwork", "YCLNXRL5PM.skadnetwork"]),
        ("Google-Mobile-Ads-SDK", &["cstr6suwn9.skadnetwork"]),
        ("ChartboostSDK", &["blskdfjl2e3.skadnetwork"]),
        ("Applovin", &["ludvb6z3bs.skadnetwork"]),
        ("Unknown_network", &[]),
    ];
    entries
        .into_iter()
        .map(|(name, ids)| (name.to_string(), ids.iter().map(|s| s.to_string()).collect()))
        .collect()
}

#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

impl Health {
    pub fn ok() -> Self {
        Self { status: "ok" }
    }
}

/// Body of `GET /networks`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NetworksResponse {
    pub networks: Vec<String>,
}
