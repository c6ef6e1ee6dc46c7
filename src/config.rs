//! Public bootstrap config. Fetched once at startup, unauthenticated; any
//! failure degrades to the default so rendering never blocks on it.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::debug;

use crate::api::AuthBackend;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default)]
    pub login_url: Option<String>,
    #[serde(default)]
    pub features: HashMap<String, bool>,
}

impl AppConfig {
    /// Feature flags default to off when the map has no entry.
    pub fn feature(&self, name: &str) -> bool {
        self.features.get(name).copied().unwrap_or(false)
    }
}

/// Fetch the bootstrap config, falling back to the empty default on any
/// failure (network, malformed body). Must never fail startup.
pub async fn load_config<B: AuthBackend>(backend: &B) -> AppConfig {
    match backend.config().await {
        Ok(cfg) => cfg,
        Err(e) => {
            debug!("config fetch failed, using defaults: {}", e);
            AppConfig::default()
        }
    }
}
