use serde::Deserialize;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub api: ApiSettings,
    #[serde(default)]
    pub cache: CacheSettings,
}

/// Where and how to reach the travel-agency REST API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    /// Base URL of the API, e.g. "https://api.example.com/api/v1".
    pub base_url: String,
    /// Per-request timeout. The aggregator enforces no timeout of its own;
    /// this is the transport-level bound.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// Lifetimes for the aggregator's local cache and refresh loop.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    /// How long a cached statistics object stays valid.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    /// How often the real-time refresh loop clears the cache.
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            refresh_interval_secs: default_refresh_interval_secs(),
        }
    }
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_ttl_secs() -> u64 {
    // 5 minutes, matching the dashboard's staleness tolerance.
    300
}

fn default_refresh_interval_secs() -> u64 {
    30
}
