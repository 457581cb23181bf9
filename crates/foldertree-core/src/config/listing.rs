//! Listing service configuration.

use serde::{Deserialize, Serialize};

/// Which folder listing endpoint the HTTP source talks to.
///
/// This is the only switch between the legacy and the current folder
/// browsing backends; pagination and flattening are shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingApi {
    /// `GET /api/folders` with `parentUid`.
    #[default]
    Legacy,
    /// `GET /api/search` restricted to folders with `folderUIDs`.
    Browse,
}

/// Listing source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    /// Source type: `"fixture"` or `"http"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Endpoint flavour used by the HTTP source.
    #[serde(default)]
    pub api: ListingApi,
    /// Base URL of the listing service.
    #[serde(default)]
    pub base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// JSON file with the folder table for the fixture source.
    #[serde(default)]
    pub fixture_path: Option<String>,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            api: ListingApi::default(),
            base_url: String::new(),
            timeout_seconds: default_timeout(),
            fixture_path: None,
        }
    }
}

fn default_provider() -> String {
    "fixture".to_string()
}

fn default_timeout() -> u64 {
    30
}
