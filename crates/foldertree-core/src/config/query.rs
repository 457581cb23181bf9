//! Per-consumer query configuration.

use serde::{Deserialize, Serialize};

use crate::types::pagination::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};

/// Settings shared by every page a folder query requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Items requested per page. Constant for the lifetime of a query.
    #[serde(default = "default_page_limit")]
    pub page_limit: u64,
    /// Placeholder rows appended under a group that may have more pages.
    #[serde(default = "default_placeholder_rows")]
    pub placeholder_rows: usize,
    /// Permission filter forwarded to the listing service.
    #[serde(default)]
    pub permission: Option<String>,
    /// Start browsing below this folder instead of the top level.
    #[serde(default)]
    pub root_folder_uid: Option<String>,
    /// Title shown on the synthetic root row.
    #[serde(default = "default_root_title")]
    pub root_title: String,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            page_limit: default_page_limit(),
            placeholder_rows: default_placeholder_rows(),
            permission: None,
            root_folder_uid: None,
            root_title: default_root_title(),
        }
    }
}

/// Clamp a configured page limit into the accepted range.
pub fn clamp_page_limit(limit: u64) -> u64 {
    limit.clamp(1, MAX_PAGE_LIMIT)
}

fn default_page_limit() -> u64 {
    DEFAULT_PAGE_LIMIT
}

fn default_placeholder_rows() -> usize {
    1
}

fn default_root_title() -> String {
    "Dashboards".to_string()
}
