//! Page store configuration.

use serde::{Deserialize, Serialize};

/// Retention settings for the page store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of unsubscribed pages kept for reuse.
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
    /// How long a fulfilled page nobody subscribes to stays reusable, in seconds.
    #[serde(default = "default_keep_unused")]
    pub keep_unused_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: default_max_capacity(),
            keep_unused_seconds: default_keep_unused(),
        }
    }
}

fn default_max_capacity() -> u64 {
    10000
}

fn default_keep_unused() -> u64 {
    60
}
