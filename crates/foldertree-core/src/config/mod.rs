//! Loader configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from an
//! optional TOML file plus `FOLDERTREE__` environment variables. Each
//! sub-module represents a logical configuration section.

pub mod cache;
pub mod listing;
pub mod logging;
pub mod query;

use serde::{Deserialize, Serialize};

use self::cache::CacheConfig;
use self::listing::ListingConfig;
use self::logging::LoggingConfig;
use self::query::QueryConfig;

use crate::error::AppError;

/// Root configuration.
///
/// Every section has serde defaults, so an empty source yields a usable
/// configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Listing service selection and connection settings.
    #[serde(default)]
    pub listing: ListingConfig,
    /// Per-consumer query settings.
    #[serde(default)]
    pub query: QueryConfig,
    /// Page store retention settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// The file is optional. Environment variables prefixed with
    /// `FOLDERTREE__` override file values (e.g. `FOLDERTREE__QUERY__PAGE_LIMIT`).
    pub fn load(path: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("FOLDERTREE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let mut loaded: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Parse configuration from an in-memory TOML string.
    pub fn from_toml(source: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?;
        let mut loaded: Self = config.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Normalise and check cross-field constraints.
    fn validate(&mut self) -> Result<(), AppError> {
        self.query.page_limit = query::clamp_page_limit(self.query.page_limit);
        if self.listing.provider == "http" && self.listing.base_url.trim().is_empty() {
            return Err(AppError::configuration(
                "listing.base_url is required when listing.provider = \"http\"",
            ));
        }
        Ok(())
    }
}
