//! Source manager that dispatches to the configured listing service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use foldertree_core::config::listing::ListingConfig;
use foldertree_core::error::AppError;
use foldertree_core::result::AppResult;
use foldertree_core::types::PageRequest;
use foldertree_entity::folder::FolderItem;

use crate::source::FolderSource;

/// Wraps the listing source chosen by configuration.
///
/// This is the one place that decides which listing service is hit; the
/// store and the loader above it are identical for every source.
#[derive(Debug, Clone)]
pub struct FolderSourceManager {
    /// The inner listing source.
    inner: Arc<dyn FolderSource>,
}

impl FolderSourceManager {
    /// Create a source manager from configuration.
    pub async fn new(config: &ListingConfig) -> AppResult<Self> {
        let inner: Arc<dyn FolderSource> = match config.provider.as_str() {
            "fixture" => {
                let path = config.fixture_path.as_deref().ok_or_else(|| {
                    AppError::configuration(
                        "listing.fixture_path is required when listing.provider = \"fixture\"",
                    )
                })?;
                info!(path, "Initializing fixture folder source");
                Arc::new(crate::memory::FixtureFolderSource::load(path).await?)
            }
            #[cfg(feature = "http")]
            "http" => {
                info!(api = ?config.api, "Initializing HTTP folder source");
                Arc::new(crate::http::HttpFolderSource::new(config)?)
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown listing provider: '{other}'. Supported: fixture, http"
                )));
            }
        };

        Ok(Self { inner })
    }

    /// Create a source manager from an existing source (for testing).
    pub fn from_source(source: Arc<dyn FolderSource>) -> Self {
        Self { inner: source }
    }

    /// Shared handle to the inner source.
    pub fn source(&self) -> Arc<dyn FolderSource> {
        Arc::clone(&self.inner)
    }
}

#[async_trait]
impl FolderSource for FolderSourceManager {
    async fn list_folders(&self, request: &PageRequest) -> AppResult<Vec<FolderItem>> {
        self.inner.list_folders(request).await
    }
}
