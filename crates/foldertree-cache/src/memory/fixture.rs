//! Fixture listing source backed by an in-memory folder table.
//!
//! Pages are cut from each parent's children in table order. The
//! permission filter is accepted and ignored.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::{debug, info};

use foldertree_core::error::AppError;
use foldertree_core::result::AppResult;
use foldertree_core::types::PageRequest;
use foldertree_entity::folder::FolderItem;

use crate::keys;
use crate::source::FolderSource;

/// Listing source serving folders from memory.
#[derive(Debug, Default)]
pub struct FixtureFolderSource {
    /// All folders, in listing order.
    folders: Vec<FolderItem>,
    /// Remaining injected failures per `(parent, page)`.
    failures: DashMap<(Option<String>, u64), u32>,
    /// Number of `list_folders` calls served.
    calls: AtomicUsize,
    /// Artificial delay before every response.
    latency: Option<Duration>,
}

impl FixtureFolderSource {
    /// Create a source over `folders`.
    pub fn new(folders: Vec<FolderItem>) -> Self {
        Self {
            folders,
            ..Self::default()
        }
    }

    /// Load the folder table from a JSON array of folders.
    pub async fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::configuration(format!("Failed to read fixture '{}': {e}", path.display()))
        })?;
        let folders: Vec<FolderItem> = serde_json::from_str(&raw)?;
        info!(path = %path.display(), count = folders.len(), "Loaded folder fixture");
        Ok(Self::new(folders))
    }

    /// Delay every response by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make the next `times` fetches of `(parent_uid, page)` fail.
    pub fn fail_page(&self, parent_uid: Option<&str>, page: u64, times: u32) {
        self.failures
            .insert((parent_uid.map(str::to_string), page), times);
    }

    /// Number of fetches served so far, failed ones included.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Children of `parent_uid` in listing order.
    pub fn children_of<'a>(
        &'a self,
        parent_uid: Option<&'a str>,
    ) -> impl Iterator<Item = &'a FolderItem> + 'a {
        self.folders
            .iter()
            .filter(move |folder| folder.parent_uid.as_deref() == parent_uid)
    }

    /// Consume one injected failure for the request, if any is left.
    fn take_failure(&self, request: &PageRequest) -> bool {
        let key = (request.parent_uid.clone(), request.page);
        match self.failures.get_mut(&key) {
            Some(mut remaining) if *remaining > 0 => {
                *remaining -= 1;
                true
            }
            _ => false,
        }
    }
}

#[async_trait]
impl FolderSource for FixtureFolderSource {
    async fn list_folders(&self, request: &PageRequest) -> AppResult<Vec<FolderItem>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if self.take_failure(request) {
            return Err(AppError::service_unavailable(format!(
                "Injected failure for {}",
                keys::page_key(request)
            )));
        }

        let page: Vec<FolderItem> = self
            .children_of(request.parent_uid.as_deref())
            .skip(request.offset() as usize)
            .take(request.limit as usize)
            .cloned()
            .collect();
        debug!(key = %keys::page_key(request), count = page.len(), "Served fixture page");
        Ok(page)
    }
}
