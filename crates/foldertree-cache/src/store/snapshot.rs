//! Point-in-time view of page results.

use std::collections::HashMap;

use foldertree_core::types::PageRequest;
use foldertree_entity::page::PageResult;

/// Page results read from the store at one version.
#[derive(Debug, Clone, Default)]
pub struct StoreSnapshot {
    version: u64,
    pages: HashMap<PageRequest, PageResult>,
}

impl StoreSnapshot {
    /// Build a snapshot from results keyed by their argument tuple.
    pub fn new(version: u64, pages: HashMap<PageRequest, PageResult>) -> Self {
        Self { version, pages }
    }

    /// Build a snapshot from results, keyed by each result's own request.
    pub fn from_results(version: u64, results: impl IntoIterator<Item = PageResult>) -> Self {
        let pages = results
            .into_iter()
            .map(|result| (result.request.clone(), result))
            .collect();
        Self { version, pages }
    }

    /// Store version the snapshot was taken at.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Result for an exact argument tuple.
    pub fn get(&self, request: &PageRequest) -> Option<&PageResult> {
        self.pages.get(request)
    }

    /// Number of results in the snapshot.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether the snapshot holds no results.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
