//! Shared test helpers for integration tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Semaphore;

use foldertree_cache::memory::FixtureFolderSource;
use foldertree_cache::{FolderSource, PageStore};
use foldertree_core::config::cache::CacheConfig;
use foldertree_core::result::AppResult;
use foldertree_core::types::PageRequest;
use foldertree_entity::folder::{FlatTreeItem, FolderItem, TreeItem};
use foldertree_service::{FoldersQuery, QueryOptions};

/// Upper bound for any single wait in these tests.
pub const SETTLE_TIMEOUT: Duration = Duration::from_secs(5);

/// Listing source that holds every response until the test lets it through.
#[derive(Debug)]
pub struct GatedSource {
    inner: FixtureFolderSource,
    gate: Semaphore,
    requests: Mutex<Vec<PageRequest>>,
}

impl GatedSource {
    /// A source over `folders` whose gate starts closed.
    pub fn closed(folders: Vec<FolderItem>) -> Self {
        Self {
            inner: FixtureFolderSource::new(folders),
            gate: Semaphore::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A source over `folders` that answers immediately.
    pub fn open(folders: Vec<FolderItem>) -> Self {
        let source = Self::closed(folders);
        source.release_all();
        source
    }

    /// Let `count` more responses through.
    pub fn release(&self, count: usize) {
        self.gate.add_permits(count);
    }

    /// Let every response through from now on.
    pub fn release_all(&self) {
        self.gate.add_permits(1 << 20);
    }

    /// Make the next `times` fetches of `(parent_uid, page)` fail.
    pub fn fail_page(&self, parent_uid: Option<&str>, page: u64, times: u32) {
        self.inner.fail_page(parent_uid, page, times);
    }

    /// Every request received, in arrival order.
    pub fn requests(&self) -> Vec<PageRequest> {
        self.requests.lock().expect("requests lock").clone()
    }

    /// Number of fetches that reached the listing.
    pub fn call_count(&self) -> usize {
        self.requests.lock().expect("requests lock").len()
    }
}

#[async_trait]
impl FolderSource for GatedSource {
    async fn list_folders(&self, request: &PageRequest) -> AppResult<Vec<FolderItem>> {
        self.requests
            .lock()
            .expect("requests lock")
            .push(request.clone());
        self.gate.acquire().await.expect("gate open").forget();
        self.inner.list_folders(request).await
    }
}

/// A source and the store fetching from it.
pub struct TestTree {
    /// The listing source.
    pub source: Arc<GatedSource>,
    /// The shared page store.
    pub store: PageStore,
}

impl TestTree {
    /// A tree whose responses are released manually.
    pub fn gated(folders: Vec<FolderItem>) -> Self {
        Self::from_source(GatedSource::closed(folders))
    }

    /// A tree whose responses arrive as soon as they are requested.
    pub fn open(folders: Vec<FolderItem>) -> Self {
        Self::from_source(GatedSource::open(folders))
    }

    fn from_source(source: GatedSource) -> Self {
        let source = Arc::new(source);
        let store =
            PageStore::new(source.clone(), &CacheConfig::default()).expect("tokio runtime");
        Self { source, store }
    }

    /// A new consumer with the given page limit.
    pub fn query(&self, page_limit: u64) -> FoldersQuery {
        FoldersQuery::new(
            self.store.clone(),
            QueryOptions::default().with_page_limit(page_limit),
        )
    }
}

/// Wait until none of `query`'s pages is in flight.
pub async fn settle(query: &mut FoldersQuery) {
    tokio::time::timeout(SETTLE_TIMEOUT, async {
        while query.is_loading() {
            query.wait_for_change().await.expect("store alive");
        }
    })
    .await
    .expect("query settled in time");
}

/// Let spawned fetches reach the source.
pub async fn yield_to_fetches() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

/// `count` top-level folders named `root-0`, `root-1`, ...
pub fn top_level(count: usize) -> Vec<FolderItem> {
    (0..count)
        .map(|i| FolderItem::new(format!("root-{i}"), format!("Root {i}"), None))
        .collect()
}

/// `count` children of `parent` named `{parent}-0`, `{parent}-1`, ...
pub fn children(parent: &str, count: usize) -> Vec<FolderItem> {
    (0..count)
        .map(|i| {
            FolderItem::new(
                format!("{parent}-{i}"),
                format!("{parent} child {i}"),
                Some(parent),
            )
        })
        .collect()
}

/// Short labels for a flattened list: folder uids, `root`, `…` and `!`.
pub fn labels(rows: &[FlatTreeItem]) -> Vec<String> {
    rows.iter()
        .map(|row| match &row.item {
            TreeItem::Root(_) => "root".to_string(),
            TreeItem::Folder(folder) => folder.uid.clone(),
            TreeItem::Placeholder { .. } => "…".to_string(),
            TreeItem::LoadError { .. } => "!".to_string(),
        })
        .collect()
}
