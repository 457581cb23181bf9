//! Deduplicating page store.
//!
//! Every page fetch is keyed by its [`PageRequest`]. Subscribing to an
//! argument tuple that is already active joins the existing entry, so two
//! consumers asking for the same page share one fetch and one
//! [`RequestId`]. When the last subscriber releases a fulfilled page it is
//! moved into a moka cache and reused by the next subscriber until it
//! expires.

mod snapshot;
mod subscription;

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use moka::sync::Cache;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, warn};

use foldertree_core::config::cache::CacheConfig;
use foldertree_core::error::{AppError, ErrorKind};
use foldertree_core::result::AppResult;
use foldertree_core::types::{PageRequest, RequestId};
use foldertree_entity::folder::FolderItem;
use foldertree_entity::page::{PageError, PageResult, PageStatus};

use crate::keys;
use crate::source::FolderSource;

pub use snapshot::StoreSnapshot;
pub use subscription::PageSubscription;

/// A page with at least one subscriber, or still in flight.
#[derive(Debug, Clone)]
struct ActiveEntry {
    /// Current snapshot of the page.
    result: PageResult,
    /// Number of live subscriptions.
    subscribers: usize,
    /// Incremented on every refetch; stale completions are discarded.
    attempt: u32,
}

/// A fulfilled page nobody subscribes to.
#[derive(Debug, Clone)]
struct RetainedPage {
    request_id: RequestId,
    items: Arc<Vec<FolderItem>>,
    fetched_at: DateTime<Utc>,
}

struct StoreInner {
    /// The listing service.
    source: Arc<dyn FolderSource>,
    /// Pages with subscribers or an in-flight fetch.
    active: DashMap<PageRequest, ActiveEntry>,
    /// Unused fulfilled pages kept for reuse.
    retained: Cache<PageRequest, RetainedPage>,
    /// Bumped on every observable change.
    version: watch::Sender<u64>,
    /// Runtime page fetches are spawned on.
    runtime: Handle,
}

/// Shared page store. Cheap to clone; clones share all state.
#[derive(Clone)]
pub struct PageStore {
    inner: Arc<StoreInner>,
}

impl PageStore {
    /// Create a store that fetches on the current tokio runtime.
    ///
    /// Fails when called outside a runtime; use
    /// [`with_runtime`](Self::with_runtime) there.
    pub fn new(source: Arc<dyn FolderSource>, config: &CacheConfig) -> AppResult<Self> {
        let runtime = Handle::try_current().map_err(|e| {
            AppError::with_source(
                ErrorKind::ServiceUnavailable,
                "Page store requires a tokio runtime",
                e,
            )
        })?;
        Ok(Self::with_runtime(source, config, runtime))
    }

    /// Create a store that spawns page fetches on `runtime`.
    ///
    /// Subscribing may then happen from any thread.
    pub fn with_runtime(
        source: Arc<dyn FolderSource>,
        config: &CacheConfig,
        runtime: Handle,
    ) -> Self {
        let retained = Cache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(Duration::from_secs(config.keep_unused_seconds))
            .build();
        let (version, _) = watch::channel(0);

        Self {
            inner: Arc::new(StoreInner {
                source,
                active: DashMap::new(),
                retained,
                version,
                runtime,
            }),
        }
    }

    /// Subscribe to the page described by `request`.
    ///
    /// Joins an active entry with identical arguments, promotes a retained
    /// page, or starts a new fetch on the store's runtime.
    pub fn subscribe(&self, request: PageRequest) -> PageSubscription {
        let key = keys::page_key(&request);
        let mut fetch = None;

        let request_id = match self.inner.active.entry(request.clone()) {
            Entry::Occupied(mut occupied) => {
                let entry = occupied.get_mut();
                entry.subscribers += 1;
                debug!(%key, subscribers = entry.subscribers, "Joined active page");
                entry.result.request_id
            }
            Entry::Vacant(vacant) => {
                let result = match self.inner.retained.remove(&request) {
                    Some(page) => {
                        debug!(%key, fetched_at = %page.fetched_at, "Reusing retained page");
                        PageResult {
                            request_id: page.request_id,
                            request: request.clone(),
                            status: PageStatus::Fulfilled(page.items),
                            updated_at: page.fetched_at,
                        }
                    }
                    None => {
                        debug!(%key, "Fetching page");
                        fetch = Some(0);
                        PageResult::pending(RequestId::new(), request.clone())
                    }
                };
                let request_id = result.request_id;
                vacant.insert(ActiveEntry {
                    result,
                    subscribers: 1,
                    attempt: 0,
                });
                request_id
            }
        };

        if let Some(attempt) = fetch {
            StoreInner::spawn_fetch(&self.inner, request.clone(), attempt);
        }
        self.inner.bump();

        PageSubscription::new(request_id, request, Arc::clone(&self.inner))
    }

    /// Restart a failed page, keeping its request id.
    ///
    /// Returns `false` if the page is not in a failed state.
    pub fn refetch(&self, subscription: &PageSubscription) -> bool {
        let request = subscription.request();
        let attempt = match self.inner.active.get_mut(request) {
            Some(mut entry) if entry.result.status.is_failed() => {
                entry.attempt += 1;
                entry.result.status = PageStatus::Pending;
                entry.result.updated_at = Utc::now();
                Some(entry.attempt)
            }
            _ => None,
        };

        match attempt {
            Some(attempt) => {
                debug!(key = %keys::page_key(request), attempt, "Refetching failed page");
                StoreInner::spawn_fetch(&self.inner, request.clone(), attempt);
                self.inner.bump();
                true
            }
            None => false,
        }
    }

    /// Read the results for `requests` by exact argument tuple.
    pub fn snapshot<'a, I>(&self, requests: I) -> StoreSnapshot
    where
        I: IntoIterator<Item = &'a PageRequest>,
    {
        let version = self.version();
        let pages = requests
            .into_iter()
            .filter_map(|request| {
                self.inner
                    .active
                    .get(request)
                    .map(|entry| (request.clone(), entry.result.clone()))
            })
            .collect();
        StoreSnapshot::new(version, pages)
    }

    /// Current result of an active page.
    pub fn lookup(&self, request: &PageRequest) -> Option<PageResult> {
        self.inner
            .active
            .get(request)
            .map(|entry| entry.result.clone())
    }

    /// Number of live subscriptions to `request`.
    pub fn subscriber_count(&self, request: &PageRequest) -> usize {
        self.inner
            .active
            .get(request)
            .map(|entry| entry.subscribers)
            .unwrap_or(0)
    }

    /// Whether an unused fulfilled page is held for reuse.
    pub fn is_retained(&self, request: &PageRequest) -> bool {
        self.inner.retained.contains_key(request)
    }

    /// Number of pages with subscribers or an in-flight fetch.
    pub fn active_count(&self) -> usize {
        self.inner.active.len()
    }

    /// Monotonic change counter.
    pub fn version(&self) -> u64 {
        *self.inner.version.borrow()
    }

    /// Receiver notified whenever the store changes.
    pub fn watch(&self) -> watch::Receiver<u64> {
        self.inner.version.subscribe()
    }
}

impl fmt::Debug for PageStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageStore")
            .field("source", &self.inner.source)
            .field("active", &self.inner.active.len())
            .field("retained", &self.inner.retained.entry_count())
            .field("version", &self.version())
            .finish()
    }
}

impl StoreInner {
    fn bump(&self) {
        self.version.send_modify(|v| *v = v.wrapping_add(1));
    }

    fn spawn_fetch(inner: &Arc<Self>, request: PageRequest, attempt: u32) {
        let store = Arc::clone(inner);
        inner.runtime.spawn(async move {
            let outcome = store
                .source
                .list_folders(&request)
                .await
                .and_then(|items| normalize_page(&request, items));
            store.complete(&request, attempt, outcome);
        });
    }

    /// Record the outcome of a fetch.
    fn complete(&self, request: &PageRequest, attempt: u32, outcome: AppResult<Vec<FolderItem>>) {
        let key = keys::page_key(request);
        let status = match outcome {
            Ok(items) => {
                debug!(%key, count = items.len(), "Page fulfilled");
                PageStatus::Fulfilled(Arc::new(items))
            }
            Err(e) => {
                warn!(%key, error = %e, "Page fetch failed");
                PageStatus::Failed(PageError::from(&e))
            }
        };

        let applied = match self.active.get_mut(request) {
            Some(mut entry) if entry.attempt == attempt => {
                entry.result.status = status;
                entry.result.updated_at = Utc::now();
                true
            }
            _ => false,
        };

        if !applied {
            debug!(%key, attempt, "Discarded stale page completion");
            return;
        }

        self.retire_if_unused(request);
        self.bump();
    }

    /// Drop one subscriber from `request`.
    fn release(&self, request: &PageRequest) {
        if let Some(mut entry) = self.active.get_mut(request) {
            entry.subscribers = entry.subscribers.saturating_sub(1);
            debug!(
                key = %keys::page_key(request),
                subscribers = entry.subscribers,
                "Released page subscription"
            );
        }
        self.retire_if_unused(request);
        self.bump();
    }

    /// Move a settled page without subscribers out of the active set.
    ///
    /// Pending pages stay until their fetch completes.
    fn retire_if_unused(&self, request: &PageRequest) {
        let removed = self.active.remove_if(request, |_, entry| {
            entry.subscribers == 0 && !entry.result.is_pending()
        });

        if let Some((request, entry)) = removed {
            let request_id = entry.result.request_id;
            let fetched_at = entry.result.updated_at;
            match entry.result.status {
                PageStatus::Fulfilled(items) => {
                    debug!(
                        key = %keys::page_key(&request),
                        %fetched_at,
                        "Retaining unused page"
                    );
                    self.retained.insert(
                        request,
                        RetainedPage {
                            request_id,
                            items,
                            fetched_at,
                        },
                    );
                }
                _ => {
                    debug!(key = %keys::page_key(&request), "Dropping unused failed page");
                }
            }
        }
    }
}

/// Validate a listing response and attach the requested parent to items.
fn normalize_page(request: &PageRequest, items: Vec<FolderItem>) -> AppResult<Vec<FolderItem>> {
    if items.len() as u64 > request.limit {
        return Err(AppError::malformed(format!(
            "{} returned {} items for a limit of {}",
            keys::page_key(request),
            items.len(),
            request.limit
        )));
    }

    let mut seen = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .map(|mut item| {
            item.validate()?;
            if !seen.insert(item.uid.clone()) {
                return Err(AppError::malformed(format!(
                    "{} listed folder '{}' twice",
                    keys::page_key(request),
                    item.uid
                )));
            }
            let parent = item.parent_uid.take().filter(|uid| !uid.is_empty());
            if parent.is_some() && parent != request.parent_uid {
                return Err(AppError::malformed(format!(
                    "{} returned folder '{}' belonging to '{}'",
                    keys::page_key(request),
                    item.uid,
                    parent.as_deref().unwrap_or_default()
                )));
            }
            item.parent_uid = request.parent_uid.clone();
            Ok(item)
        })
        .collect()
}
