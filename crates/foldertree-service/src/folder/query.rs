//! One consumer's folder tree query.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use foldertree_cache::keys;
use foldertree_cache::PageStore;
use foldertree_core::error::AppError;
use foldertree_core::result::AppResult;
use foldertree_core::types::{PageRequest, QueryId};
use foldertree_entity::folder::{FlatTreeItem, OpenFolders};

use super::aggregate::{TreeState, aggregate};
use super::flatten::flatten;
use super::ledger::RequestLedger;
use super::options::QueryOptions;
use super::scheduler::{NextPage, ScheduleOutcome, next_page};

/// What the renderer consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldersView {
    /// Flattened rows, root row first.
    pub items: Arc<[FlatTreeItem]>,
    /// Whether any page of this query is in flight.
    pub is_loading: bool,
}

/// Last computed view and the inputs it was computed from.
#[derive(Debug)]
struct ViewMemo {
    store_version: u64,
    ledger_len: usize,
    is_browsing: bool,
    open_folders: OpenFolders,
    view: FoldersView,
}

impl ViewMemo {
    fn matches(
        &self,
        store_version: u64,
        ledger_len: usize,
        is_browsing: bool,
        open_folders: &OpenFolders,
    ) -> bool {
        self.store_version == store_version
            && self.ledger_len == ledger_len
            && self.is_browsing == is_browsing
            && &self.open_folders == open_folders
    }
}

/// An active folder tree query.
///
/// Owns the ledger of every page it subscribed to. Dropping the query, or
/// calling [`deactivate`](Self::deactivate), releases all of them exactly
/// once.
#[derive(Debug)]
pub struct FoldersQuery {
    id: QueryId,
    store: PageStore,
    options: QueryOptions,
    ledger: RequestLedger,
    changes: watch::Receiver<u64>,
    memo: Option<ViewMemo>,
}

impl FoldersQuery {
    /// Activate a query against `store`. Nothing is fetched yet.
    pub fn new(store: PageStore, options: QueryOptions) -> Self {
        let id = QueryId::new();
        info!(
            query = %id,
            root = keys::parent_segment(options.root_folder_uid.as_deref()),
            page_limit = options.page_limit,
            "Activated folder query"
        );
        let changes = store.watch();
        Self {
            id,
            store,
            options,
            ledger: RequestLedger::new(),
            changes,
            memo: None,
        }
    }

    /// Activate a query and, when browsing, request the first root page.
    pub fn init(store: PageStore, options: QueryOptions, is_browsing: bool) -> Self {
        let mut query = Self::new(store, options);
        if is_browsing {
            query.request_next_page(None);
        }
        query
    }

    /// Identity of this query.
    pub fn id(&self) -> QueryId {
        self.id
    }

    /// Settings of this query.
    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    /// Every subscription this query has made.
    pub fn ledger(&self) -> &RequestLedger {
        &self.ledger
    }

    /// Whether the query has not been deactivated.
    pub fn is_active(&self) -> bool {
        !self.ledger.is_released()
    }

    /// Aggregate the ledger against the current store contents.
    pub fn tree_state(&self) -> TreeState {
        let snapshot = self.store.snapshot(self.ledger.requests());
        aggregate(
            &snapshot,
            self.ledger.requests(),
            self.options.root_folder_uid.as_deref(),
        )
    }

    /// Whether any page of this query is in flight.
    pub fn is_loading(&self) -> bool {
        self.tree_state().is_loading
    }

    /// Request the next page of `parent_uid`'s children (`None` for the root).
    ///
    /// Does nothing while the parent's last page is in flight or once the
    /// parent is fully loaded. A failed last page is refetched in place.
    pub fn request_next_page(&mut self, parent_uid: Option<&str>) -> ScheduleOutcome {
        if self.ledger.is_released() {
            debug!(query = %self.id, "Ignoring page request on inactive query");
            return ScheduleOutcome::Inactive;
        }

        let parent = match parent_uid.filter(|uid| !uid.is_empty()) {
            Some(uid) => Some(uid.to_string()),
            None => self.options.root_folder_uid.clone(),
        };
        let parent_key = keys::parent_segment(parent.as_deref()).to_string();
        let state = self.tree_state();

        match next_page(state.group(parent.as_deref())) {
            NextPage::Exhausted => {
                debug!(query = %self.id, parent = %parent_key, "Parent fully loaded");
                ScheduleOutcome::Exhausted
            }
            NextPage::AwaitPending(page) => {
                debug!(query = %self.id, parent = %parent_key, page, "Page still pending");
                ScheduleOutcome::Deferred { page }
            }
            NextPage::Retry(page) => {
                let request = self.page_request(parent.as_deref(), page);
                let refetched = self
                    .ledger
                    .find(&request)
                    .is_some_and(|subscription| self.store.refetch(subscription));
                if refetched {
                    info!(query = %self.id, parent = %parent_key, page, "Retrying failed page");
                    ScheduleOutcome::Retried { page }
                } else {
                    debug!(query = %self.id, parent = %parent_key, page, "Failed page already refetching");
                    ScheduleOutcome::Deferred { page }
                }
            }
            NextPage::Fetch(page) => {
                let request = self.page_request(parent.as_deref(), page);
                let subscription = self.store.subscribe(request);
                match self.ledger.append(subscription) {
                    Ok(_) => {
                        debug!(query = %self.id, parent = %parent_key, page, "Requested page");
                        ScheduleOutcome::Issued { page }
                    }
                    Err(e) => {
                        warn!(query = %self.id, error = %e, "Could not record page request");
                        ScheduleOutcome::Inactive
                    }
                }
            }
        }
    }

    /// The flattened rows and loading flag for the given UI state.
    ///
    /// Returns the previous `Arc` when neither the store, the ledger, the
    /// browsing flag nor the open folders changed.
    pub fn view(&mut self, is_browsing: bool, open_folders: &OpenFolders) -> FoldersView {
        let store_version = self.store.version();
        let ledger_len = self.ledger.len();

        if let Some(memo) = &self.memo {
            if memo.matches(store_version, ledger_len, is_browsing, open_folders) {
                return memo.view.clone();
            }
        }

        let state = self.tree_state();
        let items: Arc<[FlatTreeItem]> =
            flatten(&state, open_folders, is_browsing, &self.options).into();
        let view = FoldersView {
            items,
            is_loading: state.is_loading,
        };

        self.memo = Some(ViewMemo {
            store_version,
            ledger_len,
            is_browsing,
            open_folders: open_folders.clone(),
            view: view.clone(),
        });
        view
    }

    /// Wait until the store changes after the last wait.
    pub async fn wait_for_change(&mut self) -> AppResult<()> {
        self.changes
            .changed()
            .await
            .map_err(|_| AppError::cache("Page store closed"))
    }

    /// Release every page this query subscribed to.
    ///
    /// Runs at most once; later calls, including the one from `Drop`,
    /// release nothing and return 0.
    pub fn deactivate(&mut self) -> usize {
        if self.ledger.is_released() {
            return 0;
        }
        let released = self.ledger.release_all();
        self.memo = None;
        info!(
            query = %self.id,
            pages = self.ledger.len(),
            released,
            "Deactivated folder query"
        );
        released
    }

    fn page_request(&self, parent_uid: Option<&str>, page: u64) -> PageRequest {
        PageRequest::new(
            parent_uid,
            page,
            self.options.page_limit,
            self.options.permission,
        )
    }
}

impl Drop for FoldersQuery {
    fn drop(&mut self) {
        self.deactivate();
    }
}
