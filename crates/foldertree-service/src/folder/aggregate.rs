//! Page aggregation: groups ledger entries by parent.
//!
//! Ordering within one group comes from ledger order, which is increasing
//! by page number per parent because pages are appended before they are
//! fetched and never reordered. No sort step is applied.

use std::collections::{HashMap, HashSet};

use foldertree_cache::StoreSnapshot;
use foldertree_core::types::PageRequest;
use foldertree_entity::folder::FolderItem;
use foldertree_entity::page::{PageError, PageResult, PageStatus};

/// How far a parent's listing has been loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupLoadState<'a> {
    /// No page has been requested.
    NotRequested,
    /// The last page is in flight.
    Pending,
    /// The last page was full; more may follow.
    HasMore,
    /// The last page was short; the listing is complete.
    Complete,
    /// The last page failed.
    Failed {
        /// The failed page number.
        page: u64,
        /// What went wrong.
        error: &'a PageError,
    },
}

/// The pages loaded for one parent, in page order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageGroup {
    pages: Vec<PageResult>,
}

impl PageGroup {
    /// Build a group from pages already in page order.
    pub fn from_pages(pages: Vec<PageResult>) -> Self {
        Self { pages }
    }

    fn push(&mut self, page: PageResult) {
        self.pages.push(page);
    }

    /// Pages in page order.
    pub fn pages(&self) -> &[PageResult] {
        &self.pages
    }

    /// The most recently requested page.
    pub fn last(&self) -> Option<&PageResult> {
        self.pages.last()
    }

    /// Number of pages requested.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether no page has been requested.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Page number of the last page, if any.
    pub fn last_page_number(&self) -> Option<u64> {
        self.last().map(|page| page.request.page)
    }

    /// The group is fully loaded iff its last page is shorter than its limit.
    pub fn is_fully_loaded(&self) -> bool {
        self.last().is_some_and(PageResult::is_last_page)
    }

    /// Whether any page of the group is in flight.
    pub fn is_loading(&self) -> bool {
        self.pages.iter().any(PageResult::is_pending)
    }

    /// Loaded folders of every fulfilled page, in order.
    pub fn items(&self) -> impl Iterator<Item = &FolderItem> {
        self.pages.iter().flat_map(|page| page.items().iter())
    }

    /// Classify the group by its last page.
    pub fn load_state(&self) -> GroupLoadState<'_> {
        match self.last() {
            None => GroupLoadState::NotRequested,
            Some(page) => match &page.status {
                PageStatus::Pending => GroupLoadState::Pending,
                PageStatus::Failed(error) => GroupLoadState::Failed {
                    page: page.request.page,
                    error,
                },
                PageStatus::Fulfilled(_) if page.is_last_page() => GroupLoadState::Complete,
                PageStatus::Fulfilled(_) => GroupLoadState::HasMore,
            },
        }
    }
}

/// Aggregated view of every page a query has requested.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeState {
    /// Whether any tracked page is pending.
    pub is_loading: bool,
    /// Folder the tree is rooted at (`None` for the top level).
    pub root_uid: Option<String>,
    /// Pages of the root's children.
    pub root_pages: PageGroup,
    /// Pages of every other parent, keyed by parent uid.
    pub pages_by_parent: HashMap<String, PageGroup>,
}

impl TreeState {
    /// Whether `parent_uid` names the root of this tree.
    pub fn is_root(&self, parent_uid: Option<&str>) -> bool {
        match parent_uid {
            None | Some("") => true,
            Some(uid) => self.root_uid.as_deref() == Some(uid),
        }
    }

    /// The page group for `parent_uid`. The root group always exists.
    pub fn group(&self, parent_uid: Option<&str>) -> Option<&PageGroup> {
        if self.is_root(parent_uid) {
            return Some(&self.root_pages);
        }
        parent_uid.and_then(|uid| self.pages_by_parent.get(uid))
    }

    /// Total number of pages across all groups.
    pub fn page_count(&self) -> usize {
        self.root_pages.len()
            + self
                .pages_by_parent
                .values()
                .map(PageGroup::len)
                .sum::<usize>()
    }
}

/// Rebuild the tree state from a store snapshot and the ledger's requests.
///
/// Results are read from the snapshot by exact argument tuple. A request
/// whose result has already been bucketed (same store-assigned id) is
/// skipped. Pure: identical inputs give identical output.
pub fn aggregate<'a, I>(snapshot: &StoreSnapshot, requests: I, root_uid: Option<&str>) -> TreeState
where
    I: IntoIterator<Item = &'a PageRequest>,
{
    let mut state = TreeState {
        root_uid: root_uid.filter(|uid| !uid.is_empty()).map(str::to_string),
        ..TreeState::default()
    };
    let mut seen = HashSet::new();

    for request in requests {
        let Some(result) = snapshot.get(request) else {
            continue;
        };
        if !seen.insert(result.request_id) {
            continue;
        }

        state.is_loading |= result.is_pending();

        let parent = request.parent_uid.as_deref();
        if state.is_root(parent) {
            state.root_pages.push(result.clone());
        } else if let Some(uid) = parent {
            state
                .pages_by_parent
                .entry(uid.to_string())
                .or_default()
                .push(result.clone());
        }
    }

    state
}
