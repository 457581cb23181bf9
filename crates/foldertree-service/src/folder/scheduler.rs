//! Next-page scheduling for one parent.
//!
//! Pages of a parent are requested one at a time, in increasing order, and
//! a page number is never requested twice: a failed page is refetched in
//! place rather than requested again.

use super::aggregate::{GroupLoadState, PageGroup};

/// What to do when more children of a parent are wanted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextPage {
    /// Request this page number.
    Fetch(u64),
    /// The last page failed; fetch the same page number again.
    Retry(u64),
    /// The last page is still in flight.
    AwaitPending(u64),
    /// The last page was short; there is nothing more to load.
    Exhausted,
}

/// Result of [`FoldersQuery::request_next_page`](super::FoldersQuery::request_next_page).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleOutcome {
    /// A new page was requested and appended to the ledger.
    Issued {
        /// The requested page number.
        page: u64,
    },
    /// A failed page was refetched.
    Retried {
        /// The refetched page number.
        page: u64,
    },
    /// Nothing was requested because a page is still in flight.
    Deferred {
        /// The pending page number.
        page: u64,
    },
    /// The parent is fully loaded.
    Exhausted,
    /// The query has been deactivated.
    Inactive,
}

impl ScheduleOutcome {
    /// Whether a fetch was started.
    pub fn started_fetch(&self) -> bool {
        matches!(self, Self::Issued { .. } | Self::Retried { .. })
    }
}

/// Decide the next page for a parent from its current page group.
///
/// A missing group is treated as empty.
pub fn next_page(group: Option<&PageGroup>) -> NextPage {
    let Some(group) = group else {
        return NextPage::Fetch(1);
    };
    let last = group.last_page_number().unwrap_or(0);

    match group.load_state() {
        GroupLoadState::NotRequested => NextPage::Fetch(1),
        GroupLoadState::Pending => NextPage::AwaitPending(last),
        GroupLoadState::Failed { page, .. } => NextPage::Retry(page),
        GroupLoadState::Complete => NextPage::Exhausted,
        GroupLoadState::HasMore => NextPage::Fetch(last + 1),
    }
}
