//! Append-only record of the page subscriptions one query has made.

use tracing::debug;

use foldertree_cache::PageSubscription;
use foldertree_core::error::AppError;
use foldertree_core::result::AppResult;
use foldertree_core::types::PageRequest;

/// Every page subscription issued by one query, in issue order.
///
/// Entries are never removed individually. The ledger grows for the
/// lifetime of its query and is released wholesale on teardown.
#[derive(Debug, Default)]
pub struct RequestLedger {
    entries: Vec<PageSubscription>,
    released: bool,
}

impl RequestLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a subscription. Fails once the ledger has been released.
    pub fn append(&mut self, subscription: PageSubscription) -> AppResult<&PageSubscription> {
        if self.released {
            subscription.release();
            return Err(AppError::validation(
                "Cannot append to a released request ledger",
            ));
        }
        self.entries.push(subscription);
        let index = self.entries.len() - 1;
        Ok(&self.entries[index])
    }

    /// Number of recorded subscriptions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Subscriptions in issue order.
    pub fn iter(&self) -> impl Iterator<Item = &PageSubscription> {
        self.entries.iter()
    }

    /// Argument tuples in issue order.
    pub fn requests(&self) -> impl Iterator<Item = &PageRequest> {
        self.entries.iter().map(PageSubscription::request)
    }

    /// The subscription for an exact argument tuple.
    pub fn find(&self, request: &PageRequest) -> Option<&PageSubscription> {
        self.entries.iter().find(|entry| entry.request() == request)
    }

    /// Whether [`release_all`](Self::release_all) has run.
    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Release every subscription. Safe to call more than once; returns the
    /// number of subscriptions this call released.
    pub fn release_all(&mut self) -> usize {
        let released = self
            .entries
            .iter()
            .filter(|entry| entry.release())
            .count();
        if !self.released {
            debug!(entries = self.entries.len(), released, "Released request ledger");
        }
        self.released = true;
        released
    }
}
