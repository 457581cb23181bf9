//! A page fetch and its current status.

use chrono::{DateTime, Utc};

use foldertree_core::types::{PageRequest, RequestId};

use super::status::{PageError, PageStatus};
use crate::folder::FolderItem;

/// Snapshot of one page as seen by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult {
    /// Store-assigned identity, shared by every subscription to `request`.
    pub request_id: RequestId,
    /// The argument tuple.
    pub request: PageRequest,
    /// Current status.
    pub status: PageStatus,
    /// When the status last changed.
    pub updated_at: DateTime<Utc>,
}

impl PageResult {
    /// A page that has just been requested.
    pub fn pending(request_id: RequestId, request: PageRequest) -> Self {
        Self {
            request_id,
            request,
            status: PageStatus::Pending,
            updated_at: Utc::now(),
        }
    }

    /// Check if the fetch is still in flight.
    pub fn is_pending(&self) -> bool {
        self.status.is_pending()
    }

    /// Items of a fulfilled page; `None` while pending or after an error.
    pub fn data(&self) -> Option<&[FolderItem]> {
        match &self.status {
            PageStatus::Fulfilled(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Items of the page, empty unless fulfilled.
    pub fn items(&self) -> &[FolderItem] {
        self.data().unwrap_or(&[])
    }

    /// The error of a failed page.
    pub fn error(&self) -> Option<&PageError> {
        match &self.status {
            PageStatus::Failed(error) => Some(error),
            _ => None,
        }
    }

    /// A fulfilled page shorter than its limit ends its parent's listing.
    pub fn is_last_page(&self) -> bool {
        self.data()
            .is_some_and(|items| (items.len() as u64) < self.request.limit)
    }
}
