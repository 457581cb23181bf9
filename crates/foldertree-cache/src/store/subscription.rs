//! A consumer's interest in one page.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use foldertree_core::types::{PageRequest, RequestId};

use super::StoreInner;

/// Handle returned by [`PageStore::subscribe`](super::PageStore::subscribe).
///
/// Releasing it gives up interest in the page; the underlying fetch is
/// never aborted. Release is idempotent and also runs on drop.
pub struct PageSubscription {
    request_id: RequestId,
    request: PageRequest,
    store: Arc<StoreInner>,
    released: AtomicBool,
}

impl PageSubscription {
    pub(super) fn new(request_id: RequestId, request: PageRequest, store: Arc<StoreInner>) -> Self {
        Self {
            request_id,
            request,
            store,
            released: AtomicBool::new(false),
        }
    }

    /// Store-assigned identity of the page fetch.
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// The argument tuple this subscription is for.
    pub fn request(&self) -> &PageRequest {
        &self.request
    }

    /// Whether [`release`](Self::release) has run.
    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }

    /// Give up interest in the page.
    ///
    /// Returns `true` only for the call that actually released it.
    pub fn release(&self) -> bool {
        if self.released.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.store.release(&self.request);
        true
    }
}

impl Drop for PageSubscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for PageSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageSubscription")
            .field("request_id", &self.request_id)
            .field("request", &self.request)
            .field("released", &self.is_released())
            .finish()
    }
}
