//! The page request argument tuple.
//!
//! A [`PageRequest`] is the identity of one page fetch: two requests with
//! equal fields share a single store entry.

use serde::{Deserialize, Serialize};

use super::permission::PermissionFilter;

/// Default page size.
pub const DEFAULT_PAGE_LIMIT: u64 = 50;
/// Maximum page size.
pub const MAX_PAGE_LIMIT: u64 = 1000;

/// Arguments of a single folder listing page fetch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRequest {
    /// Parent folder (`None` for the top level).
    pub parent_uid: Option<String>,
    /// Page number (1-based).
    pub page: u64,
    /// Number of items per page.
    pub limit: u64,
    /// Permission filter applied by the listing service.
    pub permission: Option<PermissionFilter>,
}

impl PageRequest {
    /// Create a new page request.
    ///
    /// An empty parent uid is treated as the top level.
    pub fn new(
        parent_uid: Option<&str>,
        page: u64,
        limit: u64,
        permission: Option<PermissionFilter>,
    ) -> Self {
        Self {
            parent_uid: parent_uid.filter(|uid| !uid.is_empty()).map(str::to_string),
            page: page.max(1),
            limit: limit.clamp(1, MAX_PAGE_LIMIT),
            permission,
        }
    }

    /// Number of items preceding this page.
    pub fn offset(&self) -> u64 {
        (self.page.saturating_sub(1)) * self.limit
    }

    /// The request for the page after this one, same parent and limit.
    pub fn next(&self) -> Self {
        Self {
            page: self.page + 1,
            ..self.clone()
        }
    }

    /// Whether this request targets the given parent.
    pub fn is_for_parent(&self, parent_uid: Option<&str>) -> bool {
        self.parent_uid.as_deref() == parent_uid.filter(|uid| !uid.is_empty())
    }
}
