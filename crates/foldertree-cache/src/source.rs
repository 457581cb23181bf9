//! Folder listing source trait.

use async_trait::async_trait;

use foldertree_core::result::AppResult;
use foldertree_core::types::PageRequest;
use foldertree_entity::folder::FolderItem;

/// A paginated folder listing service.
///
/// Returning fewer than `request.limit` items signals the end of the
/// parent's listing.
#[async_trait]
pub trait FolderSource: Send + Sync + std::fmt::Debug + 'static {
    /// Fetch one page of the children of `request.parent_uid`.
    async fn list_folders(&self, request: &PageRequest) -> AppResult<Vec<FolderItem>>;
}
