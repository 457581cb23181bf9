//! Per-query settings.

use foldertree_core::config::query::{QueryConfig, clamp_page_limit};
use foldertree_core::result::AppResult;
use foldertree_core::types::PermissionFilter;
use foldertree_core::types::pagination::DEFAULT_PAGE_LIMIT;
use foldertree_entity::folder::RootMarker;

/// Settings fixed for the lifetime of one [`FoldersQuery`](super::FoldersQuery).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOptions {
    /// Items per page, shared by every page of this query.
    pub page_limit: u64,
    /// Placeholder rows under a group that may have more pages.
    pub placeholder_rows: usize,
    /// Permission filter sent with every page request.
    pub permission: Option<PermissionFilter>,
    /// Folder the tree is rooted at (`None` for the top level).
    pub root_folder_uid: Option<String>,
    /// Title of the synthetic root row.
    pub root_title: String,
}

impl QueryOptions {
    /// Build options from the `[query]` configuration section.
    pub fn from_config(config: &QueryConfig) -> AppResult<Self> {
        let permission = config
            .permission
            .as_deref()
            .map(str::parse::<PermissionFilter>)
            .transpose()?;

        Ok(Self {
            page_limit: clamp_page_limit(config.page_limit),
            placeholder_rows: config.placeholder_rows,
            permission,
            root_folder_uid: config.root_folder_uid.clone().filter(|uid| !uid.is_empty()),
            root_title: config.root_title.clone(),
        })
    }

    /// Same options with a different page limit.
    pub fn with_page_limit(mut self, page_limit: u64) -> Self {
        self.page_limit = clamp_page_limit(page_limit);
        self
    }

    /// Same options rooted at `root_folder_uid`.
    pub fn with_root(mut self, root_folder_uid: Option<&str>) -> Self {
        self.root_folder_uid = root_folder_uid
            .filter(|uid| !uid.is_empty())
            .map(str::to_string);
        self
    }

    /// Same options with a permission filter.
    pub fn with_permission(mut self, permission: Option<PermissionFilter>) -> Self {
        self.permission = permission;
        self
    }

    /// The synthetic root row's content.
    pub fn root_marker(&self) -> RootMarker {
        RootMarker {
            uid: self.root_folder_uid.clone(),
            title: self.root_title.clone(),
        }
    }
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            page_limit: DEFAULT_PAGE_LIMIT,
            placeholder_rows: 1,
            permission: None,
            root_folder_uid: None,
            root_title: "Dashboards".to_string(),
        }
    }
}
