//! Flattened folder tree rows for hierarchical display.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::model::FolderItem;
use crate::page::PageError;

/// Which folders the user has expanded, keyed by folder uid.
///
/// Owned by the rendering layer; the loader only reads it.
pub type OpenFolders = HashMap<String, bool>;

/// The synthetic row at level 0 that every flattened tree starts with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootMarker {
    /// Folder the tree is rooted at (`None` for the top level).
    pub uid: Option<String>,
    /// Display title.
    pub title: String,
}

/// Content of a flattened row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TreeItem {
    /// The synthetic root.
    Root(RootMarker),
    /// A loaded folder.
    Folder(FolderItem),
    /// A skeleton row standing in for a page that is not loaded yet.
    #[serde(rename_all = "camelCase")]
    Placeholder {
        /// Parent whose children are still loading.
        parent_uid: Option<String>,
        /// Position among this group's placeholders.
        index: usize,
    },
    /// The last page of a group failed to load.
    #[serde(rename_all = "camelCase")]
    LoadError {
        /// Parent whose page failed.
        parent_uid: Option<String>,
        /// The failed page number.
        page: u64,
        /// What went wrong.
        error: PageError,
    },
}

/// One row of the flattened tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatTreeItem {
    /// Depth (0 is the synthetic root).
    pub level: usize,
    /// Whether the row is expanded.
    pub is_open: bool,
    /// Row content.
    pub item: TreeItem,
}

impl FlatTreeItem {
    /// The root row: level 0, always open.
    pub fn root(marker: RootMarker) -> Self {
        Self {
            level: 0,
            is_open: true,
            item: TreeItem::Root(marker),
        }
    }

    /// A folder row.
    pub fn folder(item: FolderItem, level: usize, is_open: bool) -> Self {
        Self {
            level,
            is_open,
            item: TreeItem::Folder(item),
        }
    }

    /// A placeholder row under `parent_uid`.
    pub fn placeholder(parent_uid: Option<&str>, level: usize, index: usize) -> Self {
        Self {
            level,
            is_open: false,
            item: TreeItem::Placeholder {
                parent_uid: parent_uid.map(str::to_string),
                index,
            },
        }
    }

    /// An error row under `parent_uid`.
    pub fn load_error(parent_uid: Option<&str>, level: usize, page: u64, error: PageError) -> Self {
        Self {
            level,
            is_open: false,
            item: TreeItem::LoadError {
                parent_uid: parent_uid.map(str::to_string),
                page,
                error,
            },
        }
    }

    /// Whether this row is a loading skeleton.
    pub fn is_placeholder(&self) -> bool {
        matches!(self.item, TreeItem::Placeholder { .. })
    }

    /// The folder on this row, if it is one.
    pub fn as_folder(&self) -> Option<&FolderItem> {
        match &self.item {
            TreeItem::Folder(folder) => Some(folder),
            _ => None,
        }
    }

    /// A key that is unique within one flattened list and stable across
    /// recomputations.
    pub fn key(&self) -> String {
        match &self.item {
            TreeItem::Root(marker) => format!("root:{}", marker.uid.as_deref().unwrap_or("")),
            TreeItem::Folder(folder) => format!("folder:{}", folder.uid),
            TreeItem::Placeholder { parent_uid, index } => format!(
                "placeholder:{}:{}:{index}",
                parent_uid.as_deref().unwrap_or(""),
                self.level
            ),
            TreeItem::LoadError {
                parent_uid, page, ..
            } => format!("error:{}:{page}", parent_uid.as_deref().unwrap_or("")),
        }
    }

    /// Display title for the row.
    pub fn title(&self) -> &str {
        match &self.item {
            TreeItem::Root(marker) => &marker.title,
            TreeItem::Folder(folder) => &folder.title,
            TreeItem::Placeholder { .. } => "…",
            TreeItem::LoadError { error, .. } => &error.message,
        }
    }
}
