//! Flattens aggregated page groups into the rows a tree view renders.

use tracing::warn;

use foldertree_entity::folder::{FlatTreeItem, OpenFolders};

use super::aggregate::{GroupLoadState, PageGroup, TreeState};
use super::options::QueryOptions;

/// Walk the tree state depth-first into a flat list of rows.
///
/// The list starts with the synthetic root row at level 0. An open folder's
/// children follow it directly, before its next sibling. A group that may
/// have more pages ends with placeholder rows; a group whose last page
/// failed ends with one error row instead. Returns nothing when browsing is
/// off.
pub fn flatten(
    state: &TreeState,
    open_folders: &OpenFolders,
    is_browsing: bool,
    options: &QueryOptions,
) -> Vec<FlatTreeItem> {
    if !is_browsing {
        return Vec::new();
    }

    let mut walker = Walker {
        state,
        open_folders,
        options,
        rows: vec![FlatTreeItem::root(options.root_marker())],
        ancestors: Vec::new(),
    };
    walker.walk(state.root_uid.as_deref(), &state.root_pages, 1);
    walker.rows
}

struct Walker<'a> {
    state: &'a TreeState,
    open_folders: &'a OpenFolders,
    options: &'a QueryOptions,
    rows: Vec<FlatTreeItem>,
    /// Uids of the folders above the group being walked.
    ancestors: Vec<&'a str>,
}

impl<'a> Walker<'a> {
    fn is_open(&self, uid: &str) -> bool {
        self.open_folders.get(uid).copied().unwrap_or(false)
    }

    fn walk(&mut self, parent_uid: Option<&'a str>, group: &'a PageGroup, level: usize) {
        for item in group.items() {
            let is_open = self.is_open(&item.uid);
            self.rows
                .push(FlatTreeItem::folder(item.clone(), level, is_open));

            if !is_open {
                continue;
            }
            let Some(children) = self.state.pages_by_parent.get(&item.uid) else {
                continue;
            };
            if self.ancestors.contains(&item.uid.as_str()) || parent_uid == Some(item.uid.as_str())
            {
                warn!(uid = %item.uid, level, "Folder listed inside itself; not descending");
                continue;
            }

            if let Some(parent) = parent_uid {
                self.ancestors.push(parent);
            }
            self.walk(Some(item.uid.as_str()), children, level + 1);
            if parent_uid.is_some() {
                self.ancestors.pop();
            }
        }

        match group.load_state() {
            GroupLoadState::Complete => {}
            GroupLoadState::Failed { page, error } => {
                self.rows
                    .push(FlatTreeItem::load_error(parent_uid, level, page, error.clone()));
            }
            GroupLoadState::NotRequested | GroupLoadState::Pending | GroupLoadState::HasMore => {
                for index in 0..self.options.placeholder_rows {
                    self.rows
                        .push(FlatTreeItem::placeholder(parent_uid, level, index));
                }
            }
        }
    }
}
