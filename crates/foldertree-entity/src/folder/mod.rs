//! Folder domain entities.

pub mod model;
pub mod tree;

pub use model::{FolderItem, ManagerKind};
pub use tree::{FlatTreeItem, OpenFolders, RootMarker, TreeItem};
