//! # foldertree-service
//!
//! The folder tree loader. A [`FoldersQuery`] is one consumer instance: it
//! owns a ledger of every page it subscribed to, aggregates the store's
//! results into per-parent page groups, decides which page to fetch next
//! for a parent, and flattens the groups into the rows a tree view renders.
//!
//! Services follow constructor injection: the shared
//! [`PageStore`](foldertree_cache::PageStore) is provided at construction
//! time.

pub mod folder;

pub use folder::{
    FoldersQuery, FoldersView, PageGroup, QueryOptions, RequestLedger, ScheduleOutcome, TreeState,
};
