//! Folder tree loading: ledger, aggregation, scheduling, flattening and the
//! per-consumer query that ties them together.

pub mod aggregate;
pub mod flatten;
pub mod ledger;
pub mod options;
pub mod query;
pub mod scheduler;

pub use aggregate::{GroupLoadState, PageGroup, TreeState, aggregate};
pub use flatten::flatten;
pub use ledger::RequestLedger;
pub use options::QueryOptions;
pub use query::{FoldersQuery, FoldersView};
pub use scheduler::{NextPage, ScheduleOutcome, next_page};
