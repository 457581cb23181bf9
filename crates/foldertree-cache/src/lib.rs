//! # foldertree-cache
//!
//! The response store behind the folder tree loader, and the listing
//! sources it fetches from.
//!
//! - **store**: [`PageStore`] deduplicates page fetches by argument tuple,
//!   tracks subscribers and retains unused pages in a
//!   [moka](https://crates.io/crates/moka) cache
//! - **memory**: an in-process fixture source
//! - **http**: a [reqwest](https://crates.io/crates/reqwest) client for the
//!   legacy and browse listing endpoints
//!
//! The source is selected at runtime based on configuration.

#[cfg(feature = "http")]
pub mod http;
pub mod keys;
pub mod memory;
pub mod provider;
pub mod source;
pub mod store;

pub use provider::FolderSourceManager;
pub use source::FolderSource;
pub use store::{PageStore, PageSubscription, StoreSnapshot};
