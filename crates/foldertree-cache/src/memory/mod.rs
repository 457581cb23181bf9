//! In-process listing sources.

pub mod fixture;

pub use fixture::FixtureFolderSource;
