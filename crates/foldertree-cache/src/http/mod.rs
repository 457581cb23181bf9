//! HTTP listing source.

pub mod client;

pub use client::HttpFolderSource;
