//! Core type definitions used across the foldertree workspace.

pub mod id;
pub mod pagination;
pub mod permission;

pub use id::*;
pub use pagination::PageRequest;
pub use permission::PermissionFilter;
