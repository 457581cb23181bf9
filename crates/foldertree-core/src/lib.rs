//! # foldertree-core
//!
//! Core crate for the folder tree loader. Contains configuration schemas,
//! the page request argument tuple, typed identifiers and the unified
//! error system.
//!
//! This crate has **no** internal dependencies on other foldertree crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
