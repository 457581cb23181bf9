//! # foldertree-entity
//!
//! Domain models for the folder tree loader: folders as returned by the
//! listing service, page results as recorded by the store, and the rows of
//! the flattened tree handed to the renderer.

pub mod folder;
pub mod page;
