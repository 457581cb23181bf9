//! Integration tests for the folder tree loader.

mod helpers;

mod lifecycle_test;
mod pagination_test;
mod tree_test;
