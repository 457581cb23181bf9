//! Page results as recorded by the page store.

pub mod result;
pub mod status;

pub use result::PageResult;
pub use status::{PageError, PageStatus};
