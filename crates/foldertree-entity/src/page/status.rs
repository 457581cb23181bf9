//! Page load status.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use foldertree_core::error::{AppError, ErrorKind};

use crate::folder::FolderItem;

/// Inspectable description of a failed page fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageError {
    /// Error category.
    pub kind: ErrorKind,
    /// Human-readable message.
    pub message: String,
}

impl From<&AppError> for PageError {
    fn from(err: &AppError) -> Self {
        Self {
            kind: err.kind,
            message: err.message.clone(),
        }
    }
}

impl From<AppError> for PageError {
    fn from(err: AppError) -> Self {
        Self::from(&err)
    }
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Lifecycle of one page fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageStatus {
    /// The fetch is in flight.
    Pending,
    /// The listing service returned these items.
    Fulfilled(Arc<Vec<FolderItem>>),
    /// The fetch failed or returned malformed data.
    Failed(PageError),
}

impl PageStatus {
    /// Check if the fetch is still in flight.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Check if the fetch failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Fulfilled(_) => "fulfilled",
            Self::Failed(_) => "error",
        }
    }
}

impl fmt::Display for PageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
