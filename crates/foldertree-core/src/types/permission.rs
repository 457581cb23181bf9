//! Permission filter forwarded to the listing service.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Minimum permission the caller needs on listed folders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PermissionFilter {
    /// Folders the caller can view.
    View,
    /// Folders the caller can edit.
    Edit,
    /// Folders the caller administers.
    Admin,
}

impl PermissionFilter {
    /// Value sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "View",
            Self::Edit => "Edit",
            Self::Admin => "Admin",
        }
    }
}

impl fmt::Display for PermissionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PermissionFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "view" => Ok(Self::View),
            "edit" => Ok(Self::Edit),
            "admin" => Ok(Self::Admin),
            other => Err(AppError::validation(format!(
                "Unknown permission filter: '{other}'. Supported: view, edit, admin"
            ))),
        }
    }
}
