//! Folder entity model.

use std::fmt;

use serde::{Deserialize, Serialize};

use foldertree_core::error::AppError;
use foldertree_core::result::AppResult;

/// Tool that provisions and owns a folder.
///
/// The listing service treats this as an open string; tags not listed here
/// decode as [`ManagerKind::Other`] with the original value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManagerKind {
    /// Synced from a git repository.
    Repo,
    /// Managed by Terraform.
    Terraform,
    /// Applied with kubectl.
    Kubectl,
    /// Installed by a plugin.
    Plugin,
    /// Any other manager.
    #[serde(untagged)]
    Other(String),
}

impl ManagerKind {
    /// Return the kind as a lowercase string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Repo => "repo",
            Self::Terraform => "terraform",
            Self::Kubectl => "kubectl",
            Self::Plugin => "plugin",
            Self::Other(kind) => kind,
        }
    }
}

impl fmt::Display for ManagerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A folder as returned by the listing service. Immutable once received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderItem {
    /// Stable folder identity.
    pub uid: String,
    /// Display title.
    pub title: String,
    /// Provenance tag when the folder is managed externally.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub managed_by: Option<ManagerKind>,
    /// Parent folder (`None` at the top level).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_uid: Option<String>,
}

impl FolderItem {
    /// Create a folder with no provenance tag.
    pub fn new(uid: impl Into<String>, title: impl Into<String>, parent_uid: Option<&str>) -> Self {
        Self {
            uid: uid.into(),
            title: title.into(),
            managed_by: None,
            parent_uid: parent_uid.map(str::to_string),
        }
    }

    /// Check if this is a top-level folder.
    pub fn is_top_level(&self) -> bool {
        self.parent_uid.is_none()
    }

    /// Reject items the flattener cannot key.
    pub fn validate(&self) -> AppResult<()> {
        if self.uid.trim().is_empty() {
            return Err(AppError::malformed(format!(
                "Folder '{}' has an empty uid",
                self.title
            )));
        }
        Ok(())
    }
}
