//! Key builders for page store entries.
//!
//! Keys are used in log fields and error messages; the store itself is
//! keyed by the full [`PageRequest`].

use foldertree_core::types::PageRequest;

/// Prefix applied to all page keys.
const PREFIX: &str = "folders";

/// Segment naming a parent folder, `root` for the top level.
pub fn parent_segment(parent_uid: Option<&str>) -> &str {
    match parent_uid {
        Some(uid) if !uid.is_empty() => uid,
        _ => "root",
    }
}

/// Key for one page of a parent's children.
pub fn page_key(request: &PageRequest) -> String {
    let permission = request
        .permission
        .map(|p| p.as_str().to_ascii_lowercase())
        .unwrap_or_else(|| "any".to_string());
    format!(
        "{PREFIX}:{}:p{}:l{}:{permission}",
        parent_segment(request.parent_uid.as_deref()),
        request.page,
        request.limit
    )
}
