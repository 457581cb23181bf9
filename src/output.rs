//! Table and JSON output formatting for CLI commands.

use serde::Serialize;
use tabled::{Table, Tabled};

use foldertree_core::error::AppError;
use foldertree_entity::folder::{FlatTreeItem, TreeItem};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// Tree display row
#[derive(Debug, Serialize, Tabled)]
struct TreeRow {
    /// Depth
    level: usize,
    /// Indented title
    title: String,
    /// Folder UID
    uid: String,
    /// Row state
    state: String,
}

impl From<&FlatTreeItem> for TreeRow {
    fn from(row: &FlatTreeItem) -> Self {
        let indent = "  ".repeat(row.level.saturating_sub(1));
        let marker = match (&row.item, row.is_open) {
            (TreeItem::Folder(_), true) => "▾ ",
            (TreeItem::Folder(_), false) => "▸ ",
            _ => "",
        };
        let (uid, state) = match &row.item {
            TreeItem::Root(root) => (root.uid.clone().unwrap_or_default(), "root".to_string()),
            TreeItem::Folder(folder) => {
                let state = match &folder.managed_by {
                    Some(manager) => format!("managed ({})", manager.as_str()),
                    None if row.is_open => "open".to_string(),
                    None => String::new(),
                };
                (folder.uid.clone(), state)
            }
            TreeItem::Placeholder { .. } => (String::new(), "loading".to_string()),
            TreeItem::LoadError { page, error, .. } => {
                (String::new(), format!("page {page} failed: {}", error.kind))
            }
        };

        Self {
            level: row.level,
            title: format!("{indent}{marker}{}", row.title()),
            uid,
            state,
        }
    }
}

/// Print the flattened tree in the selected format
pub fn print_tree(rows: &[FlatTreeItem], format: OutputFormat) -> Result<(), AppError> {
    match format {
        OutputFormat::Table => {
            if rows.is_empty() {
                println!("No results found.");
            } else {
                let table_rows: Vec<TreeRow> = rows.iter().map(TreeRow::from).collect();
                println!("{}", Table::new(&table_rows));
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(rows)?);
        }
    }
    Ok(())
}
