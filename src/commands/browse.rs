//! `browse`: load the root, expand folders, print the tree.

use std::str::FromStr;
use std::time::Duration;

use clap::Args;
use tracing::{info, warn};

use crate::output::{self, OutputFormat};
use foldertree_cache::{FolderSourceManager, PageStore};
use foldertree_core::config::AppConfig;
use foldertree_core::error::AppError;
use foldertree_core::types::PermissionFilter;
use foldertree_entity::folder::OpenFolders;
use foldertree_service::{FoldersQuery, QueryOptions, ScheduleOutcome};

/// Arguments for the browse command
#[derive(Debug, Args)]
pub struct BrowseArgs {
    /// Expand this folder (repeatable, applied in order)
    #[arg(short, long = "open", value_name = "UID")]
    pub open: Vec<String>,

    /// Keep requesting pages until every expanded parent is fully loaded
    #[arg(short, long)]
    pub all_pages: bool,

    /// Permission filter forwarded to the listing service (View, Edit, Admin)
    #[arg(short, long)]
    pub permission: Option<String>,

    /// Browse below this folder instead of the top level
    #[arg(short, long, value_name = "UID")]
    pub root: Option<String>,
}

/// Execute the browse command
pub async fn execute(
    args: &BrowseArgs,
    config: AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let mut options = QueryOptions::from_config(&config.query)?;
    if let Some(permission) = &args.permission {
        options = options.with_permission(Some(PermissionFilter::from_str(permission)?));
    }
    if args.root.is_some() {
        options = options.with_root(args.root.as_deref());
    }

    let source = FolderSourceManager::new(&config.listing).await?;
    let store = PageStore::new(source.source(), &config.cache)?;
    let timeout = Duration::from_secs(config.listing.timeout_seconds);

    let mut query = FoldersQuery::new(store, options);
    let mut open_folders = OpenFolders::new();

    load_parent(&mut query, None, args.all_pages, timeout).await?;
    for uid in &args.open {
        open_folders.insert(uid.clone(), true);
        load_parent(&mut query, Some(uid), args.all_pages, timeout).await?;
    }

    let view = query.view(true, &open_folders);
    info!(
        rows = view.items.len(),
        pages = query.ledger().len(),
        "Folder tree loaded"
    );
    output::print_tree(&view.items, format)?;

    query.deactivate();
    Ok(())
}

/// Request pages of one parent and wait for each to settle.
///
/// Stops after the first page unless `all_pages` is set. A failed page is
/// retried once; loading continues after a successful retry.
async fn load_parent(
    query: &mut FoldersQuery,
    parent_uid: Option<&str>,
    all_pages: bool,
    timeout: Duration,
) -> Result<(), AppError> {
    loop {
        match query.request_next_page(parent_uid) {
            ScheduleOutcome::Issued { .. } => {
                settle(query, timeout).await?;
                if !all_pages {
                    return Ok(());
                }
            }
            ScheduleOutcome::Retried { page } => {
                settle(query, timeout).await?;
                if last_page_failed(query, parent_uid) {
                    warn!(parent = parent_uid.unwrap_or("root"), page, "Page failed twice");
                    return Ok(());
                }
                if !all_pages {
                    return Ok(());
                }
            }
            ScheduleOutcome::Deferred { .. } => settle(query, timeout).await?,
            ScheduleOutcome::Exhausted | ScheduleOutcome::Inactive => return Ok(()),
        }
    }
}

fn last_page_failed(query: &FoldersQuery, parent_uid: Option<&str>) -> bool {
    query
        .tree_state()
        .group(parent_uid)
        .and_then(|group| group.last())
        .is_some_and(|last| last.error().is_some())
}

/// Wait until none of the query's pages is in flight.
async fn settle(query: &mut FoldersQuery, timeout: Duration) -> Result<(), AppError> {
    let waited = tokio::time::timeout(timeout, async {
        while query.is_loading() {
            query.wait_for_change().await?;
        }
        Ok::<(), AppError>(())
    })
    .await;

    match waited {
        Ok(result) => result,
        Err(_) => Err(AppError::service_unavailable(format!(
            "Folder listing did not settle within {}s",
            timeout.as_secs()
        ))),
    }
}
