//! Integration tests for the flattened tree.

use foldertree_entity::folder::{FolderItem, OpenFolders, TreeItem};
use foldertree_service::{FoldersQuery, QueryOptions};

use crate::helpers::{self, TestTree};

fn a_b_c() -> Vec<FolderItem> {
    vec![
        FolderItem::new("A", "Alpha", None),
        FolderItem::new("B", "Beta", None),
        FolderItem::new("C", "Gamma", Some("A")),
        FolderItem::new("D", "Delta", Some("B")),
    ]
}

fn open(uids: &[&str]) -> OpenFolders {
    uids.iter().map(|uid| (uid.to_string(), true)).collect()
}

#[tokio::test]
async fn test_open_folder_children_precede_next_sibling() {
    let tree = TestTree::open(a_b_c());
    let mut query = tree.query(10);

    query.request_next_page(None);
    helpers::settle(&mut query).await;
    query.request_next_page(Some("A"));
    helpers::settle(&mut query).await;

    let view = query.view(true, &open(&["A"]));
    assert_eq!(helpers::labels(&view.items), vec!["root", "A", "C", "B"]);
    let levels: Vec<usize> = view.items.iter().map(|row| row.level).collect();
    assert_eq!(levels, vec![0, 1, 2, 1]);
}

#[tokio::test]
async fn test_closed_folder_hides_loaded_children() {
    let tree = TestTree::open(a_b_c());
    let mut query = tree.query(10);

    query.request_next_page(None);
    helpers::settle(&mut query).await;
    query.request_next_page(Some("B"));
    helpers::settle(&mut query).await;

    let mut closed = OpenFolders::new();
    closed.insert("B".to_string(), false);
    let view = query.view(true, &closed);
    assert_eq!(helpers::labels(&view.items), vec!["root", "A", "B"]);
    assert!(view.items.iter().all(|row| !row.is_open || row.level == 0));
}

#[tokio::test]
async fn test_closed_folder_hides_pending_children() {
    let tree = TestTree::gated(a_b_c());
    let mut query = tree.query(10);

    tree.source.release(1);
    query.request_next_page(None);
    helpers::settle(&mut query).await;

    query.request_next_page(Some("A"));
    let view = query.view(true, &OpenFolders::new());
    assert!(view.is_loading);
    assert_eq!(helpers::labels(&view.items), vec!["root", "A", "B"]);

    let view = query.view(true, &open(&["A"]));
    assert_eq!(helpers::labels(&view.items), vec!["root", "A", "…", "B"]);
    assert_eq!(view.items[2].level, 2);

    tree.source.release_all();
    helpers::settle(&mut query).await;
}

#[tokio::test]
async fn test_not_browsing_yields_no_rows() {
    let tree = TestTree::open(a_b_c());
    let mut query = tree.query(10);
    query.request_next_page(None);
    helpers::settle(&mut query).await;

    let view = query.view(false, &open(&["A", "B"]));
    assert!(view.items.is_empty());
    assert!(!view.is_loading);
}

#[tokio::test]
async fn test_init_without_browsing_fetches_nothing() {
    let tree = TestTree::open(a_b_c());
    let mut query = FoldersQuery::init(tree.store.clone(), QueryOptions::default(), false);
    helpers::yield_to_fetches().await;

    assert!(query.ledger().is_empty());
    assert_eq!(tree.source.call_count(), 0);
    assert!(query.view(false, &OpenFolders::new()).items.is_empty());
}

#[tokio::test]
async fn test_placeholder_marks_unrequested_root() {
    let tree = TestTree::open(a_b_c());
    let mut query = tree.query(10);

    let view = query.view(true, &OpenFolders::new());
    assert_eq!(helpers::labels(&view.items), vec!["root", "…"]);
    assert_eq!(view.items[1].level, 1);
}

#[tokio::test]
async fn test_root_folder_uid_browses_subtree() {
    let mut folders = a_b_c();
    folders.extend(helpers::children("C", 2));
    let tree = TestTree::open(folders);
    let options = QueryOptions::default()
        .with_page_limit(10)
        .with_root(Some("A"));
    let mut query = FoldersQuery::init(tree.store.clone(), options, true);
    helpers::settle(&mut query).await;
    query.request_next_page(Some("C"));
    helpers::settle(&mut query).await;

    let view = query.view(true, &open(&["C"]));
    assert_eq!(helpers::labels(&view.items), vec!["root", "C", "C-0", "C-1"]);
    match &view.items[0].item {
        TreeItem::Root(marker) => assert_eq!(marker.uid.as_deref(), Some("A")),
        other => panic!("expected root row, got {other:?}"),
    }

    let first = tree.source.requests().first().cloned().expect("request");
    assert_eq!(first.parent_uid.as_deref(), Some("A"));
}

#[tokio::test]
async fn test_loaded_items_carry_requested_parent() {
    let tree = TestTree::open(a_b_c());
    let mut query = tree.query(10);
    query.request_next_page(None);
    helpers::settle(&mut query).await;
    query.request_next_page(Some("A"));
    helpers::settle(&mut query).await;

    let view = query.view(true, &open(&["A"]));
    let child = view
        .items
        .iter()
        .find_map(|row| row.as_folder().filter(|f| f.uid == "C"))
        .expect("child row");
    assert_eq!(child.parent_uid.as_deref(), Some("A"));
    let top = view.items[1].as_folder().expect("folder row");
    assert!(top.is_top_level());
}
