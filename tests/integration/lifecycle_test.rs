//! Integration tests for subscription teardown and sharing between queries.

use foldertree_core::types::PageRequest;
use foldertree_entity::folder::OpenFolders;
use foldertree_service::ScheduleOutcome;

use crate::helpers::{self, TestTree};

#[tokio::test]
async fn test_deactivate_releases_every_entry_once() {
    let mut folders = helpers::top_level(12);
    folders.extend(helpers::children("root-0", 3));
    let tree = TestTree::open(folders);
    let mut query = tree.query(10);

    query.request_next_page(None);
    helpers::settle(&mut query).await;
    query.request_next_page(None);
    query.request_next_page(Some("root-0"));
    helpers::settle(&mut query).await;

    let requests: Vec<PageRequest> = query.ledger().requests().cloned().collect();
    assert_eq!(requests.len(), 3);

    assert_eq!(query.deactivate(), 3);
    assert_eq!(query.deactivate(), 0);
    assert!(query.ledger().iter().all(|entry| entry.is_released()));
    for request in &requests {
        assert_eq!(tree.store.subscriber_count(request), 0);
    }
    assert_eq!(tree.store.active_count(), 0);
}

#[tokio::test]
async fn test_drop_releases_subscriptions() {
    let tree = TestTree::open(helpers::top_level(3));
    let request = PageRequest::new(None, 1, 10, None);
    {
        let mut query = tree.query(10);
        query.request_next_page(None);
        helpers::settle(&mut query).await;
        assert_eq!(tree.store.subscriber_count(&request), 1);
    }
    assert_eq!(tree.store.subscriber_count(&request), 0);
    assert!(tree.store.is_retained(&request));
}

#[tokio::test]
async fn test_deactivated_query_ignores_requests() {
    let tree = TestTree::open(helpers::top_level(3));
    let mut query = tree.query(10);
    query.deactivate();

    assert_eq!(query.request_next_page(None), ScheduleOutcome::Inactive);
    helpers::yield_to_fetches().await;
    assert_eq!(tree.source.call_count(), 0);
    assert!(query.ledger().is_empty());
}

#[tokio::test]
async fn test_concurrent_queries_share_one_fetch() {
    let tree = TestTree::gated(helpers::top_level(5));
    let mut first = tree.query(10);
    let mut second = tree.query(10);

    first.request_next_page(None);
    second.request_next_page(None);
    helpers::yield_to_fetches().await;
    assert_eq!(tree.source.call_count(), 1);

    let request = PageRequest::new(None, 1, 10, None);
    assert_eq!(tree.store.subscriber_count(&request), 2);
    let ids: Vec<_> = first
        .ledger()
        .iter()
        .chain(second.ledger().iter())
        .map(|entry| entry.request_id())
        .collect();
    assert_eq!(ids[0], ids[1]);

    tree.source.release_all();
    helpers::settle(&mut first).await;
    helpers::settle(&mut second).await;

    let open = OpenFolders::new();
    assert_eq!(first.view(true, &open).items, second.view(true, &open).items);

    first.deactivate();
    assert_eq!(tree.store.subscriber_count(&request), 1);
    assert!(second.tree_state().root_pages.is_fully_loaded());
}

#[tokio::test]
async fn test_released_pages_are_reused_by_next_query() {
    let tree = TestTree::open(helpers::top_level(5));
    let mut first = tree.query(10);
    first.request_next_page(None);
    helpers::settle(&mut first).await;
    let original = first.ledger().iter().next().map(|e| e.request_id());
    drop(first);

    let mut second = tree.query(10);
    second.request_next_page(None);
    assert!(!second.is_loading());
    helpers::settle(&mut second).await;

    assert_eq!(tree.source.call_count(), 1);
    assert_eq!(second.ledger().iter().next().map(|e| e.request_id()), original);
    assert_eq!(second.view(true, &OpenFolders::new()).items.len(), 1 + 5);
}

#[tokio::test]
async fn test_different_page_limits_do_not_share() {
    let tree = TestTree::open(helpers::top_level(5));
    let mut small = tree.query(2);
    let mut large = tree.query(10);

    small.request_next_page(None);
    large.request_next_page(None);
    helpers::settle(&mut small).await;
    helpers::settle(&mut large).await;

    assert_eq!(tree.source.call_count(), 2);
    assert_eq!(small.tree_state().root_pages.items().count(), 2);
    assert_eq!(large.tree_state().root_pages.items().count(), 5);
}

#[tokio::test]
async fn test_view_updates_when_page_settles() {
    let tree = TestTree::gated(helpers::top_level(3));
    let mut query = tree.query(10);
    let open = OpenFolders::new();

    query.request_next_page(None);
    let loading = query.view(true, &open);
    assert!(loading.is_loading);
    assert_eq!(helpers::labels(&loading.items), vec!["root", "…"]);

    tree.source.release_all();
    helpers::settle(&mut query).await;
    let loaded = query.view(true, &open);
    assert!(!loaded.is_loading);
    assert_eq!(
        helpers::labels(&loaded.items),
        vec!["root", "root-0", "root-1", "root-2"]
    );
}
