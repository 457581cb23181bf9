//! Integration tests for next-page scheduling.

use std::collections::HashSet;

use foldertree_entity::folder::OpenFolders;
use foldertree_service::ScheduleOutcome;

use crate::helpers::{self, TestTree};

#[tokio::test]
async fn test_pages_are_requested_in_order_without_repeats() {
    let tree = TestTree::open(helpers::top_level(25));
    let mut query = tree.query(10);

    let mut outcomes = Vec::new();
    for _ in 0..6 {
        outcomes.push(query.request_next_page(None));
        helpers::settle(&mut query).await;
    }

    assert_eq!(
        outcomes,
        vec![
            ScheduleOutcome::Issued { page: 1 },
            ScheduleOutcome::Issued { page: 2 },
            ScheduleOutcome::Issued { page: 3 },
            ScheduleOutcome::Exhausted,
            ScheduleOutcome::Exhausted,
            ScheduleOutcome::Exhausted,
        ]
    );

    let requests = tree.source.requests();
    let pages: Vec<u64> = requests.iter().map(|r| r.page).collect();
    assert_eq!(pages, vec![1, 2, 3]);
    let distinct: HashSet<_> = requests.iter().map(|r| (r.parent_uid.clone(), r.page)).collect();
    assert_eq!(distinct.len(), requests.len());
}

#[tokio::test]
async fn test_exhausted_parent_does_not_grow_ledger() {
    let tree = TestTree::open(helpers::top_level(14));
    let mut query = tree.query(10);

    query.request_next_page(None);
    helpers::settle(&mut query).await;
    query.request_next_page(None);
    helpers::settle(&mut query).await;

    let before = query.ledger().len();
    for _ in 0..3 {
        assert_eq!(query.request_next_page(None), ScheduleOutcome::Exhausted);
    }
    assert_eq!(query.ledger().len(), before);
    assert_eq!(tree.source.call_count(), 2);
}

#[tokio::test]
async fn test_two_full_pages_then_short_page() {
    let tree = TestTree::open(helpers::top_level(24));
    let mut query = tree.query(10);
    let open = OpenFolders::new();

    query.request_next_page(None);
    helpers::settle(&mut query).await;
    let view = query.view(true, &open);
    assert_eq!(view.items.len(), 1 + 10 + 1);
    assert!(view.items.last().is_some_and(|row| row.is_placeholder()));

    query.request_next_page(None);
    helpers::settle(&mut query).await;
    let view = query.view(true, &open);
    assert_eq!(view.items.len(), 1 + 20 + 1);

    query.request_next_page(None);
    helpers::settle(&mut query).await;
    let view = query.view(true, &open);
    assert_eq!(view.items.len(), 1 + 24);
    assert!(!view.items.iter().any(|row| row.is_placeholder()));
    assert!(!view.is_loading);
}

#[tokio::test]
async fn test_short_second_page_completes_root() {
    let tree = TestTree::open(helpers::top_level(14));
    let mut query = tree.query(10);

    query.request_next_page(None);
    helpers::settle(&mut query).await;
    query.request_next_page(None);
    helpers::settle(&mut query).await;

    let state = query.tree_state();
    assert!(state.root_pages.is_fully_loaded());
    assert_eq!(query.request_next_page(None), ScheduleOutcome::Exhausted);

    let view = query.view(true, &OpenFolders::new());
    assert_eq!(view.items.len(), 1 + 14);
    assert_eq!(view.items.iter().filter(|row| row.is_placeholder()).count(), 0);
}

#[tokio::test]
async fn test_second_call_while_pending_is_deferred() {
    let tree = TestTree::gated(helpers::top_level(30));
    let mut query = tree.query(10);

    assert_eq!(
        query.request_next_page(None),
        ScheduleOutcome::Issued { page: 1 }
    );
    assert_eq!(
        query.request_next_page(None),
        ScheduleOutcome::Deferred { page: 1 }
    );
    assert_eq!(query.ledger().len(), 1);
    assert!(query.is_loading());

    tree.source.release_all();
    helpers::settle(&mut query).await;

    assert_eq!(
        query.request_next_page(None),
        ScheduleOutcome::Issued { page: 2 }
    );
    helpers::settle(&mut query).await;
    let pages: Vec<u64> = tree.source.requests().iter().map(|r| r.page).collect();
    assert_eq!(pages, vec![1, 2]);
}

#[tokio::test]
async fn test_parents_paginate_independently() {
    let mut folders = helpers::top_level(2);
    folders.extend(helpers::children("root-0", 15));
    folders.extend(helpers::children("root-1", 3));
    let tree = TestTree::open(folders);
    let mut query = tree.query(10);

    query.request_next_page(None);
    helpers::settle(&mut query).await;
    assert_eq!(
        query.request_next_page(Some("root-0")),
        ScheduleOutcome::Issued { page: 1 }
    );
    assert_eq!(
        query.request_next_page(Some("root-1")),
        ScheduleOutcome::Issued { page: 1 }
    );
    helpers::settle(&mut query).await;

    assert_eq!(
        query.request_next_page(Some("root-0")),
        ScheduleOutcome::Issued { page: 2 }
    );
    assert_eq!(
        query.request_next_page(Some("root-1")),
        ScheduleOutcome::Exhausted
    );
    helpers::settle(&mut query).await;

    let state = query.tree_state();
    assert_eq!(state.group(Some("root-0")).map(|g| g.items().count()), Some(15));
    assert_eq!(state.group(Some("root-1")).map(|g| g.items().count()), Some(3));
}

#[tokio::test]
async fn test_failed_page_is_retried_in_place() {
    let tree = TestTree::open(helpers::top_level(12));
    tree.source.fail_page(None, 2, 1);
    let mut query = tree.query(10);

    query.request_next_page(None);
    helpers::settle(&mut query).await;
    assert_eq!(
        query.request_next_page(None),
        ScheduleOutcome::Issued { page: 2 }
    );
    helpers::settle(&mut query).await;

    let view = query.view(true, &OpenFolders::new());
    assert_eq!(helpers::labels(&view.items).last().map(String::as_str), Some("!"));
    assert!(!view.items.iter().any(|row| row.is_placeholder()));

    assert_eq!(
        query.request_next_page(None),
        ScheduleOutcome::Retried { page: 2 }
    );
    helpers::settle(&mut query).await;

    assert_eq!(query.ledger().len(), 2);
    let view = query.view(true, &OpenFolders::new());
    assert_eq!(view.items.len(), 1 + 12);
    assert_eq!(query.request_next_page(None), ScheduleOutcome::Exhausted);
    let pages: Vec<u64> = tree.source.requests().iter().map(|r| r.page).collect();
    assert_eq!(pages, vec![1, 2, 2]);
}
