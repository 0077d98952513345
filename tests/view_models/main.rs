//! View-model properties through the public API, without a network.

use std::future::ready;

use hunt_client::{
    filter_by_category, partition_by_category, Category, ClientError, CollectionKey,
    CollectionStore, Comment, CommentThread, FetchOutcome, Identified, MutationOutcome, Product,
    ViewModel, ViewState,
};

#[derive(Debug, Clone, PartialEq, ViewModel)]
struct SavedSearch {
    #[view(id)]
    slug: String,
    hits: u32,
    #[view(local)]
    pinned: bool,
}

fn saved(slug: &str, hits: u32) -> SavedSearch {
    SavedSearch {
        slug: slug.into(),
        hits,
        pinned: false,
    }
}

fn key() -> CollectionKey {
    CollectionKey::new("/saved-searches")
}

#[test]
fn derive_picks_marked_id_and_default_collection() {
    let search = saved("rust-tools", 3);
    assert_eq!(search.id(), "rust-tools");
    assert_eq!(SavedSearch::COLLECTION, "saved_searchs");
}

#[tokio::test]
async fn refresh_keeps_local_fields_of_untouched_items() {
    let store = CollectionStore::<SavedSearch>::new();
    store
        .load(key(), ready(Ok(vec![saved("a", 1), saved("b", 2)])))
        .await;
    store.modify("a", |s| s.pinned = true).unwrap();

    let outcome = store
        .load(key(), ready(Ok(vec![saved("b", 5), saved("a", 1), saved("c", 0)])))
        .await;
    assert_eq!(outcome, FetchOutcome::Loaded(3));

    let items = store.items().unwrap();
    let order: Vec<&str> = items.iter().map(|s| s.id()).collect();
    assert_eq!(order, vec!["b", "a", "c"]);
    assert!(items[1].pinned);
    assert_eq!(items[0].hits, 5);
    assert!(!items[2].pinned);
}

#[tokio::test]
async fn rollback_restores_exact_value() {
    let store = CollectionStore::<SavedSearch>::new();
    store.load(key(), ready(Ok(vec![saved("a", 7)]))).await;

    let result = store
        .mutate(
            "a",
            |s: &SavedSearch| SavedSearch {
                hits: s.hits + 1,
                ..s.clone()
            },
            ready(Err::<Option<SavedSearch>, _>(ClientError::Transport("offline".into()))),
        )
        .await;

    assert!(matches!(result, Err(ClientError::Transport(_))));
    assert_eq!(store.get("a").unwrap().unwrap().hits, 7);
}

#[tokio::test]
async fn authoritative_entity_keeps_local_fields() {
    let store = CollectionStore::<SavedSearch>::new();
    store.load(key(), ready(Ok(vec![saved("a", 7)]))).await;

    let outcome = store
        .mutate(
            "a",
            |s: &SavedSearch| SavedSearch {
                pinned: true,
                ..s.clone()
            },
            ready(Ok(Some(saved("a", 9)))),
        )
        .await
        .unwrap();

    assert_eq!(outcome, MutationOutcome::Confirmed);
    let item = store.get("a").unwrap().unwrap();
    assert_eq!(item.hits, 9);
    assert!(item.pinned);
}

#[tokio::test]
async fn failed_first_load_shows_error_banner() {
    let store = CollectionStore::<SavedSearch>::new();
    let outcome = store
        .load(key(), ready(Err(ClientError::from_status(502, ""))))
        .await;
    assert!(matches!(outcome, FetchOutcome::Failed(_)));
    assert_eq!(
        store.view_state().unwrap(),
        ViewState::Failed("Request failed with status 502".into())
    );
    assert!(store.items().unwrap().is_empty());
}

#[test]
fn category_filter_is_exclusive_and_partition_complete() {
    let products = vec![
        Product::new("1", "Lens").with_category("Design"),
        Product::new("2", "Pulse").with_category("AI"),
        Product::new("3", "Odd").with_category("Crypto"),
        Product::new("4", "Blank"),
        Product::new("5", "Sketch").with_category("design"),
    ];

    let design = filter_by_category(&products, Category::Design);
    assert_eq!(design.len(), 2);
    assert!(design.iter().all(|p| Category::of(p) == Category::Design));

    let groups = partition_by_category(&products);
    let total: usize = groups.values().map(Vec::len).sum();
    assert_eq!(total, products.len());
    assert_eq!(groups[&Category::Miscellaneous].len(), 2);
}

#[tokio::test]
async fn replies_only_touch_their_parent() {
    let thread = CommentThread::new();
    let mut with_reply = Comment::new("c2", "Cool");
    with_reply.replies.push(Comment::new("r0", "Same"));
    thread
        .load("2", ready(Ok(vec![Comment::new("c1", "Nice"), with_reply])))
        .await;

    let reply = thread
        .add_reply("c1", "Agreed", None, ready(Ok(Comment::new("r1", "Agreed"))))
        .await
        .unwrap();
    assert_eq!(reply.id, "r1");

    let comments = thread.comments().unwrap();
    assert_eq!(comments[0].replies.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(), vec!["r1"]);
    assert_eq!(comments[1].replies.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(), vec!["r0"]);
}
