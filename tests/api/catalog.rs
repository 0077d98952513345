use hunt_client::views::Catalog;
use hunt_client::{
    Category, ClientError, CollectionStore, FetchOutcome, FormDraft, MutationOutcome, Product,
    ViewState,
};

use crate::support;

#[tokio::test]
async fn load_all_unwraps_data_envelope_and_reads_through_cache() {
    let (backend, client) = support::client().await;
    let catalog = Catalog::new(client);

    let home = CollectionStore::<Product>::new();
    assert_eq!(catalog.load_all(&home).await, FetchOutcome::Loaded(4));
    assert_eq!(home.view_state().unwrap(), ViewState::Ready(4));
    let ids: Vec<String> = home.items().unwrap().iter().map(|p| p.id.clone()).collect();
    assert_eq!(ids, vec!["1", "2", "3", "9"]);

    let other_page = CollectionStore::<Product>::new();
    catalog.load_all(&other_page).await;
    assert_eq!(backend.count("GET /api/products/getAllProducts/all"), 1);
}

#[tokio::test]
async fn refresh_is_idempotent() {
    let (_backend, client) = support::client().await;
    let catalog = Catalog::new(client);
    let home = CollectionStore::<Product>::new();

    catalog.load_all(&home).await;
    let first = home.items().unwrap();
    catalog.load_all(&home).await;
    let second = home.items().unwrap();

    let ids = |items: &[Product]| items.iter().map(|p| p.id.clone()).collect::<Vec<_>>();
    assert_eq!(ids(&first), ids(&second));
}

#[tokio::test]
async fn upvote_takes_server_count() {
    let (backend, client) = support::client().await;
    let catalog = Catalog::new(client);
    let home = CollectionStore::<Product>::new();
    catalog.load_all(&home).await;

    let outcome = catalog.upvote(&home, "2").await.unwrap();
    assert_eq!(outcome, MutationOutcome::Confirmed);

    let pulse = home.get("2").unwrap().unwrap();
    assert_eq!(pulse.upvotes, 4);
    assert!(pulse.is_upvoted);
    assert_eq!(home.pending_mutations("2").unwrap(), 0);
    assert_eq!(backend.count("POST /api/products/upvote/2"), 1);
}

#[tokio::test]
async fn failed_upvote_rolls_back() {
    let (_backend, client) = support::client().await;
    let catalog = Catalog::new(client);
    let home = CollectionStore::<Product>::new();
    catalog.load_all(&home).await;

    let err = catalog.upvote(&home, "9").await.unwrap_err();
    assert_eq!(
        err,
        ClientError::Api {
            status: 500,
            message: "Upvote failed".into()
        }
    );

    let broken = home.get("9").unwrap().unwrap();
    assert_eq!(broken.upvotes, 5);
    assert!(!broken.is_upvoted);
}

#[tokio::test]
async fn upvote_of_unknown_id_sends_nothing() {
    let (backend, client) = support::client().await;
    let catalog = Catalog::new(client);
    let home = CollectionStore::<Product>::new();
    catalog.load_all(&home).await;

    let outcome = catalog.upvote(&home, "404").await.unwrap();
    assert_eq!(outcome, MutationOutcome::Skipped);
    assert_eq!(backend.count("POST /api/products/upvote/404"), 0);
}

#[tokio::test]
async fn refresh_after_upvote_keeps_local_flag() {
    let (backend, client) = support::client().await;
    let catalog = Catalog::new(client);
    let home = CollectionStore::<Product>::new();
    catalog.load_all(&home).await;
    catalog.upvote(&home, "2").await.unwrap();

    // the upvote invalidated the cached list, so this refetches
    catalog.load_all(&home).await;
    assert_eq!(backend.count("GET /api/products/getAllProducts/all"), 2);

    let pulse = home.get("2").unwrap().unwrap();
    assert_eq!(pulse.upvotes, 4);
    assert!(pulse.is_upvoted);
    assert!(!home.get("1").unwrap().unwrap().is_upvoted);
}

#[tokio::test]
async fn empty_category_is_empty_state_not_error() {
    let (backend, client) = support::client().await;
    let catalog = Catalog::new(client);
    let page = CollectionStore::<Product>::new();

    assert_eq!(catalog.load_category(&page, Category::Gaming).await, FetchOutcome::Loaded(0));
    assert_eq!(page.view_state().unwrap(), ViewState::Empty);
    assert_eq!(backend.count("GET /api/products/category/Gaming"), 1);
}

#[tokio::test]
async fn category_uses_canonical_label() {
    let (backend, client) = support::client().await;
    let catalog = Catalog::new(client);
    let page = CollectionStore::<Product>::new();

    let category = Category::from_slug("ai-tools").unwrap();
    assert_eq!(catalog.load_category(&page, category).await, FetchOutcome::Loaded(1));
    assert_eq!(backend.count("GET /api/products/category/AI"), 1);
    assert_eq!(page.items().unwrap()[0].name, "Pulse");
}

#[tokio::test]
async fn overview_and_search_share_one_request() {
    let (backend, client) = support::client().await;
    let catalog = Catalog::new(client);

    let counts = catalog.category_overview().await.unwrap();
    assert_eq!(counts.get(&Category::Design), Some(&2));
    assert_eq!(counts.get(&Category::Ai), Some(&1));
    assert_eq!(counts.values().sum::<usize>(), 4);

    let hits = catalog.search("standup", None).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Pulse");

    let rust_design = catalog.search("rust", Some(Category::Design)).await.unwrap();
    assert_eq!(rust_design.len(), 1);
    assert!(catalog.search("rust", Some(Category::Ai)).await.unwrap().is_empty());

    assert_eq!(backend.count("GET /api/products/getAllProducts/all"), 1);
}

#[tokio::test]
async fn submission_errors_are_split() {
    let (_backend, client) = support::client().await;
    let catalog = Catalog::new(client);

    let mut draft = FormDraft::new();
    draft.set("tagline", "Nothing else filled in");
    let err = catalog.submit_product(&draft, Some("7".into())).await.unwrap_err();
    assert_eq!(
        err,
        ClientError::Validation(vec!["Name is required".into(), "Website URL is required".into()])
    );
}

#[tokio::test]
async fn submission_maps_draft_and_invalidates_list() {
    let (backend, client) = support::client().await;
    let catalog = Catalog::new(client);
    let home = CollectionStore::<Product>::new();
    catalog.load_all(&home).await;

    let mut draft = FormDraft::new();
    draft.set("name", "Orbit");
    draft.set("websiteUrl", "https://orbit.dev");
    draft.set("category", "Analytics");
    draft.set("techStack", "rust, tokio");
    draft.set_in("pricing", "free", "Dashboards");

    let product = catalog.submit_product(&draft, Some("7".into())).await.unwrap();
    assert_eq!(product.id, "100");
    assert!(!product.is_approved);

    let sent = backend.last("POST /api/products/createProduct").unwrap().body;
    assert_eq!(sent["techStack"], serde_json::json!(["rust", "tokio"]));
    assert_eq!(sent["pricing"]["tiers"][0]["tier"], "free");
    assert_eq!(sent["userId"], "7");

    catalog.load_all(&home).await;
    assert_eq!(home.items().unwrap().len(), 5);
}
