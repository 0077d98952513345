use hunt_client::views::{Accounts, Discussion};
use hunt_client::{ClientError, Credentials, MutationOutcome, ViewState};

use crate::support;

async fn signed_in_page() -> (support::Shared, Discussion) {
    let (backend, client) = support::client().await;
    let session = support::empty_session();
    Accounts::new(client.clone(), session.clone())
        .login(&Credentials {
            email: "ana@x.io".into(),
            password: "secret".into(),
        })
        .await
        .unwrap();
    let page = Discussion::new(client.with_token("tok-7"), session);
    page.open("Pulse").await.unwrap();
    (backend, page)
}

#[tokio::test]
async fn open_loads_product_then_comments() {
    let (backend, page) = signed_in_page().await;

    let product = page.product().unwrap().unwrap();
    assert_eq!(product.id, "2");
    assert_eq!(page.thread().view_state().unwrap(), ViewState::Ready(2));

    let routes = backend.routes();
    let product_at = routes.iter().position(|r| r == "GET /api/products/Pulse").unwrap();
    let comments_at = routes.iter().position(|r| r == "GET /api/products/2/comments").unwrap();
    assert!(product_at < comments_at);
}

#[tokio::test]
async fn unknown_product_is_not_found() {
    let (_backend, client) = support::client().await;
    let page = Discussion::new(client, support::empty_session());
    let err = page.open("Nope").await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound(_)));
    assert!(page.product().unwrap().is_none());
}

#[tokio::test]
async fn reply_lands_on_exactly_one_parent() {
    let (backend, page) = signed_in_page().await;

    let reply = page.reply("c1", "Agreed").await.unwrap();
    assert_eq!(reply.id, "r1");

    let comments = page.thread().comments().unwrap();
    let c1 = comments.iter().find(|c| c.id == "c1").unwrap();
    let c2 = comments.iter().find(|c| c.id == "c2").unwrap();
    assert_eq!(c1.replies.len(), 1);
    assert_eq!(c1.replies[0].id, "r1");
    assert!(!c1.replies[0].pending);
    assert_eq!(c2.replies.len(), 1);
    assert_eq!(c2.replies[0].id, "r0");

    let sent = backend.last("POST /api/comments/c1/replies").unwrap();
    assert_eq!(sent.body["content"], "Agreed");
    assert_eq!(sent.body["userId"], "7");
    assert_eq!(sent.auth.as_deref(), Some("Bearer tok-7"));
}

#[tokio::test]
async fn reply_to_a_reply_is_refused_locally() {
    let (backend, page) = signed_in_page().await;

    let err = page.reply("r0", "Nested").await.unwrap_err();
    assert_eq!(err, ClientError::ParentNotFound("r0".into()));
    assert_eq!(backend.count("POST /api/comments/r0/replies"), 0);
}

#[tokio::test]
async fn new_comment_goes_on_top() {
    let (_backend, page) = signed_in_page().await;

    let comment = page.comment("  First!  ").await.unwrap();
    assert_eq!(comment.content, "First!");

    let comments = page.thread().comments().unwrap();
    assert_eq!(comments.len(), 3);
    assert_eq!(comments[0].id, "c9");
    assert!(!comments[0].pending);
}

#[tokio::test]
async fn commenting_requires_a_session_and_content() {
    let (backend, client) = support::client().await;
    let page = Discussion::new(client, support::empty_session());
    page.open("Pulse").await.unwrap();

    let err = page.comment("hello").await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized(_)));

    assert_eq!(backend.count("POST /api/products/2/comments"), 0);

    let (other, signed_in) = signed_in_page().await;
    let err = signed_in.comment("   ").await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
    assert_eq!(other.count("POST /api/products/2/comments"), 0);
}

#[tokio::test]
async fn like_takes_server_state_and_failed_like_rolls_back() {
    let (_backend, page) = signed_in_page().await;

    assert_eq!(page.like("c1").await.unwrap(), MutationOutcome::Confirmed);
    let c1 = page.thread().find("c1").unwrap().unwrap();
    assert_eq!(c1.like_count(), 1);
    assert!(c1.is_liked);

    let err = page.like("c2").await.unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 500, .. }));
    let c2 = page.thread().find("c2").unwrap().unwrap();
    assert_eq!(c2.like_count(), 2);
    assert!(!c2.is_liked);
}

#[tokio::test]
async fn upvote_on_detail_page() {
    let (_backend, page) = signed_in_page().await;
    assert_eq!(page.upvote().await.unwrap(), MutationOutcome::Confirmed);
    let product = page.product().unwrap().unwrap();
    assert_eq!(product.upvotes, 4);
    assert!(product.is_upvoted);
}

#[tokio::test]
async fn report_sends_product_report() {
    let (backend, page) = signed_in_page().await;

    page.report("spam", Some("ignored".into())).await.unwrap();
    let sent = backend.last("POST /api/reports").unwrap().body;
    assert_eq!(sent["type"], "PRODUCT");
    assert_eq!(sent["productId"], "2");
    assert_eq!(sent["userId"], "7");
    assert!(sent.get("details").is_none());
}

#[tokio::test]
async fn closed_page_ignores_late_work() {
    let (backend, page) = signed_in_page().await;
    page.close();

    assert_eq!(page.like("c1").await.unwrap(), MutationOutcome::Skipped);
    assert_eq!(backend.count("POST /api/comments/c1/like"), 0);
}
