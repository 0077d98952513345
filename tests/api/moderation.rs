use hunt_client::views::{Accounts, Moderation};
use hunt_client::{
    guard_route, search_users, ClientError, CollectionStore, Credentials, FetchOutcome,
    GateDecision, Message, MessageStatus, MutationOutcome, Product, Report, ReportStatus, User,
};

use crate::support;

#[tokio::test]
async fn gate_redirects_without_token_before_any_fetch() {
    let (backend, client) = support::client().await;
    let session = support::empty_session();

    let decision = guard_route("/admin/reports", &session, |user_id| {
        let client = client.clone();
        async move { client.profile(&user_id).await }
    })
    .await
    .unwrap();

    assert_eq!(decision, GateDecision::Redirect("/".into()));
    assert!(backend.routes().is_empty());
}

#[tokio::test]
async fn gate_follows_profile_admin_flag() {
    let (backend, client) = support::client().await;

    for (email, expected) in [
        ("admin@x.io", GateDecision::Allow),
        ("ana@x.io", GateDecision::Redirect("/".into())),
    ] {
        let session = support::empty_session();
        let accounts = Accounts::new(client.clone(), session.clone());
        accounts
            .login(&Credentials {
                email: email.into(),
                password: "secret".into(),
            })
            .await
            .unwrap();
        let authorized = accounts.authorized_client().unwrap();

        let decision = guard_route("/admin", &session, |user_id| async move {
            authorized.profile(&user_id).await
        })
        .await
        .unwrap();
        assert_eq!(decision, expected);
    }
    assert_eq!(backend.count("GET /api/auth/profile"), 2);
}

#[tokio::test]
async fn pending_queue_and_approval() {
    let (backend, client) = support::client().await;
    let moderation = Moderation::new(client);
    let queue = CollectionStore::<Product>::new();

    assert_eq!(moderation.load_pending(&queue).await, FetchOutcome::Loaded(1));
    assert_eq!(queue.items().unwrap()[0].name, "Quill");

    let outcome = moderation.set_approval(&queue, "3", true).await.unwrap();
    assert_eq!(outcome, MutationOutcome::Confirmed);
    assert!(queue.get("3").unwrap().unwrap().is_approved);

    let sent = backend.last("PATCH /api/products/approve/3").unwrap().body;
    assert_eq!(sent, serde_json::json!({ "isApproved": true }));
}

#[tokio::test]
async fn refused_approval_rolls_back() {
    let (backend, client) = support::client().await;
    let moderation = Moderation::new(client);
    let queue = CollectionStore::<Product>::new();
    moderation.load_pending(&queue).await;

    backend.fail_approvals();
    let err = moderation.set_approval(&queue, "3", true).await.unwrap_err();
    assert!(err.is_transient());
    assert!(!queue.get("3").unwrap().unwrap().is_approved);
}

#[tokio::test]
async fn reports_filter_and_resolve_refetches() {
    let (backend, client) = support::client().await;
    let moderation = Moderation::new(client);
    let reports = CollectionStore::<Report>::new();

    assert_eq!(
        moderation.load_reports(&reports, Some("product")).await,
        FetchOutcome::Loaded(1)
    );
    assert_eq!(backend.count("GET /api/reports?type=PRODUCT"), 1);
    assert_eq!(reports.items().unwrap()[0].status, ReportStatus::Pending);

    let outcome = moderation
        .resolve(&reports, "5", ReportStatus::Resolved, Some("1".into()))
        .await
        .unwrap();
    assert_eq!(outcome, FetchOutcome::Loaded(1));
    assert_eq!(backend.count("GET /api/reports?type=PRODUCT"), 2);
    assert_eq!(reports.get("5").unwrap().unwrap().status, ReportStatus::Resolved);

    let sent = backend.last("PUT /api/reports/5").unwrap().body;
    assert_eq!(sent, serde_json::json!({ "status": "RESOLVED", "resolvedById": "1" }));
}

#[tokio::test]
async fn unfiltered_reports_parse_any_status_case() {
    let (_backend, client) = support::client().await;
    let moderation = Moderation::new(client);
    let reports = CollectionStore::<Report>::new();

    assert_eq!(moderation.load_reports(&reports, None).await, FetchOutcome::Loaded(2));
    assert!(reports.items().unwrap().iter().all(|r| r.status.is_open()));
}

#[tokio::test]
async fn message_reply_is_marked_at_once_and_confirmed() {
    let (backend, client) = support::client().await;
    let moderation = Moderation::new(client);
    let inbox = CollectionStore::<Message>::new();

    assert_eq!(moderation.load_messages(&inbox).await, FetchOutcome::Loaded(1));
    let outcome = moderation.reply(&inbox, "m1", "Thanks, Eve").await.unwrap();
    assert_eq!(outcome, MutationOutcome::Confirmed);

    let message = inbox.get("m1").unwrap().unwrap();
    assert_eq!(message.status, MessageStatus::Responded);
    assert_eq!(message.response.as_deref(), Some("Thanks, Eve"));
    assert_eq!(
        backend.last("POST /api/auth/replyMessage/m1").unwrap().body["response"],
        "Thanks, Eve"
    );
}

#[tokio::test]
async fn reply_to_unknown_message_errors_and_leaves_inbox() {
    let (_backend, client) = support::client().await;
    let moderation = Moderation::new(client.clone());
    let inbox = CollectionStore::<Message>::new();
    moderation.load_messages(&inbox).await;

    let err = client.reply_message("m404", "hello").await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound(_)));
    assert_eq!(inbox.get("m1").unwrap().unwrap().status, MessageStatus::Pending);
}

#[tokio::test]
async fn users_list_and_lookup() {
    let (_backend, client) = support::client().await;
    let moderation = Moderation::new(client);
    let users = CollectionStore::<User>::new();

    assert_eq!(moderation.load_users(&users).await, FetchOutcome::Loaded(2));
    let hits = search_users(&users.items().unwrap(), "ROOT");
    assert_eq!(hits.len(), 1);
    assert!(hits[0].is_admin);
}
