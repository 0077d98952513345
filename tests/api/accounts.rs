#[cfg(feature = "emitter")]
use std::sync::mpsc;
#[cfg(feature = "emitter")]
use std::time::Duration;

use hunt_client::views::Accounts;
use hunt_client::{ClientError, Credentials, FormDraft, SignupRequest};
#[cfg(feature = "emitter")]
use hunt_client::SessionChange;

use crate::support;

fn credentials(password: &str) -> Credentials {
    Credentials {
        email: "ana@x.io".into(),
        password: password.into(),
    }
}

#[tokio::test]
async fn login_establishes_session() {
    let (_backend, client) = support::client().await;
    let session = support::empty_session();
    let accounts = Accounts::new(client, session.clone());

    let current = accounts.login(&credentials("secret")).await.unwrap();
    assert_eq!(current.user_id.as_deref(), Some("7"));
    assert_eq!(session.token().unwrap().as_deref(), Some("tok-7"));

    accounts.logout().unwrap();
    assert!(!session.current().unwrap().is_authenticated());
}

#[cfg(feature = "emitter")]
#[tokio::test]
async fn login_and_logout_notify_listeners() {
    let (_backend, client) = support::client().await;
    let session = support::empty_session();
    let (tx, rx) = mpsc::channel();
    session
        .on_change(move |change| {
            let _ = tx.send(change);
        })
        .unwrap();

    let accounts = Accounts::new(client, session);
    accounts.login(&credentials("secret")).await.unwrap();
    let change = rx.recv_timeout(Duration::from_secs(2)).unwrap();
    assert_eq!(change, SessionChange::Started { user_id: "7".into() });

    accounts.logout().unwrap();
    let change = rx.recv_timeout(Duration::from_secs(2)).unwrap();
    assert_eq!(change, SessionChange::Ended { user_id: Some("7".into()) });
}

#[tokio::test]
async fn bad_credentials_leave_session_untouched() {
    let (_backend, client) = support::client().await;
    let session = support::empty_session();
    let accounts = Accounts::new(client, session.clone());

    let err = accounts.login(&credentials("wrong")).await.unwrap_err();
    assert_eq!(err, ClientError::Unauthorized("Invalid credentials".into()));
    assert_eq!(session.token().unwrap(), None);
}

#[tokio::test]
async fn profile_requests_carry_the_session_token() {
    let (backend, client) = support::client().await;
    let session = support::empty_session();
    let accounts = Accounts::new(client, session.clone());
    accounts.login(&credentials("secret")).await.unwrap();

    let profile = accounts.load_profile().await.unwrap();
    assert_eq!(profile.id, "7");
    assert_eq!(profile.github.as_deref(), Some("https://github.com/someone"));
    assert_eq!(session.current().unwrap().is_admin, Some(false));

    let sent = backend.last("GET /api/auth/profile").unwrap();
    assert_eq!(sent.auth.as_deref(), Some("Bearer tok-7"));
}

#[tokio::test]
async fn wrong_otp_creates_nothing() {
    let (backend, client) = support::client().await;
    let session = support::empty_session();
    let accounts = Accounts::new(client, session.clone());
    let request = SignupRequest {
        name: "Cy".into(),
        email: "cy@x.io".into(),
        password: "pw".into(),
    };

    accounts.request_otp("cy@x.io").await.unwrap();
    let err = accounts.signup_with_otp(&request, "000000").await.unwrap_err();
    assert_eq!(
        err,
        ClientError::Api {
            status: 400,
            message: "Invalid OTP".into()
        }
    );
    assert_eq!(backend.count("POST /api/auth/signup"), 0);
    assert_eq!(session.token().unwrap(), None);

    let started = accounts.signup_with_otp(&request, "123456").await.unwrap();
    assert_eq!(started.user_id.as_deref(), Some("8"));
    assert_eq!(started.name.as_deref(), Some("Cy"));
    assert_eq!(backend.count("POST /api/auth/signup"), 1);
}

#[tokio::test]
async fn save_profile_uploads_avatar_first() {
    let (backend, client) = support::client().await;
    let session = support::empty_session();
    let accounts = Accounts::new(client, session);
    accounts.login(&credentials("secret")).await.unwrap();

    let mut draft = FormDraft::new();
    draft.set("name", "Ana");
    draft.set("headline", "Builder");
    let saved = accounts.save_profile(&draft, Some(b"\x89PNG".as_slice())).await.unwrap();
    assert_eq!(saved.profile_url.as_deref(), Some(support::UPLOADED_URL));

    let routes = backend.routes();
    let upload_at = routes.iter().position(|r| r == "POST /upload").unwrap();
    let save_at = routes
        .iter()
        .position(|r| r == "PUT /api/auth/profile?userId=7")
        .unwrap();
    assert!(upload_at < save_at);

    let sent = backend.last("PUT /api/auth/profile?userId=7").unwrap().body;
    assert_eq!(sent["profile_url"], support::UPLOADED_URL);
    assert_eq!(sent["headline"], "Builder");
}

#[tokio::test]
async fn save_without_avatar_skips_upload() {
    let (backend, client) = support::client().await;
    let accounts = Accounts::new(client, support::empty_session());
    accounts.login(&credentials("secret")).await.unwrap();

    let saved = accounts.save_profile(&FormDraft::new(), None).await.unwrap();
    assert_eq!(saved.profile_url, None);
    assert_eq!(backend.count("POST /upload"), 0);
}

#[tokio::test]
async fn save_profile_requires_session() {
    let (backend, client) = support::client().await;
    let accounts = Accounts::new(client, support::empty_session());

    let err = accounts.save_profile(&FormDraft::new(), Some(b"img".as_slice())).await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized(_)));
    assert!(backend.routes().is_empty());
}

#[tokio::test]
async fn subscribe_validates_email() {
    let (backend, client) = support::client().await;
    let accounts = Accounts::new(client, support::empty_session());

    assert!(matches!(
        accounts.subscribe("not-an-email").await,
        Err(ClientError::Validation(_))
    ));
    accounts.subscribe(" ana@x.io ").await.unwrap();
    assert_eq!(
        backend.last("POST /api/misc/subscribe").unwrap().body,
        serde_json::json!({ "email": "ana@x.io" })
    );
}

#[tokio::test]
async fn contact_form_requires_every_field() {
    let (backend, client) = support::client().await;
    let accounts = Accounts::new(client, support::empty_session());

    let mut draft = FormDraft::new();
    draft.set("name", "Eve");
    let err = accounts.contact(&draft).await.unwrap_err();
    assert_eq!(
        err,
        ClientError::Validation(vec!["email is required".into(), "message is required".into()])
    );

    draft.set("email", "eve@x.io");
    draft.set("message", "Hello there");
    accounts.contact(&draft).await.unwrap();
    assert_eq!(
        backend.last("POST /api/auth/messageSubmission").unwrap().body["message"],
        "Hello there"
    );
}
