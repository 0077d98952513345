//! View models for a product-discovery marketplace.
//!
//! Server-backed collections (products, comments, reports, messages) are
//! mirrored per page in `CollectionStore`s, mutated optimistically with exact
//! rollback, and refreshed without losing client-only state. `ApiClient`
//! speaks to the user service, the product service and the image host.
//!
//! ## Example
//!
//! ```ignore
//! use hunt_client::views::Catalog;
//! use hunt_client::{ApiClient, ClientConfig, CollectionStore, Product};
//!
//! let catalog = Catalog::new(ApiClient::new(ClientConfig::from_env()?)?);
//! let home = CollectionStore::<Product>::new();
//! catalog.load_all(&home).await;
//! catalog.upvote(&home, "2").await?;
//! ```

// Lets the derive macro's `hunt_client::` paths resolve inside this crate.
extern crate self as hunt_client;

mod cache;
mod category;
mod collection;
mod comments;
mod config;
mod draft;
mod error;
mod model;
mod optimistic;
mod reconcile;
mod search;
mod session;

#[cfg(feature = "http")]
pub mod http;
#[cfg(feature = "http")]
pub mod views;

pub use cache::SharedCache;
pub use category::{category_counts, filter_by_category, partition_by_category, Category};
pub use collection::{
    CollectionKey, CollectionStore, FetchOutcome, FetchStatus, RemoteCollection, ViewState,
};
pub use comments::CommentThread;
pub use config::{ClientConfig, DEFAULT_CACHE_TTL, DEFAULT_IMAGE_HOST_URL, DEFAULT_REQUEST_TIMEOUT};
pub use draft::{
    ContactSubmission, FormDraft, PricingDraft, ProductForm, ProductStep, ProductSubmission,
    ProductWizard, ProfileUpdate, SubmittedPricing,
};
pub use error::ClientError;
pub use model::{
    ApprovalAck, AuthResponse, Author, Comment, CommentCounts, Credentials, Identified, LikeState,
    Message, MessageReply, MessageStatus, NewComment, NewReport, Notification, OtpRequest,
    PricingTier, Product, ProductImage, Profile, Report, ReportResolution, ReportStatus,
    ReportedProduct, SignupRequest, Subscription, UpvoteAck, User,
};
pub use optimistic::{Authoritative, MutationId, MutationLedger, MutationOutcome, Truth};
pub use reconcile::{merge_by_id, Reconcile};
pub use search::{search_users, ProductQuery};
pub use session::{
    guard_route, is_admin_route, AdminGate, GateDecision, InMemorySessionStorage, Session,
    SessionChange, SessionContext, SessionStorage, ADMIN_PREFIX, EMAIL_KEY, NAME_KEY,
    SESSION_ENDED, SESSION_STARTED, TOKEN_KEY, USER_ID_KEY,
};

#[cfg(feature = "http")]
pub use http::ApiClient;

pub use hunt_client_macros::ViewModel;
