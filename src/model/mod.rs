//! View-model entities mirrored from the user and product services.
//!
//! Every entity carries a stable string id (the reconciliation key). The
//! backend emits ids as either JSON strings or numbers; both land in `String`.
//!
//! ## Example
//!
//! ```ignore
//! use hunt_client::{Identified, Product};
//!
//! let product: Product = serde_json::from_value(json!({ "id": 2, "upvotes": 3 }))?;
//! assert_eq!(product.id(), "2");
//! assert_eq!(Product::COLLECTION, "products");
//! ```

mod comment;
mod moderation;
mod notification;
mod product;
mod user;

use serde::{Deserialize, Deserializer};

/// Types mirrored from the backend and keyed by a stable identifier.
pub trait Identified: Clone + Send + Sync + 'static {
    /// Collection name for this entity type (e.g., "products", "comments").
    const COLLECTION: &'static str;

    /// The reconciliation key for this instance.
    fn id(&self) -> &str;
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Signed(i64),
    Unsigned(u64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Signed(n) => n.to_string(),
            RawId::Unsigned(n) => n.to_string(),
        }
    }
}

/// Deserialize an id given as a string or a number.
pub(crate) fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(String::from)
}

/// Deserialize an optional id given as a string, a number, or null.
pub(crate) fn opt_id_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawId>::deserialize(deserializer)?.map(String::from))
}

/// Treat an explicit `null` the same as a missing field.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub use comment::{Author, Comment, CommentCounts, LikeState, NewComment};
pub use moderation::{
    Message, MessageReply, MessageStatus, NewReport, Report, ReportResolution, ReportStatus,
    ReportedProduct,
};
pub use notification::Notification;
pub use product::{ApprovalAck, Product, ProductImage, PricingTier, UpvoteAck};
pub use user::{AuthResponse, Credentials, OtpRequest, Profile, SignupRequest, Subscription, User};
