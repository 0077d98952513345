//! Page controllers: the collection stores of each page wired to `ApiClient`.
//!
//! Each controller is cheap to clone and holds no page state of its own
//! beyond what it is handed; stores are passed in so a page decides their
//! lifetime and can `cancel()` them when it goes away.
//!
//! ## Example
//!
//! ```ignore
//! use hunt_client::views::Catalog;
//! use hunt_client::{Category, CollectionStore, Product, ViewState};
//!
//! let catalog = Catalog::new(client);
//! let page = CollectionStore::<Product>::new();
//! catalog.load_category(&page, Category::Design).await;
//! if page.view_state()? == ViewState::Empty {
//!     println!("No products in this category yet");
//! }
//! catalog.upvote(&page, "2").await?;
//! ```

mod accounts;
mod catalog;
mod discussion;
mod moderation;
mod notifications;

pub use accounts::Accounts;
pub use catalog::Catalog;
pub use discussion::Discussion;
pub use moderation::Moderation;
pub use notifications::Notifications;
