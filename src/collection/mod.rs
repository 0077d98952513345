//! Collections - server-backed lists held as page-scoped view models.
//!
//! A `CollectionStore<T>` owns one page's mirror of a remote collection and
//! drives the `idle -> loading -> {loaded | error}` state machine. Consumers
//! read immutable snapshots; every change publishes a new `Arc<Vec<T>>`.
//!
//! ## Example
//!
//! ```ignore
//! use hunt_client::{CollectionKey, CollectionStore, FetchOutcome, Product};
//!
//! let store = CollectionStore::<Product>::new();
//! let key = CollectionKey::new("/api/products/category").with_param("name", "Design");
//! match store.load(key, client.products_by_category("Design")).await {
//!     FetchOutcome::Loaded(n) => println!("{n} products"),
//!     FetchOutcome::Failed(err) => eprintln!("{}", err.user_message()),
//!     FetchOutcome::Stale | FetchOutcome::Cancelled => {}
//! }
//! ```

mod key;
mod store;

use std::sync::Arc;

use crate::error::ClientError;

pub use key::CollectionKey;
pub use store::{CollectionStore, FetchOutcome};

/// Where a collection is in its fetch lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Error,
}

/// What the page should render for a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Idle,
    Loading,
    /// A successful fetch returned zero items.
    Empty,
    Ready(usize),
    Failed(String),
}

/// Immutable snapshot of a remote collection.
#[derive(Debug, Clone)]
pub struct RemoteCollection<T> {
    pub(crate) items: Arc<Vec<T>>,
    pub(crate) status: FetchStatus,
    pub(crate) error: Option<ClientError>,
    pub(crate) key: Option<CollectionKey>,
    pub(crate) version: u64,
}

impl<T> Default for RemoteCollection<T> {
    fn default() -> Self {
        Self {
            items: Arc::new(Vec::new()),
            status: FetchStatus::Idle,
            error: None,
            key: None,
            version: 0,
        }
    }
}

impl<T> RemoteCollection<T> {
    pub fn items(&self) -> &Arc<Vec<T>> {
        &self.items
    }

    pub fn status(&self) -> FetchStatus {
        self.status
    }

    pub fn error(&self) -> Option<&ClientError> {
        self.error.as_ref()
    }

    /// Identifier the current items were loaded (or last requested) for.
    pub fn key(&self) -> Option<&CollectionKey> {
        self.key.as_ref()
    }

    /// Bumped on every published change.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn view_state(&self) -> ViewState {
        match self.status {
            FetchStatus::Idle => ViewState::Idle,
            FetchStatus::Loading => ViewState::Loading,
            FetchStatus::Error => ViewState::Failed(
                self.error
                    .as_ref()
                    .map(ClientError::user_message)
                    .unwrap_or_default(),
            ),
            FetchStatus::Loaded if self.items.is_empty() => ViewState::Empty,
            FetchStatus::Loaded => ViewState::Ready(self.items.len()),
        }
    }
}
