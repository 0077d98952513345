//! CollectionStore - page-scoped, cloneable owner of one remote collection.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::{CollectionKey, FetchStatus, RemoteCollection, ViewState};
use crate::error::ClientError;
use crate::model::Identified;
use crate::optimistic::MutationLedger;
use crate::reconcile::{merge_by_id, position_of, Reconcile};

/// Result of a `load` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response was applied; carries the new item count.
    Loaded(usize),
    /// The request failed; the error is also recorded in the collection.
    Failed(ClientError),
    /// A newer load was issued while this one was in flight; response discarded.
    Stale,
    /// The store was cancelled (page unmounted); nothing was applied.
    Cancelled,
}

pub(crate) struct Inner<T> {
    pub(crate) collection: RemoteCollection<T>,
    /// Sequence number of the most recently issued load.
    pub(crate) issued: u64,
    pub(crate) ledger: MutationLedger<T>,
    pub(crate) cancelled: bool,
}

impl<T: Identified> Inner<T> {
    /// Publish a new item vector. The previous `Arc` is never mutated.
    pub(crate) fn publish(&mut self, items: Vec<T>) {
        self.collection.items = Arc::new(items);
        self.collection.version += 1;
    }

    /// Copy-on-write replacement of the item with `id`. Returns false if absent.
    pub(crate) fn write_item(&mut self, id: &str, value: T) -> bool {
        match position_of(&self.collection.items, id) {
            Some(index) => {
                let mut items = self.collection.items.as_ref().clone();
                items[index] = value;
                self.publish(items);
                true
            }
            None => false,
        }
    }
}

/// Owner of one page's view of a remote collection.
///
/// Clones share state, so a page can hand the store to child components.
pub struct CollectionStore<T> {
    pub(crate) inner: Arc<Mutex<Inner<T>>>,
    cancel: Arc<watch::Sender<bool>>,
}

impl<T> Clone for CollectionStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            cancel: Arc::clone(&self.cancel),
        }
    }
}

impl<T: Identified + Reconcile> Default for CollectionStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Identified + Reconcile> CollectionStore<T> {
    /// Create an idle, empty store.
    pub fn new() -> Self {
        let (cancel, _) = watch::channel(false);
        Self {
            inner: Arc::new(Mutex::new(Inner {
                collection: RemoteCollection::default(),
                issued: 0,
                ledger: MutationLedger::new(),
                cancelled: false,
            })),
            cancel: Arc::new(cancel),
        }
    }

    pub(crate) fn lock(&self, operation: &'static str) -> Result<MutexGuard<'_, Inner<T>>, ClientError> {
        self.inner
            .lock()
            .map_err(|_| ClientError::LockPoisoned(operation))
    }

    /// Current snapshot. Cheap: items are shared, not copied.
    pub fn snapshot(&self) -> Result<RemoteCollection<T>, ClientError> {
        Ok(self.lock("snapshot")?.collection.clone())
    }

    pub fn items(&self) -> Result<Arc<Vec<T>>, ClientError> {
        Ok(Arc::clone(&self.lock("items")?.collection.items))
    }

    pub fn view_state(&self) -> Result<ViewState, ClientError> {
        Ok(self.lock("view_state")?.collection.view_state())
    }

    pub fn get(&self, id: &str) -> Result<Option<T>, ClientError> {
        let inner = self.lock("get")?;
        Ok(inner.collection.items.iter().find(|item| item.id() == id).cloned())
    }

    /// Fetch the collection identified by `key` using `loader`, the single
    /// network request for that key.
    ///
    /// Only the most recently issued load may apply its result; earlier ones
    /// resolve as `Stale`. A failure keeps the last good items for the same key
    /// and empties the collection when `key` has never loaded successfully.
    pub async fn load<F>(&self, key: CollectionKey, loader: F) -> FetchOutcome
    where
        F: Future<Output = Result<Vec<T>, ClientError>>,
    {
        let mut cancel_rx = self.cancel.subscribe();
        let seq = match self.begin_load(&key) {
            Ok(Some(seq)) => seq,
            Ok(None) => return FetchOutcome::Cancelled,
            Err(_) if self.is_cancelled() => return FetchOutcome::Cancelled,
            Err(err) => return FetchOutcome::Failed(err),
        };

        let result = tokio::select! {
            biased;
            _ = cancelled(&mut cancel_rx) => {
                debug!(collection = T::COLLECTION, %key, "load cancelled in flight");
                return FetchOutcome::Cancelled;
            }
            result = loader => result,
        };

        match self.finish_load(seq, key, result) {
            Ok(outcome) => outcome,
            Err(_) if self.is_cancelled() => FetchOutcome::Cancelled,
            Err(err) => FetchOutcome::Failed(err),
        }
    }

    fn begin_load(&self, key: &CollectionKey) -> Result<Option<u64>, ClientError> {
        let mut inner = self.lock("load")?;
        if inner.cancelled {
            return Ok(None);
        }
        inner.issued += 1;
        inner.collection.status = FetchStatus::Loading;
        inner.collection.version += 1;
        debug!(collection = T::COLLECTION, %key, seq = inner.issued, "load issued");
        Ok(Some(inner.issued))
    }

    fn finish_load(
        &self,
        seq: u64,
        key: CollectionKey,
        result: Result<Vec<T>, ClientError>,
    ) -> Result<FetchOutcome, ClientError> {
        let mut inner = self.lock("load")?;
        if inner.cancelled {
            return Ok(FetchOutcome::Cancelled);
        }
        if seq != inner.issued {
            debug!(
                collection = T::COLLECTION,
                %key,
                seq,
                latest = inner.issued,
                "discarding stale response"
            );
            return Ok(FetchOutcome::Stale);
        }

        match result {
            Ok(incoming) => {
                let mut merged = merge_by_id(&inner.collection.items, incoming);
                inner
                    .ledger
                    .retain(|id| merged.iter().any(|item| item.id() == id));
                for item in merged.iter_mut() {
                    // local fields of an item with mutations in flight come from
                    // its confirmed base, not from the speculative view
                    if let Some(base) = inner.ledger.base(item.id()) {
                        item.reconcile(base);
                    }
                    if let Some(view) = inner.ledger.rebase(item.id(), item.clone()) {
                        *item = view;
                    }
                }

                let count = merged.len();
                inner.publish(merged);
                inner.collection.status = FetchStatus::Loaded;
                inner.collection.error = None;
                inner.collection.key = Some(key);
                info!(collection = T::COLLECTION, count, "collection loaded");
                Ok(FetchOutcome::Loaded(count))
            }
            Err(err) => {
                if inner.collection.key.as_ref() != Some(&key) {
                    inner.ledger.clear();
                    inner.publish(Vec::new());
                    inner.collection.key = Some(key.clone());
                }
                inner.collection.status = FetchStatus::Error;
                inner.collection.error = Some(err.clone());
                inner.collection.version += 1;
                warn!(collection = T::COLLECTION, %key, error = %err, "collection load failed");
                Ok(FetchOutcome::Failed(err))
            }
        }
    }

    /// Seed the collection without a network call (e.g. locally generated lists).
    pub fn replace_items(&self, key: CollectionKey, items: Vec<T>) -> Result<(), ClientError> {
        let mut inner = self.lock("replace_items")?;
        let merged = merge_by_id(&inner.collection.items, items);
        inner.ledger.clear();
        inner.publish(merged);
        inner.collection.status = FetchStatus::Loaded;
        inner.collection.error = None;
        inner.collection.key = Some(key);
        Ok(())
    }

    /// Copy-on-write edit of the whole item vector, bypassing the mutation ledger.
    pub fn update_items<R>(
        &self,
        operation: &'static str,
        f: impl FnOnce(&mut Vec<T>) -> R,
    ) -> Result<R, ClientError> {
        let mut inner = self.lock(operation)?;
        let mut items = inner.collection.items.as_ref().clone();
        let result = f(&mut items);
        inner.publish(items);
        Ok(result)
    }

    /// Copy-on-write edit of a single item. Returns false if `id` is absent.
    pub fn modify(&self, id: &str, f: impl FnOnce(&mut T)) -> Result<bool, ClientError> {
        let mut inner = self.lock("modify")?;
        let Some(index) = position_of(&inner.collection.items, id) else {
            return Ok(false);
        };
        let mut items = inner.collection.items.as_ref().clone();
        f(&mut items[index]);
        inner.publish(items);
        Ok(true)
    }

    pub fn remove(&self, id: &str) -> Result<Option<T>, ClientError> {
        let mut inner = self.lock("remove")?;
        let Some(index) = position_of(&inner.collection.items, id) else {
            return Ok(None);
        };
        let mut items = inner.collection.items.as_ref().clone();
        let removed = items.remove(index);
        inner.publish(items);
        Ok(Some(removed))
    }

    /// Tear the store down (owning page unmounted).
    ///
    /// In-flight loads are dropped, which aborts their requests, and later
    /// loads are refused.
    pub fn cancel(&self) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.cancelled = true;
        drop(inner);
        self.cancel.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancel.borrow()
    }
}

async fn cancelled(rx: &mut watch::Receiver<bool>) {
    loop {
        let stop = *rx.borrow_and_update();
        if stop {
            return;
        }
        if rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
