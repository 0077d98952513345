//! Optimistic mutations with exact rollback.
//!
//! A mutation is applied to the page immediately, then confirmed or reverted
//! when the backend answers. Overlapping mutations on the same item are tracked
//! in a `MutationLedger`, so a failure only undoes its own change.
//!
//! ## Example
//!
//! ```ignore
//! use hunt_client::{MutationOutcome, Product, UpvoteAck};
//!
//! let outcome = store
//!     .mutate("2", Product::upvoted, async { client.upvote("2").await.map(Some) })
//!     .await?;
//! assert_eq!(outcome, MutationOutcome::Confirmed);
//! ```

mod ledger;

use std::future::Future;

use tracing::{debug, warn};

use crate::collection::CollectionStore;
use crate::error::ClientError;
use crate::model::Identified;
use crate::reconcile::{position_of, Reconcile};

pub use ledger::{MutationId, MutationLedger, Truth};

/// Server response that settles an optimistic mutation.
///
/// A full entity replaces the speculative value but keeps its local-only
/// fields. Partial acknowledgements overwrite just what they carry.
pub trait Authoritative<T> {
    fn apply_to(self, current: &T) -> T;
}

impl<T: Reconcile + Clone> Authoritative<T> for T {
    fn apply_to(mut self, current: &T) -> T {
        self.reconcile(current);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// No item had the id (or the store was torn down); nothing was sent.
    Skipped,
    Confirmed,
}

pub(crate) fn boxed_truth<T, S>(truth: Option<S>) -> Option<Truth<T>>
where
    S: Authoritative<T> + Send + 'static,
{
    truth.map(|s| Box::new(move |current: &T| s.apply_to(current)) as Truth<T>)
}

impl<T: Identified + Reconcile> CollectionStore<T> {
    /// Apply `transform` to the item with `id` now, then settle it with `confirm`.
    ///
    /// On failure the item reverts to what the remaining in-flight mutations
    /// imply and the error is returned; there is no retry.
    pub async fn mutate<F, Fut, S>(
        &self,
        id: &str,
        transform: F,
        confirm: Fut,
    ) -> Result<MutationOutcome, ClientError>
    where
        F: Fn(&T) -> T + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<S>, ClientError>>,
        S: Authoritative<T> + Send + 'static,
    {
        let mutation = {
            let mut inner = self.lock("mutate")?;
            if inner.cancelled {
                return Ok(MutationOutcome::Skipped);
            }
            let Some(index) = position_of(&inner.collection.items, id) else {
                warn!(collection = T::COLLECTION, id, "mutation target not found, skipping");
                return Ok(MutationOutcome::Skipped);
            };
            let current = inner.collection.items[index].clone();
            let (mutation, view) = inner.ledger.begin(id, &current, transform);
            inner.write_item(id, view);
            mutation
        };

        match confirm.await {
            Ok(truth) => {
                let mut inner = self.lock("mutate")?;
                if let Some(view) = inner.ledger.confirm(id, mutation, boxed_truth(truth)) {
                    if !inner.cancelled {
                        inner.write_item(id, view);
                    }
                }
                debug!(collection = T::COLLECTION, id, %mutation, "mutation confirmed");
                Ok(MutationOutcome::Confirmed)
            }
            Err(err) => {
                let mut inner = self.lock("mutate")?;
                if let Some(view) = inner.ledger.reject(id, mutation) {
                    if !inner.cancelled {
                        inner.write_item(id, view);
                    }
                }
                warn!(
                    collection = T::COLLECTION,
                    id,
                    %mutation,
                    error = %err,
                    "mutation rejected, rolled back"
                );
                Err(err)
            }
        }
    }

    /// Unsettled mutations for `id`.
    pub fn pending_mutations(&self, id: &str) -> Result<usize, ClientError> {
        Ok(self.lock("pending_mutations")?.ledger.pending(id))
    }
}
