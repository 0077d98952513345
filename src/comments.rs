//! Two-level comment threads: top-level comments with one level of replies.
//!
//! New comments and replies appear at once as pending placeholders and are
//! swapped for the backend's copy on confirmation. Likes go through the same
//! optimistic ledger as upvotes.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info, warn};

use crate::collection::{CollectionKey, CollectionStore, FetchOutcome, ViewState};
use crate::error::ClientError;
use crate::model::{Author, Comment, LikeState};
use crate::optimistic::{boxed_truth, MutationLedger, MutationOutcome};
use crate::reconcile::position_of;

/// Comment thread of one product page.
#[derive(Clone, Default)]
pub struct CommentThread {
    store: CollectionStore<Comment>,
    likes: Arc<Mutex<MutationLedger<LikeState>>>,
    next_temp: Arc<AtomicU64>,
}

/// Comment or reply with `id`, searching both levels.
fn locate<'a>(items: &'a [Comment], id: &str) -> Option<&'a Comment> {
    items.iter().find_map(|comment| {
        if comment.id == id {
            Some(comment)
        } else {
            comment.replies.iter().find(|reply| reply.id == id)
        }
    })
}

fn locate_mut<'a>(items: &'a mut [Comment], id: &str) -> Option<&'a mut Comment> {
    for comment in items.iter_mut() {
        if comment.id == id {
            return Some(comment);
        }
        if let Some(reply) = comment.replies.iter_mut().find(|reply| reply.id == id) {
            return Some(reply);
        }
    }
    None
}

impl CommentThread {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(product_id: &str) -> CollectionKey {
        CollectionKey::new(format!("/api/products/{}/comments", product_id))
    }

    pub fn store(&self) -> &CollectionStore<Comment> {
        &self.store
    }

    fn like_ledger(&self) -> Result<MutexGuard<'_, MutationLedger<LikeState>>, ClientError> {
        self.likes
            .lock()
            .map_err(|_| ClientError::LockPoisoned("comment likes"))
    }

    fn temp_id(&self) -> String {
        format!("pending-{}", self.next_temp.fetch_add(1, Ordering::Relaxed) + 1)
    }

    /// Fetch the thread for `product_id`; in-flight likes are reapplied on
    /// top of the fresh counts.
    pub async fn load<F>(&self, product_id: &str, loader: F) -> FetchOutcome
    where
        F: Future<Output = Result<Vec<Comment>, ClientError>>,
    {
        let outcome = self.store.load(Self::key(product_id), loader).await;
        if let FetchOutcome::Loaded(_) = outcome {
            if let Err(err) = self.rebase_likes() {
                return FetchOutcome::Failed(err);
            }
        }
        outcome
    }

    fn rebase_likes(&self) -> Result<(), ClientError> {
        let mut inner = self.store.lock("comment likes")?;
        let mut ledger = self.like_ledger()?;
        if ledger.is_empty() {
            return Ok(());
        }

        let mut items = inner.collection.items.as_ref().clone();
        ledger.retain(|id| locate(&items, id).is_some());
        for comment in items.iter_mut() {
            if let Some(view) = ledger.rebase(&comment.id, comment.like_state()) {
                comment.set_like_state(view);
            }
            for reply in comment.replies.iter_mut() {
                if let Some(view) = ledger.rebase(&reply.id, reply.like_state()) {
                    reply.set_like_state(view);
                }
            }
        }
        inner.publish(items);
        Ok(())
    }

    pub fn comments(&self) -> Result<Arc<Vec<Comment>>, ClientError> {
        self.store.items()
    }

    pub fn view_state(&self) -> Result<ViewState, ClientError> {
        self.store.view_state()
    }

    /// Comment or reply with `id`.
    pub fn find(&self, id: &str) -> Result<Option<Comment>, ClientError> {
        Ok(locate(&self.store.items()?, id).cloned())
    }

    /// Post a top-level comment. The placeholder sits at the top until
    /// `confirm` resolves, then becomes the server's comment or disappears.
    pub async fn add_comment<Fut>(
        &self,
        content: impl Into<String>,
        author: Option<Author>,
        confirm: Fut,
    ) -> Result<Comment, ClientError>
    where
        Fut: Future<Output = Result<Comment, ClientError>>,
    {
        let temp = self.temp_id();
        let placeholder = Comment::placeholder(temp.clone(), content, author);
        self.store
            .update_items("add_comment", |items| items.insert(0, placeholder))?;

        match confirm.await {
            Ok(comment) => {
                let confirmed = comment.clone();
                self.settle("add_comment", |items| {
                    let exists = position_of(items, &confirmed.id).is_some();
                    match position_of(items, &temp) {
                        Some(index) if exists => {
                            items.remove(index);
                        }
                        Some(index) => items[index] = confirmed,
                        None if !exists => items.insert(0, confirmed),
                        None => {}
                    }
                })?;
                info!(comment = %comment.id, "comment posted");
                Ok(comment)
            }
            Err(err) => {
                self.settle("add_comment", |items| items.retain(|c| c.id != temp))?;
                warn!(error = %err, "comment rejected, placeholder removed");
                Err(err)
            }
        }
    }

    /// Reply to the top-level comment `parent_id`.
    ///
    /// Fails with `ParentNotFound` before `confirm` is polled if the parent is
    /// not a top-level comment. Only that parent's replies change.
    pub async fn add_reply<Fut>(
        &self,
        parent_id: &str,
        content: impl Into<String>,
        author: Option<Author>,
        confirm: Fut,
    ) -> Result<Comment, ClientError>
    where
        Fut: Future<Output = Result<Comment, ClientError>>,
    {
        let temp = self.temp_id();
        let placeholder = Comment::placeholder(temp.clone(), content, author);
        let attached = self.store.update_items("add_reply", |items| {
            match items.iter_mut().find(|c| c.id == parent_id) {
                Some(parent) => {
                    parent.replies.push(placeholder);
                    true
                }
                None => false,
            }
        })?;
        if !attached {
            warn!(parent = parent_id, "reply target is not a top-level comment");
            return Err(ClientError::ParentNotFound(parent_id.to_string()));
        }

        let result = confirm.await;
        let confirmed = result.as_ref().ok().cloned();
        self.settle("add_reply", |items| {
            let Some(parent) = items.iter_mut().find(|c| c.id == parent_id) else {
                return;
            };
            let slot = position_of(&parent.replies, &temp);
            match (confirmed, slot) {
                (Some(reply), Some(index)) => parent.replies[index] = reply,
                (Some(reply), None) => {
                    if position_of(&parent.replies, &reply.id).is_none() {
                        parent.replies.push(reply);
                    }
                }
                (None, Some(index)) => {
                    parent.replies.remove(index);
                }
                (None, None) => {}
            }
        })?;

        match &result {
            Ok(reply) => info!(parent = parent_id, reply = %reply.id, "reply posted"),
            Err(err) => warn!(parent = parent_id, error = %err, "reply rejected, placeholder removed"),
        }
        result
    }

    /// Flip the like on a comment or reply now; the server's `{likes, isLiked}`
    /// settles it, a failure restores the prior state.
    pub async fn toggle_like<Fut>(&self, comment_id: &str, confirm: Fut) -> Result<MutationOutcome, ClientError>
    where
        Fut: Future<Output = Result<LikeState, ClientError>>,
    {
        let mutation = {
            let mut inner = self.store.lock("toggle_like")?;
            if inner.cancelled {
                return Ok(MutationOutcome::Skipped);
            }
            let Some(current) = locate(&inner.collection.items, comment_id).map(Comment::like_state) else {
                warn!(comment = comment_id, "like target not found, skipping");
                return Ok(MutationOutcome::Skipped);
            };
            let mut ledger = self.like_ledger()?;
            let (mutation, view) = ledger.begin(comment_id, &current, LikeState::toggled);
            drop(ledger);
            if let Some(items) = write_like(&inner.collection.items, comment_id, view) {
                inner.publish(items);
            }
            mutation
        };

        let result = confirm.await;
        let mut inner = self.store.lock("toggle_like")?;
        let mut ledger = self.like_ledger()?;
        let settled = match &result {
            Ok(state) => ledger.confirm(comment_id, mutation, boxed_truth(Some(*state))),
            Err(_) => ledger.reject(comment_id, mutation),
        };
        drop(ledger);
        if let Some(view) = settled.filter(|_| !inner.cancelled) {
            if let Some(items) = write_like(&inner.collection.items, comment_id, view) {
                inner.publish(items);
            }
        }

        match result {
            Ok(state) => {
                debug!(comment = comment_id, likes = state.likes, "like confirmed");
                Ok(MutationOutcome::Confirmed)
            }
            Err(err) => {
                warn!(comment = comment_id, error = %err, "like rejected, rolled back");
                Err(err)
            }
        }
    }

    fn settle(&self, operation: &'static str, f: impl FnOnce(&mut Vec<Comment>)) -> Result<(), ClientError> {
        if self.store.is_cancelled() {
            debug!(operation, "thread torn down, dropping settlement");
            return Ok(());
        }
        self.store.update_items(operation, f)
    }

    /// Tear down with the page.
    pub fn cancel(&self) {
        self.store.cancel();
    }
}

/// Copy of `items` with the like state of `id` replaced, or `None` if absent.
fn write_like(items: &Arc<Vec<Comment>>, id: &str, state: LikeState) -> Option<Vec<Comment>> {
    let mut next = items.as_ref().clone();
    locate_mut(&mut next, id)?.set_like_state(state);
    Some(next)
}
