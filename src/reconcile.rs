//! Reconciliation of fresh server payloads into an existing view model.
//!
//! The server never knows about client-only fields (an `is_upvoted` flag, a
//! placeholder marker). A refresh replaces items wholesale but carries those
//! fields over from the previous item with the same id.

use std::collections::{HashMap, HashSet};

use tracing::warn;

use crate::model::Identified;

/// Carry client-only state from the previous view-model item into a fresh one.
///
/// Usually derived with `#[derive(ViewModel)]` and `#[view(local)]` fields.
pub trait Reconcile {
    fn reconcile(&mut self, previous: &Self);
}

/// Merge an incoming server sequence over the previous items.
///
/// Order and membership follow `incoming`. Items whose id also exists in
/// `previous` keep their local-only fields. Duplicate ids in `incoming` are
/// dropped after the first occurrence so that one id never maps to two items.
pub fn merge_by_id<T>(previous: &[T], incoming: Vec<T>) -> Vec<T>
where
    T: Identified + Reconcile,
{
    let by_id: HashMap<&str, &T> = previous.iter().map(|item| (item.id(), item)).collect();
    let mut seen = HashSet::with_capacity(incoming.len());
    let mut merged = Vec::with_capacity(incoming.len());

    for mut item in incoming {
        if !seen.insert(item.id().to_string()) {
            warn!(
                collection = T::COLLECTION,
                id = item.id(),
                "dropping duplicate id in server response"
            );
            continue;
        }
        if let Some(prev) = by_id.get(item.id()) {
            item.reconcile(prev);
        }
        merged.push(item);
    }

    merged
}

/// Position of the item with `id`, if any.
pub fn position_of<T: Identified>(items: &[T], id: &str) -> Option<usize> {
    items.iter().position(|item| item.id() == id)
}
