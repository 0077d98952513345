use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Handle for one optimistic mutation, unique within its ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MutationId(u64);

impl fmt::Display for MutationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m{}", self.0)
    }
}

pub(crate) type Transform<T> = Arc<dyn Fn(&T) -> T + Send + Sync>;

/// Server truth applied to the value a confirmed transform produced.
pub type Truth<T> = Box<dyn FnOnce(&T) -> T + Send>;

enum EntryState<T> {
    Pending,
    Confirmed(Option<Truth<T>>),
}

struct Entry<T> {
    id: MutationId,
    transform: Transform<T>,
    state: EntryState<T>,
}

struct Chain<T> {
    base: T,
    entries: Vec<Entry<T>>,
}

impl<T> Chain<T> {
    /// Fold every unsettled transform over the confirmed base.
    fn view(&self) -> T
    where
        T: Clone,
    {
        self.entries
            .iter()
            .fold(self.base.clone(), |value, entry| (entry.transform)(&value))
    }

    /// Fold leading confirmed entries into `base`.
    fn collapse(&mut self) {
        while matches!(
            self.entries.first().map(|e| &e.state),
            Some(EntryState::Confirmed(_))
        ) {
            let entry = self.entries.remove(0);
            let speculative = (entry.transform)(&self.base);
            self.base = match entry.state {
                EntryState::Confirmed(Some(truth)) => truth(&speculative),
                _ => speculative,
            };
        }
    }
}

/// Per-id chains of in-flight optimistic mutations.
///
/// Each chain holds the last confirmed value plus the transforms still waiting
/// on the backend, in issue order. The value shown to the page is always the
/// base with every unsettled transform reapplied, so removing a rejected
/// transform restores exactly the state the other mutations imply.
pub struct MutationLedger<T> {
    chains: HashMap<String, Chain<T>>,
    next_id: u64,
}

impl<T> Default for MutationLedger<T> {
    fn default() -> Self {
        Self {
            chains: HashMap::new(),
            next_id: 0,
        }
    }
}

impl<T: Clone> MutationLedger<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new transform for `key`. `current` seeds the chain when none
    /// is open. Returns the mutation handle and the value to display.
    pub fn begin<F>(&mut self, key: &str, current: &T, transform: F) -> (MutationId, T)
    where
        F: Fn(&T) -> T + Send + Sync + 'static,
    {
        self.next_id += 1;
        let id = MutationId(self.next_id);
        let chain = self
            .chains
            .entry(key.to_string())
            .or_insert_with(|| Chain {
                base: current.clone(),
                entries: Vec::new(),
            });
        chain.entries.push(Entry {
            id,
            transform: Arc::new(transform),
            state: EntryState::Pending,
        });
        (id, chain.view())
    }

    /// Mark `mutation` confirmed, optionally with the server's value.
    ///
    /// Returns the value to display, or `None` when the chain is gone (the item
    /// left the collection during a refresh).
    pub fn confirm(&mut self, key: &str, mutation: MutationId, truth: Option<Truth<T>>) -> Option<T> {
        let chain = self.chains.get_mut(key)?;
        let entry = chain.entries.iter_mut().find(|e| e.id == mutation)?;
        entry.state = EntryState::Confirmed(truth);
        chain.collapse();
        self.settle(key)
    }

    /// Drop `mutation` from its chain (backend rejected it).
    pub fn reject(&mut self, key: &str, mutation: MutationId) -> Option<T> {
        let chain = self.chains.get_mut(key)?;
        let index = chain.entries.iter().position(|e| e.id == mutation)?;
        chain.entries.remove(index);
        chain.collapse();
        self.settle(key)
    }

    /// Replace the base of an open chain with a fresh server value.
    /// Returns the value to display, or `None` if nothing is in flight for `key`.
    pub fn rebase(&mut self, key: &str, fresh: T) -> Option<T> {
        let chain = self.chains.get_mut(key)?;
        chain.base = fresh;
        Some(chain.view())
    }

    /// Last confirmed value of an open chain.
    pub fn base(&self, key: &str) -> Option<&T> {
        self.chains.get(key).map(|chain| &chain.base)
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.chains.retain(|key, _| keep(key));
    }

    pub fn clear(&mut self) {
        self.chains.clear();
    }

    /// Number of unsettled mutations for `key`.
    pub fn pending(&self, key: &str) -> usize {
        self.chains
            .get(key)
            .map(|chain| {
                chain
                    .entries
                    .iter()
                    .filter(|e| matches!(e.state, EntryState::Pending))
                    .count()
            })
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    fn settle(&mut self, key: &str) -> Option<T> {
        let chain = self.chains.get(key)?;
        if chain.entries.is_empty() {
            return self.chains.remove(key).map(|chain| chain.base);
        }
        Some(chain.view())
    }
}
