use crate::collection::{CollectionKey, CollectionStore};
use crate::error::ClientError;
use crate::model::{Identified, Notification};

/// Notification panel. There is no backend for notifications; everything
/// here is local to the page.
#[derive(Clone, Default)]
pub struct Notifications {
    store: CollectionStore<Notification>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &CollectionStore<Notification> {
        &self.store
    }

    pub fn seed(&self, notifications: Vec<Notification>) -> Result<(), ClientError> {
        self.store
            .replace_items(CollectionKey::new(Notification::COLLECTION), notifications)
    }

    /// Returns false if no notification has `id`.
    pub fn mark_read(&self, id: &str) -> Result<bool, ClientError> {
        self.store.modify(id, |notification| notification.read = true)
    }

    pub fn mark_all_read(&self) -> Result<(), ClientError> {
        self.store.update_items("mark_all_read", |items| {
            for notification in items.iter_mut() {
                notification.read = true;
            }
        })
    }

    pub fn remove(&self, id: &str) -> Result<Option<Notification>, ClientError> {
        self.store.remove(id)
    }

    pub fn unread_count(&self) -> Result<usize, ClientError> {
        Ok(self.store.items()?.iter().filter(|n| !n.read).count())
    }
}
