//! Authenticated session shared by every page.
//!
//! The session lives in a key/value storage (`token`, `userId`, `email`,
//! `name`) and in memory. `SessionContext` is built once at start-up and handed
//! to the pages that need it; login and logout update storage and memory
//! together and notify registered listeners.
//!
//! ## Example
//!
//! ```ignore
//! use hunt_client::{InMemorySessionStorage, SessionChange, SessionContext};
//!
//! let session = SessionContext::load(Arc::new(InMemorySessionStorage::new()))?;
//! session.on_change(|change| match change {
//!     SessionChange::Started { user_id } => println!("signed in as {user_id}"),
//!     SessionChange::Ended { .. } => println!("signed out"),
//! })?;
//! session.establish(&client.login(&credentials).await?)?;
//! ```

mod gate;

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

#[cfg(feature = "emitter")]
use std::sync::{Mutex, MutexGuard};

#[cfg(feature = "emitter")]
use event_emitter_rs::EventEmitter;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ClientError;
use crate::model::AuthResponse;

pub use gate::{guard_route, is_admin_route, AdminGate, GateDecision, ADMIN_PREFIX};

pub const TOKEN_KEY: &str = "token";
pub const USER_ID_KEY: &str = "userId";
pub const EMAIL_KEY: &str = "email";
pub const NAME_KEY: &str = "name";

pub const SESSION_STARTED: &str = "SessionStarted";
pub const SESSION_ENDED: &str = "SessionEnded";

/// Who is signed in, as far as the client knows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub user_id: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    /// Last known admin flag from the profile endpoint. Never persisted.
    pub is_admin: Option<bool>,
}

impl Session {
    pub fn from_storage(storage: &dyn SessionStorage) -> Result<Self, ClientError> {
        Ok(Self {
            token: storage.get(TOKEN_KEY)?,
            user_id: storage.get(USER_ID_KEY)?,
            email: storage.get(EMAIL_KEY)?,
            name: storage.get(NAME_KEY)?,
            is_admin: None,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|token| !token.is_empty())
    }
}

/// Synchronous key/value storage that outlives a page (browser local storage).
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, ClientError>;
    fn set(&self, key: &str, value: &str) -> Result<(), ClientError>;
    fn remove(&self, key: &str) -> Result<(), ClientError>;
}

/// Process-local `SessionStorage`. Clones share entries.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStorage {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for InMemorySessionStorage {
    fn get(&self, key: &str) -> Result<Option<String>, ClientError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| ClientError::LockPoisoned("session storage read"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ClientError> {
        self.entries
            .write()
            .map_err(|_| ClientError::LockPoisoned("session storage write"))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), ClientError> {
        self.entries
            .write()
            .map_err(|_| ClientError::LockPoisoned("session storage write"))?
            .remove(key);
        Ok(())
    }
}

/// Payload delivered to `on_change` listeners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionChange {
    Started { user_id: String },
    Ended { user_id: Option<String> },
}

/// The shared session handle. Clones observe the same session.
#[derive(Clone)]
pub struct SessionContext {
    storage: Arc<dyn SessionStorage>,
    current: Arc<RwLock<Session>>,
    #[cfg(feature = "emitter")]
    events: Arc<Mutex<EventEmitter>>,
}

impl SessionContext {
    /// Restore whatever session the storage holds.
    pub fn load(storage: Arc<dyn SessionStorage>) -> Result<Self, ClientError> {
        let session = Session::from_storage(storage.as_ref())?;
        Ok(Self {
            storage,
            current: Arc::new(RwLock::new(session)),
            #[cfg(feature = "emitter")]
            events: Arc::new(Mutex::new(EventEmitter::new())),
        })
    }

    pub fn current(&self) -> Result<Session, ClientError> {
        self.current
            .read()
            .map(|session| session.clone())
            .map_err(|_| ClientError::LockPoisoned("session read"))
    }

    pub fn token(&self) -> Result<Option<String>, ClientError> {
        Ok(self.current()?.token)
    }

    pub fn user_id(&self) -> Result<Option<String>, ClientError> {
        Ok(self.current()?.user_id)
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Session>, ClientError> {
        self.current
            .write()
            .map_err(|_| ClientError::LockPoisoned("session write"))
    }

    /// Persist a successful login or signup and notify listeners.
    pub fn establish(&self, auth: &AuthResponse) -> Result<Session, ClientError> {
        self.storage.set(TOKEN_KEY, &auth.token)?;
        self.storage.set(USER_ID_KEY, &auth.id)?;
        self.storage.set(EMAIL_KEY, &auth.email)?;
        self.storage.set(NAME_KEY, &auth.name)?;

        let session = Session {
            token: Some(auth.token.clone()),
            user_id: Some(auth.id.clone()),
            email: Some(auth.email.clone()),
            name: Some(auth.name.clone()),
            is_admin: None,
        };
        *self.write()? = session.clone();
        info!(user_id = %auth.id, "session started");

        self.notify(SESSION_STARTED, SessionChange::Started {
            user_id: auth.id.clone(),
        })?;
        Ok(session)
    }

    /// Cache the admin flag reported by the profile endpoint.
    pub fn set_admin(&self, is_admin: bool) -> Result<(), ClientError> {
        self.write()?.is_admin = Some(is_admin);
        Ok(())
    }

    /// Clear storage and memory together, then notify listeners.
    pub fn logout(&self) -> Result<(), ClientError> {
        for key in [TOKEN_KEY, USER_ID_KEY, EMAIL_KEY, NAME_KEY] {
            self.storage.remove(key)?;
        }
        let previous = std::mem::take(&mut *self.write()?);
        info!(user_id = ?previous.user_id, "session ended");

        self.notify(SESSION_ENDED, SessionChange::Ended {
            user_id: previous.user_id,
        })
    }

    #[cfg(feature = "emitter")]
    fn events(&self) -> Result<MutexGuard<'_, EventEmitter>, ClientError> {
        self.events
            .lock()
            .map_err(|_| ClientError::LockPoisoned("session events"))
    }

    /// Register a listener for session start and end. Listeners run off the
    /// caller's thread. Returns the listener ids.
    #[cfg(feature = "emitter")]
    pub fn on_change<F>(&self, listener: F) -> Result<Vec<String>, ClientError>
    where
        F: Fn(SessionChange) + Send + Sync + 'static,
    {
        let listener = Arc::new(listener);
        let on_start = Arc::clone(&listener);
        let mut events = self.events()?;
        let started = events.on(SESSION_STARTED, move |change: SessionChange| on_start(change));
        let ended = events.on(SESSION_ENDED, move |change: SessionChange| listener(change));
        Ok(vec![started, ended])
    }

    #[cfg(feature = "emitter")]
    pub fn remove_listener(&self, id: &str) -> Result<bool, ClientError> {
        Ok(self.events()?.remove_listener(id).is_some())
    }

    #[cfg(feature = "emitter")]
    fn notify(&self, event: &str, change: SessionChange) -> Result<(), ClientError> {
        self.events()?.emit(event, change);
        Ok(())
    }

    #[cfg(not(feature = "emitter"))]
    fn notify(&self, _event: &str, _change: SessionChange) -> Result<(), ClientError> {
        Ok(())
    }
}
