//! Error taxonomy for every call that crosses the network boundary or
//! touches a view model.

use thiserror::Error;

/// Error type for client operations.
///
/// Cloneable so the same failure can be kept in view state (as the inline
/// banner text) and returned to the caller that triggered it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The request never produced a response (connect failure, timeout, aborted body).
    #[error("network error: {0}")]
    Transport(String),

    /// The backend answered with a non-2xx status.
    #[error("request failed ({status}): {message}")]
    Api { status: u16, message: String },

    /// Product submission rejected with one or more validation messages.
    #[error("validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    /// The response body did not have the shape expected for this endpoint.
    #[error("malformed response from {endpoint}: {detail}")]
    Malformed { endpoint: String, detail: String },

    /// Missing session token, or the backend refused the credentials.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The targeted entity is not in the view model.
    #[error("not found: {0}")]
    NotFound(String),

    /// A reply targeted an id that is not a top-level comment.
    #[error("parent comment not found: {0}")]
    ParentNotFound(String),

    /// Configuration is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// An internal lock was poisoned by a panicking holder.
    #[error("lock poisoned during {0}")]
    LockPoisoned(&'static str),
}

impl ClientError {
    /// Build an `Api` error, promoting 401/403 to `Unauthorized`.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => ClientError::Unauthorized(message),
            404 => ClientError::NotFound(message),
            _ => ClientError::Api { status, message },
        }
    }

    /// Text shown to the user in a toast or inline banner.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Transport(_) => {
                "Could not reach the server. Check your connection and try again.".to_string()
            }
            ClientError::Api { message, .. } if !message.is_empty() => message.clone(),
            ClientError::Api { status, .. } => format!("Request failed with status {}", status),
            ClientError::Validation(messages) => messages.join("\n"),
            ClientError::Malformed { .. } => "Invalid data format received from API".to_string(),
            ClientError::Unauthorized(_) => "Please sign in to continue.".to_string(),
            ClientError::NotFound(what) => format!("{} was not found", what),
            ClientError::ParentNotFound(_) => "You can only reply to a top-level comment.".to_string(),
            ClientError::Config(message) => message.clone(),
            ClientError::LockPoisoned(_) => "Something went wrong. Please reload.".to_string(),
        }
    }

    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ClientError::Transport(_) => true,
            ClientError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return ClientError::from_status(status.as_u16(), err.to_string());
        }
        ClientError::Transport(err.to_string())
    }
}
