//! Response envelopes, parsed once at the boundary.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::ClientError;
use crate::model::Message;

/// List responses come back bare or wrapped in `{ "data": [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListBody<T> {
    Bare(Vec<T>),
    Wrapped { data: Vec<T> },
}

impl<T> ListBody<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            ListBody::Bare(items) | ListBody::Wrapped { data: items } => items,
        }
    }
}

/// `GET /api/auth/getMessages`: `{ "messages": [...] }`.
#[derive(Debug, Deserialize)]
pub struct MessagesBody {
    pub messages: Vec<Message>,
}

#[derive(Debug, Deserialize)]
pub struct UploadedImage {
    pub url: String,
}

/// Image host reply: `{ "success": bool, "data": { "url": .. } }`.
#[derive(Debug, Deserialize)]
pub struct ImageUploadBody {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<UploadedImage>,
}

impl ImageUploadBody {
    pub fn into_url(self, endpoint: &str) -> Result<String, ClientError> {
        match self.data {
            Some(image) if self.success && !image.url.is_empty() => Ok(image.url),
            _ => Err(ClientError::Malformed {
                endpoint: endpoint.to_string(),
                detail: "image host did not return a URL".to_string(),
            }),
        }
    }
}

/// Non-2xx bodies carry `{ "message": .. }` or `{ "error": .. }`.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn parse(bytes: &[u8]) -> Self {
        serde_json::from_slice(bytes).unwrap_or_default()
    }

    pub fn text(&self) -> Option<&str> {
        self.message
            .as_deref()
            .or(self.error.as_deref())
            .filter(|text| !text.is_empty())
    }

    /// Comma-joined validation errors of product submission, split apart.
    pub fn validation_messages(&self) -> Vec<String> {
        self.error
            .as_deref()
            .or(self.message.as_deref())
            .map(|text| {
                text.split(", ")
                    .map(str::trim)
                    .filter(|piece| !piece.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Decode a 2xx body, reporting shape violations as `Malformed`.
pub fn decode<T: DeserializeOwned>(endpoint: &str, bytes: &[u8]) -> Result<T, ClientError> {
    serde_json::from_slice(bytes).map_err(|err| ClientError::Malformed {
        endpoint: endpoint.to_string(),
        detail: err.to_string(),
    })
}

/// Like `decode`, but an empty body yields `None`.
pub fn decode_optional<T: DeserializeOwned>(endpoint: &str, bytes: &[u8]) -> Result<Option<T>, ClientError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    decode(endpoint, bytes).map(Some)
}
