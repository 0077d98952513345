use serde::{Deserialize, Serialize};

use super::{id_string, nullable};
use crate::ViewModel;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ViewModel)]
#[serde(rename_all = "camelCase")]
#[view(collection = "notifications")]
pub struct Notification {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(rename = "type", default, deserialize_with = "nullable")]
    pub kind: String,
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,
    #[serde(default, alias = "description", deserialize_with = "nullable")]
    pub body: String,
    #[serde(default, alias = "time")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub read: bool,
}

impl Notification {
    pub fn new(id: impl Into<String>, kind: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn marked_read(&self) -> Self {
        Self {
            read: true,
            ..self.clone()
        }
    }
}
