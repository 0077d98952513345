//! Form drafts: in-memory field values for multi-step forms.
//!
//! A draft is a loose JSON object edited one field at a time. Nothing is
//! saved automatically and nothing persists past the page. When the user
//! submits, the draft is decoded into a typed form and mapped onto the
//! request body the backend expects.
//!
//! ## Example
//!
//! ```ignore
//! use hunt_client::{FormDraft, ProductSubmission};
//!
//! let mut draft = FormDraft::new();
//! draft.set("name", "Lens");
//! draft.set("techStack", "rust, wasm");
//! draft.set_in("pricing", "free", "Unlimited boards\nExport");
//! let body = ProductSubmission::from_draft(&draft, Some("u1".into()))?;
//! ```

mod submission;
mod wizard;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ClientError;

pub use submission::{
    ContactSubmission, PricingDraft, ProductForm, ProductSubmission, ProfileUpdate, SubmittedPricing,
};
pub use wizard::{ProductStep, ProductWizard};

/// Field values of a form being edited.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormDraft {
    fields: Map<String, Value>,
}

impl FormDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shallow merge of one field. Other fields are untouched.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Merge one key inside the nested object `group`, creating it if needed.
    pub fn set_in(&mut self, group: &str, field: impl Into<String>, value: impl Into<Value>) {
        let slot = self
            .fields
            .entry(group.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        if let Value::Object(map) = slot {
            map.insert(field.into(), value.into());
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn get_in(&self, group: &str, field: &str) -> Option<&Value> {
        self.fields.get(group)?.get(field)
    }

    /// String value of `field`, or `""` when missing or not a string.
    pub fn get_str(&self, field: &str) -> &str {
        self.fields.get(field).and_then(Value::as_str).unwrap_or("")
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.remove(field)
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Parse the draft into a typed form. Type mismatches become `Validation`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        serde_json::from_value(Value::Object(self.fields.clone()))
            .map_err(|err| ClientError::Validation(vec![err.to_string()]))
    }

    /// Draft seeded from any serializable record (e.g. a fetched profile).
    pub fn from_record<T: Serialize>(record: &T) -> Result<Self, ClientError> {
        match serde_json::to_value(record) {
            Ok(Value::Object(fields)) => Ok(Self { fields }),
            Ok(_) => Err(ClientError::Validation(vec![
                "form record must serialize to an object".to_string(),
            ])),
            Err(err) => Err(ClientError::Validation(vec![err.to_string()])),
        }
    }
}

impl From<Map<String, Value>> for FormDraft {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}
