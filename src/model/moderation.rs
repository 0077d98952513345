//! Report queue and contact-message entities used by the admin console.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{id_string, nullable, opt_id_string, ProductImage};
use crate::ViewModel;

/// Report lifecycle. The backend is inconsistent about case, so parsing is
/// case-insensitive and unknown values are kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ReportStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Resolved,
    Other(String),
}

impl ReportStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "PENDING" => ReportStatus::Pending,
            "APPROVED" => ReportStatus::Approved,
            "REJECTED" => ReportStatus::Rejected,
            "RESOLVED" => ReportStatus::Resolved,
            _ => ReportStatus::Other(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ReportStatus::Pending => "PENDING",
            ReportStatus::Approved => "APPROVED",
            ReportStatus::Rejected => "REJECTED",
            ReportStatus::Resolved => "RESOLVED",
            ReportStatus::Other(raw) => raw,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, ReportStatus::Pending)
    }
}

impl Serialize for ReportStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ReportStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.map(|s| ReportStatus::parse(&s)).unwrap_or_default())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportedProduct {
    #[serde(default, deserialize_with = "opt_id_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub images: Vec<ProductImage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ViewModel)]
#[serde(rename_all = "camelCase")]
#[view(collection = "reports")]
pub struct Report {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(rename = "type", default, deserialize_with = "nullable")]
    pub report_type: String,
    #[serde(default, deserialize_with = "nullable")]
    pub reason: String,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub status: ReportStatus,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub product_id: Option<String>,
    #[serde(default)]
    pub product: Option<ReportedProduct>,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub resolved_by_id: Option<String>,
}

impl Report {
    /// Case-insensitive substring match used by the admin search box.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        let product_name = self.product.as_ref().map(|p| p.name.as_str()).unwrap_or("");
        [product_name, self.reason.as_str(), self.details.as_deref().unwrap_or("")]
            .iter()
            .any(|field| field.to_lowercase().contains(&term))
    }
}

/// Body of `POST /api/reports`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReport {
    #[serde(rename = "type")]
    pub report_type: String,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl NewReport {
    /// A product report. Free-text details are only sent for the "other" reason.
    pub fn product(product_id: impl Into<String>, reason: impl Into<String>, details: Option<String>) -> Self {
        let reason = reason.into();
        let details = if reason == "other" { details } else { None };
        Self {
            report_type: "PRODUCT".to_string(),
            reason,
            details,
            product_id: Some(product_id.into()),
            user_id: None,
        }
    }
}

/// Body of `PUT /api/reports/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResolution {
    pub status: ReportStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_by_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MessageStatus {
    #[default]
    Pending,
    Responded,
    Other(String),
}

impl MessageStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "PENDING" => MessageStatus::Pending,
            "RESPONDED" => MessageStatus::Responded,
            _ => MessageStatus::Other(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            MessageStatus::Pending => "PENDING",
            MessageStatus::Responded => "RESPONDED",
            MessageStatus::Other(raw) => raw,
        }
    }
}

impl Serialize for MessageStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MessageStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.map(|s| MessageStatus::parse(&s)).unwrap_or_default())
    }
}

/// A contact-form message awaiting an admin response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ViewModel)]
#[serde(rename_all = "camelCase")]
#[view(collection = "messages")]
pub struct Message {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub email: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub message: String,
    #[serde(default)]
    pub status: MessageStatus,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Message {
    /// Speculative state after an admin reply is sent.
    pub fn answered(&self, response: &str) -> Self {
        Self {
            status: MessageStatus::Responded,
            response: Some(response.to_string()),
            ..self.clone()
        }
    }
}

/// Body of `POST /api/auth/replyMessage/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageReply {
    pub response: String,
}
