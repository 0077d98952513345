use serde::{Deserialize, Serialize};

use super::{id_string, nullable};
use crate::ViewModel;

/// Entry of `GET /api/auth/getAllUsers`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ViewModel)]
#[serde(rename_all = "camelCase")]
#[view(collection = "users")]
pub struct User {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub email: String,
    #[serde(default, deserialize_with = "nullable")]
    pub is_admin: bool,
}

/// `GET /api/auth/profile?userId=`. Social links come back with `_url` suffixes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ViewModel)]
#[serde(rename_all = "camelCase")]
#[view(collection = "profiles")]
pub struct Profile {
    #[serde(default, deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub email: String,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub about: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub current_company: Option<String>,
    #[serde(default, alias = "twitter_url")]
    pub twitter: Option<String>,
    #[serde(default, alias = "github_url")]
    pub github: Option<String>,
    #[serde(default, alias = "linkedin_url")]
    pub linkedin: Option<String>,
    #[serde(default, alias = "profile_url", alias = "profile_image_url")]
    pub profile_image_url: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub is_admin: bool,
}

/// Body of `POST /api/auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Body of `POST /api/auth/signup`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Body of `POST /api/auth/send-otp` (no code) and `/verify-otp` (with code).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OtpRequest {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otp: Option<String>,
}

/// Body of `POST /api/misc/subscribe`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subscription {
    pub email: String,
}

/// Successful login or signup: `{ token, id, name, email }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub email: String,
}
