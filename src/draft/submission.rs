use serde::{Deserialize, Serialize};

use super::FormDraft;
use crate::error::ClientError;
use crate::model::{PricingTier, Profile};

/// Free-text pricing descriptions, one feature per line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingDraft {
    pub free: String,
    pub pro: String,
}

/// Typed view of the product submission draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProductForm {
    pub name: String,
    pub tagline: String,
    pub description: String,
    pub website_url: String,
    pub category: String,
    pub images: Vec<String>,
    pub video_url: String,
    pub team_members: Vec<String>,
    /// Comma separated.
    pub tech_stack: String,
    pub target_audience: String,
    pub pricing: PricingDraft,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubmittedPricing {
    pub tiers: Vec<PricingTier>,
}

/// Body of `POST /api/products/createProduct`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSubmission {
    pub name: String,
    pub tagline: String,
    pub description: String,
    pub website_url: String,
    pub category: String,
    pub images: Vec<String>,
    pub video_url: String,
    pub team_members: Vec<String>,
    pub tech_stack: Vec<String>,
    pub target_audience: String,
    pub pricing: SubmittedPricing,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

fn split_trimmed(text: &str, separator: char) -> Vec<String> {
    text.split(separator)
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}

impl ProductSubmission {
    pub fn from_form(form: ProductForm, user_id: Option<String>) -> Self {
        let tiers = vec![
            PricingTier {
                tier: "free".to_string(),
                features: split_trimmed(&form.pricing.free, '\n'),
            },
            PricingTier {
                tier: "pro".to_string(),
                features: split_trimmed(&form.pricing.pro, '\n'),
            },
        ];

        Self {
            tech_stack: split_trimmed(&form.tech_stack, ','),
            pricing: SubmittedPricing { tiers },
            name: form.name,
            tagline: form.tagline,
            description: form.description,
            website_url: form.website_url,
            category: form.category,
            images: form.images,
            video_url: form.video_url,
            team_members: form.team_members,
            target_audience: form.target_audience,
            user_id,
        }
    }

    pub fn from_draft(draft: &FormDraft, user_id: Option<String>) -> Result<Self, ClientError> {
        Ok(Self::from_form(draft.decode()?, user_id))
    }
}

/// Body of `PUT /api/auth/profile`. The avatar goes out as `profile_url`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
    pub headline: String,
    pub about: String,
    pub role: String,
    pub current_company: String,
    pub twitter: String,
    pub github: String,
    pub linkedin: String,
    #[serde(rename = "profile_url")]
    pub profile_url: Option<String>,
}

impl ProfileUpdate {
    /// Editor draft pre-filled from the fetched profile.
    pub fn seed(profile: &Profile) -> Result<FormDraft, ClientError> {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        FormDraft::from_record(&ProfileUpdate {
            name: profile.name.clone(),
            email: profile.email.clone(),
            headline: text(&profile.headline),
            about: text(&profile.about),
            role: text(&profile.role),
            current_company: text(&profile.current_company),
            twitter: text(&profile.twitter),
            github: text(&profile.github),
            linkedin: text(&profile.linkedin),
            profile_url: None,
        })
    }

    /// `image_url` is the freshly uploaded avatar, if any.
    pub fn from_draft(draft: &FormDraft, image_url: Option<String>) -> Result<Self, ClientError> {
        let mut update: ProfileUpdate = draft.decode()?;
        update.profile_url = image_url;
        Ok(update)
    }
}

/// Body of `POST /api/auth/messageSubmission`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactSubmission {
    pub fn from_draft(draft: &FormDraft) -> Result<Self, ClientError> {
        draft.decode()
    }
}
