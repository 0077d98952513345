use serde::{Deserialize, Deserializer, Serialize};

use super::{id_string, nullable, opt_id_string};
use crate::optimistic::Authoritative;
use crate::ViewModel;

pub const PLACEHOLDER_IMAGE: &str = "/api/placeholder/400/300";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductImage {
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingTier {
    pub tier: String,
    #[serde(default, deserialize_with = "nullable")]
    pub features: Vec<String>,
}

/// A listed product.
///
/// `is_upvoted` never comes from the backend; it records that this client
/// upvoted the product during the current page lifetime.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ViewModel)]
#[serde(rename_all = "camelCase")]
#[view(collection = "products")]
pub struct Product {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub tagline: String,
    #[serde(default, deserialize_with = "nullable")]
    pub description: String,
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub images: Vec<ProductImage>,
    #[serde(default, deserialize_with = "nullable")]
    pub tech_stack: Vec<String>,
    #[serde(default, deserialize_with = "pricing_tiers")]
    pub pricing: Vec<PricingTier>,
    #[serde(default, deserialize_with = "nullable")]
    pub upvotes: u32,
    #[serde(default, deserialize_with = "nullable")]
    pub is_approved: bool,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(skip)]
    #[view(local)]
    pub is_upvoted: bool,
}

impl Product {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_upvotes(mut self, upvotes: u32) -> Self {
        self.upvotes = upvotes;
        self
    }

    /// First screenshot, or the placeholder shown on cards.
    pub fn image_url(&self) -> &str {
        self.images
            .first()
            .map(|image| image.url.as_str())
            .unwrap_or(PLACEHOLDER_IMAGE)
    }

    /// Speculative upvote applied before the backend confirms.
    pub fn upvoted(&self) -> Self {
        Self {
            upvotes: self.upvotes.saturating_add(1),
            is_upvoted: true,
            ..self.clone()
        }
    }
}

/// Pricing arrives as `{ "tiers": [...] }`, a bare list, or null.
fn pricing_tiers<'de, D>(deserializer: D) -> Result<Vec<PricingTier>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PricingBody {
        Wrapped {
            #[serde(default)]
            tiers: Vec<PricingTier>,
        },
        Bare(Vec<PricingTier>),
    }

    Ok(match Option::<PricingBody>::deserialize(deserializer)? {
        Some(PricingBody::Wrapped { tiers }) | Some(PricingBody::Bare(tiers)) => tiers,
        None => Vec::new(),
    })
}

/// Upvote acknowledgement: `{ "id": .., "upvotes": n }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UpvoteAck {
    #[serde(default, deserialize_with = "opt_id_string")]
    pub id: Option<String>,
    #[serde(default)]
    pub upvotes: Option<u32>,
}

impl Authoritative<Product> for UpvoteAck {
    fn apply_to(self, current: &Product) -> Product {
        match self.upvotes {
            Some(upvotes) => Product {
                upvotes,
                ..current.clone()
            },
            None => current.clone(),
        }
    }
}

/// Moderation acknowledgement: `{ "isApproved": bool }` or any object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalAck {
    #[serde(default)]
    pub is_approved: Option<bool>,
}

impl Authoritative<Product> for ApprovalAck {
    fn apply_to(self, current: &Product) -> Product {
        match self.is_approved {
            Some(is_approved) => Product {
                is_approved,
                ..current.clone()
            },
            None => current.clone(),
        }
    }
}
