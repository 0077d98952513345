//! Canonical product categories and client-side partitioning.
//!
//! Products carry a free-form category string. Anything empty or outside the
//! canonical set is counted under `Miscellaneous`, so every product lands in
//! exactly one category.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::Product;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "AI")]
    Ai,
    Productivity,
    Design,
    Marketing,
    Development,
    Analytics,
    Gaming,
    Miscellaneous,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Ai,
        Category::Productivity,
        Category::Design,
        Category::Marketing,
        Category::Development,
        Category::Analytics,
        Category::Gaming,
        Category::Miscellaneous,
    ];

    /// Label the backend stores and the category endpoint expects.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Ai => "AI",
            Category::Productivity => "Productivity",
            Category::Design => "Design",
            Category::Marketing => "Marketing",
            Category::Development => "Development",
            Category::Analytics => "Analytics",
            Category::Gaming => "Gaming",
            Category::Miscellaneous => "Miscellaneous",
        }
    }

    /// Path segment used in `/category/<slug>` links.
    pub fn slug(&self) -> &'static str {
        match self {
            Category::Ai => "ai",
            Category::Productivity => "productivity",
            Category::Design => "design",
            Category::Marketing => "marketing",
            Category::Development => "development",
            Category::Analytics => "analytics",
            Category::Gaming => "gaming",
            Category::Miscellaneous => "miscellaneous",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(label))
    }

    /// Accepts plain slugs (`design`), navigation slugs (`ai-tools`,
    /// `dev-tools`, `gaming-utilities`) and display labels (`AI Tools`).
    pub fn from_slug(slug: &str) -> Option<Self> {
        let normalized = slug.trim().to_ascii_lowercase().replace(|c: char| c == ' ' || c == '_', "-");
        let base = normalized
            .strip_suffix("-tools")
            .or_else(|| normalized.strip_suffix("-utilities"))
            .unwrap_or(&normalized);
        match base {
            "developer" | "dev" => Some(Category::Development),
            "misc" => Some(Category::Miscellaneous),
            other => Self::ALL.into_iter().find(|category| category.slug() == other),
        }
    }

    /// Category a product is listed under.
    pub fn of(product: &Product) -> Self {
        product
            .category
            .as_deref()
            .and_then(Self::from_label)
            .unwrap_or(Category::Miscellaneous)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Products listed under `category`, in their original order.
pub fn filter_by_category(products: &[Product], category: Category) -> Vec<Product> {
    products
        .iter()
        .filter(|product| Category::of(product) == category)
        .cloned()
        .collect()
}

/// Every product in exactly one bucket; every category present, possibly empty.
pub fn partition_by_category(products: &[Product]) -> BTreeMap<Category, Vec<Product>> {
    let mut buckets: BTreeMap<Category, Vec<Product>> =
        Category::ALL.into_iter().map(|c| (c, Vec::new())).collect();
    for product in products {
        buckets
            .entry(Category::of(product))
            .or_default()
            .push(product.clone());
    }
    buckets
}

pub fn category_counts(products: &[Product]) -> BTreeMap<Category, usize> {
    let mut counts: BTreeMap<Category, usize> =
        Category::ALL.into_iter().map(|c| (c, 0)).collect();
    for product in products {
        *counts.entry(Category::of(product)).or_default() += 1;
    }
    counts
}
