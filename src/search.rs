//! Search-as-you-type over already fetched collections. No request per keystroke.

use crate::category::Category;
use crate::model::{Product, User};

/// Case-insensitive product query with an optional category filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    pub term: String,
    pub category: Option<Category>,
}

impl ProductQuery {
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            category: None,
        }
    }

    pub fn in_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Category from a filter chip label; `"All"` (or anything unknown) clears it.
    pub fn with_category_label(mut self, label: &str) -> Self {
        self.category = Category::from_label(label);
        self
    }

    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = self.category {
            if Category::of(product) != category {
                return false;
            }
        }

        let term = self.term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        let hit = |text: &str| text.to_lowercase().contains(&term);
        hit(&product.name)
            || hit(&product.tagline)
            || hit(&product.description)
            || product.tech_stack.iter().any(|tech| hit(tech))
    }

    pub fn run(&self, products: &[Product]) -> Vec<Product> {
        products
            .iter()
            .filter(|product| self.matches(product))
            .cloned()
            .collect()
    }
}

/// Collaborator lookup by name or email. An empty term matches nobody.
pub fn search_users(users: &[User], term: &str) -> Vec<User> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return Vec::new();
    }
    users
        .iter()
        .filter(|user| {
            user.name.to_lowercase().contains(&term) || user.email.to_lowercase().contains(&term)
        })
        .cloned()
        .collect()
}
