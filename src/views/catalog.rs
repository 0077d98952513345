use std::collections::BTreeMap;

use tracing::debug;

use crate::cache::SharedCache;
use crate::category::{category_counts, Category};
use crate::collection::{CollectionKey, CollectionStore, FetchOutcome};
use crate::draft::{FormDraft, ProductSubmission};
use crate::error::ClientError;
use crate::http::{ApiClient, ALL_PRODUCTS_ENDPOINT, CATEGORY_ENDPOINT};
use crate::model::Product;
use crate::optimistic::MutationOutcome;
use crate::search::ProductQuery;

/// Home, category, search and submission pages.
///
/// The full product list is read through the shared cache, so the home
/// page, the category overview and search share one request per TTL.
#[derive(Clone)]
pub struct Catalog {
    client: ApiClient,
    cache: SharedCache,
}

impl Catalog {
    /// Uses the client's cache, attaching a fresh one if it has none.
    pub fn new(client: ApiClient) -> Self {
        let cache = client
            .cache()
            .cloned()
            .unwrap_or_else(|| SharedCache::new(client.config().cache_ttl));
        Self {
            client: client.with_cache(cache.clone()),
            cache,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn all_products_key() -> CollectionKey {
        CollectionKey::new(ALL_PRODUCTS_ENDPOINT)
    }

    pub fn category_key(category: Category) -> CollectionKey {
        CollectionKey::new(CATEGORY_ENDPOINT).with_param("name", category.label())
    }

    /// Every product, served from the cache while fresh.
    pub async fn all_products(&self) -> Result<Vec<Product>, ClientError> {
        self.cache
            .fetch_through(&Self::all_products_key(), self.client.all_products())
            .await
    }

    pub async fn load_all(&self, store: &CollectionStore<Product>) -> FetchOutcome {
        store.load(Self::all_products_key(), self.all_products()).await
    }

    /// Products of one category, requested with its canonical label.
    ///
    /// An empty answer is a loaded, empty collection, not an error.
    pub async fn load_category(&self, store: &CollectionStore<Product>, category: Category) -> FetchOutcome {
        let key = Self::category_key(category);
        debug!(%key, "loading category");
        let cache_key = key.clone();
        let loader = self
            .cache
            .fetch_through(&cache_key, self.client.products_by_category(category.label()));
        store.load(key, loader).await
    }

    /// Optimistic +1. The acknowledged count wins; a failure restores the
    /// count the other in-flight upvotes imply.
    pub async fn upvote(&self, store: &CollectionStore<Product>, product_id: &str) -> Result<MutationOutcome, ClientError> {
        store
            .mutate(product_id, Product::upvoted, async {
                self.client.upvote(product_id).await.map(Some)
            })
            .await
    }

    /// Product count of every category that has at least one product.
    pub async fn category_overview(&self) -> Result<BTreeMap<Category, usize>, ClientError> {
        Ok(category_counts(&self.all_products().await?))
    }

    /// Search-as-you-type over the cached product list.
    pub async fn search(&self, term: &str, category: Option<Category>) -> Result<Vec<Product>, ClientError> {
        let query = match category {
            Some(category) => ProductQuery::new(term).in_category(category),
            None => ProductQuery::new(term),
        };
        Ok(query.run(&self.all_products().await?))
    }

    /// Map the wizard draft onto the backend body and submit it.
    pub async fn submit_product(&self, draft: &FormDraft, user_id: Option<String>) -> Result<Product, ClientError> {
        let submission = ProductSubmission::from_draft(draft, user_id)?;
        self.client.create_product(&submission).await
    }
}
