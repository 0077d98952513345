use tracing::info;

use crate::collection::{CollectionKey, CollectionStore, FetchOutcome};
use crate::error::ClientError;
use crate::http::{ApiClient, ALL_PRODUCTS_ENDPOINT, REPORTS_ENDPOINT};
use crate::model::{Message, Product, Report, ReportStatus, User};
use crate::optimistic::MutationOutcome;

pub const MESSAGES_ENDPOINT: &str = "/api/auth/getMessages";
pub const USERS_ENDPOINT: &str = "/api/auth/getAllUsers";

/// Admin console: approval queue, reports, contact messages, users.
///
/// Callers are expected to have passed the admin gate first.
#[derive(Clone)]
pub struct Moderation {
    client: ApiClient,
}

impl Moderation {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn pending_key() -> CollectionKey {
        CollectionKey::new(ALL_PRODUCTS_ENDPOINT).with_param("isApproved", "false")
    }

    pub fn reports_key(report_type: Option<&str>) -> CollectionKey {
        let key = CollectionKey::new(REPORTS_ENDPOINT);
        match report_type.map(str::trim).filter(|kind| !kind.is_empty()) {
            Some(kind) => key.with_param("type", kind.to_ascii_uppercase()),
            None => key,
        }
    }

    /// Products awaiting approval. Always fetched fresh, never from the cache.
    pub async fn load_pending(&self, store: &CollectionStore<Product>) -> FetchOutcome {
        let loader = async {
            let products = self.client.all_products().await?;
            Ok::<Vec<Product>, ClientError>(products.into_iter().filter(|p| !p.is_approved).collect())
        };
        store.load(Self::pending_key(), loader).await
    }

    /// Flip approval at once; rolled back if the backend refuses.
    pub async fn set_approval(
        &self,
        store: &CollectionStore<Product>,
        product_id: &str,
        is_approved: bool,
    ) -> Result<MutationOutcome, ClientError> {
        store
            .mutate(
                product_id,
                move |product: &Product| Product {
                    is_approved,
                    ..product.clone()
                },
                async { self.client.set_approval(product_id, is_approved).await.map(Some) },
            )
            .await
    }

    pub async fn load_reports(&self, store: &CollectionStore<Report>, report_type: Option<&str>) -> FetchOutcome {
        store
            .load(Self::reports_key(report_type), self.client.reports(report_type))
            .await
    }

    /// Resolve a report, then refetch the list with the filter it was loaded with.
    pub async fn resolve(
        &self,
        store: &CollectionStore<Report>,
        report_id: &str,
        status: ReportStatus,
        resolved_by_id: Option<String>,
    ) -> Result<FetchOutcome, ClientError> {
        self.client
            .resolve_report(report_id, status.clone(), resolved_by_id)
            .await?;
        info!(report = report_id, status = status.as_str(), "report resolved");

        let filter = store
            .snapshot()?
            .key()
            .and_then(|key| key.param("type"))
            .map(str::to_string);
        Ok(self.load_reports(store, filter.as_deref()).await)
    }

    pub async fn load_messages(&self, store: &CollectionStore<Message>) -> FetchOutcome {
        store
            .load(CollectionKey::new(MESSAGES_ENDPOINT), self.client.messages())
            .await
    }

    /// Mark the message responded now; the backend's copy replaces it.
    pub async fn reply(
        &self,
        store: &CollectionStore<Message>,
        message_id: &str,
        response: &str,
    ) -> Result<MutationOutcome, ClientError> {
        let text = response.to_string();
        store
            .mutate(
                message_id,
                move |message: &Message| message.answered(&text),
                async { self.client.reply_message(message_id, response).await.map(Some) },
            )
            .await
    }

    pub async fn load_users(&self, store: &CollectionStore<User>) -> FetchOutcome {
        store
            .load(CollectionKey::new(USERS_ENDPOINT), self.client.all_users())
            .await
    }
}
