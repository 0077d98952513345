use tracing::{debug, info};

use crate::collection::{CollectionKey, CollectionStore, FetchOutcome};
use crate::comments::CommentThread;
use crate::error::ClientError;
use crate::http::ApiClient;
use crate::model::{Author, Comment, NewComment, NewReport, Product};
use crate::optimistic::MutationOutcome;
use crate::session::SessionContext;

/// Product detail page: the product, its comment thread, upvote and report.
#[derive(Clone)]
pub struct Discussion {
    client: ApiClient,
    session: SessionContext,
    product: CollectionStore<Product>,
    thread: CommentThread,
}

impl Discussion {
    pub fn new(client: ApiClient, session: SessionContext) -> Self {
        Self {
            client,
            session,
            product: CollectionStore::new(),
            thread: CommentThread::new(),
        }
    }

    pub fn thread(&self) -> &CommentThread {
        &self.thread
    }

    /// The product currently open, if it loaded.
    pub fn product(&self) -> Result<Option<Product>, ClientError> {
        Ok(self.product.items()?.first().cloned())
    }

    fn product_id(&self) -> Result<String, ClientError> {
        self.product()?
            .map(|product| product.id)
            .ok_or_else(|| ClientError::NotFound("product".to_string()))
    }

    /// Load the product named `name`, then its comments.
    ///
    /// Returns `None` when a later `open` superseded this one or the page was
    /// torn down. A failed comment fetch is left in the thread's view state.
    pub async fn open(&self, name: &str) -> Result<Option<Product>, ClientError> {
        let key = CollectionKey::new("/api/products").with_param("name", name);
        let loader = async { self.client.product(name).await.map(|product| vec![product]) };
        match self.product.load(key, loader).await {
            FetchOutcome::Loaded(_) => {}
            FetchOutcome::Failed(err) => return Err(err),
            FetchOutcome::Stale | FetchOutcome::Cancelled => return Ok(None),
        }

        let Some(product) = self.product()? else {
            return Ok(None);
        };
        let outcome = self
            .thread
            .load(&product.id, self.client.comments(&product.id))
            .await;
        debug!(product = %product.id, ?outcome, "comments loaded");
        Ok(Some(product))
    }

    pub async fn upvote(&self) -> Result<MutationOutcome, ClientError> {
        let product_id = self.product_id()?;
        self.product
            .mutate(&product_id, Product::upvoted, async {
                self.client.upvote(&product_id).await.map(Some)
            })
            .await
    }

    /// The signed-in user as a comment author; commenting requires a session.
    fn author(&self) -> Result<Author, ClientError> {
        let session = self.session.current()?;
        match session.user_id {
            Some(id) if session.token.is_some() => Ok(Author {
                id: Some(id),
                name: session.name.unwrap_or_default(),
                avatar_url: None,
            }),
            _ => Err(ClientError::Unauthorized("sign in to comment".to_string())),
        }
    }

    fn body(content: &str, author: &Author) -> Result<NewComment, ClientError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(ClientError::Validation(vec!["Comment cannot be empty".to_string()]));
        }
        Ok(NewComment {
            content: content.to_string(),
            user_id: author.id.clone(),
        })
    }

    pub async fn comment(&self, content: &str) -> Result<Comment, ClientError> {
        let author = self.author()?;
        let body = Self::body(content, &author)?;
        let product_id = self.product_id()?;
        self.thread
            .add_comment(body.content.clone(), Some(author), self.client.add_comment(&product_id, &body))
            .await
    }

    pub async fn reply(&self, parent_id: &str, content: &str) -> Result<Comment, ClientError> {
        let author = self.author()?;
        let body = Self::body(content, &author)?;
        self.thread
            .add_reply(parent_id, body.content.clone(), Some(author), self.client.add_reply(parent_id, &body))
            .await
    }

    pub async fn like(&self, comment_id: &str) -> Result<MutationOutcome, ClientError> {
        self.author()?;
        self.thread
            .toggle_like(comment_id, self.client.toggle_like(comment_id))
            .await
    }

    /// Report the open product. `details` is only sent for the "other" reason.
    pub async fn report(&self, reason: &str, details: Option<String>) -> Result<(), ClientError> {
        let author = self.author()?;
        let product_id = self.product_id()?;
        let report = NewReport {
            user_id: author.id,
            ..NewReport::product(product_id.clone(), reason, details)
        };
        self.client.submit_report(&report).await?;
        info!(product = %product_id, reason, "product reported");
        Ok(())
    }

    /// Tear the page down; in-flight loads are dropped and late answers ignored.
    pub fn close(&self) {
        self.product.cancel();
        self.thread.cancel();
    }
}
