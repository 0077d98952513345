//! Product service: products, comments, reports, newsletter.

use reqwest::Method;
use serde::Serialize;
use tracing::info;

use super::envelope::{self, ListBody};
use super::{ApiClient, Service};
use crate::draft::ProductSubmission;
use crate::error::ClientError;
use crate::model::{
    ApprovalAck, Comment, LikeState, NewComment, NewReport, Product, Report, ReportResolution,
    ReportStatus, Subscription, UpvoteAck,
};

pub(crate) const PRODUCTS_ENDPOINT: &str = "/api/products";
pub const ALL_PRODUCTS_ENDPOINT: &str = "/api/products/getAllProducts/all";
pub const CATEGORY_ENDPOINT: &str = "/api/products/category";
pub const REPORTS_ENDPOINT: &str = "/api/reports";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApprovalBody {
    is_approved: bool,
}

impl ApiClient {
    /// `GET /api/products/getAllProducts/all`
    pub async fn all_products(&self) -> Result<Vec<Product>, ClientError> {
        let url = self.url(Service::Products, &["api", "products", "getAllProducts", "all"])?;
        let body: ListBody<Product> = self
            .fetch(ALL_PRODUCTS_ENDPOINT, self.request(Method::GET, url))
            .await?;
        Ok(body.into_items())
    }

    /// `GET /api/products/category/:name`, with the canonical label as `name`.
    pub async fn products_by_category(&self, label: &str) -> Result<Vec<Product>, ClientError> {
        let url = self.url(Service::Products, &["api", "products", "category", label])?;
        let body: ListBody<Product> = self
            .fetch(CATEGORY_ENDPOINT, self.request(Method::GET, url))
            .await?;
        Ok(body.into_items())
    }

    /// `GET /api/products/:name`
    pub async fn product(&self, name: &str) -> Result<Product, ClientError> {
        let url = self.url(Service::Products, &["api", "products", name])?;
        self.fetch(PRODUCTS_ENDPOINT, self.request(Method::GET, url))
            .await
    }

    /// `POST /api/products/createProduct`
    ///
    /// The backend rejects invalid submissions with `{ "error": "a, b" }`;
    /// that becomes `Validation(["a", "b"])`.
    pub async fn create_product(&self, submission: &ProductSubmission) -> Result<Product, ClientError> {
        let endpoint = "/api/products/createProduct";
        let url = self.url(Service::Products, &["api", "products", "createProduct"])?;
        let response = self
            .request(Method::POST, url)
            .json(submission)
            .send()
            .await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let messages = envelope::ErrorBody::parse(&body).validation_messages();
            if status.is_client_error() && !messages.is_empty() {
                return Err(ClientError::Validation(messages));
            }
            return Err(ClientError::from_status(
                status.as_u16(),
                messages.join(", "),
            ));
        }

        let product: Option<Product> = envelope::decode_optional(endpoint, &body)?;
        self.invalidate_products();
        let product = product.unwrap_or_else(|| Product {
            user_id: submission.user_id.clone(),
            category: Some(submission.category.clone()),
            ..Product::new(String::new(), submission.name.clone())
        });
        info!(name = %product.name, "product submitted");
        Ok(product)
    }

    /// `PATCH /api/products/approve/:id` with `{isApproved}`.
    pub async fn set_approval(&self, product_id: &str, is_approved: bool) -> Result<ApprovalAck, ClientError> {
        let endpoint = "/api/products/approve";
        let url = self.url(Service::Products, &["api", "products", "approve", product_id])?;
        let body = self
            .send(
                endpoint,
                self.request(Method::PATCH, url)
                    .json(&ApprovalBody { is_approved }),
            )
            .await?;
        self.invalidate_products();
        Ok(envelope::decode_optional::<ApprovalAck>(endpoint, &body)?.unwrap_or(ApprovalAck {
            is_approved: Some(is_approved),
        }))
    }

    /// `POST /api/products/upvote/:id`. An empty reply is a bare acknowledgement.
    pub async fn upvote(&self, product_id: &str) -> Result<UpvoteAck, ClientError> {
        let endpoint = "/api/products/upvote";
        let url = self.url(Service::Products, &["api", "products", "upvote", product_id])?;
        let body = self
            .send(endpoint, self.request(Method::POST, url))
            .await?;
        self.invalidate_products();
        Ok(envelope::decode_optional(endpoint, &body)?.unwrap_or_default())
    }

    /// `GET /api/products/:id/comments`
    pub async fn comments(&self, product_id: &str) -> Result<Vec<Comment>, ClientError> {
        let url = self.url(Service::Products, &["api", "products", product_id, "comments"])?;
        let body: ListBody<Comment> = self
            .fetch("/api/products/comments", self.request(Method::GET, url))
            .await?;
        Ok(body.into_items())
    }

    /// `POST /api/products/:id/comments`
    pub async fn add_comment(&self, product_id: &str, comment: &NewComment) -> Result<Comment, ClientError> {
        let url = self.url(Service::Products, &["api", "products", product_id, "comments"])?;
        self.fetch(
            "/api/products/comments",
            self.request(Method::POST, url).json(comment),
        )
        .await
    }

    /// `POST /api/comments/:id/replies`
    pub async fn add_reply(&self, comment_id: &str, reply: &NewComment) -> Result<Comment, ClientError> {
        let url = self.url(Service::Products, &["api", "comments", comment_id, "replies"])?;
        self.fetch(
            "/api/comments/replies",
            self.request(Method::POST, url).json(reply),
        )
        .await
    }

    /// `POST /api/comments/:id/like`, answered with `{likes, isLiked}`.
    pub async fn toggle_like(&self, comment_id: &str) -> Result<LikeState, ClientError> {
        let url = self.url(Service::Products, &["api", "comments", comment_id, "like"])?;
        self.fetch("/api/comments/like", self.request(Method::POST, url))
            .await
    }

    /// `GET /api/reports[?type=]`; the filter is sent upper-cased.
    pub async fn reports(&self, report_type: Option<&str>) -> Result<Vec<Report>, ClientError> {
        let url = self.url(Service::Products, &["api", "reports"])?;
        let mut request = self.request(Method::GET, url);
        if let Some(kind) = report_type.map(str::trim).filter(|kind| !kind.is_empty()) {
            request = request.query(&[("type", kind.to_ascii_uppercase())]);
        }
        let body: ListBody<Report> = self.fetch(REPORTS_ENDPOINT, request).await?;
        Ok(body.into_items())
    }

    /// `POST /api/reports`
    pub async fn submit_report(&self, report: &NewReport) -> Result<(), ClientError> {
        let url = self.url(Service::Products, &["api", "reports"])?;
        self.send(REPORTS_ENDPOINT, self.request(Method::POST, url).json(report))
            .await
            .map(drop)
    }

    /// `PUT /api/reports/:id` with `{status, resolvedById}`.
    pub async fn resolve_report(
        &self,
        report_id: &str,
        status: ReportStatus,
        resolved_by_id: Option<String>,
    ) -> Result<(), ClientError> {
        let url = self.url(Service::Products, &["api", "reports", report_id])?;
        let body = ReportResolution {
            status,
            resolved_by_id,
        };
        self.send(REPORTS_ENDPOINT, self.request(Method::PUT, url).json(&body))
            .await
            .map(drop)
    }

    /// `POST /api/misc/subscribe` with `{email}`.
    pub async fn subscribe(&self, email: &str) -> Result<(), ClientError> {
        let url = self.url(Service::Products, &["api", "misc", "subscribe"])?;
        let body = Subscription {
            email: email.to_string(),
        };
        self.send("/api/misc/subscribe", self.request(Method::POST, url).json(&body))
            .await
            .map(drop)
    }
}
