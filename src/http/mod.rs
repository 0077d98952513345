//! Typed HTTP client for the user service, the product service and the image host.
//!
//! Requires the `http` feature. Uses reqwest.
//!
//! Every call keeps the method, path and JSON shape the backends expect.
//! Envelopes (`{data}`, `{messages}`, `{success, data:{url}}`) are unwrapped
//! here so the rest of the crate only sees entities. Non-2xx answers become
//! `ClientError::Api` (or `Unauthorized`/`NotFound`) with the backend's
//! `message`/`error` text.
//!
//! ## Example
//!
//! ```ignore
//! use hunt_client::{ApiClient, ClientConfig, SharedCache};
//!
//! let client = ApiClient::new(ClientConfig::from_env()?)?.with_cache(SharedCache::default());
//! let products = client.all_products().await?;
//! let ack = client.upvote(&products[0].id).await?;
//! ```

pub mod envelope;
mod products;
mod upload;
mod users;

pub use products::{ALL_PRODUCTS_ENDPOINT, CATEGORY_ENDPOINT, REPORTS_ENDPOINT};

use reqwest::{Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::cache::SharedCache;
use crate::config::ClientConfig;
use crate::error::ClientError;
use envelope::ErrorBody;

/// Which backend a request goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Users,
    Products,
}

/// Cloneable API client. Clones share the connection pool and cache.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
    token: Option<String>,
    cache: Option<SharedCache>,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|err| ClientError::Config(err.to_string()))?;
        Ok(Self {
            http,
            config,
            token: None,
            cache: None,
        })
    }

    /// Send `Authorization: Bearer <token>` with every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Attach the shared cache that mutations invalidate.
    pub fn with_cache(mut self, cache: SharedCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn cache(&self) -> Option<&SharedCache> {
        self.cache.as_ref()
    }

    /// `base` + path segments, each percent-encoded.
    fn url(&self, service: Service, segments: &[&str]) -> Result<Url, ClientError> {
        let base = match service {
            Service::Users => &self.config.user_service_url,
            Service::Products => &self.config.product_service_url,
        };
        let mut url = Url::parse(base).map_err(|err| ClientError::Config(format!("{base}: {err}")))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::Config(format!("{base} cannot be a base URL")))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send and return the raw 2xx body; non-2xx becomes an error.
    async fn send(&self, endpoint: &str, builder: RequestBuilder) -> Result<Vec<u8>, ClientError> {
        debug!(endpoint, "request");
        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if status.is_success() {
            return Ok(body.to_vec());
        }

        let error = ErrorBody::parse(&body);
        let message = error
            .text()
            .map(str::to_string)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
        warn!(endpoint, status = status.as_u16(), %message, "request failed");
        Err(ClientError::from_status(status.as_u16(), message))
    }

    async fn fetch<T: DeserializeOwned>(&self, endpoint: &str, builder: RequestBuilder) -> Result<T, ClientError> {
        let body = self.send(endpoint, builder).await?;
        envelope::decode(endpoint, &body)
    }

    /// Drop cached product lists after a mutation changed them.
    fn invalidate_products(&self) {
        if let Some(cache) = &self.cache {
            if let Err(err) = cache.invalidate_endpoint(products::PRODUCTS_ENDPOINT) {
                warn!(error = %err, "cache invalidation failed");
            }
        }
    }
}
