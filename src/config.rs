//! Client configuration: service base URLs, image host, timeouts, cache TTL.

use std::{env, fmt::Display, str::FromStr, time::Duration};

use tracing::{info, warn};

use crate::error::ClientError;

pub const DEFAULT_IMAGE_HOST_URL: &str = "https://api.imgbb.com/1/upload";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(30);

/// Where the two backends and the image host live, plus client-side tuning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub user_service_url: String,
    pub product_service_url: String,
    pub image_host_url: String,
    pub image_host_key: Option<String>,
    pub request_timeout: Duration,
    pub cache_ttl: Duration,
}

impl ClientConfig {
    pub fn new(user_service_url: impl Into<String>, product_service_url: impl Into<String>) -> Self {
        Self {
            user_service_url: trim_base(user_service_url.into()),
            product_service_url: trim_base(product_service_url.into()),
            image_host_url: DEFAULT_IMAGE_HOST_URL.to_string(),
            image_host_key: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }

    /// Load from `HUNT_*` environment variables.
    ///
    /// Both service URLs are required; everything else falls back to a default.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load using an arbitrary key lookup (environment, dotenv map, test fixture).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let user = required(&lookup, "HUNT_USER_SERVICE_URL")?;
        let product = required(&lookup, "HUNT_PRODUCT_SERVICE_URL")?;

        let mut config = Self::new(user, product);
        if let Some(url) = lookup("HUNT_IMAGE_HOST_URL") {
            config.image_host_url = trim_base(url);
        } else {
            info!("HUNT_IMAGE_HOST_URL not set, using default: {DEFAULT_IMAGE_HOST_URL}");
        }
        config.image_host_key = lookup("HUNT_IMAGE_HOST_KEY");
        if config.image_host_key.is_none() {
            warn!("HUNT_IMAGE_HOST_KEY not set, image uploads will be rejected by the host");
        }
        config.request_timeout = Duration::from_secs(try_load(
            &lookup,
            "HUNT_REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT.as_secs(),
        )?);
        config.cache_ttl = Duration::from_secs(try_load(
            &lookup,
            "HUNT_CACHE_TTL_SECS",
            DEFAULT_CACHE_TTL.as_secs(),
        )?);
        Ok(config)
    }

    pub fn with_image_host(mut self, url: impl Into<String>, key: impl Into<String>) -> Self {
        self.image_host_url = trim_base(url.into());
        self.image_host_key = Some(key.into());
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn user_url(&self, path: &str) -> String {
        format!("{}{}", self.user_service_url, path)
    }

    pub fn product_url(&self, path: &str) -> String {
        format!("{}{}", self.product_service_url, path)
    }
}

fn trim_base(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn required<F>(lookup: &F, key: &str) -> Result<String, ClientError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => {
            warn!("Environment variable {key} not found");
            Err(ClientError::Config(format!(
                "{key} is not configured. Please check your environment variables."
            )))
        }
    }
}

fn try_load<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ClientError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
        Some(raw) => raw.trim().parse().map_err(|e| {
            warn!("Invalid {key} value: {e}");
            ClientError::Config(format!("invalid {key} value {raw:?}: {e}"))
        }),
    }
}
