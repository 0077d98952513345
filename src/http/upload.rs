//! Image host upload: one image per request, base64 in a multipart form.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::multipart::Form;
use reqwest::{Method, Url};
use tracing::info;

use super::envelope::{self, ImageUploadBody};
use super::ApiClient;
use crate::error::ClientError;

const UPLOAD_ENDPOINT: &str = "image-host";

impl ApiClient {
    /// Upload one image and return its public URL.
    ///
    /// Fails with `Config` when no image-host key is configured; nothing is
    /// sent in that case.
    pub async fn upload_image(&self, image: &[u8]) -> Result<String, ClientError> {
        let key = self
            .config
            .image_host_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ClientError::Config("image host key is not configured".to_string()))?;
        let url = Url::parse(&self.config.image_host_url)
            .map_err(|err| ClientError::Config(format!("{}: {err}", self.config.image_host_url)))?;

        let form = Form::new().text("image", STANDARD.encode(image));
        let request = self
            .http
            .request(Method::POST, url)
            .query(&[("key", key)])
            .multipart(form);

        let body = self.send(UPLOAD_ENDPOINT, request).await?;
        let url = envelope::decode::<ImageUploadBody>(UPLOAD_ENDPOINT, &body)?.into_url(UPLOAD_ENDPOINT)?;
        info!(bytes = image.len(), %url, "image uploaded");
        Ok(url)
    }

    /// Upload several images in order, stopping at the first failure.
    pub async fn upload_images<I, B>(&self, images: I) -> Result<Vec<String>, ClientError>
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        let mut urls = Vec::new();
        for image in images {
            urls.push(self.upload_image(image.as_ref()).await?);
        }
        Ok(urls)
    }
}
