//! HTTP clients for the editor backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use super::ImageFetcher;
use crate::error::{Error, Result};

const FETCH_IMAGE_PATH: &str = "/editor/fetch-image";
const UPLOAD_IMAGE_PATH: &str = "/editor/upload-image";

/// Fetches images through the backend proxy endpoint.
///
/// Image URLs found in editor HTML often point at third-party hosts or are
/// relative to the backend's media store, so they are never requested
/// directly. Each fetch is a `POST {base}/editor/fetch-image` with a
/// `{"url": ...}` body; a 2xx reply body is the image.
#[derive(Debug, Clone)]
pub struct ProxyImageFetcher {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ProxyImageFetcher {
    /// Create a fetcher for the backend at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: trim_base(base_url.into()),
            token: None,
        }
    }

    /// Send a bearer token with every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Apply a request timeout. No timeout is set by default.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        self
    }

    /// Full URL of the proxy endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, FETCH_IMAGE_PATH)
    }

    async fn request(&self, url: &str) -> Result<Vec<u8>> {
        let resp = self
            .client
            .post(self.endpoint())
            .headers(auth_headers(self.token.as_deref())?)
            .json(&serde_json::json!({ "url": url }))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(Error::ImageFetch(format!("proxy returned {}", resp.status())));
        }
        Ok(resp.bytes().await?.to_vec())
    }
}

#[async_trait]
impl ImageFetcher for ProxyImageFetcher {
    async fn fetch(&self, url: &str) -> Option<Vec<u8>> {
        match self.request(url).await {
            Ok(data) => {
                log::debug!("fetched {} ({} bytes)", url, data.len());
                Some(data)
            }
            Err(e) => {
                log::warn!("failed to fetch image {}: {}", url, e);
                None
            }
        }
    }
}

#[derive(Deserialize)]
struct UploadReply {
    url: String,
}

/// Client for the editor's image upload endpoint.
#[derive(Debug, Clone)]
pub struct EditorClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl EditorClient {
    /// Create a client for the backend at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: trim_base(base_url.into()),
            token: None,
        }
    }

    /// Send a bearer token with every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Upload an image and return the URL the backend stored it under.
    ///
    /// Sends a multipart form with the `upload` file field and, when given,
    /// the `paper_id` the image belongs to. Bytes that are not a supported
    /// image are rejected before anything is sent.
    pub async fn upload_image(
        &self,
        data: Vec<u8>,
        filename: &str,
        paper_id: Option<&str>,
    ) -> Result<String> {
        let format = crate::detect::detect_image_format(&data)?;
        let part = Part::bytes(data)
            .file_name(filename.to_string())
            .mime_str(format.mime_type())?;
        let mut form = Form::new().part("upload", part);
        if let Some(id) = paper_id {
            form = form.text("paper_id", id.to_string());
        }

        let resp = self
            .client
            .post(format!("{}{}", self.base_url, UPLOAD_IMAGE_PATH))
            .headers(auth_headers(self.token.as_deref())?)
            .multipart(form)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(Error::ImageFetch(format!("upload returned {}", resp.status())));
        }
        let reply: UploadReply = resp.json().await?;
        Ok(reply.url)
    }
}

fn trim_base(mut base: String) -> String {
    while base.ends_with('/') {
        base.pop();
    }
    base
}

fn auth_headers(token: Option<&str>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    if let Some(token) = token {
        let value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| Error::InvalidInput(format!("invalid auth token: {}", e)))?;
        headers.insert(AUTHORIZATION, value);
    }
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let fetcher = ProxyImageFetcher::new("https://api.example.org/v1/");
        assert_eq!(
            fetcher.endpoint(),
            "https://api.example.org/v1/editor/fetch-image"
        );
    }

    #[test]
    fn test_auth_headers() {
        assert!(auth_headers(None).unwrap().is_empty());
        let headers = auth_headers(Some("abc")).unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer abc");
        assert!(auth_headers(Some("bad\ntoken")).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_proxy_yields_none() {
        let fetcher = ProxyImageFetcher::new("http://127.0.0.1:9")
            .with_timeout(Duration::from_secs(2));
        assert!(fetcher.fetch("https://images.example.org/a.png").await.is_none());
    }
}
