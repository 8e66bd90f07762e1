//! Image source abstraction and the captioned-cat HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use tracing::{info, instrument, warn};
use url::Url;

use crate::config::ImageConfig;

/// Raw upstream response, passed through without interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatImage {
    pub status: u16,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("invalid image url {url}: {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("build http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Something that renders a picture for an already-encoded caption.
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn fetch(&self, caption: &str) -> Result<CatImage, ImageError>;
}

#[derive(Debug, Clone)]
pub struct ImageSettings {
    pub base_url: String,
    pub font_size: u32,
    pub timeout: Duration,
}

impl From<&ImageConfig> for ImageSettings {
    fn from(cfg: &ImageConfig) -> Self {
        Self {
            base_url: cfg.base_url.clone(),
            font_size: cfg.font_size,
            timeout: cfg.timeout(),
        }
    }
}

/// Build `<base>/<caption>?html=true&fontSize=<font_size>`.
///
/// `caption` must already be percent-encoded; it is inserted as-is.
pub fn cat_url(base_url: &str, caption: &str, font_size: u32) -> Result<Url, ImageError> {
    let raw = format!("{}/{}", base_url.trim_end_matches('/'), caption);
    let mut url = Url::parse(&raw).map_err(|source| ImageError::Url {
        url: raw.clone(),
        source,
    })?;
    url.query_pairs_mut()
        .append_pair("html", "true")
        .append_pair("fontSize", &font_size.to_string());
    Ok(url)
}

/// [`ImageSource`] backed by cataas.com (or anything speaking the same URL scheme).
///
/// The upstream status is recorded but never acted on: error pages come back
/// exactly like images do.
#[derive(Debug, Clone)]
pub struct CataasClient {
    client: reqwest::Client,
    settings: ImageSettings,
}

impl CataasClient {
    pub fn new(settings: ImageSettings) -> Result<Self, ImageError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(ImageError::Client)?;
        Ok(Self { client, settings })
    }
}

#[async_trait]
impl ImageSource for CataasClient {
    #[instrument(skip_all)]
    async fn fetch(&self, caption: &str) -> Result<CatImage, ImageError> {
        let url = cat_url(&self.settings.base_url, caption, self.settings.font_size)?;
        let request_error = |source| ImageError::Request {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await.map_err(request_error)?;

        if status.is_success() {
            info!(
                status = status.as_u16(),
                content_type = content_type.as_deref().unwrap_or("-"),
                bytes = bytes.len(),
                "image fetched"
            );
        } else {
            warn!(
                status = status.as_u16(),
                bytes = bytes.len(),
                "upstream returned an error status, forwarding body anyway"
            );
        }

        Ok(CatImage {
            status: status.as_u16(),
            content_type,
            bytes,
        })
    }
}
