//! Brand payload fetchers.
//!
//! # Design
//! - `BrandFetcher` is the transport seam; it returns decoded JSON or a `FetchError` and
//!   knows nothing about schemas.
//! - Both built-in fetchers resolve `<base>/<scope>/themes/<brand-id>.json`; brand ids
//!   are validated before they reach here.

use std::path::PathBuf;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::debug;

use crate::brand::BrandId;
use crate::error::FetchError;

/// Source of raw brand payloads.
#[async_trait]
pub trait BrandFetcher: Send + Sync {
    /// Fetch and decode the payload for `brand_id`.
    async fn fetch(&self, brand_id: &BrandId) -> Result<Value, FetchError>;
}

fn relative_payload_path(scope: &str, brand_id: &BrandId) -> String {
    let scope = scope.trim_matches('/');
    if scope.is_empty() {
        format!("themes/{brand_id}.json")
    } else {
        format!("{scope}/themes/{brand_id}.json")
    }
}

/// Fetches payloads over HTTP.
#[derive(Clone, Debug)]
pub struct HttpBrandFetcher {
    client: Client,
    base_url: Url,
    scope: String,
}

impl HttpBrandFetcher {
    /// Fetcher using a default client.
    #[must_use]
    pub fn new(base_url: Url, scope: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url, scope)
    }

    /// Fetcher using a caller-configured client.
    #[must_use]
    pub fn with_client(client: Client, mut base_url: Url, scope: impl Into<String>) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            client,
            base_url,
            scope: scope.into(),
        }
    }

    /// URL the payload for `brand_id` is fetched from.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Location`] if the URL cannot be joined.
    pub fn payload_url(&self, brand_id: &BrandId) -> Result<Url, FetchError> {
        self.base_url
            .join(&relative_payload_path(&self.scope, brand_id))
            .map_err(|source| FetchError::Location {
                base: self.base_url.to_string(),
                source,
            })
    }
}

#[async_trait]
impl BrandFetcher for HttpBrandFetcher {
    async fn fetch(&self, brand_id: &BrandId) -> Result<Value, FetchError> {
        let url = self.payload_url(brand_id)?;
        debug!(brand_id = %brand_id, url = %url, "fetching brand payload");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.bytes().await.map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })?;
        serde_json::from_slice(&body).map_err(|source| FetchError::Decode {
            location: url.to_string(),
            source,
        })
    }
}

/// Reads payloads from a directory of bundled assets.
#[derive(Clone, Debug)]
pub struct DirectoryBrandFetcher {
    root: PathBuf,
    scope: String,
}

impl DirectoryBrandFetcher {
    /// Fetcher rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, scope: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            scope: scope.into(),
        }
    }

    /// Path the payload for `brand_id` is read from.
    #[must_use]
    pub fn payload_path(&self, brand_id: &BrandId) -> PathBuf {
        self.root.join(relative_payload_path(&self.scope, brand_id))
    }
}

#[async_trait]
impl BrandFetcher for DirectoryBrandFetcher {
    async fn fetch(&self, brand_id: &BrandId) -> Result<Value, FetchError> {
        let path = self.payload_path(brand_id);
        debug!(brand_id = %brand_id, path = %path.display(), "reading brand payload");

        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|source| FetchError::Io {
                path: path.clone(),
                source,
            })?;
        serde_json::from_slice(&bytes).map_err(|source| FetchError::Decode {
            location: path.display().to_string(),
            source,
        })
    }
}
