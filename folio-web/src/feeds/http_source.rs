//! Sources backed by the site's own HTTP surface
//!
//! These mirror what a browser does: call `/api/lastfm/...`,
//! `/api/github/...` and `/data/<file>` on a running folio-web instance.

use async_trait::async_trait;
use folio_common::content::ContentSource;
use folio_common::models::PinnedRepos;
use serde_json::Value;
use std::time::Duration;
use url::Url;

use super::{FeedError, RepositorySource, ScrobbleSource};
use crate::services::ScrobbleQuery;

fn http_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder().timeout(timeout).build()
}

/// `base` with `segments` appended as escaped path segments
fn endpoint(base: &Url, segments: &[&str]) -> Option<Url> {
    let mut url = base.clone();
    url.path_segments_mut().ok()?.pop_if_empty().extend(segments);
    Some(url)
}

/// Turn a non-success proxy response into a [`FeedError`]
async fn response_error(response: reqwest::Response) -> FeedError {
    let status = response.status().as_u16();
    let message = response
        .json::<Value>()
        .await
        .ok()
        .and_then(|body| body.get("error").and_then(Value::as_str).map(str::to_string));

    match message {
        Some(message) => FeedError::Upstream(message),
        None => FeedError::Status(status),
    }
}

/// Scrobble and repository source calling the JSON proxies
pub struct HttpProxySource {
    http_client: reqwest::Client,
    base_url: Url,
}

impl HttpProxySource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FeedError> {
        let base_url = Url::parse(base_url).map_err(|e| FeedError::Network(e.to_string()))?;
        let http_client = http_client(timeout).map_err(|e| FeedError::Network(e.to_string()))?;
        Ok(Self {
            http_client,
            base_url,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, FeedError> {
        endpoint(&self.base_url, segments)
            .ok_or_else(|| FeedError::Network(format!("Invalid base URL: {}", self.base_url)))
    }
}

#[async_trait]
impl ScrobbleSource for HttpProxySource {
    async fn scrobbles(&self, username: &str, query: &ScrobbleQuery) -> Result<Value, FeedError> {
        let url = self.endpoint(&["api", "lastfm", "user", username])?;

        let response = self
            .http_client
            .get(url)
            .query(&[
                ("method", query.method.as_str()),
                ("period", query.period.as_str()),
                ("limit", query.limit.as_str()),
            ])
            .send()
            .await
            .map_err(|e| FeedError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(response_error(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| FeedError::Decode(e.to_string()))
    }
}

#[async_trait]
impl RepositorySource for HttpProxySource {
    async fn pinned(&self, username: &str) -> Result<PinnedRepos, FeedError> {
        let url = self.endpoint(&["api", "github", "pinned", username])?;

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| FeedError::Network(e.to_string()))?;

        if response.status().as_u16() == 404 {
            return Err(FeedError::NotFound(username.to_string()));
        }
        if !response.status().is_success() {
            return Err(response_error(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| FeedError::Decode(e.to_string()))
    }
}

/// Content documents fetched from `/data/<file>`
pub struct HttpContentSource {
    http_client: reqwest::Client,
    base_url: Url,
}

impl HttpContentSource {
    pub fn new(base_url: &str, timeout: Duration) -> folio_common::Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| folio_common::Error::Config(format!("Invalid base URL: {}", e)))?;
        let http_client = http_client(timeout)
            .map_err(|e| folio_common::Error::Internal(e.to_string()))?;
        Ok(Self {
            http_client,
            base_url,
        })
    }
}

#[async_trait]
impl ContentSource for HttpContentSource {
    async fn fetch(&self, file: &str) -> folio_common::Result<Vec<u8>> {
        let url = endpoint(&self.base_url, &["data", file]).ok_or_else(|| {
            folio_common::Error::Config(format!("Invalid base URL: {}", self.base_url))
        })?;

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| folio_common::Error::Internal(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Err(folio_common::Error::NotFound(file.to_string()));
        }
        if !status.is_success() {
            return Err(folio_common::Error::Internal(format!(
                "{} returned {}",
                file,
                status.as_u16()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| folio_common::Error::Internal(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}
