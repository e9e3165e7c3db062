//! Wikipedia image lookup
//!
//! Finds an illustrative image for a free-text name (artist, album) using the
//! MediaWiki `generator=images` query. Callers always get a URL back: when no
//! suitable image exists the deterministic Unsplash search URL is used.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;
use url::form_urlencoded;

const USER_AGENT: &str = "Folio/0.1.0 (+https://github.com/sksmta/website)";
const FALLBACK_IMAGE_BASE: &str = "https://source.unsplash.com/400x400/";
const IMAGE_LIMIT: &str = "50";

#[derive(Debug, Error)]
pub enum WikiError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Wikipedia API returned {0}")]
    HttpStatus(u16),

    #[error("Parse error: {0}")]
    ParseError(String),
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    query: Option<QueryPages>,
}

#[derive(Debug, Deserialize)]
struct QueryPages {
    #[serde(default)]
    pages: BTreeMap<String, ImagePage>,
}

#[derive(Debug, Deserialize)]
struct ImagePage {
    #[serde(default)]
    title: String,
    #[serde(default)]
    imageinfo: Vec<ImageInfo>,
}

#[derive(Debug, Deserialize)]
struct ImageInfo {
    #[serde(default)]
    url: String,
}

/// Raster image that is not a logo
pub fn is_usable_image(url: &str) -> bool {
    let lower = url.to_lowercase();
    let raster = [".jpg", ".jpeg", ".png"].iter().any(|ext| lower.ends_with(ext));
    raster && !lower.contains("logo")
}

/// Unsplash search URL for `name`; a blank name searches for "music"
pub fn fallback_image(name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        return format!("{}?music", FALLBACK_IMAGE_BASE);
    }
    // form encoding writes spaces as '+'; a literal '+' is already %2B
    let encoded: String = form_urlencoded::byte_serialize(name.as_bytes())
        .collect::<String>()
        .replace('+', "%20");
    format!("{}?{},music", FALLBACK_IMAGE_BASE, encoded)
}

pub struct WikiClient {
    http_client: reqwest::Client,
    api_url: String,
}

impl WikiClient {
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Result<Self, WikiError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| WikiError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            api_url: api_url.into(),
        })
    }

    /// Image URLs on the page titled `name`, ordered by file title
    pub async fn page_images(&self, name: &str) -> Result<Vec<String>, WikiError> {
        let response = self
            .http_client
            .get(&self.api_url)
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("redirects", "1"),
                ("titles", name),
                ("generator", "images"),
                ("gimlimit", IMAGE_LIMIT),
                ("prop", "imageinfo"),
                ("iiprop", "url"),
            ])
            .send()
            .await
            .map_err(|e| WikiError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WikiError::HttpStatus(status.as_u16()));
        }

        let body: QueryResponse = response
            .json()
            .await
            .map_err(|e| WikiError::ParseError(e.to_string()))?;

        let mut pages: Vec<ImagePage> = body
            .query
            .map(|q| q.pages.into_values().collect())
            .unwrap_or_default();
        pages.sort_by(|a, b| a.title.cmp(&b.title));

        Ok(pages
            .into_iter()
            .flat_map(|page| page.imageinfo.into_iter().map(|info| info.url))
            .filter(|url| !url.is_empty())
            .collect())
    }

    /// First usable image on the page, if any
    pub async fn find_image(&self, name: &str) -> Result<Option<String>, WikiError> {
        let images = self.page_images(name).await?;
        Ok(images.into_iter().find(|url| is_usable_image(url)))
    }

    /// Located image or the fallback; never fails
    pub async fn resolve_image(&self, name: &str) -> String {
        let name = name.trim();
        if name.is_empty() {
            return fallback_image(name);
        }

        match self.find_image(name).await {
            Ok(Some(url)) => url,
            Ok(None) => {
                tracing::debug!(name = %name, "No usable Wikipedia image");
                fallback_image(name)
            }
            Err(e) => {
                tracing::warn!(name = %name, error = %e, "Wikipedia lookup failed");
                fallback_image(name)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usable_image_filter() {
        assert!(is_usable_image("https://upload.wikimedia.org/a/Band_2019.JPG"));
        assert!(is_usable_image("https://upload.wikimedia.org/a/cover.png"));
        assert!(!is_usable_image("https://upload.wikimedia.org/a/Band_Logo.png"));
        assert!(!is_usable_image("https://upload.wikimedia.org/a/icon.svg"));
    }

    #[test]
    fn test_fallback_image_encoding() {
        assert_eq!(
            fallback_image("Daft Punk"),
            "https://source.unsplash.com/400x400/?Daft%20Punk,music"
        );
        assert_eq!(
            fallback_image("AC/DC"),
            "https://source.unsplash.com/400x400/?AC%2FDC,music"
        );
        assert_eq!(fallback_image("   "), "https://source.unsplash.com/400x400/?music");
    }
}
