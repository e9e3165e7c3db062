//! Aggregating feeds over the proxied upstream data
//!
//! A feed owns the loading/error state for one page section. Feeds talk to
//! their data through [`ScrobbleSource`] and [`RepositorySource`], which are
//! implemented both by the in-process upstream clients and by
//! [`http_source::HttpProxySource`] (the same calls over the site's own JSON
//! API).

pub mod http_source;
pub mod repo_feed;
pub mod scrobble_feed;

use async_trait::async_trait;
use folio_common::models::PinnedRepos;
use serde_json::Value;
use thiserror::Error;

use crate::services::{GitHubClient, GitHubError, LastFmClient, ScrobbleQuery};

pub use http_source::{HttpContentSource, HttpProxySource};
pub use repo_feed::{RankedRepo, RepoFeed, RepoFeedView};
pub use scrobble_feed::{FeedPhase, ScrobbleFeed, ScrobbleFeedView, ScrobbleSnapshot};

/// Failure of a single source call
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FeedError {
    /// Unknown user
    #[error("User {0} not found")]
    NotFound(String),

    /// Upstream reported an error message
    #[error("{0}")]
    Upstream(String),

    /// Non-success status without a message
    #[error("API error: {0}")]
    Status(u16),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Decode error: {0}")]
    Decode(String),
}

/// Raw Last.fm payloads for one user
#[async_trait]
pub trait ScrobbleSource: Send + Sync + 'static {
    async fn scrobbles(&self, username: &str, query: &ScrobbleQuery) -> Result<Value, FeedError>;
}

/// Pinned or ranked repositories for one user
#[async_trait]
pub trait RepositorySource: Send + Sync + 'static {
    async fn pinned(&self, username: &str) -> Result<PinnedRepos, FeedError>;
}

#[async_trait]
impl ScrobbleSource for LastFmClient {
    async fn scrobbles(&self, username: &str, query: &ScrobbleQuery) -> Result<Value, FeedError> {
        self.call(username, query)
            .await
            .map_err(|e| FeedError::Upstream(e.to_string()))
    }
}

#[async_trait]
impl RepositorySource for GitHubClient {
    async fn pinned(&self, username: &str) -> Result<PinnedRepos, FeedError> {
        self.pinned_repos(username).await.map_err(|e| match e {
            GitHubError::UserNotFound => FeedError::NotFound(username.to_string()),
            other => FeedError::Upstream(other.to_string()),
        })
    }
}
