//! folio-web library - portfolio site server
//!
//! Serves the page shells, the Last.fm and GitHub proxies, the image lookup
//! and the static content documents.

use axum::{routing::get, Router};
use chrono::{DateTime, Utc};
use folio_common::config::TomlConfig;
use folio_common::content::{ContentSource, DirContentSource};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod feeds;
pub mod pages;
pub mod services;

pub use error::{ApiError, ApiResult};

use feeds::{RepoFeed, ScrobbleFeed};
use services::{GitHubClient, LastFmClient, WikiClient};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<TomlConfig>,
    pub lastfm: Arc<LastFmClient>,
    pub github: Arc<GitHubClient>,
    pub wiki: Arc<WikiClient>,
    /// Content documents for the page shells
    pub content: Arc<dyn ContentSource>,
    /// Server startup time for uptime calculation
    pub startup_time: DateTime<Utc>,
    /// Cancelled on shutdown; parent of every feed
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Create application state with upstream clients built from `config`
    pub fn new(config: TomlConfig) -> anyhow::Result<Self> {
        let timeout = Duration::from_secs(config.upstream.timeout_secs);
        let shutdown = CancellationToken::new();

        let lastfm = Arc::new(LastFmClient::new(config.upstream.lastfm_url.clone(), timeout)?);
        let github = Arc::new(GitHubClient::new(
            config.upstream.github_api_url.clone(),
            config.upstream.github_graphql_url.clone(),
            config.github_token().map(str::to_string),
            timeout,
        )?);
        let wiki = Arc::new(WikiClient::new(config.upstream.wikipedia_api_url.clone(), timeout)?);
        let content: Arc<dyn ContentSource> = Arc::new(DirContentSource::new(config.data_dir()));

        Ok(Self {
            config: Arc::new(config),
            lastfm,
            github,
            wiki,
            content,
            startup_time: Utc::now(),
            shutdown,
        })
    }

    /// Use a different content source (HTTP-backed, in-memory for tests)
    pub fn with_content(mut self, content: Arc<dyn ContentSource>) -> Self {
        self.content = content;
        self
    }

    /// Fresh scrobble feed for the configured Last.fm user
    ///
    /// Pages mount one per request and close it after rendering.
    pub fn scrobble_feed(&self) -> ScrobbleFeed<LastFmClient> {
        ScrobbleFeed::with_lifetime(
            Arc::clone(&self.lastfm),
            &self.config.site.lastfm_username,
            &self.shutdown,
        )
    }

    /// Fresh repository feed for the configured GitHub users
    pub fn repo_feed(&self) -> RepoFeed<GitHubClient> {
        RepoFeed::with_lifetime(
            Arc::clone(&self.github),
            self.config.site.github_usernames.clone(),
            &self.shutdown,
        )
    }

    /// Cancel in-flight feed runs and stop further loads
    pub fn close_feeds(&self) {
        self.shutdown.cancel();
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let data_dir = state.config.data_dir();

    let api = Router::new()
        .route("/api/lastfm/user/:username", get(api::get_user_data))
        .route("/api/github/pinned/:username", get(api::get_pinned_repos))
        .route("/api/wiki-image", get(api::get_wiki_image))
        .route("/api/commands", get(api::list_commands))
        .route("/api/buildinfo", get(api::get_build_info))
        .merge(api::health_routes())
        .layer(CorsLayer::permissive());

    Router::new()
        .merge(api)
        .merge(pages::page_routes())
        .nest_service("/data", ServeDir::new(data_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
