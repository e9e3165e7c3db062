//! Upstream API clients

pub mod github_client;
pub mod lastfm_client;
pub mod wiki_client;

pub use github_client::{GitHubClient, GitHubError};
pub use lastfm_client::{LastFmClient, LastFmError, ScrobbleMethod, ScrobbleQuery};
pub use wiki_client::{WikiClient, WikiError};
