//! GitHub API client
//!
//! Pinned repositories come from the GraphQL API when a token is configured.
//! Without a token, or when the GraphQL call fails or yields nothing, the
//! client falls back to the public REST listing and ranks non-fork
//! repositories by stars and push recency.

use folio_common::models::lenient::{opt_string, vec_of};
use folio_common::models::repository::activity_score;
use folio_common::models::{PinnedRepos, RepoSource, Repository};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;
use url::Url;

const USER_AGENT: &str = "Folio/0.1.0 (+https://github.com/sksmta/website)";
const REST_ACCEPT: &str = "application/vnd.github.v3+json";
const REST_PAGE_SIZE: &str = "30";
const MAX_REPOS: usize = 6;

const PINNED_QUERY: &str = r#"
query($username: String!) {
  user(login: $username) {
    pinnedItems(first: 6, types: REPOSITORY) {
      nodes {
        ... on Repository {
          id
          name
          description
          url
          homepageUrl
          primaryLanguage { name }
          stargazerCount
          forkCount
          repositoryTopics(first: 10) { nodes { topic { name } } }
          updatedAt
          createdAt
          pushedAt
        }
      }
    }
  }
}
"#;

/// GitHub client errors
#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("User not found")]
    UserNotFound,

    #[error("GitHub API returned {0}")]
    HttpStatus(u16),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("GraphQL error: {0}")]
    GraphQl(String),
}

#[derive(Debug, Deserialize)]
struct GraphQlEnvelope {
    #[serde(default)]
    data: Option<PinnedData>,
    #[serde(default, deserialize_with = "vec_of")]
    errors: Vec<GraphQlMessage>,
}

#[derive(Debug, Deserialize)]
struct GraphQlMessage {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct PinnedData {
    user: Option<PinnedUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PinnedUser {
    pinned_items: NodeList<GraphQlRepository>,
}

#[derive(Debug, Deserialize)]
#[serde(bound = "T: serde::de::DeserializeOwned")]
struct NodeList<T> {
    #[serde(default = "Vec::new", deserialize_with = "vec_of")]
    nodes: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct Named {
    name: String,
}

#[derive(Debug, Deserialize)]
struct TopicNode {
    topic: Named,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphQlRepository {
    id: String,
    name: String,
    #[serde(default, deserialize_with = "opt_string")]
    description: Option<String>,
    url: String,
    #[serde(default, deserialize_with = "opt_string")]
    homepage_url: Option<String>,
    #[serde(default)]
    primary_language: Option<Named>,
    #[serde(default)]
    stargazer_count: u64,
    #[serde(default)]
    fork_count: u64,
    #[serde(default)]
    repository_topics: Option<NodeList<TopicNode>>,
    #[serde(default, deserialize_with = "opt_string")]
    updated_at: Option<String>,
}

impl From<GraphQlRepository> for Repository {
    fn from(repo: GraphQlRepository) -> Self {
        Repository {
            id: repo.id,
            name: repo.name,
            description: repo.description.unwrap_or_default(),
            url: repo.url,
            homepage: repo.homepage_url,
            language: repo.primary_language.map(|l| l.name),
            stars: repo.stargazer_count,
            forks: repo.fork_count,
            topics: repo
                .repository_topics
                .map(|t| t.nodes.into_iter().map(|n| n.topic.name).collect())
                .unwrap_or_default(),
            last_updated: repo.updated_at.unwrap_or_default(),
        }
    }
}

/// Entry of `GET /users/{username}/repos`
#[derive(Debug, Clone, Deserialize)]
pub struct RestRepository {
    #[serde(default, deserialize_with = "opt_string")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, deserialize_with = "opt_string")]
    pub description: Option<String>,
    pub html_url: String,
    #[serde(default, deserialize_with = "opt_string")]
    pub homepage: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default, deserialize_with = "vec_of")]
    pub topics: Vec<String>,
    #[serde(default)]
    pub fork: bool,
    #[serde(default, deserialize_with = "opt_string")]
    pub updated_at: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub pushed_at: Option<String>,
}

impl RestRepository {
    fn score(&self) -> f64 {
        activity_score(self.stargazers_count, self.pushed_at.as_deref().unwrap_or(""))
    }
}

impl From<RestRepository> for Repository {
    fn from(repo: RestRepository) -> Self {
        Repository {
            id: repo.id.unwrap_or_default(),
            name: repo.name,
            description: repo.description.unwrap_or_default(),
            url: repo.html_url,
            homepage: repo.homepage,
            language: repo.language,
            stars: repo.stargazers_count,
            forks: repo.forks_count,
            topics: repo.topics,
            last_updated: repo.updated_at.unwrap_or_default(),
        }
    }
}

/// Drop forks, rank by [`activity_score`] of stars and `pushed_at`, keep six
pub fn rank_rest_repos(repos: Vec<RestRepository>) -> Vec<Repository> {
    let mut own: Vec<RestRepository> = repos.into_iter().filter(|r| !r.fork).collect();
    own.sort_by(|a, b| b.score().total_cmp(&a.score()));
    own.into_iter().take(MAX_REPOS).map(Repository::from).collect()
}

/// GitHub API client
pub struct GitHubClient {
    http_client: reqwest::Client,
    api_url: String,
    graphql_url: String,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(
        api_url: impl Into<String>,
        graphql_url: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, GitHubError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| GitHubError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            api_url: api_url.into(),
            graphql_url: graphql_url.into(),
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Pinned repositories for `username`, GraphQL first then REST
    pub async fn pinned_repos(&self, username: &str) -> Result<PinnedRepos, GitHubError> {
        if let Some(token) = &self.token {
            match self.query_pinned(username, token).await {
                Ok(repos) if !repos.is_empty() => {
                    tracing::info!(username = %username, count = repos.len(), "Pinned repositories via GraphQL");
                    return Ok(PinnedRepos {
                        repos,
                        source: RepoSource::Graphql,
                    });
                }
                Ok(_) => {
                    tracing::info!(username = %username, "No pinned repositories, falling back to REST");
                }
                Err(e) => {
                    tracing::warn!(username = %username, error = %e, "GraphQL failed, falling back to REST");
                }
            }
        }

        let repos = rank_rest_repos(self.list_repos(username).await?);
        tracing::info!(username = %username, count = repos.len(), "Repositories via REST");
        Ok(PinnedRepos {
            repos,
            source: RepoSource::Rest,
        })
    }

    async fn query_pinned(&self, username: &str, token: &str) -> Result<Vec<Repository>, GitHubError> {
        let body = json!({
            "query": PINNED_QUERY,
            "variables": { "username": username },
        });

        let response = self
            .http_client
            .post(&self.graphql_url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| GitHubError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GitHubError::HttpStatus(status.as_u16()));
        }

        let envelope: GraphQlEnvelope = response
            .json()
            .await
            .map_err(|e| GitHubError::ParseError(e.to_string()))?;

        match envelope.data.and_then(|d| d.user) {
            Some(user) => Ok(user
                .pinned_items
                .nodes
                .into_iter()
                .map(Repository::from)
                .collect()),
            None => {
                let messages: Vec<String> =
                    envelope.errors.into_iter().map(|e| e.message).collect();
                Err(GitHubError::GraphQl(if messages.is_empty() {
                    "missing user in response".to_string()
                } else {
                    messages.join("; ")
                }))
            }
        }
    }

    fn repos_url(&self, username: &str) -> Result<Url, GitHubError> {
        let mut url = Url::parse(&self.api_url)
            .map_err(|e| GitHubError::NetworkError(format!("Invalid API URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| GitHubError::NetworkError("Invalid API URL".to_string()))?
            .pop_if_empty()
            .extend(["users", username, "repos"]);
        url.query_pairs_mut()
            .append_pair("sort", "updated")
            .append_pair("per_page", REST_PAGE_SIZE);
        Ok(url)
    }

    async fn list_repos(&self, username: &str) -> Result<Vec<RestRepository>, GitHubError> {
        let mut request = self
            .http_client
            .get(self.repos_url(username)?)
            .header("Accept", REST_ACCEPT);
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("token {}", token));
        }

        let response = request
            .send()
            .await
            .map_err(|e| GitHubError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Err(GitHubError::UserNotFound);
        }
        if !status.is_success() {
            return Err(GitHubError::HttpStatus(status.as_u16()));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| GitHubError::ParseError(e.to_string()))?;
        if !payload.is_array() {
            return Err(GitHubError::ParseError("expected a repository list".to_string()));
        }

        Ok(folio_common::models::lenient::elements(&payload))
    }
}
