//! Code-hosting repository entity and the pinned-repositories envelope

use chrono::DateTime;
use serde::{Deserialize, Serialize};

/// Normalized repository as returned by the pinned-repositories proxy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub url: String,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub stars: u64,
    #[serde(default)]
    pub forks: u64,
    #[serde(default)]
    pub topics: Vec<String>,
    /// RFC 3339 timestamp of the last update
    #[serde(default)]
    pub last_updated: String,
}

/// Which upstream path produced a repository list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepoSource {
    /// Pinned items from the graph query
    Graphql,
    /// Ranked fallback from the paginated list endpoint
    Rest,
}

/// `{repos, source}` response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinnedRepos {
    pub repos: Vec<Repository>,
    pub source: RepoSource,
}

/// Ranking score: `stars * 2 + millis / 1e9`
///
/// The recency term is about 1700 for a current timestamp and grows by about
/// 31.5 per year, so a year of staleness costs as much as 16 stars.
/// Unparseable timestamps contribute 0.
pub fn activity_score(stars: u64, timestamp: &str) -> f64 {
    let recency = DateTime::parse_from_rfc3339(timestamp)
        .map(|t| t.timestamp_millis() as f64 / 1_000_000_000.0)
        .unwrap_or(0.0);
    stars as f64 * 2.0 + recency
}

impl Repository {
    /// [`activity_score`] of this repository's stars and last update
    pub fn score(&self) -> f64 {
        activity_score(self.stars, &self.last_updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serializes_camel_case() {
        let repo = Repository {
            id: "1".into(),
            name: "site".into(),
            description: String::new(),
            url: "https://github.com/u/site".into(),
            homepage: None,
            language: Some("Rust".into()),
            stars: 3,
            forks: 1,
            topics: vec!["web".into()],
            last_updated: "2024-01-01T00:00:00Z".into(),
        };
        let value = serde_json::to_value(&repo).unwrap();
        assert_eq!(value["lastUpdated"], "2024-01-01T00:00:00Z");
        assert_eq!(value["homepage"], serde_json::Value::Null);
    }

    #[test]
    fn test_source_wire_names() {
        let body = PinnedRepos { repos: vec![], source: RepoSource::Rest };
        assert_eq!(serde_json::to_value(&body).unwrap(), json!({ "repos": [], "source": "rest" }));
        let parsed: PinnedRepos =
            serde_json::from_value(json!({ "repos": [], "source": "graphql" })).unwrap();
        assert_eq!(parsed.source, RepoSource::Graphql);
    }

    #[test]
    fn test_score_weighs_stars_against_recency() {
        let older_starred = activity_score(200, "2015-01-01T00:00:00Z");
        let newer_unstarred = activity_score(0, "2024-06-01T00:00:00Z");
        assert!(older_starred > newer_unstarred);

        let older_few = activity_score(5, "2015-01-01T00:00:00Z");
        assert!(older_few < newer_unstarred);

        let newer = activity_score(1, "2024-06-01T00:00:00Z");
        let older = activity_score(1, "2020-06-01T00:00:00Z");
        assert!(newer > older);

        assert_eq!(activity_score(2, "not a date"), 4.0);
    }
}
