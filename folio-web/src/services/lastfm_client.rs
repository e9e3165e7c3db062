//! Last.fm API client
//!
//! Thin pass-through to the Last.fm 2.0 web service. Responses are returned
//! as raw JSON; typed parsing happens in `folio_common::models::scrobble`.

use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Public application key for the Last.fm read API
pub const LASTFM_API_KEY: &str = "0f57544cf5bca11119b856dc58ee4539";
const USER_AGENT: &str = "Folio/0.1.0 (+https://github.com/sksmta/website)";

/// Last.fm client errors
#[derive(Debug, Error)]
pub enum LastFmError {
    #[error("Unknown method: {0}")]
    UnknownMethod(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Last.fm API returned {status}: {reason}")]
    HttpStatus { status: u16, reason: String },

    #[error("Invalid JSON response from Last.fm API")]
    ParseError,

    #[error("Last.fm API error: {message}")]
    ApiError { code: Option<i64>, message: String },
}

/// Supported `user.*` methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrobbleMethod {
    UserInfo,
    RecentTracks,
    TopArtists,
    TopAlbums,
    TopTracks,
}

impl ScrobbleMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScrobbleMethod::UserInfo => "user.getinfo",
            ScrobbleMethod::RecentTracks => "user.getrecenttracks",
            ScrobbleMethod::TopArtists => "user.gettopartists",
            ScrobbleMethod::TopAlbums => "user.gettopalbums",
            ScrobbleMethod::TopTracks => "user.gettoptracks",
        }
    }

    /// `period` and `limit` are only forwarded for chart methods
    pub fn is_top(&self) -> bool {
        self.as_str().contains("top")
    }
}

impl FromStr for ScrobbleMethod {
    type Err = LastFmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user.getinfo" => Ok(ScrobbleMethod::UserInfo),
            "user.getrecenttracks" => Ok(ScrobbleMethod::RecentTracks),
            "user.gettopartists" => Ok(ScrobbleMethod::TopArtists),
            "user.gettopalbums" => Ok(ScrobbleMethod::TopAlbums),
            "user.gettoptracks" => Ok(ScrobbleMethod::TopTracks),
            other => Err(LastFmError::UnknownMethod(other.to_string())),
        }
    }
}

impl fmt::Display for ScrobbleMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One proxied Last.fm call: method plus chart window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrobbleQuery {
    pub method: ScrobbleMethod,
    pub period: String,
    pub limit: String,
}

impl ScrobbleQuery {
    pub fn new(method: ScrobbleMethod) -> Self {
        Self {
            method,
            period: "overall".to_string(),
            limit: "10".to_string(),
        }
    }

    pub fn period(mut self, period: impl Into<String>) -> Self {
        self.period = period.into();
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit.to_string();
        self
    }
}

impl Default for ScrobbleQuery {
    fn default() -> Self {
        Self::new(ScrobbleMethod::UserInfo)
    }
}

/// Last.fm API client
pub struct LastFmClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl LastFmClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, LastFmError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| LastFmError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into(),
            api_key: LASTFM_API_KEY.to_string(),
        })
    }

    /// Upstream URL for a query
    pub fn request_url(&self, username: &str, query: &ScrobbleQuery) -> Result<Url, LastFmError> {
        let mut params = vec![
            ("method", query.method.as_str()),
            ("user", username),
            ("api_key", self.api_key.as_str()),
            ("format", "json"),
        ];
        if query.method.is_top() {
            params.push(("period", query.period.as_str()));
            params.push(("limit", query.limit.as_str()));
        }

        Url::parse_with_params(&self.base_url, &params)
            .map_err(|e| LastFmError::NetworkError(e.to_string()))
    }

    /// Call Last.fm and return the response body verbatim
    pub async fn call(&self, username: &str, query: &ScrobbleQuery) -> Result<Value, LastFmError> {
        let url = self.request_url(username, query)?;
        tracing::debug!(method = %query.method, username = %username, "Querying Last.fm");

        let response = self
            .http_client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| LastFmError::NetworkError(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| LastFmError::NetworkError(e.to_string()))?;
        let parsed: Option<Value> = serde_json::from_str(&text).ok();

        // Last.fm reports unknown users as an error body, sometimes with a 404
        if let Some(err) = parsed.as_ref().and_then(application_error) {
            tracing::warn!(method = %query.method, username = %username, error = %err, "Last.fm application error");
            return Err(err);
        }

        if !status.is_success() {
            tracing::warn!(
                method = %query.method,
                status = status.as_u16(),
                body = %truncate(&text, 200),
                "Last.fm HTTP error"
            );
            return Err(LastFmError::HttpStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        match parsed {
            Some(value) => {
                tracing::debug!(method = %query.method, "Last.fm request succeeded");
                Ok(value)
            }
            None => {
                tracing::error!(body = %truncate(&text, 200), "Unparseable Last.fm response");
                Err(LastFmError::ParseError)
            }
        }
    }
}

/// Application-level `{"error": <code>, "message": ...}` payload, if any
pub fn application_error(payload: &Value) -> Option<LastFmError> {
    let code = payload.get("error")?;
    if code.is_null() || code == &Value::Bool(false) {
        return None;
    }

    let message = payload
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| code.to_string());

    Some(LastFmError::ApiError {
        code: code.as_i64(),
        message,
    })
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> LastFmClient {
        LastFmClient::new("https://ws.audioscrobbler.com/2.0/", Duration::from_secs(5)).unwrap()
    }

    fn query_pairs(url: &Url) -> Vec<(String, String)> {
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn test_method_round_trip() {
        for method in [
            ScrobbleMethod::UserInfo,
            ScrobbleMethod::RecentTracks,
            ScrobbleMethod::TopArtists,
            ScrobbleMethod::TopAlbums,
            ScrobbleMethod::TopTracks,
        ] {
            assert_eq!(method.as_str().parse::<ScrobbleMethod>().unwrap(), method);
        }
        assert!(matches!(
            "user.getfriends".parse::<ScrobbleMethod>(),
            Err(LastFmError::UnknownMethod(_))
        ));
    }

    #[test]
    fn test_top_methods_forward_window() {
        let query = ScrobbleQuery::new(ScrobbleMethod::TopAlbums)
            .period("1month")
            .limit(6);
        let url = client().request_url("sksmta", &query).unwrap();
        let pairs = query_pairs(&url);

        assert!(pairs.contains(&("method".into(), "user.gettopalbums".into())));
        assert!(pairs.contains(&("user".into(), "sksmta".into())));
        assert!(pairs.contains(&("format".into(), "json".into())));
        assert!(pairs.contains(&("period".into(), "1month".into())));
        assert!(pairs.contains(&("limit".into(), "6".into())));
    }

    #[test]
    fn test_non_top_methods_drop_window() {
        let query = ScrobbleQuery::new(ScrobbleMethod::RecentTracks).limit(10);
        let url = client().request_url("sksmta", &query).unwrap();
        let keys: Vec<_> = query_pairs(&url).into_iter().map(|(k, _)| k).collect();

        assert!(!keys.contains(&"period".to_string()));
        assert!(!keys.contains(&"limit".to_string()));
    }

    #[test]
    fn test_application_error_detection() {
        let err = application_error(&json!({"error": 6, "message": "User not found"})).unwrap();
        assert_eq!(err.to_string(), "Last.fm API error: User not found");
        assert!(matches!(err, LastFmError::ApiError { code: Some(6), .. }));

        assert!(application_error(&json!({"user": {"name": "x"}})).is_none());
        assert!(application_error(&json!({"error": null})).is_none());
    }

    #[test]
    fn test_http_status_message() {
        let err = LastFmError::HttpStatus {
            status: 503,
            reason: "Service Unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "Last.fm API returned 503: Service Unavailable");
    }
}
