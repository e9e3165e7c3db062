//! Shared test harness: in-process fake upstreams and app construction
//!
//! One axum server stands in for Last.fm (`/2.0/`), GitHub (`/graphql`,
//! `/users/:user/repos`) and Wikipedia (`/w/api.php`). Usernames select
//! behaviours: `ghost` is unknown everywhere, `down` and `broken` fail, and
//! `garbled` returns non-JSON.

#![allow(dead_code)]

use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use folio_common::config::TomlConfig;
use folio_web::{build_router, AppState};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;

pub const TEST_TOKEN: &str = "test-token";

/// What the fake upstream has been asked
#[derive(Default)]
pub struct UpstreamLog {
    pub lastfm: Mutex<Vec<HashMap<String, String>>>,
    pub graphql_calls: AtomicUsize,
    pub rest_auth: Mutex<Vec<Option<String>>>,
    pub rest_calls: AtomicUsize,
}

impl UpstreamLog {
    pub fn lastfm_queries(&self) -> Vec<HashMap<String, String>> {
        self.lastfm.lock().unwrap().clone()
    }

    pub fn graphql_count(&self) -> usize {
        self.graphql_calls.load(Ordering::SeqCst)
    }

    pub fn rest_count(&self) -> usize {
        self.rest_calls.load(Ordering::SeqCst)
    }
}

/// Serve `router` on an ephemeral local port; returns `http://127.0.0.1:<port>`
pub async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Should bind ephemeral port");
    let address = listener.local_addr().expect("Should have local address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });
    format!("http://{}", address)
}

pub struct FakeUpstream {
    pub base_url: String,
    pub log: Arc<UpstreamLog>,
}

impl FakeUpstream {
    pub async fn start() -> Self {
        let log = Arc::new(UpstreamLog::default());
        let router = Router::new()
            .route("/2.0/", get(lastfm))
            .route("/graphql", post(graphql))
            .route("/users/:user/repos", get(rest_repos))
            .route("/w/api.php", get(wikipedia))
            .with_state(Arc::clone(&log));
        let base_url = spawn_server(router).await;
        Self { base_url, log }
    }
}

// ============================================================================
// Last.fm
// ============================================================================

pub fn lastfm_fixture(method: &str, user: &str) -> Value {
    match method {
        "user.getinfo" => json!({
            "user": {
                "name": user,
                "realname": "Shreyas",
                "playcount": "12345",
                "country": "United Kingdom",
                "registered": {"unixtime": "1672531200", "#text": 1672531200},
                "image": [
                    {"size": "small", "#text": "https://img.test/small.png"},
                    {"size": "large", "#text": "https://img.test/large.png"}
                ],
                "url": format!("https://www.last.fm/user/{}", user)
            }
        }),
        "user.getrecenttracks" => json!({
            "recenttracks": {
                "track": [
                    {
                        "name": "Everything In Its Right Place",
                        "artist": {"#text": "Radiohead"},
                        "album": {"#text": "Kid A"},
                        "image": [{"size": "extralarge", "#text": "https://img.test/kida.png"}],
                        "@attr": {"nowplaying": "true"}
                    },
                    {
                        "name": "Windowlicker",
                        "artist": {"#text": "Aphex Twin"},
                        "album": {"#text": "Windowlicker"},
                        "date": {"uts": "1700000000", "#text": "14 Nov 2023, 22:13"}
                    },
                    {"name": "", "artist": {"#text": "Nobody"}}
                ]
            }
        }),
        "user.gettopartists" => json!({
            "topartists": {"artist": [
                {"name": "Radiohead", "playcount": "420", "url": "https://www.last.fm/music/Radiohead"},
                {"name": "Aphex Twin", "playcount": "99"}
            ]}
        }),
        "user.gettopalbums" => json!({
            "topalbums": {"album": [
                {"name": "Kid A", "artist": {"name": "Radiohead"}, "playcount": "120"}
            ]}
        }),
        "user.gettoptracks" => json!({
            "toptracks": {"track": [
                {"name": "Idioteque", "artist": {"name": "Radiohead"}, "playcount": "40"}
            ]}
        }),
        _ => json!({"error": 3, "message": "Invalid Method - No method with that name in this package"}),
    }
}

async fn lastfm(
    State(log): State<Arc<UpstreamLog>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    log.lastfm.lock().unwrap().push(params.clone());
    let user = params.get("user").cloned().unwrap_or_default();
    let method = params.get("method").cloned().unwrap_or_default();

    match user.as_str() {
        "ghost" => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": 6, "message": "User not found"})),
        )
            .into_response(),
        "down" => (StatusCode::SERVICE_UNAVAILABLE, "upstream maintenance").into_response(),
        "garbled" => (StatusCode::OK, "<html>not json</html>").into_response(),
        "flaky" if method == "user.gettopalbums" => {
            (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response()
        }
        _ => Json(lastfm_fixture(&method, &user)).into_response(),
    }
}

// ============================================================================
// GitHub
// ============================================================================

fn pinned_node(name: &str, stars: u64) -> Value {
    json!({
        "id": format!("R_{}", name),
        "name": name,
        "description": null,
        "url": format!("https://github.com/sksmta/{}", name),
        "homepageUrl": "",
        "primaryLanguage": {"name": "Rust"},
        "stargazerCount": stars,
        "forkCount": 1,
        "repositoryTopics": {"nodes": [{"topic": {"name": "embedded"}}]},
        "updatedAt": "2024-05-01T00:00:00Z",
        "createdAt": "2022-01-01T00:00:00Z",
        "pushedAt": "2024-05-01T00:00:00Z"
    })
}

async fn graphql(
    State(log): State<Arc<UpstreamLog>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    log.graphql_calls.fetch_add(1, Ordering::SeqCst);

    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", TEST_TOKEN))
        .unwrap_or(false);
    if !authorized {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "Bad credentials"}))).into_response();
    }

    let user = body["variables"]["username"].as_str().unwrap_or_default();
    let payload = match user {
        "ghost" => json!({
            "data": {"user": null},
            "errors": [{"message": format!("Could not resolve to a User with the login of '{}'.", user)}]
        }),
        "nopins" | "empty" => json!({"data": {"user": {"pinnedItems": {"nodes": []}}}}),
        "broken" => return (StatusCode::BAD_GATEWAY, "bad gateway").into_response(),
        _ => json!({"data": {"user": {"pinnedItems": {"nodes": [
            pinned_node("telemetry", 5),
            pinned_node("synth", 2)
        ]}}}}),
    };
    Json(payload).into_response()
}

fn rest_repo(id: u64, name: &str, stars: u64, pushed_at: &str, fork: bool) -> Value {
    let description = if id % 2 == 0 {
        Value::Null
    } else {
        json!("A project")
    };
    json!({
        "id": id,
        "name": name,
        "full_name": format!("sksmta/{}", name),
        "description": description,
        "html_url": format!("https://github.com/sksmta/{}", name),
        "homepage": null,
        "language": "Rust",
        "stargazers_count": stars,
        "forks_count": 0,
        "topics": ["rust"],
        "fork": fork,
        "created_at": "2021-01-01T00:00:00Z",
        "updated_at": pushed_at,
        "pushed_at": pushed_at
    })
}

/// Nine repositories, two of them forks with the most stars
pub fn rest_fixture() -> Value {
    json!([
        rest_repo(1, "alpha", 1, "2024-01-01T00:00:00Z", false),
        rest_repo(2, "bravo", 8, "2023-01-01T00:00:00Z", false),
        rest_repo(3, "charlie", 0, "2024-06-01T00:00:00Z", false),
        rest_repo(4, "delta", 3, "2022-01-01T00:00:00Z", false),
        rest_repo(5, "echo", 50, "2024-02-01T00:00:00Z", true),
        rest_repo(6, "foxtrot", 2, "2024-03-01T00:00:00Z", false),
        rest_repo(7, "golf", 0, "2020-01-01T00:00:00Z", false),
        rest_repo(8, "hotel", 70, "2024-04-01T00:00:00Z", true),
        rest_repo(9, "india", 1, "2019-01-01T00:00:00Z", false)
    ])
}

async fn rest_repos(
    State(log): State<Arc<UpstreamLog>>,
    Path(user): Path<String>,
    headers: HeaderMap,
) -> Response {
    log.rest_calls.fetch_add(1, Ordering::SeqCst);
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    log.rest_auth.lock().unwrap().push(auth);

    match user.as_str() {
        "ghost" => (StatusCode::NOT_FOUND, Json(json!({"message": "Not Found"}))).into_response(),
        "broken" => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        "empty" => Json(json!([])).into_response(),
        _ => Json(rest_fixture()).into_response(),
    }
}

// ============================================================================
// Wikipedia
// ============================================================================

async fn wikipedia(Query(params): Query<HashMap<String, String>>) -> Response {
    let title = params.get("titles").cloned().unwrap_or_default();
    match title.as_str() {
        "Radiohead" => Json(json!({
            "batchcomplete": "",
            "query": {"pages": {
                "-1": {"title": "File:Radiohead logo.png", "imageinfo": [{"url": "https://upload.test/Radiohead_logo.png"}]},
                "-2": {"title": "File:Radiohead.jpg", "imageinfo": [{"url": "https://upload.test/Radiohead.jpg"}]},
                "-3": {"title": "File:Commons-logo.svg", "imageinfo": [{"url": "https://upload.test/Commons-logo.svg"}]}
            }}
        }))
        .into_response(),
        "Broken" => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        _ => Json(json!({"batchcomplete": ""})).into_response(),
    }
}

// ============================================================================
// App construction
// ============================================================================

/// Content shipped with the repository (`<workspace>/content`)
pub fn shipped_content_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("..").join("content")
}

pub fn test_config(upstream: &str, content_dir: PathBuf, token: Option<&str>) -> TomlConfig {
    let mut config = TomlConfig::default();
    config.content_dir = content_dir;
    config.github_token = token.map(str::to_string);
    config.upstream.lastfm_url = format!("{}/2.0/", upstream);
    config.upstream.github_api_url = upstream.to_string();
    config.upstream.github_graphql_url = format!("{}/graphql", upstream);
    config.upstream.wikipedia_api_url = format!("{}/w/api.php", upstream);
    config.upstream.timeout_secs = 5;
    config
}

pub struct TestApp {
    pub upstream: FakeUpstream,
    pub state: AppState,
}

impl TestApp {
    pub async fn new(token: Option<&str>) -> Self {
        Self::with_content(token, shipped_content_dir()).await
    }

    pub async fn with_content(token: Option<&str>, content_dir: PathBuf) -> Self {
        Self::with_config(token, content_dir, |_| {}).await
    }

    pub async fn with_config(
        token: Option<&str>,
        content_dir: PathBuf,
        adjust: impl FnOnce(&mut TomlConfig),
    ) -> Self {
        let upstream = FakeUpstream::start().await;
        let mut config = test_config(&upstream.base_url, content_dir, token);
        adjust(&mut config);
        let state = AppState::new(config).expect("Should build app state");
        Self { upstream, state }
    }

    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Run the app on a real port (for HTTP-backed sources)
    pub async fn serve(&self) -> String {
        spawn_server(self.router()).await
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.router()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }
}

pub async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).expect("Body should be UTF-8")
}

pub async fn extract_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("Body should be JSON")
}

pub fn short_timeout() -> Duration {
    Duration::from_secs(5)
}
