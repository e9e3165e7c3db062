//! Proxy and JSON API tests against the in-process fake upstream

mod helpers;

use axum::http::StatusCode;
use helpers::{body_text, extract_json, TestApp, TEST_TOKEN};
use serde_json::Value;

// ============================================================================
// Last.fm proxy
// ============================================================================

#[tokio::test]
async fn test_lastfm_user_info_passthrough() {
    let app = TestApp::new(None).await;

    let response = app.get("/api/lastfm/user/sksmta?method=user.getinfo").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response).await;
    assert_eq!(body["user"]["name"], "sksmta");
    assert_eq!(body["user"]["playcount"], "12345");
}

#[tokio::test]
async fn test_lastfm_defaults_to_user_info() {
    let app = TestApp::new(None).await;

    let response = app.get("/api/lastfm/user/sksmta").await;
    assert_eq!(response.status(), StatusCode::OK);

    let queries = app.upstream.log.lastfm_queries();
    assert_eq!(queries.len(), 1);
    let query = &queries[0];
    assert_eq!(query.get("method").map(String::as_str), Some("user.getinfo"));
    assert_eq!(query.get("user").map(String::as_str), Some("sksmta"));
    assert_eq!(query.get("format").map(String::as_str), Some("json"));
    assert!(query.contains_key("api_key"));
    assert!(!query.contains_key("period"));
    assert!(!query.contains_key("limit"));
}

#[tokio::test]
async fn test_lastfm_top_methods_forward_window() {
    let app = TestApp::new(None).await;

    let response = app
        .get("/api/lastfm/user/sksmta?method=user.gettopartists&period=1month&limit=8")
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response).await;
    assert_eq!(body["topartists"]["artist"][0]["name"], "Radiohead");

    let queries = app.upstream.log.lastfm_queries();
    assert_eq!(queries[0].get("period").map(String::as_str), Some("1month"));
    assert_eq!(queries[0].get("limit").map(String::as_str), Some("8"));
}

#[tokio::test]
async fn test_lastfm_top_methods_default_window() {
    let app = TestApp::new(None).await;

    app.get("/api/lastfm/user/sksmta?method=user.gettoptracks").await;

    let queries = app.upstream.log.lastfm_queries();
    assert_eq!(queries[0].get("period").map(String::as_str), Some("overall"));
    assert_eq!(queries[0].get("limit").map(String::as_str), Some("10"));
}

#[tokio::test]
async fn test_lastfm_recent_tracks_drop_window() {
    let app = TestApp::new(None).await;

    app.get("/api/lastfm/user/sksmta?method=user.getrecenttracks&period=7day&limit=3")
        .await;

    let queries = app.upstream.log.lastfm_queries();
    assert!(!queries[0].contains_key("period"));
    assert!(!queries[0].contains_key("limit"));
}

#[tokio::test]
async fn test_lastfm_unknown_method_is_400() {
    let app = TestApp::new(None).await;

    let response = app.get("/api/lastfm/user/sksmta?method=user.getfriends").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("user.getfriends"));
    assert!(app.upstream.log.lastfm_queries().is_empty());
}

#[tokio::test]
async fn test_lastfm_unknown_user_is_400_with_upstream_message() {
    let app = TestApp::new(None).await;

    let response = app.get("/api/lastfm/user/ghost?method=user.getinfo").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response).await;
    assert_eq!(body["error"], "Last.fm API error: User not found");
}

#[tokio::test]
async fn test_lastfm_http_error_status_propagates() {
    let app = TestApp::new(None).await;

    let response = app.get("/api/lastfm/user/down").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = extract_json(response).await;
    assert_eq!(body["error"], "Last.fm API returned 503: Service Unavailable");
}

#[tokio::test]
async fn test_lastfm_invalid_json_is_500() {
    let app = TestApp::new(None).await;

    let response = app.get("/api/lastfm/user/garbled").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = extract_json(response).await;
    assert_eq!(body["error"], "Invalid JSON response from Last.fm API");
}

// ============================================================================
// GitHub proxy
// ============================================================================

fn repo_names(body: &Value) -> Vec<String> {
    body["repos"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_github_without_token_uses_ranked_rest() {
    let app = TestApp::new(None).await;

    let response = app.get("/api/github/pinned/sksmta").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response).await;
    assert_eq!(body["source"], "rest");

    let names = repo_names(&body);
    assert!(names.len() <= 6);
    assert!(!names.contains(&"echo".to_string()));
    assert!(!names.contains(&"hotel".to_string()));
    assert_eq!(
        names,
        vec!["charlie", "foxtrot", "alpha", "bravo", "delta", "golf"]
    );

    assert_eq!(app.upstream.log.graphql_count(), 0);
    assert_eq!(*app.upstream.log.rest_auth.lock().unwrap(), vec![None]);
}

#[tokio::test]
async fn test_github_rest_normalization() {
    let app = TestApp::new(None).await;

    let body = extract_json(app.get("/api/github/pinned/sksmta").await).await;
    let bravo = body["repos"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["name"] == "bravo")
        .expect("bravo should be ranked");

    assert_eq!(bravo["id"], "2");
    assert_eq!(bravo["description"], "");
    assert_eq!(bravo["url"], "https://github.com/sksmta/bravo");
    assert_eq!(bravo["stars"], 8);
    assert_eq!(bravo["topics"], serde_json::json!(["rust"]));
    assert_eq!(bravo["lastUpdated"], "2023-01-01T00:00:00Z");
    assert!(bravo["homepage"].is_null());
}

#[tokio::test]
async fn test_github_with_token_uses_graphql() {
    let app = TestApp::new(Some(TEST_TOKEN)).await;

    let response = app.get("/api/github/pinned/sksmta").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response).await;
    assert_eq!(body["source"], "graphql");
    assert_eq!(repo_names(&body), vec!["telemetry", "synth"]);

    let telemetry = &body["repos"][0];
    assert_eq!(telemetry["id"], "R_telemetry");
    assert_eq!(telemetry["description"], "");
    assert_eq!(telemetry["language"], "Rust");
    assert_eq!(telemetry["forks"], 1);
    assert_eq!(telemetry["topics"], serde_json::json!(["embedded"]));
    assert_eq!(telemetry["lastUpdated"], "2024-05-01T00:00:00Z");

    assert_eq!(app.upstream.log.rest_count(), 0);
}

#[tokio::test]
async fn test_github_no_pinned_items_falls_back_to_rest() {
    let app = TestApp::new(Some(TEST_TOKEN)).await;

    let body = extract_json(app.get("/api/github/pinned/nopins").await).await;
    assert_eq!(body["source"], "rest");
    assert!(!repo_names(&body).is_empty());

    assert_eq!(app.upstream.log.graphql_count(), 1);
    assert_eq!(
        *app.upstream.log.rest_auth.lock().unwrap(),
        vec![Some(format!("token {}", TEST_TOKEN))]
    );
}

#[tokio::test]
async fn test_github_graphql_failure_falls_back_to_rest() {
    let app = TestApp::new(Some(TEST_TOKEN)).await;

    let body = extract_json(app.get("/api/github/pinned/broken").await).await;
    // GraphQL 502, then the REST listing also fails
    assert_eq!(body["error"], "GitHub API returned 500");
    assert_eq!(app.upstream.log.rest_count(), 1);
}

#[tokio::test]
async fn test_github_unknown_user_is_404() {
    let app = TestApp::new(Some(TEST_TOKEN)).await;

    let response = app.get("/api/github/pinned/ghost").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = extract_json(response).await;
    assert_eq!(body["error"], "User not found");
}

#[tokio::test]
async fn test_github_zero_repositories_is_empty_list() {
    let app = TestApp::new(None).await;

    let response = app.get("/api/github/pinned/empty").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response).await;
    assert_eq!(body["repos"], serde_json::json!([]));
    assert_eq!(body["source"], "rest");
}

#[tokio::test]
async fn test_github_upstream_error_is_500() {
    let app = TestApp::new(None).await;

    let response = app.get("/api/github/pinned/broken").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = extract_json(response).await;
    assert_eq!(body["error"], "GitHub API returned 500");
}

// ============================================================================
// Image lookup
// ============================================================================

#[tokio::test]
async fn test_wiki_image_skips_logos() {
    let app = TestApp::new(None).await;

    let response = app.get("/api/wiki-image?name=Radiohead").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response).await;
    assert_eq!(body["image"], "https://upload.test/Radiohead.jpg");
}

#[tokio::test]
async fn test_wiki_image_without_match_uses_fallback() {
    let app = TestApp::new(None).await;

    let body = extract_json(app.get("/api/wiki-image?name=Boards%20of%20Canada").await).await;
    assert_eq!(
        body["image"],
        "https://source.unsplash.com/400x400/?Boards%20of%20Canada,music"
    );
}

#[tokio::test]
async fn test_wiki_image_upstream_error_still_200() {
    let app = TestApp::new(None).await;

    let response = app.get("/api/wiki-image?name=Broken").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response).await;
    assert_eq!(body["image"], "https://source.unsplash.com/400x400/?Broken,music");
}

#[tokio::test]
async fn test_wiki_image_missing_name_still_200() {
    let app = TestApp::new(None).await;

    let response = app.get("/api/wiki-image").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response).await;
    assert_eq!(body["image"], "https://source.unsplash.com/400x400/?music");
}

// ============================================================================
// Site endpoints
// ============================================================================

#[tokio::test]
async fn test_health() {
    let app = TestApp::new(None).await;

    let response = app.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "folio-web");
    assert!(body["uptime_seconds"].is_u64());
}

#[tokio::test]
async fn test_buildinfo() {
    let app = TestApp::new(None).await;

    let body = extract_json(app.get("/api/buildinfo").await).await;
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["git_hash"].is_string());
    assert!(body["build_profile"].is_string());
}

#[tokio::test]
async fn test_commands_filtering() {
    let app = TestApp::new(None).await;

    let body = extract_json(app.get("/api/commands").await).await;
    assert_eq!(body["general"].as_array().unwrap().len(), 3);
    assert_eq!(body["goto"].as_array().unwrap().len(), 6);

    let body = extract_json(app.get("/api/commands?q=MUS").await).await;
    assert!(body["general"].as_array().unwrap().is_empty());
    assert_eq!(body["goto"][0]["id"], "music");
    assert_eq!(body["goto"][0]["action"]["target"], "/music");
}

#[tokio::test]
async fn test_commands_email_comes_from_contact_document() {
    let app = TestApp::new(None).await;

    let body = extract_json(app.get("/api/commands?q=email").await).await;
    let target = body["general"][0]["action"]["target"].as_str().unwrap();
    assert!(target.starts_with("mailto:"));
    assert!(target.len() > "mailto:".len());
}

#[tokio::test]
async fn test_data_files_served_verbatim() {
    let app = TestApp::new(None).await;

    let response = app.get("/data/contact.json").await;
    assert_eq!(response.status(), StatusCode::OK);

    let served = body_text(response).await;
    let on_disk = std::fs::read_to_string(helpers::shipped_content_dir().join("data/contact.json"))
        .unwrap();
    assert_eq!(served, on_disk);

    let response = app.get("/data/missing.json").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
