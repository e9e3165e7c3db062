//! Pinned repositories endpoint

use axum::{
    extract::{Path, State},
    Json,
};
use folio_common::models::PinnedRepos;

use crate::error::{ApiError, ApiResult};
use crate::services::GitHubError;
use crate::AppState;

impl From<GitHubError> for ApiError {
    fn from(err: GitHubError) -> Self {
        match err {
            GitHubError::UserNotFound => ApiError::NotFound(err.to_string()),
            _ => ApiError::Internal(err.to_string()),
        }
    }
}

/// GET /api/github/pinned/:username
///
/// `{repos, source}` where `source` is `"graphql"` for pinned items and
/// `"rest"` for the ranked fallback.
pub async fn get_pinned_repos(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<Json<PinnedRepos>> {
    tracing::info!(username = %username, "Pinned repositories request");
    let pinned = state.github.pinned_repos(&username).await.map_err(|e| {
        tracing::error!(username = %username, error = %e, "Pinned repositories failed");
        ApiError::from(e)
    })?;
    Ok(Json(pinned))
}
