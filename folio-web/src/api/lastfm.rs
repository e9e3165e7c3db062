//! Last.fm proxy endpoint
//!
//! `GET /api/lastfm/user/:username?method=&period=&limit=` forwards to
//! Last.fm with the site's API key and returns the upstream body unchanged.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{ApiError, ApiResult};
use crate::services::{LastFmError, ScrobbleMethod, ScrobbleQuery};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ScrobbleParams {
    pub method: Option<String>,
    pub period: Option<String>,
    pub limit: Option<String>,
}

impl ScrobbleParams {
    /// Query with defaults for absent or empty parameters
    pub fn into_query(self) -> Result<ScrobbleQuery, LastFmError> {
        let method = match non_blank(self.method) {
            Some(method) => method.parse()?,
            None => ScrobbleMethod::UserInfo,
        };

        let mut query = ScrobbleQuery::new(method);
        if let Some(period) = non_blank(self.period) {
            query.period = period;
        }
        if let Some(limit) = non_blank(self.limit) {
            query.limit = limit;
        }
        Ok(query)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<LastFmError> for ApiError {
    fn from(err: LastFmError) -> Self {
        match err {
            LastFmError::UnknownMethod(_) | LastFmError::ApiError { .. } => {
                ApiError::BadRequest(err.to_string())
            }
            LastFmError::HttpStatus { status, .. } => ApiError::Upstream {
                status,
                message: err.to_string(),
            },
            LastFmError::NetworkError(_) | LastFmError::ParseError => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}

/// GET /api/lastfm/user/:username
pub async fn get_user_data(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(params): Query<ScrobbleParams>,
) -> ApiResult<Json<Value>> {
    let query = params.into_query()?;
    tracing::info!(method = %query.method, username = %username, "Last.fm proxy request");

    let payload = state.lastfm.call(&username, &query).await?;
    Ok(Json(payload))
}
