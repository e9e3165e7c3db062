//! Image lookup endpoint

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct WikiImageParams {
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WikiImageResponse {
    pub image: String,
}

/// GET /api/wiki-image?name=
///
/// Always 200; falls back to an Unsplash search URL.
pub async fn get_wiki_image(
    State(state): State<AppState>,
    Query(params): Query<WikiImageParams>,
) -> Json<WikiImageResponse> {
    let name = params.name.unwrap_or_default();
    let image = state.wiki.resolve_image(&name).await;
    Json(WikiImageResponse { image })
}
