//! Server-rendered page shells

pub mod about;
pub mod contact;
pub mod home;
pub mod music;
pub mod projects;
pub mod shell;
pub mod uses;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use crate::AppState;

const PALETTE_JS: &str = include_str!("../../static/palette.js");

/// GET /static/palette.js
pub async fn serve_palette_js() -> Response {
    (
        StatusCode::OK,
        [("content-type", "application/javascript")],
        PALETTE_JS,
    )
        .into_response()
}

/// Build page routes
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home_page))
        .route("/about", get(about::about_page))
        .route("/projects", get(projects::projects_page))
        .route("/music", get(music::music_page))
        .route("/contact", get(contact::contact_page))
        .route("/uses", get(uses::uses_page))
        .route("/static/palette.js", get(serve_palette_js))
}
