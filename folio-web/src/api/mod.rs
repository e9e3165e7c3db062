//! HTTP API handlers for folio-web

pub mod buildinfo;
pub mod commands;
pub mod github;
pub mod health;
pub mod lastfm;
pub mod wiki_image;

pub use buildinfo::get_build_info;
pub use commands::list_commands;
pub use github::get_pinned_repos;
pub use health::health_routes;
pub use lastfm::get_user_data;
pub use wiki_image::get_wiki_image;
