//! Command palette listing

use axum::{
    extract::{Query, State},
    Json,
};
use folio_common::content::documents::CONTACT;
use folio_common::content::load_or_fallback;
use folio_common::palette::{Command, Palette};
use serde::{Deserialize, Serialize};

use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CommandParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct CommandList {
    pub general: Vec<Command>,
    pub goto: Vec<Command>,
}

/// GET /api/commands?q=
pub async fn list_commands(
    State(state): State<AppState>,
    Query(params): Query<CommandParams>,
) -> Json<CommandList> {
    let contact = load_or_fallback(state.content.as_ref(), &CONTACT).await;
    let palette = Palette::new(&contact.email, &state.config.site.source_url);
    let view = palette.view(&params.q);

    Json(CommandList {
        general: view.general.into_iter().cloned().collect(),
        goto: view.goto.into_iter().cloned().collect(),
    })
}
