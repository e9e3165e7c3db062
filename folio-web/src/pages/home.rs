//! Landing page

use axum::{extract::State, response::Html};
use folio_common::content::documents::HERO;
use folio_common::content::load_or_fallback;

use super::shell::{escape, layout, Chrome};
use crate::AppState;

/// GET /
pub async fn home_page(State(state): State<AppState>) -> Html<String> {
    let (chrome, hero) = tokio::join!(
        Chrome::load(&state),
        load_or_fallback(state.content.as_ref(), &HERO)
    );

    let body = format!(
        "<section class=\"hero\">\
         <h1>{}</h1><p class=\"subtitle\">{}</p><p>{}</p>\
         <button type=\"button\" class=\"cta\" data-open-palette>{}</button>\
         </section>",
        escape(&hero.name),
        escape(&hero.subtitle),
        escape(&hero.description),
        escape(&hero.cta)
    );

    layout(&chrome, &hero.name, "/", &body)
}
