//! Uses page: tools and gear by category

use axum::{extract::State, response::Html};
use folio_common::content::documents::{USES, USES_INTRO};
use folio_common::content::load_or_fallback;

use super::shell::{escape, layout, Chrome};
use crate::AppState;

/// GET /uses
pub async fn uses_page(State(state): State<AppState>) -> Html<String> {
    let source = state.content.as_ref();
    let (chrome, intro, uses) = tokio::join!(
        Chrome::load(&state),
        load_or_fallback(source, &USES_INTRO),
        load_or_fallback(source, &USES),
    );

    let mut body = format!(
        "<section class=\"uses-hero\"><h1>{}</h1><p class=\"subtitle\">{}</p></section>",
        escape(&intro.title),
        escape(&intro.subtitle)
    );

    for category in &uses.categories {
        body.push_str(&format!(
            "<section class=\"uses-category\" id=\"{}\" data-icon=\"{}\"><h2>{}</h2><ul>",
            escape(&category.id),
            escape(&category.icon),
            escape(&category.title)
        ));
        for item in &category.items {
            body.push_str(&format!(
                "<li style=\"--accent: {}\"><a href=\"{}\" rel=\"noopener\">{}</a>\
                 <span class=\"category\">{}</span><p>{}</p></li>",
                escape(&item.color),
                escape(&item.url),
                escape(&item.name),
                escape(&item.category),
                escape(&item.description)
            ));
        }
        body.push_str("</ul></section>");
    }

    layout(&chrome, &intro.title, "/uses", &body)
}
