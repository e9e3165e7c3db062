//! Contact page

use axum::{extract::State, response::Html};
use folio_common::content::documents::{CONTACT, CONTACT_INTRO};
use folio_common::content::load_or_fallback;

use super::shell::{escape, layout, list, Chrome};
use crate::AppState;

/// GET /contact
pub async fn contact_page(State(state): State<AppState>) -> Html<String> {
    let source = state.content.as_ref();
    let (chrome, intro, contact) = tokio::join!(
        Chrome::load(&state),
        load_or_fallback(source, &CONTACT_INTRO),
        load_or_fallback(source, &CONTACT),
    );

    let mut links = vec![
        ("GitHub", contact.social.github.as_str()),
        ("LinkedIn", contact.social.linkedin.as_str()),
    ];
    if let Some(twitter) = contact.social.twitter.as_deref() {
        links.push(("Twitter", twitter));
    }
    let social: String = links
        .into_iter()
        .filter(|(_, href)| !href.is_empty())
        .map(|(name, href)| {
            format!(
                "<li><a href=\"{}\" rel=\"noopener\">{}</a></li>",
                escape(href),
                escape(name)
            )
        })
        .collect();

    let body = format!(
        "<section class=\"contact-hero\"><h1>{title}</h1><p class=\"subtitle\">{subtitle}</p><p>{description}</p></section>\
         <section class=\"contact-info\">\
         <p class=\"email\"><a href=\"mailto:{email}\">{email}</a></p>\
         <ul class=\"contact-social\">{social}</ul>\
         <div class=\"availability\"><h2>Availability</h2><p>{status}</p>{types}</div>\
         <div class=\"location\"><h2>Location</h2><p>{current}</p><p class=\"timezone\">{timezone}</p></div>\
         </section>",
        title = escape(&intro.title),
        subtitle = escape(&intro.subtitle),
        description = escape(&intro.description),
        email = escape(&contact.email),
        social = social,
        status = escape(&contact.availability.status),
        types = list("availability-types", &contact.availability.types),
        current = escape(&contact.location.current),
        timezone = escape(&contact.location.timezone),
    );

    layout(&chrome, &intro.title, "/contact", &body)
}
