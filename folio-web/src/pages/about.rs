//! About page: introduction, experience and education timelines

use axum::{extract::State, response::Html};
use folio_common::content::documents::{
    Education, Experience, ABOUT, EDUCATION, EXPERIENCE,
};
use folio_common::content::load_or_fallback;

use super::shell::{escape, layout, list, Chrome};
use crate::AppState;

fn experience_section(experience: &Experience) -> String {
    let mut html = format!(
        "<section class=\"experience\"><h2>{}</h2><ol class=\"timeline\">",
        escape(&experience.title)
    );
    for item in &experience.items {
        html.push_str(&format!(
            "<li id=\"experience-{}\"><h3>{} <span class=\"at\">@ {}</span></h3>\
             <p class=\"meta\">{} &middot; {} – {}</p>{}{}</li>",
            escape(&item.id),
            escape(&item.position),
            escape(&item.company),
            escape(&item.location),
            escape(&item.start_date),
            escape(&item.end_date),
            list("details", &item.description),
            list("tags", &item.technologies)
        ));
    }
    html.push_str("</ol></section>");
    html
}

fn education_section(education: &Education) -> String {
    let mut html = format!(
        "<section class=\"education\"><h2>{}</h2><ol class=\"timeline\">",
        escape(&education.title)
    );
    for item in &education.items {
        let gpa = item
            .gpa
            .as_deref()
            .map(|gpa| format!("<p class=\"gpa\">{}</p>", escape(gpa)))
            .unwrap_or_default();
        html.push_str(&format!(
            "<li id=\"education-{}\"><h3>{}, {}</h3><p class=\"meta\">{} &middot; {} &middot; {} – {}</p>{}{}</li>",
            escape(&item.id),
            escape(&item.degree),
            escape(&item.field),
            escape(&item.institution),
            escape(&item.location),
            escape(&item.start_date),
            escape(&item.end_date),
            gpa,
            list("achievements", &item.achievements)
        ));
    }
    html.push_str("</ol></section>");
    html
}

/// GET /about
pub async fn about_page(State(state): State<AppState>) -> Html<String> {
    let source = state.content.as_ref();
    let (chrome, about, experience, education) = tokio::join!(
        Chrome::load(&state),
        load_or_fallback(source, &ABOUT),
        load_or_fallback(source, &EXPERIENCE),
        load_or_fallback(source, &EDUCATION),
    );

    let mut body = format!("<section class=\"about\"><h1>{}</h1>", escape(&about.title));
    for paragraph in &about.paragraphs {
        body.push_str(&format!("<p>{}</p>", escape(paragraph)));
    }
    body.push_str("</section>");
    body.push_str(&experience_section(&experience));
    body.push_str(&education_section(&education));

    layout(&chrome, &about.title, "/about", &body)
}
