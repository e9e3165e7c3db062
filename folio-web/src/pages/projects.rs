//! Projects page: curated projects plus the ranked GitHub feed

use axum::{extract::State, response::Html};
use chrono::Utc;
use folio_common::content::documents::{Project, PROJECTS, PROJECTS_INTRO};
use folio_common::content::load_or_fallback;
use folio_common::human_time::relative_age_str;

use super::shell::{escape, layout, list, Chrome};
use crate::feeds::{RankedRepo, RepoFeedView};
use crate::AppState;

const DEFAULT_LANGUAGE_COLOR: &str = "#9ca3af";

/// GitHub linguist colour for a language
pub fn language_color(language: Option<&str>) -> &'static str {
    match language.unwrap_or("") {
        "JavaScript" => "#f1e05a",
        "TypeScript" => "#3178c6",
        "Python" => "#3572A5",
        "Java" => "#b07219",
        "C++" => "#f34b7d",
        "C" => "#555555",
        "Go" => "#00ADD8",
        "Rust" => "#dea584",
        "PHP" => "#4F5D95",
        "Ruby" => "#701516",
        "Swift" => "#fa7343",
        "Kotlin" => "#A97BFF",
        "Dart" => "#00B4AB",
        "HTML" => "#e34c26",
        "CSS" => "#1572B6",
        "Vue" => "#4FC08D",
        "React" => "#61DAFB",
        _ => DEFAULT_LANGUAGE_COLOR,
    }
}

/// Friendly name for a GitHub account
pub fn account_display_name(username: &str) -> &str {
    match username {
        "sksmta" => "Shreyas Samanta",
        "rhygg" => "Rhygg",
        other => other,
    }
}

fn project_card(project: &Project) -> String {
    let mut links = String::new();
    for (label, href) in [
        ("Code", project.links.github.as_deref()),
        ("Live", project.links.live.as_deref()),
        ("Demo", project.links.demo.as_deref()),
    ] {
        if let Some(href) = href.filter(|h| !h.is_empty()) {
            links.push_str(&format!(
                "<a href=\"{}\" rel=\"noopener\">{}</a>",
                escape(href),
                label
            ));
        }
    }

    // Collapsed by default; the long description is the expandable part
    let details = project
        .long_description
        .as_deref()
        .map(|long| {
            format!(
                "<details><summary>More</summary><p>{}</p>{}</details>",
                escape(long),
                list("highlights", &project.highlights)
            )
        })
        .unwrap_or_else(|| list("highlights", &project.highlights));

    let status = project
        .status
        .as_deref()
        .map(|s| format!("<span class=\"status\">{}</span>", escape(s)))
        .unwrap_or_default();

    format!(
        "<article class=\"project\" id=\"project-{id}\" data-category=\"{category}\">\
         <h3>{title}</h3><p class=\"meta\">{year}{status}</p><p>{description}</p>\
         {details}{technologies}<p class=\"links\">{links}</p></article>",
        id = escape(&project.id),
        category = escape(&project.category),
        title = escape(&project.title),
        year = escape(&project.year),
        status = status,
        description = escape(&project.description),
        details = details,
        technologies = list("tags", &project.technologies),
        links = links,
    )
}

fn repo_card(entry: &RankedRepo) -> String {
    let repo = &entry.repo;
    let updated = relative_age_str(&repo.last_updated, Utc::now())
        .map(|age| format!("<span class=\"updated\">Updated {}</span>", age))
        .unwrap_or_default();
    let language = repo
        .language
        .as_deref()
        .map(|lang| {
            format!(
                "<span class=\"language\"><span class=\"dot\" style=\"background: {}\"></span>{}</span>",
                language_color(Some(lang)),
                escape(lang)
            )
        })
        .unwrap_or_default();
    let homepage = repo
        .homepage
        .as_deref()
        .filter(|h| !h.is_empty())
        .map(|h| format!("<a href=\"{}\" rel=\"noopener\">Website</a>", escape(h)))
        .unwrap_or_default();

    format!(
        "<article class=\"repo\" id=\"github-repo-{id}\">\
         <h3><a href=\"{url}\" rel=\"noopener\">{name}</a></h3>\
         <p class=\"owner\">{owner}</p><p>{description}</p>{topics}\
         <p class=\"stats\">{language}<span class=\"stars\">★ {stars}</span><span class=\"forks\">⑂ {forks}</span>{updated}</p>\
         {homepage}</article>",
        id = escape(&repo.id),
        url = escape(&repo.url),
        name = escape(&repo.name),
        owner = escape(account_display_name(&entry.username)),
        description = escape(&repo.description),
        topics = list("topics", &repo.topics),
        language = language,
        stars = repo.stars,
        forks = repo.forks,
        updated = updated,
        homepage = homepage,
    )
}

fn github_section(view: &RepoFeedView) -> String {
    let mut html = String::from("<section class=\"github-projects\"><h2>GitHub Projects</h2>");

    if view.loading {
        html.push_str("<p class=\"loading\">Fetching repositories from GitHub...</p></section>");
        return html;
    }

    if let Some(error) = &view.error {
        html.push_str(&format!(
            "<p class=\"warning\" role=\"status\">{}</p><a class=\"retry\" href=\"/projects\">Retry</a>",
            escape(error)
        ));
    }

    let ranked = view.ranked();
    if ranked.is_empty() {
        html.push_str("<p class=\"empty\">No repositories to show.</p>");
    } else {
        html.push_str("<div class=\"repo-grid\">");
        for entry in &ranked {
            html.push_str(&repo_card(entry));
        }
        html.push_str("</div>");
    }
    html.push_str("</section>");
    html
}

/// GET /projects
pub async fn projects_page(State(state): State<AppState>) -> Html<String> {
    let feed = state.repo_feed();
    let source = state.content.as_ref();
    let (chrome, intro, projects, _) = tokio::join!(
        Chrome::load(&state),
        load_or_fallback(source, &PROJECTS_INTRO),
        load_or_fallback(source, &PROJECTS),
        feed.load(),
    );
    let repos = feed.view().await;
    feed.close();

    let mut body = format!(
        "<section class=\"projects-hero\"><h1>{}</h1><p class=\"subtitle\">{}</p></section>",
        escape(&intro.title),
        escape(&intro.subtitle)
    );

    for (title, group) in [("Featured", &projects.featured), ("Other Projects", &projects.other)] {
        if group.is_empty() {
            continue;
        }
        body.push_str(&format!("<section class=\"projects\"><h2>{}</h2>", title));
        for project in group {
            body.push_str(&project_card(project));
        }
        body.push_str("</section>");
    }

    body.push_str(&github_section(&repos));

    layout(&chrome, &intro.title, "/projects", &body)
}
