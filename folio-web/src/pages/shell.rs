//! Shared page chrome: navigation, social links and the command palette

use axum::response::Html;
use folio_common::content::documents::{Navigation, Social, CONTACT, NAVIGATION, SOCIAL};
use folio_common::content::load_or_fallback;
use folio_common::palette::{Command, Palette};

use crate::AppState;

/// Escape text for HTML element content and double-quoted attributes
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// UK time by default; `palette.js` ticks it and toggles to the visitor's zone
const CLOCK: &str = "<button type=\"button\" class=\"timezone-clock\" data-clock \
     title=\"Click to show your local time\"><span class=\"time-text\">--:--:--</span> \
     <span class=\"timezone-text\">UK</span></button>";

/// Route for a navigation label ("ABOUT" → "/about")
pub fn nav_href(item: &str) -> String {
    let slug = item.trim().to_lowercase();
    if slug.is_empty() || slug == "home" {
        "/".to_string()
    } else {
        format!("/{}", slug.replace(' ', "-"))
    }
}

/// Content shared by every page
pub struct Chrome {
    pub navigation: Navigation,
    pub social: Social,
    pub palette: Palette,
}

impl Chrome {
    pub async fn load(state: &AppState) -> Self {
        let source = state.content.as_ref();
        let (navigation, social, contact) = tokio::join!(
            load_or_fallback(source, &NAVIGATION),
            load_or_fallback(source, &SOCIAL),
            load_or_fallback(source, &CONTACT),
        );
        Self {
            navigation,
            social,
            palette: Palette::new(&contact.email, &state.config.site.source_url),
        }
    }

    fn nav(&self, current: &str) -> String {
        let mut html = String::from("<nav class=\"site-nav\"><a href=\"/\" class=\"brand\">~</a><ul>");
        for item in &self.navigation.items {
            let href = nav_href(item);
            let marker = if href == current { " aria-current=\"page\"" } else { "" };
            html.push_str(&format!(
                "<li><a href=\"{}\"{}>{}</a></li>",
                escape(&href),
                marker,
                escape(item)
            ));
        }
        html.push_str("</ul>");
        html.push_str(CLOCK);
        html.push_str("</nav>");
        html
    }

    fn social(&self) -> String {
        let mut html = String::from("<footer class=\"social\"><ul>");
        for link in &self.social.links {
            html.push_str(&format!(
                "<li><a href=\"{}\" rel=\"me noopener\">{}</a></li>",
                escape(&link.href),
                escape(&link.name)
            ));
        }
        html.push_str("</ul></footer>");
        html
    }

    fn palette(&self) -> String {
        let view = self.palette.view("");
        let mut html = String::from(
            "<div id=\"palette\" class=\"palette\" role=\"dialog\" aria-label=\"Command palette\" hidden>\
             <input id=\"palette-input\" type=\"text\" placeholder=\"Type a command or search...\" autocomplete=\"off\">",
        );
        html.push_str(&palette_section("General", &view.general));
        html.push_str(&palette_section("Go To", &view.goto));
        html.push_str("</div>");

        // `</` cannot appear inside a script element
        let commands = serde_json::to_string(self.palette.commands())
            .unwrap_or_else(|_| "[]".to_string())
            .replace("</", "<\\/");
        html.push_str(&format!(
            "<script type=\"application/json\" id=\"palette-commands\">{}</script>\
             <script src=\"/static/palette.js\" defer></script>",
            commands
        ));
        html
    }
}

fn palette_section(title: &str, commands: &[&Command]) -> String {
    let mut html = format!(
        "<section class=\"palette-section\"><h2>{}</h2><ul>",
        escape(title)
    );
    for command in commands {
        html.push_str(&format!(
            "<li data-command=\"{}\" data-key=\"{}\"><span>{}</span><kbd>{}</kbd></li>",
            escape(command.id),
            escape(command.trigger_key()),
            escape(command.title),
            escape(command.shortcut)
        ));
    }
    html.push_str("</ul></section>");
    html
}

/// Full HTML document around `body`
pub fn layout(chrome: &Chrome, title: &str, current: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n\
         <meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n\
         </head>\n<body>\n{nav}\n<main>\n{body}\n</main>\n{social}\n{palette}\n</body>\n</html>\n",
        title = escape(title),
        nav = chrome.nav(current),
        body = body,
        social = chrome.social(),
        palette = chrome.palette(),
    ))
}

/// `<ul>` of escaped items, or nothing for an empty list
pub fn list(class: &str, items: &[String]) -> String {
    if items.is_empty() {
        return String::new();
    }
    let mut html = format!("<ul class=\"{}\">", escape(class));
    for item in items {
        html.push_str(&format!("<li>{}</li>", escape(item)));
    }
    html.push_str("</ul>");
    html
}
