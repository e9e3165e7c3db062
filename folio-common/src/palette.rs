//! Command palette model
//!
//! The palette is opened with Ctrl/Cmd+K on every page. Commands are grouped
//! into a "General" and a "Go To" section, filtered by a case-insensitive
//! substring match on their title, and triggered by a single-letter
//! shortcut (the last key of `G H`-style chords).

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    General,
    Goto,
}

/// What a command does when triggered
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "target", rename_all = "snake_case")]
pub enum CommandAction {
    /// Copy the current page URL to the clipboard
    CopyLink,
    /// Same-tab navigation (site routes and `mailto:` links)
    Navigate(String),
    /// Open in a new tab
    OpenUrl(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Command {
    pub id: &'static str,
    pub title: &'static str,
    pub shortcut: &'static str,
    pub section: Section,
    pub action: CommandAction,
}

impl Command {
    /// Key that triggers this command while the palette is open
    pub fn trigger_key(&self) -> &str {
        self.shortcut.rsplit(' ').next().unwrap_or(self.shortcut)
    }
}

/// Filtered palette contents, one list per section
#[derive(Debug, Clone, Serialize)]
pub struct PaletteView<'a> {
    pub general: Vec<&'a Command>,
    pub goto: Vec<&'a Command>,
}

#[derive(Debug, Clone)]
pub struct Palette {
    commands: Vec<Command>,
}

/// Site routes reachable from the "Go To" section: (id, title, path, key)
const ROUTES: [(&str, &str, &str, &str); 6] = [
    ("home", "Home", "/", "G H"),
    ("about", "About", "/about", "G A"),
    ("projects", "Projects", "/projects", "G P"),
    ("uses", "Uses", "/uses", "G U"),
    ("music", "Music", "/music", "G M"),
    ("contact", "Contact", "/contact", "G C"),
];

impl Palette {
    /// Build the standard command set
    pub fn new(email: &str, source_url: &str) -> Self {
        let mut commands = vec![
            Command {
                id: "copy-link",
                title: "Copy Link",
                shortcut: "L",
                section: Section::General,
                action: CommandAction::CopyLink,
            },
            Command {
                id: "send-email",
                title: "Send Email",
                shortcut: "E",
                section: Section::General,
                action: CommandAction::Navigate(format!("mailto:{}", email)),
            },
            Command {
                id: "view-source",
                title: "View Source",
                shortcut: "S",
                section: Section::General,
                action: CommandAction::OpenUrl(source_url.to_string()),
            },
        ];

        commands.extend(ROUTES.iter().map(|&(id, title, path, shortcut)| Command {
            id,
            title,
            shortcut,
            section: Section::Goto,
            action: CommandAction::Navigate(path.to_string()),
        }));

        Self { commands }
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Commands whose title contains `query` (case-insensitive); empty matches all
    pub fn filter(&self, query: &str) -> Vec<&Command> {
        let needle = query.trim().to_lowercase();
        self.commands
            .iter()
            .filter(|command| command.title.to_lowercase().contains(&needle))
            .collect()
    }

    /// Filtered commands split by section
    pub fn view(&self, query: &str) -> PaletteView<'_> {
        let (general, goto): (Vec<&Command>, Vec<&Command>) = self
            .filter(query)
            .into_iter()
            .partition(|command| command.section == Section::General);
        PaletteView { general, goto }
    }

    /// Command bound to `key` (case-insensitive)
    pub fn by_key(&self, key: &str) -> Option<&Command> {
        self.commands
            .iter()
            .find(|command| command.trigger_key().eq_ignore_ascii_case(key))
    }
}
