//! Bootstrap configuration loading
//!
//! Resolution priority (highest first):
//! 1. Command-line arguments
//! 2. Environment variables (`FOLIO_CONFIG`, `FOLIO_BIND`, `FOLIO_PORT`,
//!    `FOLIO_CONTENT_DIR`, `GITHUB_TOKEN`)
//! 3. TOML configuration file
//! 4. Built-in defaults

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming an explicit config file
pub const ENV_CONFIG_PATH: &str = "FOLIO_CONFIG";
/// Environment variable overriding the bind address
pub const ENV_BIND_ADDRESS: &str = "FOLIO_BIND";
/// Environment variable overriding the listen port
pub const ENV_PORT: &str = "FOLIO_PORT";
/// Environment variable overriding the static content root
pub const ENV_CONTENT_DIR: &str = "FOLIO_CONTENT_DIR";
/// Environment variable holding the code-hosting graph query credential
pub const ENV_GITHUB_TOKEN: &str = "GITHUB_TOKEN";

/// Bootstrap configuration loaded from TOML
///
/// Every field has a built-in default so an empty file (or no file at all)
/// yields a runnable configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Interface to bind the HTTP server to
    pub bind_address: String,

    /// HTTP server port
    pub port: u16,

    /// Root of the static content store (JSON documents live in `data/`)
    pub content_dir: PathBuf,

    /// Credential for the code-hosting graph query (optional)
    pub github_token: Option<String>,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Upstream service endpoints
    pub upstream: UpstreamConfig,

    /// Site identity (which accounts to feature)
    pub site: SiteConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

/// Base URLs of the third-party services the proxies talk to
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub lastfm_url: String,
    pub github_api_url: String,
    pub github_graphql_url: String,
    pub wikipedia_api_url: String,
    /// Per-request timeout applied by the HTTP clients
    pub timeout_secs: u64,
}

/// Accounts featured on the site
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Scrobble service account shown on the music page
    pub lastfm_username: String,
    /// Code-hosting accounts aggregated on the projects page
    pub github_usernames: Vec<String>,
    /// Where the site's own source lives ("View Source" command)
    pub source_url: String,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 5730,
            content_dir: PathBuf::from("content"),
            github_token: None,
            logging: LoggingConfig::default(),
            upstream: UpstreamConfig::default(),
            site: SiteConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            lastfm_url: "https://ws.audioscrobbler.com/2.0/".to_string(),
            github_api_url: "https://api.github.com".to_string(),
            github_graphql_url: "https://api.github.com/graphql".to_string(),
            wikipedia_api_url: "https://en.wikipedia.org/w/api.php".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            lastfm_username: "sksmta".to_string(),
            github_usernames: vec!["sksmta".to_string(), "rhygg".to_string()],
            source_url: "https://github.com/sksmta/website".to_string(),
        }
    }
}

impl TomlConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// `host:port` string for the listener
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// Directory holding the JSON content documents
    pub fn data_dir(&self) -> PathBuf {
        self.content_dir.join("data")
    }

    /// Graph query credential, if one is configured
    ///
    /// Blank values count as absent.
    pub fn github_token(&self) -> Option<&str> {
        self.github_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub content_dir: Option<PathBuf>,
}

/// Default per-user config file location (`<config dir>/folio/folio.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("folio").join("folio.toml"))
}

/// Resolve the effective configuration from all tiers
///
/// An explicitly named config file (CLI or `FOLIO_CONFIG`) must exist; the
/// default location is only read when present.
pub fn resolve_config(overrides: &ConfigOverrides) -> Result<TomlConfig> {
    let explicit = overrides
        .config_path
        .clone()
        .or_else(|| std::env::var(ENV_CONFIG_PATH).ok().map(PathBuf::from));

    let mut config = match explicit {
        Some(path) => {
            info!("Loading config file {}", path.display());
            TomlConfig::load(&path)?
        }
        None => match default_config_path().filter(|p| p.exists()) {
            Some(path) => {
                info!("Loading config file {}", path.display());
                TomlConfig::load(&path)?
            }
            None => {
                debug!("No config file found, using built-in defaults");
                TomlConfig::default()
            }
        },
    };

    apply_env(&mut config)?;

    if let Some(bind) = &overrides.bind_address {
        config.bind_address = bind.clone();
    }
    if let Some(port) = overrides.port {
        config.port = port;
    }
    if let Some(dir) = &overrides.content_dir {
        config.content_dir = dir.clone();
    }

    Ok(config)
}

fn apply_env(config: &mut TomlConfig) -> Result<()> {
    if let Ok(bind) = std::env::var(ENV_BIND_ADDRESS) {
        config.bind_address = bind;
    }

    if let Ok(port) = std::env::var(ENV_PORT) {
        config.port = port
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("{} is not a valid port: {:?}", ENV_PORT, port)))?;
    }

    if let Ok(dir) = std::env::var(ENV_CONTENT_DIR) {
        config.content_dir = PathBuf::from(dir);
    }

    // Environment wins over the file; a blank variable does not erase a file value.
    if let Ok(token) = std::env::var(ENV_GITHUB_TOKEN) {
        if !token.trim().is_empty() {
            config.github_token = Some(token);
        }
    }

    Ok(())
}
