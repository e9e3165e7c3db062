//! folio-web - portfolio site server
//!
//! Configuration resolves CLI > environment > TOML file > defaults.

use anyhow::Result;
use clap::Parser;
use folio_common::config::{
    resolve_config, ConfigOverrides, ENV_BIND_ADDRESS, ENV_CONFIG_PATH, ENV_CONTENT_DIR, ENV_PORT,
};
use folio_web::{build_router, AppState};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "folio-web", version, about = "Portfolio site server")]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = ENV_CONFIG_PATH)]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long, env = ENV_BIND_ADDRESS)]
    bind: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = ENV_PORT)]
    port: Option<u16>,

    /// Directory holding `data/*.json`
    #[arg(long, env = ENV_CONTENT_DIR)]
    content_dir: Option<PathBuf>,
}

impl Args {
    fn overrides(self) -> ConfigOverrides {
        ConfigOverrides {
            config_path: self.config,
            bind_address: self.bind,
            port: self.port,
            content_dir: self.content_dir,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // RUST_LOG wins over the configured level; until the config is read, log at info
    let from_env = EnvFilter::try_from_default_env().ok();
    let has_env_filter = from_env.is_some();
    let (filter, filter_handle) =
        reload::Layer::new(from_env.unwrap_or_else(|| EnvFilter::new("info")));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = resolve_config(&args.overrides())?;

    if !has_env_filter {
        filter_handle.reload(EnvFilter::new(&config.logging.level))?;
    }

    info!(
        "Starting folio-web v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    info!("Content directory: {}", config.data_dir().display());
    if !config.data_dir().is_dir() {
        warn!("Content directory missing, pages will use built-in fallback text");
    }
    if config.github_token().is_none() {
        info!("No GitHub token configured, repositories come from the REST API");
    }

    let address = config.listen_address();
    let state = AppState::new(config)?;
    let app = build_router(state.clone());

    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("folio-web listening on http://{}", address);
    info!("Health check: http://{}/health", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await?;

    info!("folio-web stopped");
    Ok(())
}

async fn shutdown_signal(state: AppState) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
    state.close_feeds();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::ffi::OsStr;

    #[test]
    fn test_args_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_args_fall_back_to_environment() {
        let command = Args::command();
        let env_of = |id: &str| {
            command
                .get_arguments()
                .find(|arg| arg.get_id() == id)
                .and_then(|arg| arg.get_env())
                .map(OsStr::to_os_string)
        };
        assert_eq!(env_of("port"), Some(ENV_PORT.into()));
        assert_eq!(env_of("config"), Some(ENV_CONFIG_PATH.into()));
        assert_eq!(env_of("bind"), Some(ENV_BIND_ADDRESS.into()));
        assert_eq!(env_of("content_dir"), Some(ENV_CONTENT_DIR.into()));
    }

    #[test]
    fn test_cli_values_become_overrides() {
        let args = Args::try_parse_from(["folio-web", "--port", "8123", "--bind", "0.0.0.0"]).unwrap();
        let overrides = args.overrides();
        assert_eq!(overrides.port, Some(8123));
        assert_eq!(overrides.bind_address.as_deref(), Some("0.0.0.0"));
    }
}
