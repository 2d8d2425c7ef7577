//! CMS content router binary.
//!
//! Loads the site configuration, binds the listener, and serves the
//! routing engine over HTTP.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cms_router::config::{load_config, validate_config, CmsConfig, ConfigError};
use cms_router::HttpServer;

#[derive(Parser)]
#[command(name = "cms-router")]
#[command(about = "URL router for published CMS content", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. Defaults are used when
    /// omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => {
            let config = CmsConfig::default();
            validate_config(&config).map_err(ConfigError::Validation)?;
            config
        }
    };

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(format!(
                    "cms_router={},tower_http=info",
                    config.observability.log_level
                ))
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        content_path = %config.content_path.display(),
        default_document = %config.default_document,
        strict_url_resolution = config.strict_url_resolution,
        passthru_timeout_secs = config.passthru_timeout_secs,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(&config);
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
