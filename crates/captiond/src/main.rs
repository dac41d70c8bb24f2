//! captiond - Caption relay daemon
//!
//! Usage:
//!   captiond [OPTIONS]
//!
//! The upstream URL and subscription key are required, either as flags,
//! environment variables, or in the `--config` TOML file.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use captiond::build_app;
use captiond::config::{ConfigOverrides, FileConfig, RelayConfig};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "captiond")]
#[command(author, version, about = "Relay image uploads to a cloud vision API")]
struct Cli {
    /// Listen port (default: 3000)
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Upstream analyze endpoint, including API version and features
    #[arg(short, long, env = "CAPTION_UPSTREAM_URL")]
    upstream_url: Option<String>,

    /// Subscription key sent as Ocp-Apim-Subscription-Key
    #[arg(long, env = "CAPTION_SUBSCRIPTION_KEY", hide_env_values = true)]
    subscription_key: Option<String>,

    /// TOML config file
    #[arg(short, long, env = "CAPTION_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "captiond=info,caption_api=info,caption_upstream=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let file = match cli.config {
        Some(ref path) => {
            tracing::info!(config = %path.display(), "Loading config");
            FileConfig::load(path)?
        }
        None => FileConfig::default(),
    };

    let overrides = ConfigOverrides {
        port: cli.port,
        upstream_url: cli.upstream_url,
        subscription_key: cli.subscription_key,
    };
    let config = RelayConfig::resolve(overrides, file)?;

    tracing::info!(
        port = config.port,
        upstream = %config.upstream.url,
        max_upload_bytes = ?config.max_upload_bytes,
        "Starting captiond"
    );

    let app = build_app(&config)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Relay listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
