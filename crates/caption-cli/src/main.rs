//! caption-cli - Caption local images through the relay
//!
//! Uploads an image file to a running relay and prints the caption the
//! vision service generated for it.

mod caption;
mod client;
mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::client::RelayClient;

#[derive(Parser)]
#[command(name = "caption-cli")]
#[command(author, version, about = "Caption images through the relay")]
#[command(propagate_version = true)]
struct Cli {
    /// Relay URL
    #[arg(
        short,
        long,
        env = "CAPTION_RELAY_URL",
        default_value = "http://localhost:3000"
    )]
    relay: String,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the generated caption for an image
    Caption {
        /// Image file path
        file: PathBuf,
    },

    /// Print the full analysis response for an image
    Raw {
        /// Image file path
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let client = RelayClient::new(&cli.relay)?;

    match &cli.command {
        Commands::Caption { file } => commands::caption(&client, file).await?,
        Commands::Raw { file } => commands::raw(&client, file).await?,
    }

    Ok(())
}
