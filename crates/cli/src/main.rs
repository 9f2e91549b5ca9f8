//! AgentHub CLI — the main entry point.
//!
//! Commands:
//! - `onboard`  — Write the default config file
//! - `serve`    — Start the HTTP relay server
//! - `channels` — List channels in the persisted store
//! - `status`   — Show configuration and store location

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "agenthub",
    about = "AgentHub — minimal message relay for multi-agent coordination",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default configuration file
    Onboard,

    /// Start the HTTP relay server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,

        /// Override the bind address
        #[arg(long)]
        host: Option<String>,
    },

    /// List channels in the persisted store
    Channels,

    /// Show configuration and store location
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Serve { port, host } => commands::serve::run(port, host).await?,
        Commands::Channels => commands::channels::run().await?,
        Commands::Status => commands::status::run().await?,
    }

    Ok(())
}
