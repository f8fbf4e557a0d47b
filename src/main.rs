use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use tapwire::config::{CliOverrides, Settings};
use tapwire::Application;

/// Transparent HTTP forwarding proxy that logs every request and response
/// it relays.
#[derive(Debug, Parser)]
#[command(name = "tapwire", version, about)]
struct Cli {
    /// Local port to accept HTTP connections
    #[arg(short, long)]
    port: Option<u16>,

    /// Upstream URL to forward requests to (http:// or https://)
    #[arg(short, long)]
    upstream: Option<String>,

    /// Traffic log file (defaults to standard output)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tapwire=info,tower_http=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let settings = Settings::load(&CliOverrides {
        port: cli.port,
        upstream: cli.upstream,
        log_file: cli.out,
    })?;

    info!("Starting tapwire proxy");

    let app = Application::new(settings).await?;
    app.run().await?;

    Ok(())
}
