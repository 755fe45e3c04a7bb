//! Binary entry point for the wmcp-clockify MCP server.

use clap::Parser;
use rmcp::ServiceExt;
use wmcp_clockify::{
    ClockifyServer,
    config::{Config, DEFAULT_BASE_URL},
};

/// Walrus MCP Clockify Server — exposes the Clockify API as tools.
#[derive(Parser)]
#[command(name = "wmcp-clockify", version, about)]
struct Cli {
    /// Clockify API key.
    #[arg(long, env = "CLOCKIFY_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Clockify API base URL.
    #[arg(long, env = "CLOCKIFY_API_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::new(cli.api_key, Some(cli.base_url))?;
    tracing::info!(base_url = %config.base_url, "starting clockify server");
    let server = ClockifyServer::from_config(config)?;
    let transport = rmcp::transport::stdio();
    server.serve(transport).await?.waiting().await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    if std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .init();
    }
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        tracing::error!(error = %e, "clockify server failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
