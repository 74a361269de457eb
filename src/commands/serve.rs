//! HTTP server command.

use crate::api::server;
use crate::libs::config::Config;
use anyhow::Result;
use clap::Args;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Port to bind on (overrides the configured value)
    #[arg(short, long)]
    pub port: Option<u16>,
}

pub async fn cmd(args: ServeArgs) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::read()?;
    let port = args.port.unwrap_or(config.server.port);
    server::run(port).await
}
