//! cacheproxy CLI entry point.

use std::time::Duration;

use anyhow::{Context, Result};
use cacheproxy::transport::ReqwestTransport;
use cacheproxy::CacheProxy;
use cacheproxy_client::cli::Cli;
use cacheproxy_client::output::format_output;
use cacheproxy_client::{load_config, run};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cacheproxy=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref()).context("Failed to load cache configuration")?;
    let transport = ReqwestTransport::with_timeout(Duration::from_secs(cli.timeout))
        .context("Failed to build HTTP client")?;
    let cache = CacheProxy::builder(config)
        .transport(transport)
        .connect()
        .await
        .context("Failed to connect to cache backend")?;

    let output = run(&cache, cli.command).await?;
    if let Some(text) = format_output(&output, cli.format, cli.quiet) {
        println!("{}", text);
    }

    Ok(())
}
