use super::utils::wait_for_shutdown;
use anyhow::Context;
use std::sync::Arc;
use sub_recoded_proxy::{HttpFetcher, ProxyConfig, ProxyServer};
use tracing::info;

pub async fn run_proxy(config: &ProxyConfig) -> anyhow::Result<()> {
    info!("Starting SUB Recoded proxy v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Upstream fetches: timeout {}s, up to {} redirects",
        config.fetch.timeout_secs, config.fetch.max_redirects
    );

    let fetcher = HttpFetcher::new(&config.fetch).context("Failed to create upstream client")?;
    let server = ProxyServer::bind(config, Arc::new(fetcher))
        .await
        .context("Failed to start proxy server")?;

    server.run_until(wait_for_shutdown()).await?;

    info!("Shutdown complete");
    Ok(())
}
