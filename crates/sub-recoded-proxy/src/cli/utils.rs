use super::commands::Cli;
use anyhow::Context;
use sub_recoded_proxy::ProxyConfig;
use tracing::info;

/// Config file (or defaults plus environment), then command-line overrides.
pub fn load_config(cli: &Cli) -> anyhow::Result<ProxyConfig> {
    let mut config = match &cli.config {
        Some(path) => ProxyConfig::load(path)
            .with_context(|| format!("Failed to load configuration from {:?}", path))?,
        None => ProxyConfig::from_env().context("Invalid configuration from environment")?,
    };

    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(bind) = cli.bind {
        config.server.bind_address = bind;
    }
    if let Some(log_file) = &cli.log_file {
        config.logging.file = Some(log_file.clone());
    }

    config.validate().context("Invalid command-line overrides")?;
    Ok(config)
}

pub async fn wait_for_shutdown() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => { info!("Received SIGTERM"); }
                    _ = sigint.recv() => { info!("Received SIGINT"); }
                }
                return;
            }
            _ => tracing::warn!("Failed to install signal handlers, falling back to Ctrl+C"),
        }
    }

    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C"),
        Err(e) => {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
