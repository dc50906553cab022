use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use sub_recoded_types::{ProxyError, ProxyResult};
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer, Registry};

use crate::config::LoggingConfig;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Filter directive for the `-v`/`-q` flags; no flags means the configured level.
pub fn filter_directive(config: &LoggingConfig, verbose: u8, quiet: bool) -> String {
    if quiet {
        return "warn".into();
    }
    match verbose {
        0 => config.level.to_string(),
        1 => "info,sub_recoded_proxy=debug".into(),
        2 => "debug".into(),
        _ => "trace".into(),
    }
}

/// Installs the global subscriber. `RUST_LOG` wins over everything else.
pub fn init_logging(config: &LoggingConfig, verbose: u8, quiet: bool) -> ProxyResult<()> {
    let directive = filter_directive(config, verbose, quiet);
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    let fmt_layer = match &config.file {
        Some(path) => file_layer(path, config.json)?,
        None => stdout_layer(config.json, verbose >= 2),
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
        .try_init()
        .map_err(|e| ProxyError::Internal(format!("Failed to install logger: {}", e)))
}

fn file_layer(path: &Path, json: bool) -> ProxyResult<BoxedLayer> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| ProxyError::Config(format!("Failed to open log file {:?}: {}", path, e)))?;

    let layer = fmt::layer().with_writer(Mutex::new(file)).with_ansi(false);
    Ok(if json {
        layer.json().boxed()
    } else {
        layer.boxed()
    })
}

fn stdout_layer(json: bool, with_target: bool) -> BoxedLayer {
    if json {
        fmt::layer().json().boxed()
    } else {
        fmt::layer().with_target(with_target).boxed()
    }
}
