use anyhow::{bail, Context};
use std::io::Read;
use std::path::PathBuf;
use sub_recoded_proxy::{ProxyConfig, Rewriter};
use sub_recoded_types::proxy_base_for;
use url::Url;

pub fn rewrite_document(
    config: &ProxyConfig,
    base: &str,
    proxy_base: Option<String>,
    file: Option<PathBuf>,
) -> anyhow::Result<()> {
    if Url::parse(base).is_err() {
        bail!("--base must be an absolute URL, got '{}'", base);
    }

    let proxy_base = proxy_base.unwrap_or_else(|| {
        let host = format!("localhost:{}", config.server.port);
        proxy_base_for(&config.server.public_scheme, &host)
    });

    let html = match &file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {:?}", path))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    let (output, stats) = Rewriter::new(base, &proxy_base).rewrite_with_stats(&html);
    print!("{}", output);
    eprintln!(
        "\x1b[38;5;245m{} proxied, {} already proxied, {} skipped, {} malformed, {} meta refresh, base script {}\x1b[0m",
        stats.proxied,
        stats.already_proxied,
        stats.skipped,
        stats.malformed,
        stats.meta_refresh,
        if stats.injected { "injected" } else { "not injected" }
    );
    Ok(())
}
