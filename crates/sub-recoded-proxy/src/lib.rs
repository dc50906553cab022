//! SUB Recoded proxy
//!
//! Fetches third-party pages, rewrites their `src`/`href` references to route
//! back through the proxy, and serves them from a same-origin endpoint so they
//! can be embedded in a frame.

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod api;
pub mod config;
pub mod fetcher;
pub mod logging;
pub mod rewrite;

pub use api::ProxyServer;
pub use config::ProxyConfig;
pub use fetcher::{HttpFetcher, ResourceFetcher};
pub use logging::init_logging;
pub use rewrite::{rewrite_html, RewriteStats, Rewriter};
