#![forbid(unsafe_code)]
#![warn(clippy::all)]

//! Shared types for the SUB Recoded rewriting proxy.

mod error;
mod resource;

pub use error::{ProxyError, ProxyResult};
pub use resource::{
    is_html_content_type, proxy_base_for, FetchedResource, HealthStatus, ProxyRequest,
    ResourceKind,
};

pub const DEFAULT_PORT: u16 = 7777;

pub const DEFAULT_USER_AGENT: &str = "SUB-Recoded-Proxy/1.0 (+https://example.com)";

pub const FETCH_TIMEOUT_SECS: u64 = 15;

pub const MAX_REDIRECTS: usize = 10;

pub const TARGET_PARAM: &str = "u";

pub const PROXY_PATH: &str = "/proxy";

pub const ASSET_PATH: &str = "/asset";

pub const HEALTH_PATH: &str = "/_health";

pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

pub const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

pub const DEFAULT_ASSET_CONTENT_TYPE: &str = "application/octet-stream";

/// Substrings that mark a target as loopback. Not an SSRF defense.
pub const DENIED_TARGET_SUBSTRINGS: [&str; 2] = ["localhost", "127.0.0.1"];
