use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{DEFAULT_ASSET_CONTENT_TYPE, HTML_CONTENT_TYPE, PROXY_PATH, TARGET_PARAM};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Html,
    Asset,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Html => write!(f, "html"),
            ResourceKind::Asset => write!(f, "asset"),
        }
    }
}

/// An upstream response after classification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchedResource {
    Html {
        body: String,
        /// URL after redirects, used to resolve relative references.
        effective_base_url: String,
    },
    Asset {
        bytes: Vec<u8>,
        content_type: String,
    },
}

impl FetchedResource {
    /// Builds an asset, substituting the generic binary type when upstream sent none.
    pub fn asset(bytes: Vec<u8>, content_type: Option<&str>) -> Self {
        let content_type = match content_type.map(str::trim) {
            Some(ct) if !ct.is_empty() => ct.to_string(),
            _ => DEFAULT_ASSET_CONTENT_TYPE.to_string(),
        };
        FetchedResource::Asset { bytes, content_type }
    }

    pub fn kind(&self) -> ResourceKind {
        match self {
            FetchedResource::Html { .. } => ResourceKind::Html,
            FetchedResource::Asset { .. } => ResourceKind::Asset,
        }
    }

    pub fn content_type(&self) -> &str {
        match self {
            FetchedResource::Html { .. } => HTML_CONTENT_TYPE,
            FetchedResource::Asset { content_type, .. } => content_type,
        }
    }
}

/// Returns true when an upstream content type should be treated as markup.
pub fn is_html_content_type(content_type: &str) -> bool {
    content_type.contains("html")
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProxyRequest {
    pub target: String,
    /// `<scheme>://<host>/proxy?u=`, the prefix every rewritten link starts with.
    pub proxy_base: String,
}

impl ProxyRequest {
    pub fn new(target: impl Into<String>, scheme: &str, host: &str) -> Self {
        Self {
            target: target.into(),
            proxy_base: proxy_base_for(scheme, host),
        }
    }
}

pub fn proxy_base_for(scheme: &str, host: &str) -> String {
    format!("{}://{}{}?{}=", scheme, host, PROXY_PATH, TARGET_PARAM)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub ok: bool,
    /// Milliseconds since the Unix epoch.
    pub ts: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_default_content_type() {
        let asset = FetchedResource::asset(vec![1, 2, 3], None);
        assert_eq!(asset.content_type(), "application/octet-stream");

        let asset = FetchedResource::asset(vec![], Some("  "));
        assert_eq!(asset.content_type(), "application/octet-stream");

        let asset = FetchedResource::asset(vec![0x89], Some("image/png"));
        assert_eq!(asset.content_type(), "image/png");
        assert_eq!(asset.kind(), ResourceKind::Asset);
    }

    #[test]
    fn test_html_content_type() {
        let page = FetchedResource::Html {
            body: "<p>hi</p>".into(),
            effective_base_url: "https://site.example/".into(),
        };
        assert_eq!(page.content_type(), "text/html; charset=utf-8");
        assert_eq!(page.kind(), ResourceKind::Html);
        assert_eq!(page.kind().to_string(), "html");
    }

    #[test]
    fn test_html_classification() {
        assert!(is_html_content_type("text/html; charset=ISO-8859-1"));
        assert!(is_html_content_type("application/xhtml+xml"));
        assert!(!is_html_content_type("image/png"));
        assert!(!is_html_content_type(""));
    }

    #[test]
    fn test_proxy_base() {
        let req = ProxyRequest::new("https://site.example/", "http", "localhost:7777");
        assert_eq!(req.proxy_base, "http://localhost:7777/proxy?u=");
        assert_eq!(req.target, "https://site.example/");
    }
}
