use chrono::Utc;
use hyper::header::HOST;
use hyper::http::request::Parts;
use hyper::{Method, Request};
use std::net::SocketAddr;
use std::sync::Arc;
use sub_recoded_types::{
    FetchedResource, HealthStatus, ProxyError, ProxyRequest, ASSET_PATH, DENIED_TARGET_SUBSTRINGS,
    HEALTH_PATH, PROXY_PATH, TARGET_PARAM,
};
use tracing::{debug, error, warn};

use super::responses::*;
use crate::config::ServerConfig;
use crate::fetcher::ResourceFetcher;
use crate::rewrite::Rewriter;

/// Everything a request handler needs; shared read-only across connections.
pub struct ApiState {
    pub fetcher: Arc<dyn ResourceFetcher>,
    pub public_scheme: String,
    pub trust_forwarded_proto: bool,
    pub local_addr: SocketAddr,
}

impl ApiState {
    pub fn new(fetcher: Arc<dyn ResourceFetcher>, config: &ServerConfig, local_addr: SocketAddr) -> Self {
        Self {
            fetcher,
            public_scheme: config.public_scheme.clone(),
            trust_forwarded_proto: config.trust_forwarded_proto,
            local_addr,
        }
    }

    fn scheme<'a>(&'a self, parts: &'a Parts) -> &'a str {
        if self.trust_forwarded_proto {
            let forwarded = parts
                .headers
                .get("x-forwarded-proto")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(',').next())
                .map(str::trim);
            if let Some(proto @ ("http" | "https")) = forwarded {
                return proto;
            }
        }
        &self.public_scheme
    }

    fn host(&self, parts: &Parts) -> String {
        parts
            .headers
            .get(HOST)
            .and_then(|v| v.to_str().ok())
            .filter(|h| !h.is_empty())
            .map(str::to_string)
            .or_else(|| parts.uri.authority().map(|a| a.to_string()))
            .unwrap_or_else(|| self.local_addr.to_string())
    }

    /// Pairs `target` with the `<scheme>://<host>/proxy?u=` prefix as seen by
    /// the client that sent `parts`.
    pub fn proxy_request(&self, target: String, parts: &Parts) -> ProxyRequest {
        ProxyRequest::new(target, self.scheme(parts), &self.host(parts))
    }
}

pub async fn handle<B>(req: Request<B>, state: &ApiState) -> ProxyResponse {
    let (parts, _) = req.into_parts();
    let path = parts.uri.path().to_string();

    let known = matches!(path.as_str(), PROXY_PATH | ASSET_PATH | HEALTH_PATH);
    if known && parts.method != Method::GET {
        return text_response(405, "Method Not Allowed");
    }

    match path.as_str() {
        PROXY_PATH => serve_proxy(&parts, state).await,
        ASSET_PATH => serve_asset(&parts, state).await,
        HEALTH_PATH => serve_health(),
        _ => text_response(404, "Not found"),
    }
}

pub async fn serve_proxy(parts: &Parts, state: &ApiState) -> ProxyResponse {
    let target = match target_param(parts.uri.query()) {
        Some(target) => target,
        None => return error_response(&ProxyError::MissingParameter(TARGET_PARAM.into())),
    };

    if is_denied_target(&target) {
        warn!("Refusing to proxy loopback target {}", target);
        return error_response(&ProxyError::ForbiddenTarget(target));
    }

    let request = state.proxy_request(target, parts);
    debug!("Proxying {} (base {})", request.target, request.proxy_base);

    let resource = match state.fetcher.fetch(&request.target).await {
        Ok(resource) => resource,
        Err(e) => {
            error!("Proxy fetch failed for {}: {}", request.target, e);
            return error_response(&e);
        }
    };
    debug!("Fetched {} from {}", resource.kind(), request.target);

    match resource {
        FetchedResource::Html {
            body,
            effective_base_url,
        } => {
            let base = if effective_base_url.is_empty() {
                request.target.as_str()
            } else {
                effective_base_url.as_str()
            };
            let (html, stats) = Rewriter::new(base, &request.proxy_base).rewrite_with_stats(&body);
            debug!(
                "Rewrote {}: {} proxied, {} already proxied, {} skipped, {} malformed, {} meta refresh, injected={}",
                base,
                stats.proxied,
                stats.already_proxied,
                stats.skipped,
                stats.malformed,
                stats.meta_refresh,
                stats.injected
            );
            html_response(html)
        }
        FetchedResource::Asset {
            bytes,
            content_type,
        } => {
            debug!("Passing through {} bytes of {}", bytes.len(), content_type);
            bytes_response(200, &content_type, bytes)
        }
    }
}

pub async fn serve_asset(parts: &Parts, state: &ApiState) -> ProxyResponse {
    let target = match target_param(parts.uri.query()) {
        Some(target) => target,
        None => return error_response(&ProxyError::MissingParameter(TARGET_PARAM.into())),
    };

    match state.fetcher.fetch_asset(&target).await {
        Ok(resource) => {
            let content_type = resource.content_type().to_string();
            let bytes = match resource {
                FetchedResource::Asset { bytes, .. } => bytes,
                FetchedResource::Html { body, .. } => body.into_bytes(),
            };
            bytes_response(200, &content_type, bytes)
        }
        Err(e) => {
            error!("Asset fetch failed for {}: {}", target, e);
            match e {
                ProxyError::FetchFailed(reason) => {
                    text_response(500, format!("Asset fetch failed: {}", reason))
                }
                other => error_response(&other),
            }
        }
    }
}

pub fn serve_health() -> ProxyResponse {
    let status = HealthStatus {
        ok: true,
        ts: Utc::now().timestamp_millis(),
    };
    json_response(200, &status)
}

/// First `u` query parameter, percent-decoded once. Values that do not decode
/// to UTF-8 are used raw; an empty value counts as missing.
pub fn target_param(query: Option<&str>) -> Option<String> {
    let raw = query?.split('&').find_map(|pair| {
        let mut parts = pair.splitn(2, '=');
        if parts.next()? == TARGET_PARAM {
            Some(parts.next().unwrap_or(""))
        } else {
            None
        }
    })?;

    if raw.is_empty() {
        return None;
    }

    Some(match urlencoding::decode(raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw.to_string(),
    })
}

/// Minimal loopback guard, substring match only. IPv6 loopback, private
/// ranges and DNS rebinding are not covered.
pub fn is_denied_target(target: &str) -> bool {
    DENIED_TARGET_SUBSTRINGS.iter().any(|s| target.contains(s))
}
