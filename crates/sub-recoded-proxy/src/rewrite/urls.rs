use super::scanner::is_html_whitespace;
use std::borrow::Cow;
use sub_recoded_types::{ProxyError, ProxyResult};
use url::Url;

/// Prefixes that are never routed through the proxy.
const PASSTHROUGH_PREFIXES: [&str; 4] = ["#", "mailto:", "tel:", "data:"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReferenceRewrite {
    /// Empty, fragment, `mailto:`, `tel:` or `data:` value.
    Skipped,
    /// Resolution failed; the value stays as written.
    Malformed,
    /// Resolved URL already starts with the proxy base, kept as resolved.
    AlreadyProxied(String),
    Proxied(String),
}

impl ReferenceRewrite {
    pub fn replacement(&self) -> Option<&str> {
        match self {
            ReferenceRewrite::Skipped | ReferenceRewrite::Malformed => None,
            ReferenceRewrite::AlreadyProxied(url) | ReferenceRewrite::Proxied(url) => Some(url),
        }
    }
}

/// Browsers strip surrounding whitespace from URL attributes before parsing.
pub fn is_passthrough(value: &str) -> bool {
    let value = value.trim_matches(|c: char| u8::try_from(c).is_ok_and(is_html_whitespace));
    value.is_empty() || PASSTHROUGH_PREFIXES.iter().any(|p| value.starts_with(p))
}

pub fn resolve(value: &str, base: &Url) -> ProxyResult<Url> {
    base.join(value)
        .map_err(|e| ProxyError::MalformedUrl(format!("{}: {}", value, e)))
}

/// `<proxy_base><percent-encoded url>`
pub fn wrap(resolved: &str, proxy_base: &str) -> String {
    format!("{}{}", proxy_base, urlencoding::encode(resolved))
}

pub fn rewrite_reference(value: &str, base: Option<&Url>, proxy_base: &str) -> ReferenceRewrite {
    if is_passthrough(value) {
        return ReferenceRewrite::Skipped;
    }

    let resolved = match base {
        Some(base) => match resolve(value, base) {
            Ok(url) => url,
            Err(_) => return ReferenceRewrite::Malformed,
        },
        None => return ReferenceRewrite::Malformed,
    };

    // String prefix, not a URL comparison.
    if resolved.as_str().starts_with(proxy_base) {
        return ReferenceRewrite::AlreadyProxied(resolved.into());
    }

    ReferenceRewrite::Proxied(wrap(resolved.as_str(), proxy_base))
}

/// Attribute values may spell `&` as `&amp;`; the browser sees the decoded form.
pub fn decode_ampersands(raw: &str) -> Cow<'_, str> {
    if raw.contains("&amp;") {
        Cow::Owned(raw.replace("&amp;", "&"))
    } else {
        Cow::Borrowed(raw)
    }
}
