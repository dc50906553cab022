//! Routes every `src`/`href` reference in a page back through the proxy.
//!
//! The rewriter makes a single pass over [`TagScanner`] tokens and records
//! byte-range splices; untouched markup is copied through verbatim, and only
//! attribute value bytes are replaced so the page's quoting survives.

mod inject;
mod meta_refresh;
mod scanner;
mod urls;

pub use inject::base_fallback_script;
pub use scanner::{AttrValue, Attribute, EndTag, Quote, StartTag, TagScanner, Token};
pub use urls::{is_passthrough, resolve, rewrite_reference, wrap, ReferenceRewrite};

use std::ops::Range;
use url::Url;

const REWRITTEN_ATTRIBUTES: [&str; 2] = ["src", "href"];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RewriteStats {
    pub proxied: usize,
    pub already_proxied: usize,
    pub skipped: usize,
    pub malformed: usize,
    pub meta_refresh: usize,
    pub injected: bool,
}

impl RewriteStats {
    fn record(&mut self, outcome: &ReferenceRewrite) {
        match outcome {
            ReferenceRewrite::Proxied(_) => self.proxied += 1,
            ReferenceRewrite::AlreadyProxied(_) => self.already_proxied += 1,
            ReferenceRewrite::Skipped => self.skipped += 1,
            ReferenceRewrite::Malformed => self.malformed += 1,
        }
    }
}

struct Splice {
    range: Range<usize>,
    replacement: String,
}

pub struct Rewriter<'a> {
    base_url: &'a str,
    base: Option<Url>,
    proxy_base: &'a str,
}

impl<'a> Rewriter<'a> {
    /// `base_url` is the page's post-redirect URL; `proxy_base` is the
    /// prefix up to and including the query parameter name.
    pub fn new(base_url: &'a str, proxy_base: &'a str) -> Self {
        Self {
            base_url,
            base: Url::parse(base_url).ok(),
            proxy_base,
        }
    }

    pub fn rewrite(&self, html: &str) -> String {
        self.rewrite_with_stats(html).0
    }

    pub fn rewrite_with_stats(&self, html: &str) -> (String, RewriteStats) {
        let mut stats = RewriteStats::default();
        let mut splices = Vec::new();

        for token in TagScanner::new(html) {
            match token {
                Token::StartTag(tag) => self.rewrite_tag(&tag, &mut splices, &mut stats),
                Token::EndTag(end) if !stats.injected && end.is("head") => {
                    let at = end.span.start;
                    splices.push(Splice {
                        range: at..at,
                        replacement: format!("{}\n", base_fallback_script(self.base_url)),
                    });
                    stats.injected = true;
                }
                _ => {}
            }
        }

        (apply_splices(html, splices), stats)
    }

    fn rewrite_tag(&self, tag: &StartTag<'_>, splices: &mut Vec<Splice>, stats: &mut RewriteStats) {
        for attr in &tag.attributes {
            if !REWRITTEN_ATTRIBUTES.iter().any(|name| attr.is_named(name)) {
                continue;
            }
            let Some(value) = &attr.value else {
                continue;
            };

            let decoded = urls::decode_ampersands(value.raw);
            let outcome = rewrite_reference(&decoded, self.base.as_ref(), self.proxy_base);
            stats.record(&outcome);
            if let Some(replacement) = outcome.replacement() {
                splices.push(Splice {
                    range: value.span.clone(),
                    replacement: replacement.to_string(),
                });
            }
        }

        if meta_refresh::is_refresh_tag(tag) {
            self.rewrite_meta_refresh(tag, splices, stats);
        }
    }

    fn rewrite_meta_refresh(
        &self,
        tag: &StartTag<'_>,
        splices: &mut Vec<Splice>,
        stats: &mut RewriteStats,
    ) {
        let Some(content) = tag.attribute("content").and_then(|a| a.value.as_ref()) else {
            return;
        };
        let Some(target) = meta_refresh::parse(content.raw) else {
            return;
        };

        let decoded = urls::decode_ampersands(target);
        let outcome = rewrite_reference(&decoded, self.base.as_ref(), self.proxy_base);
        if let Some(target) = outcome.replacement() {
            let value = meta_refresh::immediate(target);
            // The new value contains a space, which ends an unquoted value.
            let replacement = match content.quote {
                Quote::Unquoted => format!("\"{}\"", value),
                Quote::Double | Quote::Single => value,
            };
            splices.push(Splice {
                range: content.span.clone(),
                replacement,
            });
            stats.meta_refresh += 1;
        }
    }
}

/// Pure convenience wrapper around [`Rewriter`].
pub fn rewrite_html(html: &str, base_url: &str, proxy_base: &str) -> String {
    Rewriter::new(base_url, proxy_base).rewrite(html)
}

fn apply_splices(html: &str, mut splices: Vec<Splice>) -> String {
    if splices.is_empty() {
        return html.to_string();
    }
    splices.sort_by_key(|s| s.range.start);

    let extra: usize = splices.iter().map(|s| s.replacement.len()).sum();
    let mut out = String::with_capacity(html.len() + extra);
    let mut cursor = 0;
    for splice in splices {
        if splice.range.start < cursor {
            continue;
        }
        out.push_str(&html[cursor..splice.range.start]);
        out.push_str(&splice.replacement);
        cursor = splice.range.end;
    }
    out.push_str(&html[cursor..]);
    out
}
