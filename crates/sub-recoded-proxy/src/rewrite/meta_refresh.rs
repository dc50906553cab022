use super::scanner::StartTag;

pub fn is_refresh_tag(tag: &StartTag<'_>) -> bool {
    tag.is("meta")
        && tag
            .attribute("http-equiv")
            .and_then(|a| a.raw_value())
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("refresh"))
}

/// Target of a `<delay>;url=<target>` refresh. Refreshes without a target
/// are not navigations through a link and yield `None`.
pub fn parse(content: &str) -> Option<&str> {
    let content = content.trim_start();
    let semicolon = content.find(';')?;
    let delay = content[..semicolon].trim();
    if delay.is_empty() {
        return None;
    }

    let rest = content[semicolon + 1..].trim_start();
    rest.get(..3).filter(|key| key.eq_ignore_ascii_case("url"))?;
    let after_key = rest[3..].trim_start();
    let target = after_key.strip_prefix('=')?.trim();
    let target = strip_matching_quotes(target).trim();
    if target.is_empty() {
        return None;
    }

    Some(target)
}

/// Content value with the delay normalised to zero.
pub fn immediate(target: &str) -> String {
    format!("0; url={}", target)
}

fn strip_matching_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value.strip_prefix(quote) {
            return inner.strip_suffix(quote).unwrap_or(inner);
        }
    }
    value
}
