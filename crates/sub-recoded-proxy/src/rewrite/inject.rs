/// Script inserted before `</head>` that adds a `<base>` pointing at the
/// upstream page when the document has none, so references the attribute
/// pass missed (CSS `url(...)`, script-built URLs) still resolve upstream.
pub fn base_fallback_script(base_url: &str) -> String {
    format!(
        "<script>try{{(function(){{var base=document.querySelector('base'); if(!base){{base=document.createElement('base'); base.href='{}'; document.head && document.head.insertBefore(base, document.head.firstChild)}} }})()}}catch(e){{}}</script>",
        escape_js_string(base_url)
    )
}

/// Escapes for a single-quoted JS string inside an inline `<script>`.
fn escape_js_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_embeds_base() {
        let script = base_fallback_script("https://site.example/dir/");
        assert!(script.starts_with("<script>"));
        assert!(script.ends_with("</script>"));
        assert!(script.contains("base.href='https://site.example/dir/'"));
        assert!(script.contains("document.querySelector('base')"));
        assert!(script.contains("insertBefore(base, document.head.firstChild)"));
    }

    #[test]
    fn test_script_cannot_be_broken_out_of() {
        let script = base_fallback_script("https://x.example/'</script><script>alert(1)//");
        assert_eq!(script.matches("</script>").count(), 1);
        assert!(script.contains("\\'"));
    }
}
