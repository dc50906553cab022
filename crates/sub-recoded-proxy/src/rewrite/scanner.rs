//! Tolerant, allocation-light HTML tag scanner.
//!
//! [`TagScanner`] walks markup once and yields [`Token`]s carrying byte spans
//! into the source, so callers can splice replacements without re-serialising
//! anything they did not touch. It is not a tree builder: it only knows enough
//! of the tokenizer rules to find tags and attributes reliably (quoted values
//! containing `>`, comments, doctypes, raw-text elements).

use std::iter::FusedIterator;
use std::ops::Range;

/// Elements whose content is never scanned for tags.
const RAW_TEXT_ELEMENTS: [&str; 9] = [
    "script", "style", "textarea", "title", "xmp", "iframe", "noembed", "noframes", "noscript",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quote {
    Double,
    Single,
    Unquoted,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttrValue<'a> {
    /// Value exactly as written, without the surrounding quotes.
    pub raw: &'a str,
    /// Byte span of `raw` in the source.
    pub span: Range<usize>,
    pub quote: Quote,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribute<'a> {
    pub name: &'a str,
    pub value: Option<AttrValue<'a>>,
}

impl<'a> Attribute<'a> {
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    pub fn raw_value(&self) -> Option<&'a str> {
        self.value.as_ref().map(|v| v.raw)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StartTag<'a> {
    pub name: &'a str,
    pub span: Range<usize>,
    pub attributes: Vec<Attribute<'a>>,
    pub self_closing: bool,
}

impl<'a> StartTag<'a> {
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// First attribute with the given name, as browsers ignore duplicates.
    pub fn attribute(&self, name: &str) -> Option<&Attribute<'a>> {
        self.attributes.iter().find(|a| a.is_named(name))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EndTag<'a> {
    pub name: &'a str,
    pub span: Range<usize>,
}

impl EndTag<'_> {
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token<'a> {
    StartTag(StartTag<'a>),
    EndTag(EndTag<'a>),
    Text(Range<usize>),
    Comment(Range<usize>),
    /// Doctype, processing instruction or any other `<!`/`<?` construct.
    Declaration(Range<usize>),
}

impl Token<'_> {
    pub fn span(&self) -> Range<usize> {
        match self {
            Token::StartTag(tag) => tag.span.clone(),
            Token::EndTag(tag) => tag.span.clone(),
            Token::Text(span) | Token::Comment(span) | Token::Declaration(span) => span.clone(),
        }
    }
}

/// Lazy, single-pass token stream over a document. Once exhausted it stays
/// exhausted; scan the source again with a new scanner to restart.
pub struct TagScanner<'a> {
    src: &'a str,
    pos: usize,
    raw_text: Option<&'static str>,
}

impl<'a> TagScanner<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            raw_text: None,
        }
    }

    fn bytes(&self) -> &'a [u8] {
        self.src.as_bytes()
    }

    fn text_until_next_lt(&mut self, from: usize) -> Token<'a> {
        let end = find_byte(self.bytes(), b'<', from).unwrap_or(self.src.len());
        let span = self.pos..end;
        self.pos = end;
        Token::Text(span)
    }

    fn scan_markup(&self, start: usize) -> Option<(Token<'a>, usize)> {
        let bytes = self.bytes();
        let rest = &bytes[start..];

        if rest.starts_with(b"<!--") {
            let end = find_seq(bytes, b"-->", start + 4).map_or(bytes.len(), |i| i + 3);
            return Some((Token::Comment(start..end), end));
        }

        if rest.starts_with(b"<!") || rest.starts_with(b"<?") {
            let end = find_byte(bytes, b'>', start + 2).map_or(bytes.len(), |i| i + 1);
            return Some((Token::Declaration(start..end), end));
        }

        if rest.starts_with(b"</") {
            return match rest.get(2) {
                Some(c) if c.is_ascii_alphabetic() => self.scan_end_tag(start),
                Some(_) => {
                    let end = find_byte(bytes, b'>', start + 2).map_or(bytes.len(), |i| i + 1);
                    Some((Token::Declaration(start..end), end))
                }
                None => None,
            };
        }

        match rest.get(1) {
            Some(c) if c.is_ascii_alphabetic() => self.scan_start_tag(start),
            _ => None,
        }
    }

    fn scan_end_tag(&self, start: usize) -> Option<(Token<'a>, usize)> {
        let bytes = self.bytes();
        let name_start = start + 2;
        let name_end = scan_while(bytes, name_start, |b| !is_tag_delimiter(b));
        let close = find_byte(bytes, b'>', name_end)?;
        let end = close + 1;
        Some((
            Token::EndTag(EndTag {
                name: &self.src[name_start..name_end],
                span: start..end,
            }),
            end,
        ))
    }

    fn scan_start_tag(&self, start: usize) -> Option<(Token<'a>, usize)> {
        let bytes = self.bytes();
        let len = bytes.len();
        let name_start = start + 1;
        let mut i = scan_while(bytes, name_start, |b| !is_tag_delimiter(b));
        let name = &self.src[name_start..i];
        let mut attributes = Vec::new();
        let mut self_closing = false;

        loop {
            i = scan_while(bytes, i, is_html_whitespace);
            if i >= len {
                return None;
            }
            match bytes[i] {
                b'>' => {
                    i += 1;
                    break;
                }
                b'/' => {
                    i += 1;
                    if bytes.get(i) == Some(&b'>') {
                        self_closing = true;
                        i += 1;
                        break;
                    }
                    continue;
                }
                _ => {}
            }

            // A leading '=' belongs to the name.
            let attr_start = i;
            i = scan_while(bytes, i + 1, |b| !is_tag_delimiter(b) && b != b'=');
            let attr_name = &self.src[attr_start..i];

            let after_name = scan_while(bytes, i, is_html_whitespace);
            if bytes.get(after_name) != Some(&b'=') {
                attributes.push(Attribute {
                    name: attr_name,
                    value: None,
                });
                i = after_name;
                continue;
            }

            let value_start = scan_while(bytes, after_name + 1, is_html_whitespace);
            if value_start >= len {
                return None;
            }

            let value = match bytes[value_start] {
                quote @ (b'"' | b'\'') => {
                    let inner = value_start + 1;
                    let close = find_byte(bytes, quote, inner)?;
                    i = close + 1;
                    AttrValue {
                        raw: &self.src[inner..close],
                        span: inner..close,
                        quote: if quote == b'"' { Quote::Double } else { Quote::Single },
                    }
                }
                _ => {
                    let end = scan_while(bytes, value_start, |b| {
                        !is_html_whitespace(b) && b != b'>'
                    });
                    i = end;
                    AttrValue {
                        raw: &self.src[value_start..end],
                        span: value_start..end,
                        quote: Quote::Unquoted,
                    }
                }
            };

            attributes.push(Attribute {
                name: attr_name,
                value: Some(value),
            });
        }

        Some((
            Token::StartTag(StartTag {
                name,
                span: start..i,
                attributes,
                self_closing,
            }),
            i,
        ))
    }

    fn raw_text_end(&self, element: &str) -> usize {
        let bytes = self.bytes();
        let mut from = self.pos;
        while let Some(i) = find_seq_ignore_case(bytes, b"</", element.as_bytes(), from) {
            let after = i + 2 + element.len();
            match bytes.get(after) {
                None => return i,
                Some(&b) if is_tag_delimiter(b) => return i,
                Some(_) => from = i + 2,
            }
        }
        bytes.len()
    }
}

impl<'a> Iterator for TagScanner<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        if let Some(element) = self.raw_text.take() {
            let end = self.raw_text_end(element);
            if end > self.pos {
                let span = self.pos..end;
                self.pos = end;
                return Some(Token::Text(span));
            }
        }

        if self.pos >= self.src.len() {
            return None;
        }

        let start = self.pos;
        if self.bytes()[start] != b'<' {
            return Some(self.text_until_next_lt(start));
        }

        match self.scan_markup(start) {
            Some((token, end)) => {
                if let Token::StartTag(ref tag) = token {
                    self.raw_text = RAW_TEXT_ELEMENTS
                        .iter()
                        .find(|el| tag.name.eq_ignore_ascii_case(el))
                        .copied();
                }
                self.pos = end;
                Some(token)
            }
            None => Some(self.text_until_next_lt(start + 1)),
        }
    }
}

impl FusedIterator for TagScanner<'_> {}

pub(crate) fn is_html_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0c)
}

fn is_tag_delimiter(b: u8) -> bool {
    is_html_whitespace(b) || b == b'/' || b == b'>'
}

fn scan_while(bytes: &[u8], from: usize, pred: impl Fn(u8) -> bool) -> usize {
    let mut i = from;
    while i < bytes.len() && pred(bytes[i]) {
        i += 1;
    }
    i
}

fn find_byte(bytes: &[u8], needle: u8, from: usize) -> Option<usize> {
    bytes
        .get(from..)?
        .iter()
        .position(|&b| b == needle)
        .map(|i| from + i)
}

fn find_seq(bytes: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    bytes
        .get(from..)?
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|i| from + i)
}

fn find_seq_ignore_case(bytes: &[u8], prefix: &[u8], name: &[u8], from: usize) -> Option<usize> {
    let total = prefix.len() + name.len();
    bytes
        .get(from..)?
        .windows(total)
        .position(|w| w[..prefix.len()] == *prefix && w[prefix.len()..].eq_ignore_ascii_case(name))
        .map(|i| from + i)
}
