//! Attribute scanner for partial HTML.
//!
//! Raw HTML tokens may hold half a tag pair (`<abbr title="x">` with the
//! `</abbr>` in a later token), so a structural parser is not an option.
//! This is a bounded, non-recursive pattern scan over an explicit grammar
//! subset:
//!
//! ```text
//! tag    = "<" NAME WS [^>]+ ">"            NAME from the tag allow-list
//! attr   = WS ATTR "=" value                ATTR from the attribute allow-list
//! value  = '"' [^"]* '"'
//!        | "'" [^']* "'"
//!        | [^WS>"'] [^WS>]*                 bare, ends at WS or '>'
//! WS     = " " | "\t" | "\n" | "\f" | "\r"
//! ```
//!
//! `WS` is ASCII whitespace only, so a no-break space inside a bare value
//! (as French quote glyphs produce) stays part of the value.
//!
//! Names match case-sensitively. Attributes are only looked for inside a
//! matched tag region, so identical text elsewhere in the fragment is never
//! touched. Unterminated quoting matches none of the value forms and is
//! skipped. Bare values containing `>` are not supported: the tag region
//! ends at the first `>`.

use std::borrow::Cow;
use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::debug;
use crate::utils::html::{escape, unescape};

/// Tags scanned by default.
pub const DEFAULT_TAGS: [&str; 3] = ["a", "abbr", "img"];

/// Attributes rewritten by default.
pub const DEFAULT_ATTRS: [&str; 2] = ["alt", "title"];

static DEFAULT_SCANNER: LazyLock<AttrScanner> = LazyLock::new(|| {
    AttrScanner::new(&DEFAULT_TAGS, &DEFAULT_ATTRS).expect("default scanner patterns are valid")
});

/// Scanner construction errors.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("tag allow-list is empty")]
    NoTags,

    #[error("attribute allow-list is empty")]
    NoAttrs,

    #[error("invalid name `{0}` in allow-list")]
    InvalidName(String),

    #[error("scanner pattern error")]
    Pattern(#[from] regex::Error),
}

/// Quoting style of a matched attribute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quote {
    Double,
    Single,
    Bare,
}

/// One attribute value found in a fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrValue<'a> {
    /// Attribute name as written.
    pub name: &'a str,
    /// Raw (still entity-encoded) value, without quotes.
    pub raw: &'a str,
    /// Byte range of `raw` within the scanned fragment.
    pub range: Range<usize>,
    pub quote: Quote,
}

impl AttrValue<'_> {
    /// Value with entities decoded.
    pub fn decoded(&self) -> Cow<'_, str> {
        unescape(self.raw)
    }
}

/// Finds allow-listed attributes on allow-listed tags in HTML fragments.
#[derive(Debug, Clone)]
pub struct AttrScanner {
    tag_re: Regex,
    attr_re: Regex,
}

impl Default for AttrScanner {
    /// `alt`/`title` on `<a>`, `<abbr>` and `<img>`.
    fn default() -> Self {
        DEFAULT_SCANNER.clone()
    }
}

impl AttrScanner {
    pub fn new(tags: &[&str], attrs: &[&str]) -> Result<Self, ScanError> {
        let tags = name_alternation(tags, ScanError::NoTags)?;
        let attrs = name_alternation(attrs, ScanError::NoAttrs)?;

        let tag_re = Regex::new(&format!(r"<(?:{tags})[ \t\n\f\r][^>]+>"))?;
        let attr_re = Regex::new(&format!(
            r#"[ \t\n\f\r]({attrs})=(?:"([^"]*)"|'([^']*)'|([^ \t\n\f\r>"'][^ \t\n\f\r>]*))"#
        ))?;

        Ok(Self { tag_re, attr_re })
    }

    /// Shared default scanner.
    pub fn shared() -> &'static AttrScanner {
        &DEFAULT_SCANNER
    }

    /// Find every matching attribute value in `fragment`.
    pub fn scan<'a>(&self, fragment: &'a str) -> Vec<AttrValue<'a>> {
        let mut values = Vec::new();

        for tag in self.tag_re.find_iter(fragment) {
            for caps in self.attr_re.captures_iter(tag.as_str()) {
                let (Some(name), Some((value, quote))) = (caps.get(1), value_capture(&caps)) else {
                    continue;
                };
                let start = tag.start() + value.start();
                values.push(AttrValue {
                    name: &fragment[tag.start() + name.start()..tag.start() + name.end()],
                    raw: value.as_str(),
                    range: start..start + value.len(),
                    quote,
                });
            }
        }

        values
    }

    /// Rewrite every matching attribute value with `f`.
    ///
    /// Each value is entity-decoded, passed to `f`, re-encoded and spliced
    /// back in place. Everything else in the fragment is kept byte for byte.
    pub fn rewrite<'a, F>(&self, fragment: &'a str, mut f: F) -> Cow<'a, str>
    where
        F: FnMut(&str) -> String,
    {
        let values = self.scan(fragment);
        if values.is_empty() {
            return Cow::Borrowed(fragment);
        }

        let mut out = String::with_capacity(fragment.len() + 16);
        let mut copied = 0;

        for value in &values {
            if value.raw.is_empty() {
                continue;
            }
            let decoded = value.decoded();
            let replaced = f(&decoded);
            if replaced == decoded {
                continue;
            }

            let encoded = escape(&replaced);
            debug!("typographer"; "{}: {:?} -> {:?}", value.name, value.raw, encoded);
            out.push_str(&fragment[copied..value.range.start]);
            out.push_str(&encoded);
            copied = value.range.end;
        }

        if copied == 0 {
            return Cow::Borrowed(fragment);
        }
        out.push_str(&fragment[copied..]);
        Cow::Owned(out)
    }
}

/// Regex alternation of escaped names.
fn name_alternation(names: &[&str], empty: ScanError) -> Result<String, ScanError> {
    if names.is_empty() {
        return Err(empty);
    }
    let invalid = names
        .iter()
        .find(|name| name.is_empty() || name.contains(|c: char| c.is_whitespace() || c == '>'));
    if let Some(name) = invalid {
        return Err(ScanError::InvalidName(name.to_string()));
    }
    Ok(names
        .iter()
        .map(|name| regex::escape(name))
        .collect::<Vec<_>>()
        .join("|"))
}

/// The value group that participated in the match, with its quoting.
fn value_capture<'h>(caps: &regex::Captures<'h>) -> Option<(regex::Match<'h>, Quote)> {
    caps.get(2)
        .map(|m| (m, Quote::Double))
        .or_else(|| caps.get(3).map(|m| (m, Quote::Single)))
        .or_else(|| caps.get(4).map(|m| (m, Quote::Bare)))
}

/// Rewrite `alt`/`title` on `<a>`, `<abbr>` and `<img>` in `fragment`.
pub fn rewrite_attrs<'a, F>(fragment: &'a str, f: F) -> Cow<'a, str>
where
    F: FnMut(&str) -> String,
{
    AttrScanner::shared().rewrite(fragment, f)
}
