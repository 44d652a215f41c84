//! HTML entity codec.
//!
//! - `escape()` - encode for attribute values in raw HTML (`&<>"'`)
//! - `escape_text()` - encode for rendered text and attributes (`&<>"`)
//! - `unescape()` - decode named and numeric character references

use std::borrow::Cow;

use quick_xml::escape::resolve_html5_entity;

// =============================================================================
// Escaping
// =============================================================================

/// Characters encoded by [`escape`].
const ESCAPE_CHARS: [char; 5] = ['<', '>', '&', '"', '\''];

/// Characters encoded by [`escape_text`].
const TEXT_ESCAPE_CHARS: [char; 4] = ['<', '>', '&', '"'];

/// Get the HTML entity for a special character.
#[inline]
fn escape_char(c: char) -> Option<&'static str> {
    match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#39;"),
        _ => None,
    }
}

/// Escape HTML special characters, apostrophes included.
///
/// Used when writing a value back into a raw HTML fragment, where the
/// surrounding quote style is unknown to the caller.
///
/// # Example
/// ```ignore
/// assert_eq!(escape("it's <b>"), "it&#39;s &lt;b&gt;");
/// assert_eq!(escape("hello"), "hello"); // No allocation
/// ```
#[inline]
pub fn escape(s: &str) -> Cow<'_, str> {
    escape_with(s, &ESCAPE_CHARS)
}

/// Escape text content and double-quoted attribute values.
///
/// Apostrophes are kept as-is.
#[inline]
pub fn escape_text(s: &str) -> Cow<'_, str> {
    escape_with(s, &TEXT_ESCAPE_CHARS)
}

/// Internal: escape with specified character set.
#[inline]
fn escape_with<'a>(s: &'a str, chars: &[char]) -> Cow<'a, str> {
    if !s.contains(chars) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match escape_char(c).filter(|_| chars.contains(&c)) {
            Some(entity) => result.push_str(entity),
            None => result.push(c),
        }
    }
    Cow::Owned(result)
}

// =============================================================================
// Unescaping
// =============================================================================

/// Longest entity body we try to decode (`&` and `;` excluded).
const MAX_ENTITY_LEN: usize = 32;

/// Decode one reference body into `out`. Returns `false` if it is not a
/// known named reference or a valid numeric one.
fn decode_reference(body: &str, out: &mut String) -> bool {
    if body.starts_with('#') {
        return match numeric_entity(body) {
            Some(c) => {
                out.push(c);
                true
            }
            None => false,
        };
    }
    if !body.chars().all(|c| c.is_ascii_alphanumeric()) {
        return false;
    }
    // Full HTML5 table; some references expand to two code points.
    match resolve_html5_entity(body) {
        Some(decoded) => {
            out.push_str(decoded);
            true
        }
        None => false,
    }
}

/// Decode a numeric entity body (`#65`, `#x41`).
fn numeric_entity(body: &str) -> Option<char> {
    let digits = body.strip_prefix('#')?;
    let code = match digits.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => digits.parse().ok()?,
    };
    match code {
        0 => Some('\u{FFFD}'),
        _ => char::from_u32(code),
    }
}

/// Unescape HTML entities back to characters.
///
/// Unknown or malformed references are passed through untouched.
pub fn unescape(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(amp) = rest.find('&') {
        result.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];

        let end = after
            .find(';')
            .filter(|&end| end > 0 && end <= MAX_ENTITY_LEN);

        match end {
            Some(end) if decode_reference(&after[..end], &mut result) => {
                rest = &after[end + 1..];
            }
            _ => {
                result.push('&');
                rest = after;
            }
        }
    }
    result.push_str(rest);

    Cow::Owned(result)
}

// =============================================================================
// Tests
// =============================================================================
