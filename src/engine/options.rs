//! Engine option set.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Markdown engine options, shared by every rule at call time.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Accept raw HTML in the source. When disabled, HTML is treated as text.
    pub html: bool,
    /// Enable typographic replacements and smart quotes.
    pub typographer: bool,
    /// Quote glyphs used by smart quotes.
    pub quotes: QuoteGlyphs,
}

impl EngineOptions {
    /// Options with HTML and the typographer enabled.
    pub fn typographic() -> Self {
        Self {
            html: true,
            typographer: true,
            quotes: QuoteGlyphs::default(),
        }
    }

    pub fn with_quotes(mut self, quotes: QuoteGlyphs) -> Self {
        self.quotes = quotes;
        self
    }
}

// =============================================================================
// Quote Glyphs
// =============================================================================

/// Invalid quote glyph set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuoteGlyphsError {
    #[error("expected 4 quote glyphs, found {0}")]
    Count(usize),

    #[error("quote glyph #{0} is empty")]
    Empty(usize),
}

/// Opening/closing glyphs for double and single quotes.
///
/// Glyphs are strings, not chars: `«\u{a0}` is a valid opening glyph.
///
/// Deserializes from a 4-element array or a 4-character string:
///
/// ```toml
/// quotes = ["« ", " »", "‹ ", " ›"]
/// quotes = "„“‚‘"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuoteGlyphsRepr", into = "[String; 4]")]
pub struct QuoteGlyphs([String; 4]);

impl QuoteGlyphs {
    /// Build from `[double open, double close, single open, single close]`.
    pub fn new<S: Into<String>>(glyphs: [S; 4]) -> Result<Self, QuoteGlyphsError> {
        let glyphs: [String; 4] = glyphs.map(Into::into);
        if let Some(index) = glyphs.iter().position(String::is_empty) {
            return Err(QuoteGlyphsError::Empty(index));
        }
        Ok(Self(glyphs))
    }

    /// Build from a string of exactly four characters.
    pub fn from_chars(s: &str) -> Result<Self, QuoteGlyphsError> {
        let chars: Vec<String> = s.chars().map(String::from).collect();
        let glyphs: [String; 4] = chars
            .try_into()
            .map_err(|v: Vec<String>| QuoteGlyphsError::Count(v.len()))?;
        Self::new(glyphs)
    }

    #[inline]
    pub fn double_open(&self) -> &str {
        &self.0[0]
    }

    #[inline]
    pub fn double_close(&self) -> &str {
        &self.0[1]
    }

    #[inline]
    pub fn single_open(&self) -> &str {
        &self.0[2]
    }

    #[inline]
    pub fn single_close(&self) -> &str {
        &self.0[3]
    }

    /// `(open, close)` pair for the given quote kind.
    #[inline]
    pub fn pair(&self, single: bool) -> (&str, &str) {
        if single {
            (self.single_open(), self.single_close())
        } else {
            (self.double_open(), self.double_close())
        }
    }
}

impl Default for QuoteGlyphs {
    fn default() -> Self {
        Self(["“", "”", "‘", "’"].map(String::from))
    }
}

impl From<QuoteGlyphs> for [String; 4] {
    fn from(glyphs: QuoteGlyphs) -> Self {
        glyphs.0
    }
}

/// Accepted serialized forms.
#[derive(Deserialize)]
#[serde(untagged)]
enum QuoteGlyphsRepr {
    List(Vec<String>),
    Chars(String),
}

impl TryFrom<QuoteGlyphsRepr> for QuoteGlyphs {
    type Error = QuoteGlyphsError;

    fn try_from(repr: QuoteGlyphsRepr) -> Result<Self, Self::Error> {
        match repr {
            QuoteGlyphsRepr::List(list) => {
                let glyphs: [String; 4] = list
                    .try_into()
                    .map_err(|v: Vec<String>| QuoteGlyphsError::Count(v.len()))?;
                Self::new(glyphs)
            }
            QuoteGlyphsRepr::Chars(s) => Self::from_chars(&s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_glyphs() {
        let q = QuoteGlyphs::default();
        assert_eq!(q.pair(false), ("“", "”"));
        assert_eq!(q.pair(true), ("‘", "’"));
    }

    #[test]
    fn test_from_chars() {
        let q = QuoteGlyphs::from_chars("„“‚‘").unwrap();
        assert_eq!(q.double_open(), "„");
        assert_eq!(q.single_close(), "‘");
        assert_eq!(QuoteGlyphs::from_chars("«»"), Err(QuoteGlyphsError::Count(2)));
    }

    #[test]
    fn test_multi_char_glyphs() {
        let q = QuoteGlyphs::new(["«\u{a0}", "\u{a0}»", "‹\u{a0}", "\u{a0}›"]).unwrap();
        assert_eq!(q.double_open(), "«\u{a0}");
    }

    #[test]
    fn test_empty_glyph_rejected() {
        assert_eq!(
            QuoteGlyphs::new(["“", "", "‘", "’"]),
            Err(QuoteGlyphsError::Empty(1))
        );
    }

    #[test]
    fn test_engine_options_default() {
        let options = EngineOptions::default();
        assert!(!options.html);
        assert!(!options.typographer);
        assert_eq!(options.quotes, QuoteGlyphs::default());
    }
}
