//! Token stream model.
//!
//! A parsed document is a flat list of block-level tokens. Inline content
//! lives in the `children` of [`TokenKind::Inline`] tokens, and image alt
//! text lives in the `children` of [`TokenKind::Image`] tokens.
//!
//! Nesting is expressed with paired open/close tokens rather than a tree,
//! so transforms can mutate `content` and `attrs` in place without ever
//! changing the shape of the stream.

use smallvec::SmallVec;

/// Token type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Block
    ParagraphOpen,
    ParagraphClose,
    HeadingOpen,
    HeadingClose,
    BlockquoteOpen,
    BlockquoteClose,
    BulletListOpen,
    BulletListClose,
    OrderedListOpen,
    OrderedListClose,
    ListItemOpen,
    ListItemClose,
    CodeBlock,
    Fence,
    Hr,
    HtmlBlock,
    /// Container for the inline tokens of one block.
    Inline,

    // Inline
    Text,
    Softbreak,
    Hardbreak,
    CodeInline,
    EmOpen,
    EmClose,
    StrongOpen,
    StrongClose,
    StrikethroughOpen,
    StrikethroughClose,
    LinkOpen,
    LinkClose,
    Image,
    HtmlInline,
}

impl TokenKind {
    /// Nesting direction: `1` opens, `-1` closes, `0` is self-contained.
    pub fn nesting(self) -> i8 {
        use TokenKind::*;
        match self {
            ParagraphOpen | HeadingOpen | BlockquoteOpen | BulletListOpen | OrderedListOpen
            | ListItemOpen | EmOpen | StrongOpen | StrikethroughOpen | LinkOpen => 1,
            ParagraphClose | HeadingClose | BlockquoteClose | BulletListClose
            | OrderedListClose | ListItemClose | EmClose | StrongClose | StrikethroughClose
            | LinkClose => -1,
            _ => 0,
        }
    }

    /// Soft and hard line breaks.
    #[inline]
    pub fn is_break(self) -> bool {
        matches!(self, TokenKind::Softbreak | TokenKind::Hardbreak)
    }
}

// =============================================================================
// Attributes
// =============================================================================

/// Ordered attribute list, unique by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attrs(SmallVec<[(String, String); 2]>);

impl Attrs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an attribute value by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing the value in place if it already exists.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == name) {
            Some((_, v)) => *v = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterate with mutable access to values. Names stay fixed.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut String)> {
        self.0.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attrs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Self::new();
        for (k, v) in iter {
            attrs.set(k, v);
        }
        attrs
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for Attrs {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

// =============================================================================
// Token
// =============================================================================

/// A node of the parsed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// HTML tag name (`p`, `h2`, `a`, ...), empty for tagless tokens.
    pub tag: &'static str,
    pub attrs: Attrs,
    /// Raw text for text/code/html tokens, source text for inline containers.
    pub content: String,
    pub children: Vec<Token>,
    /// Inline nesting depth.
    pub level: u32,
    /// Fence language, or `"auto"` for autolink open/close.
    pub info: String,
}

impl Token {
    pub fn new(kind: TokenKind, tag: &'static str) -> Self {
        Self {
            kind,
            tag,
            attrs: Attrs::new(),
            content: String::new(),
            children: Vec::new(),
            level: 0,
            info: String::new(),
        }
    }

    /// Text token with the given content.
    pub fn text(content: impl Into<String>) -> Self {
        Self::new(TokenKind::Text, "").with_content(content)
    }

    /// Inline container holding `children`.
    pub fn inline(content: impl Into<String>, children: Vec<Token>) -> Self {
        let mut token = Self::new(TokenKind::Inline, "").with_content(content);
        token.children = children;
        token
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    pub fn with_attrs(mut self, attrs: Attrs) -> Self {
        self.attrs = attrs;
        self
    }

    /// Whether this is the open or close token of an autolink.
    #[inline]
    pub fn is_autolink(&self) -> bool {
        matches!(self.kind, TokenKind::LinkOpen | TokenKind::LinkClose) && self.info == "auto"
    }
}

/// Flatten inline tokens to plain text, as used for image alt text.
///
/// Text and raw HTML contribute their content, breaks become newlines and
/// nested images are flattened. Everything else, code spans included, is
/// dropped.
pub fn plain_text(tokens: &[Token]) -> String {
    let mut out = String::new();
    push_plain_text(tokens, &mut out);
    out
}

fn push_plain_text(tokens: &[Token], out: &mut String) {
    for token in tokens {
        match token.kind {
            TokenKind::Text | TokenKind::HtmlInline => out.push_str(&token.content),
            TokenKind::Image => push_plain_text(&token.children, out),
            TokenKind::Softbreak | TokenKind::Hardbreak => out.push('\n'),
            _ => {}
        }
    }
}
