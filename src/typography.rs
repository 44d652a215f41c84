//! String typographic engine.
//!
//! The substitution rules are written against whole documents: they look
//! for inline containers and rewrite their text children. To run them on a
//! single string we wrap it in a synthetic one-token document:
//!
//! ```text
//! [ Inline { content: text, children: [ Text { content: text } ] } ]
//! ```
//!
//! `content` gates the rules, the child is what they rewrite, and the
//! result is read back from the child. [`transform_children`] uses the same
//! wrapper around an existing child sequence so that image alt text keeps
//! its markup tokens while its text is rewritten.

use crate::engine::{EngineOptions, QuoteGlyphs};
use crate::rules;
use crate::token::Token;

/// Run replacements then smart quotes over a block-level token list.
fn apply_rules(tokens: &mut [Token], options: &EngineOptions) {
    rules::replacements(tokens, options);
    rules::smartquotes(tokens, options);
}

/// Build the synthetic document for `content` around `children`.
fn synthetic_document(content: &str, children: Vec<Token>) -> Vec<Token> {
    vec![Token::inline(content, children)]
}

/// Apply typographic substitutions to a single string.
///
/// Follows `options.typographer`: when it is off the text comes back unchanged.
pub fn transform(text: &str, options: &EngineOptions) -> String {
    let mut doc = synthetic_document(text, vec![Token::text(text)]);
    apply_rules(&mut doc, options);

    doc.pop()
        .and_then(|inline| inline.children.into_iter().next())
        .map(|child| child.content)
        .unwrap_or_else(|| text.to_string())
}

/// Apply typographic substitutions to an existing inline child sequence.
///
/// Only text children change; markup tokens stay in place. `content` plays
/// the role of the container's source text.
pub fn transform_children(content: &str, children: &mut Vec<Token>, options: &EngineOptions) {
    let mut doc = synthetic_document(content, std::mem::take(children));
    apply_rules(&mut doc, options);

    if let Some(inline) = doc.pop() {
        *children = inline.children;
    }
}

/// Standalone typographer with the default quote glyphs.
///
/// Has no engine to consult, so substitutions always apply.
pub fn typographer(text: &str) -> String {
    typographer_with(text, &QuoteGlyphs::default())
}

/// Standalone typographer with custom quote glyphs.
pub fn typographer_with(text: &str, quotes: &QuoteGlyphs) -> String {
    let options = EngineOptions {
        typographer: true,
        ..EngineOptions::default()
    }
    .with_quotes(quotes.clone());
    transform(text, &options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{TokenKind, plain_text};

    #[test]
    fn test_plain_text_unchanged() {
        for s in ["", "hello world", "no markers: a-b, c.d", "1 + 1 = 2"] {
            assert_eq!(typographer(s), s);
        }
    }

    #[test]
    fn test_smart_quotes_and_trademark() {
        assert_eq!(
            typographer("Some \"text\" that's containing smart quotes(tm)"),
            "Some “text” that’s containing smart quotes™"
        );
    }

    #[test]
    fn test_quote_before_replaced_symbol() {
        assert_eq!(typographer(r#"The "Brand"(tm) logo"#), "The “Brand”™ logo");
    }

    #[test]
    fn test_attribute_scenario() {
        assert_eq!(typographer("With it's title(tm)"), "With it’s title™");
    }

    #[test]
    fn test_double_quote_pair_uses_glyphs() {
        let quotes = QuoteGlyphs::from_chars("„“‚‘").unwrap();
        assert_eq!(typographer_with(r#"He said "hi""#, &quotes), "He said „hi“");
    }

    #[test]
    fn test_french_glyphs() {
        let french = QuoteGlyphs::new(["«\u{a0}", "\u{a0}»", "‹\u{a0}", "\u{a0}›"]).unwrap();
        assert_eq!(
            typographer_with(
                "Some \"text\" that's containing 'smart' quotes(tm)",
                &french
            ),
            "Some «\u{a0}text\u{a0}» that’s containing ‹\u{a0}smart\u{a0}› quotes™"
        );
    }

    #[test]
    fn test_disabled_typographer_is_identity() {
        let text = "Some \"text\" (tm) -- ...";
        assert_eq!(transform(text, &EngineOptions::default()), text);
    }

    #[test]
    fn test_synthetic_document_shape() {
        let doc = synthetic_document("abc", vec![Token::text("abc")]);
        assert_eq!(doc.len(), 1);
        assert_eq!(doc[0].kind, TokenKind::Inline);
        assert_eq!(doc[0].content, "abc");
        assert_eq!(doc[0].children.len(), 1);
        assert_eq!(doc[0].children[0].kind, TokenKind::Text);
        assert_eq!(doc[0].children[0].content, "abc");
    }

    #[test]
    fn test_transform_children_keeps_markup() {
        let mut children = vec![
            Token::text("Image(tm) with \"quotes\" and "),
            Token::new(TokenKind::EmOpen, "em"),
            Token::text("garbage").with_level(1),
            Token::new(TokenKind::EmClose, "em"),
            Token::text(" alt"),
        ];
        let content = plain_text(&children);
        transform_children(&content, &mut children, &EngineOptions::typographic());

        assert_eq!(children.len(), 5);
        assert_eq!(children[0].content, "Image™ with “quotes” and ");
        assert_eq!(children[1].kind, TokenKind::EmOpen);
        assert_eq!(plain_text(&children), "Image™ with “quotes” and garbage alt");
    }
}
