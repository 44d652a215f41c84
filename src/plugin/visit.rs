//! Token stream visitor.
//!
//! | Token                      | Action |
//! |----------------------------|--------|
//! | `Inline`                   | recurse into children |
//! | `LinkOpen`, `Image`        | transform `alt`/`title` attribute values |
//! | `Image`                    | also transform alt text children in place |
//! | `HtmlInline`, `HtmlBlock`  | rewrite attributes in raw HTML (`html` only) |
//!
//! Tokens are mutated in place; count, order and kind never change.

use std::borrow::Cow;

use super::scan::AttrScanner;
use crate::engine::EngineOptions;
use crate::token::{Token, TokenKind};
use crate::typography::{transform, transform_children};

/// Attribute names rewritten on link and image tokens.
const TARGET_ATTRS: [&str; 2] = ["alt", "title"];

/// Visit one document's token list.
pub fn apply(tokens: &mut [Token], options: &EngineOptions, html: bool) {
    for token in tokens {
        match token.kind {
            TokenKind::Inline => apply(&mut token.children, options, html),
            TokenKind::LinkOpen => transform_attrs(token, options),
            TokenKind::Image => {
                transform_attrs(token, options);
                // Alt text lives in the children, not in the `alt` attribute.
                transform_children(&token.content, &mut token.children, options);
            }
            TokenKind::HtmlInline | TokenKind::HtmlBlock if html => {
                let rewritten = match rewrite_html(&token.content, options) {
                    Cow::Owned(content) => Some(content),
                    Cow::Borrowed(_) => None,
                };
                if let Some(content) = rewritten {
                    token.content = content;
                }
            }
            _ => {}
        }
    }
}

fn transform_attrs(token: &mut Token, options: &EngineOptions) {
    for (name, value) in token.attrs.iter_mut() {
        if TARGET_ATTRS.contains(&name) && !value.is_empty() {
            *value = transform(value, options);
        }
    }
}

fn rewrite_html<'a>(content: &'a str, options: &EngineOptions) -> Cow<'a, str> {
    AttrScanner::shared().rewrite(content, |value| transform(value, options))
}
