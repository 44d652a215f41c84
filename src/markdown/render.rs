//! Token stream to HTML rendering.
//!
//! Output layout follows the common CommonMark renderers: block open tags
//! are followed by a newline unless inline content comes next, close tags
//! always are, and raw HTML tokens are written verbatim.

use crate::token::{Token, TokenKind, plain_text};
use crate::utils::html::escape_text;

/// Render a block-level token list to HTML.
pub fn render(tokens: &[Token]) -> String {
    let mut out = String::with_capacity(tokens.iter().map(|t| t.content.len()).sum::<usize>() * 2);

    for (idx, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::Inline => render_inline(&token.children, &mut out),
            TokenKind::CodeBlock => {
                out.push_str("<pre><code>");
                out.push_str(&escape_text(&token.content));
                out.push_str("</code></pre>\n");
            }
            TokenKind::Fence => render_fence(token, &mut out),
            TokenKind::HtmlBlock => out.push_str(&token.content),
            TokenKind::Hr => out.push_str("<hr>\n"),
            _ => render_block_tag(tokens, idx, &mut out),
        }
    }

    out
}

/// Render inline children.
pub fn render_inline(children: &[Token], out: &mut String) {
    for token in children {
        match token.kind {
            TokenKind::Text => out.push_str(&escape_text(&token.content)),
            TokenKind::Softbreak => out.push('\n'),
            TokenKind::Hardbreak => out.push_str("<br>\n"),
            TokenKind::CodeInline => {
                out.push_str("<code>");
                out.push_str(&escape_text(&token.content));
                out.push_str("</code>");
            }
            TokenKind::HtmlInline => out.push_str(&token.content),
            TokenKind::Image => render_image(token, out),
            _ => render_tag(token, out),
        }
    }
}

fn render_block_tag(tokens: &[Token], idx: usize, out: &mut String) {
    let token = &tokens[idx];
    let nesting = token.kind.nesting();

    // Tight list items have no paragraph wrapper, so a nested block starts
    // on its own line.
    if nesting == 1 && idx > 0 && tokens[idx - 1].kind == TokenKind::Inline {
        out.push('\n');
    }

    render_tag(token, out);

    let next = tokens.get(idx + 1);
    let need_lf = match next {
        Some(next) if nesting == 1 => {
            next.kind != TokenKind::Inline && !(next.kind.nesting() == -1 && next.tag == token.tag)
        }
        _ => true,
    };
    if need_lf {
        out.push('\n');
    }
}

fn render_tag(token: &Token, out: &mut String) {
    out.push_str(if token.kind.nesting() == -1 { "</" } else { "<" });
    out.push_str(token.tag);
    if token.kind.nesting() != -1 {
        render_attrs(token.attrs.iter(), out);
    }
    out.push('>');
}

fn render_attrs<'a>(attrs: impl Iterator<Item = (&'a str, &'a str)>, out: &mut String) {
    for (name, value) in attrs {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape_text(value));
        out.push('"');
    }
}

/// `alt` comes from the flattened children, not the stored attribute.
fn render_image(token: &Token, out: &mut String) {
    let alt = plain_text(&token.children);
    out.push_str("<img");
    render_attrs(
        token
            .attrs
            .iter()
            .map(|(name, value)| if name == "alt" { (name, alt.as_str()) } else { (name, value) }),
        out,
    );
    out.push('>');
}

fn render_fence(token: &Token, out: &mut String) {
    let lang = token.info.split_whitespace().next().unwrap_or_default();
    if lang.is_empty() {
        out.push_str("<pre><code>");
    } else {
        out.push_str("<pre><code class=\"language-");
        out.push_str(&escape_text(lang));
        out.push_str("\">");
    }
    out.push_str(&escape_text(&token.content));
    out.push_str("</code></pre>\n");
}
