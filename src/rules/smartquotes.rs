//! Convert straight quotes to typographic quote glyphs.
//!
//! Quotes are paired per inline nesting level with a stack: an opening
//! candidate is pushed, and a closing candidate pops back to the nearest
//! compatible opener. Unpaired single quotes that cannot open become
//! apostrophes.
//!
//! Replacement positions are byte offsets; every glyph substitution shifts
//! the scan position by the glyph's length, so multi-character glyphs such
//! as `«\u{a0}` are fine.

use std::sync::LazyLock;

use regex::Regex;

use crate::engine::{EngineOptions, QuoteGlyphs};
use crate::token::{Token, TokenKind};

const APOSTROPHE: &str = "\u{2019}";

static PUNCT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[\p{P}\p{S}]$").unwrap());

/// Core rule: pair quotes in every inline container that has any.
pub fn smartquotes(tokens: &mut [Token], options: &EngineOptions) {
    if !options.typographer {
        return;
    }

    for token in tokens.iter_mut().rev() {
        if token.kind == TokenKind::Inline {
            quote_inline(&token.content, &mut token.children, &options.quotes);
        }
    }
}

/// Pair quotes in one inline child sequence.
///
/// `content` is the container's source text and gates the pass.
pub fn quote_inline(content: &str, children: &mut [Token], quotes: &QuoteGlyphs) {
    if content.contains(['\'', '"']) {
        process_inlines(children, quotes);
    }
}

/// Open quote waiting for its partner.
#[derive(Debug, Clone, Copy)]
struct OpenQuote {
    token: usize,
    pos: usize,
    single: bool,
    level: u32,
}

fn process_inlines(tokens: &mut [Token], quotes: &QuoteGlyphs) {
    let mut stack: Vec<OpenQuote> = Vec::new();

    for i in 0..tokens.len() {
        let level = tokens[i].level;
        while stack.last().is_some_and(|q| q.level > level) {
            stack.pop();
        }

        if tokens[i].kind != TokenKind::Text {
            continue;
        }

        let mut pos = 0;
        'outer: while pos < tokens[i].content.len() {
            let text = &tokens[i].content;
            let Some(offset) = text[pos..].find(['\'', '"']) else {
                break;
            };
            let index = pos + offset;
            let single = text.as_bytes()[index] == b'\'';
            pos = index + 1;

            let last = text[..index]
                .chars()
                .next_back()
                .unwrap_or_else(|| char_before(tokens, i));
            let next = text[pos..]
                .chars()
                .next()
                .unwrap_or_else(|| char_after(tokens, i));

            let (can_open, can_close) = classify(last, next, single);

            if !can_open && !can_close {
                // Middle of a word.
                if single {
                    pos += replace_at(&mut tokens[i].content, index, APOSTROPHE);
                }
                continue;
            }

            if can_close {
                for j in (0..stack.len()).rev() {
                    let open = stack[j];
                    if open.level < level {
                        break;
                    }
                    if open.single != single || open.level != level {
                        continue;
                    }

                    let (open_glyph, close_glyph) = quotes.pair(single);
                    // Closing quote first: both may sit in the same token.
                    pos += replace_at(&mut tokens[i].content, index, close_glyph);
                    let shift = replace_at(&mut tokens[open.token].content, open.pos, open_glyph);
                    if open.token == i {
                        pos += shift;
                    }
                    stack.truncate(j);
                    continue 'outer;
                }
            }

            if can_open {
                stack.push(OpenQuote {
                    token: i,
                    pos: index,
                    single,
                    level,
                });
            } else if can_close && single {
                pos += replace_at(&mut tokens[i].content, index, APOSTROPHE);
            }
        }
    }
}

/// Decide `(can_open, can_close)` from the surrounding characters.
fn classify(last: char, next: char, single: bool) -> (bool, bool) {
    let last_punct = is_punct(last);
    let next_punct = is_punct(next);
    let last_space = is_whitespace(last);
    let next_space = is_whitespace(next);

    let mut can_open = true;
    let mut can_close = true;

    if next_space {
        can_open = false;
    } else if next_punct && !(last_space || last_punct) {
        can_open = false;
    }

    if last_space {
        can_close = false;
    } else if last_punct && !(next_space || next_punct) {
        can_close = false;
    }

    // 1"" - the first quote is an inch mark.
    if !single && next == '"' && last.is_ascii_digit() {
        can_open = false;
        can_close = false;
    }

    if can_open && can_close {
        // Inside a punctuation run, but never in the middle of a word.
        can_open = last_punct;
        can_close = next_punct;
    }

    (can_open, can_close)
}

/// Last character of the nearest previous token with content.
///
/// A line break, or the start of the sequence, reads as a space.
fn char_before(tokens: &[Token], i: usize) -> char {
    for token in tokens[..i].iter().rev() {
        if token.kind.is_break() {
            break;
        }
        if let Some(c) = token.content.chars().next_back() {
            return c;
        }
    }
    ' '
}

/// First character of the nearest following token with content.
fn char_after(tokens: &[Token], i: usize) -> char {
    for token in &tokens[i + 1..] {
        if token.kind.is_break() {
            break;
        }
        if let Some(c) = token.content.chars().next() {
            return c;
        }
    }
    ' '
}

/// Replace the one-byte quote at `index`, returning how far later offsets move.
fn replace_at(s: &mut String, index: usize, glyph: &str) -> usize {
    s.replace_range(index..index + 1, glyph);
    glyph.len() - 1
}

fn is_whitespace(c: char) -> bool {
    matches!(
        c,
        '\u{09}'..='\u{0D}'
            | ' '
            | '\u{A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
    )
}

fn is_punct(c: char) -> bool {
    if c.is_ascii() {
        return c.is_ascii_punctuation();
    }
    let mut buf = [0u8; 4];
    PUNCT_RE.is_match(c.encode_utf8(&mut buf))
}
