//! Simple typographic replacements.
//!
//! | Input            | Output |
//! |------------------|--------|
//! | `(c)` `(r)` `(tm)` | `©` `®` `™` (case-insensitive) |
//! | `+-`             | `±`    |
//! | `..`, `...`      | `…` (but `?..` / `!..` after a mark) |
//! | `????`, `!!!!`   | `???`, `!!!` |
//! | `,,`             | `,`    |
//! | `---`            | `—`    |
//! | `--`             | `–`    |
//!
//! Text inside autolinks is left alone.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::engine::EngineOptions;
use crate::token::{Token, TokenKind};

static RARE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\+-|\.\.|\?\?\?\?|!!!!|,,|--").unwrap());

static SCOPED_ABBR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\((c|tm|r)\)").unwrap());

static PLUS_MINUS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\+-").unwrap());
static ELLIPSIS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.{2,}").unwrap());
static MARK_ELLIPSIS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([?!])…").unwrap());
static MARKS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([?!]){4,}").unwrap());
static COMMAS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r",{2,}").unwrap());

/// Core rule: run replacements over every inline container.
pub fn replacements(tokens: &mut [Token], options: &EngineOptions) {
    if !options.typographer {
        return;
    }

    for token in tokens.iter_mut().rev() {
        if token.kind == TokenKind::Inline {
            replace_inline(&token.content, &mut token.children);
        }
    }
}

/// Run replacements over one inline child sequence.
///
/// `content` is the container's source text and gates each pass.
pub fn replace_inline(content: &str, children: &mut [Token]) {
    if SCOPED_ABBR_RE.is_match(content) {
        for_each_text(children, replace_scoped);
    }
    if RARE_RE.is_match(content) {
        for_each_text(children, replace_rare);
    }
}

/// Apply `f` to every text child outside autolinks.
fn for_each_text(children: &mut [Token], f: fn(&str) -> Cow<'_, str>) {
    // Walks backwards, so a close token is seen before its open token.
    let mut inside_autolink = 0i32;

    for token in children.iter_mut().rev() {
        if token.kind == TokenKind::Text && inside_autolink == 0 {
            let replaced = match f(&token.content) {
                Cow::Owned(replaced) => Some(replaced),
                Cow::Borrowed(_) => None,
            };
            if let Some(replaced) = replaced {
                token.content = replaced;
            }
        }

        if token.is_autolink() {
            match token.kind {
                TokenKind::LinkOpen => inside_autolink -= 1,
                TokenKind::LinkClose => inside_autolink += 1,
                _ => {}
            }
        }
    }
}

/// `(c)`, `(r)`, `(tm)`.
fn replace_scoped(text: &str) -> Cow<'_, str> {
    SCOPED_ABBR_RE.replace_all(text, |caps: &Captures| {
        match caps[1].to_ascii_lowercase().as_str() {
            "c" => "©",
            "r" => "®",
            _ => "™",
        }
    })
}

fn replace_rare(text: &str) -> Cow<'_, str> {
    if !RARE_RE.is_match(text) {
        return Cow::Borrowed(text);
    }

    let text = PLUS_MINUS_RE.replace_all(text, "±");
    let text = ELLIPSIS_RE.replace_all(&text, "…").into_owned();
    let text = MARK_ELLIPSIS_RE.replace_all(&text, "$1..").into_owned();
    let text = MARKS_RE.replace_all(&text, "$1$1$1").into_owned();
    let text = COMMAS_RE.replace_all(&text, ",").into_owned();
    Cow::Owned(replace_dashes(&text).into_owned())
}

/// Em and en dashes.
///
/// A run of exactly three hyphens becomes `—`. A run of exactly two becomes
/// `–` when it is spaced on both sides (`a -- b`) or tight on both sides
/// (`a--b`); line boundaries count as either.
fn replace_dashes(text: &str) -> Cow<'_, str> {
    if !text.contains("--") {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        if c != '-' {
            continue;
        }

        let mut end = start + 1;
        while chars.next_if(|&(_, c)| c == '-').is_some() {
            end += 1;
        }

        let before = text[..start].chars().next_back();
        let after = text[end..].chars().next();
        let dash = match end - start {
            3 => Some('\u{2014}'),
            2 if en_dash_fits(before, after) => Some('\u{2013}'),
            _ => None,
        };

        if let Some(dash) = dash {
            out.push_str(&text[copied..start]);
            out.push(dash);
            copied = end;
        }
    }

    if copied == 0 {
        return Cow::Borrowed(text);
    }
    out.push_str(&text[copied..]);
    Cow::Owned(out)
}

fn en_dash_fits(before: Option<char>, after: Option<char>) -> bool {
    let side = |c: Option<char>| match c {
        None | Some('\n' | '\r' | '\u{2028}' | '\u{2029}') => (true, true),
        Some(c) => (c.is_whitespace(), !c.is_whitespace()),
    };
    let (before_space, before_tight) = side(before);
    let (after_space, after_tight) = side(after);
    (before_space && after_space) || (before_tight && after_tight)
}
