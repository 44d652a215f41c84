//! Typographic core rules.
//!
//! - [`replacements`] - dashes, ellipsis, `(c)`/`(r)`/`(tm)` and friends
//! - [`smartquotes`] - straight quotes to paired glyphs
//!
//! Both rules walk the block-level token list, only look inside
//! [`TokenKind::Inline`](crate::token::TokenKind::Inline) containers whose
//! `content` suggests work is needed, and only rewrite `Text` children.

pub mod replacements;
pub mod smartquotes;

pub use replacements::replacements;
pub use smartquotes::smartquotes;
