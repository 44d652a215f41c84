//! Attr-typographer - typographic substitutions for Markdown attributes.
//!
//! Ordinary text gets smart quotes and replacements from the engine's own
//! core rules. This crate carries the same substitutions into places those
//! rules never look: link and image `alt`/`title` attributes, image alt
//! text, and `alt`/`title` attributes inside raw HTML.
//!
//! ```ignore
//! use attr_typographer::{AttrTypographer, AttrTypographerOptions, Engine, EngineOptions};
//!
//! let engine = Engine::new(EngineOptions::typographic())
//!     .with_plugin(AttrTypographer::new(AttrTypographerOptions { html: true }));
//!
//! assert_eq!(
//!     engine.render(r#"[link](/x "it's(tm)")"#),
//!     "<p><a href=\"/x\" title=\"it’s™\">link</a></p>\n"
//! );
//! ```

pub mod config;
pub mod engine;
pub mod logger;
pub mod markdown;
pub mod plugin;
pub mod rules;
pub mod token;
pub mod typography;
pub mod utils;

pub use config::{Config, ConfigError};
pub use engine::{Engine, EngineOptions, Plugin, QuoteGlyphs, TypographerMode};
pub use plugin::scan::AttrScanner;
pub use plugin::{AttrTypographer, AttrTypographerOptions};
pub use typography::{transform, typographer, typographer_with};
