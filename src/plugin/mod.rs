//! Attribute typographer plugin.
//!
//! Extends the engine's typographer to text that ordinary inline processing
//! never reaches:
//!
//! - `alt` and `title` attributes of links and images
//! - image alt text (kept as child tokens, so nested markup survives)
//! - `alt` and `title` attributes inside raw HTML, when `html` is enabled
//!
//! # Modules
//!
//! - `scan`: attribute scanner for partial HTML fragments
//! - `visit`: token stream visitor

pub mod scan;
pub mod visit;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

use crate::debug;
use crate::engine::{Engine, Plugin, TypographerMode};

/// Name of the core rule pushed by [`AttrTypographer`].
pub const RULE_NAME: &str = "attr_typographer";

/// Plugin options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttrTypographerOptions {
    /// Rewrite attributes inside raw HTML tokens.
    pub html: bool,
}

/// Registration entry point.
///
/// Installation depends on the engine's typographer flag at install time:
/// when it is off, [`Engine::typographic_transform`] stays the identity and
/// no rule is added. Otherwise the callable follows the engine's live
/// options, and an `attr_typographer` rule is appended after every other
/// core rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttrTypographer {
    options: AttrTypographerOptions,
}

impl AttrTypographer {
    pub fn new(options: AttrTypographerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &AttrTypographerOptions {
        &self.options
    }
}

impl Plugin for AttrTypographer {
    fn install(self, engine: &mut Engine) {
        if engine.core().contains(RULE_NAME) {
            debug!("typographer"; "`{RULE_NAME}` already installed, skipping");
            return;
        }

        if !engine.options().typographer {
            debug!("typographer"; "typographer disabled, attributes left as-is");
            engine.set_typographer_mode(TypographerMode::Identity);
            return;
        }

        engine.set_typographer_mode(TypographerMode::Live);

        let html = self.options.html;
        engine.core_mut().push(RULE_NAME, move |state| {
            // Options may have changed since installation.
            if !state.options.typographer {
                return;
            }
            visit::apply(&mut state.tokens, state.options, html);
        });

        debug!("typographer"; "installed `{RULE_NAME}` (html: {html})");
    }
}
