//! Markdown engine: parse → core rules → render.
//!
//! - [`EngineOptions`] - live option set read by every rule at call time
//! - [`CoreRuler`] - ordered chain of named core rules
//! - [`Plugin`] - extension point for installing rules
//!
//! # Example
//!
//! ```ignore
//! let engine = Engine::new(EngineOptions::typographic())
//!     .with_plugin(AttrTypographer::new(AttrTypographerOptions { html: true }));
//!
//! let html = engine.render(r#"[link](/x "it's(tm)")"#);
//! assert_eq!(engine.typographic_transform("(tm)"), "™");
//! ```

mod options;
mod ruler;

pub use options::{EngineOptions, QuoteGlyphs, QuoteGlyphsError};
pub use ruler::{CoreRuleFn, CoreRuler, CoreState};

use crate::markdown::{convert, render};
use crate::rules;
use crate::token::Token;
use crate::typography;

/// Something that extends an engine.
pub trait Plugin {
    fn install(self, engine: &mut Engine);
}

/// What [`Engine::typographic_transform`] does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TypographerMode {
    /// Return the input unchanged.
    #[default]
    Identity,
    /// Run the string typographic engine with the engine's live options.
    Live,
}

/// Markdown engine instance.
#[derive(Debug)]
pub struct Engine {
    options: EngineOptions,
    core: CoreRuler,
    typographer: TypographerMode,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineOptions::default())
    }
}

impl Engine {
    /// Create an engine with the built-in `replacements` and `smartquotes` rules.
    pub fn new(options: EngineOptions) -> Self {
        let mut core = CoreRuler::new();
        core.push("replacements", |state| {
            rules::replacements(&mut state.tokens, state.options)
        });
        core.push("smartquotes", |state| {
            rules::smartquotes(&mut state.tokens, state.options)
        });

        Self {
            options,
            core,
            typographer: TypographerMode::Identity,
        }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Mutable access to the live options. Rules see changes on the next call.
    pub fn options_mut(&mut self) -> &mut EngineOptions {
        &mut self.options
    }

    pub fn core(&self) -> &CoreRuler {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut CoreRuler {
        &mut self.core
    }

    /// Install a plugin.
    pub fn use_plugin<P: Plugin>(&mut self, plugin: P) -> &mut Self {
        plugin.install(self);
        self
    }

    /// Builder-style [`use_plugin`](Self::use_plugin).
    pub fn with_plugin<P: Plugin>(mut self, plugin: P) -> Self {
        plugin.install(&mut self);
        self
    }

    pub fn typographer_mode(&self) -> TypographerMode {
        self.typographer
    }

    /// Set once by the plugin that owns the typographer at install time.
    pub(crate) fn set_typographer_mode(&mut self, mode: TypographerMode) {
        self.typographer = mode;
    }

    /// Apply typographic substitutions to a single string.
    ///
    /// Identity unless a plugin installed the live typographer.
    pub fn typographic_transform(&self, text: &str) -> String {
        match self.typographer {
            TypographerMode::Identity => text.to_string(),
            TypographerMode::Live => typography::transform(text, &self.options),
        }
    }

    /// Parse Markdown into a token stream and run the core rules over it.
    pub fn parse(&self, src: &str) -> Vec<Token> {
        let mut state = CoreState {
            tokens: convert::tokenize(src, &self.options),
            options: &self.options,
        };
        self.core.process(&mut state);
        state.tokens
    }

    /// Render Markdown to HTML.
    pub fn render(&self, src: &str) -> String {
        self.render_tokens(&self.parse(src))
    }

    /// Render an already parsed token stream.
    pub fn render_tokens(&self, tokens: &[Token]) -> String {
        render::render(tokens)
    }
}
