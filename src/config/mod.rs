//! Configuration for the engine and the attribute typographer.
//!
//! # Sections
//!
//! | Section              | Purpose                                   |
//! |----------------------|-------------------------------------------|
//! | `[markdown]`         | Engine options (html, typographer, quotes) |
//! | `[attr_typographer]` | Plugin options (html)                     |
//!
//! ```toml
//! [markdown]
//! html = true
//! typographer = true
//! quotes = ["« ", " »", "‹ ", " ›"]
//!
//! [attr_typographer]
//! html = true
//! ```

mod error;

pub use error::ConfigError;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::engine::{Engine, EngineOptions};
use crate::plugin::{AttrTypographer, AttrTypographerOptions};
use crate::{debug, log};

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Engine options
    pub markdown: EngineOptions,

    /// Attribute typographer options
    pub attr_typographer: AttrTypographerOptions,
}

impl Config {
    /// Parse configuration from TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load and validate configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)
            .with_context(|| format!("Failed to parse `{}`", path.display()))?;

        if !ignored.is_empty() {
            log!("warning"; "unknown fields in {}, ignoring: {}", path.display(), ignored.join(", "));
        }

        config
            .validate()
            .with_context(|| format!("Invalid config `{}`", path.display()))?;

        debug!("config"; "loaded {}", path.display());
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Check option combinations that deserialize fine but cannot work.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.attr_typographer.html && !self.markdown.html {
            return Err(ConfigError::Validation(
                "`attr_typographer.html` requires `markdown.html`: raw HTML is parsed as text otherwise"
                    .into(),
            ));
        }
        Ok(())
    }

    /// Build an engine with the attribute typographer installed.
    pub fn build_engine(&self) -> Engine {
        Engine::new(self.markdown.clone()).with_plugin(AttrTypographer::new(self.attr_typographer))
    }
}
