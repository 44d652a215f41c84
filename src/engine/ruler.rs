//! Ordered chain of named core rules.
//!
//! Core rules run once per document, after block and inline parsing, in the
//! order they were pushed. Each rule sees the whole token list and the live
//! engine options.

use std::fmt;

use super::EngineOptions;
use crate::token::Token;

/// State handed to core rules.
pub struct CoreState<'a> {
    pub tokens: Vec<Token>,
    pub options: &'a EngineOptions,
}

/// Boxed core rule.
pub type CoreRuleFn = dyn Fn(&mut CoreState<'_>) + Send + Sync;

struct CoreRule {
    name: &'static str,
    run: Box<CoreRuleFn>,
}

/// Core rule chain.
#[derive(Default)]
pub struct CoreRuler {
    rules: Vec<CoreRule>,
}

impl CoreRuler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule after all existing ones.
    pub fn push<F>(&mut self, name: &'static str, rule: F)
    where
        F: Fn(&mut CoreState<'_>) + Send + Sync + 'static,
    {
        self.rules.push(CoreRule {
            name,
            run: Box::new(rule),
        });
    }

    /// Whether a rule with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.rules.iter().any(|r| r.name == name)
    }

    /// Rule names in execution order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|r| r.name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run every rule in order.
    pub fn process(&self, state: &mut CoreState<'_>) {
        for rule in &self.rules {
            (rule.run)(state);
        }
    }
}

impl fmt::Debug for CoreRuler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
