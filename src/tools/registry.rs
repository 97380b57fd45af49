//! Tool registry: canonical handler map, alias table, designated fallback.
//!
//! Resolution is deterministic and total: every action name resolves to some
//! handler; "tool not found" is never surfaced to the caller.

use super::traits::{Fallback, Tool};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Outcome of resolving one action name.
pub enum Resolution {
    /// A registered handler, after alias substitution.
    Tool {
        canonical: String,
        tool: Arc<dyn Tool>,
    },
    /// The designated fallback, carrying the original unaliased name.
    Fallback {
        action: String,
        handler: Arc<dyn Fallback>,
    },
}

pub struct ToolRegistry {
    handlers: BTreeMap<String, Arc<dyn Tool>>,
    aliases: BTreeMap<String, String>,
    fallback: Arc<dyn Fallback>,
}

impl ToolRegistry {
    pub fn new(fallback: Arc<dyn Fallback>) -> Self {
        Self {
            handlers: BTreeMap::new(),
            aliases: BTreeMap::new(),
            fallback,
        }
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.handlers.insert(tool.name().to_string(), tool);
    }

    /// Map an alternate action spelling to a canonical tool name. Later
    /// entries win, so config-supplied aliases override the built-in table.
    pub fn add_alias(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.aliases.insert(from.into(), to.into());
    }

    pub fn canonical_names(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    /// Resolve an action name, in order: exact alias substitution, handler
    /// lookup, designated fallback with the original name passed through.
    pub fn resolve(&self, action: &str) -> Resolution {
        let canonical = self
            .aliases
            .get(action)
            .map(String::as_str)
            .unwrap_or(action);

        if let Some(tool) = self.handlers.get(canonical) {
            Resolution::Tool {
                canonical: canonical.to_string(),
                tool: Arc::clone(tool),
            }
        } else {
            Resolution::Fallback {
                action: action.to_string(),
                handler: Arc::clone(&self.fallback),
            }
        }
    }
}
