//! Hook definitions and the registry they are served from.
//!
//! Hooks are loaded once at startup from a JSON file and are read-only for
//! the life of the process, so the registry can be shared across requests
//! without locking.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{HookError, Result};
use crate::event::PushEvent;
use crate::rules::TriggerRule;

/// A single configured hook: an id, the command to run on match, and an
/// optional trigger rule gating it.
#[derive(Debug, Clone, Deserialize)]
pub struct Hook {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "execute-command", default)]
    pub execute_command: String,
    #[serde(rename = "command-working-directory", default)]
    pub command_working_directory: String,
    #[serde(rename = "response_message", default)]
    pub response_message: String,
    #[serde(rename = "trigger-rule", default)]
    pub trigger_rule: Option<TriggerRule>,
}

impl Hook {
    /// Evaluates this hook's trigger rule against the event.
    ///
    /// A hook with no trigger rule matches unconditionally.
    pub fn evaluate(&self, event: &PushEvent) -> (bool, String) {
        match &self.trigger_rule {
            Some(rule) => rule.evaluate(event),
            None => (true, String::new()),
        }
    }
}

/// Ordered collection of hooks, keyed by id on lookup.
#[derive(Debug, Clone, Default)]
pub struct HookRegistry {
    hooks: Vec<Hook>,
}

impl HookRegistry {
    /// Builds a registry from already-parsed hooks, rejecting duplicate ids.
    pub fn from_hooks(hooks: Vec<Hook>) -> Result<Self> {
        let mut seen: Vec<&str> = Vec::with_capacity(hooks.len());
        for hook in &hooks {
            if seen.contains(&hook.id.as_str()) {
                return Err(HookError::DuplicateHookId(hook.id.clone()));
            }
            seen.push(&hook.id);
        }
        Ok(Self { hooks })
    }

    /// Loads a registry from a JSON file containing an array of hooks.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let hooks: Vec<Hook> = serde_json::from_str(&contents)?;
        Self::from_hooks(hooks)
    }

    /// Returns the first hook with the given id, if any.
    pub fn find(&self, id: &str) -> Option<&Hook> {
        self.hooks.iter().find(|hook| hook.id == id)
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Hook> {
        self.hooks.iter()
    }
}
