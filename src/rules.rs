//! Trigger-rule engine: a boolean expression tree evaluated against a
//! [`PushEvent`].
//!
//! Evaluation returns `(matched, value)` where `value` is the branch or
//! tag name that satisfied a leaf condition. Tag names come back prefixed
//! with `tags/` so a matched tag is distinguishable from a branch with the
//! same name downstream.

use regex::Regex;
use serde::Deserialize;
use tracing::warn;

use crate::event::PushEvent;

/// Prefix applied to matched tag names before they reach the command runner.
pub const TAG_PREFIX: &str = "tags/";

/// How a leaf condition compares names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    /// Exact string equality. The wire name is `value`.
    #[serde(rename = "value", alias = "literal")]
    Value,
    /// Substring regex match, compiled with the `regex` crate.
    Regex,
}

/// Which ref list a leaf condition scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchSource {
    Branch,
    Tag,
}

/// A single leaf condition: "is there a branch/tag whose name
/// equals/matches this value?"
#[derive(Debug, Clone, Deserialize)]
pub struct MatchRule {
    #[serde(rename = "type")]
    pub kind: MatchKind,
    pub source: MatchSource,
    pub value: String,
}

impl MatchRule {
    /// Evaluates this condition against the event. First match in payload
    /// order wins; no match is `(false, "")`.
    pub fn evaluate(&self, event: &PushEvent) -> (bool, String) {
        let (candidates, prefix) = match self.source {
            MatchSource::Branch => (event.branches(), ""),
            MatchSource::Tag => (event.tags(), TAG_PREFIX),
        };

        let hit = match self.kind {
            MatchKind::Value => list_has_value(&candidates, &self.value),
            MatchKind::Regex => list_has_regex_value(&candidates, &self.value),
        };

        match hit {
            Some(name) => (true, format!("{prefix}{name}")),
            None => (false, String::new()),
        }
    }
}

/// Returns the first candidate exactly equal to `value`.
fn list_has_value<'a>(candidates: &[&'a str], value: &str) -> Option<&'a str> {
    candidates.iter().copied().find(|name| *name == value)
}

/// Returns the first candidate containing a match for `pattern`.
///
/// An invalid pattern is a local failure: it is logged and treated as
/// no-match rather than aborting the enclosing tree evaluation.
fn list_has_regex_value<'a>(candidates: &[&'a str], pattern: &str) -> Option<&'a str> {
    let re = match Regex::new(pattern) {
        Ok(re) => re,
        Err(e) => {
            warn!("Cannot compile regex '{}': {}", pattern, e);
            return None;
        }
    };

    candidates.iter().copied().find(|name| re.is_match(name))
}

/// A trigger rule: a recursive boolean expression over leaf conditions.
///
/// The serde representation is externally tagged, so the persisted hook
/// format (`{"and": [...]}`, `{"or": [...]}`, `{"not": {...}}`,
/// `{"match": {...}}`) is accepted verbatim, and a node with two variants
/// populated is unrepresentable.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerRule {
    And(Vec<TriggerRule>),
    Or(Vec<TriggerRule>),
    Not(Box<TriggerRule>),
    Match(MatchRule),
}

impl TriggerRule {
    /// Evaluates this rule tree against the event.
    ///
    /// `And` and `Or` short-circuit left to right; the returned value is
    /// the one produced by the last child evaluated. `Not` inverts the
    /// boolean but passes its child's value through unchanged; callers
    /// only consume the value when the overall result is true.
    pub fn evaluate(&self, event: &PushEvent) -> (bool, String) {
        match self {
            TriggerRule::And(children) => {
                let mut value = String::new();
                for child in children {
                    let (matched, child_value) = child.evaluate(event);
                    value = child_value;
                    if !matched {
                        return (false, value);
                    }
                }
                (true, value)
            }
            TriggerRule::Or(children) => {
                let mut value = String::new();
                for child in children {
                    let (matched, child_value) = child.evaluate(event);
                    value = child_value;
                    if matched {
                        return (true, value);
                    }
                }
                (false, value)
            }
            TriggerRule::Not(child) => {
                let (matched, value) = child.evaluate(event);
                (!matched, value)
            }
            TriggerRule::Match(rule) => rule.evaluate(event),
        }
    }
}
