//! Typed model of the Bitbucket push-event payload.
//!
//! Only the `push.changes` portion of the webhook body is modeled; actor
//! and repository metadata are ignored by serde. Every field defaults when
//! absent so a structurally valid JSON object always deserializes.

use serde::Deserialize;

/// What kind of ref a change points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RefKind {
    Branch,
    Tag,
    /// Anything else Bitbucket might send (e.g. "named_branch").
    #[default]
    #[serde(other)]
    Unknown,
}

/// A named pointer to a branch or tag.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Ref {
    #[serde(rename = "type", default)]
    pub kind: RefKind,
    #[serde(default)]
    pub name: String,
}

/// One updated reference in a push.
///
/// `new` is null when a ref is deleted and `old` is null when one is
/// created, so both sides are optional.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RefChange {
    #[serde(rename = "new", default)]
    pub new_ref: Option<Ref>,
    #[serde(rename = "old", default)]
    pub old_ref: Option<Ref>,
    #[serde(default)]
    pub created: bool,
    #[serde(default)]
    pub closed: bool,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ChangeSet {
    #[serde(default)]
    pub changes: Vec<RefChange>,
}

/// A Bitbucket push-event notification.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PushEvent {
    #[serde(default)]
    pub push: ChangeSet,
}

impl PushEvent {
    /// Returns the names of all branches touched by this push,
    /// in payload order.
    pub fn branches(&self) -> Vec<&str> {
        self.refs_of_kind(RefKind::Branch)
    }

    /// Returns the names of all tags touched by this push, in payload order.
    pub fn tags(&self) -> Vec<&str> {
        self.refs_of_kind(RefKind::Tag)
    }

    fn refs_of_kind(&self, kind: RefKind) -> Vec<&str> {
        self.push
            .changes
            .iter()
            .filter_map(|change| change.new_ref.as_ref())
            .filter(|new_ref| new_ref.kind == kind)
            .map(|new_ref| new_ref.name.as_str())
            .collect()
    }
}
