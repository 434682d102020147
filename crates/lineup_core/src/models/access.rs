//! Ownership and sharing boundary.
//!
//! The core never inspects identity. The host builds an [`AccessContext`]
//! once and hands the derived read-only flag inward.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Key under which a roster document is stored (the owning account).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerKey(String);

impl OwnerKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OwnerKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Who is looking at which roster.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessContext {
    /// Owner named in a share link, if the roster was opened through one.
    pub viewed_owner: Option<OwnerKey>,
    /// Signed-in account, if any.
    pub actor: Option<OwnerKey>,
}

impl AccessContext {
    pub fn new(viewed_owner: Option<OwnerKey>, actor: Option<OwnerKey>) -> Self {
        Self { viewed_owner, actor }
    }

    /// Viewing somebody else's shared roster.
    pub fn is_read_only(&self) -> bool {
        match &self.viewed_owner {
            Some(viewed) => self.actor.as_ref() != Some(viewed),
            None => false,
        }
    }

    /// Roster document to load: the shared one if any, else the actor's own.
    pub fn document_owner(&self) -> Option<&OwnerKey> {
        self.viewed_owner.as_ref().or(self.actor.as_ref())
    }
}

/// Link that opens `owner`'s roster in read-only mode for everybody else.
pub fn share_link(origin: &str, owner: &OwnerKey) -> String {
    format!("{}?uid={}", origin.trim_end_matches('/'), owner)
}
