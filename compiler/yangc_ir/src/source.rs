//! Source identifiers.

use std::fmt;

use crate::Revision;

/// Identifies one input source: module or submodule name plus an optional
/// revision.
///
/// Used as the key for per-source state and for import/include resolution.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceId {
    pub name: String,
    pub revision: Option<Revision>,
}

impl SourceId {
    /// Create an identifier without a revision.
    pub fn new(name: impl Into<String>) -> Self {
        SourceId {
            name: name.into(),
            revision: None,
        }
    }

    /// Create an identifier pinned to a revision.
    pub fn with_revision(name: impl Into<String>, revision: Revision) -> Self {
        SourceId {
            name: name.into(),
            revision: Some(revision),
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.revision {
            Some(rev) => write!(f, "{}@{}", self.name, rev),
            None => f.write_str(&self.name),
        }
    }
}

impl fmt::Debug for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SourceId({self})")
    }
}
