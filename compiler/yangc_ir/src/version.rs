//! Language revisions (`yang-version`).

use std::fmt;
use std::str::FromStr;

/// Language revision declared by a source through `yang-version`.
///
/// Statement supports may differ between revisions; the registry selects
/// the variant matching the revision of the *declaring* source.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum YangVersion {
    /// Version `1` (the default when no `yang-version` is present).
    #[default]
    V1,
    /// Version `1.1`.
    V1_1,
}

impl YangVersion {
    /// All known revisions, oldest first.
    pub const ALL: [YangVersion; 2] = [YangVersion::V1, YangVersion::V1_1];

    pub const fn as_str(self) -> &'static str {
        match self {
            YangVersion::V1 => "1",
            YangVersion::V1_1 => "1.1",
        }
    }
}

/// Error for an unrecognized `yang-version` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVersion(pub String);

impl fmt::Display for UnknownVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported yang-version `{}`", self.0)
    }
}

impl std::error::Error for UnknownVersion {}

impl FromStr for YangVersion {
    type Err = UnknownVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1" => Ok(YangVersion::V1),
            "1.1" => Ok(YangVersion::V1_1),
            other => Err(UnknownVersion(other.to_owned())),
        }
    }
}

impl fmt::Display for YangVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
