//! Error codes for all compiler diagnostics.
//!
//! Each error code is a unique identifier (e.g., `E1001`) whose first digit
//! names the error kind. Used for documentation lookups and for matching
//! failures programmatically.

use std::fmt;
use std::str::FromStr;

/// Error kinds every diagnostic falls into.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorKind {
    /// Argument text does not match its grammar production.
    Syntax,
    /// A prefix, import or reference cannot be bound.
    Binding,
    /// Two writes to the same namespace key, or duplicate schema nodes.
    Conflict,
    /// A phase ended with statements still waiting on missing entries.
    UnsatisfiableDependency,
    /// Keyword absent from the registry and not ignorable.
    UnknownStatement,
    /// Statement shape violates its support's rules.
    InvalidStatement,
    /// Reactor invariant violated.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::Syntax => "syntax error",
            ErrorKind::Binding => "binding error",
            ErrorKind::Conflict => "conflict",
            ErrorKind::UnsatisfiableDependency => "unsatisfiable dependency",
            ErrorKind::UnknownStatement => "unknown statement",
            ErrorKind::InvalidStatement => "invalid statement",
            ErrorKind::Internal => "internal error",
        })
    }
}

/// Error codes for all compiler diagnostics.
///
/// Format: E#### where the first digit indicates the kind:
/// - E0xxx: Argument syntax errors
/// - E1xxx: Binding errors
/// - E2xxx: Conflicts
/// - E3xxx: Unsatisfiable dependencies
/// - E4xxx: Unknown statements
/// - E5xxx: Invalid statements
/// - E9xxx: Internal reactor errors
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorCode {
    // Syntax (E0xxx)
    /// Invalid identifier character
    E0001,
    /// Empty schema-node identifier step
    E0002,
    /// Missing required argument
    E0003,
    /// Argument given to a statement that takes none
    E0004,
    /// Invalid revision date
    E0005,
    /// Invalid yang-version
    E0006,
    /// Invalid semantic version
    E0007,
    /// Invalid boolean or integer argument
    E0008,
    /// Invalid if-feature expression
    E0009,
    /// Invalid deviate argument
    E0010,

    // Binding (E1xxx)
    /// Unknown prefix
    E1001,
    /// Import cannot be resolved
    E1002,
    /// Include cannot be resolved
    E1003,
    /// Submodule belongs to a different module
    E1004,
    /// No module satisfies a semantic-version import
    E1005,

    // Conflict (E2xxx)
    /// Duplicate namespace entry
    E2001,
    /// Duplicate schema node
    E2002,

    // Unsatisfiable dependency (E3xxx)
    /// Reference unresolved at phase end
    E3001,
    /// Augment target not found
    E3002,
    /// Deviation target not found
    E3003,
    /// Refine target not found
    E3004,
    /// Circular grouping usage
    E3005,

    // Unknown statement (E4xxx)
    /// Unknown statement keyword
    E4001,
    /// Root statement is not `module` or `submodule`
    E4002,

    // Invalid statement (E5xxx)
    /// Substatement not allowed here
    E5001,
    /// Substatement cardinality violated
    E5002,
    /// Invalid deviation operation
    E5003,
    /// Augment target cannot take children
    E5004,

    // Internal (E9xxx)
    /// Namespace not available in phase
    E9001,
    /// Internal reactor error
    E9002,
}

impl ErrorCode {
    /// All error code variants, for exhaustive testing.
    pub const ALL: &[ErrorCode] = &[
        ErrorCode::E0001,
        ErrorCode::E0002,
        ErrorCode::E0003,
        ErrorCode::E0004,
        ErrorCode::E0005,
        ErrorCode::E0006,
        ErrorCode::E0007,
        ErrorCode::E0008,
        ErrorCode::E0009,
        ErrorCode::E0010,
        ErrorCode::E1001,
        ErrorCode::E1002,
        ErrorCode::E1003,
        ErrorCode::E1004,
        ErrorCode::E1005,
        ErrorCode::E2001,
        ErrorCode::E2002,
        ErrorCode::E3001,
        ErrorCode::E3002,
        ErrorCode::E3003,
        ErrorCode::E3004,
        ErrorCode::E3005,
        ErrorCode::E4001,
        ErrorCode::E4002,
        ErrorCode::E5001,
        ErrorCode::E5002,
        ErrorCode::E5003,
        ErrorCode::E5004,
        ErrorCode::E9001,
        ErrorCode::E9002,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "E0001",
            ErrorCode::E0002 => "E0002",
            ErrorCode::E0003 => "E0003",
            ErrorCode::E0004 => "E0004",
            ErrorCode::E0005 => "E0005",
            ErrorCode::E0006 => "E0006",
            ErrorCode::E0007 => "E0007",
            ErrorCode::E0008 => "E0008",
            ErrorCode::E0009 => "E0009",
            ErrorCode::E0010 => "E0010",
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
            ErrorCode::E3003 => "E3003",
            ErrorCode::E3004 => "E3004",
            ErrorCode::E3005 => "E3005",
            ErrorCode::E4001 => "E4001",
            ErrorCode::E4002 => "E4002",
            ErrorCode::E5001 => "E5001",
            ErrorCode::E5002 => "E5002",
            ErrorCode::E5003 => "E5003",
            ErrorCode::E5004 => "E5004",
            ErrorCode::E9001 => "E9001",
            ErrorCode::E9002 => "E9002",
        }
    }

    /// Kind of error this code reports.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ErrorCode::E0001
            | ErrorCode::E0002
            | ErrorCode::E0003
            | ErrorCode::E0004
            | ErrorCode::E0005
            | ErrorCode::E0006
            | ErrorCode::E0007
            | ErrorCode::E0008
            | ErrorCode::E0009
            | ErrorCode::E0010 => ErrorKind::Syntax,
            ErrorCode::E1001
            | ErrorCode::E1002
            | ErrorCode::E1003
            | ErrorCode::E1004
            | ErrorCode::E1005 => ErrorKind::Binding,
            ErrorCode::E2001 | ErrorCode::E2002 => ErrorKind::Conflict,
            ErrorCode::E3001
            | ErrorCode::E3002
            | ErrorCode::E3003
            | ErrorCode::E3004
            | ErrorCode::E3005 => ErrorKind::UnsatisfiableDependency,
            ErrorCode::E4001 | ErrorCode::E4002 => ErrorKind::UnknownStatement,
            ErrorCode::E5001 | ErrorCode::E5002 | ErrorCode::E5003 | ErrorCode::E5004 => {
                ErrorKind::InvalidStatement
            }
            ErrorCode::E9001 | ErrorCode::E9002 => ErrorKind::Internal,
        }
    }

    /// Check if this is an argument syntax error.
    pub fn is_syntax_error(&self) -> bool {
        self.kind() == ErrorKind::Syntax
    }

    /// Check if this error aborts its phase outright.
    ///
    /// Conflicts and unsatisfiable dependencies mean the source graph cannot
    /// produce a consistent model; other kinds are local to one statement.
    pub fn is_fatal_to_phase(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Conflict | ErrorKind::UnsatisfiableDependency | ErrorKind::Internal
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorCode::ALL
            .iter()
            .copied()
            .find(|code| code.as_str() == s)
            .ok_or(())
    }
}

#[cfg(test)]
mod tests;
