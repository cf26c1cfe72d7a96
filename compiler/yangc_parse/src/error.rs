//! Argument parsing errors.

use std::fmt;

use yangc_diagnostic::{Diagnostic, ErrorCode, ErrorKind, StatementSite};

/// Grammar production an argument was parsed against.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Production {
    Identifier,
    NodeIdentifier,
    AbsoluteSchemaNodeId,
    DescendantSchemaNodeId,
    RevisionDate,
    YangVersion,
    SemVer,
    Boolean,
    NonNegativeInteger,
    MaxValue,
    IfFeatureExpr,
    DeviateArg,
}

impl Production {
    pub fn as_str(self) -> &'static str {
        match self {
            Production::Identifier => "identifier",
            Production::NodeIdentifier => "node-identifier",
            Production::AbsoluteSchemaNodeId => "absolute-schema-nodeid",
            Production::DescendantSchemaNodeId => "descendant-schema-nodeid",
            Production::RevisionDate => "revision-date",
            Production::YangVersion => "yang-version-arg",
            Production::SemVer => "semantic-version",
            Production::Boolean => "boolean",
            Production::NonNegativeInteger => "non-negative-integer",
            Production::MaxValue => "max-value",
            Production::IfFeatureExpr => "if-feature-expr",
            Production::DeviateArg => "deviate-arg",
        }
    }

    fn code(self) -> ErrorCode {
        match self {
            Production::Identifier
            | Production::NodeIdentifier
            | Production::AbsoluteSchemaNodeId
            | Production::DescendantSchemaNodeId => ErrorCode::E0001,
            Production::RevisionDate => ErrorCode::E0005,
            Production::YangVersion => ErrorCode::E0006,
            Production::SemVer => ErrorCode::E0007,
            Production::Boolean | Production::NonNegativeInteger | Production::MaxValue => {
                ErrorCode::E0008
            }
            Production::IfFeatureExpr => ErrorCode::E0009,
            Production::DeviateArg => ErrorCode::E0010,
        }
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure to parse or bind a statement argument.
///
/// Offsets are 1-based character positions within the argument text.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum ArgumentError {
    /// A character not admitted by the production at this position.
    UnexpectedChar {
        production: Production,
        found: char,
        offset: usize,
    },
    /// Text ended where the production needs more.
    UnexpectedEnd { production: Production, offset: usize },
    /// A `/` that opens an empty schema-node identifier step.
    EmptyStep { production: Production, offset: usize },
    /// The whole argument does not form a value of the production.
    InvalidValue {
        production: Production,
        text: String,
        reason: String,
    },
    /// Prefix not bound to any module in the declaring source.
    UnknownPrefix { prefix: String, offset: usize },
}

impl ArgumentError {
    pub(crate) fn invalid(
        production: Production,
        text: &str,
        reason: impl Into<String>,
    ) -> Self {
        ArgumentError::InvalidValue {
            production,
            text: text.to_owned(),
            reason: reason.into(),
        }
    }

    /// Syntax errors for text the grammar rejects; binding errors for
    /// well-formed text naming an unknown prefix.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ArgumentError::UnknownPrefix { .. } => ErrorKind::Binding,
            _ => ErrorKind::Syntax,
        }
    }

    /// 1-based offset of the offending character, when there is one.
    pub fn offset(&self) -> Option<usize> {
        match self {
            ArgumentError::UnexpectedChar { offset, .. }
            | ArgumentError::UnexpectedEnd { offset, .. }
            | ArgumentError::EmptyStep { offset, .. }
            | ArgumentError::UnknownPrefix { offset, .. } => Some(*offset),
            ArgumentError::InvalidValue { .. } => None,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ArgumentError::UnexpectedChar { production, .. }
            | ArgumentError::UnexpectedEnd { production, .. }
            | ArgumentError::InvalidValue { production, .. } => production.code(),
            ArgumentError::EmptyStep { .. } => ErrorCode::E0002,
            ArgumentError::UnknownPrefix { .. } => ErrorCode::E1001,
        }
    }

    /// Report against the statement carrying the argument.
    pub fn to_diagnostic(&self, site: StatementSite) -> Diagnostic {
        let label = match self.offset() {
            Some(offset) => format!("in argument at offset {offset}"),
            None => "in this argument".to_owned(),
        };
        Diagnostic::error(self.code())
            .with_message(self.to_string())
            .with_label(site, label)
    }
}

impl fmt::Display for ArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentError::UnexpectedChar {
                production,
                found,
                offset,
            } => write!(
                f,
                "invalid character `{found}` at offset {offset} in {production}"
            ),
            ArgumentError::UnexpectedEnd { production, offset } => {
                write!(f, "unexpected end of {production} at offset {offset}")
            }
            ArgumentError::EmptyStep { production, offset } => {
                write!(f, "empty step at `/` offset {offset} in {production}")
            }
            ArgumentError::InvalidValue {
                production,
                text,
                reason,
            } => write!(f, "invalid {production} `{text}`: {reason}"),
            ArgumentError::UnknownPrefix { prefix, offset } => {
                write!(f, "unknown prefix `{prefix}` at offset {offset}")
            }
        }
    }
}

impl std::error::Error for ArgumentError {}
