//! Scalar argument productions.

use std::fmt;

use yangc_ir::{Revision, YangVersion};

use crate::{ArgumentError, Production};

/// Parse a `revision` / `revision-date` argument (`YYYY-MM-DD`).
pub fn parse_revision_date(text: &str) -> Result<Revision, ArgumentError> {
    text.parse::<Revision>()
        .map_err(|e| ArgumentError::invalid(Production::RevisionDate, text, e.message))
}

/// Parse a `yang-version` argument.
pub fn parse_yang_version(text: &str) -> Result<YangVersion, ArgumentError> {
    text.parse::<YangVersion>()
        .map_err(|_| ArgumentError::invalid(Production::YangVersion, text, "expected `1` or `1.1`"))
}

/// Parse an `openconfig-version` argument (`MAJOR.MINOR.PATCH`).
pub fn parse_semver(text: &str) -> Result<semver::Version, ArgumentError> {
    semver::Version::parse(text)
        .map_err(|e| ArgumentError::invalid(Production::SemVer, text, e.to_string()))
}

/// Parse `true` / `false`.
pub fn parse_boolean(text: &str) -> Result<bool, ArgumentError> {
    match text {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ArgumentError::invalid(
            Production::Boolean,
            text,
            "expected `true` or `false`",
        )),
    }
}

/// Parse a `min-elements` style argument: decimal digits, no sign, no
/// leading zeros except `0` itself.
pub fn parse_non_negative_integer(text: &str) -> Result<u32, ArgumentError> {
    parse_decimal(text, Production::NonNegativeInteger)
}

fn parse_decimal(text: &str, production: Production) -> Result<u32, ArgumentError> {
    if let Some((i, c)) = text.chars().enumerate().find(|(_, c)| !c.is_ascii_digit()) {
        return Err(ArgumentError::UnexpectedChar {
            production,
            found: c,
            offset: i + 1,
        });
    }
    if text.is_empty() {
        return Err(ArgumentError::UnexpectedEnd {
            production,
            offset: 1,
        });
    }
    if text.len() > 1 && text.starts_with('0') {
        return Err(ArgumentError::invalid(production, text, "leading zero"));
    }
    text.parse::<u32>()
        .map_err(|_| ArgumentError::invalid(production, text, "value out of range"))
}

/// `max-elements` argument.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum MaxValue {
    Unbounded,
    Bounded(u32),
}

impl fmt::Display for MaxValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaxValue::Unbounded => f.write_str("unbounded"),
            MaxValue::Bounded(n) => write!(f, "{n}"),
        }
    }
}

/// Parse `unbounded` or a positive integer.
pub fn parse_max_value(text: &str) -> Result<MaxValue, ArgumentError> {
    if text == "unbounded" {
        return Ok(MaxValue::Unbounded);
    }
    match parse_decimal(text, Production::MaxValue)? {
        0 => Err(ArgumentError::invalid(
            Production::MaxValue,
            text,
            "must be positive",
        )),
        n => Ok(MaxValue::Bounded(n)),
    }
}

/// `deviate` argument.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum DeviateKind {
    NotSupported,
    Add,
    Replace,
    Delete,
}

impl DeviateKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DeviateKind::NotSupported => "not-supported",
            DeviateKind::Add => "add",
            DeviateKind::Replace => "replace",
            DeviateKind::Delete => "delete",
        }
    }
}

impl fmt::Display for DeviateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn parse_deviate(text: &str) -> Result<DeviateKind, ArgumentError> {
    match text {
        "not-supported" => Ok(DeviateKind::NotSupported),
        "add" => Ok(DeviateKind::Add),
        "replace" => Ok(DeviateKind::Replace),
        "delete" => Ok(DeviateKind::Delete),
        _ => Err(ArgumentError::invalid(
            Production::DeviateArg,
            text,
            "expected `not-supported`, `add`, `replace` or `delete`",
        )),
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
