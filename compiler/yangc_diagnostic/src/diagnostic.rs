//! Diagnostics point at statements, not byte spans.
//!
//! Declared trees carry a line and column per statement, so a
//! [`StatementSite`] (source, keyword, position) is the finest location a
//! reactor failure can name.

use std::fmt;

use yangc_ir::{Location, SourceId};

use crate::{ErrorCode, ErrorKind};

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl Severity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The statement a diagnostic is about.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatementSite {
    pub source: SourceId,
    /// Registration index of the source, present only when another source
    /// of the run has the same id.
    pub ordinal: Option<usize>,
    /// Keyword as written, prefix included.
    pub keyword: String,
    pub location: Location,
}

impl StatementSite {
    pub fn new(source: SourceId, keyword: impl Into<String>, location: Location) -> Self {
        StatementSite {
            source,
            ordinal: None,
            keyword: keyword.into(),
            location,
        }
    }

    /// Tell this source apart from others with the same id.
    #[must_use]
    pub fn with_ordinal(mut self, ordinal: usize) -> Self {
        self.ordinal = Some(ordinal);
        self
    }
}

/// ```text
/// a:4:3 `leaf`
/// a#1:4:3 `leaf`    (second of two sources named `a`)
/// ```
impl fmt::Display for StatementSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)?;
        if let Some(ordinal) = self.ordinal {
            write!(f, "#{ordinal}")?;
        }
        write!(f, ":{} `{}`", self.location, self.keyword)
    }
}

/// One statement involved in a failure.
///
/// Exactly one label of a diagnostic is primary. Conflicts add the earlier
/// contributor as a secondary label.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Label {
    pub site: StatementSite,
    pub message: String,
    pub is_primary: bool,
}

impl Label {
    fn at(site: StatementSite, message: impl Into<String>, is_primary: bool) -> Self {
        Label {
            site,
            message: message.into(),
            is_primary,
        }
    }

    pub fn primary(site: StatementSite, message: impl Into<String>) -> Self {
        Self::at(site, message, true)
    }

    pub fn secondary(site: StatementSite, message: impl Into<String>) -> Self {
        Self::at(site, message, false)
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[must_use = "a diagnostic does nothing until it is queued or returned"]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub severity: Severity,
    pub message: String,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    #[cold]
    pub fn error(code: ErrorCode) -> Self {
        Diagnostic {
            code,
            severity: Severity::Error,
            message: String::new(),
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Point at the offending statement.
    pub fn with_label(mut self, site: StatementSite, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(site, message));
        self
    }

    pub fn with_secondary_label(mut self, site: StatementSite, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(site, message));
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.code.kind()
    }

    pub fn primary_site(&self) -> Option<&StatementSite> {
        self.labels
            .iter()
            .find_map(|label| label.is_primary.then_some(&label.site))
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// ```text
/// error [E2001]: conflicting definitions of `g` in namespace `grouping`
///   --> b:9:3 `grouping`: second definition here
///       a:2:3 `grouping`: first defined here
/// ```
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.severity, self.code, self.message)?;
        for label in &self.labels {
            let arrow = if label.is_primary { "-->" } else { "   " };
            write!(f, "\n  {arrow} {}: {}", label.site, label.message)?;
        }
        for note in &self.notes {
            write!(f, "\n  = note: {note}")?;
        }
        Ok(())
    }
}

/// Two contributors populated the same namespace key.
pub fn namespace_conflict(
    namespace: &str,
    key: &str,
    site: StatementSite,
    previous: StatementSite,
) -> Diagnostic {
    Diagnostic::error(ErrorCode::E2001)
        .with_message(format!(
            "conflicting definitions of `{key}` in namespace `{namespace}`"
        ))
        .with_label(site, "second definition here")
        .with_secondary_label(previous, "first defined here")
}

/// A statement was still waiting on a namespace entry when its phase ended.
pub fn unresolved_reference(site: StatementSite, waiting_on: &str, phase: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E3001)
        .with_message(format!("unresolved reference to {waiting_on}"))
        .with_label(site, "referenced here")
        .with_note(format!(
            "phase `{phase}` ended before the reference could be resolved"
        ))
}

pub fn unknown_statement(site: StatementSite) -> Diagnostic {
    let message = format!("unknown statement `{}`", site.keyword);
    Diagnostic::error(ErrorCode::E4001)
        .with_message(message)
        .with_label(site, "not a known statement in this language version")
}

#[cfg(test)]
mod tests;
