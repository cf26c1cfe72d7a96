//! Run-level failure.

use std::fmt::Write;

use yangc_diagnostic::{Diagnostic, ErrorKind};

use crate::Phase;

/// A reactor run that did not produce an effective model.
///
/// Carries every diagnostic collected in the phase that failed, ordered by
/// source registration order, then position, then error code.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{phase} phase failed:{}", render(.diagnostics))]
pub struct ReactorFailure {
    pub phase: Phase,
    pub diagnostics: Vec<Diagnostic>,
}

fn render(diagnostics: &[Diagnostic]) -> String {
    let mut out = String::new();
    for diag in diagnostics {
        let _ = write!(out, "\n{diag}");
    }
    out
}

impl ReactorFailure {
    pub(crate) fn new(phase: Phase, diagnostics: Vec<Diagnostic>) -> Self {
        ReactorFailure { phase, diagnostics }
    }

    /// Kinds of every error, in report order.
    pub fn kinds(&self) -> Vec<ErrorKind> {
        self.diagnostics.iter().map(Diagnostic::kind).collect()
    }

    /// Check if any diagnostic is of `kind`.
    pub fn has_kind(&self, kind: ErrorKind) -> bool {
        self.diagnostics.iter().any(|d| d.kind() == kind)
    }

    /// First diagnostic in report order.
    pub fn first(&self) -> Option<&Diagnostic> {
        self.diagnostics.first()
    }
}
