//! Diagnostic system for schema compilation failures.
//!
//! - Error codes for searchability, grouped by [`ErrorKind`]
//! - Clear messages (what went wrong)
//! - Primary statement site (where it went wrong)
//! - Secondary labels (e.g. the other contributor of a conflict)
//!
//! Diagnostics are collected per phase in a [`DiagnosticQueue`], which
//! yields them in a deterministic order.

mod diagnostic;
mod error_code;
pub mod queue;

pub use diagnostic::{
    namespace_conflict, unknown_statement, unresolved_reference, Diagnostic, Label, Severity,
    StatementSite,
};
pub use error_code::{ErrorCode, ErrorKind};
pub use queue::{DiagnosticConfig, DiagnosticQueue, DiagnosticSeverity};
