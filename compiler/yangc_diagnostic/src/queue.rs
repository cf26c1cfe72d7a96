//! Per-phase collection of diagnostics.
//!
//! Workers report in whatever order the pool schedules them. The queue
//! tags every report with the registration index of its source and hands
//! them back sorted, so a failing run always prints the same list.

use yangc_ir::Location;

use crate::{Diagnostic, ErrorCode};

/// How a report relates to other failures of the same phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiagnosticSeverity {
    /// A failure in its own right.
    Hard,
    /// Probably caused by another failure, e.g. a reference that stayed
    /// unresolved because its prefix never bound.
    Soft,
}

/// Limits and filters applied while collecting.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiagnosticConfig {
    /// Stop accepting errors after this many; `0` means no limit.
    pub error_limit: usize,
    /// Drop soft reports once any hard report was accepted.
    pub filter_follow_on: bool,
    /// Collapse repeated reports against one statement.
    pub deduplicate: bool,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig {
            error_limit: 0,
            filter_follow_on: true,
            deduplicate: true,
        }
    }
}

impl DiagnosticConfig {
    /// Keep every report.
    pub fn unlimited() -> Self {
        DiagnosticConfig {
            filter_follow_on: false,
            deduplicate: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_error_limit(mut self, limit: usize) -> Self {
        self.error_limit = limit;
        self
    }
}

/// Source registration index, statement position, code.
type SortKey = (usize, Location, ErrorCode);

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
struct Entry {
    key: SortKey,
    diagnostic: Diagnostic,
}

/// Diagnostics of one phase, in deterministic order.
///
/// ```text
/// let mut queue = DiagnosticQueue::with_config(config);
/// queue.add(unknown_statement(site), source_index);
/// if queue.has_errors() {
///     return Err(queue.flush());
/// }
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct DiagnosticQueue {
    entries: Vec<Entry>,
    errors: usize,
    saw_hard: bool,
    config: DiagnosticConfig,
}

impl DiagnosticQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticQueue {
            config,
            ..Self::default()
        }
    }

    /// Report a hard failure of source number `source_order`.
    pub fn add(&mut self, diagnostic: Diagnostic, source_order: usize) -> bool {
        self.add_with_severity(diagnostic, source_order, DiagnosticSeverity::Hard)
    }

    /// Report `diagnostic`; `false` when a filter or the limit dropped it.
    pub fn add_with_severity(
        &mut self,
        diagnostic: Diagnostic,
        source_order: usize,
        severity: DiagnosticSeverity,
    ) -> bool {
        let soft = severity == DiagnosticSeverity::Soft;
        if self.limit_reached() || (soft && self.config.filter_follow_on && self.saw_hard) {
            return false;
        }

        let location = diagnostic
            .primary_site()
            .map_or(Location::UNKNOWN, |site| site.location);
        let key = (source_order, location, diagnostic.code);
        if self.config.deduplicate && self.repeats(&diagnostic, key) {
            return false;
        }

        if diagnostic.is_error() {
            self.errors += 1;
            self.saw_hard |= !soft;
        }
        self.entries.push(Entry { key, diagnostic });
        true
    }

    /// Take over the reports of a worker's queue, keeping their source tags.
    pub fn extend(&mut self, other: DiagnosticQueue) {
        for Entry { key, diagnostic } in other.entries {
            self.add(diagnostic, key.0);
        }
    }

    pub fn limit_reached(&self) -> bool {
        self.config.error_limit != 0 && self.errors >= self.config.error_limit
    }

    pub fn error_count(&self) -> usize {
        self.errors
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    /// Drain the queue in sort-key order.
    ///
    /// Reports with equal keys keep the order they arrived in.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        self.entries.sort_by_key(|entry| entry.key);
        self.errors = 0;
        self.saw_hard = false;
        self.entries.drain(..).map(|entry| entry.diagnostic).collect()
    }

    /// Same code against the same statement, with the same message. Syntax
    /// errors collapse on the key alone: one malformed argument tends to
    /// trip several productions.
    fn repeats(&self, diagnostic: &Diagnostic, key: SortKey) -> bool {
        diagnostic.is_error()
            && self.entries.iter().any(|entry| {
                entry.key == key
                    && (diagnostic.code.is_syntax_error()
                        || entry.diagnostic.message == diagnostic.message)
            })
    }
}

#[cfg(test)]
mod tests;
