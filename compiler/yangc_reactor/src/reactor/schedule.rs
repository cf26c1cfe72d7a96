//! Phase scheduler.
//!
//! A phase runs as a sequence of rounds. In each round every active source
//! attempts its pending statements against the namespace snapshot
//! committed by the previous round, optionally on the rayon pool. Outputs
//! are collected in source registration order and merged sequentially:
//! diagnostics into the phase queue, staged writes into the store. The
//! phase ends when nothing is pending, or when a full round makes no
//! progress, in which case every statement still pending is reported.

use rayon::prelude::*;
use yangc_diagnostic::{
    namespace_conflict, unresolved_reference, Diagnostic, DiagnosticQueue, DiagnosticSeverity,
    ErrorCode, StatementSite,
};
use yangc_ir::SharedInterner;

use super::declare::SourceOutput;
use super::source::SourceState;
use crate::config::ReactorConfig;
use crate::error::ReactorFailure;
use crate::namespace::{NamespaceError, NamespaceStore, NodeRef};
use crate::registry::StatementRegistry;
use crate::Phase;

/// Read-only view of a run shared by every source during a round.
pub(crate) struct Env<'a> {
    pub phase: Phase,
    pub registry: &'a StatementRegistry,
    pub interner: &'a SharedInterner,
    pub store: &'a NamespaceStore,
    pub config: &'a ReactorConfig,
}

/// One build in progress.
pub(crate) struct Run<'r> {
    pub registry: &'r StatementRegistry,
    pub config: &'r ReactorConfig,
    pub sources: Vec<SourceState>,
    pub store: NamespaceStore,
}

impl<'r> Run<'r> {
    pub fn new(
        registry: &'r StatementRegistry,
        config: &'r ReactorConfig,
        sources: Vec<SourceState>,
    ) -> Self {
        Run {
            registry,
            config,
            sources,
            store: NamespaceStore::new(registry.namespaces()),
        }
    }

    /// Drive every active source through `phase`.
    #[tracing::instrument(level = "debug", skip_all, fields(phase = %phase))]
    pub fn run_phase(&mut self, phase: Phase) -> Result<(), ReactorFailure> {
        let mut queue = DiagnosticQueue::with_config(self.config.diagnostics.clone());

        let prepared = self.each_source(phase, SourceState::prepare);
        self.merge(phase, prepared, &mut queue);

        let mut round = 0_usize;
        loop {
            round += 1;
            let outputs = self.each_source(phase, SourceState::run_round);
            let progressed = self.merge(phase, outputs, &mut queue);
            let pending: usize = self.sources.iter().map(|s| s.pending.len()).sum();
            tracing::debug!(round, pending, progressed, "round complete");
            if pending == 0 {
                break;
            }
            if !progressed {
                self.report_stuck(phase, &mut queue);
                break;
            }
        }

        if phase == Phase::SourceLinkage {
            let interner = self.registry.interner();
            for source in self.sources.iter_mut().filter(|s| s.active) {
                source.bind_prefixes(&self.store, interner);
            }
        }

        if queue.has_errors() {
            tracing::debug!(errors = queue.error_count(), "phase failed");
            return Err(ReactorFailure::new(phase, queue.flush()));
        }
        Ok(())
    }

    /// Apply `work` to every active source, in parallel when configured.
    /// Results come back in registration order either way.
    fn each_source<F>(&mut self, phase: Phase, work: F) -> Vec<(usize, SourceOutput)>
    where
        F: Fn(&mut SourceState, &Env<'_>) -> SourceOutput + Sync,
    {
        let env = Env {
            phase,
            registry: self.registry,
            interner: self.registry.interner(),
            store: &self.store,
            config: self.config,
        };
        if self.config.parallel {
            self.sources
                .par_iter_mut()
                .filter(|s| s.active)
                .map(|s| (s.index, work(s, &env)))
                .collect()
        } else {
            self.sources
                .iter_mut()
                .filter(|s| s.active)
                .map(|s| (s.index, work(s, &env)))
                .collect()
        }
    }

    /// Merge source outputs in order and commit their writes. Returns
    /// whether a statement finished or the store changed.
    fn merge(
        &mut self,
        phase: Phase,
        outputs: Vec<(usize, SourceOutput)>,
        queue: &mut DiagnosticQueue,
    ) -> bool {
        let mut progressed = false;
        let mut writes = Vec::new();
        for (index, output) in outputs {
            for diagnostic in output.diagnostics {
                queue.add(diagnostic, index);
            }
            progressed |= output.progressed;
            writes.extend(output.writes);
        }
        if writes.is_empty() {
            return progressed;
        }
        let generation = self.store.generation();
        for error in self.store.commit(phase, writes) {
            let (diagnostic, order) = self.namespace_diagnostic(&error);
            queue.add(diagnostic, order);
        }
        progressed || self.store.generation() != generation
    }

    fn site(&self, node: NodeRef) -> StatementSite {
        self.sources[node.source].site(node.node)
    }

    fn namespace_diagnostic(&self, error: &NamespaceError) -> (Diagnostic, usize) {
        match error {
            NamespaceError::Conflict {
                namespace,
                key,
                first,
                second,
            } => {
                let key = key.describe(self.registry.interner());
                let diagnostic =
                    namespace_conflict(namespace.name(), &key, self.site(*second), self.site(*first));
                (diagnostic, second.source)
            }
            NamespaceError::Unavailable {
                namespace,
                phase,
                contributor,
            } => {
                let diagnostic = Diagnostic::error(ErrorCode::E9001)
                    .with_message(format!(
                        "namespace `{namespace}` cannot be written in phase `{phase}`"
                    ))
                    .with_label(self.site(*contributor), "written here");
                (diagnostic, contributor.source)
            }
        }
    }

    /// Report statements still waiting when a round made no progress.
    fn report_stuck(&mut self, phase: Phase, queue: &mut DiagnosticQueue) {
        for source in self.sources.iter_mut().filter(|s| s.active) {
            for pending in std::mem::take(&mut source.pending) {
                let waiting_on = pending.waiting_on.as_deref().unwrap_or("a namespace entry");
                tracing::debug!(
                    source = %source.id,
                    node = pending.node,
                    waiting_on,
                    "statement unresolved at end of phase"
                );
                queue.add_with_severity(
                    unresolved_reference(source.site(pending.node), waiting_on, phase.as_str()),
                    source.index,
                    DiagnosticSeverity::Soft,
                );
            }
        }
    }
}
