//! Cross-source reactor.
//!
//! A [`CrossSourceReactor`] pairs a shared [`StatementRegistry`] with a run
//! configuration. Each [`BuildAction`] is one independent run: it collects
//! declared sources, drives them through the declarative phases in lock
//! step and finally assembles the effective model.
//!
//! # Phases
//!
//! No source enters phase N+1 before every active source has finished
//! phase N. Within a phase, sources are processed round by round (see the
//! `schedule` module); a phase that reports errors ends the run.

mod declare;
mod schedule;
mod source;

use std::sync::Arc;

use rustc_hash::FxHashMap;
use yangc_ir::{DeclaredSource, SourceId};

pub(crate) use schedule::Run;
pub(crate) use source::{NodeMode, Resolved, SourceState, StmtNode};

use crate::config::ReactorConfig;
use crate::effective::{self, EffectiveModel};
use crate::error::ReactorFailure;
use crate::linker::{library_closure, SourceHeader};
use crate::registry::StatementRegistry;
use crate::Phase;

/// Builds effective models from declared sources.
///
/// Cheap to clone; the registry is shared, never copied.
#[derive(Clone, Debug)]
pub struct CrossSourceReactor {
    registry: Arc<StatementRegistry>,
    config: ReactorConfig,
}

impl CrossSourceReactor {
    /// Reactor with the default configuration.
    pub fn new(registry: Arc<StatementRegistry>) -> Self {
        CrossSourceReactor {
            registry,
            config: ReactorConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: ReactorConfig) -> Self {
        self.config = config;
        self
    }

    #[inline]
    pub fn registry(&self) -> &Arc<StatementRegistry> {
        &self.registry
    }

    #[inline]
    pub fn config(&self) -> &ReactorConfig {
        &self.config
    }

    /// Start a new, independent run.
    pub fn new_build(&self) -> BuildAction<'_> {
        BuildAction {
            reactor: self,
            sources: Vec::new(),
        }
    }
}

/// Sources collected for one run.
pub struct BuildAction<'r> {
    reactor: &'r CrossSourceReactor,
    /// Each source with whether it is a library source.
    sources: Vec<(DeclaredSource, bool)>,
}

impl BuildAction<'_> {
    /// Add a main source. Main sources always take part in the run.
    pub fn add_source(&mut self, source: DeclaredSource) -> &mut Self {
        self.sources.push((source, false));
        self
    }

    pub fn add_sources(&mut self, sources: impl IntoIterator<Item = DeclaredSource>) -> &mut Self {
        self.sources
            .extend(sources.into_iter().map(|source| (source, false)));
        self
    }

    /// Add a library source. It takes part only if an active source
    /// depends on it, directly or transitively.
    pub fn add_library_source(&mut self, source: DeclaredSource) -> &mut Self {
        self.sources.push((source, true));
        self
    }

    /// Run every phase and assemble the effective model.
    ///
    /// Fails with the diagnostics of the first phase that reported errors.
    #[tracing::instrument(level = "debug", skip_all, fields(sources = self.sources.len()))]
    pub fn build(self) -> Result<EffectiveModel, ReactorFailure> {
        let registry = &*self.reactor.registry;
        let config = &self.reactor.config;

        let headers: Vec<SourceHeader> = self
            .sources
            .iter()
            .map(|(source, _)| SourceHeader::read(source.root()))
            .collect();
        let library: Vec<bool> = self.sources.iter().map(|(_, library)| *library).collect();
        let active = library_closure(&headers, &library, config.semantic_versioning);

        let mut sources: Vec<SourceState> = self
            .sources
            .iter()
            .zip(headers)
            .enumerate()
            .map(|(index, ((source, library), header))| {
                SourceState::new(index, source, header, *library, active[index])
            })
            .collect();
        let mut id_counts: FxHashMap<SourceId, usize> = FxHashMap::default();
        for source in &sources {
            *id_counts.entry(source.id.clone()).or_default() += 1;
        }
        for source in &mut sources {
            source.id_shared = id_counts.get(&source.id).is_some_and(|n| *n > 1);
        }
        tracing::debug!(
            active = sources.iter().filter(|s| s.active).count(),
            library = sources.iter().filter(|s| s.library).count(),
            "sources registered"
        );

        let mut run = Run::new(registry, config, sources);
        for phase in Phase::DECLARATIVE {
            run.run_phase(phase)?;
        }
        effective::build(run)
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
