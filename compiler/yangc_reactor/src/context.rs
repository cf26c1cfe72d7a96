//! Per-statement view handed to statement behaviors.

use yangc_diagnostic::{Diagnostic, StatementSite};
use yangc_ir::{Keyword, Location, QNameInterner, SourceId, YangVersion};
use yangc_parse::PrefixBindings;

use crate::namespace::{NamespaceId, NamespaceStore, NodeRef, NsEntry, NsKey, NsValue, StagedWrite};
use crate::Phase;

fn site(
    source_id: &SourceId,
    ordinal: Option<usize>,
    keyword: &Keyword,
    location: Location,
) -> StatementSite {
    let site = StatementSite::new(source_id.clone(), keyword.to_string(), location);
    match ordinal {
        Some(ordinal) => site.with_ordinal(ordinal),
        None => site,
    }
}

/// Result of one attempt at a statement's phase work.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum Outcome {
    /// Work for this phase is finished.
    Done,
    /// A namespace entry the statement needs is not populated yet. The
    /// statement is retried in the next round of the same phase; the text
    /// names what it waits on and ends up in the diagnostic if the phase
    /// finishes without it.
    Deferred(String),
}

/// What a behavior sees while processing one statement.
///
/// Reads go to the namespace snapshot committed at the end of the previous
/// round. Writes are staged and become visible to every statement (this
/// one included) only after the round barrier.
pub struct StmtContext<'a> {
    pub(crate) phase: Phase,
    pub(crate) store: &'a NamespaceStore,
    pub(crate) interner: &'a QNameInterner,
    pub(crate) source_id: &'a SourceId,
    pub(crate) ordinal: Option<usize>,
    pub(crate) version: YangVersion,
    pub(crate) node: NodeRef,
    pub(crate) keyword: &'a Keyword,
    pub(crate) argument: Option<&'a str>,
    pub(crate) location: Location,
    pub(crate) bindings: Option<&'a PrefixBindings>,
    pub(crate) writes: &'a mut Vec<StagedWrite>,
    pub(crate) diagnostics: &'a mut Vec<Diagnostic>,
}

impl<'a> StmtContext<'a> {
    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn interner(&self) -> &'a QNameInterner {
        self.interner
    }

    #[inline]
    pub fn source_id(&self) -> &'a SourceId {
        self.source_id
    }

    /// Language revision of the declaring source.
    #[inline]
    pub fn version(&self) -> YangVersion {
        self.version
    }

    #[inline]
    pub fn node(&self) -> NodeRef {
        self.node
    }

    #[inline]
    pub fn keyword(&self) -> &'a Keyword {
        self.keyword
    }

    #[inline]
    pub fn argument(&self) -> Option<&'a str> {
        self.argument
    }

    #[inline]
    pub fn location(&self) -> Location {
        self.location
    }

    /// Prefix table of the declaring source. `None` before source linkage.
    #[inline]
    pub fn bindings(&self) -> Option<&'a PrefixBindings> {
        self.bindings
    }

    /// Committed entry of `namespace` as seen from the declaring source.
    pub fn lookup(&self, namespace: NamespaceId, key: &NsKey) -> Option<&'a NsEntry> {
        self.store.get(namespace, self.node.source, key)
    }

    /// Stage a write attributed to this statement.
    pub fn put(&mut self, namespace: NamespaceId, key: NsKey, value: NsValue) {
        self.writes.push(StagedWrite {
            namespace,
            key,
            value,
            contributor: self.node,
        });
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Site of this statement, for diagnostic labels.
    pub fn site(&self) -> StatementSite {
        site(self.source_id, self.ordinal, self.keyword, self.location)
    }
}

/// What a behavior sees while its statement is instantiated into the
/// effective model.
///
/// Every declarative phase is complete: namespaces are read-only and hold
/// their final content.
pub struct EffectiveContext<'a> {
    pub(crate) store: &'a NamespaceStore,
    pub(crate) interner: &'a QNameInterner,
    pub(crate) source_id: &'a SourceId,
    pub(crate) ordinal: Option<usize>,
    pub(crate) node: NodeRef,
    pub(crate) keyword: &'a Keyword,
    pub(crate) argument: Option<&'a str>,
    pub(crate) location: Location,
    pub(crate) diagnostics: Vec<Diagnostic>,
}

impl<'a> EffectiveContext<'a> {
    #[inline]
    pub fn interner(&self) -> &'a QNameInterner {
        self.interner
    }

    #[inline]
    pub fn source_id(&self) -> &'a SourceId {
        self.source_id
    }

    #[inline]
    pub fn keyword(&self) -> &'a Keyword {
        self.keyword
    }

    /// Argument text as written.
    #[inline]
    pub fn argument(&self) -> Option<&'a str> {
        self.argument
    }

    #[inline]
    pub fn location(&self) -> Location {
        self.location
    }

    pub fn lookup(&self, namespace: NamespaceId, key: &NsKey) -> Option<&'a NsEntry> {
        self.store.get(namespace, self.node.source, key)
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn site(&self) -> StatementSite {
        site(self.source_id, self.ordinal, self.keyword, self.location)
    }
}

