//! Namespaces: phase-scoped key→value tables populated by statements.
//!
//! A namespace is declared once through a [`NamespaceDef`] in a statement
//! support bundle, naming its scope (global or per source), its merge
//! policy and the phase from which it may be populated. A run keeps one
//! [`NamespaceStore`] holding every table.
//!
//! # Visibility
//!
//! Phase work reads an immutable snapshot of the store and stages its
//! writes. Staged writes are committed between rounds, in source
//! registration order, so a statement never observes a partial write from
//! another source's concurrent work.

use std::collections::BTreeMap;
use std::fmt;

use yangc_ir::{ModuleNs, QName, QNameInterner, Revision, SchemaNodeId};

use crate::Phase;

pub mod builtin;

/// Identifier of a namespace.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NamespaceId(&'static str);

impl NamespaceId {
    pub const fn new(name: &'static str) -> Self {
        NamespaceId(name)
    }

    pub const fn name(self) -> &'static str {
        self.0
    }
}

impl fmt::Debug for NamespaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NamespaceId({})", self.0)
    }
}

impl fmt::Display for NamespaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Who can see a namespace's entries.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum NamespaceScope {
    /// Visible to every source once committed.
    Global,
    /// One table per source, visible only to that source.
    Source,
}

/// What a second write of an existing key does.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum MergePolicy {
    /// A differing value is a conflict; an equal value is accepted.
    Unique,
    /// The later write in commit order replaces the earlier one.
    LastWins,
}

/// Declaration of a namespace.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct NamespaceDef {
    pub id: NamespaceId,
    pub scope: NamespaceScope,
    pub policy: MergePolicy,
    /// First phase in which the namespace may be populated. Earlier reads
    /// always find nothing.
    pub phase: Phase,
}

impl NamespaceDef {
    pub const fn global(id: NamespaceId, phase: Phase) -> Self {
        NamespaceDef {
            id,
            scope: NamespaceScope::Global,
            policy: MergePolicy::Unique,
            phase,
        }
    }

    pub const fn source_local(id: NamespaceId, phase: Phase) -> Self {
        NamespaceDef {
            id,
            scope: NamespaceScope::Source,
            policy: MergePolicy::Unique,
            phase,
        }
    }

    #[must_use]
    pub const fn last_wins(mut self) -> Self {
        self.policy = MergePolicy::LastWins;
        self
    }
}

/// A statement of one source: `(source registration index, node index)`.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct NodeRef {
    pub source: usize,
    pub node: usize,
}

impl NodeRef {
    pub const fn new(source: usize, node: usize) -> Self {
        NodeRef { source, node }
    }
}

/// Namespace key.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum NsKey {
    Text(String),
    /// Name plus optional revision, e.g. a module identity.
    Versioned(String, Option<Revision>),
    QName(QName),
    /// A name visible only below a given statement.
    Scoped(NodeRef, QName),
    /// Data attached to one statement.
    Node(NodeRef),
    /// A property contributed to a `refine` target of a `uses`.
    Refine {
        uses: NodeRef,
        target: SchemaNodeId,
        property: QName,
        /// Set for multi-valued properties, one entry per statement.
        discriminator: Option<NodeRef>,
    },
}

impl NsKey {
    pub fn text(s: impl Into<String>) -> Self {
        NsKey::Text(s.into())
    }

    pub fn versioned(name: impl Into<String>, revision: Option<Revision>) -> Self {
        NsKey::Versioned(name.into(), revision)
    }

    /// Human-readable rendering for diagnostics.
    pub fn describe(&self, interner: &QNameInterner) -> String {
        match self {
            NsKey::Text(s) => s.clone(),
            NsKey::Versioned(name, Some(rev)) => format!("{name}@{rev}"),
            NsKey::Versioned(name, None) => name.clone(),
            NsKey::QName(q) | NsKey::Scoped(_, q) => interner.display(*q),
            NsKey::Node(node) => format!("statement {}/{}", node.source, node.node),
            NsKey::Refine {
                target, property, ..
            } => format!(
                "{} of {}",
                interner.display(*property),
                target.display(interner)
            ),
        }
    }
}

/// Namespace value.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum NsValue {
    /// A source, by registration index.
    Source(usize),
    Module(ModuleNs),
    Stmt(NodeRef),
    Name(QName),
    Text(String),
    Version(semver::Version),
}

/// Committed entry with the statement that wrote it.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct NsEntry {
    pub value: NsValue,
    pub contributor: NodeRef,
}

/// A write produced by phase work, applied at the end of a round.
#[derive(Clone, Debug)]
pub struct StagedWrite {
    pub namespace: NamespaceId,
    pub key: NsKey,
    pub value: NsValue,
    pub contributor: NodeRef,
}

/// Failure to commit a staged write.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum NamespaceError {
    /// Namespace not registered, or written before its phase.
    Unavailable {
        namespace: NamespaceId,
        phase: Phase,
        contributor: NodeRef,
    },
    /// Same key, differing value, and no override policy.
    Conflict {
        namespace: NamespaceId,
        key: NsKey,
        first: NodeRef,
        second: NodeRef,
    },
}

type TableKey = (NamespaceId, Option<usize>);

/// All namespace tables of one run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NamespaceStore {
    defs: BTreeMap<NamespaceId, NamespaceDef>,
    tables: BTreeMap<TableKey, BTreeMap<NsKey, NsEntry>>,
    /// Bumped whenever a commit adds or changes an entry.
    generation: u64,
}

impl NamespaceStore {
    /// Create a store accepting writes to the given namespaces.
    pub fn new(defs: impl IntoIterator<Item = NamespaceDef>) -> Self {
        NamespaceStore {
            defs: defs.into_iter().map(|d| (d.id, d)).collect(),
            tables: BTreeMap::new(),
            generation: 0,
        }
    }

    /// Changes whenever a commit adds or changes an entry.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn def(&self, namespace: NamespaceId) -> Option<&NamespaceDef> {
        self.defs.get(&namespace)
    }

    fn table_key(&self, namespace: NamespaceId, source: usize) -> Option<TableKey> {
        let def = self.defs.get(&namespace)?;
        Some(match def.scope {
            NamespaceScope::Global => (namespace, None),
            NamespaceScope::Source => (namespace, Some(source)),
        })
    }

    /// Look up `key` as seen from `source`. Global namespaces ignore `source`.
    ///
    /// Absence is a normal outcome: the caller decides whether to defer.
    pub fn get(&self, namespace: NamespaceId, source: usize, key: &NsKey) -> Option<&NsEntry> {
        let table = self.table_key(namespace, source)?;
        self.tables.get(&table)?.get(key)
    }

    /// Look up a global-namespace value.
    pub fn get_global(&self, namespace: NamespaceId, key: &NsKey) -> Option<&NsValue> {
        self.tables
            .get(&(namespace, None))?
            .get(key)
            .map(|e| &e.value)
    }

    /// Every entry of a namespace as seen from `source`, in key order.
    pub fn entries(
        &self,
        namespace: NamespaceId,
        source: usize,
    ) -> impl Iterator<Item = (&NsKey, &NsEntry)> {
        self.table_key(namespace, source)
            .and_then(|table| self.tables.get(&table))
            .into_iter()
            .flat_map(BTreeMap::iter)
    }

    /// Entries of a global namespace whose key is `Versioned(name, _)`.
    pub fn versions_of<'a>(
        &'a self,
        namespace: NamespaceId,
        name: &'a str,
    ) -> impl Iterator<Item = (Option<Revision>, &'a NsEntry)> + 'a {
        let start = NsKey::Versioned(name.to_owned(), None);
        self.tables
            .get(&(namespace, None))
            .into_iter()
            .flat_map(move |table| table.range(start.clone()..))
            .map_while(move |(key, entry)| match key {
                NsKey::Versioned(n, rev) if n == name => Some((*rev, entry)),
                _ => None,
            })
    }

    /// Apply staged writes in order.
    ///
    /// Writes are validated against the namespace declaration: the phase
    /// must have been reached, and under [`MergePolicy::Unique`] an existing
    /// key accepts only an equal value.
    pub fn commit(
        &mut self,
        phase: Phase,
        writes: impl IntoIterator<Item = StagedWrite>,
    ) -> Vec<NamespaceError> {
        let mut errors = Vec::new();
        for write in writes {
            let def = match self.defs.get(&write.namespace) {
                Some(def) if def.phase <= phase => *def,
                _ => {
                    errors.push(NamespaceError::Unavailable {
                        namespace: write.namespace,
                        phase,
                        contributor: write.contributor,
                    });
                    continue;
                }
            };
            let table_key = match def.scope {
                NamespaceScope::Global => (def.id, None),
                NamespaceScope::Source => (def.id, Some(write.contributor.source)),
            };
            let table = self.tables.entry(table_key).or_default();

            match table.get(&write.key) {
                Some(existing) if def.policy == MergePolicy::Unique => {
                    if existing.value != write.value {
                        tracing::debug!(
                            namespace = def.id.name(),
                            first = ?existing.contributor,
                            second = ?write.contributor,
                            "namespace conflict"
                        );
                        errors.push(NamespaceError::Conflict {
                            namespace: def.id,
                            key: write.key,
                            first: existing.contributor,
                            second: write.contributor,
                        });
                    }
                }
                _ => {
                    let entry = NsEntry {
                        value: write.value,
                        contributor: write.contributor,
                    };
                    if table.insert(write.key, entry.clone()).as_ref() != Some(&entry) {
                        self.generation += 1;
                    }
                }
            }
        }
        errors
    }
}

#[cfg(test)]
mod tests;
