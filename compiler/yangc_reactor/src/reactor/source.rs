//! Per-source state of a run.
//!
//! A declared tree is flattened into a preorder arena once, when the run
//! starts. Node indices are stable for the whole run and double as the
//! `node` half of a [`NodeRef`]; node 0 is always the root.

use std::sync::Arc;

use yangc_diagnostic::StatementSite;
use yangc_ir::{
    DeclaredSource, DeclaredStatement, Keyword, Location, ModuleNs, QName, SharedInterner,
    SourceId, YangVersion,
};
use yangc_parse::{BindingContext, PrefixBindings};

use crate::effective::EffectiveArgument;
use crate::linker::{SourceHeader, SourceKind};
use crate::namespace::{builtin, NamespaceStore, NodeRef, NsKey, NsValue};
use crate::registry::{Behavior, StatementSupport, OPENCONFIG_VERSION};

/// How a node takes part in the run.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(crate) enum NodeMode {
    /// Processed by its support.
    Active,
    /// Below an unrecognized extension: carried along verbatim.
    Opaque,
    /// Instance of an extension the source's imports define but no support
    /// handles. Kept with its raw argument; substatements become opaque.
    Unrecognized,
    /// Left out of the run together with its descendants.
    Dropped,
}

/// Link a node established while resolving.
#[derive(Clone, Eq, PartialEq, Debug)]
pub(crate) enum Resolved {
    Nothing,
    Import { source: usize },
    Include { source: usize },
    BelongsTo { module: ModuleNs },
    Grouping(NodeRef),
    /// Built-in type a `type` statement ends up at.
    Type { base: QName },
    Identity(NodeRef),
}

#[derive(Debug)]
pub(crate) struct StmtNode {
    pub keyword: Keyword,
    pub argument: Option<String>,
    pub location: Location,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    /// One past the last node of this subtree.
    pub end: usize,
    pub mode: NodeMode,
    /// Bound keyword. Prefixed keywords are bound once prefixes are known.
    pub qname: Option<QName>,
    pub support: Option<Arc<StatementSupport>>,
    /// Argument as parsed by the support's production.
    pub parsed: Option<EffectiveArgument>,
    pub resolved: Resolved,
}

impl StmtNode {
    fn new(stmt: &DeclaredStatement, parent: Option<usize>) -> Self {
        StmtNode {
            keyword: stmt.keyword().clone(),
            argument: stmt.argument().map(str::to_owned),
            location: stmt.location(),
            parent,
            children: Vec::with_capacity(stmt.children().len()),
            end: 0,
            mode: NodeMode::Active,
            qname: None,
            support: None,
            parsed: None,
            resolved: Resolved::Nothing,
        }
    }

    pub fn behavior(&self) -> Option<&Behavior> {
        self.support.as_deref().map(StatementSupport::behavior)
    }
}

/// A statement still waiting for phase work.
#[derive(Clone, Debug)]
pub(crate) struct Pending {
    pub node: usize,
    /// What the last attempt was waiting on.
    pub waiting_on: Option<String>,
}

pub(crate) struct SourceState {
    pub index: usize,
    pub id: SourceId,
    /// Another source of the run has the same id.
    pub id_shared: bool,
    pub version: YangVersion,
    pub library: bool,
    pub active: bool,
    pub header: SourceHeader,
    pub nodes: Vec<StmtNode>,
    /// Set at the end of source linkage.
    pub bindings: Option<PrefixBindings>,
    pub pending: Vec<Pending>,
}

fn flatten(stmt: &DeclaredStatement, parent: Option<usize>, nodes: &mut Vec<StmtNode>) -> usize {
    let index = nodes.len();
    nodes.push(StmtNode::new(stmt, parent));
    for child in stmt.children() {
        let child = flatten(child, Some(index), nodes);
        nodes[index].children.push(child);
    }
    nodes[index].end = nodes.len();
    index
}

impl SourceState {
    pub fn new(
        index: usize,
        source: &DeclaredSource,
        header: SourceHeader,
        library: bool,
        active: bool,
    ) -> Self {
        let root = source.root();
        let mut nodes = Vec::with_capacity(root.subtree_len());
        flatten(root, None, &mut nodes);
        SourceState {
            index,
            id: source.id().clone(),
            id_shared: false,
            version: source.version(),
            library,
            active,
            header,
            nodes,
            bindings: None,
            pending: Vec::new(),
        }
    }

    #[inline]
    pub fn node_ref(&self, node: usize) -> NodeRef {
        NodeRef::new(self.index, node)
    }

    /// Registration index, when it is needed to tell this source apart.
    #[inline]
    pub fn ordinal(&self) -> Option<usize> {
        self.id_shared.then_some(self.index)
    }

    pub fn site(&self, node: usize) -> StatementSite {
        let stmt = &self.nodes[node];
        let site = StatementSite::new(self.id.clone(), stmt.keyword.to_string(), stmt.location);
        match self.ordinal() {
            Some(ordinal) => site.with_ordinal(ordinal),
            None => site,
        }
    }

    /// Ancestors of `node`, nearest first.
    pub fn ancestors(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        std::iter::successors(self.nodes[node].parent, |&n| self.nodes[n].parent)
    }

    pub fn is_top_level(&self, node: usize) -> bool {
        self.nodes[node].parent == Some(0)
    }

    /// First child of `node` with this unprefixed keyword that takes part
    /// in the run.
    pub fn child_named(&self, node: usize, keyword: &str) -> Option<usize> {
        self.nodes[node]
            .children
            .iter()
            .copied()
            .find(|&c| {
                self.nodes[c].keyword.is(keyword) && self.nodes[c].mode != NodeMode::Dropped
            })
    }

    pub fn child_argument(&self, node: usize, keyword: &str) -> Option<&str> {
        self.child_named(node, keyword)
            .and_then(|c| self.nodes[c].argument.as_deref())
    }

    pub fn drop_subtree(&mut self, node: usize) {
        let end = self.nodes[node].end;
        for stmt in &mut self.nodes[node..end] {
            stmt.mode = NodeMode::Dropped;
        }
    }

    /// Keep `node` as an unrecognized extension instance.
    pub fn keep_unrecognized(&mut self, node: usize) {
        let end = self.nodes[node].end;
        self.nodes[node].mode = NodeMode::Unrecognized;
        for stmt in &mut self.nodes[node + 1..end] {
            if stmt.mode != NodeMode::Dropped {
                stmt.mode = NodeMode::Opaque;
            }
        }
    }

    /// Module unprefixed names of this source belong to.
    pub fn current_module(&self) -> Option<ModuleNs> {
        self.bindings.as_ref().map(BindingContext::current_module)
    }

    /// Semantic version an `import` asks for through `openconfig-version`.
    pub fn requested_semver(&self, node: usize) -> Option<semver::Version> {
        let prefix = self.header.semver_prefix.as_deref()?;
        self.nodes[node]
            .children
            .iter()
            .map(|&c| &self.nodes[c])
            .find(|c| {
                c.keyword.prefix.as_deref() == Some(prefix) && c.keyword.name == OPENCONFIG_VERSION
            })
            .and_then(|c| yangc_parse::parse_semver(c.argument.as_deref()?).ok())
    }

    /// Build the prefix table from the linkage-phase namespaces.
    ///
    /// Unprefixed names of a module belong to the module itself, those of a
    /// submodule to the module it belongs to.
    pub fn bind_prefixes(&mut self, store: &NamespaceStore, interner: &SharedInterner) {
        let current = match self.header.kind {
            SourceKind::Module => match store.get_global(
                builtin::MODULE_QNAME,
                &NsKey::versioned(self.header.name.clone(), self.header.revision),
            ) {
                Some(NsValue::Module(module)) => Some(*module),
                _ => None,
            },
            SourceKind::Submodule => self.nodes.iter().find_map(|n| match n.resolved {
                Resolved::BelongsTo { module } => Some(module),
                _ => None,
            }),
            SourceKind::Invalid => None,
        };
        let Some(current) = current else {
            return;
        };

        let mut bindings = PrefixBindings::new(interner.clone(), current);
        for (key, entry) in store.entries(builtin::PREFIX, self.index) {
            if let (NsKey::Text(prefix), NsValue::Module(module)) = (key, &entry.value) {
                bindings.bind(prefix.clone(), *module);
            }
        }
        tracing::debug!(source = %self.id, "prefixes bound");
        self.bindings = Some(bindings);
    }
}
