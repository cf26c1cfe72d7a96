//! Effective-model construction.
//!
//! Runs after the last declarative phase, on fully resolved sources. Trees
//! are first built as mutable drafts, transformed in a fixed order and then
//! frozen:
//!
//! 1. Every module body is instantiated, with the content of included
//!    submodules merged in and `uses` expanded in place. Each expansion
//!    applies its own `refine` and `augment` substatements.
//! 2. Top-level `augment`s are applied in source order. An augment whose
//!    target is itself added by another augment is retried until a pass
//!    makes no progress.
//! 3. Deviations are applied in source order.
//! 4. Sibling schema nodes are checked for duplicate names and the drafts
//!    are frozen into shared statements.
//!
//! Instantiated schema nodes are named in the module they are instantiated
//! in, so a grouping used from another module yields nodes of the using
//! module.

use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use yangc_diagnostic::{Diagnostic, DiagnosticQueue, ErrorCode, StatementSite};
use yangc_ir::{ModuleNs, QName, QNameInterner, Revision, SchemaNodeId, SourceId};
use yangc_parse::DeviateKind;

use super::{
    EffectiveArgument, EffectiveModel, EffectiveModule, EffectiveStatement, Feature, Identity,
    StatementOrigin,
};
use crate::config::FeatureSet;
use crate::context::EffectiveContext;
use crate::error::ReactorFailure;
use crate::linker::SourceKind;
use crate::namespace::{builtin, NamespaceStore, NodeRef, NsKey, NsValue};
use crate::reactor::{NodeMode, Resolved, Run, SourceState, StmtNode};
use crate::registry::{Behavior, SupportFlags, SINGLETON_PROPERTIES};
use crate::Phase;

/// Mutable statement tree under construction.
#[derive(Debug)]
struct Draft {
    keyword: QName,
    argument: EffectiveArgument,
    name: Option<QName>,
    flags: SupportFlags,
    origin: NodeRef,
    children: Vec<Draft>,
}

impl Draft {
    fn is_singleton(&self, interner: &QNameInterner) -> bool {
        SINGLETON_PROPERTIES.contains(&interner.local_name(self.keyword))
    }
}

/// Descend `steps` through schema-node names.
fn find_mut<'d>(drafts: &'d mut [Draft], steps: &[QName]) -> Option<&'d mut Draft> {
    let (first, rest) = steps.split_first()?;
    let node = drafts.iter_mut().find(|d| d.name == Some(*first))?;
    if rest.is_empty() {
        Some(node)
    } else {
        find_mut(&mut node.children, rest)
    }
}

struct ModuleDraft {
    source: usize,
    ns: ModuleNs,
    submodules: Vec<usize>,
    root: Draft,
}

struct Builder<'a> {
    interner: &'a QNameInterner,
    sources: &'a [SourceState],
    store: &'a NamespaceStore,
    features: Option<&'a FeatureSet>,
    diagnostics: DiagnosticQueue,
    /// Groupings being expanded, outermost first.
    expanding: Vec<NodeRef>,
    /// Statements a submodule contributes to the module body.
    body_keywords: FxHashSet<QName>,
}

/// Assemble the effective model of a run whose declarative phases all
/// succeeded.
#[tracing::instrument(level = "debug", skip_all)]
pub(crate) fn build(run: Run<'_>) -> Result<EffectiveModel, ReactorFailure> {
    let interner = run.registry.interner();
    let body_keywords = ["typedef", "identity", "feature", "extension"]
        .into_iter()
        .map(|k| interner.yang_keyword(k))
        .collect();
    let mut builder = Builder {
        interner,
        sources: &run.sources,
        store: &run.store,
        features: run.config.supported_features.as_ref(),
        diagnostics: DiagnosticQueue::with_config(run.config.diagnostics.clone()),
        expanding: Vec::new(),
        body_keywords,
    };

    let mut modules = builder.instantiate_modules();
    builder.apply_augments(&mut modules);
    builder.apply_deviations(&mut modules);
    let modules: Vec<EffectiveModule> = modules
        .into_iter()
        .map(|module| builder.finish_module(module))
        .collect();
    let identities = builder.identities();
    let features = builder.features();

    let mut diagnostics = builder.diagnostics;
    if diagnostics.has_errors() {
        return Err(ReactorFailure::new(Phase::EffectiveModel, diagnostics.flush()));
    }
    tracing::debug!(modules = modules.len(), "effective model built");
    let interner = interner.clone();
    Ok(EffectiveModel {
        interner,
        modules,
        identities,
        features,
        namespaces: run.store,
    })
}

impl Builder<'_> {
    fn node(&self, r: NodeRef) -> &StmtNode {
        &self.sources[r.source].nodes[r.node]
    }

    fn site(&self, r: NodeRef) -> StatementSite {
        self.sources[r.source].site(r.node)
    }

    fn origin(&self, r: NodeRef) -> StatementOrigin {
        StatementOrigin {
            source: self.sources[r.source].id.clone(),
            location: self.node(r).location,
        }
    }

    fn report(&mut self, diagnostic: Diagnostic, source: usize) {
        self.diagnostics.add(diagnostic, source);
    }

    fn children(&self, r: NodeRef) -> Vec<NodeRef> {
        self.node(r)
            .children
            .iter()
            .map(|&c| NodeRef::new(r.source, c))
            .filter(|&c| self.node(c).mode != NodeMode::Dropped)
            .collect()
    }

    /// Children of `r` handled by `behavior`.
    fn children_with(&self, r: NodeRef, wanted: fn(&Behavior) -> bool) -> Vec<NodeRef> {
        self.children(r)
            .into_iter()
            .filter(|&c| {
                let node = self.node(c);
                node.mode == NodeMode::Active && node.behavior().is_some_and(wanted)
            })
            .collect()
    }

    fn is_feature_supported(&self, feature: QName) -> bool {
        let Some(features) = self.features else {
            return true;
        };
        let data = self.interner.module_data(self.interner.module_of(feature));
        features.contains(
            self.interner.lookup(data.namespace),
            self.interner.local_name(feature),
        )
    }

    /// Whether an `if-feature` of `r` is false for the run's feature set.
    fn is_pruned(&self, r: NodeRef) -> bool {
        if self.features.is_none() {
            return false;
        }
        self.children(r).into_iter().any(|c| {
            let node = self.node(c);
            match &node.parsed {
                Some(EffectiveArgument::IfFeature(expr)) if node.mode == NodeMode::Active => {
                    !expr.evaluate(&|f| self.is_feature_supported(f))
                }
                _ => false,
            }
        })
    }

    /// Draft of a single statement and its subtree, `None` if the statement
    /// does not appear in the effective model.
    fn instantiate(&mut self, r: NodeRef, ns: ModuleNs) -> Option<Draft> {
        let sources = self.sources;
        let source = &sources[r.source];
        let node = &source.nodes[r.node];
        let keyword = node.qname?;
        let (argument, name, flags) = match node.mode {
            NodeMode::Dropped => return None,
            NodeMode::Opaque | NodeMode::Unrecognized => {
                let argument = match &node.argument {
                    Some(text) => EffectiveArgument::Text(text.clone()),
                    None => EffectiveArgument::None,
                };
                (argument, None, SupportFlags::ANY_SUBSTATEMENTS)
            }
            NodeMode::Active => {
                let support = node.support.as_ref()?;
                let flags = support.flags();
                if flags.contains(SupportFlags::CONSUMED) {
                    return None;
                }
                let mut argument = node.parsed.clone().unwrap_or(EffectiveArgument::None);
                let mut name = None;
                if flags.contains(SupportFlags::SCHEMA_NODE) {
                    let local = match argument.as_name() {
                        Some(declared) => self.interner.rebind(declared, ns),
                        None => self.interner.qname_str(ns, self.interner.local_name(keyword)),
                    };
                    if matches!(argument, EffectiveArgument::Name(_)) {
                        argument = EffectiveArgument::Name(local);
                    }
                    name = Some(local);
                }
                if let (EffectiveArgument::Name(declared), Resolved::Type { base }) =
                    (&argument, &node.resolved)
                {
                    argument = EffectiveArgument::Type {
                        name: *declared,
                        base: *base,
                    };
                }
                if let Behavior::Custom(custom) = support.behavior() {
                    let mut ctx = EffectiveContext {
                        store: self.store,
                        interner: self.interner,
                        source_id: &source.id,
                        ordinal: source.ordinal(),
                        node: r,
                        keyword: &node.keyword,
                        argument: node.argument.as_deref(),
                        location: node.location,
                        diagnostics: Vec::new(),
                    };
                    let shaped = custom.effective(&mut ctx, argument);
                    for diagnostic in ctx.diagnostics {
                        self.report(diagnostic, r.source);
                    }
                    argument = shaped?;
                }
                (argument, name, flags)
            }
        };
        let children = self.instantiate_children(r, ns);
        Some(Draft {
            keyword,
            argument,
            name,
            flags,
            origin: r,
            children,
        })
    }

    /// Drafts of the substatements of `r`, with `uses` expanded in place and
    /// statements whose features are unsupported left out.
    fn instantiate_children(&mut self, r: NodeRef, ns: ModuleNs) -> Vec<Draft> {
        let mut drafts = Vec::new();
        for child in self.children(r) {
            if self.is_pruned(child) {
                continue;
            }
            let node = self.node(child);
            if node.mode == NodeMode::Active && matches!(node.behavior(), Some(Behavior::Uses)) {
                drafts.extend(self.expand_uses(child, ns));
            } else if let Some(draft) = self.instantiate(child, ns) {
                drafts.push(draft);
            }
        }
        drafts
    }

    /// Schema nodes a `uses` contributes, refined and augmented.
    fn expand_uses(&mut self, uses: NodeRef, ns: ModuleNs) -> Vec<Draft> {
        let Resolved::Grouping(grouping) = self.node(uses).resolved else {
            return Vec::new();
        };
        if self.expanding.contains(&grouping) {
            let name = self.node(grouping).argument.clone().unwrap_or_default();
            let diagnostic = Diagnostic::error(ErrorCode::E3005)
                .with_message(format!("grouping `{name}` is used within its own expansion"))
                .with_label(self.site(uses), "used here")
                .with_secondary_label(self.site(grouping), "grouping defined here");
            self.report(diagnostic, uses.source);
            return Vec::new();
        }

        self.expanding.push(grouping);
        let mut copies: Vec<Draft> = self
            .instantiate_children(grouping, ns)
            .into_iter()
            .filter(|d| d.flags.contains(SupportFlags::SCHEMA_NODE))
            .collect();
        self.expanding.pop();

        self.apply_refines(uses, ns, &mut copies);
        for augment in self.children_with(uses, |b| matches!(b, Behavior::Augment)) {
            if self.is_pruned(augment) {
                continue;
            }
            let Some(EffectiveArgument::Path(path)) = self.node(augment).parsed.clone() else {
                continue;
            };
            let steps = self.rebind_steps(&path, ns);
            self.augment_into(augment, ns, &mut copies, &steps);
        }
        copies
    }

    fn rebind_steps(&self, path: &SchemaNodeId, ns: ModuleNs) -> Vec<QName> {
        path.steps()
            .iter()
            .map(|&step| {
                if self.interner.module_of(step) == self.interner.module_of(path.steps()[0]) {
                    self.interner.rebind(step, ns)
                } else {
                    step
                }
            })
            .collect()
    }

    /// Apply each `refine` of `uses`: for every property only the winning
    /// contribution of the `refine` namespace is applied.
    fn apply_refines(&mut self, uses: NodeRef, ns: ModuleNs, copies: &mut [Draft]) {
        for refine in self.children_with(uses, |b| matches!(b, Behavior::Refine)) {
            let Some(EffectiveArgument::Path(target)) = self.node(refine).parsed.clone() else {
                continue;
            };
            let mut properties = Vec::new();
            for property in self.children(refine) {
                let node = self.node(property);
                if node.mode != NodeMode::Active || node.keyword.prefix.is_some() {
                    continue;
                }
                let Some(keyword) = node.qname else {
                    continue;
                };
                let discriminator = if SINGLETON_PROPERTIES.contains(&node.keyword.name.as_str()) {
                    None
                } else {
                    Some(property)
                };
                let key = NsKey::Refine {
                    uses,
                    target: target.clone(),
                    property: keyword,
                    discriminator,
                };
                let winner = self.store.get(builtin::REFINE, uses.source, &key);
                if winner.map(|e| &e.value) != Some(&NsValue::Stmt(property)) {
                    continue;
                }
                if let Some(draft) = self.instantiate(property, ns) {
                    properties.push(draft);
                }
            }

            let steps = self.rebind_steps(&target, ns);
            let Some(node) = find_mut(copies, &steps) else {
                let diagnostic = Diagnostic::error(ErrorCode::E3004)
                    .with_message(format!(
                        "refine target `{}` not found in the grouping",
                        target.display(self.interner)
                    ))
                    .with_label(self.site(refine), "refined here");
                self.report(diagnostic, refine.source);
                continue;
            };
            for property in properties {
                set_property(node, property, self.interner);
            }
        }
    }

    /// Schema nodes an `augment` adds.
    fn augment_body(&mut self, augment: NodeRef, ns: ModuleNs) -> Vec<Draft> {
        self.instantiate_children(augment, ns)
            .into_iter()
            .filter(|d| d.flags.contains(SupportFlags::SCHEMA_NODE))
            .collect()
    }

    /// Add the body of `augment` to the node at `steps` below `drafts`.
    /// Returns `false` when there is no such node.
    fn augment_into(
        &mut self,
        augment: NodeRef,
        ns: ModuleNs,
        drafts: &mut [Draft],
        steps: &[QName],
    ) -> bool {
        let Some(target) = find_mut(drafts, steps) else {
            self.report_missing_augment_target(augment);
            return false;
        };
        if !target.flags.contains(SupportFlags::DATA_HOLDER) {
            let keyword = self.interner.local_name(target.keyword);
            let diagnostic = Diagnostic::error(ErrorCode::E5004)
                .with_message(format!("augment target is a `{keyword}`, which takes no children"))
                .with_label(self.site(augment), "augmented here")
                .with_secondary_label(self.site(target.origin), "target declared here");
            self.report(diagnostic, augment.source);
            return true;
        }
        let body = self.augment_body(augment, ns);
        if let Some(target) = find_mut(drafts, steps) {
            target.children.extend(body);
        }
        true
    }

    fn report_missing_augment_target(&mut self, augment: NodeRef) {
        let path = self.node(augment).argument.clone().unwrap_or_default();
        let diagnostic = Diagnostic::error(ErrorCode::E3002)
            .with_message(format!("augment target `{path}` not found"))
            .with_label(self.site(augment), "augmented here");
        self.report(diagnostic, augment.source);
    }

    /// Submodules included by `source`, transitively, in inclusion order.
    fn included(&self, source: usize) -> Vec<usize> {
        let mut found: Vec<usize> = Vec::new();
        let mut stack = vec![source];
        while let Some(current) = stack.pop() {
            let mut next: Vec<usize> = self.sources[current]
                .nodes
                .iter()
                .filter_map(|n| match n.resolved {
                    Resolved::Include { source } => Some(source),
                    _ => None,
                })
                .filter(|s| *s != source && !found.contains(s))
                .collect();
            found.extend(next.iter().copied());
            next.reverse();
            stack.extend(next);
        }
        found
    }

    fn instantiate_modules(&mut self) -> Vec<ModuleDraft> {
        let mut modules = Vec::new();
        for source in self.sources {
            if !source.active || source.header.kind != SourceKind::Module {
                continue;
            }
            let Some(ns) = source.current_module() else {
                continue;
            };
            let Some(mut root) = self.instantiate(NodeRef::new(source.index, 0), ns) else {
                continue;
            };
            let submodules = self.included(source.index);
            for &submodule in &submodules {
                let body = self
                    .instantiate_children(NodeRef::new(submodule, 0), ns)
                    .into_iter()
                    .filter(|d| {
                        d.flags.contains(SupportFlags::SCHEMA_NODE)
                            || self.body_keywords.contains(&d.keyword)
                    });
                root.children.extend(body);
            }
            tracing::debug!(module = %source.id, submodules = submodules.len(), "module instantiated");
            modules.push(ModuleDraft {
                source: source.index,
                ns,
                submodules,
                root,
            });
        }
        modules
    }

    /// Top-level augments of every active source, retried while a pass
    /// applies at least one of them.
    fn apply_augments(&mut self, modules: &mut [ModuleDraft]) {
        let mut pending: Vec<(NodeRef, ModuleNs, Vec<QName>)> = Vec::new();
        for source in self.sources.iter().filter(|s| s.active) {
            let Some(ns) = source.current_module() else {
                continue;
            };
            let root = NodeRef::new(source.index, 0);
            for augment in self.children_with(root, |b| matches!(b, Behavior::Augment)) {
                if self.is_pruned(augment) {
                    continue;
                }
                if let Some(EffectiveArgument::Path(path)) = &self.node(augment).parsed {
                    pending.push((augment, ns, path.steps().to_vec()));
                }
            }
        }

        loop {
            let before = pending.len();
            let mut retry = Vec::new();
            for (augment, ns, steps) in pending {
                let module = self.target_module(modules, &steps);
                match module {
                    Some(m) if find_mut(&mut modules[m].root.children, &steps).is_some() => {
                        self.augment_into(augment, ns, &mut modules[m].root.children, &steps);
                    }
                    _ => retry.push((augment, ns, steps)),
                }
            }
            if retry.is_empty() || retry.len() == before {
                for (augment, _, _) in retry {
                    self.report_missing_augment_target(augment);
                }
                break;
            }
            pending = retry;
        }
    }

    /// Module owning the node at an absolute path.
    fn target_module(&self, modules: &[ModuleDraft], steps: &[QName]) -> Option<usize> {
        let target = self.interner.module_of(*steps.first()?);
        modules.iter().position(|m| m.ns == target)
    }

    fn apply_deviations(&mut self, modules: &mut [ModuleDraft]) {
        let deviations: Vec<(NodeRef, ModuleNs)> = self
            .sources
            .iter()
            .filter(|s| s.active)
            .filter_map(|s| Some((s, s.current_module()?)))
            .flat_map(|(s, ns)| {
                self.children_with(NodeRef::new(s.index, 0), |b| matches!(b, Behavior::Deviation))
                    .into_iter()
                    .map(move |d| (d, ns))
            })
            .collect();
        for (deviation, ns) in deviations {
            self.deviate(deviation, ns, modules);
        }
    }

    fn deviate(&mut self, deviation: NodeRef, ns: ModuleNs, modules: &mut [ModuleDraft]) {
        let Some(EffectiveArgument::Path(path)) = self.node(deviation).parsed.clone() else {
            return;
        };
        let steps = path.steps();
        let module = self.target_module(modules, steps);
        let exists = module.is_some_and(|m| find_mut(&mut modules[m].root.children, steps).is_some());
        let Some(module) = module.filter(|_| exists) else {
            let diagnostic = Diagnostic::error(ErrorCode::E3003)
                .with_message(format!(
                    "deviation target `{}` not found",
                    path.display(self.interner)
                ))
                .with_label(self.site(deviation), "deviated here");
            self.report(diagnostic, deviation.source);
            return;
        };

        for deviate in self.children_with(deviation, |b| matches!(b, Behavior::Deviate)) {
            let Some(EffectiveArgument::Deviate(kind)) = self.node(deviate).parsed else {
                continue;
            };
            if kind == DeviateKind::NotSupported {
                let (last, parents) = match steps.split_last() {
                    Some(split) => split,
                    None => continue,
                };
                let siblings = if parents.is_empty() {
                    Some(&mut modules[module].root.children)
                } else {
                    find_mut(&mut modules[module].root.children, parents).map(|p| &mut p.children)
                };
                if let Some(siblings) = siblings {
                    siblings.retain(|d| d.name != Some(*last));
                }
                tracing::debug!(target = %path.display(self.interner), "node not supported");
                return;
            }

            let mut properties = Vec::new();
            for property in self.children(deviate) {
                if self.node(property).keyword.prefix.is_some() {
                    continue;
                }
                properties.extend(self.instantiate(property, ns));
            }
            let Some(target) = find_mut(&mut modules[module].root.children, steps) else {
                return;
            };
            let mut failures = Vec::new();
            for property in properties {
                if let Err(message) = apply_deviate(target, kind, property, self.interner) {
                    failures.push(message);
                }
            }
            for message in failures {
                let diagnostic = Diagnostic::error(ErrorCode::E5003)
                    .with_message(message)
                    .with_label(self.site(deviate), format!("deviate {kind}"));
                self.report(diagnostic, deviate.source);
            }
        }
    }

    /// Report sibling schema nodes sharing a name, then freeze.
    fn freeze(&mut self, draft: Draft) -> Arc<EffectiveStatement> {
        let mut seen: FxHashMap<QName, NodeRef> = FxHashMap::default();
        for child in &draft.children {
            let Some(name) = child.name else {
                continue;
            };
            if let Some(&first) = seen.get(&name) {
                let diagnostic = Diagnostic::error(ErrorCode::E2002)
                    .with_message(format!(
                        "schema node `{}` is defined more than once",
                        self.interner.display(name)
                    ))
                    .with_label(self.site(child.origin), "second definition here")
                    .with_secondary_label(self.site(first), "first defined here");
                self.report(diagnostic, child.origin.source);
            } else {
                seen.insert(name, child.origin);
            }
        }

        let origin = self.origin(draft.origin);
        let children = draft
            .children
            .into_iter()
            .map(|child| self.freeze(child))
            .collect();
        Arc::new(EffectiveStatement {
            keyword: draft.keyword,
            keyword_name: self.interner.local_name(draft.keyword),
            argument: draft.argument,
            name: draft.name,
            children,
            origin,
        })
    }

    fn finish_module(&mut self, module: ModuleDraft) -> EffectiveModule {
        let sources = self.sources;
        let mut imports: Vec<SourceId> = Vec::new();
        for owner in std::iter::once(module.source).chain(module.submodules.iter().copied()) {
            for node in &sources[owner].nodes {
                if let Resolved::Import { source } = node.resolved {
                    let id = &sources[source].id;
                    if !imports.contains(id) {
                        imports.push(id.clone());
                    }
                }
            }
        }

        let root = self.freeze(module.root);
        let source = &sources[module.source];
        let header = &source.header;
        EffectiveModule {
            id: source.id.clone(),
            name: header.name.clone(),
            revision: header.revision,
            namespace: header.namespace.clone().unwrap_or_default(),
            prefix: header.prefix.clone().unwrap_or_default(),
            ns: module.ns,
            semver: header.semver.clone(),
            submodules: module
                .submodules
                .iter()
                .map(|&s| sources[s].id.clone())
                .collect(),
            imports,
            root,
        }
    }

    fn sort_key(&self, name: QName) -> (&'static str, Option<Revision>, &'static str) {
        let data = self.interner.module_data(self.interner.module_of(name));
        (
            self.interner.lookup(data.namespace),
            data.revision,
            self.interner.local_name(name),
        )
    }

    fn identities(&self) -> Vec<Identity> {
        let mut identities: Vec<Identity> = self
            .store
            .entries(builtin::IDENTITY, 0)
            .filter_map(|(key, entry)| match (key, &entry.value) {
                (NsKey::QName(name), NsValue::Stmt(stmt)) => Some((*name, *stmt)),
                _ => None,
            })
            .map(|(name, stmt)| Identity {
                name,
                bases: self
                    .children(stmt)
                    .into_iter()
                    .filter_map(|c| match self.node(c).resolved {
                        Resolved::Identity(base) => match &self.node(base).parsed {
                            Some(EffectiveArgument::Name(base)) => Some(*base),
                            _ => None,
                        },
                        _ => None,
                    })
                    .collect(),
                origin: self.origin(stmt),
            })
            .collect();
        identities.sort_by_key(|i| self.sort_key(i.name));
        identities
    }

    fn features(&self) -> Vec<Feature> {
        let mut features: Vec<Feature> = self
            .store
            .entries(builtin::FEATURE, 0)
            .filter_map(|(key, entry)| match (key, &entry.value) {
                (NsKey::QName(name), NsValue::Stmt(stmt)) => Some(Feature {
                    name: *name,
                    supported: self.is_feature_supported(*name),
                    origin: self.origin(*stmt),
                }),
                _ => None,
            })
            .collect();
        features.sort_by_key(|f| self.sort_key(f.name));
        features
    }
}

/// Set a property on a refined node: singletons replace an existing
/// statement with the same keyword, everything else is added.
fn set_property(node: &mut Draft, property: Draft, interner: &QNameInterner) {
    if property.is_singleton(interner) {
        if let Some(existing) = node
            .children
            .iter_mut()
            .find(|c| c.keyword == property.keyword)
        {
            *existing = property;
            return;
        }
    }
    node.children.push(property);
}

fn apply_deviate(
    target: &mut Draft,
    kind: DeviateKind,
    property: Draft,
    interner: &QNameInterner,
) -> Result<(), String> {
    let keyword = interner.local_name(property.keyword);
    let existing = target
        .children
        .iter()
        .position(|c| c.keyword == property.keyword);
    match kind {
        DeviateKind::Add => {
            if property.is_singleton(interner) && existing.is_some() {
                return Err(format!("cannot add `{keyword}`: the target already has one"));
            }
            target.children.push(property);
        }
        DeviateKind::Replace => {
            let Some(index) = existing else {
                return Err(format!("cannot replace `{keyword}`: the target has none"));
            };
            target.children[index] = property;
        }
        DeviateKind::Delete => {
            let index = target
                .children
                .iter()
                .position(|c| c.keyword == property.keyword && c.argument == property.argument);
            let Some(index) = index else {
                return Err(format!("cannot delete `{keyword}`: no matching statement on the target"));
            };
            target.children.remove(index);
        }
        DeviateKind::NotSupported => {}
    }
    Ok(())
}
