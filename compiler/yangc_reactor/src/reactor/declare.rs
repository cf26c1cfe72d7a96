//! Per-source phase work: support lookup, argument parsing, validation and
//! the statement behaviors of the declarative phases.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use yangc_diagnostic::{unknown_statement, Diagnostic, ErrorCode};
use yangc_ir::{ModuleNs, QName, QNameInterner, YangVersion};
use yangc_parse::{
    parse_absolute_schema_nodeid, parse_boolean, parse_descendant_schema_nodeid, parse_deviate,
    parse_identifier, parse_if_feature, parse_max_value, parse_node_identifier,
    parse_non_negative_integer, parse_revision_date, parse_semver, parse_yang_version,
    ArgumentError, BindingContext,
};

use super::schedule::Env;
use super::source::{NodeMode, Pending, Resolved, SourceState};
use crate::context::{Outcome, StmtContext};
use crate::effective::EffectiveArgument;
use crate::linker::{select, Candidate, Dependency, Requirement, SourceKind};
use crate::namespace::{builtin, NamespaceId, NodeRef, NsKey, NsValue, StagedWrite};
use crate::registry::{
    is_builtin_type, ArgumentKind, Behavior, DefinitionKind, StatementSupport, SupportFlags,
    SINGLETON_PROPERTIES,
};
use crate::Phase;

/// What one source produced in a preparation step or round.
#[derive(Debug, Default)]
pub(crate) struct SourceOutput {
    pub writes: Vec<StagedWrite>,
    pub diagnostics: Vec<Diagnostic>,
    /// Some statement finished its phase work.
    pub progressed: bool,
}

impl SourceOutput {
    fn put(&mut self, namespace: NamespaceId, key: NsKey, value: NsValue, contributor: NodeRef) {
        self.writes.push(StagedWrite {
            namespace,
            key,
            value,
            contributor,
        });
    }
}

enum Step {
    Done,
    Resolved(Resolved),
    Deferred(String),
}

/// Binds every prefix to the core module.
///
/// Used before prefixes are known, where only the argument's shape can be
/// checked.
struct ShapeOnly<'a>(&'a QNameInterner);

impl BindingContext for ShapeOnly<'_> {
    fn interner(&self) -> &QNameInterner {
        self.0
    }

    fn current_module(&self) -> ModuleNs {
        self.0.yang_module()
    }

    fn resolve_prefix(&self, _prefix: &str) -> Option<ModuleNs> {
        Some(self.0.yang_module())
    }
}

fn parse_value<C: BindingContext + ?Sized>(
    ctx: &C,
    kind: ArgumentKind,
    text: &str,
    top_level: bool,
    version: YangVersion,
) -> Result<EffectiveArgument, ArgumentError> {
    use EffectiveArgument as Arg;
    Ok(match kind {
        ArgumentKind::None | ArgumentKind::Text => Arg::Text(text.to_owned()),
        ArgumentKind::Identifier => Arg::Name(parse_identifier(ctx, text)?),
        ArgumentKind::NodeIdentifier => Arg::Name(parse_node_identifier(ctx, text)?),
        ArgumentKind::AbsoluteSchemaNodeId => Arg::Path(parse_absolute_schema_nodeid(ctx, text)?),
        ArgumentKind::DescendantSchemaNodeId => {
            Arg::Path(parse_descendant_schema_nodeid(ctx, text)?)
        }
        ArgumentKind::SchemaNodeId if top_level => {
            Arg::Path(parse_absolute_schema_nodeid(ctx, text)?)
        }
        ArgumentKind::SchemaNodeId => Arg::Path(parse_descendant_schema_nodeid(ctx, text)?),
        ArgumentKind::RevisionDate => Arg::Revision(parse_revision_date(text)?),
        ArgumentKind::YangVersion => Arg::Version(parse_yang_version(text)?),
        ArgumentKind::SemVer => Arg::SemVer(parse_semver(text)?),
        ArgumentKind::Boolean => Arg::Boolean(parse_boolean(text)?),
        ArgumentKind::NonNegativeInteger => Arg::Count(parse_non_negative_integer(text)?),
        ArgumentKind::MaxValue => Arg::Max(parse_max_value(text)?),
        ArgumentKind::IfFeatureExpr => Arg::IfFeature(parse_if_feature(ctx, text, version)?),
        ArgumentKind::Deviate => Arg::Deviate(parse_deviate(text)?),
    })
}

impl SourceState {
    /// Attach the phase's supports, parse newly supported arguments and
    /// queue the statements with work in this phase.
    pub(crate) fn prepare(&mut self, env: &Env<'_>) -> SourceOutput {
        let mut out = SourceOutput::default();
        match env.phase {
            Phase::Init => {
                if self.header.kind == SourceKind::Invalid {
                    out.diagnostics.push(
                        Diagnostic::error(ErrorCode::E4002)
                            .with_message(format!(
                                "source `{}` must start with `module` or `submodule`",
                                self.id
                            ))
                            .with_label(self.site(0), "found here"),
                    );
                    self.drop_subtree(0);
                    return out;
                }
                for node in &mut self.nodes {
                    if node.keyword.prefix.is_none() {
                        node.qname = Some(env.interner.yang_keyword(&node.keyword.name));
                    }
                }
            }
            Phase::StatementDefinition => self.bind_keywords(env, &mut out),
            _ => {}
        }

        for index in 0..self.nodes.len() {
            let node = &self.nodes[index];
            if node.mode != NodeMode::Active {
                continue;
            }
            let Some(keyword) = node.qname else {
                continue;
            };
            let support = if node.keyword.prefix.is_some() {
                env.registry
                    .lookup_extension(env.phase, keyword, self.version)
            } else {
                env.registry.lookup(env.phase, keyword, self.version)
            };
            match support {
                Some(support) => {
                    let unchanged = node
                        .support
                        .as_ref()
                        .is_some_and(|s| std::sync::Arc::ptr_eq(s, support));
                    if !unchanged {
                        let support = support.clone();
                        let parsed = self.parse_argument(index, &support, env);
                        self.nodes[index].parsed = match parsed {
                            Ok(parsed) => Some(parsed),
                            Err(diagnostic) => {
                                out.diagnostics.push(diagnostic);
                                None
                            }
                        };
                        self.nodes[index].support = Some(support);
                    }
                }
                None if env.phase == Phase::FullDeclaration => {
                    self.unsupported(index, keyword, env, &mut out);
                }
                None => {}
            }
        }

        if env.phase == Phase::FullDeclaration {
            self.validate_substatements(env, &mut out);
        }

        self.pending = (0..self.nodes.len())
            .filter(|&i| self.has_work(i, env.phase))
            .map(|node| Pending {
                node,
                waiting_on: None,
            })
            .collect();
        tracing::debug!(
            source = %self.id,
            pending = self.pending.len(),
            "source prepared"
        );
        out
    }

    /// Bind prefixed keywords. A prefix the source does not declare drops
    /// the statement.
    fn bind_keywords(&mut self, env: &Env<'_>, out: &mut SourceOutput) {
        let Some(bindings) = self.bindings.clone() else {
            return;
        };
        for index in 0..self.nodes.len() {
            let node = &self.nodes[index];
            if node.mode == NodeMode::Dropped {
                continue;
            }
            let Some(prefix) = node.keyword.prefix.as_deref() else {
                continue;
            };
            match bindings.resolve_prefix(prefix) {
                Some(module) => {
                    let qname = env.interner.qname_str(module, &node.keyword.name);
                    self.nodes[index].qname = Some(qname);
                }
                None => {
                    out.diagnostics.push(
                        Diagnostic::error(ErrorCode::E1001)
                            .with_message(format!("unknown prefix `{prefix}`"))
                            .with_label(self.site(index), "in this keyword"),
                    );
                    self.drop_subtree(index);
                }
            }
        }
    }

    fn parse_argument(
        &self,
        index: usize,
        support: &StatementSupport,
        env: &Env<'_>,
    ) -> Result<EffectiveArgument, Diagnostic> {
        let node = &self.nodes[index];
        let kind = support.argument();
        let text = match (kind, node.argument.as_deref()) {
            (ArgumentKind::None, None) => return Ok(EffectiveArgument::None),
            (ArgumentKind::None, Some(text)) => {
                return Err(Diagnostic::error(ErrorCode::E0004)
                    .with_message(format!("`{}` takes no argument, found `{text}`", node.keyword))
                    .with_label(self.site(index), "unexpected argument"))
            }
            (_, None) => {
                return Err(Diagnostic::error(ErrorCode::E0003)
                    .with_message(format!("`{}` requires an argument", node.keyword))
                    .with_label(self.site(index), "argument missing"))
            }
            (_, Some(text)) => text,
        };

        let top_level = self.is_top_level(index);
        let parsed = match &self.bindings {
            Some(bindings) => parse_value(bindings, kind, text, top_level, self.version),
            None => parse_value(&ShapeOnly(env.interner), kind, text, top_level, self.version)
                .map(|parsed| match parsed {
                    EffectiveArgument::Name(_)
                    | EffectiveArgument::Path(_)
                    | EffectiveArgument::IfFeature(_) => EffectiveArgument::Text(text.to_owned()),
                    other => other,
                }),
        };
        parsed.map_err(|err| err.to_diagnostic(self.site(index)))
    }

    /// A statement no support of the final declarative bundle handles.
    fn unsupported(&mut self, index: usize, keyword: QName, env: &Env<'_>, out: &mut SourceOutput) {
        if env.registry.is_ignorable(keyword) {
            self.drop_subtree(index);
            return;
        }
        let node = &self.nodes[index];
        let defined = node.keyword.prefix.is_some()
            && env
                .store
                .get(builtin::EXTENSION, self.index, &NsKey::QName(keyword))
                .is_some();
        if defined {
            let raw = match &node.argument {
                Some(text) => EffectiveArgument::Text(text.clone()),
                None => EffectiveArgument::None,
            };
            self.keep_unrecognized(index);
            self.nodes[index].parsed = Some(raw);
            return;
        }
        out.diagnostics.push(unknown_statement(self.site(index)));
        self.drop_subtree(index);
    }

    /// Check every supported statement's substatements against its rules.
    /// Extension instances are not counted.
    fn validate_substatements(&self, env: &Env<'_>, out: &mut SourceOutput) {
        for (index, node) in self.nodes.iter().enumerate() {
            if node.mode != NodeMode::Active {
                continue;
            }
            let Some(support) = &node.support else {
                continue;
            };
            if support.flags().contains(SupportFlags::ANY_SUBSTATEMENTS) {
                continue;
            }

            let mut counts: FxHashMap<QName, u32> = FxHashMap::default();
            for &child in &node.children {
                let stmt = &self.nodes[child];
                if stmt.mode != NodeMode::Active || stmt.keyword.prefix.is_some() {
                    continue;
                }
                let (Some(keyword), Some(_)) = (stmt.qname, &stmt.support) else {
                    continue;
                };
                if support.rule_for(keyword).is_some() {
                    *counts.entry(keyword).or_default() += 1;
                } else {
                    out.diagnostics.push(
                        Diagnostic::error(ErrorCode::E5001)
                            .with_message(format!(
                                "`{}` is not allowed in `{}`",
                                stmt.keyword, node.keyword
                            ))
                            .with_label(self.site(child), "not allowed here")
                            .with_secondary_label(self.site(index), "parent statement"),
                    );
                }
            }

            for rule in support.substatements() {
                let count = counts.get(&rule.keyword).copied().unwrap_or(0);
                if !rule.cardinality.admits(count) {
                    let name = env.interner.local_name(rule.keyword);
                    out.diagnostics.push(
                        Diagnostic::error(ErrorCode::E5002)
                            .with_message(format!(
                                "`{}` takes {} `{name}`, found {count}",
                                node.keyword, rule.cardinality
                            ))
                            .with_label(self.site(index), "in this statement"),
                    );
                }
            }
        }
    }

    fn has_work(&self, index: usize, phase: Phase) -> bool {
        let node = &self.nodes[index];
        if node.mode != NodeMode::Active || node.parsed.is_none() {
            return false;
        }
        let Some(behavior) = node.behavior() else {
            return false;
        };
        match behavior {
            Behavior::Module => matches!(phase, Phase::SourcePreLinkage | Phase::SourceLinkage),
            Behavior::Submodule => phase == Phase::SourcePreLinkage,
            Behavior::Import | Behavior::Include | Behavior::BelongsTo => {
                phase == Phase::SourceLinkage
            }
            Behavior::Definition(_) => phase == Phase::StatementDefinition,
            Behavior::Uses
            | Behavior::Type
            | Behavior::Base
            | Behavior::IfFeature
            | Behavior::Refine => phase == Phase::FullDeclaration,
            Behavior::Custom(_) => true,
            Behavior::Augment | Behavior::Deviation | Behavior::Deviate | Behavior::Plain => false,
        }
    }

    /// Attempt every pending statement once against the committed snapshot.
    pub(crate) fn run_round(&mut self, env: &Env<'_>) -> SourceOutput {
        let mut out = SourceOutput::default();
        for pending in std::mem::take(&mut self.pending) {
            match self.step(pending.node, env, &mut out) {
                Step::Done => out.progressed = true,
                Step::Resolved(resolved) => {
                    self.nodes[pending.node].resolved = resolved;
                    out.progressed = true;
                }
                Step::Deferred(waiting_on) => self.pending.push(Pending {
                    node: pending.node,
                    waiting_on: Some(waiting_on),
                }),
            }
        }
        out
    }

    fn step(&self, index: usize, env: &Env<'_>, out: &mut SourceOutput) -> Step {
        let Some(behavior) = self.nodes[index].behavior() else {
            return Step::Done;
        };
        match (behavior, env.phase) {
            (Behavior::Module, Phase::SourcePreLinkage) => self.declare_module(index, env, out),
            (Behavior::Module, _) => self.bind_own_prefix(index, env, out),
            (Behavior::Submodule, _) => self.declare_submodule(index, out),
            (Behavior::Import, _) => self.link_import(index, env, out),
            (Behavior::Include, _) => self.link_include(index, env, out),
            (Behavior::BelongsTo, _) => self.link_parent(index, env, out),
            (Behavior::Definition(kind), _) => self.define(index, *kind, out),
            (Behavior::Uses, _) => self.resolve_grouping(index, env),
            (Behavior::Type, _) => self.resolve_type(index, env, out),
            (Behavior::Base, _) => self.resolve_base(index, env),
            (Behavior::IfFeature, _) => self.check_features(index, env),
            (Behavior::Refine, _) => self.record_refines(index, out),
            (Behavior::Custom(custom), phase) => {
                let node = &self.nodes[index];
                let mut ctx = StmtContext {
                    phase,
                    store: env.store,
                    interner: env.interner,
                    source_id: &self.id,
                    ordinal: self.ordinal(),
                    version: self.version,
                    node: self.node_ref(index),
                    keyword: &node.keyword,
                    argument: node.argument.as_deref(),
                    location: node.location,
                    bindings: self.bindings.as_ref(),
                    writes: &mut out.writes,
                    diagnostics: &mut out.diagnostics,
                };
                match custom.on_phase(phase, &mut ctx) {
                    Outcome::Done => Step::Done,
                    Outcome::Deferred(waiting_on) => Step::Deferred(waiting_on),
                }
            }
            _ => Step::Done,
        }
    }

    fn module_ns(&self, env: &Env<'_>) -> Option<ModuleNs> {
        let namespace = self.header.namespace.as_deref()?;
        Some(env.interner.module_str(namespace, self.header.revision))
    }

    fn declare_module(&self, index: usize, env: &Env<'_>, out: &mut SourceOutput) -> Step {
        let header = &self.header;
        let Some(ns) = self.module_ns(env) else {
            out.diagnostics.push(self.missing(index, "namespace"));
            return Step::Done;
        };
        let key = NsKey::versioned(header.name.clone(), header.revision);
        let me = self.node_ref(index);
        let uri = header.namespace.clone().unwrap_or_default();
        out.put(builtin::MODULE, key.clone(), NsValue::Source(self.index), me);
        out.put(
            builtin::MODULE_NAMESPACE,
            NsKey::versioned(uri, header.revision),
            NsValue::Source(self.index),
            me,
        );
        out.put(builtin::MODULE_QNAME, key.clone(), NsValue::Module(ns), me);
        if let Some(version) = &header.semver {
            out.put(builtin::MODULE_SEMVER, key, NsValue::Version(version.clone()), me);
        }
        Step::Done
    }

    fn bind_own_prefix(&self, index: usize, env: &Env<'_>, out: &mut SourceOutput) -> Step {
        let (Some(ns), Some(prefix)) = (self.module_ns(env), self.header.prefix.clone()) else {
            out.diagnostics.push(self.missing(index, "prefix"));
            return Step::Done;
        };
        out.put(
            builtin::PREFIX,
            NsKey::Text(prefix),
            NsValue::Module(ns),
            self.node_ref(index),
        );
        Step::Done
    }

    fn declare_submodule(&self, index: usize, out: &mut SourceOutput) -> Step {
        let header = &self.header;
        let Some(parent) = header.belongs_to.clone() else {
            out.diagnostics.push(self.missing(index, "belongs-to"));
            return Step::Done;
        };
        let key = NsKey::versioned(header.name.clone(), header.revision);
        let me = self.node_ref(index);
        out.put(builtin::SUBMODULE, key.clone(), NsValue::Source(self.index), me);
        out.put(builtin::BELONGS_TO, key, NsValue::Text(parent), me);
        Step::Done
    }

    fn missing(&self, index: usize, keyword: &str) -> Diagnostic {
        Diagnostic::error(ErrorCode::E5002)
            .with_message(format!(
                "`{}` `{}` has no `{keyword}`",
                self.nodes[index].keyword, self.header.name
            ))
            .with_label(self.site(index), format!("`{keyword}` expected here"))
    }

    fn dependency(&self, index: usize) -> Dependency {
        let revision = self.child_named(index, "revision-date").and_then(|c| {
            match self.nodes[c].parsed {
                Some(EffectiveArgument::Revision(revision)) => Some(revision),
                _ => None,
            }
        });
        Dependency {
            name: self.nodes[index].argument.clone().unwrap_or_default(),
            revision,
            semver: self.requested_semver(index),
        }
    }

    /// Every registered version of `name` in `namespace`.
    fn candidates(&self, namespace: NamespaceId, name: &str, env: &Env<'_>) -> Vec<Candidate> {
        env.store
            .versions_of(namespace, name)
            .filter_map(|(revision, entry)| match entry.value {
                NsValue::Source(source) => Some(Candidate {
                    source,
                    revision,
                    semver: match env.store.get_global(
                        builtin::MODULE_SEMVER,
                        &NsKey::versioned(name, revision),
                    ) {
                        Some(NsValue::Version(version)) => Some(version.clone()),
                        _ => None,
                    },
                }),
                _ => None,
            })
            .collect()
    }

    /// Module handle of the selected candidate.
    fn selected_module(
        &self,
        name: &str,
        source: usize,
        candidates: &[Candidate],
        env: &Env<'_>,
    ) -> Option<ModuleNs> {
        let revision = candidates.iter().find(|c| c.source == source)?.revision;
        match env
            .store
            .get_global(builtin::MODULE_QNAME, &NsKey::versioned(name, revision))
        {
            Some(NsValue::Module(module)) => Some(*module),
            _ => None,
        }
    }

    #[tracing::instrument(level = "debug", skip_all, fields(source = %self.id))]
    fn link_import(&self, index: usize, env: &Env<'_>, out: &mut SourceOutput) -> Step {
        let dependency = self.dependency(index);
        let requirement = Requirement::of(&dependency, env.config.semantic_versioning);
        let candidates = self.candidates(builtin::MODULE, &dependency.name, env);

        let Some(source) = select(&requirement, &candidates) else {
            let code = match requirement {
                Requirement::SemVer(_) => ErrorCode::E1005,
                _ => ErrorCode::E1002,
            };
            let mut diagnostic = Diagnostic::error(code)
                .with_message(format!(
                    "cannot import `{}`: no module matches {requirement}",
                    dependency.name
                ))
                .with_label(self.site(index), "imported here");
            if candidates.is_empty() {
                diagnostic = diagnostic.with_note(format!("no source named `{}`", dependency.name));
            }
            out.diagnostics.push(diagnostic);
            return Step::Done;
        };

        let Some(module) = self.selected_module(&dependency.name, source, &candidates, env) else {
            out.diagnostics.push(self.internal(index, "selected module has no namespace"));
            return Step::Done;
        };
        tracing::debug!(
            import = %dependency.name,
            requirement = %requirement,
            selected = source,
            "import resolved"
        );
        if let Some(prefix) = self.child_argument(index, "prefix") {
            out.put(
                builtin::PREFIX,
                NsKey::text(prefix),
                NsValue::Module(module),
                self.node_ref(index),
            );
        }
        Step::Resolved(Resolved::Import { source })
    }

    fn link_include(&self, index: usize, env: &Env<'_>, out: &mut SourceOutput) -> Step {
        let dependency = self.dependency(index);
        let requirement = Requirement::of(&dependency, false);
        let candidates = self.candidates(builtin::SUBMODULE, &dependency.name, env);
        let Some(source) = select(&requirement, &candidates) else {
            out.diagnostics.push(
                Diagnostic::error(ErrorCode::E1003)
                    .with_message(format!(
                        "cannot include `{}`: no submodule matches {requirement}",
                        dependency.name
                    ))
                    .with_label(self.site(index), "included here"),
            );
            return Step::Done;
        };

        let owner = match self.header.kind {
            SourceKind::Submodule => self.header.belongs_to.as_deref(),
            _ => Some(self.header.name.as_str()),
        };
        let revision = candidates
            .iter()
            .find(|c| c.source == source)
            .and_then(|c| c.revision);
        let parent = env.store.get_global(
            builtin::BELONGS_TO,
            &NsKey::versioned(dependency.name.clone(), revision),
        );
        match (parent, owner) {
            (Some(NsValue::Text(parent)), Some(owner)) if parent == owner => {
                out.put(
                    builtin::INCLUDED_SUBMODULE,
                    NsKey::text(dependency.name.clone()),
                    NsValue::Source(source),
                    self.node_ref(index),
                );
                Step::Resolved(Resolved::Include { source })
            }
            (parent, owner) => {
                let parent = match parent {
                    Some(NsValue::Text(parent)) => parent.as_str(),
                    _ => "no module",
                };
                out.diagnostics.push(
                    Diagnostic::error(ErrorCode::E1004)
                        .with_message(format!(
                            "submodule `{}` belongs to `{parent}`, not `{}`",
                            dependency.name,
                            owner.unwrap_or_default()
                        ))
                        .with_label(self.site(index), "included here"),
                );
                Step::Done
            }
        }
    }

    fn link_parent(&self, index: usize, env: &Env<'_>, out: &mut SourceOutput) -> Step {
        let name = self.nodes[index].argument.clone().unwrap_or_default();
        let candidates = self.candidates(builtin::MODULE, &name, env);
        let module = select(&Requirement::Latest, &candidates)
            .and_then(|source| self.selected_module(&name, source, &candidates, env));
        let Some(module) = module else {
            out.diagnostics.push(
                Diagnostic::error(ErrorCode::E1002)
                    .with_message(format!("parent module `{name}` not found"))
                    .with_label(self.site(index), "declared here"),
            );
            return Step::Done;
        };
        if let Some(prefix) = self.child_argument(index, "prefix") {
            out.put(
                builtin::PREFIX,
                NsKey::text(prefix),
                NsValue::Module(module),
                self.node_ref(index),
            );
        }
        Step::Resolved(Resolved::BelongsTo { module })
    }

    fn internal(&self, index: usize, message: &str) -> Diagnostic {
        Diagnostic::error(ErrorCode::E9002)
            .with_message(message.to_owned())
            .with_label(self.site(index), "while processing this statement")
    }

    fn define(&self, index: usize, kind: DefinitionKind, out: &mut SourceOutput) -> Step {
        let Some(EffectiveArgument::Name(name)) = self.nodes[index].parsed else {
            return Step::Done;
        };
        let key = match self.nodes[index].parent {
            Some(parent) if kind.is_scoped() && !self.is_top_level(index) => {
                NsKey::Scoped(self.node_ref(parent), name)
            }
            _ => NsKey::QName(name),
        };
        let me = self.node_ref(index);
        out.put(kind.namespace(), key, NsValue::Stmt(me), me);
        Step::Done
    }

    /// Definition of `name` visible at `index`: scoped definitions of the
    /// enclosing statements first, nearest first, then top-level ones.
    fn find_definition(
        &self,
        namespace: NamespaceId,
        index: usize,
        name: QName,
        env: &Env<'_>,
    ) -> Option<NodeRef> {
        let scoped = self.ancestors(index).find_map(|ancestor| {
            let key = NsKey::Scoped(self.node_ref(ancestor), name);
            env.store.get(namespace, self.index, &key)
        });
        let entry = scoped.or_else(|| env.store.get(namespace, self.index, &NsKey::QName(name)))?;
        match entry.value {
            NsValue::Stmt(stmt) => Some(stmt),
            _ => None,
        }
    }

    fn resolve_grouping(&self, index: usize, env: &Env<'_>) -> Step {
        let Some(EffectiveArgument::Name(name)) = self.nodes[index].parsed else {
            return Step::Done;
        };
        match self.find_definition(builtin::GROUPING, index, name, env) {
            Some(grouping) => Step::Resolved(Resolved::Grouping(grouping)),
            None => Step::Deferred(format!("grouping `{}`", env.interner.display(name))),
        }
    }

    fn resolve_type(&self, index: usize, env: &Env<'_>, out: &mut SourceOutput) -> Step {
        let node = &self.nodes[index];
        let Some(EffectiveArgument::Name(name)) = node.parsed else {
            return Step::Done;
        };
        let local = env.interner.local_name(name);
        let unprefixed = node.argument.as_deref().is_some_and(|a| !a.contains(':'));

        let base = if unprefixed && is_builtin_type(local) {
            env.interner.yang_keyword(local)
        } else {
            let Some(typedef) = self.find_definition(builtin::TYPEDEF, index, name, env) else {
                return Step::Deferred(format!("typedef `{}`", env.interner.display(name)));
            };
            match env
                .store
                .get_global(builtin::RESOLVED_TYPEDEF, &NsKey::Node(typedef))
            {
                Some(NsValue::Name(base)) => *base,
                _ => {
                    return Step::Deferred(format!(
                        "base type of typedef `{}`",
                        env.interner.display(name)
                    ))
                }
            }
        };

        let parent = node.parent.filter(|&p| {
            matches!(
                self.nodes[p].behavior(),
                Some(Behavior::Definition(DefinitionKind::Typedef))
            )
        });
        if let Some(parent) = parent {
            out.put(
                builtin::RESOLVED_TYPEDEF,
                NsKey::Node(self.node_ref(parent)),
                NsValue::Name(base),
                self.node_ref(index),
            );
        }
        Step::Resolved(Resolved::Type { base })
    }

    fn resolve_base(&self, index: usize, env: &Env<'_>) -> Step {
        let Some(EffectiveArgument::Name(name)) = self.nodes[index].parsed else {
            return Step::Done;
        };
        match env
            .store
            .get(builtin::IDENTITY, self.index, &NsKey::QName(name))
            .map(|e| &e.value)
        {
            Some(NsValue::Stmt(identity)) => Step::Resolved(Resolved::Identity(*identity)),
            _ => Step::Deferred(format!("identity `{}`", env.interner.display(name))),
        }
    }

    fn check_features(&self, index: usize, env: &Env<'_>) -> Step {
        let Some(EffectiveArgument::IfFeature(expr)) = &self.nodes[index].parsed else {
            return Step::Done;
        };
        let missing = expr.features().into_iter().find(|&feature| {
            env.store
                .get(builtin::FEATURE, self.index, &NsKey::QName(feature))
                .is_none()
        });
        match missing {
            Some(feature) => Step::Deferred(format!("feature `{}`", env.interner.display(feature))),
            None => Step::Done,
        }
    }

    /// Contribute each refining property. A later `refine` of the same
    /// target replaces singleton properties set by an earlier one.
    fn record_refines(&self, index: usize, out: &mut SourceOutput) -> Step {
        let node = &self.nodes[index];
        let (Some(EffectiveArgument::Path(target)), Some(uses)) = (&node.parsed, node.parent)
        else {
            return Step::Done;
        };
        let properties: SmallVec<[usize; 4]> = node
            .children
            .iter()
            .copied()
            .filter(|&c| {
                let child = &self.nodes[c];
                child.mode == NodeMode::Active && child.keyword.prefix.is_none()
            })
            .collect();
        for property in properties {
            let child = &self.nodes[property];
            let Some(keyword) = child.qname else {
                continue;
            };
            let discriminator = if SINGLETON_PROPERTIES.contains(&child.keyword.name.as_str()) {
                None
            } else {
                Some(self.node_ref(property))
            };
            out.put(
                builtin::REFINE,
                NsKey::Refine {
                    uses: self.node_ref(uses),
                    target: target.clone(),
                    property: keyword,
                    discriminator,
                },
                NsValue::Stmt(self.node_ref(property)),
                self.node_ref(index),
            );
        }
        Step::Done
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
