use super::*;
use pretty_assertions::assert_eq;
use yangc_diagnostic::{Diagnostic, ErrorCode, ErrorKind};
use yangc_ir::{DeclaredStatement, SchemaNodeId, SharedInterner, SourceId};

use crate::context::{EffectiveContext, Outcome, StmtContext};
use crate::effective::EffectiveArgument;
use crate::namespace::{NamespaceDef, NamespaceId, NsKey, NsValue};
use crate::registry::{ArgumentKind, RegistryBuilder, StatementBehavior, StatementSupport};

fn stmt(keyword: &str, argument: &str) -> DeclaredStatement {
    DeclaredStatement::new(keyword, Some(argument))
}

fn module(name: &str, body: impl IntoIterator<Item = DeclaredStatement>) -> DeclaredSource {
    let root = stmt("module", name)
        .with_child(stmt("namespace", &format!("urn:{name}")))
        .with_child(stmt("prefix", name))
        .with_children(body);
    DeclaredSource::from_root(root)
}

fn import(name: &str) -> DeclaredStatement {
    stmt("import", name).with_child(stmt("prefix", name))
}

fn leaf(name: &str, ty: &str) -> DeclaredStatement {
    stmt("leaf", name).with_child(stmt("type", ty))
}

fn reactor() -> CrossSourceReactor {
    let registry = StatementRegistry::core(SharedInterner::new()).unwrap();
    CrossSourceReactor::new(Arc::new(registry)).with_config(ReactorConfig::sequential())
}

fn build(
    reactor: &CrossSourceReactor,
    sources: impl IntoIterator<Item = DeclaredSource>,
) -> Result<EffectiveModel, ReactorFailure> {
    let mut action = reactor.new_build();
    action.add_sources(sources);
    action.build()
}

fn path(model: &EffectiveModel, module: &str, steps: &[&str]) -> SchemaNodeId {
    let ns = model.module(module).unwrap().ns;
    SchemaNodeId::absolute(steps.iter().map(|s| model.interner().qname_str(ns, s)))
}

#[test]
fn test_typedef_chain_resolves_over_rounds() {
    let reactor = reactor();
    let source = module(
        "a",
        [
            leaf("x", "first"),
            stmt("typedef", "first").with_child(stmt("type", "second")),
            stmt("typedef", "second").with_child(stmt("type", "third")),
            stmt("typedef", "third").with_child(stmt("type", "int8")),
        ],
    );
    let model = build(&reactor, [source]).unwrap();

    let x = model.find(&path(&model, "a", &["x"])).unwrap();
    let ty = x.substatement("type").unwrap();
    let int8 = model.interner().yang_keyword("int8");
    match ty.argument() {
        EffectiveArgument::Type { base, .. } => assert_eq!(*base, int8),
        other => panic!("unexpected type argument {other:?}"),
    }
}

#[test]
fn test_typedef_cycle_is_unsatisfiable() {
    let reactor = reactor();
    let source = module(
        "a",
        [
            stmt("typedef", "left").with_child(stmt("type", "right")),
            stmt("typedef", "right").with_child(stmt("type", "left")),
        ],
    );
    let failure = build(&reactor, [source]).unwrap_err();
    assert_eq!(failure.phase, Phase::FullDeclaration);
    assert_eq!(failure.diagnostics.len(), 2);
    assert!(failure
        .diagnostics
        .iter()
        .all(|d| d.code == ErrorCode::E3001));
}

#[test]
fn test_missing_grouping_names_what_it_waits_on() {
    let reactor = reactor();
    let source = module("a", [stmt("container", "c").with_child(stmt("uses", "nowhere"))]);
    let failure = build(&reactor, [source]).unwrap_err();

    assert_eq!(failure.phase, Phase::FullDeclaration);
    assert_eq!(failure.kinds(), vec![ErrorKind::UnsatisfiableDependency]);
    let diagnostic = failure.first().unwrap();
    assert!(diagnostic.message.contains("grouping"));
    assert!(diagnostic.message.contains("nowhere"));
    assert_eq!(diagnostic.labels[0].site.keyword, "uses");
}

#[test]
fn test_parallel_and_sequential_runs_agree() {
    let sources = || {
        vec![
            module(
                "base",
                [
                    stmt("grouping", "endpoint")
                        .with_child(leaf("address", "string"))
                        .with_child(leaf("port", "uint16")),
                    stmt("identity", "transport"),
                    stmt("container", "system").with_child(leaf("name", "string")),
                ],
            ),
            module(
                "ext",
                [
                    import("base"),
                    stmt("identity", "tcp").with_child(stmt("base", "base:transport")),
                    stmt("augment", "/base:system")
                        .with_child(stmt("container", "server").with_child(stmt("uses", "base:endpoint"))),
                ],
            ),
            module("other", [import("ext"), stmt("container", "top")]),
        ]
    };
    let registry = Arc::new(StatementRegistry::core(SharedInterner::new()).unwrap());
    let sequential = CrossSourceReactor::new(registry.clone()).with_config(ReactorConfig::sequential());
    let parallel =
        CrossSourceReactor::new(registry).with_config(ReactorConfig::default().with_parallel(true));

    let a = build(&sequential, sources()).unwrap();
    let b = build(&parallel, sources()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_invalid_root_fails_init() {
    let reactor = reactor();
    let source = DeclaredSource::new(SourceId::new("bad"), stmt("container", "c"));
    let failure = build(&reactor, [source]).unwrap_err();
    assert_eq!(failure.phase, Phase::Init);
    assert_eq!(failure.first().unwrap().code, ErrorCode::E4002);
}

#[test]
fn test_unknown_prefix_fails_definition() {
    let reactor = reactor();
    let source = module("a", [stmt("nope:thing", "x")]);
    let failure = build(&reactor, [source]).unwrap_err();
    assert_eq!(failure.phase, Phase::StatementDefinition);
    assert_eq!(failure.first().unwrap().code, ErrorCode::E1001);
}

#[test]
fn test_missing_import_fails_linkage() {
    let reactor = reactor();
    let source = module("a", [import("absent")]);
    let failure = build(&reactor, [source]).unwrap_err();
    assert_eq!(failure.phase, Phase::SourceLinkage);
    assert_eq!(failure.first().unwrap().code, ErrorCode::E1002);
}

#[test]
fn test_duplicate_module_names_both_sources() {
    let reactor = reactor();
    let first = module("a", []);
    let second = module("a", [stmt("description", "again")]);
    let failure = build(&reactor, [first, second]).unwrap_err();

    assert_eq!(failure.phase, Phase::SourcePreLinkage);
    assert!(failure.has_kind(ErrorKind::Conflict));
    let diagnostic = failure.first().unwrap();
    assert_eq!(diagnostic.labels.len(), 2);
    assert!(diagnostic.labels.iter().all(|l| l.site.source.name == "a"));
    assert!(diagnostic.labels[0].is_primary);
    assert!(!diagnostic.labels[1].is_primary);
    assert_eq!(diagnostic.labels[0].site.ordinal, Some(1));
    assert_eq!(diagnostic.labels[1].site.ordinal, Some(0));
    assert_ne!(
        diagnostic.labels[0].site.to_string(),
        diagnostic.labels[1].site.to_string()
    );
    assert!(diagnostic.to_string().contains("--> a#1:"));
}

#[test]
fn test_sites_of_distinct_sources_carry_no_ordinal() {
    let reactor = reactor();
    let sources = [
        module("a", [stmt("grouping", "g")]),
        module("b", [import("a"), stmt("uses", "a:missing")]),
    ];
    let failure = build(&reactor, sources).unwrap_err();

    let site = failure.first().unwrap().primary_site().unwrap();
    assert_eq!(site.source.name, "b");
    assert_eq!(site.ordinal, None);
}

#[test]
fn test_library_sources_join_only_when_imported() {
    let reactor = reactor();
    let mut action = reactor.new_build();
    action
        .add_source(module("main", [import("used")]))
        .add_library_source(module("used", [stmt("container", "u")]))
        .add_library_source(module("unused", [stmt("uses", "broken")]));
    let model = action.build().unwrap();

    let names: Vec<&str> = model.modules().iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["main", "used"]);
    assert_eq!(
        model.module("main").unwrap().imports,
        vec![SourceId::new("used")]
    );
}

#[test]
fn test_submodule_of_other_module_is_rejected() {
    let reactor = reactor();
    let sub = DeclaredSource::from_root(
        stmt("submodule", "sub").with_child(stmt("belongs-to", "b").with_child(stmt("prefix", "b"))),
    );
    let sources = [
        module("a", [stmt("include", "sub")]),
        module("b", []),
        sub,
    ];
    let failure = build(&reactor, sources).unwrap_err();
    assert_eq!(failure.phase, Phase::SourceLinkage);
    assert_eq!(failure.first().unwrap().code, ErrorCode::E1004);
}

const TAGS: NamespaceId = NamespaceId::new("tags");

/// Publishes its argument, then waits for the module's description.
#[derive(Debug)]
struct Tag;

impl StatementBehavior for Tag {
    fn on_phase(&self, _phase: Phase, ctx: &mut StmtContext<'_>) -> Outcome {
        let Some(argument) = ctx.argument() else {
            return Outcome::Done;
        };
        ctx.put(TAGS, NsKey::text(argument), NsValue::Text(ctx.source_id().name.clone()));
        Outcome::Done
    }
}

/// Never finds what it waits for, but keeps rewriting the same entry.
#[derive(Debug)]
struct Spin;

impl StatementBehavior for Spin {
    fn on_phase(&self, _phase: Phase, ctx: &mut StmtContext<'_>) -> Outcome {
        ctx.put(TAGS, NsKey::text("spin"), NsValue::Text("same".to_owned()));
        Outcome::Deferred("something nobody writes".to_owned())
    }
}

fn ext_reactor(behavior: impl StatementBehavior + 'static) -> CrossSourceReactor {
    let interner = SharedInterner::new();
    let keyword = interner.qname_str(interner.module_str("urn:ext", None), "tag");
    let mut builder = RegistryBuilder::with_core_statements(interner);
    builder
        .add_namespace(NamespaceDef::global(TAGS, Phase::FullDeclaration))
        .add_support(
            Phase::FullDeclaration,
            StatementSupport::custom(keyword, ArgumentKind::Text, behavior),
        );
    CrossSourceReactor::new(Arc::new(builder.build().unwrap()))
        .with_config(ReactorConfig::sequential())
}

fn ext_module() -> DeclaredSource {
    module(
        "ext",
        [stmt("extension", "tag").with_child(stmt("argument", "name"))],
    )
}

#[test]
fn test_custom_behavior_populates_its_namespace() {
    let reactor = ext_reactor(Tag);
    let user = module("user", [import("ext"), stmt("ext:tag", "hello")]);
    let model = build(&reactor, [ext_module(), user]).unwrap();

    assert_eq!(
        model.namespaces().get_global(TAGS, &NsKey::text("hello")),
        Some(&NsValue::Text("user".to_owned()))
    );
    let root = &model.module("user").unwrap().root;
    let tag = root.substatement("tag").unwrap();
    assert_eq!(tag.argument(), &EffectiveArgument::Text("hello".to_owned()));
}

/// Publishes like [`Tag`], then shapes its effective form from what it
/// published: `hidden` tags leave the model, `bad` tags are rejected.
#[derive(Debug)]
struct Badge;

impl StatementBehavior for Badge {
    fn on_phase(&self, phase: Phase, ctx: &mut StmtContext<'_>) -> Outcome {
        Tag.on_phase(phase, ctx)
    }

    fn effective(
        &self,
        ctx: &mut EffectiveContext<'_>,
        argument: EffectiveArgument,
    ) -> Option<EffectiveArgument> {
        let text = argument.as_text()?.to_owned();
        match text.as_str() {
            "hidden" => None,
            "bad" => {
                let diagnostic = Diagnostic::error(ErrorCode::E5001)
                    .with_message("`bad` is not a badge")
                    .with_label(ctx.site(), "rejected here");
                ctx.report(diagnostic);
                Some(argument)
            }
            _ => {
                let owner = match ctx.lookup(TAGS, &NsKey::text(&text)) {
                    Some(entry) => match &entry.value {
                        NsValue::Text(owner) => owner.clone(),
                        _ => return Some(argument),
                    },
                    None => return Some(argument),
                };
                Some(EffectiveArgument::Text(format!("{owner}/{text}")))
            }
        }
    }
}

#[test]
fn test_custom_behavior_shapes_its_effective_form() {
    let reactor = ext_reactor(Badge);
    let user = module(
        "user",
        [
            import("ext"),
            stmt("ext:tag", "shown"),
            stmt("ext:tag", "hidden"),
        ],
    );
    let model = build(&reactor, [ext_module(), user]).unwrap();

    let root = &model.module("user").unwrap().root;
    let tags: Vec<_> = root.substatements("tag").collect();
    assert_eq!(tags.len(), 1);
    assert_eq!(
        tags[0].argument(),
        &EffectiveArgument::Text("user/shown".to_owned())
    );
    // The namespace still holds what the declarative phases wrote.
    assert!(model
        .namespaces()
        .get_global(TAGS, &NsKey::text("hidden"))
        .is_some());
}

#[test]
fn test_custom_behavior_reports_in_effective_phase() {
    let reactor = ext_reactor(Badge);
    let user = module("user", [import("ext"), stmt("ext:tag", "bad")]);
    let failure = build(&reactor, [ext_module(), user]).unwrap_err();

    assert_eq!(failure.phase, Phase::EffectiveModel);
    let diagnostic = failure.first().unwrap();
    assert_eq!(diagnostic.code, ErrorCode::E5001);
    assert_eq!(diagnostic.primary_site().unwrap().source.name, "user");
}

#[test]
fn test_default_effective_form_keeps_generic_argument() {
    let reactor = ext_reactor(Tag);
    let user = module("user", [import("ext"), stmt("ext:tag", "hidden")]);
    let model = build(&reactor, [ext_module(), user]).unwrap();

    let root = &model.module("user").unwrap().root;
    let tag = root.substatement("tag").unwrap();
    assert_eq!(tag.argument(), &EffectiveArgument::Text("hidden".to_owned()));
}

#[test]
fn test_deferring_behavior_without_changes_terminates() {
    let reactor = ext_reactor(Spin);
    let user = module("user", [import("ext"), stmt("ext:tag", "x")]);
    let failure = build(&reactor, [ext_module(), user]).unwrap_err();

    assert_eq!(failure.phase, Phase::FullDeclaration);
    assert_eq!(failure.first().unwrap().code, ErrorCode::E3001);
    assert!(failure
        .first()
        .unwrap()
        .message
        .contains("something nobody writes"));
}
