use super::*;
use pretty_assertions::assert_eq;
use yangc_ir::SharedInterner;

const THINGS: NamespaceId = NamespaceId::new("things");
const LOCAL: NamespaceId = NamespaceId::new("local-things");
const OVERRIDES: NamespaceId = NamespaceId::new("overrides");

fn store() -> NamespaceStore {
    NamespaceStore::new([
        NamespaceDef::global(THINGS, Phase::StatementDefinition),
        NamespaceDef::source_local(LOCAL, Phase::SourceLinkage),
        NamespaceDef::global(OVERRIDES, Phase::FullDeclaration).last_wins(),
    ])
}

fn write(ns: NamespaceId, key: &str, value: &str, source: usize, node: usize) -> StagedWrite {
    StagedWrite {
        namespace: ns,
        key: NsKey::text(key),
        value: NsValue::Text(value.to_owned()),
        contributor: NodeRef::new(source, node),
    }
}

#[test]
fn test_get_after_commit() {
    let mut store = store();
    assert!(store.get(THINGS, 0, &NsKey::text("a")).is_none());

    let errors = store.commit(Phase::StatementDefinition, [write(THINGS, "a", "x", 0, 1)]);
    assert!(errors.is_empty());

    let entry = store.get(THINGS, 3, &NsKey::text("a")).unwrap();
    assert_eq!(entry.value, NsValue::Text("x".to_owned()));
    assert_eq!(entry.contributor, NodeRef::new(0, 1));
}

#[test]
fn test_conflict_names_both_contributors() {
    let mut store = store();
    let errors = store.commit(
        Phase::StatementDefinition,
        [write(THINGS, "a", "x", 0, 1), write(THINGS, "a", "y", 1, 4)],
    );
    assert_eq!(
        errors,
        vec![NamespaceError::Conflict {
            namespace: THINGS,
            key: NsKey::text("a"),
            first: NodeRef::new(0, 1),
            second: NodeRef::new(1, 4),
        }]
    );
    // The first write stays.
    let entry = store.get(THINGS, 0, &NsKey::text("a")).unwrap();
    assert_eq!(entry.value, NsValue::Text("x".to_owned()));
}

#[test]
fn test_identical_rewrite_accepted() {
    let mut store = store();
    let errors = store.commit(
        Phase::StatementDefinition,
        [write(THINGS, "a", "x", 0, 1), write(THINGS, "a", "x", 1, 2)],
    );
    assert!(errors.is_empty());
    assert_eq!(
        store.get(THINGS, 0, &NsKey::text("a")).unwrap().contributor,
        NodeRef::new(0, 1)
    );
}

#[test]
fn test_last_wins_policy() {
    let mut store = store();
    let errors = store.commit(
        Phase::FullDeclaration,
        [write(OVERRIDES, "p", "first", 0, 1), write(OVERRIDES, "p", "second", 0, 2)],
    );
    assert!(errors.is_empty());
    let entry = store.get(OVERRIDES, 0, &NsKey::text("p")).unwrap();
    assert_eq!(entry.value, NsValue::Text("second".to_owned()));
}

#[test]
fn test_source_local_isolation() {
    let mut store = store();
    let errors = store.commit(
        Phase::SourceLinkage,
        [write(LOCAL, "p", "x", 0, 1), write(LOCAL, "p", "y", 1, 1)],
    );
    assert!(errors.is_empty());
    assert_eq!(
        store.get(LOCAL, 0, &NsKey::text("p")).unwrap().value,
        NsValue::Text("x".to_owned())
    );
    assert_eq!(
        store.get(LOCAL, 1, &NsKey::text("p")).unwrap().value,
        NsValue::Text("y".to_owned())
    );
    assert!(store.get(LOCAL, 2, &NsKey::text("p")).is_none());
}

#[test]
fn test_write_before_phase_is_unavailable() {
    let mut store = store();
    let errors = store.commit(Phase::SourceLinkage, [write(THINGS, "a", "x", 0, 1)]);
    assert!(matches!(errors[0], NamespaceError::Unavailable { namespace: THINGS, .. }));

    let unknown = NamespaceId::new("nope");
    let errors = store.commit(Phase::EffectiveModel, [write(unknown, "a", "x", 0, 1)]);
    assert_eq!(errors.len(), 1);
}

#[test]
fn test_versions_of() {
    let mut store = store();
    let rev = |s: &str| Some(s.parse::<Revision>().unwrap());
    let versioned = |name: &str, r: Option<Revision>, node| StagedWrite {
        namespace: THINGS,
        key: NsKey::versioned(name, r),
        value: NsValue::Source(node),
        contributor: NodeRef::new(node, 0),
    };
    let errors = store.commit(
        Phase::StatementDefinition,
        [
            versioned("foo", rev("2021-01-01"), 0),
            versioned("foo", None, 1),
            versioned("foobar", None, 2),
            versioned("fo", None, 3),
            versioned("foo", rev("2020-01-01"), 4),
        ],
    );
    assert!(errors.is_empty());

    let found: Vec<Option<Revision>> = store.versions_of(THINGS, "foo").map(|(r, _)| r).collect();
    assert_eq!(found, vec![None, rev("2020-01-01"), rev("2021-01-01")]);
}

#[test]
fn test_describe_keys() {
    let interner = SharedInterner::new();
    let module = interner.module_str("urn:x", None);
    let q = interner.qname_str(module, "g");
    assert_eq!(NsKey::QName(q).describe(&interner), "{urn:x}g");
    assert_eq!(NsKey::versioned("foo", None).describe(&interner), "foo");
}

#[test]
fn test_generation_tracks_changes() {
    let mut store = store();
    assert_eq!(store.generation(), 0);
    store.commit(Phase::FullDeclaration, [write(THINGS, "a", "x", 0, 1)]);
    assert_eq!(store.generation(), 1);

    // Equal value again: accepted, nothing changes.
    store.commit(Phase::FullDeclaration, [write(THINGS, "a", "x", 0, 1)]);
    assert_eq!(store.generation(), 1);

    store.commit(Phase::FullDeclaration, [write(OVERRIDES, "a", "y", 2, 3)]);
    store.commit(Phase::FullDeclaration, [write(OVERRIDES, "a", "z", 2, 4)]);
    assert_eq!(store.generation(), 3);
}
