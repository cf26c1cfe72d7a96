use super::*;
use pretty_assertions::assert_eq;
use yangc_ir::{SchemaNodeId, SharedInterner};
use yangc_parse::{DeviateKind, MaxValue, PrefixBindings};

fn bindings() -> (SharedInterner, ModuleNs, ModuleNs, PrefixBindings) {
    let interner = SharedInterner::new();
    let own = interner.module_str("urn:own", None);
    let other = interner.module_str("urn:other", None);
    let bindings = PrefixBindings::new(interner.clone(), own).with_prefix("o", other);
    (interner, own, other, bindings)
}

#[test]
fn test_schema_node_id_follows_position() {
    let (interner, own, other, bindings) = bindings();
    let a = interner.qname_str(other, "a");
    let b = interner.qname_str(own, "b");

    let top = parse_value(&bindings, ArgumentKind::SchemaNodeId, "/o:a/b", true, YangVersion::V1)
        .unwrap();
    assert_eq!(top, EffectiveArgument::Path(SchemaNodeId::absolute([a, b])));

    let nested = parse_value(&bindings, ArgumentKind::SchemaNodeId, "o:a/b", false, YangVersion::V1)
        .unwrap();
    assert_eq!(nested, EffectiveArgument::Path(SchemaNodeId::descendant([a, b])));

    assert!(
        parse_value(&bindings, ArgumentKind::SchemaNodeId, "/o:a", false, YangVersion::V1).is_err()
    );
}

#[test]
fn test_values_parse_into_typed_arguments() {
    let (_, _, _, bindings) = bindings();
    let parse = |kind, text| parse_value(&bindings, kind, text, false, YangVersion::V1_1).unwrap();

    assert_eq!(parse(ArgumentKind::Boolean, "true"), EffectiveArgument::Boolean(true));
    assert_eq!(parse(ArgumentKind::NonNegativeInteger, "12"), EffectiveArgument::Count(12));
    assert_eq!(
        parse(ArgumentKind::MaxValue, "unbounded"),
        EffectiveArgument::Max(MaxValue::Unbounded)
    );
    assert_eq!(
        parse(ArgumentKind::Deviate, "not-supported"),
        EffectiveArgument::Deviate(DeviateKind::NotSupported)
    );
    assert_eq!(
        parse(ArgumentKind::YangVersion, "1.1"),
        EffectiveArgument::Version(YangVersion::V1_1)
    );
    assert_eq!(
        parse(ArgumentKind::SemVer, "1.2.3"),
        EffectiveArgument::SemVer(semver::Version::new(1, 2, 3))
    );
    assert_eq!(
        parse(ArgumentKind::Text, "any text at all"),
        EffectiveArgument::Text("any text at all".to_owned())
    );
}

#[test]
fn test_identifiers_bind_through_prefixes() {
    let (interner, own, other, bindings) = bindings();
    let parsed =
        parse_value(&bindings, ArgumentKind::NodeIdentifier, "o:thing", false, YangVersion::V1)
            .unwrap();
    assert_eq!(parsed, EffectiveArgument::Name(interner.qname_str(other, "thing")));

    let parsed =
        parse_value(&bindings, ArgumentKind::Identifier, "thing", false, YangVersion::V1).unwrap();
    assert_eq!(parsed, EffectiveArgument::Name(interner.qname_str(own, "thing")));

    assert!(
        parse_value(&bindings, ArgumentKind::NodeIdentifier, "x:thing", false, YangVersion::V1)
            .is_err()
    );
}

#[test]
fn test_shape_only_accepts_any_prefix() {
    let interner = SharedInterner::new();
    let shape = ShapeOnly(&interner);
    let parsed =
        parse_value(&shape, ArgumentKind::NodeIdentifier, "anything:x", false, YangVersion::V1)
            .unwrap();
    assert_eq!(
        parsed,
        EffectiveArgument::Name(interner.qname_str(interner.yang_module(), "x"))
    );
    assert!(parse_value(&shape, ArgumentKind::Identifier, "1bad", false, YangVersion::V1).is_err());
}

#[test]
fn test_malformed_values_are_rejected() {
    let (_, _, _, bindings) = bindings();
    for (kind, text) in [
        (ArgumentKind::RevisionDate, "2020-13-01"),
        (ArgumentKind::Boolean, "yes"),
        (ArgumentKind::NonNegativeInteger, "-1"),
        (ArgumentKind::Deviate, "remove"),
        (ArgumentKind::SemVer, "1.2"),
    ] {
        assert!(
            parse_value(&bindings, kind, text, false, YangVersion::V1).is_err(),
            "{text} should not parse"
        );
    }
}
