use super::*;
use crate::{BindingContext, PrefixBindings};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use yangc_ir::SharedInterner;

fn bindings() -> PrefixBindings {
    let interner = SharedInterner::new();
    let cur = interner.module_str("urn:cur", None);
    let a = interner.module_str("urn:a", None);
    PrefixBindings::new(interner, cur)
        .with_prefix("c", cur)
        .with_prefix("a", a)
}

#[test]
fn test_absolute_round_trip() {
    let ctx = bindings();
    let id = parse_absolute_schema_nodeid(&ctx, "/a:b/c").unwrap();
    assert!(id.is_absolute());

    let interner = ctx.interner();
    let steps: Vec<(u32, &str)> = id
        .steps()
        .iter()
        .map(|q| (interner.module_of(*q).raw(), interner.local_name(*q)))
        .collect();
    let a = ctx.resolve_prefix("a").unwrap().raw();
    let cur = ctx.current_module().raw();
    assert_eq!(steps, vec![(a, "b"), (cur, "c")]);

    let rendered = id.render(interner, |m| {
        (m != ctx.current_module()).then(|| ctx.prefix_of(m).unwrap_or_default().to_owned())
    });
    assert_eq!(rendered, "/a:b/c");
    assert_eq!(parse_absolute_schema_nodeid(&ctx, &rendered).unwrap(), id);
}

#[test]
fn test_trailing_slash_fails_at_slash() {
    let ctx = bindings();
    assert_eq!(
        parse_descendant_schema_nodeid(&ctx, "a/"),
        Err(ArgumentError::EmptyStep {
            production: Production::DescendantSchemaNodeId,
            offset: 2,
        })
    );
}

#[test]
fn test_double_slash_fails_at_slash() {
    let ctx = bindings();
    assert_eq!(
        parse_absolute_schema_nodeid(&ctx, "/a//b"),
        Err(ArgumentError::EmptyStep {
            production: Production::AbsoluteSchemaNodeId,
            offset: 3,
        })
    );
}

#[test]
fn test_wrong_form_leading_slash() {
    let ctx = bindings();
    assert!(matches!(
        parse_descendant_schema_nodeid(&ctx, "/x"),
        Err(ArgumentError::EmptyStep { offset: 1, .. })
    ));
    assert!(matches!(
        parse_absolute_schema_nodeid(&ctx, "x/y"),
        Err(ArgumentError::UnexpectedChar { found: 'x', offset: 1, .. })
    ));
    assert!(matches!(
        parse_absolute_schema_nodeid(&ctx, "/"),
        Err(ArgumentError::EmptyStep { offset: 1, .. })
    ));
}

#[test]
fn test_unknown_prefix_offset_points_at_step() {
    let ctx = bindings();
    assert_eq!(
        parse_absolute_schema_nodeid(&ctx, "/a:b/q:c"),
        Err(ArgumentError::UnknownPrefix {
            prefix: "q".to_owned(),
            offset: 6,
        })
    );
}

#[test]
fn test_schema_nodeid_dispatches_on_form() {
    let ctx = bindings();
    assert!(parse_schema_nodeid(&ctx, "/x").unwrap().is_absolute());
    assert!(!parse_schema_nodeid(&ctx, "x/y").unwrap().is_absolute());
}

proptest! {
    #[test]
    fn prop_descendant_steps_match_segments(
        segments in prop::collection::vec("[a-z_][a-z0-9_.-]{0,8}", 1..6)
    ) {
        let ctx = bindings();
        let text = segments.join("/");
        let id = parse_descendant_schema_nodeid(&ctx, &text).unwrap();
        let locals: Vec<&str> = id.steps().iter().map(|q| ctx.interner().local_name(*q)).collect();
        prop_assert_eq!(locals, segments.iter().map(String::as_str).collect::<Vec<_>>());
    }
}
