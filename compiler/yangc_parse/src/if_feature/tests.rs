use super::*;
use crate::PrefixBindings;
use pretty_assertions::assert_eq;
use yangc_ir::SharedInterner;

fn bindings() -> PrefixBindings {
    let interner = SharedInterner::new();
    let cur = interner.module_str("urn:cur", None);
    let other = interner.module_str("urn:other", None);
    PrefixBindings::new(interner, cur).with_prefix("o", other)
}

fn render(ctx: &PrefixBindings, text: &str) -> String {
    parse_if_feature(ctx, text, YangVersion::V1_1)
        .unwrap()
        .display(ctx.interner())
        .to_string()
}

#[test]
fn test_single_feature_in_v1() {
    let ctx = bindings();
    let expr = parse_if_feature(&ctx, "o:fast", YangVersion::V1).unwrap();
    let IfFeatureExpr::Feature(q) = expr else {
        panic!("expected a bare feature");
    };
    assert_eq!(ctx.interner().local_name(q), "fast");
}

#[test]
fn test_v1_rejects_expressions() {
    let ctx = bindings();
    let err = parse_if_feature(&ctx, "a and b", YangVersion::V1).unwrap_err();
    assert!(matches!(err, ArgumentError::UnexpectedChar { found: ' ', offset: 2, .. }));
}

#[test]
fn test_precedence() {
    let ctx = bindings();
    assert_eq!(render(&ctx, "a or b and not c"), "(a or (b and not c))");
    assert_eq!(render(&ctx, "(a or b) and c"), "((a or b) and c)");
    assert_eq!(render(&ctx, "not(a)"), "not a");
}

#[test]
fn test_evaluate() {
    let ctx = bindings();
    let expr = parse_if_feature(&ctx, "a and not o:b", YangVersion::V1_1).unwrap();
    let features = expr.features();
    assert_eq!(features.len(), 2);
    let a = features[0];
    let b = features[1];

    assert!(expr.evaluate(&|f| f == a));
    assert!(!expr.evaluate(&|f| f == a || f == b));
    assert!(!expr.evaluate(&|_| false));
}

#[test]
fn test_syntax_errors() {
    let ctx = bindings();
    assert!(matches!(
        parse_if_feature(&ctx, "a and", YangVersion::V1_1),
        Err(ArgumentError::UnexpectedEnd { offset: 6, .. })
    ));
    assert!(matches!(
        parse_if_feature(&ctx, "(a or b", YangVersion::V1_1),
        Err(ArgumentError::UnexpectedEnd { .. })
    ));
    assert!(matches!(
        parse_if_feature(&ctx, "a b", YangVersion::V1_1),
        Err(ArgumentError::UnexpectedChar { found: 'b', offset: 3, .. })
    ));
    assert!(matches!(
        parse_if_feature(&ctx, "or a", YangVersion::V1_1),
        Err(ArgumentError::UnexpectedChar { found: 'o', offset: 1, .. })
    ));
}

#[test]
fn test_unknown_prefix_in_expression() {
    let ctx = bindings();
    assert_eq!(
        parse_if_feature(&ctx, "a or x:b", YangVersion::V1_1),
        Err(ArgumentError::UnknownPrefix {
            prefix: "x".to_owned(),
            offset: 6,
        })
    );
}
