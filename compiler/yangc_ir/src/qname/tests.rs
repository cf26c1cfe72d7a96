use super::*;
use proptest::prelude::*;

#[test]
fn test_qname_identity() {
    let interner = QNameInterner::new();
    let foo = interner.module_str("urn:foo", None);
    let foo_again = interner.module_str("urn:foo", None);
    assert_eq!(foo, foo_again);

    let a = interner.qname_str(foo, "a");
    let a_again = interner.qname_str(foo_again, "a");
    assert_eq!(a, a_again);
    assert_eq!(a.raw(), a_again.raw());
    assert_eq!(interner.local_name(a), "a");
    assert_eq!(interner.module_of(a), foo);
}

#[test]
fn test_revision_distinguishes_modules() {
    let interner = QNameInterner::new();
    let rev = "2020-01-01".parse().ok();
    let plain = interner.module_str("urn:foo", None);
    let dated = interner.module_str("urn:foo", rev);
    assert_ne!(plain, dated);
    assert_ne!(
        interner.qname_str(plain, "x"),
        interner.qname_str(dated, "x")
    );
    assert_eq!(interner.module_data(dated).revision, rev);
}

#[test]
fn test_rebind_keeps_local_name() {
    let interner = QNameInterner::new();
    let a = interner.module_str("urn:a", None);
    let b = interner.module_str("urn:b", None);
    let in_a = interner.qname_str(a, "c");
    let in_b = interner.rebind(in_a, b);
    assert_eq!(interner.local_name(in_b), "c");
    assert_eq!(interner.module_of(in_b), b);
    assert_eq!(interner.rebind(in_b, a), in_a);
}

#[test]
fn test_display() {
    let interner = QNameInterner::new();
    let module = interner.module_str("urn:a", None);
    assert_eq!(interner.display(interner.qname_str(module, "x")), "{urn:a}x");
    assert_eq!(interner.display(interner.yang_keyword("leaf")), "leaf");
}

#[test]
fn test_shared_interner_clones_agree() {
    let shared = SharedInterner::new();
    let other = shared.clone();
    let m1 = shared.module_str("urn:s", None);
    let m2 = other.module_str("urn:s", None);
    assert_eq!(shared.qname_str(m1, "n"), other.qname_str(m2, "n"));
}

proptest! {
    #[test]
    fn prop_interning_is_stable(ns in "[a-z]{1,8}", locals in proptest::collection::vec("[a-z][a-z0-9-]{0,6}", 1..8)) {
        let interner = QNameInterner::new();
        let module = interner.module_str(&ns, None);
        let first: Vec<QName> = locals.iter().map(|l| interner.qname_str(module, l)).collect();
        let second: Vec<QName> = locals.iter().map(|l| interner.qname_str(module, l)).collect();
        prop_assert_eq!(&first, &second);
        for (qname, local) in first.iter().zip(&locals) {
            prop_assert_eq!(interner.local_name(*qname), local.as_str());
        }
    }
}
