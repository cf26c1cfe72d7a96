use super::*;
use crate::StatementSite;
use pretty_assertions::assert_eq;
use yangc_ir::SourceId;

fn at(source: &str, line: u32, code: ErrorCode, message: &str) -> Diagnostic {
    Diagnostic::error(code).with_message(message).with_label(
        StatementSite::new(SourceId::new(source), "leaf", Location::new(line, 1)),
        "here",
    )
}

#[test]
fn test_soft_errors_suppressed_after_hard() {
    let mut queue = DiagnosticQueue::new();
    assert!(queue.add(at("a", 1, ErrorCode::E1001, "hard error"), 0));
    assert!(!queue.add_with_severity(
        at("a", 5, ErrorCode::E3001, "soft error"),
        0,
        DiagnosticSeverity::Soft
    ));

    let flushed = queue.flush();
    assert_eq!(flushed.len(), 1);
    assert_eq!(flushed[0].message, "hard error");
}

#[test]
fn test_soft_errors_reported_when_no_hard_error() {
    let mut queue = DiagnosticQueue::new();
    assert!(queue.add_with_severity(
        at("a", 1, ErrorCode::E3001, "soft 1"),
        0,
        DiagnosticSeverity::Soft
    ));
    assert!(queue.add_with_severity(
        at("a", 2, ErrorCode::E3001, "soft 2"),
        0,
        DiagnosticSeverity::Soft
    ));
    assert_eq!(queue.flush().len(), 2);
}

#[test]
fn test_flush_orders_by_source_then_position_then_code() {
    let mut queue = DiagnosticQueue::new();
    queue.add(at("b", 1, ErrorCode::E2001, "b1"), 1);
    queue.add(at("a", 9, ErrorCode::E5001, "a9"), 0);
    queue.add(at("a", 2, ErrorCode::E5002, "a2-late-code"), 0);
    queue.add(at("a", 2, ErrorCode::E1001, "a2-early-code"), 0);

    let order: Vec<String> = queue.flush().into_iter().map(|d| d.message).collect();
    assert_eq!(order, vec!["a2-early-code", "a2-late-code", "a9", "b1"]);
}

#[test]
fn test_flush_independent_of_insertion_order() {
    let diags = [
        (at("a", 3, ErrorCode::E1001, "x"), 0),
        (at("b", 1, ErrorCode::E2001, "y"), 1),
        (at("c", 4, ErrorCode::E4001, "z"), 2),
    ];

    let mut forward = DiagnosticQueue::new();
    for (d, order) in diags.iter().cloned() {
        forward.add(d, order);
    }
    let mut backward = DiagnosticQueue::new();
    for (d, order) in diags.iter().rev().cloned() {
        backward.add(d, order);
    }

    assert_eq!(forward.flush(), backward.flush());
}

#[test]
fn test_duplicates_collapse() {
    let mut queue = DiagnosticQueue::new();
    assert!(queue.add(at("a", 1, ErrorCode::E0001, "bad char `!`"), 0));
    assert!(!queue.add(at("a", 1, ErrorCode::E0001, "bad char `?`"), 0));
    assert!(queue.add(at("a", 1, ErrorCode::E1001, "unknown prefix `p`"), 0));
    assert!(!queue.add(at("a", 1, ErrorCode::E1001, "unknown prefix `p`"), 0));
    assert!(queue.add(at("a", 1, ErrorCode::E1001, "unknown prefix `q`"), 0));
    assert_eq!(queue.error_count(), 3);
}

#[test]
fn test_error_limit() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig::unlimited().with_error_limit(2));
    assert!(queue.add(at("a", 1, ErrorCode::E4001, "one"), 0));
    assert!(queue.add(at("a", 2, ErrorCode::E4001, "two"), 0));
    assert!(queue.limit_reached());
    assert!(!queue.add(at("a", 3, ErrorCode::E4001, "three"), 0));
}

#[test]
fn test_extend_keeps_source_tags() {
    let mut worker = DiagnosticQueue::new();
    worker.add(at("b", 1, ErrorCode::E4001, "from b"), 1);

    let mut main = DiagnosticQueue::new();
    main.add(at("a", 7, ErrorCode::E4001, "from a"), 0);
    main.extend(worker);

    let order: Vec<String> = main.flush().into_iter().map(|d| d.message).collect();
    assert_eq!(order, vec!["from a", "from b"]);
    assert!(!main.has_errors());
}
