use super::*;
use yangc_ir::{Location, SourceId};

fn site(keyword: &str, line: u32) -> StatementSite {
    StatementSite::new(SourceId::new("foo"), keyword, Location::new(line, 3))
}

#[test]
fn test_diagnostic_builder() {
    let diag = Diagnostic::error(ErrorCode::E1001)
        .with_message("unknown prefix `x`")
        .with_label(site("uses", 4), "here")
        .with_note("declare an import with prefix `x`");

    assert_eq!(diag.code, ErrorCode::E1001);
    assert_eq!(diag.kind(), ErrorKind::Binding);
    assert!(diag.is_error());
    assert_eq!(diag.labels.len(), 1);
    assert!(diag.labels[0].is_primary);
    assert_eq!(diag.primary_site().map(|s| s.location.line), Some(4));
}

#[test]
fn test_conflict_names_both_contributors() {
    let diag = namespace_conflict("grouping", "g", site("grouping", 9), site("grouping", 2));
    assert_eq!(diag.kind(), ErrorKind::Conflict);
    assert_eq!(diag.labels.len(), 2);
    assert!(diag.labels[0].is_primary);
    assert!(!diag.labels[1].is_primary);
    assert_eq!(diag.labels[1].site.location.line, 2);
}

#[test]
fn test_unknown_statement_message() {
    let diag = unknown_statement(site("frobnicate", 1));
    assert_eq!(diag.code, ErrorCode::E4001);
    assert!(diag.message.contains("frobnicate"));
}

#[test]
fn test_diagnostic_display() {
    let diag = unresolved_reference(site("uses", 7), "grouping `g`", "full-declaration");
    let output = diag.to_string();
    assert!(output.contains("error"));
    assert!(output.contains("E3001"));
    assert!(output.contains("foo:7:3 `uses`"));
    assert!(output.contains("full-declaration"));
}

#[test]
fn test_conflict_display_marks_primary() {
    let diag = namespace_conflict("grouping", "g", site("grouping", 9), site("grouping", 2));
    let lines: Vec<String> = diag.to_string().lines().map(str::to_owned).collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("  --> foo:9:3"));
    assert!(lines[2].starts_with("      foo:2:3"));
}

#[test]
fn test_sites_of_same_named_sources_differ() {
    let first = site("module", 1).with_ordinal(0);
    let second = site("module", 1).with_ordinal(1);
    assert_ne!(first, second);
    assert_eq!(first.to_string(), "foo#0:1:3 `module`");
    assert_eq!(second.to_string(), "foo#1:1:3 `module`");
    assert_eq!(site("module", 1).to_string(), "foo:1:3 `module`");

    let diag = namespace_conflict("module", "foo", second, first);
    let output = diag.to_string();
    assert!(output.contains("--> foo#1:1:3"));
    assert!(output.contains("      foo#0:1:3"));
}
