use super::*;
use pretty_assertions::assert_eq;

fn rev(text: &str) -> Revision {
    text.parse().unwrap()
}

fn ver(text: &str) -> semver::Version {
    semver::Version::parse(text).unwrap()
}

fn dated(source: usize, revision: Option<&str>) -> Candidate {
    Candidate {
        source,
        revision: revision.map(rev),
        semver: None,
    }
}

fn versioned(source: usize, version: &str) -> Candidate {
    Candidate {
        source,
        revision: None,
        semver: Some(ver(version)),
    }
}

fn module(name: &str) -> DeclaredStatement {
    DeclaredStatement::new("module", Some(name))
        .with_child(DeclaredStatement::new("namespace", Some(format!("urn:{name}").as_str())))
        .with_child(DeclaredStatement::new("prefix", Some(name)))
}

fn import(name: &str) -> DeclaredStatement {
    DeclaredStatement::new("import", Some(name))
        .with_child(DeclaredStatement::new("prefix", Some(name)))
}

#[test]
fn test_latest_prefers_newest_revision() {
    let candidates = [
        dated(0, Some("2020-01-01")),
        dated(1, None),
        dated(2, Some("2021-06-30")),
        dated(3, Some("2019-12-31")),
    ];
    assert_eq!(select(&Requirement::Latest, &candidates), Some(2));
}

#[test]
fn test_undated_ranks_lowest() {
    let candidates = [dated(0, None), dated(1, Some("2001-01-01"))];
    assert_eq!(select(&Requirement::Latest, &candidates), Some(1));
}

#[test]
fn test_ties_go_to_first_registered() {
    let candidates = [dated(4, Some("2020-01-01")), dated(2, Some("2020-01-01"))];
    assert_eq!(select(&Requirement::Latest, &candidates), Some(2));
}

#[test]
fn test_pinned_revision_is_exact() {
    let candidates = [dated(0, Some("2020-01-01")), dated(1, Some("2021-01-01"))];
    assert_eq!(
        select(&Requirement::Revision(rev("2020-01-01")), &candidates),
        Some(0)
    );
    assert_eq!(
        select(&Requirement::Revision(rev("2022-01-01")), &candidates),
        None
    );
}

#[test]
fn test_semver_selects_highest_compatible() {
    let candidates = [
        versioned(0, "1.2.0"),
        versioned(1, "1.5.5"),
        versioned(2, "2.0.0"),
    ];
    assert_eq!(
        select(&Requirement::SemVer(ver("1.2.0")), &candidates),
        Some(1)
    );
}

#[test]
fn test_semver_rejects_lower_and_other_major() {
    let candidates = [
        versioned(0, "1.2.0"),
        versioned(1, "1.5.5"),
        versioned(2, "2.0.0"),
    ];
    assert_eq!(select(&Requirement::SemVer(ver("1.6.0")), &candidates), None);
    assert_eq!(select(&Requirement::SemVer(ver("3.0.0")), &candidates), None);
    assert_eq!(
        select(&Requirement::SemVer(ver("2.0.0")), &candidates),
        Some(2)
    );
}

#[test]
fn test_semver_ignores_candidates_without_version() {
    let candidates = [dated(0, Some("2024-01-01")), versioned(1, "1.0.1")];
    assert_eq!(
        select(&Requirement::SemVer(ver("1.0.0")), &candidates),
        Some(1)
    );
}

#[test]
fn test_requirement_depends_on_mode() {
    let dependency = Dependency {
        name: "foo".to_owned(),
        revision: Some(rev("2020-02-02")),
        semver: Some(ver("1.0.0")),
    };
    assert_eq!(
        Requirement::of(&dependency, true),
        Requirement::SemVer(ver("1.0.0"))
    );
    assert_eq!(
        Requirement::of(&dependency, false),
        Requirement::Revision(rev("2020-02-02"))
    );
    assert_eq!(
        Requirement::of(&Dependency::latest("foo"), true),
        Requirement::Latest
    );
}

#[test]
fn test_requirement_display() {
    assert_eq!(Requirement::Latest.to_string(), "any revision");
    assert_eq!(
        Requirement::SemVer(ver("1.2.0")).to_string(),
        "semantic version 1.2.0"
    );
}

#[test]
fn test_header_reads_identity_and_dependencies() {
    let root = module("foo")
        .with_child(DeclaredStatement::new("revision", Some("2020-01-01")))
        .with_child(DeclaredStatement::new("revision", Some("2022-03-04")))
        .with_child(DeclaredStatement::new("revision", Some("not-a-date")))
        .with_child(
            import("bar").with_child(DeclaredStatement::new("revision-date", Some("2019-09-09"))),
        )
        .with_child(DeclaredStatement::new("include", Some("foo-sub")));
    let header = SourceHeader::read(&root);

    assert_eq!(header.kind, SourceKind::Module);
    assert_eq!(header.name, "foo");
    assert_eq!(header.revision, Some(rev("2022-03-04")));
    assert_eq!(header.namespace.as_deref(), Some("urn:foo"));
    assert_eq!(header.prefix.as_deref(), Some("foo"));
    assert_eq!(
        header.imports,
        vec![Dependency {
            name: "bar".to_owned(),
            revision: Some(rev("2019-09-09")),
            semver: None,
        }]
    );
    assert_eq!(header.includes, vec![Dependency::latest("foo-sub")]);
}

#[test]
fn test_header_reads_openconfig_versions() {
    let root = module("foo")
        .with_child(
            DeclaredStatement::new("import", Some(OPENCONFIG_MODULE))
                .with_child(DeclaredStatement::new("prefix", Some("oc-ext"))),
        )
        .with_child(DeclaredStatement::new("oc-ext:openconfig-version", Some("2.1.0")))
        .with_child(import("bar").with_child(DeclaredStatement::new(
            "oc-ext:openconfig-version",
            Some("1.2.0"),
        )))
        .with_child(import("baz").with_child(DeclaredStatement::new(
            "other:openconfig-version",
            Some("9.9.9"),
        )));
    let header = SourceHeader::read(&root);

    assert_eq!(header.semver, Some(ver("2.1.0")));
    assert_eq!(header.imports[1].semver, Some(ver("1.2.0")));
    assert_eq!(header.imports[2].semver, None);
}

#[test]
fn test_header_of_submodule() {
    let root = DeclaredStatement::new("submodule", Some("foo-sub")).with_child(
        DeclaredStatement::new("belongs-to", Some("foo"))
            .with_child(DeclaredStatement::new("prefix", Some("f"))),
    );
    let header = SourceHeader::read(&root);
    assert_eq!(header.kind, SourceKind::Submodule);
    assert_eq!(header.belongs_to.as_deref(), Some("foo"));
    assert_eq!(header.prefix.as_deref(), Some("f"));

    let header = SourceHeader::read(&DeclaredStatement::new("container", Some("x")));
    assert_eq!(header.kind, SourceKind::Invalid);
}

#[test]
fn test_library_closure_pulls_transitively() {
    let headers: Vec<SourceHeader> = [
        module("main").with_child(import("a")),
        module("a").with_child(import("b")),
        module("b"),
        module("unused"),
    ]
    .iter()
    .map(SourceHeader::read)
    .collect();
    let active = library_closure(&headers, &[false, true, true, true], false);
    assert_eq!(active, vec![true, true, true, false]);
}

#[test]
fn test_library_closure_prefers_main_sources() {
    let headers: Vec<SourceHeader> = [
        module("main").with_child(import("a")),
        module("a"),
        module("a").with_child(DeclaredStatement::new("revision", Some("2030-01-01"))),
    ]
    .iter()
    .map(SourceHeader::read)
    .collect();
    // An active `a` already satisfies the unpinned import.
    let active = library_closure(&headers, &[false, false, true], false);
    assert_eq!(active, vec![true, true, false]);
}

#[test]
fn test_library_closure_picks_pinned_revision() {
    let headers: Vec<SourceHeader> = [
        module("main").with_child(
            import("a").with_child(DeclaredStatement::new("revision-date", Some("2020-01-01"))),
        ),
        module("a").with_child(DeclaredStatement::new("revision", Some("2020-01-01"))),
        module("a").with_child(DeclaredStatement::new("revision", Some("2021-01-01"))),
    ]
    .iter()
    .map(SourceHeader::read)
    .collect();
    let active = library_closure(&headers, &[false, true, true], false);
    assert_eq!(active, vec![true, true, false]);
}

#[test]
fn test_library_closure_follows_includes_and_parents() {
    let sub = DeclaredStatement::new("submodule", Some("a-sub")).with_child(
        DeclaredStatement::new("belongs-to", Some("a"))
            .with_child(DeclaredStatement::new("prefix", Some("a"))),
    );
    let headers: Vec<SourceHeader> = [
        sub,
        module("a").with_child(DeclaredStatement::new("include", Some("a-sub"))),
    ]
    .iter()
    .map(SourceHeader::read)
    .collect();
    let active = library_closure(&headers, &[false, true], false);
    assert_eq!(active, vec![true, true]);
}
