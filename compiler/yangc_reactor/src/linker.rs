//! Cross-source linking.
//!
//! Selection of a concrete source for an `import`, `include` or
//! `belongs-to` is a pure function of the requirement and the candidates,
//! so it lives here apart from the scheduler. The scheduler feeds it
//! candidates read from the module namespaces; library-closure computation
//! feeds it candidates read from source headers before any phase runs.
//!
//! # Preference
//!
//! - No constraint: the latest revision. A source without revision ranks
//!   below every dated one.
//! - `revision-date`: exactly that revision.
//! - Semantic version: the highest version with the same major version
//!   that is not lower than the requested one.
//!
//! Ties go to the source registered first.

use std::collections::VecDeque;
use std::fmt;

use yangc_ir::{DeclaredStatement, Revision};

use crate::registry::{OPENCONFIG_MODULE, OPENCONFIG_VERSION};

/// Root statement kind of a source.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum SourceKind {
    Module,
    Submodule,
    /// Neither `module` nor `submodule`; the run fails in its first phase.
    Invalid,
}

/// One `import`, `include` or `belongs-to` of a source.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Dependency {
    pub name: String,
    /// Pinned through `revision-date`.
    pub revision: Option<Revision>,
    /// Requested through `openconfig-version`.
    pub semver: Option<semver::Version>,
}

impl Dependency {
    pub fn latest(name: impl Into<String>) -> Self {
        Dependency {
            name: name.into(),
            revision: None,
            semver: None,
        }
    }
}

/// What the linker knows about a source without running any phase: read
/// syntactically from the root statement and its direct substatements.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct SourceHeader {
    pub kind: SourceKind,
    pub name: String,
    /// Latest valid `revision`.
    pub revision: Option<Revision>,
    pub namespace: Option<String>,
    /// Own prefix of a module, `belongs-to` prefix of a submodule.
    pub prefix: Option<String>,
    pub belongs_to: Option<String>,
    pub semver: Option<semver::Version>,
    /// Prefix `openconfig-extensions` is imported under.
    pub semver_prefix: Option<String>,
    pub imports: Vec<Dependency>,
    pub includes: Vec<Dependency>,
}

impl SourceHeader {
    pub fn read(root: &DeclaredStatement) -> Self {
        let kind = if root.keyword().is("module") {
            SourceKind::Module
        } else if root.keyword().is("submodule") {
            SourceKind::Submodule
        } else {
            SourceKind::Invalid
        };
        let revision = root
            .children_named("revision")
            .filter_map(|r| r.argument()?.parse::<Revision>().ok())
            .max();

        // `openconfig-version` is only recognized through the prefix the
        // source imports `openconfig-extensions` under.
        let oc_prefix = root
            .children_named("import")
            .find(|i| i.argument() == Some(OPENCONFIG_MODULE))
            .and_then(|i| i.child_argument("prefix"));
        let semver_of = |stmt: &DeclaredStatement| {
            let prefix = oc_prefix?;
            stmt.children()
                .iter()
                .find(|c| {
                    c.keyword().prefix.as_deref() == Some(prefix)
                        && c.keyword().name == OPENCONFIG_VERSION
                })
                .and_then(DeclaredStatement::argument)
                .and_then(|text| yangc_parse::parse_semver(text).ok())
        };

        let dependency = |stmt: &DeclaredStatement| {
            Some(Dependency {
                name: stmt.argument()?.to_owned(),
                revision: stmt
                    .child_argument("revision-date")
                    .and_then(|r| r.parse().ok()),
                semver: semver_of(stmt),
            })
        };

        let belongs = root.child("belongs-to");
        let prefix = match kind {
            SourceKind::Submodule => belongs.and_then(|b| b.child_argument("prefix")),
            _ => root.child_argument("prefix"),
        };

        SourceHeader {
            kind,
            name: root.argument().unwrap_or_default().to_owned(),
            revision,
            namespace: root.child_argument("namespace").map(str::to_owned),
            prefix: prefix.map(str::to_owned),
            belongs_to: belongs
                .and_then(DeclaredStatement::argument)
                .map(str::to_owned),
            semver: semver_of(root),
            semver_prefix: oc_prefix.map(str::to_owned),
            imports: root.children_named("import").filter_map(&dependency).collect(),
            includes: root.children_named("include").filter_map(&dependency).collect(),
        }
    }
}

/// A source that may satisfy a dependency.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Candidate {
    /// Registration index.
    pub source: usize,
    pub revision: Option<Revision>,
    pub semver: Option<semver::Version>,
}

/// Constraint a dependency puts on its target.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum Requirement {
    Latest,
    Revision(Revision),
    /// Compatible with this version: same major, not lower.
    SemVer(semver::Version),
}

impl Requirement {
    /// Constraint of `dependency`. Semantic versions are honored only in
    /// semantic-versioning mode; otherwise a pinned revision applies.
    pub fn of(dependency: &Dependency, semantic_versioning: bool) -> Self {
        match (&dependency.semver, dependency.revision) {
            (Some(version), _) if semantic_versioning => Requirement::SemVer(version.clone()),
            (_, Some(revision)) => Requirement::Revision(revision),
            _ => Requirement::Latest,
        }
    }

    fn admits(&self, candidate: &Candidate) -> bool {
        match self {
            Requirement::Latest => true,
            Requirement::Revision(revision) => candidate.revision == Some(*revision),
            Requirement::SemVer(requested) => candidate
                .semver
                .as_ref()
                .is_some_and(|v| v.major == requested.major && v >= requested),
        }
    }

    /// Whether `a` is strictly preferred over `b`. Both are admitted.
    fn prefers(&self, a: &Candidate, b: &Candidate) -> bool {
        match self {
            Requirement::SemVer(_) => a.semver > b.semver,
            Requirement::Latest | Requirement::Revision(_) => a.revision > b.revision,
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::Latest => f.write_str("any revision"),
            Requirement::Revision(revision) => write!(f, "revision {revision}"),
            Requirement::SemVer(version) => write!(f, "semantic version {version}"),
        }
    }
}

/// Pick the most preferred candidate admitted by `requirement`.
///
/// Returns the candidate's registration index.
pub fn select(requirement: &Requirement, candidates: &[Candidate]) -> Option<usize> {
    let mut ordered: Vec<&Candidate> = candidates.iter().collect();
    ordered.sort_by_key(|c| c.source);
    let mut best: Option<&Candidate> = None;
    for candidate in ordered {
        if !requirement.admits(candidate) {
            continue;
        }
        let better = match best {
            Some(current) => requirement.prefers(candidate, current),
            None => true,
        };
        if better {
            best = Some(candidate);
        }
    }
    best.map(|c| c.source)
}

fn candidates(
    headers: &[SourceHeader],
    kind: SourceKind,
    name: &str,
    include: impl Fn(usize) -> bool,
) -> Vec<Candidate> {
    headers
        .iter()
        .enumerate()
        .filter(|(i, h)| h.kind == kind && h.name == name && include(*i))
        .map(|(i, h)| Candidate {
            source: i,
            revision: h.revision,
            semver: h.semver.clone(),
        })
        .collect()
}

/// Sources that take part in a run.
///
/// Every non-library source is active. A library source becomes active
/// when an active source depends on it and no already active source
/// satisfies that dependency; its own dependencies are then followed in
/// turn. Dependencies nothing satisfies are left for the linkage phase to
/// report.
pub fn library_closure(
    headers: &[SourceHeader],
    library: &[bool],
    semantic_versioning: bool,
) -> Vec<bool> {
    let mut active: Vec<bool> = library.iter().map(|l| !l).collect();
    let mut queue: VecDeque<usize> = (0..headers.len()).filter(|i| active[*i]).collect();

    while let Some(index) = queue.pop_front() {
        let header = &headers[index];
        let modules = header
            .imports
            .iter()
            .map(|d| (SourceKind::Module, d.clone()));
        let parent = header
            .belongs_to
            .as_ref()
            .map(|name| (SourceKind::Module, Dependency::latest(name.clone())));
        let submodules = header
            .includes
            .iter()
            .map(|d| (SourceKind::Submodule, d.clone()));

        let dependencies: Vec<(SourceKind, Dependency)> =
            modules.chain(parent).chain(submodules).collect();
        for (kind, dependency) in dependencies {
            let requirement = Requirement::of(&dependency, semantic_versioning);
            let present = candidates(headers, kind, &dependency.name, |i| active[i]);
            if select(&requirement, &present).is_some() {
                continue;
            }
            let available = candidates(headers, kind, &dependency.name, |i| !active[i]);
            if let Some(pick) = select(&requirement, &available) {
                tracing::debug!(
                    source = %header.name,
                    dependency = %dependency.name,
                    requirement = %requirement,
                    picked = pick,
                    "library source pulled in"
                );
                active[pick] = true;
                queue.push_back(pick);
            }
        }
    }
    active
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
