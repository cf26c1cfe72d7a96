//! Global processing phases.

use std::fmt;

/// Barrier-separated stages every source passes through, in order.
///
/// No source starts phase N+1 before every source has finished phase N.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    /// Keyword resolution and argument presence checks for header statements.
    Init,
    /// Module/submodule identity: name, revision, namespace, prefix.
    SourcePreLinkage,
    /// Import and include resolution, prefix binding.
    SourceLinkage,
    /// Groupings, typedefs, identities, features and extensions are defined.
    StatementDefinition,
    /// Every statement is resolved: references bound, paths parsed,
    /// substatements validated.
    FullDeclaration,
    /// Uses expansion, augmentation, deviation; effective trees are built.
    EffectiveModel,
}

impl Phase {
    /// All phases in execution order.
    pub const ALL: [Phase; 6] = [
        Phase::Init,
        Phase::SourcePreLinkage,
        Phase::SourceLinkage,
        Phase::StatementDefinition,
        Phase::FullDeclaration,
        Phase::EffectiveModel,
    ];

    /// Phases driven statement-by-statement with deferral. The terminal
    /// phase transforms whole trees instead.
    pub const DECLARATIVE: [Phase; 5] = [
        Phase::Init,
        Phase::SourcePreLinkage,
        Phase::SourceLinkage,
        Phase::StatementDefinition,
        Phase::FullDeclaration,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Phase::Init => "init",
            Phase::SourcePreLinkage => "source-pre-linkage",
            Phase::SourceLinkage => "source-linkage",
            Phase::StatementDefinition => "statement-definition",
            Phase::FullDeclaration => "full-declaration",
            Phase::EffectiveModel => "effective-model",
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Phase preceding this one, if any.
    pub const fn previous(self) -> Option<Phase> {
        match self {
            Phase::Init => None,
            Phase::SourcePreLinkage => Some(Phase::Init),
            Phase::SourceLinkage => Some(Phase::SourcePreLinkage),
            Phase::StatementDefinition => Some(Phase::SourceLinkage),
            Phase::FullDeclaration => Some(Phase::StatementDefinition),
            Phase::EffectiveModel => Some(Phase::FullDeclaration),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
