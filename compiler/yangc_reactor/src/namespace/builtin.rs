//! Namespaces populated by the core statements.

use super::{NamespaceDef, NamespaceId};
use crate::Phase;

/// `Versioned(module name, revision)` → `Source`.
pub const MODULE: NamespaceId = NamespaceId::new("module");
/// `Versioned(submodule name, revision)` → `Source`.
pub const SUBMODULE: NamespaceId = NamespaceId::new("submodule");
/// `Versioned(namespace URI, revision)` → `Source`.
pub const MODULE_NAMESPACE: NamespaceId = NamespaceId::new("module-namespace");
/// `Versioned(module name, revision)` → `Module` handle.
pub const MODULE_QNAME: NamespaceId = NamespaceId::new("module-qname");
/// `Versioned(module name, revision)` → `Version` from `openconfig-version`.
pub const MODULE_SEMVER: NamespaceId = NamespaceId::new("module-semver");
/// `Versioned(submodule name, revision)` → `Text` name of the parent module.
pub const BELONGS_TO: NamespaceId = NamespaceId::new("belongs-to");

/// Source-local: `Text(prefix)` → `Module`.
pub const PREFIX: NamespaceId = NamespaceId::new("prefix-to-module");
/// Source-local: `Text(submodule name)` → `Source`.
pub const INCLUDED_SUBMODULE: NamespaceId = NamespaceId::new("included-submodule");

/// `QName` (top level) or `Scoped` (nested) → `Stmt`.
pub const GROUPING: NamespaceId = NamespaceId::new("grouping");
/// `QName` (top level) or `Scoped` (nested) → `Stmt`.
pub const TYPEDEF: NamespaceId = NamespaceId::new("typedef");
/// `QName` → `Stmt`.
pub const IDENTITY: NamespaceId = NamespaceId::new("identity");
/// `QName` → `Stmt`.
pub const FEATURE: NamespaceId = NamespaceId::new("feature");
/// `QName` → `Stmt`.
pub const EXTENSION: NamespaceId = NamespaceId::new("extension");

/// `Node(typedef)` → `Name` of the built-in type the typedef derives from.
pub const RESOLVED_TYPEDEF: NamespaceId = NamespaceId::new("resolved-typedef");
/// `Refine { .. }` → `Stmt` of the refining property.
pub const REFINE: NamespaceId = NamespaceId::new("refine");

/// Declarations of every namespace above.
pub fn definitions() -> [NamespaceDef; 15] {
    [
        NamespaceDef::global(MODULE, Phase::SourcePreLinkage),
        NamespaceDef::global(SUBMODULE, Phase::SourcePreLinkage),
        NamespaceDef::global(MODULE_NAMESPACE, Phase::SourcePreLinkage),
        NamespaceDef::global(MODULE_QNAME, Phase::SourcePreLinkage),
        NamespaceDef::global(MODULE_SEMVER, Phase::SourcePreLinkage),
        NamespaceDef::global(BELONGS_TO, Phase::SourcePreLinkage),
        NamespaceDef::source_local(PREFIX, Phase::SourceLinkage),
        NamespaceDef::source_local(INCLUDED_SUBMODULE, Phase::SourceLinkage),
        NamespaceDef::global(GROUPING, Phase::StatementDefinition),
        NamespaceDef::global(TYPEDEF, Phase::StatementDefinition),
        NamespaceDef::global(IDENTITY, Phase::StatementDefinition),
        NamespaceDef::global(FEATURE, Phase::StatementDefinition),
        NamespaceDef::global(EXTENSION, Phase::StatementDefinition),
        NamespaceDef::global(RESOLVED_TYPEDEF, Phase::FullDeclaration),
        NamespaceDef::global(REFINE, Phase::FullDeclaration).last_wins(),
    ]
}
