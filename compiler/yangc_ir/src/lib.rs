//! yangc IR - core data model of the schema compiler
//!
//! This crate contains the data structures shared by every layer:
//! - Names for interned identifiers
//! - Qualified names (`QName`) and module namespaces (`ModuleNs`)
//! - Revisions, language versions and source identifiers
//! - Declared statement trees as produced by the lexer
//! - Schema-node identifiers
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: strings → `Name(u32)`, `(module, name)` → `QName(u32)`
//! - **Identity Equality**: interned handles compare by index, never by text
//! - **Read-only Input**: declared trees are immutable once built

mod interner;
mod location;
mod name;
mod qname;
mod revision;
mod schema_path;
mod source;
mod stmt;
mod version;

pub use interner::{InternError, StringInterner};
pub use location::Location;
pub use name::Name;
pub use qname::{ModuleNs, QName, QNameInterner, QNameModule, SharedInterner};
pub use revision::{Revision, RevisionError};
pub use schema_path::SchemaNodeId;
pub use source::SourceId;
pub use stmt::{DeclaredSource, DeclaredStatement, Keyword};
pub use version::{UnknownVersion, YangVersion};
