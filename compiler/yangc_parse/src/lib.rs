//! Statement argument parsers.
//!
//! Every parser is a pure function of a [`BindingContext`] and the raw
//! argument text. Parsers that produce names intern them through the
//! context's interner, so equal results are the same handle.
//!
//! # Productions
//!
//! - `identifier`, `node-identifier` (see [`parse_identifier`],
//!   [`parse_node_identifier`])
//! - absolute and descendant schema-node identifiers
//! - revision dates, language versions, semantic versions
//! - booleans, element counts, `deviate` operations
//! - `if-feature` expressions

mod binding;
mod error;
mod identifier;
mod if_feature;
mod schema_nodeid;
mod values;

pub use binding::{BindingContext, PrefixBindings};
pub use error::{ArgumentError, Production};
pub use identifier::{
    is_identifier_char, is_identifier_start, parse_identifier, parse_node_identifier,
};
pub use if_feature::{parse_if_feature, IfFeatureExpr};
pub use schema_nodeid::{
    parse_absolute_schema_nodeid, parse_descendant_schema_nodeid, parse_schema_nodeid,
};
pub use values::{
    parse_boolean, parse_deviate, parse_max_value, parse_non_negative_integer,
    parse_revision_date, parse_semver, parse_yang_version, DeviateKind, MaxValue,
};
