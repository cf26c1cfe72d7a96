//! yangc reactor - builds effective schema models from declared sources
//!
//! A run takes any number of declared module and submodule trees and
//! drives them through a fixed sequence of phases:
//!
//! - `init`: keywords are matched against the registry, header arguments
//!   are checked
//! - `source-pre-linkage`: module identities are published
//! - `source-linkage`: imports and includes select their targets, prefixes
//!   are bound
//! - `statement-definition`: groupings, typedefs, identities, features and
//!   extensions are defined
//! - `full-declaration`: every statement is bound and validated
//! - `effective-model`: uses, augments and deviations are applied and the
//!   immutable model is assembled
//!
//! Statements communicate only through typed namespace tables. A statement
//! that needs an entry nobody has written yet is retried in the next round
//! of the same phase; the phase fails once a round makes no progress.
//!
//! # Design Philosophy
//!
//! - **Barrier per phase**: no source enters phase N+1 before all finished N
//! - **Snapshot reads**: writes of a round are visible from the next round
//! - **Deterministic output**: parallel and sequential runs agree exactly
//!
//! # Example
//!
//! ```text
//! let registry = Arc::new(StatementRegistry::core(SharedInterner::new())?);
//! let reactor = CrossSourceReactor::new(registry);
//! let mut build = reactor.new_build();
//! build.add_source(module_a).add_library_source(module_b);
//! let model = build.build()?;
//! ```

mod config;
mod context;
mod effective;
mod error;
pub mod linker;
pub mod namespace;
mod phase;
mod reactor;
pub mod registry;
mod tracing_setup;

pub use config::{FeatureSet, ReactorConfig};
pub use context::{EffectiveContext, Outcome, StmtContext};
pub use effective::{
    EffectiveArgument, EffectiveModel, EffectiveModule, EffectiveStatement, Feature, Identity,
    StatementOrigin,
};
pub use error::ReactorFailure;
pub use phase::Phase;
pub use reactor::{BuildAction, CrossSourceReactor};
pub use tracing_setup::init_tracing;
