//! Shared helpers for reactor integration tests.
//!
//! Declared trees are assembled directly; the lexer is not involved.

#![allow(dead_code, reason = "not every test binary uses every helper")]

use std::sync::Arc;

use yangc_ir::{DeclaredSource, DeclaredStatement, SchemaNodeId, SharedInterner};
use yangc_reactor::registry::StatementRegistry;
use yangc_reactor::{
    CrossSourceReactor, EffectiveModel, EffectiveStatement, ReactorConfig, ReactorFailure,
};

pub fn stmt(keyword: &str, argument: &str) -> DeclaredStatement {
    DeclaredStatement::new(keyword, Some(argument))
}

/// Module `name` with namespace `urn:{name}` and prefix `name`.
pub fn module(name: &str, body: impl IntoIterator<Item = DeclaredStatement>) -> DeclaredSource {
    DeclaredSource::from_root(module_stmt(name, body))
}

pub fn module_stmt(name: &str, body: impl IntoIterator<Item = DeclaredStatement>) -> DeclaredStatement {
    stmt("module", name)
        .with_child(stmt("namespace", &format!("urn:{name}")))
        .with_child(stmt("prefix", name))
        .with_children(body)
}

pub fn submodule(
    name: &str,
    parent: &str,
    body: impl IntoIterator<Item = DeclaredStatement>,
) -> DeclaredSource {
    let root = stmt("submodule", name)
        .with_child(stmt("belongs-to", parent).with_child(stmt("prefix", parent)))
        .with_children(body);
    DeclaredSource::from_root(root)
}

pub fn import(name: &str) -> DeclaredStatement {
    stmt("import", name).with_child(stmt("prefix", name))
}

pub fn leaf(name: &str) -> DeclaredStatement {
    stmt("leaf", name).with_child(stmt("type", "string"))
}

pub fn reactor(config: ReactorConfig) -> CrossSourceReactor {
    let registry = StatementRegistry::core(SharedInterner::new()).unwrap();
    CrossSourceReactor::new(Arc::new(registry)).with_config(config)
}

pub fn run(
    reactor: &CrossSourceReactor,
    sources: impl IntoIterator<Item = DeclaredSource>,
) -> Result<EffectiveModel, ReactorFailure> {
    yangc_reactor::init_tracing();
    let mut action = reactor.new_build();
    action.add_sources(sources);
    action.build()
}

/// Schema node of `module` at `steps`, every step named in `module`.
pub fn find<'m>(
    model: &'m EffectiveModel,
    module: &str,
    steps: &[&str],
) -> Option<&'m Arc<EffectiveStatement>> {
    let ns = model.module(module)?.ns;
    let path = SchemaNodeId::absolute(steps.iter().map(|s| model.interner().qname_str(ns, s)));
    model.find(&path)
}
