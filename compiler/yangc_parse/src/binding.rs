//! Prefix binding contexts.

use rustc_hash::FxHashMap;
use yangc_ir::{ModuleNs, QNameInterner, SharedInterner};

/// What an argument parser needs to bind names: the interner, the module
/// unprefixed names belong to, and the source's prefix table.
pub trait BindingContext {
    fn interner(&self) -> &QNameInterner;

    /// Module of unprefixed names.
    fn current_module(&self) -> ModuleNs;

    /// Module bound to `prefix`, or `None` if the source declares no such prefix.
    fn resolve_prefix(&self, prefix: &str) -> Option<ModuleNs>;
}

/// Owned prefix table for one source.
///
/// Built by the linker once a source's own prefix and its imports are
/// known; immutable afterwards, so it can be shared across worker threads.
#[derive(Clone)]
pub struct PrefixBindings {
    interner: SharedInterner,
    current: ModuleNs,
    prefixes: FxHashMap<String, ModuleNs>,
}

impl PrefixBindings {
    pub fn new(interner: SharedInterner, current: ModuleNs) -> Self {
        PrefixBindings {
            interner,
            current,
            prefixes: FxHashMap::default(),
        }
    }

    /// Bind `prefix`, returning the module it was previously bound to.
    pub fn bind(&mut self, prefix: impl Into<String>, module: ModuleNs) -> Option<ModuleNs> {
        self.prefixes.insert(prefix.into(), module)
    }

    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>, module: ModuleNs) -> Self {
        self.bind(prefix, module);
        self
    }

    /// First prefix bound to `module`, in lexical order.
    pub fn prefix_of(&self, module: ModuleNs) -> Option<&str> {
        self.prefixes
            .iter()
            .filter(|(_, m)| **m == module)
            .map(|(p, _)| p.as_str())
            .min()
    }
}

impl BindingContext for PrefixBindings {
    fn interner(&self) -> &QNameInterner {
        &self.interner
    }

    fn current_module(&self) -> ModuleNs {
        self.current
    }

    fn resolve_prefix(&self, prefix: &str) -> Option<ModuleNs> {
        self.prefixes.get(prefix).copied()
    }
}
