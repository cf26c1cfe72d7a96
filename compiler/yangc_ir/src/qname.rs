//! Interned qualified names.
//!
//! A qualified name is a `(module namespace, local name)` pair. Both the
//! module half (`QNameModule`: namespace URI + optional revision) and the
//! full pair are interned, so equality and hashing of `ModuleNs` and
//! `QName` reduce to comparing a `u32`: two handles are equal iff they are
//! the same interned entry.
//!
//! ```text
//! "urn:example:foo" ──intern──► Name ─┐
//! Option<Revision> ───────────────────┴─► QNameModule ──intern──► ModuleNs ─┐
//! "container-name" ──intern──► Name ─────────────────────────────────────────┴─► QName
//! ```

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::{Name, Revision, StringInterner};

/// Namespace URI + revision identifying the module a name belongs to.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QNameModule {
    pub namespace: Name,
    pub revision: Option<Revision>,
}

/// Interned handle for a [`QNameModule`].
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct ModuleNs(u32);

impl ModuleNs {
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ModuleNs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ModuleNs({})", self.0)
    }
}

/// Interned `(ModuleNs, local name)` pair.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct QName(u32);

impl QName {
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QName({})", self.0)
    }
}

/// Append-only intern table.
struct InternTable<T> {
    map: FxHashMap<T, u32>,
    items: Vec<T>,
}

impl<T: Copy + Eq + Hash> InternTable<T> {
    fn new() -> Self {
        InternTable {
            map: FxHashMap::default(),
            items: Vec::new(),
        }
    }
}

fn intern_in<T: Copy + Eq + Hash>(table: &RwLock<InternTable<T>>, item: T) -> u32 {
    if let Some(&id) = table.read().map.get(&item) {
        return id;
    }
    let mut guard = table.write();
    if let Some(&id) = guard.map.get(&item) {
        return id;
    }
    let id = u32::try_from(guard.items.len())
        .unwrap_or_else(|_| panic!("qualified-name table exceeded u32::MAX entries"));
    guard.items.push(item);
    guard.map.insert(item, id);
    id
}

/// Interner for strings, module namespaces and qualified names.
///
/// # Thread Safety
/// All tables are guarded by `RwLock`s; interning from several sources at
/// once yields the same handles as interning sequentially.
pub struct QNameInterner {
    strings: StringInterner,
    modules: RwLock<InternTable<QNameModule>>,
    qnames: RwLock<InternTable<(ModuleNs, Name)>>,
    yang: ModuleNs,
}

impl QNameInterner {
    /// Namespace URI of the core language statements.
    pub const YANG_NAMESPACE: &'static str = "urn:ietf:params:xml:ns:yang:1";

    pub fn new() -> Self {
        let strings = StringInterner::new();
        let modules = RwLock::new(InternTable::new());
        let yang_ns = strings.intern(Self::YANG_NAMESPACE);
        let yang = ModuleNs(intern_in(
            &modules,
            QNameModule {
                namespace: yang_ns,
                revision: None,
            },
        ));
        QNameInterner {
            strings,
            modules,
            qnames: RwLock::new(InternTable::new()),
            yang,
        }
    }

    /// Module namespace of the core language keywords.
    #[inline]
    pub fn yang_module(&self) -> ModuleNs {
        self.yang
    }

    /// Access the underlying string interner.
    #[inline]
    pub fn strings(&self) -> &StringInterner {
        &self.strings
    }

    /// Intern a plain string.
    #[inline]
    pub fn intern(&self, s: &str) -> Name {
        self.strings.intern(s)
    }

    /// Look up an interned string.
    #[inline]
    pub fn lookup(&self, name: Name) -> &'static str {
        self.strings.lookup(name)
    }

    /// Intern a module namespace.
    pub fn module(&self, module: QNameModule) -> ModuleNs {
        ModuleNs(intern_in(&self.modules, module))
    }

    /// Intern a module namespace given its URI text.
    pub fn module_str(&self, namespace: &str, revision: Option<Revision>) -> ModuleNs {
        let namespace = self.intern(namespace);
        self.module(QNameModule {
            namespace,
            revision,
        })
    }

    /// Resolve a `ModuleNs` handle.
    pub fn module_data(&self, module: ModuleNs) -> QNameModule {
        self.modules.read().items[module.0 as usize]
    }

    /// Intern a qualified name.
    pub fn qname(&self, module: ModuleNs, local: Name) -> QName {
        QName(intern_in(&self.qnames, (module, local)))
    }

    /// Intern a qualified name whose local part is given as text.
    pub fn qname_str(&self, module: ModuleNs, local: &str) -> QName {
        let local = self.intern(local);
        self.qname(module, local)
    }

    /// Intern a core-language keyword.
    pub fn yang_keyword(&self, keyword: &str) -> QName {
        self.qname_str(self.yang, keyword)
    }

    /// Split a qualified name into its parts.
    pub fn parts(&self, qname: QName) -> (ModuleNs, Name) {
        self.qnames.read().items[qname.0 as usize]
    }

    /// Module half of a qualified name.
    #[inline]
    pub fn module_of(&self, qname: QName) -> ModuleNs {
        self.parts(qname).0
    }

    /// Local name of a qualified name.
    pub fn local_name(&self, qname: QName) -> &'static str {
        self.lookup(self.parts(qname).1)
    }

    /// Re-home a qualified name into another module, keeping the local name.
    pub fn rebind(&self, qname: QName, module: ModuleNs) -> QName {
        let (_, local) = self.parts(qname);
        self.qname(module, local)
    }

    /// Render a qualified name as `{namespace}local` for diagnostics.
    pub fn display(&self, qname: QName) -> String {
        let (module, local) = self.parts(qname);
        if module == self.yang {
            return self.lookup(local).to_owned();
        }
        let data = self.module_data(module);
        format!("{{{}}}{}", self.lookup(data.namespace), self.lookup(local))
    }
}

impl Default for QNameInterner {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared interner handed to parsers, registries and reactor runs.
///
/// The registry and every run built from it must use the same interner so
/// handles created while building the registry match handles produced by
/// argument parsing.
#[derive(Clone)]
pub struct SharedInterner(Arc<QNameInterner>);

impl SharedInterner {
    pub fn new() -> Self {
        SharedInterner(Arc::new(QNameInterner::new()))
    }
}

impl Default for SharedInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for SharedInterner {
    type Target = QNameInterner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests;
