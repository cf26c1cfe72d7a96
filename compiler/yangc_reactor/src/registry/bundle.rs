//! Phase-partitioned support bundles.
//!
//! Each phase owns one bundle. A bundle is derived from the bundle of the
//! previous phase, so a keyword registered early stays resolvable in every
//! later phase. Re-registering a keyword somewhere along that chain requires
//! an explicit override.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use yangc_ir::{QName, QNameInterner, YangVersion};

use super::StatementSupport;
use crate::namespace::{NamespaceDef, NamespaceId};
use crate::Phase;

/// Errors assembling a bundle.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BundleError {
    #[error("statement `{keyword}` is already registered{} (phase {phase})", version_suffix(.version))]
    DuplicateSupport {
        keyword: String,
        phase: Phase,
        version: Option<YangVersion>,
    },
    #[error("namespace `{namespace}` is already registered")]
    DuplicateNamespace { namespace: NamespaceId },
    #[error("namespace `{namespace}` becomes available in phase {declared} but is registered in phase {phase}")]
    NamespacePhase {
        namespace: NamespaceId,
        declared: Phase,
        phase: Phase,
    },
}

fn version_suffix(version: &Option<YangVersion>) -> String {
    match version {
        Some(v) => format!(" for yang-version {v}"),
        None => String::new(),
    }
}

/// Supports of one keyword within one bundle.
#[derive(Clone, Debug, Default)]
struct VersionedSupports {
    common: Option<Arc<StatementSupport>>,
    versions: SmallVec<[(YangVersion, Arc<StatementSupport>); 2]>,
}

impl VersionedSupports {
    fn get(&self, version: YangVersion) -> Option<&Arc<StatementSupport>> {
        self.versions
            .iter()
            .find(|(v, _)| *v == version)
            .map(|(_, s)| s)
            .or(self.common.as_ref())
    }

    fn has_version(&self, version: Option<YangVersion>) -> bool {
        match version {
            None => self.common.is_some(),
            Some(v) => self.versions.iter().any(|(sv, _)| *sv == v),
        }
    }
}

/// Immutable catalogue of the supports visible in one phase.
#[derive(Debug)]
pub struct StatementSupportBundle {
    phase: Phase,
    parent: Option<Arc<StatementSupportBundle>>,
    supports: FxHashMap<QName, VersionedSupports>,
    namespaces: Vec<NamespaceDef>,
}

impl StatementSupportBundle {
    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn parent(&self) -> Option<&Arc<StatementSupportBundle>> {
        self.parent.as_ref()
    }

    /// Support for `keyword` in sources of `version`.
    ///
    /// A version-specific support wins over a version-agnostic one in the
    /// same bundle; a later bundle wins over its ancestors.
    pub fn lookup(&self, keyword: QName, version: YangVersion) -> Option<&Arc<StatementSupport>> {
        let mut bundle = Some(self);
        while let Some(current) = bundle {
            if let Some(found) = current.supports.get(&keyword).and_then(|s| s.get(version)) {
                return Some(found);
            }
            bundle = current.parent.as_deref();
        }
        None
    }

    fn contains(&self, keyword: QName, version: Option<YangVersion>) -> bool {
        let mut bundle = Some(self);
        while let Some(current) = bundle {
            if current
                .supports
                .get(&keyword)
                .is_some_and(|s| s.has_version(version))
            {
                return true;
            }
            bundle = current.parent.as_deref();
        }
        false
    }

    /// Namespaces declared in this bundle and its ancestors, oldest first.
    pub fn namespaces(&self) -> Vec<NamespaceDef> {
        let mut chain = Vec::new();
        let mut bundle = Some(self);
        while let Some(current) = bundle {
            chain.push(current);
            bundle = current.parent.as_deref();
        }
        chain
            .into_iter()
            .rev()
            .flat_map(|b| b.namespaces.iter().copied())
            .collect()
    }

    /// Every keyword registered in this bundle alone.
    pub fn local_keywords(&self) -> impl Iterator<Item = QName> + '_ {
        self.supports.keys().copied()
    }
}

/// Assembles one bundle on top of an optional parent.
pub struct BundleBuilder<'i> {
    interner: &'i QNameInterner,
    phase: Phase,
    parent: Option<Arc<StatementSupportBundle>>,
    supports: FxHashMap<QName, VersionedSupports>,
    namespaces: Vec<NamespaceDef>,
}

impl<'i> BundleBuilder<'i> {
    pub fn new(
        interner: &'i QNameInterner,
        phase: Phase,
        parent: Option<Arc<StatementSupportBundle>>,
    ) -> Self {
        BundleBuilder {
            interner,
            phase,
            parent,
            supports: FxHashMap::default(),
            namespaces: Vec::new(),
        }
    }

    fn duplicate(&self, keyword: QName, version: Option<YangVersion>) -> BundleError {
        BundleError::DuplicateSupport {
            keyword: self.interner.display(keyword),
            phase: self.phase,
            version,
        }
    }

    fn is_registered(&self, keyword: QName, version: Option<YangVersion>) -> bool {
        self.supports
            .get(&keyword)
            .is_some_and(|s| s.has_version(version))
            || self
                .parent
                .as_ref()
                .is_some_and(|p| p.contains(keyword, version))
    }

    /// Register a version-agnostic support.
    pub fn add_support(&mut self, support: StatementSupport) -> Result<(), BundleError> {
        let keyword = support.keyword();
        if self.is_registered(keyword, None) {
            return Err(self.duplicate(keyword, None));
        }
        self.supports.entry(keyword).or_default().common = Some(Arc::new(support));
        Ok(())
    }

    /// Register a support used only by sources of `version`.
    pub fn add_versioned_support(
        &mut self,
        version: YangVersion,
        support: StatementSupport,
    ) -> Result<(), BundleError> {
        let keyword = support.keyword();
        if self.is_registered(keyword, Some(version)) {
            return Err(self.duplicate(keyword, Some(version)));
        }
        self.supports
            .entry(keyword)
            .or_default()
            .versions
            .push((version, Arc::new(support)));
        Ok(())
    }

    /// Replace the version-agnostic support of a keyword, whether or not an
    /// earlier bundle registered one. Version-specific supports registered
    /// in this bundle are dropped so the override applies to every source.
    pub fn override_support(&mut self, support: StatementSupport) {
        let keyword = support.keyword();
        tracing::debug!(
            keyword = %self.interner.display(keyword),
            phase = %self.phase,
            "overriding statement support"
        );
        self.supports.insert(
            keyword,
            VersionedSupports {
                common: Some(Arc::new(support)),
                versions: SmallVec::new(),
            },
        );
    }

    pub fn add_namespace(&mut self, def: NamespaceDef) -> Result<(), BundleError> {
        if def.phase > self.phase {
            return Err(BundleError::NamespacePhase {
                namespace: def.id,
                declared: def.phase,
                phase: self.phase,
            });
        }
        let known = self.namespaces.iter().any(|d| d.id == def.id)
            || self
                .parent
                .as_ref()
                .is_some_and(|p| p.namespaces().iter().any(|d| d.id == def.id));
        if known {
            return Err(BundleError::DuplicateNamespace { namespace: def.id });
        }
        self.namespaces.push(def);
        Ok(())
    }

    pub fn build(self) -> StatementSupportBundle {
        StatementSupportBundle {
            phase: self.phase,
            parent: self.parent,
            supports: self.supports,
            namespaces: self.namespaces,
        }
    }
}
