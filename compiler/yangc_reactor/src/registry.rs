//! Statement support registry.
//!
//! The registry maps `(phase, keyword, language revision)` to a
//! [`StatementSupport`]. It is assembled once through [`RegistryBuilder`],
//! is immutable afterwards and can be shared by any number of concurrent
//! reactor runs.
//!
//! # Assembly
//!
//! Additions are collected per phase and turned into bundles in phase
//! order when [`RegistryBuilder::build`] runs, each bundle deriving from the
//! previous one. Registering a keyword that is already visible in the same
//! phase fails unless it goes through [`RegistryBuilder::override_support`].

mod bundle;
mod catalogue;
mod support;

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashSet;
use yangc_ir::{QName, QNameModule, SharedInterner, YangVersion};

pub use bundle::{BundleBuilder, BundleError, StatementSupportBundle};
pub use catalogue::{
    data_definitions, is_builtin_type, BUILTIN_TYPES, OPENCONFIG_MODULE, OPENCONFIG_NAMESPACE,
    OPENCONFIG_VERSION, SINGLETON_PROPERTIES,
};
pub use support::{
    ArgumentKind, Behavior, Cardinality, DefinitionKind, StatementBehavior, StatementSupport,
    SubstatementRule, SupportFlags,
};

use crate::namespace::{builtin, NamespaceDef};
use crate::Phase;

enum Addition {
    Common(StatementSupport),
    Versioned(YangVersion, StatementSupport),
    Override(StatementSupport),
    Namespace(NamespaceDef),
}

/// Collects supports and namespaces, then assembles the per-phase bundles.
pub struct RegistryBuilder {
    interner: SharedInterner,
    additions: Vec<(Phase, Addition)>,
    ignorable: FxHashSet<QName>,
}

impl RegistryBuilder {
    /// Empty builder: no statements and no namespaces.
    pub fn new(interner: SharedInterner) -> Self {
        RegistryBuilder {
            interner,
            additions: Vec::new(),
            ignorable: FxHashSet::default(),
        }
    }

    /// Builder preloaded with the core statements and namespaces.
    pub fn with_core_statements(interner: SharedInterner) -> Self {
        let mut builder = Self::new(interner);
        for def in builtin::definitions() {
            builder.add_namespace(def);
        }
        catalogue::register_core(&mut builder);
        builder
    }

    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    pub fn add_support(&mut self, phase: Phase, support: StatementSupport) -> &mut Self {
        self.additions.push((phase, Addition::Common(support)));
        self
    }

    pub fn add_versioned_support(
        &mut self,
        phase: Phase,
        version: YangVersion,
        support: StatementSupport,
    ) -> &mut Self {
        self.additions
            .push((phase, Addition::Versioned(version, support)));
        self
    }

    pub fn override_support(&mut self, phase: Phase, support: StatementSupport) -> &mut Self {
        self.additions.push((phase, Addition::Override(support)));
        self
    }

    /// Declare a namespace. It is added to the bundle of the phase from
    /// which it may be populated.
    pub fn add_namespace(&mut self, def: NamespaceDef) -> &mut Self {
        self.additions.push((def.phase, Addition::Namespace(def)));
        self
    }

    /// Accept statements with this keyword without a support. They are left
    /// out of the effective model together with their substatements.
    pub fn ignore(&mut self, keyword: QName) -> &mut Self {
        self.ignorable.insert(keyword);
        self
    }

    pub fn build(self) -> Result<StatementRegistry, BundleError> {
        let mut bundles: Vec<Arc<StatementSupportBundle>> = Vec::with_capacity(Phase::ALL.len());
        let mut additions = self.additions;
        for phase in Phase::ALL {
            let parent = bundles.last().cloned();
            let mut bundle = BundleBuilder::new(&self.interner, phase, parent);
            let (current, later): (Vec<_>, Vec<_>) =
                additions.into_iter().partition(|(p, _)| *p == phase);
            additions = later;
            for (_, addition) in current {
                match addition {
                    Addition::Common(support) => bundle.add_support(support)?,
                    Addition::Versioned(version, support) => {
                        bundle.add_versioned_support(version, support)?;
                    }
                    Addition::Override(support) => bundle.override_support(support),
                    Addition::Namespace(def) => bundle.add_namespace(def)?,
                }
            }
            bundles.push(Arc::new(bundle.build()));
        }
        tracing::debug!(
            ignorable = self.ignorable.len(),
            "statement registry assembled"
        );
        Ok(StatementRegistry {
            interner: self.interner,
            bundles,
            ignorable: self.ignorable,
        })
    }
}

/// Immutable catalogue of statement supports, one bundle per phase.
pub struct StatementRegistry {
    interner: SharedInterner,
    bundles: Vec<Arc<StatementSupportBundle>>,
    ignorable: FxHashSet<QName>,
}

impl fmt::Debug for StatementRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatementRegistry")
            .field("bundles", &self.bundles.len())
            .field("ignorable", &self.ignorable.len())
            .finish_non_exhaustive()
    }
}

impl StatementRegistry {
    /// Registry with only the core statements.
    pub fn core(interner: SharedInterner) -> Result<Self, BundleError> {
        RegistryBuilder::with_core_statements(interner).build()
    }

    #[inline]
    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    pub fn bundle(&self, phase: Phase) -> &Arc<StatementSupportBundle> {
        &self.bundles[phase.index()]
    }

    /// Support for `keyword` as declared in a source of `version`.
    pub fn lookup(
        &self,
        phase: Phase,
        keyword: QName,
        version: YangVersion,
    ) -> Option<&Arc<StatementSupport>> {
        self.bundle(phase).lookup(keyword, version)
    }

    /// Like [`lookup`](Self::lookup), but a keyword whose module carries a
    /// revision also matches a support registered without one.
    pub fn lookup_extension(
        &self,
        phase: Phase,
        keyword: QName,
        version: YangVersion,
    ) -> Option<&Arc<StatementSupport>> {
        if let Some(found) = self.lookup(phase, keyword, version) {
            return Some(found);
        }
        let module = self.interner.module_of(keyword);
        let data = self.interner.module_data(module);
        data.revision?;
        let unversioned = self.interner.module(QNameModule {
            namespace: data.namespace,
            revision: None,
        });
        self.lookup(phase, self.interner.rebind(keyword, unversioned), version)
    }

    pub fn is_ignorable(&self, keyword: QName) -> bool {
        self.ignorable.contains(&keyword)
    }

    /// Every namespace any statement may populate.
    pub fn namespaces(&self) -> Vec<NamespaceDef> {
        self.bundle(Phase::EffectiveModel).namespaces()
    }
}
