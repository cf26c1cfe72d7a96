//! Reactor run configuration.

use std::collections::BTreeSet;

use yangc_diagnostic::DiagnosticConfig;

/// Features considered supported when evaluating `if-feature`.
///
/// Features are named by their module's namespace URI and local name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeatureSet {
    features: BTreeSet<(String, String)>,
}

impl FeatureSet {
    /// Empty set: every feature is unsupported.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, namespace: impl Into<String>, name: impl Into<String>) -> bool {
        self.features.insert((namespace.into(), name.into()))
    }

    #[must_use]
    pub fn with(mut self, namespace: impl Into<String>, name: impl Into<String>) -> Self {
        self.insert(namespace, name);
        self
    }

    pub fn contains(&self, namespace: &str, name: &str) -> bool {
        self.features
            .iter()
            .any(|(ns, n)| ns == namespace && n == name)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Configuration for a reactor run.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReactorConfig {
    /// Process the sources of a phase round on the rayon pool.
    pub parallel: bool,
    /// Negotiate imports carrying `openconfig-version` by semantic version.
    pub semantic_versioning: bool,
    /// When set, statements whose `if-feature` is false are left out of the
    /// effective model. `None` keeps every statement.
    pub supported_features: Option<FeatureSet>,
    /// Limits and filtering for collected diagnostics.
    pub diagnostics: DiagnosticConfig,
}

impl Default for ReactorConfig {
    fn default() -> Self {
        ReactorConfig {
            parallel: true,
            semantic_versioning: false,
            supported_features: None,
            diagnostics: DiagnosticConfig::default(),
        }
    }
}

impl ReactorConfig {
    /// Single-threaded configuration, for tests and debugging.
    pub fn sequential() -> Self {
        ReactorConfig {
            parallel: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    #[must_use]
    pub fn with_semantic_versioning(mut self, enabled: bool) -> Self {
        self.semantic_versioning = enabled;
        self
    }

    #[must_use]
    pub fn with_supported_features(mut self, features: FeatureSet) -> Self {
        self.supported_features = Some(features);
        self
    }

    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: DiagnosticConfig) -> Self {
        self.diagnostics = diagnostics;
        self
    }
}

#[cfg(test)]
mod tests;
