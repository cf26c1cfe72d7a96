//! Effective model: the result of a successful run.
//!
//! Every module becomes one immutable tree of [`EffectiveStatement`]s with
//! groupings expanded, refinements, augmentations and deviations applied,
//! and the content of included submodules merged in. Statements are shared
//! through `Arc`, so a model is cheap to clone and can be handed across
//! threads.

mod builder;

use std::fmt;
use std::sync::Arc;

use yangc_ir::{
    Location, ModuleNs, QName, Revision, SchemaNodeId, SharedInterner, SourceId, YangVersion,
};
use yangc_parse::{DeviateKind, IfFeatureExpr, MaxValue};

pub(crate) use builder::build;

use crate::namespace::NamespaceStore;

/// A statement argument after parsing and binding.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum EffectiveArgument {
    None,
    /// Free text, or the raw argument of an extension instance.
    Text(String),
    Name(QName),
    Path(SchemaNodeId),
    IfFeature(IfFeatureExpr),
    Boolean(bool),
    Count(u32),
    Max(MaxValue),
    Revision(Revision),
    Version(YangVersion),
    SemVer(semver::Version),
    Deviate(DeviateKind),
    /// A `type` with the built-in type it derives from.
    Type { name: QName, base: QName },
}

impl EffectiveArgument {
    pub fn as_name(&self) -> Option<QName> {
        match self {
            EffectiveArgument::Name(name) | EffectiveArgument::Type { name, .. } => Some(*name),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            EffectiveArgument::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Where an effective statement was declared.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct StatementOrigin {
    pub source: SourceId,
    pub location: Location,
}

impl fmt::Display for StatementOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source, self.location)
    }
}

/// One statement of an effective tree.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct EffectiveStatement {
    pub(crate) keyword: QName,
    pub(crate) keyword_name: &'static str,
    pub(crate) argument: EffectiveArgument,
    pub(crate) name: Option<QName>,
    pub(crate) children: Vec<Arc<EffectiveStatement>>,
    pub(crate) origin: StatementOrigin,
}

impl EffectiveStatement {
    #[inline]
    pub fn keyword(&self) -> QName {
        self.keyword
    }

    /// Local name of the keyword.
    #[inline]
    pub fn keyword_name(&self) -> &'static str {
        self.keyword_name
    }

    /// Check the keyword's local name.
    #[inline]
    pub fn is(&self, keyword: &str) -> bool {
        self.keyword_name == keyword
    }

    #[inline]
    pub fn argument(&self) -> &EffectiveArgument {
        &self.argument
    }

    /// Schema-tree name, bound to the module the node is instantiated in.
    /// `None` for statements that are not schema nodes.
    #[inline]
    pub fn name(&self) -> Option<QName> {
        self.name
    }

    pub fn children(&self) -> &[Arc<EffectiveStatement>] {
        &self.children
    }

    #[inline]
    pub fn origin(&self) -> &StatementOrigin {
        &self.origin
    }

    /// Schema child named `name`.
    pub fn child(&self, name: QName) -> Option<&Arc<EffectiveStatement>> {
        self.children.iter().find(|c| c.name == Some(name))
    }

    /// Children that are schema nodes, in order.
    pub fn schema_children(&self) -> impl Iterator<Item = &Arc<EffectiveStatement>> {
        self.children.iter().filter(|c| c.name.is_some())
    }

    /// Substatements whose keyword has this local name.
    pub fn substatements<'a>(
        &'a self,
        keyword: &'a str,
    ) -> impl Iterator<Item = &'a Arc<EffectiveStatement>> + 'a {
        self.children.iter().filter(move |c| c.is(keyword))
    }

    /// First substatement with this keyword.
    pub fn substatement(&self, keyword: &str) -> Option<&Arc<EffectiveStatement>> {
        self.children.iter().find(|c| c.is(keyword))
    }

    /// Number of statements in this subtree, this one included.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(|c| c.subtree_len()).sum::<usize>()
    }
}

/// A module of the effective model.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct EffectiveModule {
    pub id: SourceId,
    pub name: String,
    pub revision: Option<Revision>,
    pub namespace: String,
    pub prefix: String,
    pub ns: ModuleNs,
    pub semver: Option<semver::Version>,
    /// Submodules merged into this module, transitively.
    pub submodules: Vec<SourceId>,
    /// Modules selected for this module's imports, including those of its
    /// submodules.
    pub imports: Vec<SourceId>,
    pub root: Arc<EffectiveStatement>,
}

/// An identity with its resolved bases.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Identity {
    pub name: QName,
    pub bases: Vec<QName>,
    pub origin: StatementOrigin,
}

/// Feature declared by some module.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Feature {
    pub name: QName,
    /// Whether the run's feature set supports it. Always `true` when the
    /// run did not restrict features.
    pub supported: bool,
    pub origin: StatementOrigin,
}

/// Immutable, thread-safe result of a successful run.
#[derive(Clone)]
pub struct EffectiveModel {
    pub(crate) interner: SharedInterner,
    pub(crate) modules: Vec<EffectiveModule>,
    pub(crate) identities: Vec<Identity>,
    pub(crate) features: Vec<Feature>,
    pub(crate) namespaces: NamespaceStore,
}

impl fmt::Debug for EffectiveModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectiveModel")
            .field("modules", &self.modules)
            .field("identities", &self.identities)
            .field("features", &self.features)
            .finish_non_exhaustive()
    }
}

/// Models compare by content; the interner is not part of it.
impl PartialEq for EffectiveModel {
    fn eq(&self, other: &Self) -> bool {
        self.modules == other.modules
            && self.identities == other.identities
            && self.features == other.features
            && self.namespaces == other.namespaces
    }
}

impl Eq for EffectiveModel {}

impl EffectiveModel {
    #[inline]
    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    /// Modules in source registration order.
    pub fn modules(&self) -> &[EffectiveModule] {
        &self.modules
    }

    /// Latest revision of the module called `name`.
    pub fn module(&self, name: &str) -> Option<&EffectiveModule> {
        self.modules
            .iter()
            .filter(|m| m.name == name)
            .fold(None, |best: Option<&EffectiveModule>, m| match best {
                Some(b) if b.revision >= m.revision => Some(b),
                _ => Some(m),
            })
    }

    pub fn module_revision(&self, name: &str, revision: Option<Revision>) -> Option<&EffectiveModule> {
        self.modules
            .iter()
            .find(|m| m.name == name && m.revision == revision)
    }

    /// Latest revision of the module with this namespace URI.
    pub fn module_by_namespace(&self, namespace: &str) -> Option<&EffectiveModule> {
        self.modules
            .iter()
            .filter(|m| m.namespace == namespace)
            .fold(None, |best: Option<&EffectiveModule>, m| match best {
                Some(b) if b.revision >= m.revision => Some(b),
                _ => Some(m),
            })
    }

    /// Schema node at an absolute path. The first step selects the module.
    pub fn find(&self, path: &SchemaNodeId) -> Option<&Arc<EffectiveStatement>> {
        let (first, rest) = path.steps().split_first()?;
        let module = self.interner.module_of(*first);
        let module = self.modules.iter().find(|m| m.ns == module)?;
        let mut node = module.root.child(*first)?;
        for step in rest {
            node = node.child(*step)?;
        }
        Some(node)
    }

    /// Every identity, ordered by namespace then name.
    pub fn identities(&self) -> &[Identity] {
        &self.identities
    }

    pub fn identity(&self, name: QName) -> Option<&Identity> {
        self.identities.iter().find(|i| i.name == name)
    }

    /// Identities deriving from `base`, directly or transitively.
    pub fn derived_identities(&self, base: QName) -> Vec<QName> {
        let mut found: Vec<QName> = Vec::new();
        let mut frontier = vec![base];
        while let Some(current) = frontier.pop() {
            for identity in &self.identities {
                if identity.bases.contains(&current) && !found.contains(&identity.name) {
                    found.push(identity.name);
                    frontier.push(identity.name);
                }
            }
        }
        found
    }

    /// Every feature, ordered by namespace then name.
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Namespace tables as left by the run, including any populated by
    /// custom statement behaviors.
    pub fn namespaces(&self) -> &NamespaceStore {
        &self.namespaces
    }
}
