//! Statement supports: everything the reactor knows about one keyword.

use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;
use yangc_ir::QName;

use crate::context::{EffectiveContext, Outcome, StmtContext};
use crate::effective::EffectiveArgument;
use crate::namespace::{builtin, NamespaceId};
use crate::Phase;

/// Grammar production a statement's argument must match.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ArgumentKind {
    /// The statement takes no argument.
    None,
    Identifier,
    NodeIdentifier,
    AbsoluteSchemaNodeId,
    DescendantSchemaNodeId,
    /// Absolute at the top of a module, descendant anywhere else.
    SchemaNodeId,
    RevisionDate,
    YangVersion,
    SemVer,
    Boolean,
    NonNegativeInteger,
    MaxValue,
    IfFeatureExpr,
    Deviate,
    /// Any string.
    Text,
}

/// How many times a substatement may appear.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Cardinality {
    pub min: u32,
    /// `None` means unbounded.
    pub max: Option<u32>,
}

impl Cardinality {
    pub const OPTIONAL: Cardinality = Cardinality {
        min: 0,
        max: Some(1),
    };
    pub const MANDATORY: Cardinality = Cardinality {
        min: 1,
        max: Some(1),
    };
    pub const ANY: Cardinality = Cardinality { min: 0, max: None };
    pub const AT_LEAST_ONE: Cardinality = Cardinality { min: 1, max: None };

    #[inline]
    pub fn admits(self, count: u32) -> bool {
        match self.max {
            Some(max) => (self.min..=max).contains(&count),
            None => count >= self.min,
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) if max == self.min => write!(f, "exactly {max}"),
            Some(max) => write!(f, "{}..{}", self.min, max),
            None => write!(f, "at least {}", self.min),
        }
    }
}

/// One admissible substatement.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct SubstatementRule {
    pub keyword: QName,
    pub cardinality: Cardinality,
}

bitflags! {
    /// Shape of a statement in the effective model.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct SupportFlags: u8 {
        /// Instantiated as a node of the schema tree, named by its argument.
        const SCHEMA_NODE = 1 << 0;
        /// Schema node that accepts children through `augment`.
        const DATA_HOLDER = 1 << 1;
        /// Consumed while building the effective model, never emitted.
        const CONSUMED = 1 << 2;
        /// Substatements are not validated.
        const ANY_SUBSTATEMENTS = 1 << 3;
    }
}

/// Definitions registered in the statement-definition phase.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum DefinitionKind {
    Grouping,
    Typedef,
    Identity,
    Feature,
    Extension,
}

impl DefinitionKind {
    /// Namespace the definition is registered in.
    pub fn namespace(self) -> NamespaceId {
        match self {
            DefinitionKind::Grouping => builtin::GROUPING,
            DefinitionKind::Typedef => builtin::TYPEDEF,
            DefinitionKind::Identity => builtin::IDENTITY,
            DefinitionKind::Feature => builtin::FEATURE,
            DefinitionKind::Extension => builtin::EXTENSION,
        }
    }

    /// Whether a nested definition is visible only below its parent.
    pub fn is_scoped(self) -> bool {
        matches!(self, DefinitionKind::Grouping | DefinitionKind::Typedef)
    }
}

/// Statement behavior supplied by a caller, e.g. for a vendor extension.
pub trait StatementBehavior: Send + Sync + fmt::Debug {
    /// Do the statement's work for `phase`.
    ///
    /// Called once per round while the statement is pending: again in the
    /// next round of the same phase when it returns [`Outcome::Deferred`].
    fn on_phase(&self, phase: Phase, ctx: &mut StmtContext<'_>) -> Outcome;

    /// Effective argument of the statement, given the one the generic
    /// builder derived. `None` leaves the statement and its subtree out of
    /// the effective model.
    ///
    /// Called once per instantiation, so a statement inside a grouping is
    /// seen once for every `uses` of it.
    fn effective(
        &self,
        _ctx: &mut EffectiveContext<'_>,
        argument: EffectiveArgument,
    ) -> Option<EffectiveArgument> {
        Some(argument)
    }
}

/// Work a statement does in the reactor phases.
///
/// Built-in statements are tagged variants dispatched by the scheduler;
/// [`Behavior::Custom`] delegates to a caller-supplied object.
#[derive(Clone, Debug)]
pub enum Behavior {
    Module,
    Submodule,
    Import,
    Include,
    BelongsTo,
    Definition(DefinitionKind),
    Uses,
    Type,
    Base,
    IfFeature,
    Refine,
    Augment,
    Deviation,
    Deviate,
    /// Argument and substatement validation only.
    Plain,
    Custom(Arc<dyn StatementBehavior>),
}

/// Support for one keyword in one language revision.
#[derive(Clone, Debug)]
pub struct StatementSupport {
    keyword: QName,
    argument: ArgumentKind,
    behavior: Behavior,
    flags: SupportFlags,
    substatements: Vec<SubstatementRule>,
}

impl StatementSupport {
    pub fn new(keyword: QName, argument: ArgumentKind, behavior: Behavior) -> Self {
        StatementSupport {
            keyword,
            argument,
            behavior,
            flags: SupportFlags::empty(),
            substatements: Vec::new(),
        }
    }

    /// Support backed by a caller-supplied behavior.
    pub fn custom(
        keyword: QName,
        argument: ArgumentKind,
        behavior: impl StatementBehavior + 'static,
    ) -> Self {
        Self::new(keyword, argument, Behavior::Custom(Arc::new(behavior)))
    }

    #[must_use]
    pub fn with_flags(mut self, flags: SupportFlags) -> Self {
        self.flags |= flags;
        self
    }

    #[must_use]
    pub fn with_substatement(mut self, keyword: QName, cardinality: Cardinality) -> Self {
        self.substatements.push(SubstatementRule {
            keyword,
            cardinality,
        });
        self
    }

    #[must_use]
    pub fn with_substatements(
        mut self,
        rules: impl IntoIterator<Item = (QName, Cardinality)>,
    ) -> Self {
        self.substatements
            .extend(rules.into_iter().map(|(keyword, cardinality)| SubstatementRule {
                keyword,
                cardinality,
            }));
        self
    }

    #[inline]
    pub fn keyword(&self) -> QName {
        self.keyword
    }

    #[inline]
    pub fn argument(&self) -> ArgumentKind {
        self.argument
    }

    #[inline]
    pub fn behavior(&self) -> &Behavior {
        &self.behavior
    }

    #[inline]
    pub fn flags(&self) -> SupportFlags {
        self.flags
    }

    pub fn substatements(&self) -> &[SubstatementRule] {
        &self.substatements
    }

    /// Cardinality of `keyword` as a substatement, if admitted.
    pub fn rule_for(&self, keyword: QName) -> Option<Cardinality> {
        self.substatements
            .iter()
            .find(|r| r.keyword == keyword)
            .map(|r| r.cardinality)
    }
}
