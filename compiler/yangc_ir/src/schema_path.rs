//! Schema-node identifiers (`/a:b/c`, `b/c`).

use std::fmt::Write;

use smallvec::SmallVec;

use crate::{ModuleNs, QName, QNameInterner};

/// A parsed and bound schema-node identifier.
///
/// Absolute identifiers start at a module's top-level nodes; descendant
/// identifiers are relative to the statement that carries them.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SchemaNodeId {
    absolute: bool,
    steps: SmallVec<[QName; 4]>,
}

impl SchemaNodeId {
    pub fn absolute(steps: impl IntoIterator<Item = QName>) -> Self {
        SchemaNodeId {
            absolute: true,
            steps: steps.into_iter().collect(),
        }
    }

    pub fn descendant(steps: impl IntoIterator<Item = QName>) -> Self {
        SchemaNodeId {
            absolute: false,
            steps: steps.into_iter().collect(),
        }
    }

    #[inline]
    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    #[inline]
    pub fn steps(&self) -> &[QName] {
        &self.steps
    }

    /// Last step, naming the target node itself.
    #[inline]
    pub fn last(&self) -> Option<QName> {
        self.steps.last().copied()
    }

    /// Render back to text, asking `prefix_of` for the prefix of each step's
    /// module. Steps whose module has no prefix are written unprefixed.
    pub fn render(
        &self,
        interner: &QNameInterner,
        mut prefix_of: impl FnMut(ModuleNs) -> Option<String>,
    ) -> String {
        let mut out = String::new();
        for (i, step) in self.steps.iter().enumerate() {
            if self.absolute || i > 0 {
                out.push('/');
            }
            let (module, local) = interner.parts(*step);
            if let Some(prefix) = prefix_of(module) {
                let _ = write!(out, "{prefix}:");
            }
            out.push_str(interner.lookup(local));
        }
        out
    }

    /// Render using `{namespace}local` steps, independent of any prefixes.
    pub fn display(&self, interner: &QNameInterner) -> String {
        let mut out = String::new();
        for (i, step) in self.steps.iter().enumerate() {
            if self.absolute || i > 0 {
                out.push('/');
            }
            out.push_str(&interner.display(*step));
        }
        out
    }
}
