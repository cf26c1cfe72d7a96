//! Declared statement trees.
//!
//! A declared statement is a statement exactly as written in a source:
//! a keyword, an optional raw argument string and ordered substatements.
//! Trees are produced by an external lexer (or built programmatically) and
//! are never mutated by the reactor, which only reads them.

use std::fmt;
use std::sync::Arc;

use crate::{Location, Revision, SourceId, YangVersion};

/// Raw statement keyword, optionally prefixed (`prefix:name`).
///
/// Unprefixed keywords name core-language statements; prefixed keywords
/// name extension statements and are bound to a module once the declaring
/// source's imports are linked.
#[derive(Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Keyword {
    pub prefix: Option<String>,
    pub name: String,
}

impl Keyword {
    /// Split keyword text at the first `:`.
    pub fn parse(text: &str) -> Self {
        match text.split_once(':') {
            Some((prefix, name)) => Keyword {
                prefix: Some(prefix.to_owned()),
                name: name.to_owned(),
            },
            None => Keyword {
                prefix: None,
                name: text.to_owned(),
            },
        }
    }

    /// Check for an unprefixed keyword with the given name.
    #[inline]
    pub fn is(&self, name: &str) -> bool {
        self.prefix.is_none() && self.name == name
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "{}:{}", prefix, self.name),
            None => f.write_str(&self.name),
        }
    }
}

impl fmt::Debug for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keyword({self})")
    }
}

/// One node of a declared statement tree.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeclaredStatement {
    keyword: Keyword,
    argument: Option<String>,
    children: Vec<DeclaredStatement>,
    location: Location,
}

impl DeclaredStatement {
    /// Create a statement with the given keyword text and argument.
    pub fn new(keyword: &str, argument: Option<&str>) -> Self {
        DeclaredStatement {
            keyword: Keyword::parse(keyword),
            argument: argument.map(str::to_owned),
            children: Vec::new(),
            location: Location::UNKNOWN,
        }
    }

    /// Set the source location.
    #[must_use]
    pub fn at(mut self, line: u32, column: u32) -> Self {
        self.location = Location::new(line, column);
        self
    }

    /// Append a substatement.
    #[must_use]
    pub fn with_child(mut self, child: DeclaredStatement) -> Self {
        self.children.push(child);
        self
    }

    /// Append several substatements.
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = DeclaredStatement>) -> Self {
        self.children.extend(children);
        self
    }

    #[inline]
    pub fn keyword(&self) -> &Keyword {
        &self.keyword
    }

    #[inline]
    pub fn argument(&self) -> Option<&str> {
        self.argument.as_deref()
    }

    #[inline]
    pub fn children(&self) -> &[DeclaredStatement] {
        &self.children
    }

    #[inline]
    pub fn location(&self) -> Location {
        self.location
    }

    /// First unprefixed substatement with the given keyword.
    pub fn child(&self, keyword: &str) -> Option<&DeclaredStatement> {
        self.children.iter().find(|c| c.keyword.is(keyword))
    }

    /// Argument of the first unprefixed substatement with the given keyword.
    pub fn child_argument(&self, keyword: &str) -> Option<&str> {
        self.child(keyword).and_then(DeclaredStatement::argument)
    }

    /// All unprefixed substatements with the given keyword.
    pub fn children_named<'a>(
        &'a self,
        keyword: &'a str,
    ) -> impl Iterator<Item = &'a DeclaredStatement> + 'a {
        self.children.iter().filter(move |c| c.keyword.is(keyword))
    }

    /// Number of statements in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(DeclaredStatement::subtree_len)
            .sum::<usize>()
    }
}

/// A declared statement tree tagged with its source identifier and
/// declared language revision.
#[derive(Clone, Debug)]
pub struct DeclaredSource {
    id: SourceId,
    version: YangVersion,
    root: Arc<DeclaredStatement>,
}

impl DeclaredSource {
    /// Tag a tree with an explicit source identifier.
    ///
    /// The language revision is read from the root's `yang-version`
    /// substatement; an absent or unparsable value yields the default
    /// revision (argument errors are reported by the reactor).
    pub fn new(id: SourceId, root: DeclaredStatement) -> Self {
        let version = root
            .child_argument("yang-version")
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();
        DeclaredSource {
            id,
            version,
            root: Arc::new(root),
        }
    }

    /// Tag a tree with an identifier derived from its root statement:
    /// the root argument plus the latest `revision` substatement.
    pub fn from_root(root: DeclaredStatement) -> Self {
        let revision = root
            .children_named("revision")
            .filter_map(|r| r.argument()?.parse::<Revision>().ok())
            .max();
        let id = SourceId {
            name: root.argument().unwrap_or_default().to_owned(),
            revision,
        };
        Self::new(id, root)
    }

    #[inline]
    pub fn id(&self) -> &SourceId {
        &self.id
    }

    #[inline]
    pub fn version(&self) -> YangVersion {
        self.version
    }

    #[inline]
    pub fn root(&self) -> &Arc<DeclaredStatement> {
        &self.root
    }
}
