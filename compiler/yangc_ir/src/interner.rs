//! Sharded string interner for identifiers, prefixes and namespace URIs.
//!
//! Sources of one reactor run are processed on a worker pool, so every
//! argument parser may intern concurrently. Each shard sits behind its own
//! `RwLock`; lookups of already-known text only take a read lock.

use std::fmt;
use std::hash::{Hash, Hasher};

use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHasher};

use crate::Name;

/// Keywords of the core statement catalogue. Interning them up front keeps
/// their handles stable and small regardless of source order.
const CORE_KEYWORDS: &[&str] = &[
    "module",
    "submodule",
    "yang-version",
    "namespace",
    "prefix",
    "import",
    "include",
    "belongs-to",
    "revision",
    "revision-date",
    "grouping",
    "uses",
    "refine",
    "augment",
    "deviation",
    "deviate",
    "typedef",
    "type",
    "container",
    "leaf",
    "leaf-list",
    "list",
    "choice",
    "case",
    "identity",
    "base",
    "feature",
    "if-feature",
    "extension",
    "argument",
    "description",
    "reference",
    "config",
    "mandatory",
    "default",
];

/// A shard ran out of slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternError {
    pub shard: usize,
}

impl fmt::Display for InternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "string interner shard {} is full ({} entries)",
            self.shard,
            u64::from(Name::MAX_SLOT) + 1
        )
    }
}

impl std::error::Error for InternError {}

#[derive(Default)]
struct Shard {
    slots: FxHashMap<&'static str, usize>,
    texts: Vec<&'static str>,
}

impl Shard {
    fn insert(&mut self, text: &'static str) -> usize {
        let slot = self.texts.len();
        self.texts.push(text);
        self.slots.insert(text, slot);
        slot
    }
}

/// Concurrent string interner.
///
/// Interned text is leaked and lives for the rest of the process, which
/// lets [`StringInterner::lookup`] hand out `&'static str` without holding
/// a lock.
pub struct StringInterner {
    shards: [RwLock<Shard>; Name::SHARDS],
}

impl StringInterner {
    pub fn new() -> Self {
        let interner = Self {
            shards: std::array::from_fn(|_| RwLock::new(Shard::default())),
        };
        interner.shards[0].write().insert("");
        for keyword in CORE_KEYWORDS {
            interner.intern(keyword);
        }
        interner
    }

    #[inline]
    fn shard_of(text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }
        let mut hasher = FxHasher::default();
        text.hash(&mut hasher);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "only the low bits pick a shard"
        )]
        let hash = hasher.finish() as usize;
        hash % Name::SHARDS
    }

    /// Intern `text`, failing only when its shard is full.
    pub fn try_intern(&self, text: &str) -> Result<Name, InternError> {
        let shard = Self::shard_of(text);
        if let Some(name) = self.find_in(shard, text) {
            return Ok(name);
        }

        let mut guard = self.shards[shard].write();
        // Another worker may have won the race for the write lock.
        if let Some(&slot) = guard.slots.get(text) {
            return Name::from_parts(shard, slot).ok_or(InternError { shard });
        }
        if Name::from_parts(shard, guard.texts.len()).is_none() {
            return Err(InternError { shard });
        }
        let slot = guard.insert(Box::leak(text.to_owned().into_boxed_str()));
        Name::from_parts(shard, slot).ok_or(InternError { shard })
    }

    /// Intern `text`.
    ///
    /// # Panics
    /// Panics when the shard is full; use [`StringInterner::try_intern`] to
    /// handle that case.
    #[inline]
    pub fn intern(&self, text: &str) -> Name {
        self.try_intern(text).unwrap_or_else(|e| panic!("{e}"))
    }

    /// The handle for `text` if it was interned before.
    pub fn get(&self, text: &str) -> Option<Name> {
        self.find_in(Self::shard_of(text), text)
    }

    fn find_in(&self, shard: usize, text: &str) -> Option<Name> {
        let slot = *self.shards[shard].read().slots.get(text)?;
        Name::from_parts(shard, slot)
    }

    pub fn lookup(&self, name: Name) -> &'static str {
        self.shards[name.shard()].read().texts[name.slot()]
    }

    /// Number of interned strings, the empty string included.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|s| s.read().texts.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}
