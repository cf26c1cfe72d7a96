//! Handles for interned text.
//!
//! Every identifier, prefix and namespace URI that reaches the reactor is
//! interned once and then carried around as a 32-bit [`Name`].

use std::fmt;

/// Handle to a string owned by a [`StringInterner`](crate::StringInterner).
///
/// The low [`Name::SHARD_BITS`] bits select the interner shard, the rest
/// is the slot inside that shard. Two names are equal exactly when they
/// were produced by the same interner for the same text.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Name(u32);

impl Name {
    /// The empty string, present in every interner.
    pub const EMPTY: Name = Name(0);

    pub const SHARD_BITS: u32 = 3;
    const SHARD_MASK: u32 = (1 << Self::SHARD_BITS) - 1;

    /// Number of interner shards.
    pub const SHARDS: usize = 1 << Self::SHARD_BITS;

    /// Largest slot index a shard can hand out.
    pub const MAX_SLOT: u32 = u32::MAX >> Self::SHARD_BITS;

    /// Pack a shard and slot, or `None` when the slot does not fit.
    #[inline]
    pub(crate) fn from_parts(shard: usize, slot: usize) -> Option<Self> {
        let shard = u32::try_from(shard).ok().filter(|s| *s <= Self::SHARD_MASK)?;
        let slot = u32::try_from(slot).ok().filter(|s| *s <= Self::MAX_SLOT)?;
        Some(Name((slot << Self::SHARD_BITS) | shard))
    }

    #[inline]
    pub const fn shard(self) -> usize {
        (self.0 & Self::SHARD_MASK) as usize
    }

    #[inline]
    pub const fn slot(self) -> usize {
        (self.0 >> Self::SHARD_BITS) as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({}:{})", self.shard(), self.slot())
    }
}

impl Default for Name {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
