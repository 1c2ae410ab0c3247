// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! ParticipantSet type for representing sets of participants as bitsets.
//!
//! A ParticipantSet is a compact representation of a set of participants using
//! a bitset, where bit i represents the presence of participant i.
//!
//! # Examples
//!
//! ```
//! use santa_search::model::{ParticipantId, ParticipantSet};
//!
//! let mut set = ParticipantSet::empty();
//! set.insert(ParticipantId::new(0));
//! set.insert(ParticipantId::new(3));
//!
//! assert_eq!(set.len(), 2);
//! assert_eq!(format!("{}", set), "{0,3}");
//!
//! let ids: Vec<usize> = set.iter().map(|p| p.index()).collect();
//! assert_eq!(ids, vec![0, 3]);
//! ```

use super::participant::{ParticipantId, MAX_PARTICIPANTS};
use std::fmt;

/// A set of participants represented as a bitset.
///
/// Bit i (counting from LSB) is set if participant i is in the set.
/// This provides O(1) insert, remove, and contains operations.
///
/// Stored as u64 so the set can live directly in a trailed state cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ParticipantSet(u64);

impl ParticipantSet {
    /// Create an empty set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Create the set of the first `count` participants (ids 0..count).
    ///
    /// # Panics
    ///
    /// Panics if `count > MAX_PARTICIPANTS`.
    pub fn first(count: usize) -> Self {
        assert!(
            count <= MAX_PARTICIPANTS,
            "Participant count out of range: {}",
            count
        );
        if count == MAX_PARTICIPANTS {
            Self(u64::MAX)
        } else {
            Self((1u64 << count) - 1)
        }
    }

    /// Create a set from a raw bit value.
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// Create a set containing the given participants.
    pub fn from_ids(ids: &[ParticipantId]) -> Self {
        ids.iter().copied().collect()
    }

    /// Check if the set contains a specific participant.
    pub fn contains(self, id: ParticipantId) -> bool {
        (self.0 >> id.index()) & 1 != 0
    }

    /// Insert a participant into the set.
    pub fn insert(&mut self, id: ParticipantId) {
        self.0 |= 1 << id.index();
    }

    /// Remove a participant from the set.
    pub fn remove(&mut self, id: ParticipantId) {
        self.0 &= !(1 << id.index());
    }

    /// The set with `id` added.
    pub fn with(self, id: ParticipantId) -> Self {
        Self(self.0 | (1 << id.index()))
    }

    /// The set with `id` removed.
    pub fn without(self, id: ParticipantId) -> Self {
        Self(self.0 & !(1 << id.index()))
    }

    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    pub fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Get the number of participants in the set (population count).
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Check if the set is empty.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Get the underlying bitset value.
    pub fn bits(self) -> u64 {
        self.0
    }

    /// Iterate over the participants in ascending id order.
    pub fn iter(self) -> impl Iterator<Item = ParticipantId> {
        ParticipantSetIter { bits: self.0 }
    }
}

/// Iterator over participants in a ParticipantSet.
struct ParticipantSetIter {
    bits: u64,
}

impl Iterator for ParticipantSetIter {
    type Item = ParticipantId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.bits == 0 {
            return None;
        }
        let index = self.bits.trailing_zeros() as usize;
        self.bits &= self.bits - 1;
        Some(ParticipantId::new(index))
    }
}

impl FromIterator<ParticipantId> for ParticipantSet {
    fn from_iter<T: IntoIterator<Item = ParticipantId>>(iter: T) -> Self {
        let mut set = Self::empty();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

impl fmt::Display for ParticipantSet {
    /// Format a set as "{0,3,5}".
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, id) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", id.index())?;
        }
        write!(f, "}}")
    }
}
