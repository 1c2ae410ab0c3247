// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Participants and the ordered roster they belong to.
//!
//! Names are only used at the edges (input and reporting). The search works
//! on dense `ParticipantId` indices into the roster, which also index the
//! bits of a [`ParticipantSet`](super::ParticipantSet).

use crate::error::{Result, ScheduleError};
use std::collections::HashMap;

/// Maximum number of participants in one exchange.
///
/// Bounded by the width of the `u64` bitset used for participant sets.
pub const MAX_PARTICIPANTS: usize = 64;

/// A participant, identified by position in the roster (0..MAX_PARTICIPANTS).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParticipantId(u8);

impl ParticipantId {
    /// Create a new participant id, panicking if out of range.
    ///
    /// # Panics
    ///
    /// Panics if `index >= MAX_PARTICIPANTS`.
    pub fn new(index: usize) -> Self {
        assert!(
            index < MAX_PARTICIPANTS,
            "Participant index out of range: {}",
            index
        );
        Self(index as u8)
    }

    /// Try to create a participant id, returning None if out of range.
    pub fn try_new(index: usize) -> Option<Self> {
        (index < MAX_PARTICIPANTS).then(|| Self(index as u8))
    }

    /// Get the id as a usize (for array indexing).
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The ordered, duplicate-free list of participant names for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    names: Vec<String>,
    lookup: HashMap<String, ParticipantId>,
}

impl Roster {
    /// Build a roster, rejecting empty names, duplicates and oversized groups.
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.len() > MAX_PARTICIPANTS {
            return Err(ScheduleError::config(format!(
                "{} participants given, at most {} are supported",
                names.len(),
                MAX_PARTICIPANTS
            )));
        }

        let mut lookup = HashMap::with_capacity(names.len());
        for (index, name) in names.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(ScheduleError::config(format!(
                    "participant #{} has an empty name",
                    index + 1
                )));
            }
            if lookup.insert(name.clone(), ParticipantId::new(index)).is_some() {
                return Err(ScheduleError::config(format!(
                    "participant '{}' is listed more than once",
                    name
                )));
            }
        }

        Ok(Self { names, lookup })
    }

    /// Number of participants.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Name of a participant.
    ///
    /// # Panics
    ///
    /// Panics if the id does not belong to this roster.
    pub fn name(&self, id: ParticipantId) -> &str {
        &self.names[id.index()]
    }

    /// Look up a participant by name.
    pub fn id(&self, name: &str) -> Option<ParticipantId> {
        self.lookup.get(name).copied()
    }

    /// Look up a participant by name, reporting unknown names as configuration errors.
    pub fn resolve(&self, name: &str) -> Result<ParticipantId> {
        self.id(name).ok_or_else(|| {
            ScheduleError::config(format!("unknown participant '{}'", name))
        })
    }

    /// All participant ids in roster order.
    pub fn ids(&self) -> impl Iterator<Item = ParticipantId> {
        (0..self.names.len()).map(ParticipantId::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participant_id_new() {
        assert_eq!(ParticipantId::new(0).index(), 0);
        assert_eq!(ParticipantId::new(63).index(), 63);
    }

    #[test]
    #[should_panic(expected = "Participant index out of range")]
    fn test_participant_id_out_of_range() {
        ParticipantId::new(MAX_PARTICIPANTS);
    }

    #[test]
    fn test_participant_id_try_new() {
        assert!(ParticipantId::try_new(10).is_some());
        assert!(ParticipantId::try_new(MAX_PARTICIPANTS).is_none());
    }

    #[test]
    fn test_roster_lookup() {
        let roster = Roster::new(["Ann", "Bob", "Cid"]).unwrap();
        assert_eq!(roster.len(), 3);
        assert_eq!(roster.id("Bob"), Some(ParticipantId::new(1)));
        assert_eq!(roster.name(ParticipantId::new(2)), "Cid");
        assert!(roster.id("Dee").is_none());

        let ids: Vec<_> = roster.ids().collect();
        assert_eq!(ids, vec![ParticipantId::new(0), ParticipantId::new(1), ParticipantId::new(2)]);
    }

    #[test]
    fn test_roster_rejects_duplicates() {
        let err = Roster::new(["Ann", "Bob", "Ann"]).unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidConfiguration(_)));
        assert!(err.to_string().contains("'Ann'"));
    }

    #[test]
    fn test_roster_rejects_empty_name() {
        let err = Roster::new(["Ann", "  "]).unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_roster_rejects_oversized_group() {
        let names: Vec<String> = (0..=MAX_PARTICIPANTS).map(|i| format!("p{}", i)).collect();
        let err = Roster::new(names).unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_resolve_unknown() {
        let roster = Roster::new(["Ann", "Bob"]).unwrap();
        let err = roster.resolve("Zed").unwrap_err();
        assert_eq!(
            err,
            ScheduleError::InvalidConfiguration("unknown participant 'Zed'".to_string())
        );
    }
}
