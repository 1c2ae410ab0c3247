// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Tier 2: DYNAMIC state (mutable, tracked on trail).
//!
//! The assignment in progress is a flat array of `u64` cells so that every
//! write can be recorded on the trail and undone on backtrack:
//!
//! ```text
//! [ receiver(round, giver) ; rounds × n ]   UNASSIGNED or a participant index
//! [ used(round)            ; rounds     ]   receivers taken in that round (bitset)
//! [ history(giver)         ; n          ]   receivers of that giver so far (bitset)
//! [ overlap                ; 1          ]   pairs shared with the primary reference
//! ```

pub mod statistics;

use crate::model::{ParticipantId, ParticipantSet, Schedule};

/// Marker for an assignment cell with no receiver yet.
pub const UNASSIGNED: u64 = u64::MAX;

/// Mutable search state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicState {
    participants: usize,
    rounds: usize,
    cells: Vec<u64>,
}

impl DynamicState {
    /// Create the empty state for `participants` givers over `rounds` rounds.
    pub fn new(participants: usize, rounds: usize) -> Self {
        let mut cells = vec![0; rounds * participants + rounds + participants + 1];
        cells[..rounds * participants].fill(UNASSIGNED);
        Self {
            participants,
            rounds,
            cells,
        }
    }

    pub(crate) fn receiver_cell(&self, round: usize, giver: ParticipantId) -> usize {
        debug_assert!(round < self.rounds && giver.index() < self.participants);
        round * self.participants + giver.index()
    }

    pub(crate) fn used_cell(&self, round: usize) -> usize {
        debug_assert!(round < self.rounds);
        self.rounds * self.participants + round
    }

    pub(crate) fn history_cell(&self, giver: ParticipantId) -> usize {
        debug_assert!(giver.index() < self.participants);
        self.rounds * self.participants + self.rounds + giver.index()
    }

    pub(crate) fn overlap_cell(&self) -> usize {
        self.cells.len() - 1
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [u64] {
        &mut self.cells
    }

    pub fn participants(&self) -> usize {
        self.participants
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Receiver of `giver` in `round`, if assigned.
    pub fn receiver(&self, round: usize, giver: ParticipantId) -> Option<ParticipantId> {
        match self.cells[self.receiver_cell(round, giver)] {
            UNASSIGNED => None,
            value => Some(ParticipantId::new(value as usize)),
        }
    }

    /// Receivers already taken in `round`.
    pub fn used_in_round(&self, round: usize) -> ParticipantSet {
        ParticipantSet::from_bits(self.cells[self.used_cell(round)])
    }

    /// Receivers `giver` has been assigned in any round so far.
    pub fn history(&self, giver: ParticipantId) -> ParticipantSet {
        ParticipantSet::from_bits(self.cells[self.history_cell(giver)])
    }

    /// Number of assigned pairs that appear in the primary reference.
    pub fn overlap(&self) -> usize {
        self.cells[self.overlap_cell()] as usize
    }

    /// Whether no cell has been written.
    pub fn is_pristine(&self) -> bool {
        *self == Self::new(self.participants, self.rounds)
    }

    /// Snapshot the assignment as a schedule, or None while any cell is unassigned.
    pub fn to_schedule(&self) -> Option<Schedule> {
        let rows = (0..self.participants)
            .map(ParticipantId::new)
            .map(|giver| {
                (0..self.rounds)
                    .map(|round| self.receiver(round, giver))
                    .collect::<Option<Vec<_>>>()
            })
            .collect::<Option<Vec<_>>>()?;
        Some(Schedule::from_rows(rows))
    }
}
