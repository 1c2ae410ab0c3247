// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Trail-based backtracking.
//!
//! Every write to search state goes through the trail, which records the old
//! value. Backtracking rewinds the trail to a checkpoint, restoring the
//! recorded values in reverse order. This gives each search frame guaranteed
//! restoration on every exit path, pruned branches included.

/// A single entry in the trail, recording one state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TrailEntry {
    /// Index of the state cell that was written
    cell: usize,
    /// The value before the write
    old_value: u64,
}

/// The trail system for backtracking.
///
/// State lives in a flat slice of `u64` cells owned by the caller; the trail
/// only remembers which cell held what. Checkpoints are trail lengths.
///
/// # Memory Model
///
/// - DYNAMIC: The trail is mutable state (Tier 2) that changes during search
/// - Each SearchContext owns its own trail, so independent searches never share one
#[derive(Debug)]
pub struct Trail {
    /// All trail entries recorded so far
    entries: Vec<TrailEntry>,
}

impl Trail {
    /// Maximum trail size.
    ///
    /// A complete schedule writes at most four cells per assignment, and there
    /// are at most 64 × 63 assignments, so a correct search stays below this.
    const MAX_SIZE: usize = 16384;

    /// Create a new empty trail.
    pub fn new() -> Self {
        Self {
            entries: Vec::with_capacity(256),
        }
    }

    /// The current position, to be passed to `rewind_to` later.
    pub fn checkpoint(&self) -> usize {
        self.entries.len()
    }

    /// Write `value` into `cells[cell]`, recording the old value.
    ///
    /// # Panics
    ///
    /// Panics if the trail exceeds MAX_SIZE (indicates a bug in the search algorithm).
    pub fn record_and_set(&mut self, cells: &mut [u64], cell: usize, value: u64) {
        if self.entries.len() >= Self::MAX_SIZE {
            panic!("Trail overflow: exceeded {} entries", Self::MAX_SIZE);
        }
        self.entries.push(TrailEntry {
            cell,
            old_value: cells[cell],
        });
        cells[cell] = value;
    }

    /// Like `record_and_set`, but records nothing if the value is unchanged.
    ///
    /// Returns true if the value was changed.
    pub fn maybe_set(&mut self, cells: &mut [u64], cell: usize, value: u64) -> bool {
        if cells[cell] != value {
            self.record_and_set(cells, cell, value);
            true
        } else {
            false
        }
    }

    /// Undo every write made since `checkpoint`, newest first.
    pub fn rewind_to(&mut self, checkpoint: usize, cells: &mut [u64]) {
        while self.entries.len() > checkpoint {
            if let Some(entry) = self.entries.pop() {
                cells[entry.cell] = entry.old_value;
            }
        }
    }

    /// Get the current number of entries in the trail.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the trail is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Trail {
    fn default() -> Self {
        Self::new()
    }
}
