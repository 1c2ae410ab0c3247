// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Statistics
//!
//! Counters are stored in the search context and incremented by the
//! predicates. They are observability only and never steer the search.

use strum::EnumCount;
use strum_macros::EnumCount as EnumCountMacro;

#[derive(EnumCountMacro, Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum Counters {
    /// Search nodes visited (one per giver slot reached).
    NodesExplored,
    /// Branches cut because a remaining giver had no legal receiver.
    FeasibilityPrunes,
    /// Candidates rejected because they would exceed the overlap bound.
    OverlapPrunes,
    /// Complete schedules recorded.
    Solutions,
}

const COUNT: usize = Counters::COUNT;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Statistics {
    stats: [u64; COUNT],
}

impl Statistics {
    pub fn new() -> Self {
        Statistics::default()
    }

    /// Increment the specified counter by 1.
    pub(crate) fn increment_counter(&mut self, counter: Counters) {
        self.stats[counter as usize] += 1;
    }

    /// Get the current value of the specified counter.
    pub fn get(&self, counter: Counters) -> u64 {
        self.stats[counter as usize]
    }

    /// Add another set of counters into this one.
    pub fn merge(&mut self, other: &Statistics) {
        for (mine, theirs) in self.stats.iter_mut().zip(other.stats.iter()) {
            *mine += theirs;
        }
    }

    pub fn nodes_explored(&self) -> u64 {
        self.get(Counters::NodesExplored)
    }

    /// Feasibility and overlap prunes together.
    pub fn branches_pruned(&self) -> u64 {
        self.get(Counters::FeasibilityPrunes) + self.get(Counters::OverlapPrunes)
    }
}
