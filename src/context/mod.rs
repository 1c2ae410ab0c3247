// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Search context combining the constraint model and DYNAMIC state.
//!
//! The SearchContext is the core data structure that combines:
//! - Tier 1 (model): the immutable constraint model, borrowed
//! - Tier 2 (DYNAMIC): mutable search state with trail-based backtracking
//!
//! One context is created per bounded search. Solutions and counters belong
//! to it alone, so independent searches never see each other's results.

use crate::error::ScheduleError;
use crate::model::{ConstraintModel, ParticipantId, Schedule};
use crate::state::statistics::{Counters, Statistics};
use crate::state::DynamicState;
use crate::trail::Trail;
use std::time::Instant;

/// Nodes between two deadline checks.
const DEADLINE_CHECK_INTERVAL: u64 = 1024;

/// Bounds applied to one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    /// Largest overlap with the primary reference a schedule may have.
    pub max_overlap: usize,
    /// Stop after recording this many schedules.
    pub solution_cap: usize,
    /// Stop after visiting this many nodes.
    pub node_budget: Option<u64>,
    /// Stop once this instant has passed.
    pub deadline: Option<Instant>,
}

impl SearchLimits {
    /// Limits for an unbounded enumeration at overlap level `max_overlap`.
    pub fn level(max_overlap: usize) -> Self {
        Self {
            max_overlap,
            solution_cap: usize::MAX,
            node_budget: None,
            deadline: None,
        }
    }
}

/// Why a search stopped before exhausting its space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Halt {
    /// The solution cap was reached.
    CapReached,
    /// The node budget or the deadline was hit.
    BudgetExhausted,
    /// An internal invariant failed; the search must not continue.
    Fault(ScheduleError),
}

/// Search context combining the model and DYNAMIC state.
///
/// # Memory Model
///
/// ```text
/// SearchContext {
///     model: &ConstraintModel,   // Tier 1: Immutable, shared
///     trail: Trail,              // Tier 2: Mutable, owned
///     state: DynamicState,       // Tier 2: Mutable, owned
/// }
/// ```
///
/// State is only written through [`assign`](Self::assign), which records every
/// cell on the trail, so [`rewind_to`](Self::rewind_to) always restores it.
#[derive(Debug)]
pub struct SearchContext<'m> {
    /// Immutable constraint model (Tier 1)
    pub model: &'m ConstraintModel,
    /// Trail for backtracking (Tier 2)
    pub trail: Trail,
    /// Mutable search state (Tier 2)
    pub state: DynamicState,
    /// Counters for this search only
    pub statistics: Statistics,
    /// Bounds for this search
    pub limits: SearchLimits,
    solutions: Vec<Schedule>,
    halt: Option<Halt>,
}

impl<'m> SearchContext<'m> {
    /// Create a fresh context for one search over `model`.
    pub fn new(model: &'m ConstraintModel, limits: SearchLimits) -> Self {
        Self {
            model,
            trail: Trail::new(),
            state: DynamicState::new(model.participant_count(), model.rounds()),
            statistics: Statistics::new(),
            limits,
            solutions: Vec::new(),
            halt: None,
        }
    }

    /// Assign `receiver` to `giver` in `round` (trail-tracked).
    ///
    /// Marks the receiver as used for the round and in the giver's history,
    /// and adds one to the overlap when `shared_with_primary` is set.
    pub fn assign(
        &mut self,
        round: usize,
        giver: ParticipantId,
        receiver: ParticipantId,
        shared_with_primary: bool,
    ) {
        let receiver_cell = self.state.receiver_cell(round, giver);
        let used_cell = self.state.used_cell(round);
        let history_cell = self.state.history_cell(giver);
        let overlap_cell = self.state.overlap_cell();

        let used = self.state.used_in_round(round).with(receiver).bits();
        let history = self.state.history(giver).with(receiver).bits();
        let overlap = (self.state.overlap() + usize::from(shared_with_primary)) as u64;

        let cells = self.state.cells_mut();
        self.trail
            .record_and_set(cells, receiver_cell, receiver.index() as u64);
        self.trail.record_and_set(cells, used_cell, used);
        self.trail.record_and_set(cells, history_cell, history);
        self.trail.maybe_set(cells, overlap_cell, overlap);
    }

    /// Undo every assignment made since `checkpoint`.
    pub fn rewind_to(&mut self, checkpoint: usize) {
        self.trail.rewind_to(checkpoint, self.state.cells_mut());
    }

    pub(crate) fn count(&mut self, counter: Counters) {
        self.statistics.increment_counter(counter);
    }

    /// Whether the node budget or the deadline has been reached.
    pub fn budget_exhausted(&self) -> bool {
        let nodes = self.statistics.nodes_explored();
        if self.limits.node_budget.is_some_and(|budget| nodes >= budget) {
            return true;
        }
        match self.limits.deadline {
            Some(deadline) if nodes % DEADLINE_CHECK_INTERVAL == 0 => Instant::now() >= deadline,
            _ => false,
        }
    }

    /// Record a complete schedule. Returns true once the solution cap is reached.
    pub fn record_solution(&mut self, schedule: Schedule) -> bool {
        self.solutions.push(schedule);
        self.count(Counters::Solutions);
        self.solutions.len() >= self.limits.solution_cap
    }

    pub fn solutions(&self) -> &[Schedule] {
        &self.solutions
    }

    pub fn into_solutions(self) -> Vec<Schedule> {
        self.solutions
    }

    /// Note why the search is stopping. The first reason wins.
    pub fn halt(&mut self, reason: Halt) {
        self.halt.get_or_insert(reason);
    }

    pub fn halted(&self) -> Option<&Halt> {
        self.halt.as_ref()
    }

    pub fn take_halt(&mut self) -> Option<Halt> {
        self.halt.take()
    }
}
