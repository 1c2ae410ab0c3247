// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! RecordSolutionPredicate - terminal predicate that stores complete schedules.

use crate::context::{Halt, SearchContext};
use crate::engine::{Predicate, PredicateResult, TerminalPredicate};
use crate::error::ScheduleError;
use crate::solver::{Progress, ProgressHook};
use crate::state::statistics::Counters;
use std::fmt;
use tracing::debug;

/// Records the complete schedule in the context, then fails to continue the
/// enumeration, or suspends once the solution cap is reached.
///
/// The tracked overlap is checked against an overlap recomputed from the
/// finished schedule; a mismatch halts the search with
/// [`ScheduleError::InternalInvariantViolation`].
pub struct RecordSolutionPredicate {
    level: usize,
    progress: Option<(ProgressHook, u64)>,
}

impl RecordSolutionPredicate {
    /// Recorder for the search at overlap level `level`.
    pub fn new(level: usize) -> Self {
        Self {
            level,
            progress: None,
        }
    }

    /// Call `hook` after every `interval` recorded solutions. An interval of 0
    /// disables the hook.
    pub fn with_progress(mut self, hook: ProgressHook, interval: u64) -> Self {
        if interval > 0 {
            self.progress = Some((hook, interval));
        }
        self
    }

    fn report(&self, ctx: &SearchContext<'_>) {
        let solutions = ctx.statistics.get(Counters::Solutions);
        let Some((hook, interval)) = &self.progress else {
            return;
        };
        if solutions % interval != 0 {
            return;
        }
        let progress = Progress {
            level: self.level,
            solutions,
            nodes_explored: ctx.statistics.nodes_explored(),
            branches_pruned: ctx.statistics.branches_pruned(),
        };
        debug!(?progress, "search progress");
        hook(&progress);
    }
}

impl fmt::Debug for RecordSolutionPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordSolutionPredicate")
            .field("level", &self.level)
            .field("progress_interval", &self.progress.as_ref().map(|(_, n)| n))
            .finish()
    }
}

impl Predicate for RecordSolutionPredicate {
    fn try_pred(&mut self, ctx: &mut SearchContext<'_>, _round: usize) -> PredicateResult {
        let Some(schedule) = ctx.state.to_schedule() else {
            panic!("RecordSolution reached with unassigned slots");
        };

        let tracked = ctx.state.overlap();
        let recomputed = ctx
            .model
            .primary()
            .map_or(0, |primary| ctx.model.overlap_of(&schedule, primary));
        if tracked != recomputed {
            ctx.halt(Halt::Fault(ScheduleError::InternalInvariantViolation {
                tracked,
                recomputed,
            }));
            return PredicateResult::Suspend;
        }
        debug_assert!(schedule.validate(ctx.model).is_ok());

        let cap_reached = ctx.record_solution(schedule);
        self.report(ctx);
        if cap_reached {
            ctx.halt(Halt::CapReached);
            PredicateResult::Suspend
        } else {
            PredicateResult::Failure
        }
    }

    fn name(&self) -> &str {
        "RecordSolution"
    }
}

impl TerminalPredicate for RecordSolutionPredicate {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::SearchLimits;
    use crate::model::{ConstraintModel, ParticipantId, ReferenceMapping};
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    fn model() -> ConstraintModel {
        let previous: ReferenceMapping = vec![("A", vec!["B"])].into_iter().collect();
        ConstraintModel::builder(["A", "B", "C"], 1)
            .primary("previous", previous)
            .build()
            .unwrap()
    }

    fn fill(ctx: &mut SearchContext<'_>, shared_first: bool) {
        let [a, b, c] = [0, 1, 2].map(ParticipantId::new);
        ctx.assign(0, a, b, shared_first);
        ctx.assign(0, b, c, false);
        ctx.assign(0, c, a, false);
    }

    #[test]
    fn test_records_and_fails() {
        let model = model();
        let mut ctx = SearchContext::new(&model, SearchLimits::level(1));
        fill(&mut ctx, true);

        let mut pred = RecordSolutionPredicate::new(1);
        assert_eq!(pred.try_pred(&mut ctx, 0), PredicateResult::Failure);
        assert_eq!(ctx.solutions().len(), 1);
        assert!(ctx.halted().is_none());
    }

    #[test]
    fn test_cap_suspends() {
        let model = model();
        let limits = SearchLimits {
            solution_cap: 1,
            ..SearchLimits::level(1)
        };
        let mut ctx = SearchContext::new(&model, limits);
        fill(&mut ctx, true);

        let mut pred = RecordSolutionPredicate::new(1);
        assert_eq!(pred.try_pred(&mut ctx, 0), PredicateResult::Suspend);
        assert_eq!(ctx.halted(), Some(&Halt::CapReached));
    }

    #[test]
    fn test_overlap_mismatch_is_a_fault() {
        let model = model();
        let mut ctx = SearchContext::new(&model, SearchLimits::level(1));
        // A -> B is shared with the primary reference but recorded as not shared.
        fill(&mut ctx, false);

        let mut pred = RecordSolutionPredicate::new(1);
        assert_eq!(pred.try_pred(&mut ctx, 0), PredicateResult::Suspend);
        assert_eq!(
            ctx.take_halt(),
            Some(Halt::Fault(ScheduleError::InternalInvariantViolation {
                tracked: 0,
                recomputed: 1
            }))
        );
        assert!(ctx.solutions().is_empty());
    }

    #[test]
    fn test_progress_every_interval() {
        let model = model();
        let mut ctx = SearchContext::new(&model, SearchLimits::level(1));
        fill(&mut ctx, true);

        let calls = Arc::new(AtomicU64::new(0));
        let seen = Arc::clone(&calls);
        let hook: ProgressHook = Arc::new(move |progress: &Progress| {
            assert_eq!(progress.solutions % 2, 0);
            seen.fetch_add(1, Ordering::SeqCst);
        });
        let mut pred = RecordSolutionPredicate::new(1).with_progress(hook, 2);

        for _ in 0..5 {
            pred.try_pred(&mut ctx, 0);
        }
        assert_eq!(ctx.solutions().len(), 5);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
