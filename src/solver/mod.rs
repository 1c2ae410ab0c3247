// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Iterative deepening over the primary overlap, and result selection.
//!
//! For `level = 0, 1, …` the solver runs one bounded search that allows at
//! most `level` pairs shared with the primary reference. The first level with
//! any schedule is minimal; the selector then picks one schedule from it.
//! Without a primary reference only level 0 is searched.

pub mod selector;

pub use selector::{select, Selection};

use crate::context::{Halt, SearchContext, SearchLimits};
use crate::engine::EngineBuilder;
use crate::error::{Result, ScheduleError};
use crate::model::{ConstraintModel, Schedule};
use crate::predicates::{AssignPredicate, RecordSolutionPredicate};
use crate::state::statistics::{Counters, Statistics};
use rand::Rng;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Default number of schedules kept per level.
pub const DEFAULT_SOLUTION_CAP: usize = 10_000;

/// Default number of recorded schedules between two progress callbacks.
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 1_000;

/// Snapshot passed to the progress hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub level: usize,
    pub solutions: u64,
    pub nodes_explored: u64,
    pub branches_pruned: u64,
}

/// Callback invoked every `progress_interval` recorded schedules.
pub type ProgressHook = Arc<dyn Fn(&Progress) + Send + Sync>;

/// Search configuration.
#[derive(Clone)]
pub struct SearchOptions {
    /// Schedules kept per level before the level stops early.
    pub solution_cap: usize,
    /// Node ceiling over all levels.
    pub max_nodes: Option<u64>,
    /// Wall-clock limit over all levels.
    pub time_limit: Option<Duration>,
    /// Recorded schedules between two progress callbacks.
    pub progress_interval: u64,
    pub progress: Option<ProgressHook>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            solution_cap: DEFAULT_SOLUTION_CAP,
            max_nodes: None,
            time_limit: None,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            progress: None,
        }
    }
}

impl fmt::Debug for SearchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchOptions")
            .field("solution_cap", &self.solution_cap)
            .field("max_nodes", &self.max_nodes)
            .field("time_limit", &self.time_limit)
            .field("progress_interval", &self.progress_interval)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

/// Result of one bounded search.
#[derive(Debug, Clone)]
pub struct LevelResult {
    pub level: usize,
    pub solutions: Vec<Schedule>,
    /// Counters for this level only.
    pub statistics: Statistics,
    /// The solution cap stopped the search.
    pub truncated: bool,
    /// The node ceiling or the time limit stopped the search.
    pub budget_exhausted: bool,
}

impl LevelResult {
    /// Whether every branch of the level was explored.
    pub fn is_exhaustive(&self) -> bool {
        !self.truncated && !self.budget_exhausted
    }
}

/// The schedules found at the minimal primary overlap level.
#[derive(Debug, Clone)]
pub struct Candidates {
    pub level: usize,
    pub solutions: Vec<Schedule>,
    /// The set was cut short by the cap or the budget.
    pub truncated: bool,
    pub levels_searched: usize,
}

/// The selected schedule with everything the report needs.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub schedule: Schedule,
    pub primary_overlap: Option<usize>,
    pub secondary_overlap: Option<usize>,
    /// Candidates at the minimal primary level.
    pub primary_candidates: usize,
    /// Candidates left after secondary minimization.
    pub secondary_candidates: Option<usize>,
    /// The candidate count is a lower bound.
    pub truncated: bool,
    pub levels_searched: usize,
    pub nodes_explored: u64,
    pub branches_pruned: u64,
    pub elapsed: Duration,
}

impl Outcome {
    /// An outcome for a schedule produced without the exhaustive search.
    pub fn unsearched(model: &ConstraintModel, schedule: Schedule, elapsed: Duration) -> Self {
        let primary_overlap = model
            .primary()
            .map(|primary| model.overlap_of(&schedule, primary));
        let secondary_overlap = model
            .secondary()
            .map(|secondary| model.overlap_of(&schedule, secondary));
        Self {
            schedule,
            primary_overlap,
            secondary_overlap,
            primary_candidates: 1,
            secondary_candidates: secondary_overlap.map(|_| 1),
            truncated: false,
            levels_searched: 0,
            nodes_explored: 0,
            branches_pruned: 0,
            elapsed,
        }
    }
}

/// Drives the level searches for one model.
///
/// Counters and the node ceiling accumulate over every search the solver
/// runs; the time limit counts from [`Solver::new`].
#[derive(Debug)]
pub struct Solver<'m> {
    model: &'m ConstraintModel,
    options: SearchOptions,
    statistics: Statistics,
    started: Instant,
    deadline: Option<Instant>,
}

impl<'m> Solver<'m> {
    pub fn new(model: &'m ConstraintModel, options: SearchOptions) -> Self {
        let started = Instant::now();
        let deadline = options
            .time_limit
            .and_then(|limit| started.checked_add(limit));
        Self {
            model,
            options,
            statistics: Statistics::new(),
            started,
            deadline,
        }
    }

    /// Counters accumulated over every level searched so far.
    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    /// Enumerate schedules whose primary overlap is at most `level`.
    pub fn search_level(&mut self, level: usize) -> Result<LevelResult> {
        let limits = SearchLimits {
            max_overlap: level,
            solution_cap: self.options.solution_cap,
            node_budget: self
                .options
                .max_nodes
                .map(|max| max.saturating_sub(self.statistics.nodes_explored())),
            deadline: self.deadline,
        };
        let mut ctx = SearchContext::new(self.model, limits);

        let mut recorder = RecordSolutionPredicate::new(level);
        if let Some(hook) = &self.options.progress {
            recorder = recorder.with_progress(Arc::clone(hook), self.options.progress_interval);
        }
        let engine = EngineBuilder::new()
            .add(Box::new(AssignPredicate::new(self.model)))
            .terminal(Box::new(recorder))
            .build();

        if let Some(engine) = engine.search(&mut ctx) {
            let (tries, retries) = engine.statistics();
            debug!(level, tries, retries, "level search suspended");
        }

        let statistics = ctx.statistics;
        self.statistics.merge(&statistics);
        let halt = match ctx.take_halt() {
            Some(Halt::Fault(err)) => return Err(err),
            halt => halt,
        };

        Ok(LevelResult {
            level,
            solutions: ctx.into_solutions(),
            statistics,
            truncated: halt == Some(Halt::CapReached),
            budget_exhausted: halt == Some(Halt::BudgetExhausted),
        })
    }

    /// Find the schedules at the smallest primary overlap level that has any.
    pub fn minimal_solutions(&mut self) -> Result<Candidates> {
        let top = if self.model.primary().is_some() {
            self.model.max_overlap()
        } else {
            0
        };

        for level in 0..=top {
            let result = self.search_level(level)?;
            let levels_searched = level + 1;
            info!(
                level,
                solutions = result.solutions.len(),
                nodes = result.statistics.nodes_explored(),
                pruned = result.statistics.branches_pruned(),
                "searched overlap level"
            );

            if result.budget_exhausted {
                if result.solutions.is_empty() {
                    warn!(level, "search budget exhausted before any schedule was found");
                    return Err(ScheduleError::SearchBudgetExhausted {
                        level,
                        nodes: self.statistics.nodes_explored(),
                    });
                }
                warn!(level, "search budget exhausted; keeping the schedules found so far");
                return Ok(Candidates {
                    level,
                    solutions: result.solutions,
                    truncated: true,
                    levels_searched,
                });
            }

            if !result.solutions.is_empty() {
                if result.truncated {
                    warn!(
                        cap = self.options.solution_cap,
                        "solution cap reached; candidate count is a lower bound"
                    );
                }
                return Ok(Candidates {
                    level,
                    solutions: result.solutions,
                    truncated: result.truncated,
                    levels_searched,
                });
            }

            // Raising the bound only helps if the bound cut something.
            if result.statistics.get(Counters::OverlapPrunes) == 0 {
                return Err(ScheduleError::NoSolutionFound { levels_searched });
            }
        }

        Err(ScheduleError::NoSolutionFound {
            levels_searched: top + 1,
        })
    }

    /// Search for the minimal level, then select one schedule from it.
    pub fn solve<R: Rng>(&mut self, rng: &mut R) -> Result<Outcome> {
        let candidates = self.minimal_solutions()?;
        let primary_candidates = candidates.solutions.len();
        let selection = select(self.model, candidates.solutions, rng).ok_or(
            ScheduleError::NoSolutionFound {
                levels_searched: candidates.levels_searched,
            },
        )?;

        let outcome = Outcome {
            primary_overlap: self
                .model
                .primary()
                .map(|primary| self.model.overlap_of(&selection.schedule, primary)),
            schedule: selection.schedule,
            secondary_overlap: selection.secondary_overlap,
            primary_candidates,
            secondary_candidates: selection.secondary_candidates,
            truncated: candidates.truncated,
            levels_searched: candidates.levels_searched,
            nodes_explored: self.statistics.nodes_explored(),
            branches_pruned: self.statistics.branches_pruned(),
            elapsed: self.started.elapsed(),
        };
        info!(
            primary_overlap = ?outcome.primary_overlap,
            secondary_overlap = ?outcome.secondary_overlap,
            candidates = outcome.primary_candidates,
            "selected schedule"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ReferenceMapping;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_level_zero_without_primary() {
        let model = ConstraintModel::builder(["A", "B", "C", "D"], 1).build().unwrap();
        let mut solver = Solver::new(&model, SearchOptions::default());
        let result = solver.search_level(0).unwrap();
        assert_eq!(result.solutions.len(), 9);
        assert!(result.is_exhaustive());
        assert_eq!(result.statistics.get(Counters::Solutions), 9);
    }

    #[test]
    fn test_cap_truncates_level() {
        let model = ConstraintModel::builder(["A", "B", "C", "D"], 1).build().unwrap();
        let options = SearchOptions {
            solution_cap: 4,
            ..SearchOptions::default()
        };
        let mut solver = Solver::new(&model, options);
        let candidates = solver.minimal_solutions().unwrap();
        assert_eq!(candidates.solutions.len(), 4);
        assert!(candidates.truncated);
    }

    #[test]
    fn test_deepening_stops_at_first_level_with_solutions() {
        // Every derangement of three shares one pair with this reference.
        let previous: ReferenceMapping = vec![("A", vec!["B", "C"])].into_iter().collect();
        let model = ConstraintModel::builder(["A", "B", "C"], 1)
            .primary("previous", previous)
            .build()
            .unwrap();
        let mut solver = Solver::new(&model, SearchOptions::default());

        let level0 = solver.search_level(0).unwrap();
        assert!(level0.solutions.is_empty());
        assert!(level0.is_exhaustive());

        let candidates = solver.minimal_solutions().unwrap();
        assert_eq!(candidates.level, 1);
        assert_eq!(candidates.levels_searched, 2);
        assert_eq!(candidates.solutions.len(), 2);
    }

    #[test]
    fn test_no_solution_without_overlap_prunes() {
        let blocked: ReferenceMapping = vec![("A", vec!["B", "C"])].into_iter().collect();
        let model = ConstraintModel::builder(["A", "B", "C"], 1)
            .exclude("blocked", blocked)
            .primary("previous", ReferenceMapping::new())
            .build()
            .unwrap();
        let mut solver = Solver::new(&model, SearchOptions::default());
        assert_eq!(
            solver.minimal_solutions().unwrap_err(),
            ScheduleError::NoSolutionFound { levels_searched: 1 }
        );
    }

    #[test]
    fn test_node_budget_exhausted() {
        let model = ConstraintModel::builder(["A", "B", "C", "D"], 2).build().unwrap();
        let options = SearchOptions {
            max_nodes: Some(1),
            ..SearchOptions::default()
        };
        let mut solver = Solver::new(&model, options);
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(
            solver.solve(&mut rng).unwrap_err(),
            ScheduleError::SearchBudgetExhausted { level: 0, nodes: 1 }
        );
    }

    #[test]
    fn test_solve_reports_counts() {
        let model = ConstraintModel::builder(["A", "B", "C", "D"], 1).build().unwrap();
        let mut solver = Solver::new(&model, SearchOptions::default());
        let mut rng = StdRng::seed_from_u64(11);
        let outcome = solver.solve(&mut rng).unwrap();

        assert_eq!(outcome.primary_candidates, 9);
        assert_eq!(outcome.primary_overlap, None);
        assert_eq!(outcome.secondary_candidates, None);
        assert!(!outcome.truncated);
        assert_eq!(outcome.levels_searched, 1);
        assert!(outcome.nodes_explored > 0);
        assert!(outcome.schedule.validate(&model).is_ok());
    }

    #[test]
    fn test_options_debug_hides_hook() {
        let options = SearchOptions {
            progress: Some(Arc::new(|_: &Progress| {})),
            ..SearchOptions::default()
        };
        let debug = format!("{:?}", options);
        assert!(debug.contains("progress: true"));
        assert!(debug.contains("solution_cap: 10000"));
    }
}
