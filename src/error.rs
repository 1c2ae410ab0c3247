// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Error types for building constraint models and searching for schedules.

use crate::model::ScheduleViolation;
use thiserror::Error;

/// Errors reported by the planner.
///
/// Configuration errors are raised before any search starts. The search itself
/// never retries: every error below is final for the given input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// The participant list, round count or a reference mapping is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The overlap tracked during search disagrees with the overlap of the
    /// finished schedule. Indicates a bookkeeping defect, not bad input.
    #[error("internal invariant violated: tracked overlap {tracked}, recomputed {recomputed}")]
    InternalInvariantViolation { tracked: usize, recomputed: usize },

    /// Every overlap level was searched and none admits a schedule.
    #[error("no schedule satisfies the constraints ({levels_searched} overlap levels searched)")]
    NoSolutionFound { levels_searched: usize },

    /// The node ceiling or time limit was hit before the current level produced
    /// a schedule.
    #[error("search budget exhausted at overlap level {level} after {nodes} nodes")]
    SearchBudgetExhausted { level: usize, nodes: u64 },

    /// The shuffle strategy gave up.
    #[error("no valid shuffled schedule after {attempts} attempts")]
    AttemptsExhausted { attempts: usize },

    /// A schedule broke one of the schedule invariants.
    #[error("invalid schedule: {0}")]
    InvalidSchedule(#[from] ScheduleViolation),
}

impl ScheduleError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        ScheduleError::InvalidConfiguration(message.into())
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = ScheduleError> = std::result::Result<T, E>;
