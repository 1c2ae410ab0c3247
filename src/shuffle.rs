// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Randomized restart generator.
//!
//! For groups too large to enumerate, when only the hard constraints matter.
//! Each round starts from a shuffled receiver list; position `i` is repaired
//! by swapping in a receiver from a random position `j ≥ i` until the giver
//! may take it. A round that cannot be repaired restarts the whole attempt.
//!
//! Primary and secondary references are ignored while generating; the
//! outcome still reports the overlaps of the schedule produced.

use crate::error::{Result, ScheduleError};
use crate::model::{ConstraintModel, ParticipantId, ParticipantSet, Schedule};
use crate::solver::Outcome;
use rand::seq::SliceRandom;
use rand::Rng;
use std::time::Instant;
use tracing::{debug, info};

/// Attempts before giving up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 1000;

/// Generate one schedule satisfying every hard constraint.
pub fn generate<R: Rng>(model: &ConstraintModel, max_attempts: usize, rng: &mut R) -> Result<Schedule> {
    for attempt in 1..=max_attempts {
        if let Some(schedule) = try_once(model, rng) {
            schedule.validate(model)?;
            debug!(attempt, "shuffle attempt succeeded");
            return Ok(schedule);
        }
    }
    Err(ScheduleError::AttemptsExhausted {
        attempts: max_attempts,
    })
}

/// Generate a schedule and wrap it as an [`Outcome`].
pub fn solve<R: Rng>(model: &ConstraintModel, max_attempts: usize, rng: &mut R) -> Result<Outcome> {
    let started = Instant::now();
    let schedule = generate(model, max_attempts, rng)?;
    let outcome = Outcome::unsearched(model, schedule, started.elapsed());
    info!(
        primary_overlap = ?outcome.primary_overlap,
        secondary_overlap = ?outcome.secondary_overlap,
        "generated schedule by shuffling"
    );
    Ok(outcome)
}

fn try_once<R: Rng>(model: &ConstraintModel, rng: &mut R) -> Option<Schedule> {
    let n = model.participant_count();
    let mut rows: Vec<Vec<ParticipantId>> = vec![Vec::with_capacity(model.rounds()); n];
    let mut history = vec![ParticipantSet::empty(); n];

    for _ in 0..model.rounds() {
        let mut receivers: Vec<ParticipantId> = model.roster().ids().collect();
        receivers.shuffle(rng);

        for (i, giver) in model.roster().ids().enumerate() {
            let allowed = model
                .legal_receivers(giver)
                .difference(history[giver.index()]);
            let mut fixes = 0;
            while !allowed.contains(receivers[i]) {
                if fixes == 2 * n {
                    return None;
                }
                let j = rng.random_range(i..n);
                receivers.swap(i, j);
                fixes += 1;
            }
            rows[giver.index()].push(receivers[i]);
            history[giver.index()].insert(receivers[i]);
        }
    }

    Some(Schedule::from_rows(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ReferenceMapping;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generates_valid_schedules() {
        let model = ConstraintModel::builder(["A", "B", "C", "D", "E", "F"], 3).build().unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let schedule = generate(&model, DEFAULT_MAX_ATTEMPTS, &mut rng).unwrap();
            assert!(schedule.validate(&model).is_ok());
        }
    }

    #[test]
    fn test_respects_exclusions() {
        let blocked: ReferenceMapping = vec![("A", vec!["B", "C"]), ("D", vec!["A"])].into_iter().collect();
        let model = ConstraintModel::builder(["A", "B", "C", "D", "E"], 2)
            .exclude("blocked", blocked)
            .build()
            .unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let schedule = generate(&model, DEFAULT_MAX_ATTEMPTS, &mut rng).unwrap();
        assert!(schedule.validate(&model).is_ok());
    }

    #[test]
    fn test_impossible_instance_exhausts_attempts() {
        let blocked: ReferenceMapping = vec![("A", vec!["B", "C"])].into_iter().collect();
        let model = ConstraintModel::builder(["A", "B", "C"], 1)
            .exclude("blocked", blocked)
            .build()
            .unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        assert_eq!(
            generate(&model, 10, &mut rng).unwrap_err(),
            ScheduleError::AttemptsExhausted { attempts: 10 }
        );
    }

    #[test]
    fn test_solve_reports_overlaps() {
        let previous: ReferenceMapping = vec![("A", vec!["B"])].into_iter().collect();
        let model = ConstraintModel::builder(["A", "B", "C", "D"], 1)
            .primary("previous", previous)
            .build()
            .unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let outcome = solve(&model, DEFAULT_MAX_ATTEMPTS, &mut rng).unwrap();
        assert!(outcome.primary_overlap.is_some());
        assert_eq!(outcome.secondary_overlap, None);
        assert_eq!(outcome.levels_searched, 0);
    }
}
