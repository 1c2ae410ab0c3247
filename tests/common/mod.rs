// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::SeedableRng;
use santa_search::{demo, logging};
use santa_search::model::{ConstraintModel, ParticipantSet, Schedule};
use santa_search::solver::{SearchOptions, Solver};
use std::collections::HashSet;

/// Seeded rng; also routes search logging to the test harness.
pub fn rng(seed: u64) -> StdRng {
    logging::init_test();
    StdRng::seed_from_u64(seed)
}

/// A model with no references.
pub fn plain_model(names: &[&str], rounds: usize) -> ConstraintModel {
    ConstraintModel::builder(names.iter().copied(), rounds)
        .build()
        .unwrap()
}

/// The eight demo participants with last year's exchange as a soft reference only.
pub fn soft_only_model(rounds: usize) -> ConstraintModel {
    ConstraintModel::builder(demo::PARTICIPANTS, rounds)
        .primary("previous exchange", demo::previous_exchange())
        .build()
        .unwrap()
}

/// Every schedule at one overlap level, with a cap high enough to never bind.
pub fn enumerate(model: &ConstraintModel, level: usize) -> Vec<Schedule> {
    let options = SearchOptions {
        solution_cap: usize::MAX,
        ..SearchOptions::default()
    };
    let result = Solver::new(model, options).search_level(level).unwrap();
    assert!(result.is_exhaustive());
    result.solutions
}

/// Checks the schedule invariants without going through `Schedule::validate`.
pub fn assert_well_formed(schedule: &Schedule, model: &ConstraintModel) {
    let n = model.participant_count();
    let everyone = ParticipantSet::first(n);
    assert_eq!(schedule.giver_count(), n);

    for round in 0..model.rounds() {
        let mut received = ParticipantSet::empty();
        for giver in model.roster().ids() {
            let receiver = schedule.receiver(giver, round).unwrap();
            assert_ne!(receiver, giver, "self gift in round {}", round);
            assert!(!received.contains(receiver), "double receiver in round {}", round);
            received.insert(receiver);
        }
        assert_eq!(received, everyone);
    }

    for giver in model.roster().ids() {
        let receivers = schedule.receivers(giver);
        assert_eq!(receivers.len(), model.rounds());
        let distinct: HashSet<_> = receivers.iter().collect();
        assert_eq!(distinct.len(), receivers.len(), "repeated receiver");
        for reference in model.exclusions() {
            for &receiver in receivers {
                assert!(!reference.contains(giver, receiver), "excluded pair used");
            }
        }
    }
}
