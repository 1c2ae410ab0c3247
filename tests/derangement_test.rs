// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Counting and checking schedules without any reference.

mod common;

use common::{assert_well_formed, enumerate, plain_model, rng};
use santa_search::model::{ConstraintModel, ReferenceMapping};
use santa_search::solver::{SearchOptions, Solver};
use santa_search::ScheduleError;
use std::collections::HashSet;

#[test]
fn test_four_people_one_round_gives_nine_derangements() {
    let model = plain_model(&["A", "B", "C", "D"], 1);
    let mut solver = Solver::new(&model, SearchOptions::default());
    let outcome = solver.solve(&mut rng(1)).unwrap();

    assert_eq!(outcome.primary_candidates, 9);
    assert!(!outcome.truncated);
    assert_eq!(outcome.levels_searched, 1);
    assert_eq!(outcome.primary_overlap, None);
    assert_well_formed(&outcome.schedule, &model);
}

#[test]
fn test_small_counts() {
    let cases: [(&[&str], usize, usize); 5] = [
        (&["A", "B", "C", "D"], 1, 9),
        (&["A", "B", "C", "D"], 2, 24),
        (&["A", "B", "C", "D"], 3, 24),
        (&["A", "B", "C"], 1, 2),
        (&["A", "B", "C"], 2, 2),
    ];
    for (names, rounds, expected) in cases {
        let model = plain_model(names, rounds);
        let solutions = enumerate(&model, 0);
        assert_eq!(solutions.len(), expected, "{:?} over {} rounds", names, rounds);

        let distinct: HashSet<_> = solutions.iter().collect();
        assert_eq!(distinct.len(), solutions.len());
    }
}

#[test]
fn test_every_enumerated_schedule_is_well_formed() {
    let model = plain_model(&["A", "B", "C", "D", "E"], 3);
    let solutions = enumerate(&model, 0);
    assert!(!solutions.is_empty());
    for schedule in &solutions {
        assert_well_formed(schedule, &model);
        assert!(schedule.validate(&model).is_ok());
    }
}

#[test]
fn test_too_many_rounds_for_three() {
    let err = ConstraintModel::builder(["A", "B", "C"], 3).build().unwrap_err();
    assert!(matches!(err, ScheduleError::InvalidConfiguration(_)));
}

#[test]
fn test_exclusions_are_respected() {
    let blocked: ReferenceMapping = vec![("A", vec!["B"]), ("C", vec!["D"])].into_iter().collect();
    let model = ConstraintModel::builder(["A", "B", "C", "D"], 2)
        .exclude("blocked", blocked)
        .build()
        .unwrap();
    let solutions = enumerate(&model, 0);
    assert!(!solutions.is_empty());
    for schedule in &solutions {
        assert_well_formed(schedule, &model);
    }
}

#[test]
fn test_unsatisfiable_exclusions() {
    let blocked: ReferenceMapping = vec![("A", vec!["B", "C"])].into_iter().collect();
    let model = ConstraintModel::builder(["A", "B", "C"], 1)
        .exclude("blocked", blocked)
        .build()
        .unwrap();
    let err = Solver::new(&model, SearchOptions::default())
        .solve(&mut rng(1))
        .unwrap_err();
    assert_eq!(err, ScheduleError::NoSolutionFound { levels_searched: 1 });
}
