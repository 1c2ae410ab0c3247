// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Picks one schedule among the primary-minimal candidates.
//!
//! Selection is lexicographic: with a secondary reference only the candidates
//! of minimal secondary overlap survive, and the pick among survivors is
//! uniform. Overlaps are never weighted against each other.

use crate::model::{ConstraintModel, Schedule};
use rand::Rng;

/// The chosen schedule and what the secondary reference did to the pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub schedule: Schedule,
    /// Overlap with the secondary reference, if there is one.
    pub secondary_overlap: Option<usize>,
    /// Candidates left after secondary minimization, if there is a secondary reference.
    pub secondary_candidates: Option<usize>,
}

/// Select a schedule from `candidates`. Returns None for an empty pool.
pub fn select<R: Rng>(
    model: &ConstraintModel,
    mut candidates: Vec<Schedule>,
    rng: &mut R,
) -> Option<Selection> {
    if candidates.is_empty() {
        return None;
    }

    let Some(secondary) = model.secondary() else {
        return Some(Selection {
            schedule: pick(candidates, rng),
            secondary_overlap: None,
            secondary_candidates: None,
        });
    };

    let overlaps: Vec<usize> = candidates
        .iter()
        .map(|schedule| model.overlap_of(schedule, secondary))
        .collect();
    let best = overlaps.iter().copied().min()?;
    let mut overlap = overlaps.into_iter();
    candidates.retain(|_| overlap.next() == Some(best));

    Some(Selection {
        secondary_candidates: Some(candidates.len()),
        secondary_overlap: Some(best),
        schedule: pick(candidates, rng),
    })
}

/// Uniform pick from a non-empty pool.
fn pick<R: Rng>(mut pool: Vec<Schedule>, rng: &mut R) -> Schedule {
    let index = rng.random_range(0..pool.len());
    pool.swap_remove(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ReferenceMapping;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn names() -> [&'static str; 3] {
        ["A", "B", "C"]
    }

    /// The two derangements of three people.
    fn candidates(model: &ConstraintModel) -> Vec<Schedule> {
        let forward = Schedule::from_names(
            model.roster(),
            vec![("A", vec!["B"]), ("B", vec!["C"]), ("C", vec!["A"])],
        )
        .unwrap();
        let backward = Schedule::from_names(
            model.roster(),
            vec![("A", vec!["C"]), ("B", vec!["A"]), ("C", vec!["B"])],
        )
        .unwrap();
        vec![forward, backward]
    }

    #[test]
    fn test_empty_pool() {
        let model = ConstraintModel::builder(names(), 1).build().unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(select(&model, Vec::new(), &mut rng).is_none());
    }

    #[test]
    fn test_uniform_without_secondary() {
        let model = ConstraintModel::builder(names(), 1).build().unwrap();
        let pool = candidates(&model);
        let mut rng = StdRng::seed_from_u64(7);

        let mut seen = std::collections::HashSet::new();
        for _ in 0..64 {
            let selection = select(&model, pool.clone(), &mut rng).unwrap();
            assert!(selection.secondary_overlap.is_none());
            seen.insert(selection.schedule);
        }
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_secondary_keeps_only_minimum() {
        let earlier: ReferenceMapping = vec![("A", vec!["B"]), ("B", vec!["C"])].into_iter().collect();
        let model = ConstraintModel::builder(names(), 1)
            .secondary("earlier", earlier)
            .build()
            .unwrap();
        let pool = candidates(&model);

        for seed in 0..16 {
            let mut rng = StdRng::seed_from_u64(seed);
            let selection = select(&model, pool.clone(), &mut rng).unwrap();
            assert_eq!(selection.schedule, pool[1]);
            assert_eq!(selection.secondary_overlap, Some(0));
            assert_eq!(selection.secondary_candidates, Some(1));
        }
    }
}
