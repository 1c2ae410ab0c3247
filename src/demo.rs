// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! A built-in eight-person exchange with two earlier years on record.
//!
//! The earlier year is a hard exclusion and the previous year is the primary
//! reference, so the search finds the schedule that repeats as few of last
//! year's pairs as possible without repeating any from the year before.

use crate::error::Result;
use crate::model::{ConstraintModel, ConstraintModelBuilder, ReferenceMapping};

/// Participants, in search order.
pub const PARTICIPANTS: [&str; 8] = [
    "Jannes",
    "Abdalla",
    "Christian",
    "Lea",
    "Esther",
    "Charlotte",
    "Sébastien",
    "Stephanie",
];

/// Last year's three-round exchange.
pub fn previous_exchange() -> ReferenceMapping {
    vec![
        ("Jannes", vec!["Esther", "Lea", "Sébastien"]),
        ("Abdalla", vec!["Charlotte", "Stephanie", "Esther"]),
        ("Christian", vec!["Lea", "Charlotte", "Stephanie"]),
        ("Lea", vec!["Abdalla", "Sébastien", "Jannes"]),
        ("Esther", vec!["Christian", "Abdalla", "Charlotte"]),
        ("Charlotte", vec!["Sébastien", "Jannes", "Abdalla"]),
        ("Sébastien", vec!["Stephanie", "Christian", "Lea"]),
        ("Stephanie", vec!["Jannes", "Esther", "Christian"]),
    ]
    .into_iter()
    .collect()
}

/// The exchange the year before.
pub fn earlier_exchange() -> ReferenceMapping {
    vec![
        ("Jannes", vec!["Charlotte", "Stephanie", "Lea"]),
        ("Abdalla", vec!["Jannes", "Sébastien", "Esther"]),
        ("Christian", vec!["Stephanie", "Esther", "Sébastien"]),
        ("Lea", vec!["Esther", "Abdalla", "Christian"]),
        ("Esther", vec!["Lea", "Charlotte", "Jannes"]),
        ("Charlotte", vec!["Christian", "Jannes", "Stephanie"]),
        ("Sébastien", vec!["Abdalla", "Lea", "Charlotte"]),
        ("Stephanie", vec!["Sébastien", "Christian", "Abdalla"]),
    ]
    .into_iter()
    .collect()
}

/// The demo configuration: the earlier exchange excluded, the previous one
/// minimized. More references may be added before building.
pub fn builder(rounds: usize) -> ConstraintModelBuilder {
    ConstraintModel::builder(PARTICIPANTS, rounds)
        .exclude("earlier exchange", earlier_exchange())
        .primary("previous exchange", previous_exchange())
}

/// The demo model.
pub fn model(rounds: usize) -> Result<ConstraintModel> {
    builder(rounds).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Schedule;

    #[test]
    fn test_references_are_valid_schedules() {
        let plain = ConstraintModel::builder(PARTICIPANTS, 3).build().unwrap();
        for mapping in [previous_exchange(), earlier_exchange()] {
            let schedule = Schedule::from_names(
                plain.roster(),
                mapping.entries().map(|(giver, receivers)| (giver, receivers.iter())),
            )
            .unwrap();
            assert!(schedule.validate(&plain).is_ok());
        }
    }

    #[test]
    fn test_demo_model() {
        let model = model(3).unwrap();
        assert_eq!(model.participant_count(), 8);
        assert_eq!(model.exclusions().count(), 1);
        assert!(model.primary().is_some());
        assert!(model.secondary().is_none());
    }
}
