// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Tier 1: the immutable constraint model.
//!
//! Everything here is built once, before the search starts, and only read
//! afterwards:
//! - `participant`: participant ids and the ordered roster
//! - `participant_set`: bitset of participants
//! - `reference`: reference schedules from previous exchanges and their roles
//! - `constraints`: the constraint model tying roster, rounds and references together
//! - `schedule`: finished schedules and their invariants

pub mod constraints;
pub mod participant;
pub mod participant_set;
pub mod reference;
pub mod schedule;

pub use constraints::{ConstraintModel, ConstraintModelBuilder};
pub use participant::{ParticipantId, Roster, MAX_PARTICIPANTS};
pub use participant_set::ParticipantSet;
pub use reference::{Reference, ReferenceMapping, ReferenceRole};
pub use schedule::{Invariant, Schedule, ScheduleViolation};
