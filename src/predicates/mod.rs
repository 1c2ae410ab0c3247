// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Search predicates.
//!
//! A level search is the two-predicate program
//! `AssignPredicate → RecordSolutionPredicate`:
//!
//! - `assign`: one receiver per (round, giver) slot, chosen a receiver with
//!   feasibility and overlap pruning
//! - `record`: terminal; checks the finished schedule and stores it

pub mod assign;
pub mod record;

pub use assign::AssignPredicate;
pub use record::RecordSolutionPredicate;
