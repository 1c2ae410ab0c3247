// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Multi-round gift exchange scheduling.
//!
//! Every participant gives one gift per round to someone else, never to the
//! same person twice, and every round is a permutation: everybody receives
//! exactly once. Schedules from earlier years can be given as references,
//! either as hard exclusions or as soft references whose repeated pairs are
//! minimized.
//!
//! # Architecture
//!
//! The implementation uses a two-tier memory model:
//!
//! ## Tier 1: Constraint model (Immutable)
//!
//! Built once and validated before any search:
//! - Roster of participants and the round count
//! - References with a forbidden set per giver for O(1) pair lookups
//! - Per giver, the receivers allowed after hard exclusions
//!
//! ## Tier 2: DYNAMIC Data (Mutable)
//!
//! Search state that changes during search, tracked on the trail:
//! - Trail - records state changes for O(1) backtracking
//! - Receiver per (round, giver), receivers used per round, history per giver
//! - Overlap with the primary reference
//!
//! # Search Algorithm
//!
//! 1. **AssignPredicate**: one receiver per (round, giver) slot. Prunes a branch when a
//!    giver still to be served this round has no receiver left, and rejects
//!    a receiver that would push the overlap past the level's bound.
//! 2. **RecordSolutionPredicate**: re-checks the overlap of the finished
//!    schedule and records it, up to the solution cap.
//!
//! The [`solver`] raises the overlap bound from 0 until a level has schedules,
//! then [`solver::select`] picks one, minimizing the secondary reference
//! first when there is one.
//!
//! # Example
//!
//! ```
//! use santa_search::model::{ConstraintModel, ReferenceMapping};
//! use santa_search::solver::{SearchOptions, Solver};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let last_year: ReferenceMapping = vec![
//!     ("Ann", vec!["Bob"]),
//!     ("Bob", vec!["Cid"]),
//!     ("Cid", vec!["Dee"]),
//!     ("Dee", vec!["Ann"]),
//! ]
//! .into_iter()
//! .collect();
//! let model = ConstraintModel::builder(["Ann", "Bob", "Cid", "Dee"], 1)
//!     .primary("last year", last_year)
//!     .build()?;
//!
//! let mut rng = StdRng::seed_from_u64(2025);
//! let outcome = Solver::new(&model, SearchOptions::default()).solve(&mut rng)?;
//! assert_eq!(outcome.primary_overlap, Some(0));
//! # Ok::<(), santa_search::ScheduleError>(())
//! ```

pub mod context;
pub mod demo;
pub mod engine;
pub mod error;
pub mod logging;
pub mod model;
pub mod predicates;
pub mod report;
pub mod shuffle;
pub mod solver;
pub mod state;
pub mod trail;

// Re-export commonly used types
pub use context::SearchContext;
pub use engine::{EngineBuilder, Predicate, PredicateResult, SearchEngine};
pub use error::{Result, ScheduleError};
pub use model::{ConstraintModel, ReferenceMapping, Schedule};
pub use report::Report;
pub use solver::{Outcome, SearchOptions, Solver};
pub use trail::Trail;
