// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! AssignPredicate - chooses a receiver for one giver in one round.
//!
//! The predicate runs once per slot, where slot `s` is giver `s % n` in round
//! `s / n`. Rounds are filled giver by giver in roster order; each round
//! starts with no receivers used while the per-giver history carries over.

use crate::context::{Halt, SearchContext};
use crate::engine::{Predicate, PredicateResult};
use crate::model::{ConstraintModel, ParticipantId, ParticipantSet};
use crate::state::statistics::Counters;

/// Chooses receivers slot by slot, pruning on feasibility and on the overlap bound.
///
/// For giver `g` in round `r` the candidates are
/// `legal(g) − history(g) − used(r)`, tried in ascending roster order.
#[derive(Debug)]
pub struct AssignPredicate {
    participants: usize,
    /// Candidate receivers per slot, filled by try_pred.
    candidates: Vec<Vec<ParticipantId>>,
}

impl AssignPredicate {
    pub fn new(model: &ConstraintModel) -> Self {
        let participants = model.participant_count();
        Self {
            participants,
            candidates: vec![Vec::new(); participants * model.rounds()],
        }
    }

    fn slot(&self, slot: usize) -> (usize, ParticipantId) {
        (slot / self.participants, ParticipantId::new(slot % self.participants))
    }
}

/// Receivers `giver` could still take in a round where `used` are already taken.
fn available(ctx: &SearchContext<'_>, giver: ParticipantId, used: ParticipantSet) -> ParticipantSet {
    ctx.model
        .legal_receivers(giver)
        .difference(ctx.state.history(giver))
        .difference(used)
}

impl Predicate for AssignPredicate {
    fn try_pred(&mut self, ctx: &mut SearchContext<'_>, slot: usize) -> PredicateResult {
        if slot == self.candidates.len() {
            return PredicateResult::Success;
        }
        if ctx.budget_exhausted() {
            ctx.halt(Halt::BudgetExhausted);
            return PredicateResult::Suspend;
        }
        ctx.count(Counters::NodesExplored);

        let (round, giver) = self.slot(slot);
        let used = ctx.state.used_in_round(round);

        // Every giver still to be served this round needs a receiver left.
        let stuck = (giver.index()..self.participants)
            .map(ParticipantId::new)
            .any(|later| available(ctx, later, used).is_empty());
        if stuck {
            ctx.count(Counters::FeasibilityPrunes);
            return PredicateResult::Failure;
        }

        let options = &mut self.candidates[slot];
        options.clear();
        options.extend(available(ctx, giver, used).iter());
        PredicateResult::Choices(options.len())
    }

    fn retry_pred(&mut self, ctx: &mut SearchContext<'_>, slot: usize, choice: usize) -> PredicateResult {
        let (round, giver) = self.slot(slot);
        let receiver = self.candidates[slot][choice];

        let shared = ctx
            .model
            .primary()
            .is_some_and(|primary| primary.contains(giver, receiver));
        if shared && ctx.state.overlap() + 1 > ctx.limits.max_overlap {
            ctx.count(Counters::OverlapPrunes);
            return PredicateResult::Failure;
        }

        ctx.assign(round, giver, receiver, shared);
        PredicateResult::SuccessSamePredicate
    }

    fn name(&self) -> &str {
        "Assign"
    }
}
