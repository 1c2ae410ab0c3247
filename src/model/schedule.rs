// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Finished schedules and the invariants every schedule must satisfy.

use super::constraints::ConstraintModel;
use super::participant::{ParticipantId, Roster};
use super::participant_set::ParticipantSet;
use crate::error::{Result, ScheduleError};
use strum_macros::EnumIter;
use thiserror::Error;

/// A complete assignment: for every giver, one receiver per round.
///
/// Rows are indexed by giver id; `receivers(g)[r]` is who `g` gives to in round `r`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Schedule {
    rows: Vec<Vec<ParticipantId>>,
}

impl Schedule {
    /// Build a schedule from rows indexed by giver id.
    pub fn from_rows(rows: Vec<Vec<ParticipantId>>) -> Self {
        Self { rows }
    }

    /// Build a schedule from named rows. Every roster member must appear
    /// exactly once as a giver.
    pub fn from_names<G, I, R>(roster: &Roster, rows: impl IntoIterator<Item = (G, I)>) -> Result<Self>
    where
        G: AsRef<str>,
        I: IntoIterator<Item = R>,
        R: AsRef<str>,
    {
        let mut resolved: Vec<Option<Vec<ParticipantId>>> = vec![None; roster.len()];
        for (giver, receivers) in rows {
            let giver = roster.resolve(giver.as_ref())?;
            let receivers = receivers
                .into_iter()
                .map(|name| roster.resolve(name.as_ref()))
                .collect::<Result<Vec<_>>>()?;
            if resolved[giver.index()].replace(receivers).is_some() {
                return Err(ScheduleError::config(format!(
                    "giver '{}' appears more than once",
                    roster.name(giver)
                )));
            }
        }

        let rows = resolved
            .into_iter()
            .enumerate()
            .map(|(index, row)| {
                row.ok_or_else(|| {
                    ScheduleError::config(format!(
                        "giver '{}' is missing",
                        roster.name(ParticipantId::new(index))
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rows })
    }

    /// Number of givers (rows).
    pub fn giver_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of rounds, taken from the first row.
    pub fn rounds(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// All giver ids in roster order.
    pub fn givers(&self) -> impl Iterator<Item = ParticipantId> {
        (0..self.rows.len()).map(ParticipantId::new)
    }

    /// Receivers of `giver`, in round order.
    pub fn receivers(&self, giver: ParticipantId) -> &[ParticipantId] {
        &self.rows[giver.index()]
    }

    /// Receiver of `giver` in `round`, if present.
    pub fn receiver(&self, giver: ParticipantId, round: usize) -> Option<ParticipantId> {
        self.rows.get(giver.index())?.get(round).copied()
    }

    /// Receivers of `giver` across all rounds, as a set.
    pub fn received_set(&self, giver: ParticipantId) -> ParticipantSet {
        ParticipantSet::from_ids(self.receivers(giver))
    }

    /// Named view of the schedule, in roster order.
    pub fn named<'r>(&'r self, roster: &'r Roster) -> impl Iterator<Item = (&'r str, Vec<&'r str>)> + 'r {
        self.givers().map(move |giver| {
            let receivers = self
                .receivers(giver)
                .iter()
                .map(|&receiver| roster.name(receiver))
                .collect();
            (roster.name(giver), receivers)
        })
    }

    /// Check one invariant against a model.
    pub fn check(
        &self,
        invariant: Invariant,
        model: &ConstraintModel,
    ) -> std::result::Result<(), ScheduleViolation> {
        let roster = model.roster();
        let rounds = model.rounds();
        match invariant {
            Invariant::RoundCount => {
                if self.rows.len() != roster.len() {
                    return Err(ScheduleViolation::WrongGiverCount {
                        found: self.rows.len(),
                        expected: roster.len(),
                    });
                }
                for giver in self.givers() {
                    let found = self.receivers(giver).len();
                    if found != rounds {
                        return Err(ScheduleViolation::WrongLength {
                            giver: roster.name(giver).to_string(),
                            found,
                            expected: rounds,
                        });
                    }
                }
            }
            Invariant::NoSelfGift => {
                for giver in self.givers() {
                    if let Some(round) = self.receivers(giver).iter().position(|&r| r == giver) {
                        return Err(ScheduleViolation::SelfGift {
                            giver: roster.name(giver).to_string(),
                            round: round + 1,
                        });
                    }
                }
            }
            Invariant::DistinctReceivers => {
                for giver in self.givers() {
                    let mut seen = ParticipantSet::empty();
                    for &receiver in self.receivers(giver) {
                        if seen.contains(receiver) {
                            return Err(ScheduleViolation::RepeatedReceiver {
                                giver: roster.name(giver).to_string(),
                                receiver: roster.name(receiver).to_string(),
                            });
                        }
                        seen.insert(receiver);
                    }
                }
            }
            Invariant::RoundPermutation => {
                for round in 0..rounds {
                    let mut counts = vec![0usize; roster.len()];
                    for giver in self.givers() {
                        if let Some(receiver) = self.receiver(giver, round) {
                            counts[receiver.index()] += 1;
                        }
                    }
                    if let Some((index, &count)) = counts.iter().enumerate().find(|&(_, &c)| c != 1) {
                        return Err(ScheduleViolation::RoundNotPermutation {
                            round: round + 1,
                            receiver: roster.name(ParticipantId::new(index)).to_string(),
                            count,
                        });
                    }
                }
            }
            Invariant::Exclusions => {
                for reference in model.exclusions() {
                    for giver in self.givers() {
                        if let Some(receiver) = reference.shared(self, giver).iter().next() {
                            return Err(ScheduleViolation::ExcludedPair {
                                giver: roster.name(giver).to_string(),
                                receiver: roster.name(receiver).to_string(),
                                reference: reference.name().to_string(),
                            });
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Check every invariant, reporting the first violation.
    pub fn validate(&self, model: &ConstraintModel) -> std::result::Result<(), ScheduleViolation> {
        use strum::IntoEnumIterator;
        Invariant::iter().try_for_each(|invariant| self.check(invariant, model))
    }
}

/// The invariants of a valid schedule, in checking order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum Invariant {
    /// Every giver has exactly `rounds` receivers.
    RoundCount,
    /// Nobody gives to themselves.
    NoSelfGift,
    /// Nobody gives to the same person twice.
    DistinctReceivers,
    /// In every round everybody receives exactly once.
    RoundPermutation,
    /// No pair from an exclusion reference is used.
    Exclusions,
}

impl Invariant {
    pub fn description(self) -> &'static str {
        match self {
            Invariant::RoundCount => "every giver has one receiver per round",
            Invariant::NoSelfGift => "nobody gives to themselves",
            Invariant::DistinctReceivers => "nobody gives to the same person twice",
            Invariant::RoundPermutation => "everybody receives exactly once per round",
            Invariant::Exclusions => "no excluded pair is used",
        }
    }
}

/// A broken schedule invariant. Rounds are numbered from 1.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleViolation {
    #[error("schedule has {found} givers, expected {expected}")]
    WrongGiverCount { found: usize, expected: usize },

    #[error("{giver} has {found} receivers, expected {expected}")]
    WrongLength {
        giver: String,
        found: usize,
        expected: usize,
    },

    #[error("{giver} gives to themselves in round {round}")]
    SelfGift { giver: String, round: usize },

    #[error("{giver} gives to {receiver} more than once")]
    RepeatedReceiver { giver: String, receiver: String },

    #[error("round {round}: {receiver} receives {count} gifts")]
    RoundNotPermutation {
        round: usize,
        receiver: String,
        count: usize,
    },

    #[error("{giver} -> {receiver} is excluded by reference '{reference}'")]
    ExcludedPair {
        giver: String,
        receiver: String,
        reference: String,
    },
}
