// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! The constraint model: roster, round count and reference schedules.
//!
//! The model is immutable once built. It precomputes, per giver, the set of
//! legal receivers (everyone except the giver and any hard-excluded pair),
//! which is the starting point for every candidate list in the search.

use super::participant::{ParticipantId, Roster};
use super::participant_set::ParticipantSet;
use super::reference::{Reference, ReferenceMapping, ReferenceRole};
use super::schedule::Schedule;
use crate::error::{Result, ScheduleError};

/// Immutable description of one gift exchange.
#[derive(Debug, Clone)]
pub struct ConstraintModel {
    roster: Roster,
    rounds: usize,
    references: Vec<Reference>,
    primary: Option<usize>,
    secondary: Option<usize>,
    /// Per giver: everyone except the giver and hard-excluded receivers.
    legal: Vec<ParticipantSet>,
}

impl ConstraintModel {
    /// Start building a model for `participants` (in iteration order) and `rounds`.
    ///
    /// # Example
    ///
    /// ```
    /// use santa_search::model::{ConstraintModel, ReferenceMapping};
    ///
    /// let last_year: ReferenceMapping = vec![("Ann", vec!["Bob"])].into_iter().collect();
    /// let model = ConstraintModel::builder(["Ann", "Bob", "Cid"], 2)
    ///     .primary("last year", last_year)
    ///     .build()
    ///     .unwrap();
    ///
    /// let ann = model.roster().id("Ann").unwrap();
    /// let bob = model.roster().id("Bob").unwrap();
    /// assert!(model.is_forbidden(ann, bob, 0));
    /// ```
    pub fn builder<I, S>(participants: I, rounds: usize) -> ConstraintModelBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ConstraintModelBuilder {
            participants: participants.into_iter().map(Into::into).collect(),
            rounds,
            references: Vec::new(),
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn participant_count(&self) -> usize {
        self.roster.len()
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// All references in the order they were added.
    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    pub fn reference(&self, set_index: usize) -> Option<&Reference> {
        self.references.get(set_index)
    }

    /// The reference whose overlap is minimized first.
    pub fn primary(&self) -> Option<&Reference> {
        self.primary.map(|index| &self.references[index])
    }

    /// The reference used to break ties among primary-minimal schedules.
    pub fn secondary(&self) -> Option<&Reference> {
        self.secondary.map(|index| &self.references[index])
    }

    /// The hard exclusion references.
    pub fn exclusions(&self) -> impl Iterator<Item = &Reference> {
        self.references
            .iter()
            .filter(|reference| reference.role() == ReferenceRole::Exclusion)
    }

    /// Whether `giver → receiver` is listed in reference `set_index`.
    ///
    /// An index with no reference forbids nothing.
    pub fn is_forbidden(&self, giver: ParticipantId, receiver: ParticipantId, set_index: usize) -> bool {
        self.reference(set_index)
            .is_some_and(|reference| reference.contains(giver, receiver))
    }

    /// Total overlap between a schedule and a reference.
    pub fn overlap_of(&self, schedule: &Schedule, reference: &Reference) -> usize {
        reference.overlap(schedule)
    }

    /// Receivers `giver` may ever be assigned, before per-search state is applied.
    pub fn legal_receivers(&self, giver: ParticipantId) -> ParticipantSet {
        self.legal[giver.index()]
    }

    /// The largest overlap any schedule could have with a reference.
    pub fn max_overlap(&self) -> usize {
        self.roster.len() * self.rounds
    }
}

/// Builder for [`ConstraintModel`]. All validation happens in [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct ConstraintModelBuilder {
    participants: Vec<String>,
    rounds: usize,
    references: Vec<(String, ReferenceRole, ReferenceMapping)>,
}

impl ConstraintModelBuilder {
    /// Add a hard exclusion reference. Any number may be added.
    pub fn exclude(mut self, name: impl Into<String>, mapping: ReferenceMapping) -> Self {
        self.references
            .push((name.into(), ReferenceRole::Exclusion, mapping));
        self
    }

    /// Set the reference whose overlap is minimized.
    pub fn primary(mut self, name: impl Into<String>, mapping: ReferenceMapping) -> Self {
        self.references
            .push((name.into(), ReferenceRole::Primary, mapping));
        self
    }

    /// Set the reference used to break ties.
    pub fn secondary(mut self, name: impl Into<String>, mapping: ReferenceMapping) -> Self {
        self.references
            .push((name.into(), ReferenceRole::Secondary, mapping));
        self
    }

    /// Validate the configuration and build the model.
    pub fn build(self) -> Result<ConstraintModel> {
        if self.rounds == 0 {
            return Err(ScheduleError::config("at least one round is required"));
        }
        let roster = Roster::new(self.participants)?;
        if roster.len() < self.rounds + 1 {
            return Err(ScheduleError::config(format!(
                "{} rounds need at least {} participants, got {}",
                self.rounds,
                self.rounds + 1,
                roster.len()
            )));
        }

        let mut references = Vec::with_capacity(self.references.len());
        let mut primary = None;
        let mut secondary = None;
        for (index, (name, role, mapping)) in self.references.into_iter().enumerate() {
            let slot = match role {
                ReferenceRole::Primary => Some(&mut primary),
                ReferenceRole::Secondary => Some(&mut secondary),
                ReferenceRole::Exclusion => None,
            };
            if let Some(slot) = slot {
                if slot.replace(index).is_some() {
                    return Err(ScheduleError::config(format!(
                        "only one {} reference is allowed",
                        role
                    )));
                }
            }
            references.push(Reference::resolve(name, role, &mapping, &roster)?);
        }

        let everyone = ParticipantSet::first(roster.len());
        let legal = roster
            .ids()
            .map(|giver| {
                references
                    .iter()
                    .filter(|reference| reference.role() == ReferenceRole::Exclusion)
                    .fold(everyone.without(giver), |legal, reference| {
                        legal.difference(reference.forbidden(giver))
                    })
            })
            .collect();

        Ok(ConstraintModel {
            roster,
            rounds: self.rounds,
            references,
            primary,
            secondary,
            legal,
        })
    }
}
