// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Reference schedules from previous exchanges.
//!
//! A caller supplies a [`ReferenceMapping`] by name (giver → receivers). The
//! constraint model resolves it against the roster into a [`Reference`], which
//! holds a precomputed forbidden set per giver for O(1) pair lookups.

use super::participant::{ParticipantId, Roster};
use super::participant_set::ParticipantSet;
use super::schedule::Schedule;
use crate::error::{Result, ScheduleError};
use serde::Serialize;
use std::fmt;

/// How the search treats the pairs of a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceRole {
    /// Pairs that must never be assigned.
    Exclusion,
    /// Overlap is minimized first, by iterative deepening.
    Primary,
    /// Overlap is minimized among the primary-minimal schedules.
    Secondary,
}

impl fmt::Display for ReferenceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ReferenceRole::Exclusion => "exclusion",
            ReferenceRole::Primary => "primary",
            ReferenceRole::Secondary => "secondary",
        };
        f.write_str(label)
    }
}

/// An unresolved giver → receivers mapping, keyed by participant name.
///
/// Entries for the same giver are merged; giver order is kept.
///
/// # Example
///
/// ```
/// use santa_search::model::ReferenceMapping;
///
/// let mapping: ReferenceMapping = vec![
///     ("Ann", vec!["Bob", "Cid"]),
///     ("Bob", vec!["Ann"]),
/// ]
/// .into_iter()
/// .collect();
///
/// assert_eq!(mapping.receivers("Ann"), Some(&["Bob".to_string(), "Cid".to_string()][..]));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceMapping {
    entries: Vec<(String, Vec<String>)>,
}

impl ReferenceMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add receivers for a giver, merging with any earlier entry for the same giver.
    pub fn insert<G, I, R>(&mut self, giver: G, receivers: I)
    where
        G: Into<String>,
        I: IntoIterator<Item = R>,
        R: Into<String>,
    {
        let giver = giver.into();
        let receivers = receivers.into_iter().map(Into::into);
        match self.entries.iter_mut().find(|(name, _)| *name == giver) {
            Some((_, existing)) => existing.extend(receivers),
            None => self.entries.push((giver, receivers.collect())),
        }
    }

    /// Parse and add one `Giver=Receiver1,Receiver2` entry.
    pub fn insert_entry(&mut self, entry: &str) -> Result<()> {
        let (giver, receivers) = Self::parse_entry(entry)?;
        self.insert(giver, receivers);
        Ok(())
    }

    /// Parse a `Giver=Receiver1,Receiver2` entry.
    ///
    /// Whitespace around names is ignored; an empty receiver list is allowed.
    pub fn parse_entry(entry: &str) -> Result<(String, Vec<String>)> {
        let (giver, receivers) = entry.split_once('=').ok_or_else(|| {
            ScheduleError::config(format!(
                "reference entry '{}' must look like Giver=Receiver1,Receiver2",
                entry
            ))
        })?;
        let giver = giver.trim();
        if giver.is_empty() {
            return Err(ScheduleError::config(format!(
                "reference entry '{}' has no giver",
                entry
            )));
        }
        let receivers = receivers
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(String::from)
            .collect();
        Ok((giver.to_string(), receivers))
    }

    /// Receivers listed for a giver.
    pub fn receivers(&self, giver: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(name, _)| name == giver)
            .map(|(_, receivers)| receivers.as_slice())
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(giver, receivers)| (giver.as_str(), receivers.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<G, I, R> FromIterator<(G, I)> for ReferenceMapping
where
    G: Into<String>,
    I: IntoIterator<Item = R>,
    R: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (G, I)>>(iter: T) -> Self {
        let mut mapping = Self::new();
        for (giver, receivers) in iter {
            mapping.insert(giver, receivers);
        }
        mapping
    }
}

/// A reference resolved against a roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    name: String,
    role: ReferenceRole,
    /// Receivers per giver, in the order given.
    lists: Vec<Vec<ParticipantId>>,
    /// The same receivers per giver, as a set.
    forbidden: Vec<ParticipantSet>,
}

impl Reference {
    /// Resolve a mapping, rejecting any name that is not on the roster.
    ///
    /// Givers missing from the mapping get an empty list.
    pub fn resolve(
        name: impl Into<String>,
        role: ReferenceRole,
        mapping: &ReferenceMapping,
        roster: &Roster,
    ) -> Result<Self> {
        let name = name.into();
        let mut lists = vec![Vec::new(); roster.len()];
        let mut forbidden = vec![ParticipantSet::empty(); roster.len()];

        for (giver, receivers) in mapping.entries() {
            let giver = roster.resolve(giver).map_err(|err| in_reference(&name, err))?;
            for receiver in receivers {
                let receiver = roster
                    .resolve(receiver)
                    .map_err(|err| in_reference(&name, err))?;
                lists[giver.index()].push(receiver);
                forbidden[giver.index()].insert(receiver);
            }
        }

        Ok(Self {
            name,
            role,
            lists,
            forbidden,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> ReferenceRole {
        self.role
    }

    /// Whether `giver → receiver` appears in this reference.
    pub fn contains(&self, giver: ParticipantId, receiver: ParticipantId) -> bool {
        self.forbidden[giver.index()].contains(receiver)
    }

    /// Receivers of `giver` in this reference, as a set.
    pub fn forbidden(&self, giver: ParticipantId) -> ParticipantSet {
        self.forbidden[giver.index()]
    }

    /// Receivers of `giver` in this reference, in the order given.
    pub fn receivers(&self, giver: ParticipantId) -> &[ParticipantId] {
        &self.lists[giver.index()]
    }

    /// Overlap between a schedule and this reference.
    ///
    /// Sum over givers of the size of the intersection of the giver's receivers
    /// with the reference list. Round positions are ignored.
    pub fn overlap(&self, schedule: &Schedule) -> usize {
        schedule
            .givers()
            .map(|giver| self.shared(schedule, giver).len())
            .sum()
    }

    /// Receivers of `giver` in `schedule` that also appear in this reference.
    pub fn shared(&self, schedule: &Schedule, giver: ParticipantId) -> ParticipantSet {
        schedule
            .received_set(giver)
            .intersection(self.forbidden[giver.index()])
    }
}

fn in_reference(name: &str, err: ScheduleError) -> ScheduleError {
    match err {
        ScheduleError::InvalidConfiguration(message) => {
            ScheduleError::config(format!("reference '{}': {}", name, message))
        }
        other => other,
    }
}
