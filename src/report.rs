// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Rendering an [`Outcome`] for people (text) and programs (JSON).

use crate::model::{ConstraintModel, Invariant, ReferenceRole};
use crate::solver::Outcome;
use serde::Serialize;
use std::fmt;
use strum::IntoEnumIterator;

/// A finished outcome together with the model it was produced for.
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    model: &'a ConstraintModel,
    outcome: &'a Outcome,
}

/// One giver and their receivers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row<'a> {
    pub giver: &'a str,
    pub receivers: Vec<&'a str>,
}

/// How the schedule relates to one reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceSummary<'a> {
    pub name: &'a str,
    pub role: ReferenceRole,
    pub overlap: usize,
    /// Per giver, the receivers also listed in the reference.
    pub shared: Vec<Row<'a>>,
}

/// Result of one invariant check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Check {
    pub invariant: &'static str,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violation: Option<String>,
}

/// Search counters as reported.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchSummary {
    pub primary_overlap: Option<usize>,
    pub secondary_overlap: Option<usize>,
    pub primary_candidates: usize,
    pub secondary_candidates: Option<usize>,
    pub truncated: bool,
    pub levels_searched: usize,
    pub nodes_explored: u64,
    pub branches_pruned: u64,
    pub elapsed_ms: f64,
}

/// Everything in the report, in serializable form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary<'a> {
    pub rounds: usize,
    pub schedule: Vec<Row<'a>>,
    pub references: Vec<ReferenceSummary<'a>>,
    pub checks: Vec<Check>,
    pub search: SearchSummary,
}

impl<'a> Report<'a> {
    pub fn new(model: &'a ConstraintModel, outcome: &'a Outcome) -> Self {
        Self { model, outcome }
    }

    pub fn summary(&self) -> Summary<'a> {
        let model = self.model;
        let outcome = self.outcome;
        let roster = model.roster();
        let schedule = &outcome.schedule;

        let rows = schedule
            .named(roster)
            .map(|(giver, receivers)| Row { giver, receivers })
            .collect();

        let references = model
            .references()
            .iter()
            .map(|reference| ReferenceSummary {
                name: reference.name(),
                role: reference.role(),
                overlap: model.overlap_of(schedule, reference),
                shared: schedule
                    .givers()
                    .map(|giver| Row {
                        giver: roster.name(giver),
                        receivers: reference
                            .shared(schedule, giver)
                            .iter()
                            .map(|receiver| roster.name(receiver))
                            .collect(),
                    })
                    .collect(),
            })
            .collect();

        let checks = Invariant::iter()
            .map(|invariant| {
                let violation = schedule.check(invariant, model).err();
                Check {
                    invariant: invariant.description(),
                    passed: violation.is_none(),
                    violation: violation.map(|v| v.to_string()),
                }
            })
            .collect();

        Summary {
            rounds: model.rounds(),
            schedule: rows,
            references,
            checks,
            search: SearchSummary {
                primary_overlap: outcome.primary_overlap,
                secondary_overlap: outcome.secondary_overlap,
                primary_candidates: outcome.primary_candidates,
                secondary_candidates: outcome.secondary_candidates,
                truncated: outcome.truncated,
                levels_searched: outcome.levels_searched,
                nodes_explored: outcome.nodes_explored,
                branches_pruned: outcome.branches_pruned,
                elapsed_ms: outcome.elapsed.as_secs_f64() * 1000.0,
            },
        }
    }

    /// The summary as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.summary())
    }
}

fn or_dash(names: &[&str]) -> String {
    if names.is_empty() {
        "-".to_string()
    } else {
        names.join(", ")
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.summary();

        let width = summary
            .schedule
            .iter()
            .map(|row| row.giver.chars().count())
            .chain(std::iter::once("Giver".len()))
            .max()
            .unwrap_or(0)
            + 2;

        writeln!(f, "Schedule ({} rounds)", summary.rounds)?;
        write!(f, "{:<width$}", "Giver")?;
        for round in 1..=summary.rounds {
            write!(f, "{:<width$}", format!("Round {}", round))?;
        }
        writeln!(f)?;
        for row in &summary.schedule {
            write!(f, "{:<width$}", row.giver)?;
            for receiver in &row.receivers {
                write!(f, "{:<width$}", receiver)?;
            }
            writeln!(f)?;
        }

        for reference in &summary.references {
            writeln!(f)?;
            writeln!(
                f,
                "Reference '{}' ({}): {} shared pairs",
                reference.name, reference.role, reference.overlap
            )?;
            for row in &reference.shared {
                writeln!(f, "  {:<width$}{}", row.giver, or_dash(&row.receivers))?;
            }
        }

        writeln!(f)?;
        writeln!(f, "Checks")?;
        for check in &summary.checks {
            match &check.violation {
                None => writeln!(f, "  [ok]     {}", check.invariant)?,
                Some(violation) => writeln!(f, "  [FAILED] {}: {}", check.invariant, violation)?,
            }
        }

        let search = &summary.search;
        writeln!(f)?;
        writeln!(f, "Search")?;
        if let Some(overlap) = search.primary_overlap {
            writeln!(
                f,
                "  primary overlap:    {} ({} candidates)",
                overlap, search.primary_candidates
            )?;
        } else {
            writeln!(f, "  candidates:         {}", search.primary_candidates)?;
        }
        if let (Some(overlap), Some(candidates)) = (search.secondary_overlap, search.secondary_candidates) {
            writeln!(
                f,
                "  secondary overlap:  {} ({} candidates)",
                overlap, candidates
            )?;
        }
        writeln!(f, "  levels searched:    {}", search.levels_searched)?;
        writeln!(f, "  nodes explored:     {}", search.nodes_explored)?;
        writeln!(f, "  branches pruned:    {}", search.branches_pruned)?;
        writeln!(f, "  elapsed:            {:.1} ms", search.elapsed_ms)?;
        if search.truncated {
            writeln!(
                f,
                "  warning: the search was cut short; the candidate count is a lower bound"
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ReferenceMapping, Schedule};
    use std::time::Duration;

    fn fixture() -> (ConstraintModel, Outcome) {
        let previous: ReferenceMapping = vec![("A", vec!["B"])].into_iter().collect();
        let model = ConstraintModel::builder(["A", "B", "C"], 1)
            .primary("previous", previous)
            .build()
            .unwrap();
        let schedule = Schedule::from_names(
            model.roster(),
            vec![("A", vec!["B"]), ("B", vec!["C"]), ("C", vec!["A"])],
        )
        .unwrap();
        let outcome = Outcome::unsearched(&model, schedule, Duration::from_millis(2));
        (model, outcome)
    }

    #[test]
    fn test_summary() {
        let (model, outcome) = fixture();
        let summary = Report::new(&model, &outcome).summary();

        assert_eq!(summary.schedule[0], Row { giver: "A", receivers: vec!["B"] });
        assert_eq!(summary.references.len(), 1);
        assert_eq!(summary.references[0].overlap, 1);
        assert_eq!(summary.references[0].shared[0].receivers, vec!["B"]);
        assert!(summary.references[0].shared[1].receivers.is_empty());
        assert_eq!(summary.checks.len(), 5);
        assert!(summary.checks.iter().all(|check| check.passed));
    }

    #[test]
    fn test_text_report() {
        let (model, outcome) = fixture();
        let text = Report::new(&model, &outcome).to_string();

        assert!(text.contains("Schedule (1 rounds)"));
        assert!(text.contains("Reference 'previous' (primary): 1 shared pairs"));
        assert!(text.contains("[ok]     nobody gives to themselves"));
        assert!(text.contains("primary overlap:    1 (1 candidates)"));
        assert!(!text.contains("warning"));
    }

    #[test]
    fn test_truncation_warning() {
        let (model, mut outcome) = fixture();
        outcome.truncated = true;
        let text = Report::new(&model, &outcome).to_string();
        assert!(text.contains("lower bound"));
    }

    #[test]
    fn test_json_report() {
        let (model, outcome) = fixture();
        let json = Report::new(&model, &outcome).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["rounds"], 1);
        assert_eq!(value["schedule"][2]["giver"], "C");
        assert_eq!(value["references"][0]["role"], "primary");
        assert_eq!(value["search"]["primary_overlap"], 1);
        assert_eq!(value["checks"][0]["passed"], true);
        assert!(value["checks"][0].get("violation").is_none());
    }
}
