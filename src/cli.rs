// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Command line of the `santa` binary.

use clap::{Parser, ValueEnum};
use santa_search::model::{ConstraintModel, ReferenceMapping};
use santa_search::shuffle::DEFAULT_MAX_ATTEMPTS;
use santa_search::solver::{Progress, SearchOptions, DEFAULT_SOLUTION_CAP};
use santa_search::{demo, Result};
use std::sync::Arc;
use std::time::Duration;

/// How to produce the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Strategy {
    /// Exhaustive search with overlap minimization
    Search,
    /// Randomized shuffle and repair; hard constraints only
    Shuffle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "santa")]
#[command(version, about = "Plan a multi-round gift exchange that repeats as few earlier pairs as possible.")]
pub struct CommandLine {
    /// Participant (repeat; order is kept)
    #[arg(
        short = 'p',
        long = "participant",
        value_name = "NAME",
        required_unless_present = "demo"
    )]
    pub participants: Vec<String>,

    /// Number of rounds
    #[arg(short, long, default_value_t = 3)]
    pub rounds: usize,

    /// Pairs that must not be used, as Giver=Receiver1,Receiver2 (repeat)
    #[arg(long, value_name = "GIVER=RECEIVERS")]
    pub exclude: Vec<String>,

    /// Entry of the reference whose repeats are minimized first (repeat)
    #[arg(long, value_name = "GIVER=RECEIVERS")]
    pub primary: Vec<String>,

    /// Entry of the reference used to break ties (repeat)
    #[arg(long, value_name = "GIVER=RECEIVERS")]
    pub secondary: Vec<String>,

    /// Schedules kept per overlap level
    #[arg(long, env = "SANTA_SOLUTION_CAP", default_value_t = DEFAULT_SOLUTION_CAP)]
    pub cap: usize,

    /// Stop after visiting this many search nodes
    #[arg(long, value_name = "N")]
    pub max_nodes: Option<u64>,

    /// Stop after this many milliseconds
    #[arg(long, value_name = "MS")]
    pub time_limit_ms: Option<u64>,

    /// Seed for the random choice among equally good schedules
    #[arg(long, env = "SANTA_SEED")]
    pub seed: Option<u64>,

    #[arg(long, value_enum, default_value_t = Strategy::Search)]
    pub strategy: Strategy,

    /// Attempts before the shuffle strategy gives up
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: usize,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,

    /// Use the built-in eight-person exchange
    #[arg(long, conflicts_with = "participants")]
    pub demo: bool,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Build the constraint model from the arguments.
    pub fn model(&self) -> Result<ConstraintModel> {
        let mut builder = if self.demo {
            demo::builder(self.rounds)
        } else {
            ConstraintModel::builder(self.participants.iter().cloned(), self.rounds)
        };
        if !self.exclude.is_empty() {
            builder = builder.exclude("--exclude", mapping(&self.exclude)?);
        }
        if !self.primary.is_empty() {
            builder = builder.primary("--primary", mapping(&self.primary)?);
        }
        if !self.secondary.is_empty() {
            builder = builder.secondary("--secondary", mapping(&self.secondary)?);
        }
        builder.build()
    }

    pub fn options(&self) -> SearchOptions {
        SearchOptions {
            solution_cap: self.cap,
            max_nodes: self.max_nodes,
            time_limit: self.time_limit_ms.map(Duration::from_millis),
            progress: Some(Arc::new(|progress: &Progress| {
                tracing::info!(
                    level = progress.level,
                    solutions = progress.solutions,
                    nodes = progress.nodes_explored,
                    "still searching"
                );
            })),
            ..SearchOptions::default()
        }
    }
}

fn mapping(entries: &[String]) -> Result<ReferenceMapping> {
    let mut mapping = ReferenceMapping::new();
    for entry in entries {
        mapping.insert_entry(entry)?;
    }
    Ok(mapping)
}

#[cfg(test)]
mod tests {
    use super::*;
    use santa_search::ScheduleError;

    fn parse(args: &[&str]) -> CommandLine {
        CommandLine::try_parse_from(std::iter::once("santa").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["-p", "A", "-p", "B", "-p", "C", "-p", "D"]);
        assert_eq!(cli.participants, ["A", "B", "C", "D"]);
        assert_eq!(cli.rounds, 3);
        assert_eq!(cli.strategy, Strategy::Search);
        assert_eq!(cli.format, Format::Text);
        assert_eq!(cli.options().time_limit, None);
        assert!(cli.model().is_ok());
    }

    #[test]
    fn test_references_from_entries() {
        let cli = parse(&[
            "-p", "A", "-p", "B", "-p", "C", "-r", "1",
            "--exclude", "A=B",
            "--primary", "B=C,A",
            "--primary", "C=A",
            "--time-limit-ms", "250",
        ]);
        let model = cli.model().unwrap();
        assert_eq!(model.exclusions().count(), 1);
        let primary = model.primary().unwrap();
        let [a, b, c] = ["A", "B", "C"].map(|name| model.roster().id(name).unwrap());
        assert!(primary.contains(b, a));
        assert!(primary.contains(c, a));
        assert!(!primary.contains(a, b));
        assert_eq!(cli.options().time_limit, Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_bad_entry() {
        let cli = parse(&["-p", "A", "-p", "B", "-r", "1", "--exclude", "A"]);
        assert!(matches!(cli.model(), Err(ScheduleError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_demo_needs_no_participants() {
        let cli = parse(&["--demo", "--format", "json", "--strategy", "shuffle"]);
        assert_eq!(cli.model().unwrap().participant_count(), 8);
        assert_eq!(cli.format, Format::Json);
        assert_eq!(cli.strategy, Strategy::Shuffle);
    }

    #[test]
    fn test_participants_required() {
        assert!(CommandLine::try_parse_from(["santa", "-r", "2"]).is_err());
    }
}
