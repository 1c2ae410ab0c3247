// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

mod cli;

use anyhow::Context;
use cli::{CommandLine, Format, Strategy};
use rand::rngs::StdRng;
use rand::SeedableRng;
use santa_search::{logging, shuffle, Report, Solver};

fn main() -> anyhow::Result<()> {
    let args = CommandLine::parse_args();
    logging::init();

    let model = args.model().context("could not set up the exchange")?;
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let outcome = match args.strategy {
        Strategy::Search => Solver::new(&model, args.options()).solve(&mut rng)?,
        Strategy::Shuffle => shuffle::solve(&model, args.max_attempts, &mut rng)?,
    };

    let report = Report::new(&model, &outcome);
    match args.format {
        Format::Text => print!("{}", report),
        Format::Json => println!("{}", report.to_json()?),
    }
    Ok(())
}
