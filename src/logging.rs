// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Logging setup with `tracing-subscriber`.
//!
//! Events go to stderr so that stdout carries only the report.

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber.
///
/// `RUST_LOG` overrides the default `info` filter, for example
/// `RUST_LOG=santa_search=debug` to see progress snapshots.
///
/// ```no_run
/// santa_search::logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Subscriber for tests: debug level, captured by the test harness. Safe to
/// call more than once.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
