#![warn(missing_docs)]
//! # payout-contract binary
//!
//! Runs the payout API contract checks named on the command line (all checks
//! when none are named) and exits non-zero when any of them fails. Argument
//! errors exit with clap's usage status.

use std::process::ExitCode;

use clap::Parser;
use payout_contract_app::{Cli, SuiteConfig, build_client, run_suite};
use tracing_subscriber::EnvFilter;

/// CLI entry point.
fn main() -> ExitCode {
    let cli = Cli::parse();
    let checks = cli.selected_checks();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = match SuiteConfig::from_env() {
        Ok(config) => config,
        Err(error) => {
            eprintln!("{error}");
            return ExitCode::from(2);
        }
    };

    let client = match build_client(&config) {
        Ok(client) => client,
        Err(error) => {
            eprintln!("{error}");
            return ExitCode::from(2);
        }
    };

    let report = run_suite(&client, &config, &checks);
    for outcome in &report.outcomes {
        let verdict = if outcome.passed { "PASS" } else { "FAIL" };
        println!("{verdict} {}: {}", outcome.check.name(), outcome.diagnostic);
    }

    if report.all_passed() {
        ExitCode::SUCCESS
    } else {
        eprintln!("{} of {} checks failed", report.failed_count(), report.outcomes.len());
        ExitCode::FAILURE
    }
}
