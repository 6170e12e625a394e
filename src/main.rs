//! diffout: run a command per input file, compare the produced output
//! files against a saved baseline, and write a browsable side-by-side HTML
//! diff report.
use anyhow::Result;
use clap::Parser;
use std::collections::BTreeSet;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod classify;
mod cli;
mod config;
mod decode;
mod diff;
mod error;
mod report;
mod runner;
mod scan;
mod store;
mod summary;

use config::RunConfig;
use summary::RunSummary;

fn main() -> ExitCode {
    let args = cli::Args::parse();
    init_tracing(&args);
    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        // Differences or failed commands: reported, not fatal.
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            error!("{err:#}");
            ExitCode::from(2)
        }
    }
}

fn init_tracing(args: &cli::Args) {
    let default_level = if args.quiet {
        "error"
    } else if args.verbose {
        "debug"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .without_time()
        .init();
}

/// Returns true when the run is clean: no differences, no failed commands.
fn run(args: &cli::Args) -> Result<bool> {
    let config = RunConfig::new(&args.output_dir);
    let inputs = runner::expand_inputs(&args.inputs)?;

    runner::write_marker(&config)?;
    let outcome = runner::run_commands(&config, &args.command_template, &inputs, args.capture)?;

    let produced_paths = scan::modified_since(&config.marker_path)?;
    let produced: BTreeSet<String> = produced_paths
        .iter()
        .filter_map(|path| path.file_name().and_then(|name| name.to_str()))
        .map(str::to_string)
        .collect();

    if args.save {
        store::save(&produced_paths, &config.baseline_dir)?;
        return Ok(outcome.commands_failed == 0);
    }

    let baseline = scan::list_basenames(&config.baseline_dir)?;
    let verdicts =
        classify::classify(&config.output_dir, &config.baseline_dir, &produced, &baseline)?;

    let renderer = diff::DiffRenderer::new(config.context_lines, config.wrap_column);
    let entries = report::build_entries(&config, &renderer, &verdicts)?;
    report::write_report(&config, &entries)?;

    let summary = RunSummary::new(
        &verdicts,
        outcome.commands_run,
        outcome.commands_failed,
        produced.len(),
        baseline.len(),
    );
    report::write_summary(&config, &summary)?;
    report::log_summary(&summary, &verdicts);
    info!("report: {}", config.report_path().display());

    Ok(summary.is_clean())
}
