//! Command-line interface for running Max-Cut and QUBO heuristics.
#![forbid(unsafe_code)]

use std::io::Write;

use clap::{Parser, Subcommand};
use serde::Serialize;

mod backend;
mod error;
mod heuristics;
mod metrics;
mod paths;
mod run;
mod source;

pub use error::CliError;

use backend::{BackendBuilder, ProcessBackendBuilder};
use heuristics::{HeuristicsArgs, run_heuristics_with};
use metrics::{MetricsArgs, run_metrics_with};
use run::{RunArgs, run_run_with};

pub(crate) const ARG_BACKEND: &str = "backend";
pub(crate) const ARG_HYPERHEURISTIC_DATA: &str = "hyperheuristic-data";
pub(crate) const ARG_PROBLEM: &str = "problem";
pub(crate) const ARG_INSTANCE: &str = "instance";
pub(crate) const ARG_GRAPH: &str = "graph";
pub(crate) const ARG_HEURISTIC: &str = "heuristic";
pub(crate) const ARG_TIME_LIMIT: &str = "time-limit";
pub(crate) const ARG_SEED: &str = "seed";
pub(crate) const ENV_HEURISTICS_BACKEND: &str = "MQLIB_CMDS_HEURISTICS_BACKEND";
pub(crate) const ENV_METRICS_BACKEND: &str = "MQLIB_CMDS_METRICS_BACKEND";
pub(crate) const ENV_METRICS_PROBLEM: &str = "MQLIB_CMDS_METRICS_PROBLEM";
pub(crate) const ENV_RUN_BACKEND: &str = "MQLIB_CMDS_RUN_BACKEND";
pub(crate) const ENV_RUN_HEURISTIC: &str = "MQLIB_CMDS_RUN_HEURISTIC";
pub(crate) const ENV_RUN_PROBLEM: &str = "MQLIB_CMDS_RUN_PROBLEM";
pub(crate) const ENV_RUN_TIME_LIMIT: &str = "MQLIB_CMDS_RUN_TIME_LIMIT";

/// Run the mqlib CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when arguments or configuration are invalid, when
/// an input cannot be read, or when the solver fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    dispatch(cli.command, &ProcessBackendBuilder, &mut stdout)
}

fn dispatch(
    command: Command,
    builder: &dyn BackendBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    match command {
        Command::Heuristics(args) => run_heuristics_with(args, builder, writer),
        Command::Metrics(args) => run_metrics_with(args, builder, writer),
        Command::Run(args) => run_run_with(args, builder, writer),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "mqlib",
    about = "Run Max-Cut and QUBO heuristics through an external solver",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the heuristics the solver provides.
    Heuristics(HeuristicsArgs),
    /// Compute descriptive metrics for an instance.
    Metrics(MetricsArgs),
    /// Run a heuristic on an instance.
    Run(RunArgs),
}

/// Write `value` as pretty JSON followed by a newline.
fn write_json<T: Serialize>(writer: &mut dyn Write, value: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerializeOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
mod tests;
