//! `run` command: execute one heuristic and print its result.

use std::io::Write;
use std::sync::Arc;

use camino::Utf8PathBuf;
use clap::Parser;
use mqlib_core::{HeuristicResult, HeuristicRunner, Seed, TimeBudget};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::backend::{BackendBuilder, BackendSpec, required_program};
use crate::source::InstanceSpec;
use crate::{
    ARG_BACKEND, ARG_GRAPH, ARG_HEURISTIC, ARG_HYPERHEURISTIC_DATA, ARG_INSTANCE, ARG_PROBLEM,
    ARG_SEED, ARG_TIME_LIMIT, CliError, ENV_RUN_BACKEND, ENV_RUN_HEURISTIC, ENV_RUN_PROBLEM,
    ENV_RUN_TIME_LIMIT, write_json,
};

/// CLI arguments for the `run` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "run",
    long_about = "Run a named heuristic, or a hyperheuristic alias, on one \
                 instance under a wall-clock budget. The time limit is \
                 advisory: the solver decides how closely to honour it.",
    about = "Run a heuristic on an instance"
)]
#[ortho_config(prefix = "MQLIB")]
pub(crate) struct RunArgs {
    /// Heuristic code, e.g. BURER2002.
    #[arg(value_name = "heuristic")]
    #[serde(default)]
    pub(crate) heuristic: Option<String>,
    /// Wall-clock budget in seconds.
    #[arg(long = ARG_TIME_LIMIT, value_name = "secs")]
    #[serde(default)]
    pub(crate) time_limit: Option<f64>,
    /// Random seed; -1 or omitted uses the solver default.
    #[arg(long = ARG_SEED, value_name = "n", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) seed: Option<i64>,
    /// Problem family code: M (Max-Cut) or Q (QUBO).
    #[arg(long = ARG_PROBLEM, value_name = "code")]
    #[serde(default)]
    pub(crate) problem: Option<String>,
    /// Instance file passed to the solver unread.
    #[arg(long = ARG_INSTANCE, value_name = "path")]
    #[serde(default)]
    pub(crate) instance: Option<Utf8PathBuf>,
    /// JSON graph document to convert (Max-Cut only).
    #[arg(long = ARG_GRAPH, value_name = "path")]
    #[serde(default)]
    pub(crate) graph: Option<Utf8PathBuf>,
    /// Path to the solver executable.
    #[arg(long = ARG_BACKEND, value_name = "path")]
    #[serde(default)]
    pub(crate) backend: Option<Utf8PathBuf>,
    /// Hyperheuristic model directory (defaults to `hhdata` beside the solver).
    #[arg(long = ARG_HYPERHEURISTIC_DATA, value_name = "dir")]
    #[serde(default)]
    pub(crate) hyperheuristic_data: Option<Utf8PathBuf>,
}

impl RunArgs {
    pub(crate) fn into_config(self) -> Result<RunConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RunConfig::try_from(merged)
    }
}

/// Resolved `run` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RunConfig {
    pub(crate) heuristic: String,
    pub(crate) time_budget: TimeBudget,
    pub(crate) seed: Seed,
    pub(crate) source: InstanceSpec,
    pub(crate) backend: BackendSpec,
}

impl RunConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        self.source.validate_sources()?;
        self.backend.validate_sources()
    }
}

impl TryFrom<RunArgs> for RunConfig {
    type Error = CliError;

    fn try_from(args: RunArgs) -> Result<Self, Self::Error> {
        let heuristic = args.heuristic.ok_or(CliError::MissingArgument {
            field: ARG_HEURISTIC,
            env: ENV_RUN_HEURISTIC,
        })?;
        let seconds = args.time_limit.ok_or(CliError::MissingArgument {
            field: ARG_TIME_LIMIT,
            env: ENV_RUN_TIME_LIMIT,
        })?;
        let time_budget = TimeBudget::from_secs(seconds)?;
        let seed = args.seed.map_or(Ok(Seed::Default), Seed::from_raw)?;
        let source = InstanceSpec::from_settings(
            args.problem.as_deref(),
            ENV_RUN_PROBLEM,
            args.instance,
            args.graph,
        )?;
        let program = required_program(args.backend, ENV_RUN_BACKEND)?;
        Ok(Self {
            heuristic,
            time_budget,
            seed,
            source,
            backend: BackendSpec {
                program,
                hyperheuristic_data: args.hyperheuristic_data,
            },
        })
    }
}

pub(crate) fn run_run_with(
    args: RunArgs,
    builder: &dyn BackendBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let result = execute_run(args, builder)?;
    write_json(writer, &result)
}

fn execute_run(args: RunArgs, builder: &dyn BackendBuilder) -> Result<HeuristicResult, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let instance = Arc::new(config.source.load()?);
    let data = config.backend.hyperheuristic_data()?;
    let backend = builder.build(&config.backend)?;
    let runner = HeuristicRunner::new(backend, data);
    Ok(runner.run(
        &config.heuristic,
        &instance,
        config.time_budget,
        config.seed,
    )?)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<RunConfig, CliError> {
    let merged = RunArgs::merge_from_layers(layers).map_err(CliError::from)?;
    RunConfig::try_from(merged)
}
