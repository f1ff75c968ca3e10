//! `metrics` command: print instance diagnostics.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use mqlib_core::{MetricsReport, compute_metrics};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::backend::{BackendBuilder, BackendSpec, required_program};
use crate::source::InstanceSpec;
use crate::{
    ARG_BACKEND, ARG_GRAPH, ARG_INSTANCE, ARG_PROBLEM, CliError, ENV_METRICS_BACKEND,
    ENV_METRICS_PROBLEM, write_json,
};

/// CLI arguments for the `metrics` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "metrics",
    long_about = "Compute the solver's descriptive metrics for one instance. \
                 The instance is either a solver-readable file (--instance) \
                 or a JSON graph document (--graph).",
    about = "Compute instance metrics"
)]
#[ortho_config(prefix = "MQLIB")]
pub(crate) struct MetricsArgs {
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
}

impl MetricsArgs {
    pub(crate) fn into_config(self) -> Result<MetricsConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        MetricsConfig::try_from(merged)
    }
}

/// Resolved `metrics` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MetricsConfig {
    pub(crate) source: InstanceSpec,
    pub(crate) backend: BackendSpec,
}

impl MetricsConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        self.source.validate_sources()?;
        self.backend.validate_sources()
    }
}

impl TryFrom<MetricsArgs> for MetricsConfig {
    type Error = CliError;

    fn try_from(args: MetricsArgs) -> Result<Self, Self::Error> {
        let source = InstanceSpec::from_settings(
            args.problem.as_deref(),
            ENV_METRICS_PROBLEM,
            args.instance,
            args.graph,
        )?;
        let program = required_program(args.backend, ENV_METRICS_BACKEND)?;
        Ok(Self {
            source,
            backend: BackendSpec {
                program,
                hyperheuristic_data: None,
            },
        })
    }
}

pub(crate) fn run_metrics_with(
    args: MetricsArgs,
    builder: &dyn BackendBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let report = execute_metrics(args, builder)?;
    write_json(writer, &report)
}

fn execute_metrics(
    args: MetricsArgs,
    builder: &dyn BackendBuilder,
) -> Result<MetricsReport, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let instance = config.source.load()?;
    let backend = builder.build(&config.backend)?;
    Ok(compute_metrics(&backend, &instance)?)
}
