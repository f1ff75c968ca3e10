//! `heuristics` command: print the solver's catalogue.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use mqlib_core::{HeuristicCatalog, list_heuristics};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::backend::{BackendBuilder, BackendSpec, required_program};
use crate::{ARG_BACKEND, CliError, ENV_HEURISTICS_BACKEND, write_json};

/// CLI arguments for the `heuristics` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "heuristics",
    about = "List the Max-Cut and QUBO heuristics known to the solver"
)]
#[ortho_config(prefix = "MQLIB")]
pub(crate) struct HeuristicsArgs {
    /// Path to the solver executable.
    #[arg(long = ARG_BACKEND, value_name = "path")]
    #[serde(default)]
    pub(crate) backend: Option<Utf8PathBuf>,
}

impl HeuristicsArgs {
    pub(crate) fn into_config(self) -> Result<HeuristicsConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        HeuristicsConfig::try_from(merged)
    }
}

/// Resolved `heuristics` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HeuristicsConfig {
    pub(crate) backend: BackendSpec,
}

impl TryFrom<HeuristicsArgs> for HeuristicsConfig {
    type Error = CliError;

    fn try_from(args: HeuristicsArgs) -> Result<Self, Self::Error> {
        let program = required_program(args.backend, ENV_HEURISTICS_BACKEND)?;
        Ok(Self {
            backend: BackendSpec {
                program,
                hyperheuristic_data: None,
            },
        })
    }
}

pub(crate) fn run_heuristics_with(
    args: HeuristicsArgs,
    builder: &dyn BackendBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let catalog = execute_heuristics(args, builder)?;
    write_json(writer, &catalog)
}

fn execute_heuristics(
    args: HeuristicsArgs,
    builder: &dyn BackendBuilder,
) -> Result<HeuristicCatalog, CliError> {
    let config = args.into_config()?;
    config.backend.validate_sources()?;
    let backend = builder.build(&config.backend)?;
    Ok(list_heuristics(&backend)?)
}
