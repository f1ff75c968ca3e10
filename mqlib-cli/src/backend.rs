//! Solver backend settings and construction.

use camino::Utf8PathBuf;
use mqlib_backend_process::ProcessBackend;
use mqlib_core::{HeuristicBackend, HyperheuristicData};

use crate::paths::{absolute, require_directory, require_file};
use crate::{ARG_BACKEND, ARG_HYPERHEURISTIC_DATA, CliError};

/// Directory name searched next to the solver program when no
/// hyperheuristic data directory is configured.
pub(crate) const DEFAULT_HYPERHEURISTIC_DIR: &str = "hhdata";

/// Resolved solver settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BackendSpec {
    /// Path to the solver executable.
    pub(crate) program: Utf8PathBuf,
    /// Explicitly configured hyperheuristic model directory.
    pub(crate) hyperheuristic_data: Option<Utf8PathBuf>,
}

impl BackendSpec {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_file(&self.program, ARG_BACKEND)?;
        if let Some(dir) = &self.hyperheuristic_data {
            require_directory(dir, ARG_HYPERHEURISTIC_DATA)?;
        }
        Ok(())
    }

    /// Absolute hyperheuristic directory, defaulting to `hhdata` beside the
    /// solver program.
    ///
    /// The default is not checked for existence; only hyperheuristic runs
    /// read it.
    pub(crate) fn hyperheuristic_data(&self) -> Result<HyperheuristicData, CliError> {
        let configured = self.hyperheuristic_data.clone().unwrap_or_else(|| {
            self.program.parent().map_or_else(
                || Utf8PathBuf::from(DEFAULT_HYPERHEURISTIC_DIR),
                |dir| dir.join(DEFAULT_HYPERHEURISTIC_DIR),
            )
        });
        let resolved = absolute(&configured, ARG_HYPERHEURISTIC_DATA)?;
        log::debug!("using hyperheuristic data at {resolved}");
        Ok(HyperheuristicData::new(resolved)?)
    }
}

/// Builds the solver backend for the current invocation.
pub(crate) trait BackendBuilder {
    fn build(&self, spec: &BackendSpec) -> Result<Box<dyn HeuristicBackend>, CliError>;
}

/// Spawns the configured program through [`ProcessBackend`].
pub(crate) struct ProcessBackendBuilder;

impl BackendBuilder for ProcessBackendBuilder {
    fn build(&self, spec: &BackendSpec) -> Result<Box<dyn HeuristicBackend>, CliError> {
        let program = absolute(&spec.program, ARG_BACKEND)?;
        Ok(Box::new(ProcessBackend::new(program)))
    }
}

/// Require a backend program from the merged configuration.
pub(crate) fn required_program(
    backend: Option<Utf8PathBuf>,
    env: &'static str,
) -> Result<Utf8PathBuf, CliError> {
    backend.ok_or(CliError::MissingArgument {
        field: ARG_BACKEND,
        env,
    })
}
