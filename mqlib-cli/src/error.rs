//! Error types emitted by the mqlib CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use mqlib_core::{BackendError, GraphError, HyperheuristicDataError, InstanceError, RunError};
use thiserror::Error;

/// Errors emitted by the mqlib CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Name of the offending option.
        field: &'static str,
        /// Environment variable that can supply the option.
        env: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Name of the offending option.
        field: &'static str,
        /// Path that was involved.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Name of the offending option.
        field: &'static str,
        /// Path that was involved.
        path: Utf8PathBuf,
    },
    /// A referenced directory exists but is not a directory.
    #[error("{field} path {path:?} exists but is not a directory")]
    SourcePathNotDirectory {
        /// Name of the offending option.
        field: &'static str,
        /// Path that was involved.
        path: Utf8PathBuf,
    },
    /// A referenced path could not be inspected or resolved.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Name of the offending option.
        field: &'static str,
        /// Path that was involved.
        path: Utf8PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// Opening a graph document failed.
    #[error("failed to open graph at {path:?}: {source}")]
    OpenGraph {
        /// Path that was involved.
        path: Utf8PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// A graph document could not be decoded.
    #[error("failed to parse graph JSON at {path:?}: {source}")]
    ParseGraph {
        /// Path that was involved.
        path: Utf8PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
    /// A graph document decoded but describes an invalid graph.
    #[error("graph in {path:?} is invalid: {source}")]
    InvalidGraph {
        /// Path that was involved.
        path: Utf8PathBuf,
        /// Underlying error.
        #[source]
        source: GraphError,
    },
    /// The problem code or instance source was rejected.
    #[error("invalid instance: {0}")]
    Instance(#[from] InstanceError),
    /// The hyperheuristic data directory was rejected.
    #[error(transparent)]
    HyperheuristicData(#[from] HyperheuristicDataError),
    /// The run was rejected or failed in the solver.
    #[error("heuristic run failed: {0}")]
    Run(#[from] RunError),
    /// The solver failed while listing heuristics or computing metrics.
    #[error("solver failed: {0}")]
    Backend(#[from] BackendError),
    /// Serializing command output failed.
    #[error("failed to serialize output: {0}")]
    SerializeOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
