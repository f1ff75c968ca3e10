//! Contract with the external solver that runs heuristics.
//!
//! The solver owns every algorithm, the hyperheuristic model and the
//! instance-file parser. This crate talks to it through
//! [`HeuristicBackend`], whose methods mirror the solver's native entry
//! points: results come back as parallel columns which the metrics, registry
//! and runner modules reshape for callers.

use std::fmt;

use camino::Utf8Path;
use thiserror::Error;

use crate::instance::Instance;
use crate::runner::{Seed, TimeBudget};

/// Broad category of a backend failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendErrorKind {
    /// The requested heuristic is not known to the solver.
    UnknownHeuristic,
    /// The instance could not be read or is malformed.
    MalformedInstance,
    /// The solver ran out of memory or another resource.
    ResourceExhausted,
    /// Any other solver-side fault.
    Internal,
}

impl fmt::Display for BackendErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::UnknownHeuristic => "unknown heuristic",
            Self::MalformedInstance => "malformed instance",
            Self::ResourceExhausted => "resource exhausted",
            Self::Internal => "internal solver error",
        })
    }
}

/// Failure reported by the solver, carried to the caller unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct BackendError {
    kind: BackendErrorKind,
    message: String,
}

impl BackendError {
    /// Wrap a solver message.
    pub fn new(kind: BackendErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Category of the failure.
    #[must_use]
    pub const fn kind(&self) -> BackendErrorKind {
        self.kind
    }

    /// Message exactly as the solver reported it.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Name/description columns for one problem family.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogColumns {
    /// Heuristic codes.
    pub names: Vec<String>,
    /// Descriptions, positionally paired with `names`.
    pub descriptions: Vec<String>,
}

/// Heuristic listings for both families as returned by the solver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCatalog {
    /// Max-Cut heuristics.
    pub max_cut: CatalogColumns,
    /// QUBO heuristics.
    pub qubo: CatalogColumns,
}

/// Instance diagnostics as returned by the solver.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricColumns {
    /// Metric names.
    pub metric_names: Vec<String>,
    /// Metric values, positionally paired with `metric_names`.
    pub metric_values: Vec<f64>,
    /// Names of timed computations.
    pub runtime_names: Vec<String>,
    /// Seconds spent, positionally paired with `runtime_names`.
    pub runtime_values: Vec<f64>,
}

/// Raw outcome of one heuristic run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOutcome {
    /// Heuristic that actually ran.
    pub heuristic: String,
    /// Best objective found.
    pub objective: f64,
    /// Best solution found, one entry per variable.
    pub solution: Vec<i32>,
    /// Objective after each improvement.
    pub history_objectives: Vec<f64>,
    /// Elapsed seconds at each improvement, paired with `history_objectives`.
    pub history_runtimes: Vec<f64>,
}

/// Arguments for [`HeuristicBackend::run_heuristic`].
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    /// Requested heuristic code or hyperheuristic alias.
    pub heuristic: &'a str,
    /// Problem to solve.
    pub instance: &'a Instance,
    /// Advisory wall-clock limit.
    pub time_budget: TimeBudget,
    /// Random seed.
    pub seed: Seed,
    /// Absolute path to the hyperheuristic model directory.
    pub hyperheuristic_data: &'a Utf8Path,
}

/// The external solver.
///
/// Implementations block for the duration of each call and must tolerate
/// concurrent calls from several threads; this crate adds no locking.
/// Errors are passed through to callers without interpretation.
pub trait HeuristicBackend: Send + Sync {
    /// List the heuristics available for each family.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] when the solver cannot be queried.
    fn heuristics(&self) -> Result<RawCatalog, BackendError>;

    /// Compute descriptive metrics for `instance`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] when the instance cannot be loaded.
    fn instance_metrics(&self, instance: &Instance) -> Result<MetricColumns, BackendError>;

    /// Run one heuristic to completion.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] for unknown heuristics, unreadable instances
    /// or solver faults.
    fn run_heuristic(&self, invocation: &Invocation<'_>) -> Result<RunOutcome, BackendError>;
}

impl<B: HeuristicBackend + ?Sized> HeuristicBackend for &B {
    fn heuristics(&self) -> Result<RawCatalog, BackendError> {
        (**self).heuristics()
    }

    fn instance_metrics(&self, instance: &Instance) -> Result<MetricColumns, BackendError> {
        (**self).instance_metrics(instance)
    }

    fn run_heuristic(&self, invocation: &Invocation<'_>) -> Result<RunOutcome, BackendError> {
        (**self).run_heuristic(invocation)
    }
}

impl<B: HeuristicBackend + ?Sized> HeuristicBackend for Box<B> {
    fn heuristics(&self) -> Result<RawCatalog, BackendError> {
        (**self).heuristics()
    }

    fn instance_metrics(&self, instance: &Instance) -> Result<MetricColumns, BackendError> {
        (**self).instance_metrics(instance)
    }

    fn run_heuristic(&self, invocation: &Invocation<'_>) -> Result<RunOutcome, BackendError> {
        (**self).run_heuristic(invocation)
    }
}
