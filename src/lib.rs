//! Facade crate for the mqlib heuristic invocation layer.
//!
//! This crate re-exports the core instance, runner and catalogue types and
//! exposes the process-backed solver behind a feature flag.

#![forbid(unsafe_code)]

pub use mqlib_core::{
    BackendError, BackendErrorKind, GraphError, HeuristicBackend, HeuristicCatalog,
    HeuristicResult, HeuristicRunner, HyperheuristicData, Improvement, ImprovementHistory,
    Instance, InstanceBuilder, InstanceError, InstanceSource, MetricsReport, Orientation,
    ProblemFamily, RunError, Seed, SparseEdge, SparseMatrix, TimeBudget, WeightedGraph,
    compute_metrics, list_heuristics,
};

#[cfg(feature = "backend-process")]
pub use mqlib_backend_process::ProcessBackend;
