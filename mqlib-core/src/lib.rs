//! Core instance and invocation types for Max-Cut and QUBO heuristics.
//!
//! The heuristics themselves live in an external solver reached through the
//! [`HeuristicBackend`] trait. This crate turns caller data into validated
//! [`Instance`] values, runs named heuristics under a time budget and seed,
//! and reshapes the solver's metric and catalogue listings.
//!
//! ```
//! use std::sync::Arc;
//! use mqlib_core::test_support::SingleFlipBackend;
//! use mqlib_core::{
//!     HeuristicRunner, HyperheuristicData, InstanceBuilder, ProblemFamily, Seed, TimeBudget,
//!     WeightedGraph,
//! };
//!
//! let mut graph = WeightedGraph::undirected(4);
//! for (u, v) in [(0, 1), (1, 2), (2, 3), (3, 0)] {
//!     graph.add_edge(u, v, 1.0)?;
//! }
//! let instance = Arc::new(InstanceBuilder::new(ProblemFamily::MaxCut).graph(&graph).build()?);
//! let runner = HeuristicRunner::new(
//!     SingleFlipBackend::default(),
//!     HyperheuristicData::new("/usr/share/mqlib/hhdata")?,
//! );
//! let result = runner.run("SINGLE_FLIP", &instance, TimeBudget::from_secs(1.0)?, Seed::Default)?;
//! assert_eq!(result.objective, 4.0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod backend;
pub mod graph;
pub mod instance;
pub mod metrics;
pub mod problem;
pub mod registry;
pub mod runner;
pub mod sparse;
pub mod test_support;

pub use backend::{
    BackendError, BackendErrorKind, CatalogColumns, HeuristicBackend, Invocation, MetricColumns,
    RawCatalog, RunOutcome,
};
pub use graph::{GraphError, Orientation, WeightedGraph};
pub use instance::{Instance, InstanceBuilder, InstanceError, InstanceSource};
pub use metrics::{MetricsReport, compute_metrics};
pub use problem::ProblemFamily;
pub use registry::{HeuristicCatalog, list_heuristics};
pub use runner::{
    HeuristicResult, HeuristicRunner, HyperheuristicData, HyperheuristicDataError, Improvement,
    ImprovementHistory, RunError, Seed, TimeBudget,
};
pub use sparse::{SparseEdge, SparseMatrix};
