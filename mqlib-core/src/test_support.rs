//! In-memory `HeuristicBackend` implementations used by unit and behaviour
//! tests.

use std::collections::BTreeSet;
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use camino::Utf8PathBuf;

use crate::backend::{
    BackendError, BackendErrorKind, CatalogColumns, HeuristicBackend, Invocation, MetricColumns,
    RawCatalog, RunOutcome,
};
use crate::instance::Instance;
use crate::problem::ProblemFamily;
use crate::runner::{Seed, TimeBudget};
use crate::sparse::SparseMatrix;

/// Owned copy of an [`Invocation`] captured by [`ScriptedBackend`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// Requested heuristic.
    pub heuristic: String,
    /// Instance passed to the backend.
    pub instance: Instance,
    /// Time budget passed to the backend.
    pub time_budget: TimeBudget,
    /// Seed passed to the backend.
    pub seed: Seed,
    /// Hyperheuristic directory passed to the backend.
    pub hyperheuristic_data: Utf8PathBuf,
}

/// Backend returning canned responses and recording run calls.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    catalog: RawCatalog,
    metrics: MetricColumns,
    outcome: RunOutcome,
    failure: Option<BackendError>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedBackend {
    /// Add a heuristic to the catalogue of `family`.
    #[must_use]
    pub fn with_heuristic(mut self, family: ProblemFamily, name: &str, description: &str) -> Self {
        let columns = match family {
            ProblemFamily::MaxCut => &mut self.catalog.max_cut,
            ProblemFamily::Qubo => &mut self.catalog.qubo,
        };
        columns.names.push(name.to_owned());
        columns.descriptions.push(description.to_owned());
        self
    }

    /// Add one metric and the seconds spent computing it.
    #[must_use]
    pub fn with_metric(mut self, name: &str, value: f64, runtime_secs: f64) -> Self {
        self.metrics.metric_names.push(name.to_owned());
        self.metrics.metric_values.push(value);
        self.metrics.runtime_names.push(name.to_owned());
        self.metrics.runtime_values.push(runtime_secs);
        self
    }

    /// Replace the metric columns wholesale.
    #[must_use]
    pub fn with_metric_columns(mut self, columns: MetricColumns) -> Self {
        self.metrics = columns;
        self
    }

    /// Answer runs with `heuristic`, a single-step history and `solution`.
    #[must_use]
    pub fn with_run(self, heuristic: &str, objective: f64, solution: Vec<i32>) -> Self {
        self.with_outcome(RunOutcome {
            heuristic: heuristic.to_owned(),
            objective,
            solution,
            history_objectives: vec![objective],
            history_runtimes: vec![0.0],
        })
    }

    /// Answer runs with `outcome` verbatim.
    #[must_use]
    pub fn with_outcome(mut self, outcome: RunOutcome) -> Self {
        self.outcome = outcome;
        self
    }

    /// Fail every call with `error`.
    #[must_use]
    pub fn failing_with(mut self, error: BackendError) -> Self {
        self.failure = Some(error);
        self
    }

    /// Number of run calls received.
    #[must_use]
    pub fn run_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Most recent run call.
    #[must_use]
    pub fn last_call(&self) -> Option<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    fn check_failure(&self) -> Result<(), BackendError> {
        self.failure.clone().map_or(Ok(()), Err)
    }
}

impl HeuristicBackend for ScriptedBackend {
    fn heuristics(&self) -> Result<RawCatalog, BackendError> {
        self.check_failure()?;
        Ok(self.catalog.clone())
    }

    fn instance_metrics(&self, _instance: &Instance) -> Result<MetricColumns, BackendError> {
        self.check_failure()?;
        Ok(self.metrics.clone())
    }

    fn run_heuristic(&self, invocation: &Invocation<'_>) -> Result<RunOutcome, BackendError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedCall {
                heuristic: invocation.heuristic.to_owned(),
                instance: invocation.instance.clone(),
                time_budget: invocation.time_budget,
                seed: invocation.seed,
                hyperheuristic_data: invocation.hyperheuristic_data.to_path_buf(),
            });
        self.check_failure()?;
        Ok(self.outcome.clone())
    }
}

/// Deterministic Max-Cut local search over in-memory instances.
///
/// Starting from every vertex on the same side, the backend repeatedly moves
/// the vertex with the largest positive gain until no move improves the
/// cut, reporting each improvement. It answers only to the heuristic codes
/// it was configured with and cannot read instance files.
#[derive(Debug, Clone)]
pub struct SingleFlipBackend {
    codes: BTreeSet<String>,
}

impl Default for SingleFlipBackend {
    fn default() -> Self {
        Self::answering_to(["SINGLE_FLIP"])
    }
}

impl SingleFlipBackend {
    /// Accept the given heuristic codes.
    pub fn answering_to<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            codes: codes.into_iter().map(Into::into).collect(),
        }
    }

    fn matrix<'a>(&self, instance: &'a Instance) -> Result<&'a SparseMatrix, BackendError> {
        if instance.family() != ProblemFamily::MaxCut {
            return Err(BackendError::new(
                BackendErrorKind::MalformedInstance,
                "single-flip search only handles Max-Cut",
            ));
        }
        instance.sparse_matrix().ok_or_else(|| {
            BackendError::new(
                BackendErrorKind::MalformedInstance,
                "single-flip search cannot read instance files",
            )
        })
    }
}

#[expect(
    clippy::float_arithmetic,
    clippy::indexing_slicing,
    reason = "cut gains are floating-point sums over in-range 1-based edge endpoints"
)]
fn gain(matrix: &SparseMatrix, sides: &[i32], vertex: usize) -> f64 {
    matrix
        .edges()
        .iter()
        .filter_map(|edge| {
            let (u, v) = (edge.row() - 1, edge.col() - 1);
            let other = if u == vertex {
                v
            } else if v == vertex {
                u
            } else {
                return None;
            };
            // Same side: moving cuts the edge. Opposite: moving uncuts it.
            Some(if sides[vertex] == sides[other] {
                edge.weight()
            } else {
                -edge.weight()
            })
        })
        .sum()
}

impl HeuristicBackend for SingleFlipBackend {
    fn heuristics(&self) -> Result<RawCatalog, BackendError> {
        let names: Vec<String> = self.codes.iter().cloned().collect();
        let descriptions = names
            .iter()
            .map(|_| "Greedy single-vertex flip local search".to_owned())
            .collect();
        Ok(RawCatalog {
            max_cut: CatalogColumns {
                names,
                descriptions,
            },
            qubo: CatalogColumns::default(),
        })
    }

    #[expect(
        clippy::cast_precision_loss,
        clippy::float_arithmetic,
        reason = "metrics are floating-point summaries of small graphs"
    )]
    fn instance_metrics(&self, instance: &Instance) -> Result<MetricColumns, BackendError> {
        let matrix = self.matrix(instance)?;
        let started = Instant::now();
        let nodes = matrix.node_count() as f64;
        let edges = matrix.edges().len() as f64;
        let density = if nodes > 1.0 {
            2.0 * edges / (nodes * (nodes - 1.0))
        } else {
            0.0
        };
        let elapsed = started.elapsed().as_secs_f64();
        Ok(MetricColumns {
            metric_names: vec!["n".into(), "m".into(), "density".into()],
            metric_values: vec![nodes, edges, density],
            runtime_names: vec!["summary".into()],
            runtime_values: vec![elapsed],
        })
    }

    #[expect(
        clippy::float_arithmetic,
        clippy::indexing_slicing,
        reason = "local search accumulates floating-point gains over in-range vertices"
    )]
    fn run_heuristic(&self, invocation: &Invocation<'_>) -> Result<RunOutcome, BackendError> {
        if !self.codes.contains(invocation.heuristic) {
            return Err(BackendError::new(
                BackendErrorKind::UnknownHeuristic,
                format!("unknown heuristic {}", invocation.heuristic),
            ));
        }
        let matrix = self.matrix(invocation.instance)?;
        let started = Instant::now();
        let deadline = invocation.time_budget.as_duration();
        let mut sides = vec![1_i32; matrix.node_count()];
        let mut objective = 0.0;
        let mut history_objectives = vec![objective];
        let mut history_runtimes = vec![started.elapsed().as_secs_f64()];

        while started.elapsed() <= deadline {
            let best = (0..sides.len())
                .map(|vertex| (vertex, gain(matrix, &sides, vertex)))
                .filter(|&(_, delta)| delta > 0.0)
                .max_by(|lhs, rhs| lhs.1.total_cmp(&rhs.1));
            let Some((vertex, delta)) = best else {
                break;
            };
            sides[vertex] = -sides[vertex];
            objective += delta;
            history_objectives.push(objective);
            history_runtimes.push(started.elapsed().as_secs_f64());
        }

        Ok(RunOutcome {
            heuristic: invocation.heuristic.to_owned(),
            objective,
            solution: sides,
            history_objectives,
            history_runtimes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WeightedGraph;
    use crate::runner::HyperheuristicData;
    use camino::Utf8Path;
    use rstest::rstest;

    fn triangle() -> Instance {
        let graph = WeightedGraph::from_edges(
            crate::Orientation::Undirected,
            3,
            [(0, 1, 1.0), (1, 2, 1.0), (0, 2, 1.0)],
        )
        .expect("triangle");
        Instance::from_graph(ProblemFamily::MaxCut, &graph).expect("instance")
    }

    #[rstest]
    fn single_flip_finds_the_triangle_optimum() {
        let backend = SingleFlipBackend::default();
        let data = HyperheuristicData::new("/hh").expect("absolute");
        let instance = triangle();
        let outcome = backend
            .run_heuristic(&Invocation {
                heuristic: "SINGLE_FLIP",
                instance: &instance,
                time_budget: TimeBudget::from_secs(1.0).expect("budget"),
                seed: Seed::Default,
                hyperheuristic_data: data.as_path(),
            })
            .expect("run");
        assert_eq!(outcome.objective, 2.0);
        assert_eq!(outcome.history_objectives.last(), Some(&2.0));
        assert_eq!(outcome.solution.len(), 3);
    }

    #[rstest]
    fn single_flip_rejects_unknown_codes() {
        let backend = SingleFlipBackend::default();
        let instance = triangle();
        let err = backend
            .run_heuristic(&Invocation {
                heuristic: "BURER2002",
                instance: &instance,
                time_budget: TimeBudget::from_secs(1.0).expect("budget"),
                seed: Seed::Default,
                hyperheuristic_data: Utf8Path::new("/hh"),
            })
            .expect_err("unknown code");
        assert_eq!(err.kind(), BackendErrorKind::UnknownHeuristic);
    }

    #[rstest]
    fn single_flip_cannot_read_files() {
        let backend = SingleFlipBackend::default();
        let instance = Instance::from_file(ProblemFamily::MaxCut, "g.rf");
        let err = backend.instance_metrics(&instance).expect_err("file instance");
        assert_eq!(err.kind(), BackendErrorKind::MalformedInstance);
    }
}
