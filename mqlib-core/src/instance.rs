//! Validated problem instances.
//!
//! An [`Instance`] is immutable once built and may be shared across metric
//! and heuristic calls. Construction goes through [`InstanceBuilder`], which
//! enforces that exactly one data source is present and that graph input is
//! only used for Max-Cut.

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

use crate::graph::WeightedGraph;
use crate::problem::ProblemFamily;
use crate::sparse::{SparseEdge, SparseMatrix};

/// Errors returned while building an [`Instance`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InstanceError {
    /// The problem family code was neither `M` nor `Q`.
    #[error("instance problem should be \"M\" or \"Q\", found {code:?}")]
    UnknownFamily {
        /// Code supplied by the caller.
        code: String,
    },
    /// Neither a file path nor a graph was supplied.
    #[error("instance needs either a file path or a graph")]
    MissingSource,
    /// Both a file path and a graph were supplied.
    #[error("instance accepts a file path or a graph, not both")]
    ConflictingSources,
    /// Graph input was supplied for a QUBO instance.
    #[error("graph input is only supported for Max-Cut instances")]
    GraphInputForQubo,
    /// The supplied graph is directed.
    #[error("graph input should be undirected")]
    DirectedGraph,
}

/// Where an [`Instance`] takes its data from.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum InstanceSource {
    /// An instance file in the solver's own text format, interpreted only by
    /// the backend.
    File(Utf8PathBuf),
    /// A converted graph held in memory.
    SparseMatrix(SparseMatrix),
}

/// One Max-Cut or QUBO problem.
///
/// # Examples
///
/// ```
/// use mqlib_core::{Instance, ProblemFamily};
///
/// let instance = Instance::from_file(ProblemFamily::Qubo, "bqp50.rf");
/// assert_eq!(instance.family(), ProblemFamily::Qubo);
/// assert_eq!(instance.file_path().map(|p| p.as_str()), Some("bqp50.rf"));
/// assert!(instance.node_count().is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Instance {
    family: ProblemFamily,
    source: InstanceSource,
}

impl Instance {
    /// Reference an instance file without reading it.
    ///
    /// The path is not checked; a missing or malformed file surfaces as a
    /// backend error when the instance is first used.
    #[must_use]
    pub fn from_file(family: ProblemFamily, path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            family,
            source: InstanceSource::File(path.into()),
        }
    }

    /// Build a Max-Cut instance from an undirected graph.
    ///
    /// # Errors
    ///
    /// Returns [`InstanceError::GraphInputForQubo`] for QUBO and
    /// [`InstanceError::DirectedGraph`] for directed input.
    pub fn from_graph(family: ProblemFamily, graph: &WeightedGraph) -> Result<Self, InstanceError> {
        if !family.accepts_graph_input() {
            return Err(InstanceError::GraphInputForQubo);
        }
        let matrix = SparseMatrix::from_graph(graph)?;
        Ok(Self {
            family,
            source: InstanceSource::SparseMatrix(matrix),
        })
    }

    /// Problem family of the instance.
    #[must_use]
    pub const fn family(&self) -> ProblemFamily {
        self.family
    }

    /// Data source of the instance.
    #[must_use]
    pub const fn source(&self) -> &InstanceSource {
        &self.source
    }

    /// Instance file path, when built from a file.
    #[must_use]
    pub fn file_path(&self) -> Option<&Utf8Path> {
        match &self.source {
            InstanceSource::File(path) => Some(path),
            InstanceSource::SparseMatrix(_) => None,
        }
    }

    /// Sparse matrix, when built from a graph.
    #[must_use]
    pub const fn sparse_matrix(&self) -> Option<&SparseMatrix> {
        match &self.source {
            InstanceSource::SparseMatrix(matrix) => Some(matrix),
            InstanceSource::File(_) => None,
        }
    }

    /// Canonical edge list, when built from a graph.
    #[must_use]
    pub fn edges(&self) -> Option<&[SparseEdge]> {
        self.sparse_matrix().map(SparseMatrix::edges)
    }

    /// Vertex count, when built from a graph.
    #[must_use]
    pub fn node_count(&self) -> Option<usize> {
        self.sparse_matrix().map(SparseMatrix::node_count)
    }
}

/// Builder enforcing the file-XOR-graph rule for [`Instance`].
///
/// # Examples
///
/// ```
/// use mqlib_core::{InstanceBuilder, InstanceError, WeightedGraph};
///
/// let mut graph = WeightedGraph::undirected(2);
/// graph.add_edge(0, 1, 1.0)?;
/// let instance = InstanceBuilder::from_code("M")?.graph(&graph).build()?;
/// assert_eq!(instance.node_count(), Some(2));
///
/// let err = InstanceBuilder::from_code("Q")?.graph(&graph).build();
/// assert_eq!(err, Err(InstanceError::GraphInputForQubo));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
#[must_use]
pub struct InstanceBuilder<'a> {
    family: ProblemFamily,
    file: Option<Utf8PathBuf>,
    graph: Option<&'a WeightedGraph>,
}

impl<'a> InstanceBuilder<'a> {
    /// Start building an instance of `family`.
    pub const fn new(family: ProblemFamily) -> Self {
        Self {
            family,
            file: None,
            graph: None,
        }
    }

    /// Start building from a single-letter family code.
    ///
    /// # Errors
    ///
    /// Returns [`InstanceError::UnknownFamily`] unless `code` is `M` or `Q`.
    pub fn from_code(code: &str) -> Result<Self, InstanceError> {
        Ok(Self::new(code.parse()?))
    }

    /// Use an instance file as the data source.
    pub fn file(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Use a graph as the data source.
    pub const fn graph(mut self, graph: &'a WeightedGraph) -> Self {
        self.graph = Some(graph);
        self
    }

    /// Validate the inputs and produce the instance.
    ///
    /// # Errors
    ///
    /// Returns [`InstanceError`] when no source or both sources are present,
    /// when a graph is supplied for QUBO, or when the graph is directed.
    pub fn build(self) -> Result<Instance, InstanceError> {
        match (self.file, self.graph) {
            (None, None) => Err(InstanceError::MissingSource),
            (Some(_), Some(_)) => Err(InstanceError::ConflictingSources),
            (Some(path), None) => Ok(Instance::from_file(self.family, path)),
            (None, Some(graph)) => Instance::from_graph(self.family, graph),
        }
    }
}
