//! Weighted graph input for graph-shaped Max-Cut instances.
//!
//! [`WeightedGraph`] is the caller-facing adjacency structure. It records
//! whether edges are directed so that instance construction can reject
//! directed input instead of silently symmetrising it.

use std::collections::BTreeMap;

use thiserror::Error;

/// Whether edges in a [`WeightedGraph`] have a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// `(u, v)` and `(v, u)` denote the same edge.
    Undirected,
    /// `(u, v)` and `(v, u)` are distinct arcs.
    Directed,
}

/// Errors raised while assembling a [`WeightedGraph`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// An edge endpoint is not a vertex of the graph.
    #[error("node {node} is out of range for a graph with {node_count} nodes")]
    NodeOutOfRange {
        /// Offending 0-based node index.
        node: usize,
        /// Number of vertices in the graph.
        node_count: usize,
    },
    /// An edge weight was NaN or infinite.
    #[error("edge ({from}, {to}) has a non-finite weight")]
    NonFiniteWeight {
        /// Source endpoint.
        from: usize,
        /// Target endpoint.
        to: usize,
    },
    /// A dense adjacency matrix was not square.
    #[error("adjacency row {row} has {len} entries; expected {expected}")]
    RaggedAdjacency {
        /// Index of the offending row.
        row: usize,
        /// Number of entries found.
        len: usize,
        /// Number of rows in the matrix.
        expected: usize,
    },
}

/// A weighted graph over vertices `0..node_count`.
///
/// Adding the same edge twice replaces its weight. For undirected graphs the
/// pair is stored once, so `(u, v)` and `(v, u)` address the same edge.
///
/// # Examples
///
/// ```
/// use mqlib_core::WeightedGraph;
///
/// let mut graph = WeightedGraph::undirected(3);
/// graph.add_edge(0, 1, 2.0)?;
/// graph.add_edge(2, 1, 1.5)?;
/// assert_eq!(graph.edge_count(), 2);
/// assert!(!graph.is_directed());
/// # Ok::<(), mqlib_core::GraphError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedGraph {
    orientation: Orientation,
    node_count: usize,
    edges: BTreeMap<(usize, usize), f64>,
}

impl WeightedGraph {
    /// Create an edgeless undirected graph with `node_count` vertices.
    #[must_use]
    pub const fn undirected(node_count: usize) -> Self {
        Self::with_orientation(Orientation::Undirected, node_count)
    }

    /// Create an edgeless directed graph with `node_count` vertices.
    #[must_use]
    pub const fn directed(node_count: usize) -> Self {
        Self::with_orientation(Orientation::Directed, node_count)
    }

    /// Create an edgeless graph with the given orientation.
    #[must_use]
    pub const fn with_orientation(orientation: Orientation, node_count: usize) -> Self {
        Self {
            orientation,
            node_count,
            edges: BTreeMap::new(),
        }
    }

    /// Build a graph from an edge list.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError`] when an endpoint is out of range or a weight is
    /// not finite.
    pub fn from_edges<I>(
        orientation: Orientation,
        node_count: usize,
        edges: I,
    ) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = (usize, usize, f64)>,
    {
        let mut graph = Self::with_orientation(orientation, node_count);
        for (from, to, weight) in edges {
            graph.add_edge(from, to, weight)?;
        }
        Ok(graph)
    }

    /// Build a graph from a dense square adjacency matrix.
    ///
    /// Non-zero entries become edges. A symmetric matrix yields an undirected
    /// graph; any asymmetry yields a directed one, which instance
    /// construction later rejects.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::RaggedAdjacency`] when the matrix is not square
    /// and [`GraphError::NonFiniteWeight`] for NaN or infinite entries.
    pub fn from_adjacency(rows: &[Vec<f64>]) -> Result<Self, GraphError> {
        let node_count = rows.len();
        let mut entries = BTreeMap::new();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != node_count {
                return Err(GraphError::RaggedAdjacency {
                    row: i,
                    len: row.len(),
                    expected: node_count,
                });
            }
            for (j, &weight) in row.iter().enumerate() {
                if weight != 0.0 {
                    entries.insert((i, j), weight);
                }
            }
        }

        let symmetric = entries
            .iter()
            .all(|(&(i, j), weight)| entries.get(&(j, i)) == Some(weight));
        let orientation = if symmetric {
            Orientation::Undirected
        } else {
            Orientation::Directed
        };
        Self::from_edges(
            orientation,
            node_count,
            entries
                .into_iter()
                .filter(|&((i, j), _)| orientation == Orientation::Directed || i <= j)
                .map(|((i, j), weight)| (i, j, weight)),
        )
    }

    /// Add or replace the edge between `from` and `to`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError`] when an endpoint is out of range or the weight
    /// is not finite.
    pub fn add_edge(&mut self, from: usize, to: usize, weight: f64) -> Result<(), GraphError> {
        for node in [from, to] {
            if node >= self.node_count {
                return Err(GraphError::NodeOutOfRange {
                    node,
                    node_count: self.node_count,
                });
            }
        }
        if !weight.is_finite() {
            return Err(GraphError::NonFiniteWeight { from, to });
        }
        let key = match self.orientation {
            Orientation::Undirected => (from.min(to), from.max(to)),
            Orientation::Directed => (from, to),
        };
        self.edges.insert(key, weight);
        Ok(())
    }

    /// Edge orientation of the graph.
    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Whether the graph is directed.
    #[must_use]
    pub fn is_directed(&self) -> bool {
        self.orientation == Orientation::Directed
    }

    /// Number of vertices.
    #[must_use]
    pub const fn node_count(&self) -> usize {
        self.node_count
    }

    /// Number of stored edges (each undirected edge counts once).
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Iterate over the entries of the graph's adjacency matrix.
    ///
    /// Undirected edges appear in both orientations, as they would in a
    /// symmetric sparse matrix; self-loops appear once.
    pub fn adjacency_entries(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        let mirror = self.orientation == Orientation::Undirected;
        self.edges.iter().flat_map(move |(&(i, j), &weight)| {
            let reverse = (mirror && i != j).then_some((j, i, weight));
            std::iter::once((i, j, weight)).chain(reverse)
        })
    }
}
