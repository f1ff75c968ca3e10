//! Canonical sparse triple lists derived from symmetric adjacency data.
//!
//! The solver indexes vertices from one and expects each undirected edge
//! exactly once. [`upper_triangle`] keeps the strict upper triangle of a
//! symmetric adjacency structure and shifts indices accordingly.

use crate::graph::WeightedGraph;
use crate::instance::InstanceError;

/// One edge of a sparse instance, 1-indexed with `row < col`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SparseEdge {
    row: usize,
    col: usize,
    weight: f64,
}

impl SparseEdge {
    /// Construct an edge, returning `None` unless `0 < row < col`.
    ///
    /// # Examples
    ///
    /// ```
    /// use mqlib_core::SparseEdge;
    ///
    /// assert!(SparseEdge::new(1, 2, 0.5).is_some());
    /// assert!(SparseEdge::new(2, 2, 0.5).is_none());
    /// assert!(SparseEdge::new(0, 1, 0.5).is_none());
    /// ```
    #[must_use]
    pub const fn new(row: usize, col: usize, weight: f64) -> Option<Self> {
        if row == 0 || row >= col {
            return None;
        }
        Some(Self { row, col, weight })
    }

    /// 1-based row index (the smaller endpoint).
    #[must_use]
    pub const fn row(&self) -> usize {
        self.row
    }

    /// 1-based column index (the larger endpoint).
    #[must_use]
    pub const fn col(&self) -> usize {
        self.col
    }

    /// Edge weight.
    #[must_use]
    pub const fn weight(&self) -> f64 {
        self.weight
    }
}

/// Keep the strict upper triangle of symmetric adjacency entries.
///
/// Entries are 0-based `(i, j, weight)` triples. Zero weights and the
/// diagonal are dropped, entries with `i > j` are discarded as mirror
/// images, and the survivors are shifted to 1-based indices. The result is
/// sorted by `(row, col)`.
///
/// The caller is responsible for supplying a symmetric structure; see
/// [`SparseMatrix::from_graph`] for the checked entry point.
///
/// # Examples
///
/// ```
/// use mqlib_core::sparse::upper_triangle;
///
/// let edges = upper_triangle([(0, 1, 2.0), (1, 0, 2.0), (1, 1, 4.0)]);
/// assert_eq!(edges.len(), 1);
/// assert_eq!((edges[0].row(), edges[0].col()), (1, 2));
/// ```
pub fn upper_triangle<I>(entries: I) -> Vec<SparseEdge>
where
    I: IntoIterator<Item = (usize, usize, f64)>,
{
    let mut edges: Vec<SparseEdge> = entries
        .into_iter()
        .filter(|&(_, _, weight)| weight != 0.0)
        .filter_map(|(i, j, weight)| SparseEdge::new(i + 1, j + 1, weight))
        .collect();
    edges.sort_unstable_by_key(|edge| (edge.row, edge.col));
    edges.dedup_by_key(|edge| (edge.row, edge.col));
    edges
}

/// Sparse representation of a graph-shaped Max-Cut instance.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SparseMatrix {
    node_count: usize,
    edges: Vec<SparseEdge>,
}

impl SparseMatrix {
    /// Convert an undirected graph into its canonical triple list.
    ///
    /// # Errors
    ///
    /// Returns [`InstanceError::DirectedGraph`] when `graph` is directed.
    ///
    /// # Examples
    ///
    /// ```
    /// use mqlib_core::{SparseMatrix, WeightedGraph};
    ///
    /// let mut cycle = WeightedGraph::undirected(4);
    /// for (u, v) in [(0, 1), (1, 2), (2, 3), (3, 0)] {
    ///     cycle.add_edge(u, v, 1.0)?;
    /// }
    /// let matrix = SparseMatrix::from_graph(&cycle)?;
    /// assert_eq!(matrix.node_count(), 4);
    /// assert_eq!(matrix.edges().len(), 4);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_graph(graph: &WeightedGraph) -> Result<Self, InstanceError> {
        if graph.is_directed() {
            return Err(InstanceError::DirectedGraph);
        }
        Ok(Self {
            node_count: graph.node_count(),
            edges: upper_triangle(graph.adjacency_entries()),
        })
    }

    /// Number of vertices in the source graph.
    #[must_use]
    pub const fn node_count(&self) -> usize {
        self.node_count
    }

    /// Canonical edge list.
    #[must_use]
    pub fn edges(&self) -> &[SparseEdge] {
        &self.edges
    }

    /// Split the edge list into parallel row, column and weight columns.
    #[must_use]
    pub fn columns(&self) -> (Vec<usize>, Vec<usize>, Vec<f64>) {
        let mut rows = Vec::with_capacity(self.edges.len());
        let mut cols = Vec::with_capacity(self.edges.len());
        let mut weights = Vec::with_capacity(self.edges.len());
        for edge in &self.edges {
            rows.push(edge.row);
            cols.push(edge.col);
            weights.push(edge.weight);
        }
        (rows, cols, weights)
    }
}
