//! Property-based tests for the sparse upper-triangle conversion.
//!
//! # Invariants tested
//!
//! - **Canonical form:** every triple has `row < col`, 1-based indices within
//!   the node count and a non-zero weight.
//! - **Presentation independence:** edge order and endpoint order do not
//!   change the resulting triples.
//! - **Dense agreement:** a dense symmetric adjacency matrix converts to the
//!   same triples as the equivalent edge list.

use std::collections::BTreeMap;

use mqlib_core::{Orientation, SparseEdge, SparseMatrix, WeightedGraph};
use proptest::prelude::*;

type EdgeList = Vec<(usize, usize, f64)>;

/// Generate a node count and a duplicate-free undirected edge list.
fn graph_strategy() -> impl Strategy<Value = (usize, EdgeList)> {
    (1_usize..12).prop_flat_map(|nodes| {
        let edge = (0..nodes, 0..nodes, -8_i32..=8).prop_map(|(u, v, w)| (u, v, f64::from(w)));
        (Just(nodes), prop::collection::vec(edge, 0..40)).prop_map(|(nodes, raw)| {
            let unique: BTreeMap<(usize, usize), f64> = raw
                .into_iter()
                .map(|(u, v, w)| ((u.min(v), u.max(v)), w))
                .collect();
            let edges = unique.into_iter().map(|((u, v), w)| (u, v, w)).collect();
            (nodes, edges)
        })
    })
}

fn convert(nodes: usize, edges: EdgeList) -> Vec<SparseEdge> {
    let graph = WeightedGraph::from_edges(Orientation::Undirected, nodes, edges)
        .expect("generated edges are in range");
    SparseMatrix::from_graph(&graph)
        .expect("undirected graph")
        .edges()
        .to_vec()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: converted triples are canonical.
    #[test]
    fn triples_are_canonical((nodes, edges) in graph_strategy()) {
        for edge in convert(nodes, edges) {
            prop_assert!(edge.row() >= 1);
            prop_assert!(edge.row() < edge.col());
            prop_assert!(edge.col() <= nodes);
            prop_assert!(edge.weight() != 0.0);
        }
    }

    /// Property: reversing edge order and endpoints yields identical triples.
    #[test]
    fn reversed_presentation_is_equivalent((nodes, edges) in graph_strategy()) {
        let reversed: EdgeList = edges.iter().rev().map(|&(u, v, w)| (v, u, w)).collect();
        prop_assert_eq!(convert(nodes, edges), convert(nodes, reversed));
    }

    /// Property: any permutation of the edge list yields identical triples.
    #[test]
    fn shuffled_presentation_is_equivalent(
        (nodes, edges, shuffled) in graph_strategy().prop_flat_map(|(nodes, edges)| {
            let shuffled = Just(edges.clone()).prop_shuffle();
            (Just(nodes), Just(edges), shuffled)
        })
    ) {
        prop_assert_eq!(convert(nodes, edges), convert(nodes, shuffled));
    }

    /// Property: the dense adjacency form converts to the same triples.
    #[test]
    fn dense_adjacency_agrees((nodes, edges) in graph_strategy()) {
        let mut rows = vec![vec![0.0; nodes]; nodes];
        for &(u, v, w) in &edges {
            rows[u][v] = w;
            rows[v][u] = w;
        }
        let dense = WeightedGraph::from_adjacency(&rows).expect("square matrix");
        prop_assert!(!dense.is_directed());
        let from_dense = SparseMatrix::from_graph(&dense).expect("undirected").edges().to_vec();
        prop_assert_eq!(from_dense, convert(nodes, edges));
    }

    /// Property: every undirected edge with a non-zero weight survives once.
    #[test]
    fn each_off_diagonal_edge_appears_once((nodes, edges) in graph_strategy()) {
        let expected = edges
            .iter()
            .filter(|&&(u, v, w)| u != v && w != 0.0)
            .count();
        prop_assert_eq!(convert(nodes, edges).len(), expected);
    }
}
