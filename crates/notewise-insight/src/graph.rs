//! Weighted undirected sentence graph.
//!
//! Nodes are sentence indices. Only pairs with a positive similarity become
//! edges, so sentences sharing no content words with anything else end up
//! isolated.

use std::collections::HashSet;

use crate::similarity::similarity;

/// Undirected graph stored as per-node adjacency lists.
///
/// Every edge `(i, j, w)` appears in both `i`'s and `j`'s list with the same
/// weight. Self-loops are never stored.
#[derive(Debug, Clone, Default)]
pub struct SimilarityGraph {
    adjacency: Vec<Vec<(usize, f64)>>,
    total_weight: Vec<f64>,
}

impl SimilarityGraph {
    /// Build the complete similarity graph over normalized sentences.
    ///
    /// Each unordered pair is scored once and mirrored.
    pub fn build(sentences: &[HashSet<String>]) -> Self {
        let n = sentences.len();
        let mut graph = Self::with_nodes(n);

        for i in 0..n {
            for j in (i + 1)..n {
                let weight = similarity(&sentences[i], &sentences[j]);
                graph.add_edge(i, j, weight);
            }
        }

        graph
    }

    /// A graph with `n` nodes and no edges.
    pub fn with_nodes(n: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); n],
            total_weight: vec![0.0; n],
        }
    }

    /// Add an undirected edge. Self-loops and non-positive weights are ignored.
    pub fn add_edge(&mut self, a: usize, b: usize, weight: f64) {
        if a == b || weight <= 0.0 || !weight.is_finite() {
            return;
        }
        self.adjacency[a].push((b, weight));
        self.adjacency[b].push((a, weight));
        self.total_weight[a] += weight;
        self.total_weight[b] += weight;
    }

    pub fn num_nodes(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of undirected edges.
    pub fn num_edges(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum::<usize>() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    pub fn neighbors(&self, node: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.adjacency[node].iter().copied()
    }

    /// Edge weight between two nodes, 0.0 when absent or `a == b`.
    pub fn weight(&self, a: usize, b: usize) -> f64 {
        if a == b {
            return 0.0;
        }
        self.adjacency[a]
            .iter()
            .find(|(n, _)| *n == b)
            .map_or(0.0, |(_, w)| *w)
    }

    /// Sum of edge weights incident to a node.
    pub fn node_total_weight(&self, node: usize) -> f64 {
        self.total_weight[node]
    }

    /// Nodes without any positive-weight edge.
    pub fn dangling_nodes(&self) -> Vec<usize> {
        (0..self.num_nodes())
            .filter(|&n| self.total_weight[n] <= 0.0)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(words: &[&str]) -> HashSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn sample() -> Vec<HashSet<String>> {
        vec![
            set(&["cats", "mammals"]),
            set(&["cats", "hunt", "mice"]),
            set(&["mice", "rodents"]),
            set(&["rodents", "mammals"]),
            set(&["sentence", "unrelated", "anything"]),
        ]
    }

    #[test]
    fn test_build_weights_are_symmetric() {
        let graph = SimilarityGraph::build(&sample());
        for i in 0..graph.num_nodes() {
            for j in 0..graph.num_nodes() {
                assert_eq!(graph.weight(i, j), graph.weight(j, i));
            }
            assert_eq!(graph.weight(i, i), 0.0);
        }
        assert!((graph.weight(0, 3) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_build_skips_zero_similarity_pairs() {
        let graph = SimilarityGraph::build(&sample());
        // 0-1, 0-3, 1-2, 2-3
        assert_eq!(graph.num_edges(), 4);
        assert_eq!(graph.dangling_nodes(), vec![4]);
        assert_eq!(graph.neighbors(4).count(), 0);
    }

    #[test]
    fn test_build_small_inputs_have_no_edges() {
        let empty = SimilarityGraph::build(&[]);
        assert!(empty.is_empty());
        assert_eq!(empty.num_edges(), 0);

        let single = SimilarityGraph::build(&[set(&["cats"])]);
        assert_eq!(single.num_nodes(), 1);
        assert_eq!(single.num_edges(), 0);
    }

    #[test]
    fn test_add_edge_ignores_self_loops() {
        let mut graph = SimilarityGraph::with_nodes(2);
        graph.add_edge(0, 0, 1.0);
        graph.add_edge(0, 1, 0.0);
        assert_eq!(graph.num_edges(), 0);
        graph.add_edge(0, 1, 0.25);
        assert_eq!(graph.num_edges(), 1);
        assert!((graph.node_total_weight(1) - 0.25).abs() < 1e-12);
    }
}
