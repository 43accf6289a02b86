//! Centrality ranking via a stationary-distribution solver.
//!
//! The solver is a trait so the power-iteration implementation here can be
//! swapped for an eigenvector solver without touching the rest of the
//! summarizer.

use crate::graph::SimilarityGraph;

/// Importance score per sentence index.
#[derive(Debug, Clone, Default)]
pub struct ScoreVector {
    /// Scores indexed by sentence index. Sums to 1 when non-empty.
    pub scores: Vec<f64>,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Whether the residual dropped below the tolerance.
    pub converged: bool,
}

impl ScoreVector {
    pub fn new(scores: Vec<f64>, iterations: usize, converged: bool) -> Self {
        Self {
            scores,
            iterations,
            converged,
        }
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Score for a sentence, 0.0 if out of range.
    pub fn score(&self, index: usize) -> f64 {
        self.scores.get(index).copied().unwrap_or(0.0)
    }

    /// Sentence indices ordered by descending score; ties keep document order.
    pub fn ranked(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.scores.len()).collect();
        indices.sort_by(|&a, &b| {
            self.scores[b]
                .partial_cmp(&self.scores[a])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        indices
    }
}

/// Computes a probability-like importance distribution over graph nodes.
pub trait StationarySolver: Send + Sync {
    fn solve_stationary_distribution(&self, graph: &SimilarityGraph) -> ScoreVector;
}

/// Weighted PageRank by power iteration.
#[derive(Debug, Clone)]
pub struct PowerIterationSolver {
    /// Damping factor (typically 0.85).
    pub damping: f64,
    /// Maximum number of iterations.
    pub max_iterations: usize,
    /// Per-node tolerance; iteration stops once the L1 change is below
    /// `n * tolerance`.
    pub tolerance: f64,
}

impl Default for PowerIterationSolver {
    fn default() -> Self {
        Self {
            damping: 0.85,
            max_iterations: 100,
            tolerance: 1e-6,
        }
    }
}

impl PowerIterationSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

impl StationarySolver for PowerIterationSolver {
    /// Returns the last iterate even when the iteration cap is hit, with
    /// `converged = false`.
    fn solve_stationary_distribution(&self, graph: &SimilarityGraph) -> ScoreVector {
        let n = graph.num_nodes();
        if n == 0 {
            return ScoreVector::new(Vec::new(), 0, true);
        }

        let uniform = 1.0 / n as f64;
        let mut scores = vec![uniform; n];
        let mut next = vec![0.0; n];

        let dangling = graph.dangling_nodes();
        let teleport = (1.0 - self.damping) * uniform;
        let threshold = n as f64 * self.tolerance;
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.max_iterations {
            iterations += 1;

            // Isolated nodes spread their mass evenly over every node.
            let dangling_mass: f64 = dangling.iter().map(|&d| scores[d]).sum();
            next.fill(teleport + self.damping * dangling_mass * uniform);

            for (node, &score) in scores.iter().enumerate() {
                let total = graph.node_total_weight(node);
                if total > 0.0 {
                    for (neighbor, weight) in graph.neighbors(node) {
                        next[neighbor] += self.damping * score * weight / total;
                    }
                }
            }

            let delta: f64 = scores
                .iter()
                .zip(next.iter())
                .map(|(old, new)| (old - new).abs())
                .sum();

            std::mem::swap(&mut scores, &mut next);

            if delta < threshold {
                converged = true;
                break;
            }
        }

        let sum: f64 = scores.iter().sum();
        if sum > 0.0 {
            for score in &mut scores {
                *score /= sum;
            }
        }

        if !converged {
            tracing::debug!(iterations, nodes = n, "PageRank hit the iteration cap");
        }

        ScoreVector::new(scores, iterations, converged)
    }
}

/// Rank a graph with the given solver.
pub fn rank<S: StationarySolver + ?Sized>(graph: &SimilarityGraph, solver: &S) -> ScoreVector {
    solver.solve_stationary_distribution(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn star() -> SimilarityGraph {
        let mut graph = SimilarityGraph::with_nodes(4);
        graph.add_edge(0, 1, 1.0);
        graph.add_edge(0, 2, 1.0);
        graph.add_edge(0, 3, 1.0);
        graph
    }

    fn triangle() -> SimilarityGraph {
        let mut graph = SimilarityGraph::with_nodes(3);
        graph.add_edge(0, 1, 0.5);
        graph.add_edge(1, 2, 0.5);
        graph.add_edge(2, 0, 0.5);
        graph
    }

    #[test]
    fn test_empty_graph() {
        let result =
            PowerIterationSolver::new().solve_stationary_distribution(&SimilarityGraph::default());
        assert!(result.is_empty());
        assert!(result.converged);
    }

    #[test]
    fn test_triangle_equal_scores() {
        let result = rank(&triangle(), &PowerIterationSolver::new());
        assert!(result.converged);
        for score in &result.scores {
            assert!((score - 1.0 / 3.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_star_hub_highest() {
        let result = rank(&star(), &PowerIterationSolver::new());
        assert!(result.converged);
        for &spoke in &result.scores[1..] {
            assert!(result.scores[0] > spoke);
        }
        assert_eq!(result.ranked()[0], 0);
    }

    #[test]
    fn test_scores_sum_to_one() {
        let result = rank(&star(), &PowerIterationSolver::new());
        let sum: f64 = result.scores.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_edgeless_graph_is_uniform() {
        let graph = SimilarityGraph::with_nodes(5);
        let result = rank(&graph, &PowerIterationSolver::new());
        assert!(result.converged);
        for score in &result.scores {
            assert!((score - 0.2).abs() < 1e-12);
        }
    }

    #[test]
    fn test_isolated_node_gets_base_score() {
        let mut graph = SimilarityGraph::with_nodes(4);
        graph.add_edge(0, 1, 1.0);
        graph.add_edge(1, 2, 1.0);
        let result = rank(&graph, &PowerIterationSolver::new());

        assert!(result.scores.iter().all(|s| *s > 0.0));
        assert!(result.score(3) < result.score(1));
    }

    #[test]
    fn test_max_iterations_returns_partial() {
        let solver = PowerIterationSolver::new()
            .with_max_iterations(1)
            .with_tolerance(0.0);
        let result = rank(&star(), &solver);
        assert_eq!(result.iterations, 1);
        assert!(!result.converged);
        assert_eq!(result.len(), 4);
    }

    #[test]
    fn test_ranked_ties_keep_document_order() {
        let scores = ScoreVector::new(vec![0.2, 0.4, 0.2, 0.2], 1, true);
        assert_eq!(scores.ranked(), vec![1, 0, 2, 3]);
        assert_eq!(scores.score(9), 0.0);
    }

    #[test]
    fn test_damping_controls_hub_advantage() {
        let low = rank(&star(), &PowerIterationSolver::new().with_damping(0.5));
        let high = rank(&star(), &PowerIterationSolver::new().with_damping(0.95));
        assert!(high.scores[0] - high.scores[1] > low.scores[0] - low.scores[1]);
    }
}
