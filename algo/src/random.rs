/*
 * SPDX-FileCopyrightText: 2026 The linkrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::graph::DenseGraph;
use dsi_progress_logger::{ProgressLog, no_logging};
use rand::{SeedableRng, rngs::SmallRng, seq::SliceRandom};

/// Random link graphs with a fixed number of link attempts per node.
///
/// Each node picks `links_per_node` distinct targets uniformly at random among
/// all nodes, itself included; if the node picks itself, the pick is
/// discarded. As a result, every node has outdegree `links_per_node` or
/// `links_per_node` − 1, and the graph has no loops.
///
/// The graph is determined by the seed of the [pseudorandom number
/// generator](SmallRng).
///
/// # Examples
///
/// ```
/// use linkrank::graph::LinkGraph;
/// use linkrank::random::RandomLinks;
///
/// let g = RandomLinks::new(100, 10, 0).to_graph();
/// assert_eq!(g.num_nodes(), 100);
/// for node in 0..100 {
///     assert!((9..=10).contains(&g.outdegree(node)));
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RandomLinks {
    n: usize,
    links_per_node: usize,
    seed: u64,
}

impl RandomLinks {
    /// Creates a new random link graph generator, given the number of nodes,
    /// the number of link attempts per node, and a seed.
    ///
    /// # Panics
    ///
    /// Panics if `links_per_node` is greater than `n`.
    pub fn new(n: usize, links_per_node: usize, seed: u64) -> Self {
        assert!(
            links_per_node <= n,
            "The number of links per node ({links_per_node}) cannot exceed the number of nodes ({n})"
        );
        Self {
            n,
            links_per_node,
            seed,
        }
    }

    /// Generates the graph.
    pub fn to_graph(&self) -> DenseGraph {
        self.to_graph_with_logging(no_logging![])
    }

    /// Generates the graph, logging progress on `pl`.
    pub fn to_graph_with_logging(&self, pl: &mut impl ProgressLog) -> DenseGraph {
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut graph = DenseGraph::empty(self.n);
        let mut targets: Vec<usize> = (0..self.n).collect();

        pl.item_name("node");
        pl.expected_updates(Some(self.n));
        pl.start(format!(
            "Generating random links ({} nodes, {} links per node)...",
            self.n, self.links_per_node
        ));
        for node in 0..self.n {
            let (chosen, _) = targets.partial_shuffle(&mut rng, self.links_per_node);
            for &target in chosen.iter() {
                if target != node {
                    graph.add_arc(node, target);
                }
            }
            pl.light_update();
        }
        pl.done();

        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::LinkGraph;

    #[test]
    fn test_random_links() {
        let g = RandomLinks::new(50, 5, 0).to_graph();
        assert_eq!(g.num_nodes(), 50);
        for node in 0..50 {
            let d = g.outdegree(node);
            assert!((4..=5).contains(&d), "node {node} has outdegree {d}");
            assert!(!g.has_arc(node, node));
        }
    }

    #[test]
    fn test_seed() {
        assert_eq!(
            RandomLinks::new(30, 4, 42).to_graph(),
            RandomLinks::new(30, 4, 42).to_graph()
        );
    }

    #[test]
    fn test_complete() {
        let g = RandomLinks::new(6, 6, 1).to_graph();
        assert_eq!(g.num_arcs(), 30);
        let g = RandomLinks::new(6, 0, 1).to_graph();
        assert_eq!(g.num_arcs(), 0);
    }

    #[test]
    #[should_panic]
    fn test_too_many_links() {
        RandomLinks::new(3, 4, 0);
    }
}
