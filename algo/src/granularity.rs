/*
 * SPDX-FileCopyrightText: 2026 The linkrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/// Granularity of parallel tasks, specified transparently by nodes or arcs.
///
/// The [parallel strategy](crate::rank::Parallel) splits the nodes of the
/// graph into consecutive chunks, each of which is a single Rayon task. The
/// size of the chunks can be given directly as a number of nodes, or
/// tentatively as a number of arcs, in which case it is converted into a
/// number of nodes using the average outdegree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    /// Node granularity: each task contains the specified number of nodes.
    Nodes(usize),
    /// Arc granularity: each task contains a number of nodes whose outdegrees
    /// sum, tentatively, to the specified number of arcs.
    Arcs(u64),
}

impl core::default::Default for Granularity {
    /// Returns a default granularity of 1000 nodes.
    fn default() -> Self {
        Self::Nodes(1000)
    }
}

impl Granularity {
    /// Returns the number of nodes per task for a graph with the given number
    /// of nodes and arcs.
    ///
    /// For [`Nodes`](Self::Nodes), the specified number of nodes is returned.
    /// For [`Arcs`](Self::Arcs), the number of nodes is the specified number
    /// of arcs divided by the average outdegree. The result is always at
    /// least one.
    pub fn node_granularity(&self, num_nodes: usize, num_arcs: u64) -> usize {
        match self {
            Self::Nodes(n) => (*n).max(1),
            Self::Arcs(n) => {
                let average_degree = num_arcs as f64 / num_nodes.max(1) as f64;
                if average_degree == 0.0 {
                    // No arcs: a single task
                    return num_nodes.max(1);
                }
                (*n as f64 / average_degree)
                    .min(usize::MAX as f64)
                    .ceil()
                    .max(1.0) as usize
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nodes() {
        assert_eq!(Granularity::Nodes(10).node_granularity(100, 1000), 10);
        assert_eq!(Granularity::Nodes(0).node_granularity(100, 1000), 1);
        assert_eq!(Granularity::default().node_granularity(5, 0), 1000);
    }

    #[test]
    fn test_arcs() {
        // Average outdegree 10
        assert_eq!(Granularity::Arcs(100).node_granularity(100, 1000), 10);
        assert_eq!(Granularity::Arcs(105).node_granularity(100, 1000), 11);
        assert_eq!(Granularity::Arcs(1).node_granularity(100, 1000), 1);
        assert_eq!(Granularity::Arcs(100).node_granularity(7, 0), 7);
    }
}
