/*
 * SPDX-FileCopyrightText: 2026 The linkrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use thiserror::Error;

/// Errors returned when building link graphs or running PageRank.
#[derive(Error, Debug)]
pub enum PageRankError {
    /// A row of an adjacency matrix does not have as many entries as there
    /// are rows.
    #[error("Row {row} has {len} entries, but the matrix has {num_nodes} rows")]
    NotSquare {
        row: usize,
        len: usize,
        num_nodes: usize,
    },

    /// The adjacency matrix of a graph with this many nodes cannot be
    /// represented.
    #[error("An adjacency matrix with {num_nodes} rows does not fit in memory")]
    TooLarge { num_nodes: usize },

    /// The graph has no nodes.
    #[error("The graph has no nodes")]
    Empty,

    /// An arc mentions a node that does not exist.
    #[error("Arc ({src}, {dst}) is out of bounds (the graph has {num_nodes} nodes)")]
    ArcOutOfBounds {
        src: usize,
        dst: usize,
        num_nodes: usize,
    },

    /// The damping factor is not in the open interval (0 . . 1).
    #[error("The damping factor must be in (0 . . 1), got {0}")]
    InvalidDamping(f64),

    /// The convergence threshold is not positive (or is NaN).
    #[error("The convergence threshold must be positive, got {0}")]
    InvalidThreshold(f64),

    /// The number of worker threads is zero.
    #[error("The number of threads must be greater than 0")]
    InvalidNumThreads,

    /// The worker pool could not be created.
    #[error("Could not build the thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// The computation stopped at the iteration cap before converging.
    #[error("PageRank did not converge within {iterations} iterations")]
    NotConverged { iterations: usize },
}
