/*
 * SPDX-FileCopyrightText: 2026 The linkrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Execution strategies for the rank iteration.
//!
//! An iteration consists of two phases: the _update_ phase, which computes a
//! new rank for every node reading only the committed rank vector, and the
//! _check_ phase, which decides whether every rank moved by at most the
//! convergence threshold. A [`Strategy`] decides how the per-node work of the
//! two phases is executed; the [engine](super::PageRank) is agnostic to the
//! choice.
//!
//! - [`Sequential`] processes nodes in index order on the calling thread, and
//!   it is the reference against which the parallel strategy is tested.
//! - [`Parallel`] splits nodes into chunks processed by a fixed Rayon thread
//!   pool, built once and reused by every iteration.

use super::{Config, Iteration};
use crate::graph::LinkGraph;
use crate::{Granularity, PageRankError};
use dsi_progress_logger::ConcurrentProgressLog;
use rayon::ThreadPool;
use rayon::prelude::*;
use std::fmt::Display;

/// The outcome of the check phase.
///
/// `converged` is the logical AND, over all nodes, of the condition
/// |*x*ᵢ⁽*ᵗ* ⁺ ¹⁾ − *x*ᵢ⁽*ᵗ*⁾| ≤ ε, and `max_delta` is the ℓ∞ norm of the
/// difference between the two vectors. Partial results computed on disjoint
/// sets of nodes are combined with [`merge`](Check::merge).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Check {
    pub converged: bool,
    pub max_delta: f64,
}

impl Default for Check {
    /// Returns the neutral element of [`merge`](Check::merge).
    fn default() -> Self {
        Self {
            converged: true,
            max_delta: 0.0,
        }
    }
}

impl Check {
    /// Accounts for a node whose rank moved from `old` to `new`.
    #[inline(always)]
    pub fn add(self, old: f64, new: f64, threshold: f64) -> Self {
        let delta = (new - old).abs();
        Self {
            // A NaN delta fails the comparison
            converged: self.converged && delta <= threshold,
            max_delta: self.max_delta.max(delta),
        }
    }

    /// Combines the results of two disjoint sets of nodes.
    #[inline(always)]
    pub fn merge(self, other: Self) -> Self {
        Self {
            converged: self.converged && other.converged,
            max_delta: self.max_delta.max(other.max_delta),
        }
    }
}

/// A way of executing the two phases of a rank iteration.
///
/// Implementations must write every entry of `new_rank` exactly once in
/// [`update`](Strategy::update), and must return from each method only when
/// all the work of the phase is complete: the engine relies on this to never
/// check a partially updated vector, and to commit the new vector only after
/// the check.
pub trait Strategy: Display {
    /// Computes the new rank of every node into `new_rank`.
    fn update<G: LinkGraph + Sync>(
        &self,
        iteration: &Iteration<'_, G>,
        new_rank: &mut [f64],
        cpl: &mut impl ConcurrentProgressLog,
    );

    /// Compares `new_rank` with the committed rank vector.
    fn check<G: LinkGraph + Sync>(&self, iteration: &Iteration<'_, G>, new_rank: &[f64]) -> Check;

    /// Overwrites the fields of `config` that describe this strategy.
    ///
    /// The default implementation does nothing.
    fn configure(&self, _config: &mut Config) {}
}

/// Single-threaded execution in index order.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sequential;

impl Display for Sequential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("sequential")
    }
}

impl Strategy for Sequential {
    fn update<G: LinkGraph + Sync>(
        &self,
        iteration: &Iteration<'_, G>,
        new_rank: &mut [f64],
        cpl: &mut impl ConcurrentProgressLog,
    ) {
        for (node, rank) in new_rank.iter_mut().enumerate() {
            *rank = iteration.node_rank(node);
            cpl.light_update();
        }
    }

    fn check<G: LinkGraph + Sync>(&self, iteration: &Iteration<'_, G>, new_rank: &[f64]) -> Check {
        iteration
            .rank()
            .iter()
            .zip(new_rank)
            .fold(Check::default(), |check, (&old, &new)| {
                check.add(old, new, iteration.threshold())
            })
    }
}

/// Data-parallel execution on a fixed Rayon thread pool.
///
/// In the update phase the new rank vector is split into disjoint chunks of
/// consecutive nodes, whose size is given by the [granularity](Granularity);
/// each chunk is a Rayon task that writes only its own entries, so no locking
/// is needed. The check phase is a Rayon fold/reduce over the same chunks
/// computing a [`Check`]. Both phases run inside
/// [`ThreadPool::install`], which returns only after all tasks have
/// completed.
#[derive(Debug)]
pub struct Parallel {
    thread_pool: ThreadPool,
    granularity: Granularity,
}

impl Parallel {
    /// The default number of worker threads.
    pub const DEFAULT_NUM_THREADS: usize = 8;

    /// Creates a parallel strategy with a dedicated pool of `num_threads`
    /// threads.
    pub fn new(num_threads: usize, granularity: Granularity) -> Result<Self, PageRankError> {
        if num_threads == 0 {
            return Err(PageRankError::InvalidNumThreads);
        }
        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|i| format!("linkrank-{i}"))
            .build()?;
        Ok(Self {
            thread_pool,
            granularity,
        })
    }

    /// Returns the number of threads in the pool.
    pub fn num_threads(&self) -> usize {
        self.thread_pool.current_num_threads()
    }

    /// Returns the granularity of parallel tasks.
    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    fn node_granularity<G: LinkGraph>(&self, iteration: &Iteration<'_, G>) -> usize {
        self.granularity
            .node_granularity(iteration.num_nodes(), iteration.degrees().num_arcs())
    }
}

impl Display for Parallel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "parallel ({} threads, {:?})",
            self.num_threads(),
            self.granularity
        )
    }
}

impl Strategy for Parallel {
    fn configure(&self, config: &mut Config) {
        config.num_threads = self.num_threads();
        config.granularity = self.granularity;
    }

    fn update<G: LinkGraph + Sync>(
        &self,
        iteration: &Iteration<'_, G>,
        new_rank: &mut [f64],
        cpl: &mut impl ConcurrentProgressLog,
    ) {
        let node_granularity = self.node_granularity(iteration);
        let local_cpl = cpl.clone();
        self.thread_pool.install(|| {
            new_rank
                .par_chunks_mut(node_granularity)
                .enumerate()
                .for_each_with(local_cpl, |cpl, (chunk, ranks)| {
                    let start = chunk * node_granularity;
                    for (node, rank) in (start..).zip(ranks.iter_mut()) {
                        *rank = iteration.node_rank(node);
                    }
                    cpl.update_with_count(ranks.len());
                });
        });
    }

    fn check<G: LinkGraph + Sync>(&self, iteration: &Iteration<'_, G>, new_rank: &[f64]) -> Check {
        let node_granularity = self.node_granularity(iteration);
        let threshold = iteration.threshold();
        self.thread_pool.install(|| {
            iteration
                .rank()
                .par_chunks(node_granularity)
                .zip(new_rank.par_chunks(node_granularity))
                .fold(Check::default, |check, (old_chunk, new_chunk)| {
                    old_chunk
                        .iter()
                        .zip(new_chunk)
                        .fold(check, |check, (&old, &new)| check.add(old, new, threshold))
                })
                .reduce(Check::default, Check::merge)
        })
    }
}
