/*
 * SPDX-FileCopyrightText: 2026 The linkrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! PageRank by power iteration.
//!
//! # The formula
//!
//! If we denote with *n* the number of nodes, with *d*(*j*) the outdegree of
//! node *j* and with α the damping factor, each iteration computes from the
//! current approximation **x**⁽*ᵗ*⁾ a new approximation
//!
//! > *xᵢ*⁽*ᵗ* ⁺ ¹⁾ = (1 − α) / *n* + α ∑_(*j* → *i*) *xⱼ*⁽*ᵗ*⁾ / *d*(*j*),
//!
//! starting from the uniform vector *xᵢ*⁽⁰⁾ = 1/*n*. Dangling nodes (nodes
//! with outdegree zero) have no successors, so they never appear in the sum:
//! their rank is simply lost at each iteration, and in their presence the
//! rank vector is not stochastic. Nodes without predecessors get exactly
//! (1 − α) / *n*. Self-loops are ordinary arcs.
//!
//! This is a Jacobi iteration: every new value is computed from the previous
//! vector only, so the result does not depend on the order in which nodes are
//! updated, and the [sequential](super::Sequential) and
//! [parallel](super::Parallel) strategies compute the same vectors.
//!
//! # Stopping criterion
//!
//! The iteration stops when no rank has changed by more than the threshold ε,
//! that is, when ‖**x**⁽*ᵗ* ⁺ ¹⁾ − **x**⁽*ᵗ*⁾‖∞ ≤ ε. The returned vector is
//! the one that satisfied the criterion. Optionally, the computation stops
//! after a maximum number of iterations, in which case the final
//! [state](State) records that convergence was not reached.

use super::{Check, Config, Parallel, Sequential, Strategy};
use crate::graph::LinkGraph;
use crate::{Degrees, PageRankError};
use dsi_progress_logger::{ConcurrentProgressLog, ProgressLog, no_logging};
use kahan::KahanSum;

/// The state of a [`PageRank`] computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// More iterations are needed.
    Running,
    /// The last iteration satisfied the convergence criterion.
    Converged,
    /// The maximum number of iterations was reached before convergence.
    IterationCapExceeded,
}

impl State {
    /// Returns the termination associated with a final state, or `None` if
    /// the computation is still running.
    pub fn termination(&self) -> Option<Termination> {
        match self {
            State::Running => None,
            State::Converged => Some(Termination::Converged),
            State::IterationCapExceeded => Some(Termination::IterationCapExceeded),
        }
    }
}

/// How a [`PageRank`] computation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The rank vector converged.
    Converged,
    /// The maximum number of iterations was reached before convergence.
    IterationCapExceeded,
}

impl std::fmt::Display for Termination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Termination::Converged => f.write_str("converged"),
            Termination::IterationCapExceeded => f.write_str("iteration cap exceeded"),
        }
    }
}

/// The read-only data of an iteration, shared by all the work units of a
/// [`Strategy`].
#[derive(Debug)]
pub struct Iteration<'a, G> {
    graph: &'a G,
    degrees: &'a Degrees,
    rank: &'a [f64],
    alpha: f64,
    teleport: f64,
    threshold: f64,
}

impl<G: LinkGraph> Iteration<'_, G> {
    /// Returns the number of nodes.
    #[inline(always)]
    pub fn num_nodes(&self) -> usize {
        self.rank.len()
    }

    /// Returns the committed rank vector.
    #[inline(always)]
    pub fn rank(&self) -> &[f64] {
        self.rank
    }

    /// Returns the outdegrees of the graph.
    #[inline(always)]
    pub fn degrees(&self) -> &Degrees {
        self.degrees
    }

    /// Returns the convergence threshold.
    #[inline(always)]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Computes the new rank of `node` from the committed rank vector.
    #[inline]
    pub fn node_rank(&self, node: usize) -> f64 {
        let mut inbound = 0.0;
        for pred in self.graph.predecessors(node) {
            let d = self.degrees[pred];
            if d != 0 {
                inbound += self.rank[pred] / d as f64;
            }
        }
        self.teleport + self.alpha * inbound
    }
}

/// Computes PageRank by power iteration using a given execution
/// [strategy](Strategy).
///
/// The engine is created from a graph and a [configuration](Config), and then
/// executed via [`run`](Self::run), or one iteration at a time via
/// [`step`](Self::step). The rank vector is available at any time via the
/// [`rank`](Self::rank) method: before the first iteration, it is uniform.
///
/// The engine keeps two vectors: the committed rank vector, which is only read
/// during an iteration, and a scratch vector receiving the new ranks. At the
/// end of an iteration the two vectors are swapped.
///
/// # Examples
///
/// ```
/// use linkrank::graph::DenseGraph;
/// use linkrank::rank::{Config, PageRank, Termination};
///
/// // 0 → 1, 0 → 2, 1 → 0, 1 → 2, 2 → 1, 2 → 2
/// let g = DenseGraph::from_arcs(3, [(0, 1), (0, 2), (1, 0), (1, 2), (2, 1), (2, 2)]).unwrap();
///
/// let mut pr = PageRank::parallel(&g, Config::default()).unwrap();
/// assert_eq!(pr.run(), Termination::Converged);
///
/// let rank = pr.rank();
/// assert!(rank[2] > rank[1] && rank[1] > rank[0]);
/// assert!((rank.iter().sum::<f64>() - 1.0).abs() < 1E-9);
/// ```
pub struct PageRank<'a, G: LinkGraph + Sync, S: Strategy = Parallel> {
    graph: &'a G,
    config: Config,
    strategy: S,
    degrees: Option<Degrees>,

    rank: Box<[f64]>,
    new_rank: Box<[f64]>,
    state: State,
    iteration: usize,
    max_delta: f64,
}

impl<G: LinkGraph + Sync, S: Strategy> std::fmt::Debug for PageRank<'_, G, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageRank")
            .field("config", &self.config)
            .field("strategy", &self.strategy.to_string())
            .field("state", &self.state)
            .field("iteration", &self.iteration)
            .field("max_delta", &self.max_delta)
            .finish_non_exhaustive()
    }
}

impl<'a, G: LinkGraph + Sync> PageRank<'a, G, Sequential> {
    /// Creates a new computation using the [sequential](Sequential)
    /// strategy.
    pub fn sequential(graph: &'a G, config: Config) -> Result<Self, PageRankError> {
        Self::new(graph, config, Sequential)
    }
}

impl<'a, G: LinkGraph + Sync> PageRank<'a, G, Parallel> {
    /// Creates a new computation using the [parallel](Parallel) strategy
    /// with [`num_threads`](Config::num_threads) threads and the configured
    /// [granularity](Config::granularity).
    pub fn parallel(graph: &'a G, config: Config) -> Result<Self, PageRankError> {
        config.validate()?;
        let strategy = Parallel::new(config.num_threads, config.granularity)?;
        Self::new(graph, config, strategy)
    }
}

impl<'a, G: LinkGraph + Sync, S: Strategy> PageRank<'a, G, S> {
    /// Creates a new computation using the given strategy.
    ///
    /// The fields of `config` describing the strategy, such as
    /// [`num_threads`](Config::num_threads) and
    /// [`granularity`](Config::granularity) for [`Parallel`], are replaced by
    /// the values of `strategy` (see [`Strategy::configure`]), so that
    /// [`config`](Self::config) always reports the parameters in use.
    ///
    /// Returns an error if the configuration is not
    /// [valid](Config::validate) or if the graph has no nodes.
    pub fn new(graph: &'a G, mut config: Config, strategy: S) -> Result<Self, PageRankError> {
        strategy.configure(&mut config);
        config.validate()?;
        let n = graph.num_nodes();
        if n == 0 {
            return Err(PageRankError::Empty);
        }

        Ok(Self {
            graph,
            config,
            strategy,
            degrees: None,
            rank: vec![1.0 / n as f64; n].into_boxed_slice(),
            new_rank: vec![0.0; n].into_boxed_slice(),
            state: State::Running,
            iteration: 0,
            max_delta: f64::INFINITY,
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the strategy.
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Returns the rank vector.
    pub fn rank(&self) -> &[f64] {
        &self.rank
    }

    /// Consumes the computation and returns the rank vector.
    pub fn into_rank(self) -> Box<[f64]> {
        self.rank
    }

    /// Returns the number of iterations performed so far.
    pub fn iterations(&self) -> usize {
        self.iteration
    }

    /// Returns the maximum absolute change of a rank during the last
    /// iteration, or infinity if no iteration has been performed.
    pub fn max_delta(&self) -> f64 {
        self.max_delta
    }

    /// Returns the current state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Returns the outdegrees of the graph, if they have already been
    /// computed by the first iteration.
    pub fn degrees(&self) -> Option<&Degrees> {
        self.degrees.as_ref()
    }

    /// Returns the sum of the ranks, computed using Kahan summation.
    pub fn total_rank(&self) -> f64 {
        self.rank
            .iter()
            .fold(KahanSum::new(), |sum, &r| sum + r)
            .sum()
    }

    /// Performs a single iteration and returns the new state.
    ///
    /// If the computation is already in a final state, this method does
    /// nothing. If the maximum number of iterations has been reached, the
    /// state becomes [`IterationCapExceeded`](State::IterationCapExceeded)
    /// without iterating.
    pub fn step(&mut self) -> State {
        self.iterate(no_logging![])
    }

    /// Iterates until convergence or until the maximum number of iterations
    /// is reached.
    ///
    /// Calling this method on a computation that is already in a final state
    /// returns immediately.
    pub fn run(&mut self) -> Termination {
        self.run_with_logging(no_logging![], no_logging![])
    }

    /// Iterates until convergence or until the maximum number of iterations
    /// is reached, logging progress.
    ///
    /// `pl` is a sequential [`ProgressLog`] used for outdegree computation and
    /// iteration counting. `cpl` is a [`ConcurrentProgressLog`] used for
    /// node-level progress inside each iteration. Their options will be
    /// preserved, making thus possible to customize the logs.
    ///
    /// It is possible to specify either `pl` or `cpl` as
    /// [`no_logging![]`](dsi_progress_logger::no_logging) if you don't want to
    /// log the corresponding part of the computation.
    pub fn run_with_logging(
        &mut self,
        pl: &mut impl ProgressLog,
        cpl: &mut impl ConcurrentProgressLog,
    ) -> Termination {
        log::info!("Strategy: {}", self.strategy);
        log::info!("Alpha: {}", self.config.alpha);
        log::info!("Threshold: {}", self.config.threshold);
        match self.config.max_iter {
            Some(max_iter) => log::info!("Maximum number of iterations: {max_iter}"),
            None => log::info!("Maximum number of iterations: unbounded"),
        }

        self.init_degrees(pl);

        pl.item_name("iteration");
        pl.expected_updates(self.config.max_iter);
        pl.start(format!(
            "Computing PageRank (alpha={}, threshold={})...",
            self.config.alpha, self.config.threshold
        ));

        let termination = loop {
            let before = self.iteration;
            let state = self.iterate(cpl);
            if self.iteration > before {
                log::info!(
                    "Iteration {}: max delta = {}",
                    self.iteration,
                    self.max_delta
                );
                pl.update_and_display();
            }
            if let Some(termination) = state.termination() {
                break termination;
            }
        };

        pl.done();

        log::info!(
            "Completed after {} iteration(s) ({termination}), total rank = {}",
            self.iteration,
            self.total_rank()
        );

        termination
    }

    fn init_degrees(&mut self, pl: &mut impl ProgressLog) {
        if self.degrees.is_none() {
            let degrees = Degrees::new_with_logging(self.graph, pl);
            log::info!("{} arcs", degrees.num_arcs());
            log::info!("{} dangling nodes", degrees.num_dangling());
            self.degrees = Some(degrees);
        }
    }

    fn cap_reached(&self) -> bool {
        self.config
            .max_iter
            .is_some_and(|max_iter| self.iteration >= max_iter)
    }

    fn iterate(&mut self, cpl: &mut impl ConcurrentProgressLog) -> State {
        if self.state != State::Running {
            return self.state;
        }
        if self.cap_reached() {
            self.state = State::IterationCapExceeded;
            return self.state;
        }

        let n = self.rank.len();
        let graph = self.graph;
        let degrees = &*self.degrees.get_or_insert_with(|| Degrees::new(graph));
        let iteration = Iteration {
            graph,
            degrees,
            rank: &self.rank,
            alpha: self.config.alpha,
            teleport: (1.0 - self.config.alpha) / n as f64,
            threshold: self.config.threshold,
        };

        cpl.item_name("node");
        cpl.expected_updates(Some(n));
        cpl.start(format!("Iteration {}...", self.iteration + 1));
        self.strategy.update(&iteration, &mut self.new_rank, cpl);
        cpl.done();

        let Check {
            converged,
            max_delta,
        } = self.strategy.check(&iteration, &self.new_rank);

        // Commit
        std::mem::swap(&mut self.rank, &mut self.new_rank);
        self.iteration += 1;
        self.max_delta = max_delta;

        self.state = if converged {
            State::Converged
        } else if self.cap_reached() {
            State::IterationCapExceeded
        } else {
            State::Running
        };
        self.state
    }
}

/// Computes PageRank of `graph` with the [parallel](Parallel) strategy.
///
/// Returns [`PageRankError::NotConverged`] if a maximum number of iterations
/// is configured and convergence is not reached within it.
///
/// # Examples
///
/// ```
/// use linkrank::graph::DenseGraph;
/// use linkrank::rank::{Config, pagerank};
///
/// let g = DenseGraph::from_arcs(1, [(0, 0)]).unwrap();
/// let rank = pagerank(&g, Config::default()).unwrap();
/// assert!((rank[0] - 1.0).abs() < 1E-12);
/// ```
pub fn pagerank<G: LinkGraph + Sync>(
    graph: &G,
    config: Config,
) -> Result<Box<[f64]>, PageRankError> {
    let mut pr = PageRank::parallel(graph, config)?;
    match pr.run() {
        Termination::Converged => Ok(pr.into_rank()),
        Termination::IterationCapExceeded => Err(PageRankError::NotConverged {
            iterations: pr.iterations(),
        }),
    }
}
