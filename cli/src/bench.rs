/*
 * SPDX-FileCopyrightText: 2026 The linkrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::{GlobalArgs, RandomArgs, RankArgs};
use anyhow::{Result, ensure};
use clap::Parser;
use dsi_progress_logger::{ProgressLog, no_logging, progress_logger};
use linkrank::PageRankError;
use linkrank::graph::DenseGraph;
use linkrank::rank::{Config, PageRank, Strategy};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "bench",
    about = "Times the sequential and the parallel strategy on the same random graph.",
    long_about = None
)]
pub struct CliArgs {
    #[clap(flatten)]
    pub random: RandomArgs,

    #[clap(flatten)]
    pub rank: RankArgs,

    #[arg(short, long, default_value_t = 1)]
    /// How many times to run each strategy; the best time is reported.
    pub repeats: usize,
}

/// The outcome of timing one strategy.
#[derive(Debug)]
pub struct Timing {
    pub rank: Box<[f64]>,
    pub iterations: usize,
    pub best: Duration,
}

pub fn main(global_args: GlobalArgs, args: CliArgs) -> Result<()> {
    ensure!(args.repeats > 0, "The number of repeats must be positive");
    let config = args.rank.to_config()?;

    let mut pl = progress_logger![];
    if let Some(log_interval) = global_args.log_interval {
        pl.log_interval(log_interval);
    }
    let graph = args.random.to_graph(&mut pl)?;

    let seq = time(&graph, config, args.repeats, PageRank::sequential)?;
    log::info!(
        "Sequential: {} iteration(s), best time {:.3} seconds",
        seq.iterations,
        seq.best.as_secs_f64()
    );

    let par = time(&graph, config, args.repeats, PageRank::parallel)?;
    log::info!(
        "Parallel ({} threads): {} iteration(s), best time {:.3} seconds",
        config.num_threads,
        par.iterations,
        par.best.as_secs_f64()
    );

    log::info!(
        "Speedup: {:.2}x",
        seq.best.as_secs_f64() / par.best.as_secs_f64()
    );
    log::info!(
        "L∞ distance between the results: {:e}",
        l_inf_distance(&seq.rank, &par.rank)
    );

    Ok(())
}

/// Runs the engine built by `build` `repeats` times and returns the best time.
pub fn time<'a, S: Strategy>(
    graph: &'a DenseGraph,
    config: Config,
    repeats: usize,
    build: impl Fn(&'a DenseGraph, Config) -> Result<PageRank<'a, DenseGraph, S>, PageRankError>,
) -> Result<Timing> {
    let mut best = Duration::MAX;
    let mut last = None;
    for _ in 0..repeats {
        let mut pr = build(graph, config)?;
        // Degrees are part of the measured work
        let start = std::time::Instant::now();
        let termination = pr.run_with_logging(no_logging![], no_logging![]);
        best = best.min(start.elapsed());
        log::debug!("{}: {termination}", pr.strategy());
        last = Some(pr);
    }
    let pr = last.ok_or_else(|| anyhow::anyhow!("No run was performed"))?;
    Ok(Timing {
        iterations: pr.iterations(),
        rank: pr.into_rank(),
        best,
    })
}

fn l_inf_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}
