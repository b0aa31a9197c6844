/*
 * SPDX-FileCopyrightText: 2026 The linkrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::{ArcsArgs, FloatVectorFormat, GlobalArgs, RandomArgs, RankArgs, print_ranks};
use anyhow::Result;
use clap::Parser;
use dsi_progress_logger::{
    ConcurrentProgressLog, ProgressLog, concurrent_progress_logger, progress_logger,
};
use linkrank::graph::DenseGraph;
use linkrank::rank::{PageRank, Strategy, Termination};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "pagerank",
    about = "Computes PageRank by power iteration on a random graph or on an arc list.",
    long_about = None
)]
pub struct CliArgs {
    #[arg(long)]
    /// Read the graph from this ASCII arc list instead of generating it.
    pub arcs: Option<PathBuf>,

    #[arg(long, requires = "arcs")]
    /// The number of nodes of the graph read from the arc list (default: the
    /// largest node plus one).
    pub num_nodes: Option<usize>,

    #[clap(flatten)]
    pub arcs_args: ArcsArgs,

    #[clap(flatten)]
    pub random: RandomArgs,

    #[clap(flatten)]
    pub rank: RankArgs,

    #[arg(long)]
    /// Use the sequential strategy instead of the thread pool.
    pub sequential: bool,

    #[arg(short, long)]
    /// Where to store the rank vector (default: print it on standard output).
    pub output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = FloatVectorFormat::Ascii)]
    /// The output format for the rank vector.
    pub fmt: FloatVectorFormat,

    #[arg(long)]
    /// Decimal digits for text output formats.
    pub precision: Option<usize>,
}

pub fn main(global_args: GlobalArgs, args: CliArgs) -> Result<()> {
    let config = args.rank.to_config()?;

    let mut pl = progress_logger![];
    pl.display_memory(true);
    if let Some(log_interval) = global_args.log_interval {
        pl.log_interval(log_interval);
    }

    let mut cpl = concurrent_progress_logger![];
    cpl.display_memory(true);
    if let Some(log_interval) = global_args.log_interval {
        cpl.log_interval(log_interval);
    }

    let graph = match &args.arcs {
        Some(path) => {
            log::info!("Loading arcs from {}", path.display());
            args.arcs_args.load(path, args.num_nodes)?
        }
        None => {
            log::info!(
                "Generating a random graph with {} nodes and {} links per node (seed {})",
                args.random.nodes,
                args.random.links_per_node,
                args.random.seed
            );
            args.random.to_graph(&mut pl)?
        }
    };

    let rank = if args.sequential {
        rank(PageRank::sequential(&graph, config)?, &mut pl, &mut cpl)
    } else {
        rank(PageRank::parallel(&graph, config)?, &mut pl, &mut cpl)
    };

    match &args.output {
        Some(path) => args.fmt.store(path, &rank, args.precision)?,
        None => print_ranks(std::io::stdout().lock(), &rank, args.precision)?,
    }

    Ok(())
}

fn rank<S: Strategy>(
    mut pr: PageRank<'_, DenseGraph, S>,
    pl: &mut impl ProgressLog,
    cpl: &mut impl ConcurrentProgressLog,
) -> Box<[f64]> {
    let start = std::time::Instant::now();
    let termination = pr.run_with_logging(pl, cpl);
    if termination == Termination::IterationCapExceeded {
        log::warn!(
            "Stopped after {} iteration(s) without convergence: max delta = {}",
            pr.iterations(),
            pr.max_delta()
        );
    }
    log::info!("Ranking took {:.3} seconds", start.elapsed().as_secs_f64());
    pr.into_rank()
}
