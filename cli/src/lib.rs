/*
 * SPDX-FileCopyrightText: 2026 The linkrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#![doc = include_str!("../README.md")]
#![deny(unstable_features)]
#![deny(trivial_casts)]
#![deny(unconditional_recursion)]
#![deny(clippy::empty_loop)]
#![deny(unreachable_code)]
#![deny(unreachable_pub)]
#![deny(unreachable_patterns)]
#![deny(unused_macro_rules)]
#![deny(unused_doc_comments)]

use anyhow::{Context, Result, anyhow, bail, ensure};
use clap::{Args, Parser, Subcommand, ValueEnum};
use dsi_progress_logger::ProgressLog;
use linkrank::Granularity;
use linkrank::graph::DenseGraph;
use linkrank::random::RandomLinks;
use linkrank::rank::{Config, Parallel};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::time::Duration;
use std::time::SystemTime;

pub mod build_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));

    pub fn version_string() -> String {
        format!(
            "{}
git info: {} {} {}
build info: built on {} for {} with {}",
            PKG_VERSION,
            GIT_VERSION.unwrap_or(""),
            GIT_COMMIT_HASH.unwrap_or(""),
            match GIT_DIRTY {
                None => "",
                Some(true) => "(dirty)",
                Some(false) => "(clean)",
            },
            BUILT_TIME_UTC,
            TARGET,
            RUSTC_VERSION
        )
    }
}

/// Parses the number of threads from a string.
///
/// This function is meant to be used with `#[arg(...,  value_parser =
/// num_threads_parser)]`.
pub fn num_threads_parser(arg: &str) -> Result<usize> {
    let num_threads = arg.parse::<usize>()?;
    ensure!(num_threads > 0, "Number of threads must be greater than 0");
    Ok(num_threads)
}

/// Shared CLI arguments for commands that specify a number of threads.
#[derive(Args, Debug)]
pub struct NumThreadsArg {
    #[arg(short = 'j', long, default_value_t = Parallel::DEFAULT_NUM_THREADS, value_parser = num_threads_parser)]
    /// The number of threads to use.
    pub num_threads: usize,
}

/// Shared CLI arguments for commands that specify a granularity.
#[derive(Args, Debug)]
pub struct GranularityArgs {
    #[arg(long, conflicts_with("node_granularity"))]
    /// The tentative number of arcs used to define the size of a parallel job
    /// (advanced option).
    pub arc_granularity: Option<u64>,

    #[arg(long, conflicts_with("arc_granularity"))]
    /// The tentative number of nodes used to define the size of a parallel job
    /// (advanced option).
    pub node_granularity: Option<usize>,
}

impl GranularityArgs {
    pub fn into_granularity(&self) -> Granularity {
        match (self.arc_granularity, self.node_granularity) {
            (Some(_), Some(_)) => unreachable!(),
            (Some(arc_granularity), None) => Granularity::Arcs(arc_granularity),
            (None, Some(node_granularity)) => Granularity::Nodes(node_granularity),
            (None, None) => Granularity::default(),
        }
    }
}

/// Shared CLI arguments for the parameters of PageRank.
#[derive(Args, Debug)]
pub struct RankArgs {
    #[arg(short, long, default_value_t = Config::DEFAULT_ALPHA)]
    /// The damping factor α (must be in the interval (0 . . 1)).
    pub alpha: f64,

    #[arg(short, long, default_value_t = Config::DEFAULT_THRESHOLD)]
    /// Stop when no rank changes by more than this threshold.
    pub threshold: f64,

    #[arg(long)]
    /// Maximum number of iterations.
    pub max_iter: Option<usize>,

    #[clap(flatten)]
    pub num_threads: NumThreadsArg,

    #[clap(flatten)]
    pub granularity: GranularityArgs,
}

impl RankArgs {
    /// Returns the corresponding validated configuration.
    pub fn to_config(&self) -> Result<Config> {
        let config = Config {
            alpha: self.alpha,
            threshold: self.threshold,
            num_threads: self.num_threads.num_threads,
            max_iter: self.max_iter,
            granularity: self.granularity.into_granularity(),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Shared CLI arguments for commands generating random link graphs.
#[derive(Args, Debug)]
pub struct RandomArgs {
    #[arg(short, long, default_value_t = 10_000)]
    /// The number of nodes of the random graph.
    pub nodes: usize,

    #[arg(short, long, default_value_t = 200)]
    /// The number of links attempted by each node; a node picking itself
    /// discards the pick.
    pub links_per_node: usize,

    #[arg(short, long, default_value_t = 0)]
    /// The seed of the pseudorandom number generator.
    pub seed: u64,
}

impl RandomArgs {
    /// Generates the random graph described by the arguments.
    pub fn to_graph(&self, pl: &mut impl ProgressLog) -> Result<DenseGraph> {
        ensure!(self.nodes > 0, "The number of nodes must be positive");
        ensure!(
            self.links_per_node <= self.nodes,
            "The number of links per node ({}) cannot exceed the number of nodes ({})",
            self.links_per_node,
            self.nodes
        );
        Ok(RandomLinks::new(self.nodes, self.links_per_node, self.seed).to_graph_with_logging(pl))
    }
}

#[derive(Args, Debug)]
/// Shared CLI arguments for reading files containing arcs.
pub struct ArcsArgs {
    #[arg(long, default_value_t = '#')]
    /// Ignore lines that start with this symbol.
    pub line_comment_symbol: char,

    #[arg(long, default_value_t = 0)]
    /// How many lines to skip, ignoring comment lines.
    pub lines_to_skip: usize,

    #[arg(long)]
    /// The column separator (default: any whitespace).
    pub separator: Option<char>,

    #[arg(long, default_value_t = 0)]
    /// The index of the column containing the source node of an arc.
    pub source_column: usize,

    #[arg(long, default_value_t = 1)]
    /// The index of the column containing the target node of an arc.
    pub target_column: usize,
}

impl Default for ArcsArgs {
    fn default() -> Self {
        Self {
            line_comment_symbol: '#',
            lines_to_skip: 0,
            separator: None,
            source_column: 0,
            target_column: 1,
        }
    }
}

impl ArcsArgs {
    /// Parses arcs from a reader.
    ///
    /// Empty lines and comment lines are ignored. Returns the arcs and the
    /// number of nodes they imply, that is, the largest node plus one.
    pub fn read_arcs(&self, reader: impl BufRead) -> Result<(Vec<(usize, usize)>, usize)> {
        let biggest_idx = self.source_column.max(self.target_column);
        let mut arcs = vec![];
        let mut num_nodes = 0;
        let mut skipped = 0;

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("Could not read line {}", line_num + 1))?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with(self.line_comment_symbol) {
                continue;
            }
            if skipped < self.lines_to_skip {
                skipped += 1;
                continue;
            }

            let vals: Vec<&str> = match self.separator {
                Some(separator) => trimmed.split(separator).map(str::trim).collect(),
                None => trimmed.split_whitespace().collect(),
            };
            if vals.len() <= biggest_idx {
                bail!(
                    "Line {}: {:?} does not have enough columns: got {} columns but expected at least {}",
                    line_num + 1,
                    line,
                    vals.len(),
                    biggest_idx + 1
                );
            }

            let parse = |column: usize| -> Result<usize> {
                vals[column].parse::<usize>().with_context(|| {
                    format!(
                        "Line {}: could not parse {:?} as a node",
                        line_num + 1,
                        vals[column]
                    )
                })
            };
            let src = parse(self.source_column)?;
            let dst = parse(self.target_column)?;
            num_nodes = num_nodes.max(src.max(dst) + 1);
            arcs.push((src, dst));
        }

        Ok((arcs, num_nodes))
    }

    /// Reads a dense graph from the arc list at `path`.
    ///
    /// If `num_nodes` is `None`, the number of nodes is the largest node in
    /// the list plus one.
    pub fn load(&self, path: impl AsRef<Path>, num_nodes: Option<usize>) -> Result<DenseGraph> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .with_context(|| format!("Could not open arc list {}", path.display()))?;
        let (arcs, implied) = self.read_arcs(BufReader::new(file))?;
        let num_nodes = num_nodes.unwrap_or(implied);
        ensure!(
            implied <= num_nodes,
            "The arc list mentions node {} but the graph has {} nodes",
            implied - 1,
            num_nodes
        );
        log::info!(
            "Read {} arcs on {} nodes from {}",
            arcs.len(),
            num_nodes,
            path.display()
        );
        Ok(DenseGraph::from_arcs(num_nodes, arcs)?)
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
/// Formats for storing vectors of floats.
pub enum FloatVectorFormat {
    /// ASCII format, one float per line.
    Ascii,
    /// A JSON Array.
    Json,
}

impl FloatVectorFormat {
    /// Stores float values in the specified `path` using the format defined by
    /// `self`.
    ///
    /// `precision` will be used to truncate the float values to the specified
    /// number of decimal digits. If `None`, [zmij](https://crates.io/crates/zmij)
    /// formatting will be used.
    pub fn store(&self, path: impl AsRef<Path>, values: &[f64], precision: Option<usize>) -> Result<()> {
        create_parent_dir(&path)?;
        let path_display = path.as_ref().display();
        let file = std::fs::File::create(&path)
            .with_context(|| format!("Could not create vector at {}", path_display))?;
        let mut file = BufWriter::new(file);

        match self {
            FloatVectorFormat::Ascii => {
                log::info!("Storing in ASCII format at {}", path_display);
                let mut buf = zmij::Buffer::new();
                for word in values.iter() {
                    match precision {
                        None => writeln!(file, "{}", buf.format(*word)),
                        Some(precision) => writeln!(file, "{word:.precision$}"),
                    }
                    .with_context(|| format!("Could not write vector to {}", path_display))?;
                }
            }
            FloatVectorFormat::Json => {
                log::info!("Storing in JSON format at {}", path_display);
                let mut buf = zmij::Buffer::new();
                write!(file, "[")?;
                for (i, word) in values.iter().enumerate() {
                    let sep = if i == 0 { "" } else { ", " };
                    match precision {
                        None => write!(file, "{sep}{}", buf.format(*word)),
                        Some(precision) => write!(file, "{sep}{word:.precision$}"),
                    }
                    .with_context(|| format!("Could not write vector to {}", path_display))?;
                }
                write!(file, "]")?;
            }
        }

        file.flush()
            .with_context(|| format!("Could not write vector to {}", path_display))?;
        Ok(())
    }
}

/// Writes one line `Page i Rank: r` for each rank.
pub fn print_ranks(mut out: impl Write, ranks: &[f64], precision: Option<usize>) -> Result<()> {
    let mut buf = zmij::Buffer::new();
    for (page, rank) in ranks.iter().enumerate() {
        match precision {
            None => writeln!(out, "Page {page} Rank: {}", buf.format(*rank)),
            Some(precision) => writeln!(out, "Page {page} Rank: {rank:.precision$}"),
        }?;
    }
    out.flush()?;
    Ok(())
}

/// Creates all parent directories of the given file path.
pub fn create_parent_dir(file_path: impl AsRef<Path>) -> Result<()> {
    // ensure that the dst directory exists
    if let Some(parent_dir) = file_path.as_ref().parent() {
        std::fs::create_dir_all(parent_dir).with_context(|| {
            format!(
                "Failed to create the directory {:?}",
                parent_dir.to_string_lossy()
            )
        })?;
    }
    Ok(())
}

/// Parses a duration from a string.
/// If no suffix is given, it is assumed to be in milliseconds.
/// You can use suffixes, the available ones are:
/// - `s` for seconds
/// - `m` for minutes
/// - `h` for hours
/// - `d` for days
///
/// Example: `1d2h3m4s567` this is parsed as: 1 day, 2 hours, 3 minutes, 4 seconds, and 567 milliseconds.
fn parse_duration(value: &str) -> Result<Duration> {
    if value.is_empty() {
        bail!("Empty duration string, if you want every 0 milliseconds use `0`.");
    }
    let mut duration = Duration::from_secs(0);
    let mut acc = String::new();
    for c in value.chars() {
        if c.is_ascii_digit() {
            acc.push(c);
        } else if c.is_whitespace() {
            continue;
        } else {
            let dur = acc.parse::<u64>()?;
            match c {
                's' => duration += Duration::from_secs(dur),
                'm' => duration += Duration::from_secs(dur * 60),
                'h' => duration += Duration::from_secs(dur * 60 * 60),
                'd' => duration += Duration::from_secs(dur * 60 * 60 * 24),
                _ => return Err(anyhow!("Invalid duration suffix: {}", c)),
            }
            acc.clear();
        }
    }
    if !acc.is_empty() {
        let dur = acc.parse::<u64>()?;
        duration += Duration::from_millis(dur);
    }
    Ok(duration)
}

/// Initializes the `env_logger` logger with a custom format including
/// timestamps with elapsed time since initialization.
pub fn init_env_logger() -> Result<()> {
    use jiff::SpanRound;
    use jiff::fmt::friendly::{Designator, Spacing, SpanPrinter};

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

    let start = std::time::Instant::now();
    let printer = SpanPrinter::new()
        .spacing(Spacing::None)
        .designator(Designator::Compact);
    let span_round = SpanRound::new()
        .largest(jiff::Unit::Day)
        .smallest(jiff::Unit::Millisecond)
        .days_are_24_hours();

    builder.format(move |buf, record| {
        let Ok(ts) = jiff::Timestamp::try_from(SystemTime::now()) else {
            return Err(std::io::Error::other("Failed to get timestamp"));
        };
        let style = buf.default_level_style(record.level());
        let elapsed = start.elapsed();
        let span = jiff::Span::new()
            .seconds(elapsed.as_secs() as i64)
            .milliseconds(elapsed.subsec_millis() as i64);
        let span = span.round(span_round).map_err(std::io::Error::other)?;
        writeln!(
            buf,
            "{} {} {style}{}{style:#} [{:?}] {} - {}",
            ts.strftime("%F %T%.3f"),
            printer.span_to_string(&span),
            record.level(),
            std::thread::current().id(),
            record.target(),
            record.args()
        )
    });
    builder.try_init()?;
    Ok(())
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    #[arg(long, value_parser = parse_duration, global=true, display_order = 1000)]
    /// How often to log progress. Default is 10s. You can use the suffixes "s"
    /// for seconds, "m" for minutes, "h" for hours, and "d" for days. If no
    /// suffix is provided it is assumed to be in milliseconds.
    /// Example: "1d2h3m4s567" is parsed as 1 day + 2 hours + 3 minutes + 4
    /// seconds + 567 milliseconds = 93784567 milliseconds.
    pub log_interval: Option<Duration>,
}

#[derive(Subcommand, Debug)]
pub enum SubCommands {
    #[clap(name = "pagerank", visible_alias = "pr")]
    PageRank(pagerank::CliArgs),
    Bench(bench::CliArgs),
}

#[derive(Parser, Debug)]
#[command(name = "linkrank", version=build_info::version_string())]
/// Computes PageRank on dense link graphs, sequentially or in parallel.
///
/// Noteworthy environment variables:
///
/// - RUST_MIN_STACK: minimum thread stack size (in bytes); the worker pool
///   uses it for its threads.
///
/// - RUST_LOG: configuration for env_logger
///   <https://docs.rs/env_logger/latest/env_logger/>
pub struct Cli {
    #[command(subcommand)]
    pub command: SubCommands,
    #[clap(flatten)]
    pub args: GlobalArgs,
}

pub mod bench;
pub mod pagerank;

/// The entry point of the command-line interface.
pub fn cli_main<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let start = std::time::Instant::now();
    let cli = Cli::parse_from(args);
    match cli.command {
        SubCommands::PageRank(args) => {
            pagerank::main(cli.args, args)?;
        }
        SubCommands::Bench(args) => {
            bench::main(cli.args, args)?;
        }
    }

    log::info!(
        "The command took {}",
        pretty_print_elapsed(start.elapsed().as_secs_f64())
    );

    Ok(())
}

/// Pretty-prints seconds in a human-readable format.
fn pretty_print_elapsed(elapsed: f64) -> String {
    const UNITS: [(u64, &str); 4] = [
        (60 * 60 * 24 * 7, "week"),
        (60 * 60 * 24, "day"),
        (60 * 60, "hour"),
        (60, "minute"),
    ];

    let mut result = String::new();
    let mut elapsed_seconds = elapsed as u64;
    for (seconds, name) in UNITS {
        let count = elapsed_seconds / seconds;
        elapsed_seconds %= seconds;
        match count {
            0 => {}
            1 => result.push_str(&format!("1 {name} ")),
            _ => result.push_str(&format!("{count} {name}s ")),
        }
    }

    result.push_str(&format!("{:.3} seconds ({}s)", elapsed % 60.0, elapsed));
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    mod float_vector_format {
        use super::*;

        #[test]
        fn test_ascii() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("test.txt");
            let values: Vec<f64> = vec![1.5, 2.75, 3.0];
            FloatVectorFormat::Ascii
                .store(&path, &values, None)
                .unwrap();
            let content = std::fs::read_to_string(&path).unwrap();
            for (line, expected) in content.lines().zip(&values) {
                let parsed: f64 = line.trim().parse().unwrap();
                assert_eq!(parsed, *expected);
            }
            assert_eq!(content.lines().count(), 3);
        }

        #[test]
        fn test_ascii_with_precision() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("test.txt");
            let values: Vec<f64> = vec![1.123456789, 2.987654321];
            FloatVectorFormat::Ascii
                .store(&path, &values, Some(3))
                .unwrap();
            let content = std::fs::read_to_string(&path).unwrap();
            let lines: Vec<&str> = content.lines().collect();
            assert_eq!(lines, vec!["1.123", "2.988"]);
        }

        #[test]
        fn test_json() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("test.json");
            let values: Vec<f64> = vec![1.5, 2.75, 3.0, 0.037500000000000006];
            FloatVectorFormat::Json.store(&path, &values, None).unwrap();
            let content = std::fs::read_to_string(&path).unwrap();
            let parsed: Vec<f64> = serde_json::from_str(&content).unwrap();
            assert_eq!(parsed, values);
        }

        #[test]
        fn test_json_with_precision() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("test.json");
            let values: Vec<f64> = vec![1.123456789, 2.987654321];
            FloatVectorFormat::Json
                .store(&path, &values, Some(2))
                .unwrap();
            let content = std::fs::read_to_string(&path).unwrap();
            assert_eq!(content, "[1.12, 2.99]");
        }

        #[test]
        fn test_json_empty() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("test.json");
            FloatVectorFormat::Json.store(&path, &[], None).unwrap();
            let content = std::fs::read_to_string(&path).unwrap();
            assert_eq!(content, "[]");
        }

        #[test]
        fn test_creates_parent_dirs() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("a").join("b").join("rank.txt");
            FloatVectorFormat::Ascii.store(&path, &[0.5], None).unwrap();
            assert!(path.exists());
        }
    }

    mod arcs {
        use super::*;

        #[test]
        fn test_read_arcs() -> Result<()> {
            let input = "# a comment\n0 1\n0\t2\n\n1 0\n2 2\n";
            let (arcs, num_nodes) = ArcsArgs::default().read_arcs(input.as_bytes())?;
            assert_eq!(arcs, vec![(0, 1), (0, 2), (1, 0), (2, 2)]);
            assert_eq!(num_nodes, 3);
            Ok(())
        }

        #[test]
        fn test_read_arcs_columns() -> Result<()> {
            let args = ArcsArgs {
                separator: Some(','),
                source_column: 2,
                target_column: 0,
                lines_to_skip: 1,
                ..ArcsArgs::default()
            };
            let input = "dst,label,src\n1,x,0\n4,y,3\n";
            let (arcs, num_nodes) = args.read_arcs(input.as_bytes())?;
            assert_eq!(arcs, vec![(0, 1), (3, 4)]);
            assert_eq!(num_nodes, 5);
            Ok(())
        }

        #[test]
        fn test_read_arcs_errors() {
            let args = ArcsArgs::default();
            assert!(args.read_arcs("0 1\n2\n".as_bytes()).is_err());
            assert!(args.read_arcs("0 x\n".as_bytes()).is_err());
        }

        #[test]
        fn test_load() -> Result<()> {
            let dir = tempfile::tempdir()?;
            let path = dir.path().join("arcs.txt");
            std::fs::write(&path, "0 1\n1 2\n2 0\n")?;
            let g = ArcsArgs::default().load(&path, None)?;
            assert_eq!(linkrank::graph::LinkGraph::num_nodes(&g), 3);
            let g = ArcsArgs::default().load(&path, Some(5))?;
            assert_eq!(linkrank::graph::LinkGraph::num_nodes(&g), 5);
            assert!(ArcsArgs::default().load(&path, Some(2)).is_err());
            Ok(())
        }
    }

    #[test]
    fn test_print_ranks() -> Result<()> {
        let mut out = vec![];
        print_ranks(&mut out, &[0.25, 0.75], Some(2))?;
        assert_eq!(String::from_utf8(out)?, "Page 0 Rank: 0.25\nPage 1 Rank: 0.75\n");
        Ok(())
    }

    #[test]
    fn test_parse_duration() -> Result<()> {
        assert_eq!(parse_duration("1500")?, Duration::from_millis(1500));
        assert_eq!(parse_duration("2m3s")?, Duration::from_secs(123));
        assert_eq!(
            parse_duration("1d2h3m4s567")?,
            Duration::from_millis(93_784_567)
        );
        assert!(parse_duration("").is_err());
        assert!(parse_duration("3x").is_err());
        Ok(())
    }

    #[test]
    fn test_pretty_print_elapsed() {
        assert_eq!(pretty_print_elapsed(1.5), "1.500 seconds (1.5s)");
        assert_eq!(
            pretty_print_elapsed(3723.25),
            "1 hour 2 minutes 3.250 seconds (3723.25s)"
        );
    }

    #[test]
    fn test_rank_args() {
        let cli = Cli::parse_from([
            "linkrank",
            "pr",
            "--alpha",
            "0.9",
            "--max-iter",
            "10",
            "-j",
            "3",
            "--node-granularity",
            "16",
        ]);
        let SubCommands::PageRank(args) = cli.command else {
            panic!("Unexpected subcommand");
        };
        let config = args.rank.to_config().unwrap();
        assert_eq!(config.alpha, 0.9);
        assert_eq!(config.max_iter, Some(10));
        assert_eq!(config.num_threads, 3);
        assert_eq!(config.granularity, Granularity::Nodes(16));
        assert_eq!(config.threshold, Config::DEFAULT_THRESHOLD);
    }
}
