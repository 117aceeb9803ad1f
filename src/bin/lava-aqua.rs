//! lava-aqua - solve a level with one or all search algorithms.
//!
//! Prints each algorithm's outcome, counters and move sequence. With
//! `--stats <path>` every run is also appended as a `;`-delimited record.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;

use lava_aqua::core::LevelData;
use lava_aqua::rules::PuzzleProblem;
use lava_aqua::search::{Algorithm, RunRecord, Search, SearchConfig, SearchOutcome};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum AlgorithmArg {
    Dfs,
    Bfs,
    Ucs,
    Backtracking,
    Astar,
    All,
}

impl AlgorithmArg {
    fn algorithms(self) -> Vec<Algorithm> {
        match self {
            AlgorithmArg::Dfs => vec![Algorithm::Dfs],
            AlgorithmArg::Bfs => vec![Algorithm::Bfs],
            AlgorithmArg::Ucs => vec![Algorithm::Ucs],
            AlgorithmArg::Backtracking => vec![Algorithm::Backtracking],
            AlgorithmArg::Astar => vec![Algorithm::AStar],
            AlgorithmArg::All => Algorithm::ALL.to_vec(),
        }
    }
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Level file to solve
    #[arg(short, long, value_name = "LEVEL_FILE")]
    level: PathBuf,

    /// Search algorithm to run
    #[arg(short, long, value_enum, default_value = "astar")]
    algorithm: AlgorithmArg,

    /// Deepest path cost expanded (0 = unlimited)
    #[arg(long, default_value_t = SearchConfig::default().max_depth)]
    max_depth: u32,

    /// Node budget per run (0 = unlimited)
    #[arg(long, default_value_t = SearchConfig::default().max_nodes)]
    max_nodes: usize,

    /// Wall-clock limit per run, in milliseconds
    #[arg(long)]
    time_limit_ms: Option<u64>,

    /// Use recursive DFS and backtracking
    #[arg(long)]
    recursive: bool,

    /// Append run records to this file
    #[arg(long, value_name = "STATS_FILE")]
    stats: Option<PathBuf>,

    /// Log level when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl Args {
    fn search_config(&self) -> SearchConfig {
        let mut config = SearchConfig::default()
            .with_max_depth(self.max_depth)
            .with_max_nodes(self.max_nodes)
            .with_recursive(self.recursive);
        if let Some(ms) = self.time_limit_ms {
            config = config.with_time_limit_ms(ms);
        }
        config
    }
}

fn init_tracing(level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let level = LevelData::from_path(&args.level)
        .with_context(|| format!("loading level {}", args.level.display()))?;
    let label = args
        .level
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.level.display().to_string());

    let config = args.search_config();
    info!(level = %label, ?config, "Solving");
    let mut search = Search::new(PuzzleProblem::from_level(&level), config);

    for algorithm in args.algorithm.algorithms() {
        let outcome = search
            .run(algorithm)
            .with_context(|| format!("running {algorithm}"))?;
        let stats = search.stats();

        println!(
            "{algorithm:<12} {outcome:?}: {} created, {} visited ({:.0}/s), {} ms",
            stats.created,
            stats.visited,
            stats.visited_per_second(),
            stats.time_ms()
        );
        if outcome == SearchOutcome::Solved {
            let moves: Vec<&str> = search
                .solution_actions()
                .unwrap_or_default()
                .into_iter()
                .map(|d| d.name())
                .collect();
            println!(
                "{:<12} {} moves (cost {}): {}",
                "",
                moves.len(),
                stats.solution_cost.unwrap_or_default(),
                moves.join(" ")
            );
        }

        if let Some(path) = &args.stats {
            RunRecord::new(algorithm, label.as_str(), outcome, stats)
                .append_to(path)
                .with_context(|| format!("writing run record to {}", path.display()))?;
        }
    }

    Ok(())
}
