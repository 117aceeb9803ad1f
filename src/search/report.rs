//! Run records: one line per search run, appended to a `;`-delimited file.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::solver::{Algorithm, SearchOutcome};
use super::stats::SearchStats;

/// Column names, written once when the file is created.
pub const HEADER: &str = "algorithm;level;duration_ms;created;visited;moves;solved";

/// Summary of one search run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    pub algorithm: Algorithm,
    pub level: String,
    pub duration_ms: u64,
    pub created: usize,
    pub visited: usize,
    /// Solution length; `None` when unsolved.
    pub moves: Option<u32>,
    pub solved: bool,
}

impl RunRecord {
    /// Build a record from the result of a run.
    pub fn new(
        algorithm: Algorithm,
        level: impl Into<String>,
        outcome: SearchOutcome,
        stats: &SearchStats,
    ) -> Self {
        Self {
            algorithm,
            level: level.into(),
            duration_ms: stats.time_ms(),
            created: stats.created,
            visited: stats.visited,
            moves: stats.solution_length,
            solved: outcome == SearchOutcome::Solved,
        }
    }

    /// The record as one delimited line, without a trailing newline.
    ///
    /// An unsolved run leaves the `moves` column empty. Delimiters and line
    /// breaks in the level label are written as `_`.
    #[must_use]
    pub fn to_line(&self) -> String {
        let moves = self.moves.map(|m| m.to_string()).unwrap_or_default();
        let level = self.level.replace([';', '\n', '\r'], "_");
        format!(
            "{};{};{};{};{};{};{}",
            self.algorithm, level, self.duration_ms, self.created, self.visited, moves, self.solved
        )
    }

    /// Append this record to `path`, writing the header first if the file is
    /// new or empty.
    pub fn append_to(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        if file.metadata()?.len() == 0 {
            writeln!(file, "{HEADER}")?;
        }
        writeln!(file, "{}", self.to_line())
    }
}
