//! Search statistics for diagnostics and run records.

use serde::{Deserialize, Serialize};

/// Statistics collected during one search run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Nodes allocated in the tree (root included).
    pub created: usize,

    /// Nodes taken off the frontier and goal-tested.
    pub visited: usize,

    /// Deepest path cost visited.
    pub max_depth: u32,

    /// Total time spent searching (microseconds).
    pub time_us: u64,

    /// Moves in the solution, if one was found.
    pub solution_length: Option<u32>,

    /// Cost of the solution under the algorithm's own cost function.
    pub solution_cost: Option<u32>,

    /// The search stopped on a node, depth or time budget.
    pub budget_exceeded: bool,
}

impl SearchStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all statistics to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Calculate visited nodes per second.
    #[must_use]
    pub fn visited_per_second(&self) -> f64 {
        if self.time_us == 0 {
            0.0
        } else {
            self.visited as f64 / (self.time_us as f64 / 1_000_000.0)
        }
    }

    /// Elapsed time in whole milliseconds.
    #[must_use]
    pub fn time_ms(&self) -> u64 {
        self.time_us / 1_000
    }
}
