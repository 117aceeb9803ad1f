//! Search configuration parameters.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Search configuration parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum path cost (moves from the root) a node may have (0 = unlimited).
    /// Applies to every algorithm; deeper nodes are never expanded.
    pub max_depth: u32,

    /// Maximum nodes to create (0 = unlimited).
    /// Prevents memory exhaustion on large levels.
    pub max_nodes: usize,

    /// Wall-clock limit in milliseconds (None = unlimited).
    pub time_limit_ms: Option<u64>,

    /// Use the recursive variants of DFS and backtracking.
    /// The iterative variants visit nodes in the same order.
    pub recursive: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: 80,
            max_nodes: 1_000_000,
            time_limit_ms: None,
            recursive: false,
        }
    }
}

impl SearchConfig {
    /// Create a new config with custom max depth.
    pub fn with_max_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }

    /// Create a new config with custom node budget.
    pub fn with_max_nodes(mut self, nodes: usize) -> Self {
        self.max_nodes = nodes;
        self
    }

    /// Create a new config with a wall-clock limit.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Create a new config selecting recursive or iterative depth-first variants.
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// The wall-clock limit as a `Duration`.
    #[must_use]
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_ms.map(Duration::from_millis)
    }

    /// Check whether a node at `depth` may still be expanded.
    #[inline]
    #[must_use]
    pub fn allows_depth(&self, depth: u32) -> bool {
        self.max_depth == 0 || depth < self.max_depth
    }

    /// Check whether `created` nodes is within the node budget.
    #[inline]
    #[must_use]
    pub fn allows_nodes(&self, created: usize) -> bool {
        self.max_nodes == 0 || created < self.max_nodes
    }
}
