//! Uninformed and informed search over puzzle states.
//!
//! All algorithms share one `Search` context: an arena tree, a set of state
//! hashes already handled, counters, and the budgets from `SearchConfig`.
//! Each run starts from a fresh tree.
//!
//! | Algorithm      | Frontier              | Order                         | Optimal for        |
//! |----------------|-----------------------|-------------------------------|--------------------|
//! | `Dfs`          | stack (or recursion)  | action order                  | nothing            |
//! | `Bfs`          | FIFO queue            | breadth                       | move count         |
//! | `Ucs`          | priority queue        | cumulative lava on the board  | lava cost          |
//! | `Backtracking` | stack (or recursion)  | nearest-to-goal child first   | nothing            |
//! | `AStar`        | priority queue        | moves + Manhattan to goal     | move count         |
//!
//! Goal tests happen when a node is taken off the frontier. Lost nodes are
//! abandoned without expansion. Nodes at the depth ceiling are goal-tested
//! but not expanded.
//!
//! Duplicate detection keys on the state hash together with the phase, since
//! the hash covers the board only and a won board may repeat an earlier one.
//! Every search remembers the shallowest depth each state was handled at and
//! takes the state again when a shorter route turns up, so no route that fits
//! under the depth ceiling is lost to an earlier, longer one.
//!
//! Running out of frontier is a normal outcome (`Exhausted`), not an error.
//! If any part of the space was cut off by a budget the outcome is
//! `BudgetExceeded` instead, since the search could not prove there is no
//! solution.

use std::collections::VecDeque;
use std::str::FromStr;
use std::time::Instant;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;
use tracing::{debug, trace, warn};

use super::config::SearchConfig;
use super::frontier::PriorityQueue;
use super::heuristic::{lava_count, manhattan_to_goal};
use super::node::{Node, NodeId};
use super::stats::SearchStats;
use super::tree::SearchTree;
use crate::core::{Direction, GameError, GameState, Phase};
use crate::rules::Problem;

/// Errors that can occur during search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Game error: {0}")]
    Game(#[from] GameError),

    #[error("Unknown algorithm '{0}' (expected dfs, bfs, ucs, backtracking or astar)")]
    UnknownAlgorithm(String),

    #[error("Search tree is full ({0} nodes)")]
    TreeFull(usize),
}

/// Duplicate-detection key: content hash plus phase.
type StateKey = (u64, Phase);

/// Search algorithm selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Dfs,
    Bfs,
    Ucs,
    Backtracking,
    AStar,
}

impl Algorithm {
    /// Every algorithm, in reporting order.
    pub const ALL: [Algorithm; 5] = [
        Algorithm::Dfs,
        Algorithm::Bfs,
        Algorithm::Ucs,
        Algorithm::Backtracking,
        Algorithm::AStar,
    ];

    /// Short lowercase name, as accepted by `from_str`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Algorithm::Dfs => "dfs",
            Algorithm::Bfs => "bfs",
            Algorithm::Ucs => "ucs",
            Algorithm::Backtracking => "backtracking",
            Algorithm::AStar => "astar",
        }
    }
}

impl FromStr for Algorithm {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dfs" => Ok(Algorithm::Dfs),
            "bfs" => Ok(Algorithm::Bfs),
            "ucs" => Ok(Algorithm::Ucs),
            "backtracking" | "bt" => Ok(Algorithm::Backtracking),
            "astar" | "a*" => Ok(Algorithm::AStar),
            _ => Err(SearchError::UnknownAlgorithm(s.to_string())),
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.name())
    }
}

/// How a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchOutcome {
    /// A winning state was reached.
    Solved,
    /// The frontier emptied without a win; the level has no solution.
    Exhausted,
    /// A node, depth or time budget stopped the search first.
    BudgetExceeded,
}

/// Control flow out of a single visit.
enum Flow {
    Continue,
    Solved(NodeId),
    Halt,
}

/// What to do with a node just taken off the frontier.
enum Verdict {
    Goal,
    Prune,
    /// At the depth ceiling.
    Cut,
    Expand,
    Halt,
}

/// Search context.
///
/// Generic over the problem type. Owns the search tree and configuration,
/// and keeps the result of the last run.
pub struct Search<P: Problem> {
    /// The problem being solved.
    problem: P,

    /// Search configuration.
    config: SearchConfig,

    /// Tree of the last run.
    tree: SearchTree,

    /// States already handled in the last run, with the depth they were
    /// handled at.
    visited: FxHashMap<StateKey, u32>,

    /// Winning node of the last run.
    solution: Option<NodeId>,

    /// Algorithm-specific cost of the solution.
    solution_cost: Option<u32>,

    /// Some node was left unexpanded because of the depth ceiling.
    depth_cut: bool,

    /// Wall-clock start of the current run.
    started: Instant,

    /// Search statistics.
    stats: SearchStats,
}

impl<P: Problem> Search<P> {
    /// Create a new search context.
    pub fn new(problem: P, config: SearchConfig) -> Self {
        Self {
            problem,
            config,
            tree: SearchTree::new(),
            visited: FxHashMap::default(),
            solution: None,
            solution_cost: None,
            depth_cut: false,
            started: Instant::now(),
            stats: SearchStats::default(),
        }
    }

    /// Run `algorithm` from the problem's initial state.
    ///
    /// Clears the result of any previous run.
    pub fn run(&mut self, algorithm: Algorithm) -> Result<SearchOutcome, SearchError> {
        self.started = Instant::now();
        self.stats.reset();
        self.visited.clear();
        self.solution = None;
        self.solution_cost = None;
        self.depth_cut = false;
        let root = self.tree.reset(self.problem.initial().clone())?;

        debug!(
            %algorithm,
            max_depth = self.config.max_depth,
            max_nodes = self.config.max_nodes,
            recursive = self.config.recursive,
            "Search started"
        );

        let halted = match algorithm {
            Algorithm::Dfs | Algorithm::Backtracking => {
                let informed = algorithm == Algorithm::Backtracking;
                if self.config.recursive {
                    self.depth_first_recursive(root, informed)?
                } else {
                    self.depth_first(root, informed)?
                }
            }
            Algorithm::Bfs => self.breadth_first(root)?,
            Algorithm::Ucs => self.best_first(root, lava_count, |_| 0)?,
            Algorithm::AStar => self.best_first(root, |_| 1, manhattan_to_goal)?,
        };

        let outcome = self.finish(halted);
        debug!(
            %algorithm,
            ?outcome,
            created = self.stats.created,
            visited = self.stats.visited,
            max_depth = self.stats.max_depth,
            time_us = self.stats.time_us,
            "Search finished"
        );
        if outcome == SearchOutcome::BudgetExceeded {
            warn!(
                %algorithm,
                created = self.stats.created,
                depth_cut = self.depth_cut,
                "Search budget exhausted before a solution was found"
            );
        }
        Ok(outcome)
    }

    // === Results ===

    /// The winning node of the last run.
    #[must_use]
    pub fn solution(&self) -> Option<&Node> {
        self.solution.map(|id| self.tree.get(id))
    }

    /// Moves from the initial state to the win.
    #[must_use]
    pub fn solution_actions(&self) -> Option<Vec<Direction>> {
        self.solution.map(|id| self.tree.path_actions(id))
    }

    /// States from the initial state to the win, both included.
    #[must_use]
    pub fn solution_states(&self) -> Option<Vec<GameState>> {
        self.solution.map(|id| self.tree.path_states(id))
    }

    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    #[must_use]
    pub fn tree(&self) -> &SearchTree {
        &self.tree
    }

    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    #[must_use]
    pub fn problem(&self) -> &P {
        &self.problem
    }

    // === Shared steps ===

    fn key(&self, id: NodeId) -> StateKey {
        let node = self.tree.get(id);
        (node.hash(), node.state.phase())
    }

    /// Whether the state of `id` was already handled at its depth or
    /// shallower. Without a depth ceiling any earlier visit counts.
    fn is_settled(&self, id: NodeId) -> bool {
        let depth = self.tree.get(id).path_cost;
        self.visited
            .get(&self.key(id))
            .is_some_and(|&seen| self.config.max_depth == 0 || seen <= depth)
    }

    /// Record `id` as handled. Returns false if it was already settled.
    fn settle(&mut self, id: NodeId) -> bool {
        if self.is_settled(id) {
            return false;
        }
        let depth = self.tree.get(id).path_cost;
        self.visited.insert(self.key(id), depth);
        true
    }

    fn out_of_budget(&self) -> bool {
        if !self.config.allows_nodes(self.tree.len()) {
            return true;
        }
        self.config
            .time_limit()
            .is_some_and(|limit| self.started.elapsed() >= limit)
    }

    /// Count, goal-test and classify a node taken off the frontier.
    fn examine(&mut self, id: NodeId) -> Verdict {
        let node = self.tree.get(id);
        let depth = node.path_cost;
        self.stats.visited += 1;
        self.stats.max_depth = self.stats.max_depth.max(depth);
        trace!(node = %id, depth, hash = node.hash(), "visit");

        if self.problem.is_goal(&node.state) {
            return Verdict::Goal;
        }
        if self.problem.is_over(&node.state) {
            return Verdict::Prune;
        }
        if !self.config.allows_depth(depth) {
            self.depth_cut = true;
            return Verdict::Cut;
        }
        if self.out_of_budget() {
            return Verdict::Halt;
        }
        Verdict::Expand
    }

    /// Children of `id`, nearest to the goal first when `informed`.
    fn children(&mut self, id: NodeId, informed: bool) -> Result<SmallVec<[NodeId; 4]>, SearchError> {
        let mut children = self.tree.expand(id, &self.problem)?;
        if informed {
            let tree = &self.tree;
            children.sort_by_key(|c| manhattan_to_goal(&tree.get(*c).state));
        }
        Ok(children)
    }

    fn finish(&mut self, halted: bool) -> SearchOutcome {
        self.stats.created = self.tree.len();
        self.stats.time_us = self.started.elapsed().as_micros() as u64;

        match self.solution {
            Some(id) => {
                let length = self.tree.get(id).path_cost;
                self.stats.solution_length = Some(length);
                self.stats.solution_cost = Some(self.solution_cost.unwrap_or(length));
                SearchOutcome::Solved
            }
            None if halted || self.depth_cut => {
                self.stats.budget_exceeded = true;
                SearchOutcome::BudgetExceeded
            }
            None => SearchOutcome::Exhausted,
        }
    }

    // === Depth-first (DFS, heuristic backtracking) ===

    /// Explicit-stack depth-first search. Returns whether a budget halted it.
    ///
    /// Children are pushed in reverse so they pop in expansion order, which
    /// makes the visit order identical to the recursive variant.
    fn depth_first(&mut self, root: NodeId, informed: bool) -> Result<bool, SearchError> {
        let mut stack = vec![root];

        while let Some(id) = stack.pop() {
            if !self.settle(id) {
                continue;
            }
            match self.examine(id) {
                Verdict::Goal => {
                    self.solution = Some(id);
                    return Ok(false);
                }
                Verdict::Prune | Verdict::Cut => continue,
                Verdict::Halt => return Ok(true),
                Verdict::Expand => {}
            }

            let children = self.children(id, informed)?;
            stack.extend(children.into_iter().rev());
        }

        Ok(false)
    }

    /// Recursive depth-first search. Returns whether a budget halted it.
    fn depth_first_recursive(&mut self, root: NodeId, informed: bool) -> Result<bool, SearchError> {
        match self.descend(root, informed)? {
            Flow::Solved(id) => {
                self.solution = Some(id);
                Ok(false)
            }
            Flow::Halt => Ok(true),
            Flow::Continue => Ok(false),
        }
    }

    fn descend(&mut self, id: NodeId, informed: bool) -> Result<Flow, SearchError> {
        if !self.settle(id) {
            return Ok(Flow::Continue);
        }
        match self.examine(id) {
            Verdict::Goal => return Ok(Flow::Solved(id)),
            Verdict::Prune | Verdict::Cut => return Ok(Flow::Continue),
            Verdict::Halt => return Ok(Flow::Halt),
            Verdict::Expand => {}
        }

        for child in self.children(id, informed)? {
            match self.descend(child, informed)? {
                Flow::Continue => {}
                done => return Ok(done),
            }
        }
        Ok(Flow::Continue)
    }

    // === Breadth-first ===

    /// FIFO search. States are marked on enqueue, so each is queued once.
    fn breadth_first(&mut self, root: NodeId) -> Result<bool, SearchError> {
        let mut queue = VecDeque::from([root]);
        self.settle(root);

        while let Some(id) = queue.pop_front() {
            match self.examine(id) {
                Verdict::Goal => {
                    self.solution = Some(id);
                    return Ok(false);
                }
                Verdict::Prune | Verdict::Cut => continue,
                Verdict::Halt => return Ok(true),
                Verdict::Expand => {}
            }

            for child in self.children(id, false)? {
                if self.settle(child) {
                    queue.push_back(child);
                }
            }
        }

        Ok(false)
    }

    // === Best-first (UCS, A*) ===

    /// Priority search on `g + h`, where `g` accumulates `step_cost` of each
    /// successor state.
    ///
    /// Entries pop in `g + h` order, so the first time a state is handled it
    /// is handled at its cheapest known cost. A later entry for the same state
    /// is only handled again if it is shallower, which keeps routes under the
    /// depth ceiling reachable. Uniform-cost search is this with a zero
    /// heuristic.
    fn best_first(
        &mut self,
        root: NodeId,
        step_cost: impl Fn(&GameState) -> u32,
        heuristic: impl Fn(&GameState) -> u32,
    ) -> Result<bool, SearchError> {
        let mut frontier: PriorityQueue<(NodeId, u32)> = PriorityQueue::new();
        let root_node = self.tree.get(root);
        frontier.push(heuristic(&root_node.state), root_node.hash(), (root, 0));

        while let Some((_, (id, g))) = frontier.pop() {
            if !self.settle(id) {
                continue;
            }
            match self.examine(id) {
                Verdict::Goal => {
                    self.solution = Some(id);
                    self.solution_cost = Some(g);
                    return Ok(false);
                }
                Verdict::Prune | Verdict::Cut => continue,
                Verdict::Halt => return Ok(true),
                Verdict::Expand => {}
            }

            for child in self.children(id, false)? {
                if self.is_settled(child) {
                    continue;
                }
                let node = self.tree.get(child);
                let child_g = g + step_cost(&node.state);
                frontier.push(child_g + heuristic(&node.state), node.hash(), (child, child_g));
            }
        }

        Ok(false)
    }
}
