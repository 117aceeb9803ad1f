//! # lava-aqua
//!
//! A grid puzzle engine and solver. The player walks a board toward a goal
//! while lava and water spread every turn, collecting portal orbs and pushing
//! metal boxes along the way.
//!
//! ## Design Principles
//!
//! 1. **Immutable Transitions**: `GameState::update_state` returns a new
//!    state and never touches its input. Searches keep every state they
//!    create without copying boards.
//!
//! 2. **Persistent Data Structures**: O(1) board cloning via `im-rs`, so
//!    branching in the search tree shares structure.
//!
//! 3. **Content Hashing**: states are deduplicated by a deterministic digest
//!    of what is on the board, independent of entity ids.
//!
//! ## Modules
//!
//! - `core`: Positions, moves, entities, the board, level loading, state
//! - `rules`: Turn simulation and the `Problem` interface searches use
//! - `search`: DFS, BFS, UCS, heuristic backtracking and A*

pub mod core;
pub mod rules;
pub mod search;

// Re-export commonly used types
pub use crate::core::{
    Action, Board, Direction, Entity, EntityId, EntityKind, EntityType, GameError, GameState,
    LevelData, Phase, Position, TransitionError,
};

pub use crate::rules::{Problem, PuzzleProblem};

pub use crate::search::{
    Algorithm, PriorityQueue, RunRecord, Search, SearchConfig, SearchError, SearchOutcome,
    SearchStats, SearchTree,
};
