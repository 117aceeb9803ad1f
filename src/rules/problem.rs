//! Search problem abstraction.
//!
//! Search algorithms never call the simulator directly. They go through a
//! `Problem`, which names the initial state, the moves available from a
//! state, and the successor a move produces.
//!
//! ## Implementation Notes
//!
//! - `actions`: return empty for terminal states
//! - `result`: must be deterministic; searches rely on it to rebuild paths
//! - `outcome`: return `None` while the puzzle continues

use smallvec::SmallVec;

use crate::core::{Direction, GameError, GameState, LevelData, Phase};

/// A deterministic single-agent search problem over `GameState`s.
pub trait Problem {
    /// The state searches start from.
    fn initial(&self) -> &GameState;

    /// Moves available from `state`, in a fixed order.
    fn actions(&self, state: &GameState) -> SmallVec<[Direction; 4]>;

    /// The successor of `state` under `action`.
    fn result(&self, state: &GameState, action: Direction) -> Result<GameState, GameError>;

    /// Terminal phase of `state`, if it has one.
    fn outcome(&self, state: &GameState) -> Option<Phase>;

    // === Convenience Methods ===

    /// Check whether no further moves are possible from `state`.
    fn is_over(&self, state: &GameState) -> bool {
        self.outcome(state).is_some()
    }

    /// Check whether `state` solves the puzzle.
    fn is_goal(&self, state: &GameState) -> bool {
        self.outcome(state) == Some(Phase::Won)
    }
}

/// The Lava & Aqua puzzle as a search problem.
#[derive(Clone, Debug)]
pub struct PuzzleProblem {
    initial: GameState,
}

impl PuzzleProblem {
    /// Create a problem rooted at `initial`.
    pub fn new(initial: GameState) -> Self {
        Self { initial }
    }

    /// Create a problem from a parsed level.
    pub fn from_level(level: &LevelData) -> Self {
        Self::new(GameState::from_level_data(level))
    }
}

impl Problem for PuzzleProblem {
    fn initial(&self) -> &GameState {
        &self.initial
    }

    fn actions(&self, state: &GameState) -> SmallVec<[Direction; 4]> {
        state.available_actions()
    }

    fn result(&self, state: &GameState, action: Direction) -> Result<GameState, GameError> {
        state.update_state(action)
    }

    fn outcome(&self, state: &GameState) -> Option<Phase> {
        let phase = state.phase();
        phase.is_terminal().then_some(phase)
    }
}
