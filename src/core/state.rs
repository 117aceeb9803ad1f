//! Game state: a board, a phase and a move count.
//!
//! ## Transitions
//!
//! A `GameState` is produced by loading a level or by applying one move to a
//! predecessor with `update_state`. The predecessor is never modified; the
//! successor shares board structure with it.
//!
//! ## Hashing and equality
//!
//! `hash()` is a deterministic content digest over the board dimensions and
//! the typed contents of each occupied cell (in row-major order). Per entity
//! it covers the kind and its payload (a player's collected-orb ids, a door's
//! remaining ticks) but never the entity's own id, so two boards with the same
//! spatial arrangement hash identically regardless of id allocation. Move
//! count and phase are not part of the digest.
//!
//! Equality is hash equality. A 64-bit collision would make two distinct
//! states compare equal; search deduplication accepts that approximation in
//! exchange for never comparing boards field by field.

use std::cell::OnceCell;
use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::action::Direction;
use super::board::Board;
use super::entity::{Entity, EntityKind};
use super::error::{GameError, TransitionError};
use super::level::LevelData;
use crate::rules::simulator;

/// Game progression.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Playing,
    Won,
    Lost,
}

impl Phase {
    /// Won or lost: no further moves are permitted.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Phase::Won | Phase::Lost)
    }
}

/// A snapshot of the puzzle.
#[derive(Clone, Debug)]
pub struct GameState {
    board: Board,
    phase: Phase,
    move_count: u32,

    /// Memoized content digest.
    hash: OnceCell<u64>,
}

impl GameState {
    /// Initial state for a level: phase `Playing`, no moves made.
    #[must_use]
    pub fn from_level_data(level: &LevelData) -> Self {
        Self::from_board(level.to_board())
    }

    /// Initial state for an already built board.
    #[must_use]
    pub fn from_board(board: Board) -> Self {
        Self {
            board,
            phase: Phase::Playing,
            move_count: 0,
            hash: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    /// The player entity, if present.
    #[must_use]
    pub fn player(&self) -> Option<&Entity> {
        self.board.player()
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    #[must_use]
    pub fn is_won(&self) -> bool {
        self.phase == Phase::Won
    }

    #[must_use]
    pub fn is_lost(&self) -> bool {
        self.phase == Phase::Lost
    }

    /// Check whether `action` is legal from this state.
    #[must_use]
    pub fn is_valid_action(&self, action: Direction) -> bool {
        !self.is_terminal() && simulator::is_valid_action(&self.board, action)
    }

    /// Legal moves in `Direction::ALL` order.
    #[must_use]
    pub fn available_actions(&self) -> SmallVec<[Direction; 4]> {
        simulator::available_actions(&self.board, self.phase)
    }

    /// Play one turn and return the successor state.
    ///
    /// Fails with `InvalidTransition` if this state is terminal or `action` is
    /// not currently legal. `self` is left untouched either way.
    pub fn update_state(&self, action: Direction) -> Result<GameState, GameError> {
        if self.phase.is_terminal() {
            return Err(TransitionError::Terminal(self.phase).into());
        }
        if !simulator::is_valid_action(&self.board, action) {
            return Err(TransitionError::IllegalMove(action).into());
        }

        let mut board = self.board.clone();
        let phase = simulator::resolve_turn(&mut board, action);

        Ok(Self {
            board,
            phase,
            move_count: self.move_count + 1,
            hash: OnceCell::new(),
        })
    }

    /// Deterministic content digest, computed once.
    #[must_use]
    pub fn hash(&self) -> u64 {
        *self.hash.get_or_init(|| content_hash(&self.board))
    }
}

/// Digest of the typed cell contents of a board.
fn content_hash(board: &Board) -> u64 {
    let mut hasher = FxHasher::default();
    board.width().hash(&mut hasher);
    board.height().hash(&mut hasher);

    let mut kinds: SmallVec<[&EntityKind; 4]> = SmallVec::new();
    for (pos, ids) in board.cells() {
        kinds.clear();
        kinds.extend(ids.iter().filter_map(|id| board.get(*id)).map(|e| &e.kind));
        kinds.sort();

        pos.hash(&mut hasher);
        kinds.len().hash(&mut hasher);
        for kind in &kinds {
            kind.hash(&mut hasher);
        }
    }

    hasher.finish()
}

impl PartialEq for GameState {
    fn eq(&self, other: &Self) -> bool {
        self.hash() == other.hash()
    }
}

impl Eq for GameState {}

impl Hash for GameState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(GameState::hash(self));
    }
}

impl std::fmt::Display for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GameState({:?}, moves: {}, ", self.phase, self.move_count)?;
        match self.player() {
            Some(p) if p.collected_count() > 0 => {
                write!(f, "player at {} with {} orbs)", p.position, p.collected_count())
            }
            Some(p) => write!(f, "player at {})", p.position),
            None => write!(f, "no player)"),
        }
    }
}
