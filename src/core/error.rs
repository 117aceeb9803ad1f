//! Errors raised by level loading and state transitions.

use thiserror::Error;

use super::action::Direction;
use super::state::Phase;

/// Errors from the game model.
///
/// Search exhaustion is not an error; it is reported as a search outcome.
#[derive(Debug, Error)]
pub enum GameError {
    /// The level document is missing a required field or is malformed.
    #[error("Invalid level data: {0}")]
    InvalidLevelData(String),

    /// The level file could not be read.
    #[error("Failed to read level file {path}: {source}")]
    LevelIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// `update_state` was called on a terminal state or with an illegal move.
    #[error("Invalid transition: {0}")]
    InvalidTransition(TransitionError),
}

/// Why a transition was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("state is terminal ({0:?})")]
    Terminal(Phase),

    #[error("move {0} is not available")]
    IllegalMove(Direction),
}

impl From<TransitionError> for GameError {
    fn from(err: TransitionError) -> Self {
        GameError::InvalidTransition(err)
    }
}
