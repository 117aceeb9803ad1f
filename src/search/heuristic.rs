//! Cost and distance estimates used by informed searches.

use crate::core::{EntityType, GameState};

/// Manhattan distance from the player to the first goal (lowest id).
///
/// Zero when the board has no goal or no player. Never overestimates the
/// number of moves left, since every move shifts the player by one cell.
#[must_use]
pub fn manhattan_to_goal(state: &GameState) -> u32 {
    let board = state.board();
    let goal = board.entities_by_type(EntityType::Goal).next();
    match (board.player(), goal) {
        (Some(player), Some(goal)) => player.position.manhattan(goal.position),
        _ => 0,
    }
}

/// Number of lava tiles on the board.
#[must_use]
pub fn lava_count(state: &GameState) -> u32 {
    state.board().count_of(EntityType::Lava) as u32
}
