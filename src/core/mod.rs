//! Core puzzle types: positions, moves, entities, the board, levels and state.
//!
//! Everything here is rule-agnostic storage. Turn resolution lives in
//! `rules::simulator` and only reaches the board through `Board`'s mutation
//! methods.

pub mod action;
pub mod board;
pub mod entity;
pub mod error;
pub mod level;
pub mod position;
pub mod state;

pub use action::{Action, Direction};
pub use board::{Board, CellIds};
pub use entity::{Entity, EntityId, EntityKind, EntityType};
pub use error::{GameError, TransitionError};
pub use level::{DoorPlacement, LevelData, LevelEntities, Placement, DEFAULT_DOOR_TIMER};
pub use position::Position;
pub use state::{GameState, Phase};
