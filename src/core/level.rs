//! Level documents.
//!
//! A level is a JSON document:
//!
//! ```json
//! {
//!   "width": 8,
//!   "height": 6,
//!   "entities": {
//!     "players": [{ "position": [1, 1] }],
//!     "goals": [{ "position": [6, 4] }],
//!     "timed_doors": [{ "position": [3, 3], "timer": 4 }]
//!   }
//! }
//! ```
//!
//! `width` and `height` are required. `entities` and each of its lists may be
//! omitted. Timed doors default to 5 ticks.
//!
//! Entity ids are allocated sequentially in a fixed list order: players,
//! metal boxes, walls, goals, lavas, waters, portal orbs, cracked walls,
//! timed doors.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::board::Board;
use super::entity::{Entity, EntityId, EntityType};
use super::error::GameError;

/// Ticks a timed door stays closed when the document gives no timer.
pub const DEFAULT_DOOR_TIMER: u32 = 5;

fn default_door_timer() -> u32 {
    DEFAULT_DOOR_TIMER
}

/// A single placed entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    #[serde(default)]
    pub position: [i32; 2],
}

/// A placed timed door.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorPlacement {
    #[serde(default)]
    pub position: [i32; 2],
    #[serde(default = "default_door_timer")]
    pub timer: u32,
}

/// Entity lists of a level document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelEntities {
    pub players: Vec<Placement>,
    pub metal_boxes: Vec<Placement>,
    pub walls: Vec<Placement>,
    pub goals: Vec<Placement>,
    pub lavas: Vec<Placement>,
    pub waters: Vec<Placement>,
    pub portal_orbs: Vec<Placement>,
    pub cracked_walls: Vec<Placement>,
    pub timed_doors: Vec<DoorPlacement>,
}

/// A parsed level document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelData {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub entities: LevelEntities,
}

impl LevelData {
    /// Parse a level from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, GameError> {
        serde_json::from_str(json).map_err(|e| GameError::InvalidLevelData(e.to_string()))
    }

    /// Read and parse a level file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, GameError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| GameError::LevelIo {
            path: path.display().to_string(),
            source,
        })?;
        let level = Self::from_json_str(&text)?;
        info!(
            path = %path.display(),
            width = level.width,
            height = level.height,
            "Loaded level"
        );
        Ok(level)
    }

    /// Build the initial board.
    #[must_use]
    pub fn to_board(&self) -> Board {
        let mut board = Board::new(self.width, self.height);
        let mut next_id = EntityId(0);
        let mut place = |board: &mut Board, entity_type: EntityType, list: &[Placement]| {
            for p in list {
                board.add_entity(Entity::new(next_id, entity_type, p.position.into()));
                next_id = next_id.next();
            }
        };

        let e = &self.entities;
        place(&mut board, EntityType::Player, &e.players);
        place(&mut board, EntityType::MetalBox, &e.metal_boxes);
        place(&mut board, EntityType::Wall, &e.walls);
        place(&mut board, EntityType::Goal, &e.goals);
        place(&mut board, EntityType::Lava, &e.lavas);
        place(&mut board, EntityType::Water, &e.waters);
        place(&mut board, EntityType::PortalOrb, &e.portal_orbs);
        place(&mut board, EntityType::CrackedWall, &e.cracked_walls);

        for door in &e.timed_doors {
            board.add_entity(Entity::timed_door(next_id, door.position.into(), door.timer));
            next_id = next_id.next();
        }

        board
    }
}
