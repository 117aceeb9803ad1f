//! Board entities.
//!
//! Every object on the board (player, walls, boxes, fluids, collectibles,
//! doors) is an `Entity`: an id, a position and a kind. Kinds form a closed
//! tagged union; only `Player` and `TimedDoor` carry extra data.
//!
//! Entities are immutable values. Moving or otherwise changing one produces a
//! new value that is written back through `Board::update_entity`.
//!
//! ## Usage
//!
//! ```
//! use lava_aqua::core::{Entity, EntityId, EntityType, Position};
//!
//! let player = Entity::player(EntityId(0), Position::new(1, 1));
//! let moved = player.moved_to(Position::new(2, 1));
//!
//! assert_eq!(moved.id, player.id);
//! assert_eq!(moved.entity_type(), EntityType::Player);
//! ```

use im::OrdSet;
use serde::{Deserialize, Serialize};

use super::position::Position;

/// Unique identifier for an entity within one board.
///
/// Ids are allocation artifacts: they never take part in state hashing
/// except as the contents of a player's collected-orb set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// The id immediately after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Field-less tag for each entity kind.
///
/// Used for type queries (`Board::entities_by_type`) and for hashing.
/// The declaration order is the canonical order used when sorting the
/// entities of one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Player,
    Wall,
    MetalBox,
    Lava,
    Water,
    Goal,
    PortalOrb,
    CrackedWall,
    TimedDoor,
}

impl EntityType {
    /// Blocks movement outright: walking into it is never a legal move.
    #[must_use]
    pub const fn is_solid(self) -> bool {
        matches!(
            self,
            EntityType::Wall | EntityType::TimedDoor | EntityType::CrackedWall
        )
    }

    /// Stops a pushed box from entering the cell.
    #[must_use]
    pub const fn blocks_push(self) -> bool {
        self.is_solid() || matches!(self, EntityType::MetalBox)
    }

    /// Lava or water.
    #[must_use]
    pub const fn is_fluid(self) -> bool {
        matches!(self, EntityType::Lava | EntityType::Water)
    }

    /// May share a cell with a fluid that spreads onto it.
    #[must_use]
    pub const fn coexists_with_fluid(self) -> bool {
        matches!(
            self,
            EntityType::Player | EntityType::Goal | EntityType::PortalOrb | EntityType::CrackedWall
        )
    }

    /// The fluid that turns into a wall on contact with this one.
    #[must_use]
    pub const fn opposing_fluid(self) -> Option<EntityType> {
        match self {
            EntityType::Lava => Some(EntityType::Water),
            EntityType::Water => Some(EntityType::Lava),
            _ => None,
        }
    }

    /// Snake-case name, matching the level document keys.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            EntityType::Player => "player",
            EntityType::Wall => "wall",
            EntityType::MetalBox => "metal_box",
            EntityType::Lava => "lava",
            EntityType::Water => "water",
            EntityType::Goal => "goal",
            EntityType::PortalOrb => "portal_orb",
            EntityType::CrackedWall => "cracked_wall",
            EntityType::TimedDoor => "timed_door",
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Kind-specific entity data.
///
/// Ordering and hashing cover the tag and the payload but never the id, so
/// they can be used to canonicalize the contents of a cell.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// The player, with the ids of every orb collected so far.
    Player { collected_orbs: OrdSet<EntityId> },
    Wall,
    MetalBox,
    Lava,
    Water,
    Goal,
    PortalOrb,
    CrackedWall,
    /// A door that disappears after `remaining` more ticks.
    TimedDoor { remaining: u32 },
}

impl EntityKind {
    /// Data-free kind for a tag. Player gets an empty orb set, doors zero ticks.
    #[must_use]
    pub fn plain(entity_type: EntityType) -> Self {
        match entity_type {
            EntityType::Player => EntityKind::Player {
                collected_orbs: OrdSet::new(),
            },
            EntityType::Wall => EntityKind::Wall,
            EntityType::MetalBox => EntityKind::MetalBox,
            EntityType::Lava => EntityKind::Lava,
            EntityType::Water => EntityKind::Water,
            EntityType::Goal => EntityKind::Goal,
            EntityType::PortalOrb => EntityKind::PortalOrb,
            EntityType::CrackedWall => EntityKind::CrackedWall,
            EntityType::TimedDoor => EntityKind::TimedDoor { remaining: 0 },
        }
    }

    /// The tag of this kind.
    #[must_use]
    pub fn entity_type(&self) -> EntityType {
        match self {
            EntityKind::Player { .. } => EntityType::Player,
            EntityKind::Wall => EntityType::Wall,
            EntityKind::MetalBox => EntityType::MetalBox,
            EntityKind::Lava => EntityType::Lava,
            EntityKind::Water => EntityType::Water,
            EntityKind::Goal => EntityType::Goal,
            EntityKind::PortalOrb => EntityType::PortalOrb,
            EntityKind::CrackedWall => EntityType::CrackedWall,
            EntityKind::TimedDoor { .. } => EntityType::TimedDoor,
        }
    }
}

/// An object on the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub position: Position,
    pub kind: EntityKind,
}

impl Entity {
    /// Create an entity of a data-free kind.
    #[must_use]
    pub fn new(id: EntityId, entity_type: EntityType, position: Position) -> Self {
        Self {
            id,
            position,
            kind: EntityKind::plain(entity_type),
        }
    }

    /// A player with no collected orbs.
    #[must_use]
    pub fn player(id: EntityId, position: Position) -> Self {
        Self::new(id, EntityType::Player, position)
    }

    /// A timed door with `remaining` ticks left.
    #[must_use]
    pub fn timed_door(id: EntityId, position: Position, remaining: u32) -> Self {
        Self {
            id,
            position,
            kind: EntityKind::TimedDoor { remaining },
        }
    }

    /// The tag of this entity's kind.
    #[inline]
    #[must_use]
    pub fn entity_type(&self) -> EntityType {
        self.kind.entity_type()
    }

    /// Same entity at a new position.
    #[must_use]
    pub fn moved_to(&self, position: Position) -> Self {
        Self {
            id: self.id,
            position,
            kind: self.kind.clone(),
        }
    }

    /// Player with `orb` added to its collected set.
    ///
    /// Entities that are not players are returned unchanged.
    #[must_use]
    pub fn with_collected_orb(&self, orb: EntityId) -> Self {
        let kind = match &self.kind {
            EntityKind::Player { collected_orbs } => EntityKind::Player {
                collected_orbs: collected_orbs.update(orb),
            },
            other => other.clone(),
        };
        Self {
            id: self.id,
            position: self.position,
            kind,
        }
    }

    /// Collected orb ids in ascending order (empty for non-players).
    pub fn collected_orbs(&self) -> impl Iterator<Item = EntityId> + '_ {
        let orbs = match &self.kind {
            EntityKind::Player { collected_orbs } => Some(collected_orbs.iter().copied()),
            _ => None,
        };
        orbs.into_iter().flatten()
    }

    /// Number of orbs the player holds (zero for non-players).
    #[must_use]
    pub fn collected_count(&self) -> usize {
        match &self.kind {
            EntityKind::Player { collected_orbs } => collected_orbs.len(),
            _ => 0,
        }
    }

    /// Advance a timed door by one tick.
    ///
    /// Returns `None` when the door expires. Non-door entities are returned
    /// unchanged.
    #[must_use]
    pub fn ticked(&self) -> Option<Self> {
        match self.kind {
            EntityKind::TimedDoor { remaining } => {
                let remaining = remaining.saturating_sub(1);
                (remaining > 0).then(|| Self::timed_door(self.id, self.position, remaining))
            }
            _ => Some(self.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_and_blocking() {
        assert!(EntityType::Wall.is_solid());
        assert!(EntityType::TimedDoor.is_solid());
        assert!(EntityType::CrackedWall.is_solid());
        assert!(!EntityType::MetalBox.is_solid());

        assert!(EntityType::MetalBox.blocks_push());
        assert!(EntityType::Wall.blocks_push());
        assert!(!EntityType::Lava.blocks_push());
        assert!(!EntityType::Goal.blocks_push());
    }

    #[test]
    fn test_fluid_rules() {
        assert!(EntityType::Lava.is_fluid());
        assert!(EntityType::Water.is_fluid());
        assert_eq!(EntityType::Lava.opposing_fluid(), Some(EntityType::Water));
        assert_eq!(EntityType::Water.opposing_fluid(), Some(EntityType::Lava));
        assert_eq!(EntityType::Goal.opposing_fluid(), None);

        assert!(EntityType::CrackedWall.coexists_with_fluid());
        assert!(!EntityType::Wall.coexists_with_fluid());
        assert!(!EntityType::MetalBox.coexists_with_fluid());
    }

    #[test]
    fn test_kind_matches_tag() {
        for t in [
            EntityType::Player,
            EntityType::Wall,
            EntityType::MetalBox,
            EntityType::Lava,
            EntityType::Water,
            EntityType::Goal,
            EntityType::PortalOrb,
            EntityType::CrackedWall,
            EntityType::TimedDoor,
        ] {
            assert_eq!(EntityKind::plain(t).entity_type(), t);
        }
    }

    #[test]
    fn test_collect_orb() {
        let p = Entity::player(EntityId(0), Position::new(0, 0));
        assert_eq!(p.collected_count(), 0);

        let p = p.with_collected_orb(EntityId(7)).with_collected_orb(EntityId(3));
        let orbs: Vec<_> = p.collected_orbs().collect();
        assert_eq!(orbs, vec![EntityId(3), EntityId(7)]);

        // Collecting the same orb twice is idempotent
        let p = p.with_collected_orb(EntityId(3));
        assert_eq!(p.collected_count(), 2);
    }

    #[test]
    fn test_door_tick() {
        let door = Entity::timed_door(EntityId(4), Position::new(1, 1), 2);

        let door = door.ticked().unwrap();
        assert_eq!(door.kind, EntityKind::TimedDoor { remaining: 1 });

        assert!(door.ticked().is_none());
    }

    #[test]
    fn test_tick_non_door_is_identity() {
        let wall = Entity::new(EntityId(1), EntityType::Wall, Position::new(0, 0));
        assert_eq!(wall.ticked(), Some(wall));
    }

    #[test]
    fn test_moved_to_keeps_data() {
        let p = Entity::player(EntityId(0), Position::new(0, 0)).with_collected_orb(EntityId(9));
        let moved = p.moved_to(Position::new(1, 0));
        assert_eq!(moved.position, Position::new(1, 0));
        assert_eq!(moved.collected_count(), 1);
    }

    #[test]
    fn test_serialization() {
        let door = Entity::timed_door(EntityId(2), Position::new(3, 4), 5);
        let json = serde_json::to_string(&door).unwrap();
        let back: Entity = serde_json::from_str(&json).unwrap();
        assert_eq!(door, back);
    }
}
