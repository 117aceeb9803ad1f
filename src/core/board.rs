//! The board: entities plus a spatial index.
//!
//! A `Board` owns an id → entity map and a position → ids index. The index is
//! a denormalized cache of the entity map; it is only ever touched by the two
//! private primitives `attach` and `detach`, which every public mutation goes
//! through. That keeps the index mirroring entity positions mechanically.
//!
//! Both maps are `im` persistent maps, so `clone()` is O(1) and a cloned board
//! shares structure with the original until one of them is mutated. Search
//! nodes keep their own boards without deep copies.
//!
//! ## Usage
//!
//! ```
//! use lava_aqua::core::{Board, Entity, EntityId, EntityType, Position};
//!
//! let mut board = Board::new(5, 5);
//! board.add_entity(Entity::player(EntityId(0), Position::new(1, 1)));
//! board.add_entity(Entity::new(EntityId(1), EntityType::Goal, Position::new(3, 1)));
//!
//! let branch = board.copy();
//! board.remove_entity(EntityId(1));
//!
//! assert_eq!(board.count_of(EntityType::Goal), 0);
//! assert_eq!(branch.count_of(EntityType::Goal), 1);
//! ```

use im::OrdMap;
use smallvec::SmallVec;

use super::entity::{Entity, EntityId, EntityType};
use super::position::Position;

/// Entity ids sharing one cell. Cells rarely hold more than a few entities.
pub type CellIds = SmallVec<[EntityId; 4]>;

/// Spatial index of entities on a fixed-size grid.
#[derive(Clone, Debug)]
pub struct Board {
    width: u32,
    height: u32,

    /// All entities by id. Iteration is in ascending id order.
    entities: OrdMap<EntityId, Entity>,

    /// Ids at each occupied cell. Empty cells have no entry.
    cells: OrdMap<Position, CellIds>,

    /// The player entity, if one has been placed and not removed.
    player_id: Option<EntityId>,

    /// Portal orbs ever added to this board (collected or not).
    orbs_total: usize,
}

impl Board {
    /// Create an empty board.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            entities: OrdMap::new(),
            cells: OrdMap::new(),
            player_id: None,
            orbs_total: 0,
        }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Check whether a position lies on the grid.
    #[inline]
    #[must_use]
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    // === Queries ===

    /// Look up an entity by id.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Ids at a cell, in insertion order.
    #[must_use]
    pub fn ids_at(&self, pos: Position) -> &[EntityId] {
        self.cells.get(&pos).map(|ids| ids.as_slice()).unwrap_or(&[])
    }

    /// Entities at a cell, in insertion order.
    pub fn entities_at(&self, pos: Position) -> impl Iterator<Item = &Entity> + '_ {
        self.ids_at(pos).iter().filter_map(move |id| self.entities.get(id))
    }

    /// Check whether a cell holds no entities.
    #[must_use]
    pub fn is_empty_at(&self, pos: Position) -> bool {
        self.ids_at(pos).is_empty()
    }

    /// Check whether a cell holds at least one entity of the given type.
    #[must_use]
    pub fn has_type_at(&self, pos: Position, entity_type: EntityType) -> bool {
        self.entities_at(pos).any(|e| e.entity_type() == entity_type)
    }

    /// First entity of the given type at a cell.
    #[must_use]
    pub fn find_at(&self, pos: Position, entity_type: EntityType) -> Option<&Entity> {
        self.entities_at(pos).find(|e| e.entity_type() == entity_type)
    }

    /// All entities of one type, in ascending id order.
    pub fn entities_by_type(&self, entity_type: EntityType) -> impl Iterator<Item = &Entity> + '_ {
        self.entities
            .values()
            .filter(move |e| e.entity_type() == entity_type)
    }

    /// Number of entities of one type.
    #[must_use]
    pub fn count_of(&self, entity_type: EntityType) -> usize {
        self.entities_by_type(entity_type).count()
    }

    /// The player entity, if present.
    #[must_use]
    pub fn player(&self) -> Option<&Entity> {
        self.player_id.and_then(|id| self.entities.get(&id))
    }

    /// All entities, in ascending id order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.values()
    }

    /// Occupied cells in row-major order with their ids.
    pub fn cells(&self) -> impl Iterator<Item = (Position, &[EntityId])> + '_ {
        self.cells.iter().map(|(pos, ids)| (*pos, ids.as_slice()))
    }

    /// Number of entities on the board.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Check if the board has no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Portal orbs ever placed on this board, including collected ones.
    #[must_use]
    pub fn orbs_total(&self) -> usize {
        self.orbs_total
    }

    /// A fresh id above every id currently in use.
    #[must_use]
    pub fn next_entity_id(&self) -> EntityId {
        self.entities
            .get_max()
            .map_or(EntityId(0), |(id, _)| id.next())
    }

    // === Mutation ===

    /// Add a new entity.
    ///
    /// The first player added becomes the board's player. Every portal orb
    /// added counts towards `orbs_total`.
    ///
    /// Panics if the id is already in use.
    pub fn add_entity(&mut self, entity: Entity) {
        assert!(
            !self.entities.contains_key(&entity.id),
            "{} already exists on the board",
            entity.id
        );

        match entity.entity_type() {
            EntityType::Player if self.player_id.is_none() => self.player_id = Some(entity.id),
            EntityType::PortalOrb => self.orbs_total += 1,
            _ => {}
        }

        self.attach(entity);
    }

    /// Remove an entity, returning it if it existed.
    pub fn remove_entity(&mut self, id: EntityId) -> Option<Entity> {
        let removed = self.detach(id)?;
        if self.player_id == Some(id) {
            self.player_id = None;
        }
        Some(removed)
    }

    /// Replace an entity with a new value for the same id.
    ///
    /// Equivalent to remove + add but keeps player and orb bookkeeping
    /// unchanged. Adds the entity if the id was not present.
    pub fn update_entity(&mut self, entity: Entity) -> Option<Entity> {
        match self.detach(entity.id) {
            Some(old) => {
                self.attach(entity);
                Some(old)
            }
            None => {
                self.add_entity(entity);
                None
            }
        }
    }

    /// Independent copy of this board.
    ///
    /// Mutating the copy never changes the original. O(1) thanks to
    /// structural sharing.
    #[must_use]
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Insert into both the entity map and the index.
    fn attach(&mut self, entity: Entity) {
        let pos = entity.position;
        let id = entity.id;
        self.entities.insert(id, entity);
        match self.cells.get_mut(&pos) {
            Some(ids) => ids.push(id),
            None => {
                let mut ids = CellIds::new();
                ids.push(id);
                self.cells.insert(pos, ids);
            }
        }
    }

    /// Remove from both the entity map and the index.
    fn detach(&mut self, id: EntityId) -> Option<Entity> {
        let entity = self.entities.remove(&id)?;
        let pos = entity.position;

        let now_empty = match self.cells.get_mut(&pos) {
            Some(ids) => {
                ids.retain(|e| *e != id);
                ids.is_empty()
            }
            None => false,
        };
        if now_empty {
            self.cells.remove(&pos);
        }

        Some(entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with_player() -> Board {
        let mut board = Board::new(6, 4);
        board.add_entity(Entity::player(EntityId(0), Position::new(1, 1)));
        board
    }

    /// Every entity appears exactly once in the index, at its own position.
    fn assert_index_consistent(board: &Board) {
        let mut indexed = 0;
        for (pos, ids) in board.cells() {
            assert!(!ids.is_empty(), "empty cell entry at {pos}");
            for id in ids {
                let e = board.get(*id).expect("indexed id must exist");
                assert_eq!(e.position, pos);
                indexed += 1;
            }
        }
        assert_eq!(indexed, board.len());
    }

    #[test]
    fn test_bounds() {
        let board = Board::new(3, 2);
        assert!(board.is_in_bounds(Position::new(0, 0)));
        assert!(board.is_in_bounds(Position::new(2, 1)));
        assert!(!board.is_in_bounds(Position::new(3, 1)));
        assert!(!board.is_in_bounds(Position::new(0, 2)));
        assert!(!board.is_in_bounds(Position::new(-1, 0)));
    }

    #[test]
    fn test_add_and_query() {
        let mut board = board_with_player();
        board.add_entity(Entity::new(EntityId(1), EntityType::Goal, Position::new(1, 1)));
        board.add_entity(Entity::new(EntityId(2), EntityType::Wall, Position::new(0, 0)));

        assert_eq!(board.len(), 3);
        assert_eq!(board.entities_at(Position::new(1, 1)).count(), 2);
        assert!(board.has_type_at(Position::new(1, 1), EntityType::Goal));
        assert!(board.is_empty_at(Position::new(4, 3)));
        assert_eq!(board.player().map(|p| p.id), Some(EntityId(0)));
        assert_index_consistent(&board);
    }

    #[test]
    fn test_entities_by_type_in_id_order() {
        let mut board = Board::new(5, 5);
        board.add_entity(Entity::new(EntityId(5), EntityType::Goal, Position::new(4, 4)));
        board.add_entity(Entity::new(EntityId(2), EntityType::Goal, Position::new(0, 0)));

        let ids: Vec<_> = board.entities_by_type(EntityType::Goal).map(|e| e.id).collect();
        assert_eq!(ids, vec![EntityId(2), EntityId(5)]);
    }

    #[test]
    fn test_update_moves_index_entry() {
        let mut board = board_with_player();
        let player = board.player().unwrap().clone();

        board.update_entity(player.moved_to(Position::new(2, 1)));

        assert!(board.is_empty_at(Position::new(1, 1)));
        assert!(board.has_type_at(Position::new(2, 1), EntityType::Player));
        assert_eq!(board.player().unwrap().position, Position::new(2, 1));
        assert_index_consistent(&board);
    }

    #[test]
    fn test_remove() {
        let mut board = board_with_player();
        board.add_entity(Entity::new(EntityId(1), EntityType::Lava, Position::new(3, 3)));

        let removed = board.remove_entity(EntityId(1));
        assert_eq!(removed.map(|e| e.entity_type()), Some(EntityType::Lava));
        assert!(board.remove_entity(EntityId(1)).is_none());
        assert!(board.is_empty_at(Position::new(3, 3)));
        assert_index_consistent(&board);
    }

    #[test]
    fn test_remove_player_clears_player() {
        let mut board = board_with_player();
        board.remove_entity(EntityId(0));
        assert!(board.player().is_none());
    }

    #[test]
    fn test_copy_independence() {
        let mut board = board_with_player();
        let copy = board.copy();

        board.add_entity(Entity::new(EntityId(1), EntityType::Water, Position::new(2, 2)));
        board.remove_entity(EntityId(0));

        assert_eq!(copy.len(), 1);
        assert!(copy.player().is_some());
        assert!(copy.is_empty_at(Position::new(2, 2)));
        assert_index_consistent(&copy);
    }

    #[test]
    fn test_next_entity_id() {
        let mut board = Board::new(4, 4);
        assert_eq!(board.next_entity_id(), EntityId(0));

        board.add_entity(Entity::new(EntityId(7), EntityType::Wall, Position::new(0, 0)));
        board.add_entity(Entity::new(EntityId(3), EntityType::Wall, Position::new(1, 0)));
        assert_eq!(board.next_entity_id(), EntityId(8));
    }

    #[test]
    fn test_orbs_total_survives_removal() {
        let mut board = Board::new(4, 4);
        board.add_entity(Entity::new(EntityId(0), EntityType::PortalOrb, Position::new(0, 0)));
        board.add_entity(Entity::new(EntityId(1), EntityType::PortalOrb, Position::new(1, 0)));
        board.remove_entity(EntityId(0));

        assert_eq!(board.orbs_total(), 2);
        assert_eq!(board.count_of(EntityType::PortalOrb), 1);
    }

    #[test]
    #[should_panic(expected = "already exists")]
    fn test_duplicate_id_panics() {
        let mut board = board_with_player();
        board.add_entity(Entity::new(EntityId(0), EntityType::Wall, Position::new(0, 0)));
    }
}
