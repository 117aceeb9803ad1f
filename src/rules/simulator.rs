//! Environment simulation: move resolution, hazards, doors, terminal checks.
//!
//! All functions mutate the board they are given. `GameState` always hands in
//! a fresh clone of its board (O(1) with persistent maps), so no caller ever
//! observes a partially applied turn.
//!
//! ## Turn order
//!
//! 1. Apply the player's move (push a box, collect an orb, step)
//! 2. Evaluate the win condition
//! 3. Spread water, then lava
//! 4. Tick timed doors
//! 5. Evaluate the loss condition, unless the move already won
//!
//! A winning move is never overturned by the hazards that advance after it.

use std::collections::BTreeSet;

use smallvec::SmallVec;
use tracing::trace;

use crate::core::{Board, Direction, Entity, EntityId, EntityType, Phase, Position};

/// Check whether a box can be pushed into `beyond`.
fn can_push_into(board: &Board, beyond: Position) -> bool {
    board.is_in_bounds(beyond) && !board.entities_at(beyond).any(|e| e.entity_type().blocks_push())
}

/// Check whether the player may move in `direction`.
///
/// The target must be on the board and free of walls, timed doors and cracked
/// walls. A metal box on the target is fine if it can be pushed one further
/// cell. Fluids, goals and orbs never block movement.
#[must_use]
pub fn is_valid_action(board: &Board, direction: Direction) -> bool {
    let Some(player) = board.player() else {
        return false;
    };
    let target = player.position.step(direction);
    if !board.is_in_bounds(target) {
        return false;
    }

    let mut has_box = false;
    for entity in board.entities_at(target) {
        let t = entity.entity_type();
        if t.is_solid() {
            return false;
        }
        has_box |= t == EntityType::MetalBox;
    }

    !has_box || can_push_into(board, target.step(direction))
}

/// Legal moves in `Direction::ALL` order. Empty for terminal phases.
#[must_use]
pub fn available_actions(board: &Board, phase: Phase) -> SmallVec<[Direction; 4]> {
    if phase.is_terminal() {
        return SmallVec::new();
    }
    Direction::ALL
        .into_iter()
        .filter(|d| is_valid_action(board, *d))
        .collect()
}

/// Move the player one step, resolving box pushes and orb pickups.
///
/// A box on the target cell is pushed if the cell beyond it is free of
/// blocking entities; any fluid there is consumed by the box. An orb on the
/// target cell is collected. The player then moves onto the target cell.
/// Collisions with walls or lava are left to terminal evaluation.
pub fn apply_move(board: &mut Board, direction: Direction) {
    let Some(mut player) = board.player().cloned() else {
        return;
    };
    let target = player.position.step(direction);

    if let Some(metal_box) = board.find_at(target, EntityType::MetalBox).cloned() {
        let beyond = target.step(direction);
        if can_push_into(board, beyond) {
            let fluids: SmallVec<[EntityId; 2]> = board
                .entities_at(beyond)
                .filter(|e| e.entity_type().is_fluid())
                .map(|e| e.id)
                .collect();
            for id in fluids {
                board.remove_entity(id);
            }
            board.update_entity(metal_box.moved_to(beyond));
        }
    }

    if let Some(orb) = board.find_at(target, EntityType::PortalOrb).map(|e| e.id) {
        player = player.with_collected_orb(orb);
        board.remove_entity(orb);
    }

    board.update_entity(player.moved_to(target));
}

/// Spread water, then lava, by one cell in each cardinal direction.
pub fn spread_fluids(board: &mut Board) {
    spread_pass(board, EntityType::Water);
    spread_pass(board, EntityType::Lava);
}

/// One spreading pass for a single fluid.
///
/// Targets are computed from a snapshot taken at the start of the pass, so
/// freshly spread cells never spread again in the same tick. Where the fluid
/// meets the opposing fluid the cell becomes a wall: every non-player entity
/// there is removed and a wall is placed.
fn spread_pass(board: &mut Board, fluid: EntityType) {
    let Some(opposing) = fluid.opposing_fluid() else {
        return;
    };
    let snapshot = board.clone();

    let mut flooded: BTreeSet<Position> = BTreeSet::new();
    let mut solidified: BTreeSet<Position> = BTreeSet::new();

    for source in snapshot.entities_by_type(fluid) {
        for pos in source.position.neighbours() {
            if !snapshot.is_in_bounds(pos) {
                continue;
            }
            let types: SmallVec<[EntityType; 4]> =
                snapshot.entities_at(pos).map(Entity::entity_type).collect();

            if types.contains(&fluid) {
                continue;
            }
            if types.contains(&opposing) {
                solidified.insert(pos);
            } else if types.iter().all(|t| t.coexists_with_fluid()) {
                flooded.insert(pos);
            }
        }
    }

    let mut next_id = board.next_entity_id();
    for pos in flooded {
        board.add_entity(Entity::new(next_id, fluid, pos));
        next_id = next_id.next();
    }

    for pos in solidified {
        let doomed: SmallVec<[EntityId; 4]> = board
            .entities_at(pos)
            .filter(|e| e.entity_type() != EntityType::Player)
            .map(|e| e.id)
            .collect();
        for id in doomed {
            board.remove_entity(id);
        }
        trace!(%pos, ?fluid, "fluids collided, cell solidified");
        board.add_entity(Entity::new(next_id, EntityType::Wall, pos));
        next_id = next_id.next();
    }
}

/// Count every timed door down by one tick, removing expired doors.
pub fn tick_timed_doors(board: &mut Board) {
    let doors: SmallVec<[Entity; 4]> = board
        .entities_by_type(EntityType::TimedDoor)
        .cloned()
        .collect();

    for door in doors {
        match door.ticked() {
            Some(ticked) => {
                board.update_entity(ticked);
            }
            None => {
                board.remove_entity(door.id);
            }
        }
    }
}

/// The win condition.
///
/// Every orb ever placed has been collected (none remain on the board) and
/// the player stands on a goal.
#[must_use]
pub fn is_won(board: &Board) -> bool {
    let Some(player) = board.player() else {
        return false;
    };
    board.count_of(EntityType::PortalOrb) == 0
        && player.collected_count() == board.orbs_total()
        && board.has_type_at(player.position, EntityType::Goal)
}

/// The loss condition.
///
/// The player is gone, or shares its cell with lava or a wall. Lava covering
/// a goal is not a loss by itself.
#[must_use]
pub fn is_lost(board: &Board) -> bool {
    let Some(player) = board.player() else {
        return true;
    };
    board
        .entities_at(player.position)
        .any(|e| matches!(e.entity_type(), EntityType::Lava | EntityType::Wall))
}

/// Play one full turn on `board` and return the resulting phase.
///
/// The caller must have checked `is_valid_action` first.
pub fn resolve_turn(board: &mut Board, direction: Direction) -> Phase {
    apply_move(board, direction);
    let won = is_won(board);

    spread_fluids(board);
    tick_timed_doors(board);

    if won {
        Phase::Won
    } else if is_lost(board) {
        Phase::Lost
    } else {
        Phase::Playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a board from `(type, x, y)` triples, ids in list order.
    fn board(width: u32, height: u32, items: &[(EntityType, i32, i32)]) -> Board {
        let mut board = Board::new(width, height);
        for (i, &(t, x, y)) in items.iter().enumerate() {
            board.add_entity(Entity::new(EntityId(i as u32), t, Position::new(x, y)));
        }
        board
    }

    fn types_at(board: &Board, x: i32, y: i32) -> Vec<EntityType> {
        let mut types: Vec<_> = board
            .entities_at(Position::new(x, y))
            .map(Entity::entity_type)
            .collect();
        types.sort();
        types
    }

    // === Validity ===

    #[test]
    fn test_solid_entities_block() {
        for solid in [EntityType::Wall, EntityType::TimedDoor, EntityType::CrackedWall] {
            let b = board(4, 4, &[(EntityType::Player, 1, 1), (solid, 2, 1)]);
            assert!(!is_valid_action(&b, Direction::Right), "{solid} should block");
            assert!(is_valid_action(&b, Direction::Left));
        }
    }

    #[test]
    fn test_out_of_bounds_is_invalid() {
        let b = board(3, 3, &[(EntityType::Player, 0, 0)]);
        assert!(!is_valid_action(&b, Direction::Up));
        assert!(!is_valid_action(&b, Direction::Left));
        assert!(is_valid_action(&b, Direction::Right));
        assert!(is_valid_action(&b, Direction::Down));
    }

    #[test]
    fn test_fluids_and_goals_do_not_block() {
        let b = board(
            5,
            3,
            &[
                (EntityType::Player, 2, 1),
                (EntityType::Lava, 1, 1),
                (EntityType::Goal, 3, 1),
                (EntityType::PortalOrb, 2, 0),
            ],
        );
        assert_eq!(
            available_actions(&b, Phase::Playing).as_slice(),
            &Direction::ALL
        );
    }

    #[test]
    fn test_box_push_validity() {
        // Box against the edge
        let b = board(4, 1, &[(EntityType::Player, 2, 0), (EntityType::MetalBox, 3, 0)]);
        assert!(!is_valid_action(&b, Direction::Right));

        // Box against another box
        let b = board(
            5,
            1,
            &[
                (EntityType::Player, 0, 0),
                (EntityType::MetalBox, 1, 0),
                (EntityType::MetalBox, 2, 0),
            ],
        );
        assert!(!is_valid_action(&b, Direction::Right));

        // Box onto water is fine
        let b = board(
            4,
            1,
            &[
                (EntityType::Player, 0, 0),
                (EntityType::MetalBox, 1, 0),
                (EntityType::Water, 2, 0),
            ],
        );
        assert!(is_valid_action(&b, Direction::Right));
    }

    #[test]
    fn test_terminal_phase_has_no_actions() {
        let b = board(3, 3, &[(EntityType::Player, 1, 1)]);
        assert!(available_actions(&b, Phase::Won).is_empty());
        assert!(available_actions(&b, Phase::Lost).is_empty());
        assert_eq!(available_actions(&b, Phase::Playing).len(), 4);
    }

    // === Moves ===

    #[test]
    fn test_box_push() {
        let mut b = board(6, 5, &[(EntityType::Player, 2, 2), (EntityType::MetalBox, 3, 2)]);

        apply_move(&mut b, Direction::Right);

        assert_eq!(types_at(&b, 3, 2), vec![EntityType::Player]);
        assert_eq!(types_at(&b, 4, 2), vec![EntityType::MetalBox]);
        assert!(b.is_empty_at(Position::new(2, 2)));
    }

    #[test]
    fn test_box_consumes_fluid() {
        let mut b = board(
            5,
            1,
            &[
                (EntityType::Player, 0, 0),
                (EntityType::MetalBox, 1, 0),
                (EntityType::Lava, 2, 0),
            ],
        );

        apply_move(&mut b, Direction::Right);

        assert_eq!(types_at(&b, 2, 0), vec![EntityType::MetalBox]);
        assert_eq!(b.count_of(EntityType::Lava), 0);
    }

    #[test]
    fn test_collect_orb() {
        let mut b = board(3, 1, &[(EntityType::Player, 0, 0), (EntityType::PortalOrb, 1, 0)]);

        apply_move(&mut b, Direction::Right);

        let player = b.player().unwrap();
        assert_eq!(player.position, Position::new(1, 0));
        assert_eq!(player.collected_orbs().collect::<Vec<_>>(), vec![EntityId(1)]);
        assert_eq!(b.count_of(EntityType::PortalOrb), 0);
    }

    // === Hazards ===

    #[test]
    fn test_fluid_spreads_one_cell() {
        let mut b = board(5, 5, &[(EntityType::Water, 2, 2)]);

        spread_fluids(&mut b);

        assert_eq!(b.count_of(EntityType::Water), 5);
        for (x, y) in [(2, 1), (2, 3), (1, 2), (3, 2)] {
            assert_eq!(types_at(&b, x, y), vec![EntityType::Water]);
        }
    }

    #[test]
    fn test_fluid_respects_blockers_and_coexists() {
        let mut b = board(
            5,
            1,
            &[
                (EntityType::Wall, 0, 0),
                (EntityType::Lava, 1, 0),
                (EntityType::CrackedWall, 2, 0),
            ],
        );

        spread_fluids(&mut b);

        assert_eq!(types_at(&b, 0, 0), vec![EntityType::Wall]);
        assert_eq!(
            types_at(&b, 2, 0),
            vec![EntityType::Lava, EntityType::CrackedWall]
        );
        // No chain reaction within one tick
        assert!(b.is_empty_at(Position::new(3, 0)));
    }

    #[test]
    fn test_fluid_collision_makes_wall() {
        let mut b = board(10, 10, &[(EntityType::Lava, 5, 5), (EntityType::Water, 5, 6)]);

        spread_fluids(&mut b);

        assert_eq!(types_at(&b, 5, 5), vec![EntityType::Wall]);
        assert!(!b.has_type_at(Position::new(5, 6), EntityType::Lava));
        assert!(!b.has_type_at(Position::new(5, 5), EntityType::Water));
        assert_eq!(b.count_of(EntityType::Lava), 0);
    }

    #[test]
    fn test_new_fluid_ids_are_fresh() {
        let mut b = board(3, 1, &[(EntityType::Water, 0, 0), (EntityType::Goal, 2, 0)]);

        spread_fluids(&mut b);

        let ids: Vec<_> = b.entities_by_type(EntityType::Water).map(|e| e.id).collect();
        assert_eq!(ids, vec![EntityId(0), EntityId(2)]);
    }

    #[test]
    fn test_doors_tick_and_expire() {
        let mut b = Board::new(3, 1);
        b.add_entity(Entity::timed_door(EntityId(0), Position::new(0, 0), 1));
        b.add_entity(Entity::timed_door(EntityId(1), Position::new(1, 0), 3));

        tick_timed_doors(&mut b);

        assert!(b.get(EntityId(0)).is_none());
        assert_eq!(
            b.get(EntityId(1)).map(|d| d.kind.clone()),
            Some(crate::core::EntityKind::TimedDoor { remaining: 2 })
        );
    }

    // === Terminal evaluation ===

    #[test]
    fn test_win_requires_all_orbs() {
        let b = board(
            4,
            1,
            &[
                (EntityType::Player, 0, 0),
                (EntityType::Goal, 0, 0),
                (EntityType::PortalOrb, 3, 0),
            ],
        );
        assert!(!is_won(&b));
    }

    #[test]
    fn test_lost_conditions() {
        let b = board(3, 1, &[(EntityType::Player, 0, 0), (EntityType::Lava, 0, 0)]);
        assert!(is_lost(&b));

        let b = board(3, 1, &[(EntityType::Goal, 0, 0)]);
        assert!(is_lost(&b));

        let b = board(3, 1, &[(EntityType::Player, 0, 0), (EntityType::Water, 0, 0)]);
        assert!(!is_lost(&b));
    }

    #[test]
    fn test_winning_move_is_not_overturned() {
        // Lava reaches the goal cell in the same turn the player arrives
        let mut b = board(
            4,
            1,
            &[
                (EntityType::Player, 0, 0),
                (EntityType::Goal, 1, 0),
                (EntityType::Lava, 2, 0),
            ],
        );

        assert_eq!(resolve_turn(&mut b, Direction::Right), Phase::Won);
    }

    #[test]
    fn test_lava_reaching_player_loses() {
        let mut b = board(4, 1, &[(EntityType::Player, 0, 0), (EntityType::Lava, 2, 0)]);

        assert_eq!(resolve_turn(&mut b, Direction::Right), Phase::Lost);
    }
}
