//! Grid coordinates.
//!
//! Coordinates are signed so that the neighbour of an edge cell can be
//! represented and then rejected by `Board::is_in_bounds`.

use serde::{Deserialize, Serialize};

use super::action::Direction;

/// A cell on the board.
///
/// Ordering is row-major (`y` first, then `x`) so that sorted collections of
/// positions read top-left to bottom-right.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring cell one step in `direction`.
    #[inline]
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Manhattan distance between two cells.
    #[inline]
    #[must_use]
    pub const fn manhattan(self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// The four cardinal neighbours in `Direction::ALL` order.
    pub fn neighbours(self) -> impl Iterator<Item = Position> {
        Direction::ALL.into_iter().map(move |d| self.step(d))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.y.cmp(&other.y).then(self.x.cmp(&other.x))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl From<[i32; 2]> for Position {
    fn from([x, y]: [i32; 2]) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step() {
        let p = Position::new(2, 2);

        assert_eq!(p.step(Direction::Up), Position::new(2, 1));
        assert_eq!(p.step(Direction::Down), Position::new(2, 3));
        assert_eq!(p.step(Direction::Left), Position::new(1, 2));
        assert_eq!(p.step(Direction::Right), Position::new(3, 2));
    }

    #[test]
    fn test_step_off_board_is_representable() {
        let p = Position::new(0, 0).step(Direction::Left);
        assert_eq!(p, Position::new(-1, 0));
    }

    #[test]
    fn test_manhattan() {
        assert_eq!(Position::new(0, 0).manhattan(Position::new(3, 4)), 7);
        assert_eq!(Position::new(5, 1).manhattan(Position::new(2, 1)), 3);
        assert_eq!(Position::new(1, 1).manhattan(Position::new(1, 1)), 0);
    }

    #[test]
    fn test_row_major_order() {
        let mut cells = vec![Position::new(1, 1), Position::new(0, 2), Position::new(2, 0)];
        cells.sort();
        assert_eq!(
            cells,
            vec![Position::new(2, 0), Position::new(1, 1), Position::new(0, 2)]
        );
    }

    #[test]
    fn test_neighbours() {
        let n: Vec<_> = Position::new(1, 1).neighbours().collect();
        assert_eq!(n.len(), 4);
        assert_eq!(n[0], Position::new(1, 0));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Position::new(3, -1)), "(3, -1)");
    }
}
