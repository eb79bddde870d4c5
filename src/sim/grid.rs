//! Grid geometry: cells, directions, bounds and wrap-around

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A grid cell (0-indexed, `x` grows right, `y` grows down)
pub type Position = IVec2;

/// Unit step on the grid. There is no zero direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Cell offset for one step
    pub fn delta(&self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn is_opposite(&self, other: Direction) -> bool {
        self.opposite() == other
    }

    /// The two directions on the other axis
    pub fn perpendicular(&self) -> [Direction; 2] {
        match self {
            Direction::Up | Direction::Down => [Direction::Left, Direction::Right],
            Direction::Left | Direction::Right => [Direction::Up, Direction::Down],
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Direction {
        Direction::ALL[rng.random_range(0..Direction::ALL.len())]
    }
}

/// True when `pos` lies inside `[0, grid_size)` on both axes
#[inline]
pub fn in_bounds(pos: Position, grid_size: i32) -> bool {
    pos.x >= 0 && pos.x < grid_size && pos.y >= 0 && pos.y < grid_size
}

/// Wrap each axis onto `[0, grid_size)` (toroidal board)
#[inline]
pub fn wrap(pos: Position, grid_size: i32) -> Position {
    IVec2::new(pos.x.rem_euclid(grid_size), pos.y.rem_euclid(grid_size))
}

/// Euclidean distance between two cells
#[inline]
pub fn distance(a: Position, b: Position) -> f32 {
    a.as_vec2().distance(b.as_vec2())
}

/// Uniform random cell on the board
pub fn random_cell<R: Rng + ?Sized>(rng: &mut R, grid_size: i32) -> Position {
    IVec2::new(rng.random_range(0..grid_size), rng.random_range(0..grid_size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_direction_delta() {
        assert_eq!(Direction::Up.delta(), IVec2::new(0, -1));
        assert_eq!(Direction::Down.delta(), IVec2::new(0, 1));
        assert_eq!(Direction::Left.delta(), IVec2::new(-1, 0));
        assert_eq!(Direction::Right.delta(), IVec2::new(1, 0));
        for dir in Direction::ALL {
            assert_ne!(dir.delta(), IVec2::ZERO);
        }
    }

    #[test]
    fn test_opposites() {
        for dir in Direction::ALL {
            assert!(dir.is_opposite(dir.opposite()));
            assert!(!dir.is_opposite(dir));
            assert_eq!(dir.delta() + dir.opposite().delta(), IVec2::ZERO);
            for perp in dir.perpendicular() {
                assert!(!dir.is_opposite(perp));
                assert_ne!(perp, dir);
            }
        }
    }

    #[test]
    fn test_bounds() {
        assert!(in_bounds(IVec2::new(0, 0), 20));
        assert!(in_bounds(IVec2::new(19, 19), 20));
        assert!(!in_bounds(IVec2::new(20, 5), 20));
        assert!(!in_bounds(IVec2::new(5, -1), 20));
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap(IVec2::new(-1, 5), 20), IVec2::new(19, 5));
        assert_eq!(wrap(IVec2::new(20, 5), 20), IVec2::new(0, 5));
        assert_eq!(wrap(IVec2::new(3, -1), 20), IVec2::new(3, 19));
        assert_eq!(wrap(IVec2::new(3, 20), 20), IVec2::new(3, 0));
        assert_eq!(wrap(IVec2::new(7, 7), 20), IVec2::new(7, 7));
    }

    #[test]
    fn test_distance() {
        assert_eq!(distance(IVec2::new(0, 0), IVec2::new(3, 4)), 5.0);
        assert_eq!(distance(IVec2::new(2, 2), IVec2::new(2, 2)), 0.0);
    }

    #[test]
    fn test_random_cell_in_bounds() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..500 {
            assert!(in_bounds(random_cell(&mut rng, 10), 10));
        }
    }
}
