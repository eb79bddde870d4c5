//! Snake entity: body, buffered direction, movement and collision tests
//!
//! The snake never validates its own moves. The engine calls [`Snake::advance`]
//! and then asks the collision questions it cares about.

use std::collections::VecDeque;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::grid::{Direction, Position, in_bounds, wrap};
use crate::consts::INITIAL_SNAKE_LENGTH;

/// Board rules a snake carries with it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnakeRules {
    pub grid_size: i32,
    /// Wrap around edges instead of dying on them
    pub no_boundaries: bool,
    /// Head may enter its own body
    pub allow_coiling: bool,
}

impl SnakeRules {
    pub fn new(grid_size: i32) -> Self {
        Self {
            grid_size,
            no_boundaries: false,
            allow_coiling: false,
        }
    }
}

/// Body and head colours (0xRRGGBB), owned for the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub body: u32,
    pub head: u32,
}

impl Palette {
    pub const GREEN: Palette = Palette {
        body: 0x008000,
        head: 0x00ff00,
    };
    pub const PURPLE: Palette = Palette {
        body: 0x800080,
        head: 0x8800ff,
    };
}

#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Head first. Never empty.
    segments: VecDeque<Position>,
    /// Direction applied on the last move
    direction: Direction,
    /// Buffered intent, committed on the next move
    next_direction: Direction,
    palette: Palette,
    rules: SnakeRules,
}

impl Snake {
    /// Fresh snake facing right with its body trailing left of `head`.
    /// Without `head` it starts in the middle of the board.
    pub fn new(rules: SnakeRules, head: Option<Position>, palette: Palette) -> Self {
        let centre = rules.grid_size / 2;
        let head = head.unwrap_or(IVec2::new(centre, centre));
        let segments = (0..INITIAL_SNAKE_LENGTH as i32)
            .map(|i| IVec2::new(head.x - i, head.y))
            .collect();

        Self {
            segments,
            direction: Direction::Right,
            next_direction: Direction::Right,
            palette,
            rules,
        }
    }

    /// Build a snake from explicit segments (head first).
    /// Returns `None` for an empty body.
    pub fn from_segments(
        segments: impl IntoIterator<Item = Position>,
        direction: Direction,
        rules: SnakeRules,
        palette: Palette,
    ) -> Option<Self> {
        let segments: VecDeque<Position> = segments.into_iter().collect();
        if segments.is_empty() {
            return None;
        }
        Some(Self {
            segments,
            direction,
            next_direction: direction,
            palette,
            rules,
        })
    }

    pub fn head(&self) -> Position {
        self.segments[0]
    }

    /// Segments head first
    pub fn segments(&self) -> impl ExactSizeIterator<Item = Position> + '_ {
        self.segments.iter().copied()
    }

    /// Segments excluding the head
    pub fn body(&self) -> impl Iterator<Item = Position> + '_ {
        self.segments.iter().skip(1).copied()
    }

    pub fn to_vec(&self) -> Vec<Position> {
        self.segments.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false for a constructed snake
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn next_direction(&self) -> Direction {
        self.next_direction
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }

    pub fn rules(&self) -> SnakeRules {
        self.rules
    }

    pub fn set_no_boundaries(&mut self, no_boundaries: bool) {
        self.rules.no_boundaries = no_boundaries;
    }

    pub fn set_allow_coiling(&mut self, allow_coiling: bool) {
        self.rules.allow_coiling = allow_coiling;
    }

    /// Buffer a turn for the next move.
    ///
    /// Compared against the committed `direction`, not the buffered one, so a
    /// second tap inside one tick can still replace the first.
    /// Returns false when the turn is a reversal and was dropped.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if self.direction.is_opposite(direction) {
            return false;
        }
        self.next_direction = direction;
        true
    }

    /// Commit the buffered direction and push a new head.
    ///
    /// The tail stays; call [`Snake::remove_tail`] unless the snake grows.
    pub fn advance(&mut self) -> Position {
        self.direction = self.next_direction;

        let mut head = self.head() + self.direction.delta();
        if self.rules.no_boundaries {
            head = wrap(head, self.rules.grid_size);
        }

        self.segments.push_front(head);
        head
    }

    /// Drop the last segment. A single-segment snake is left as is.
    pub fn remove_tail(&mut self) -> Option<Position> {
        if self.segments.len() <= 1 {
            return None;
        }
        self.segments.pop_back()
    }

    pub fn collides_with_wall(&self) -> bool {
        if self.rules.no_boundaries {
            return false;
        }
        !in_bounds(self.head(), self.rules.grid_size)
    }

    pub fn collides_with_self(&self) -> bool {
        if self.rules.allow_coiling {
            return false;
        }
        let head = self.head();
        self.body().any(|segment| segment == head)
    }

    /// Head against every segment of `other`, its head included
    pub fn collides_with_snake(&self, other: &Snake) -> bool {
        other.occupies(self.head())
    }

    pub fn occupies(&self, pos: Position) -> bool {
        self.segments.contains(&pos)
    }
}
