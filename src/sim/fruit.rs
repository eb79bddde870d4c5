//! Fruit placement, wandering and consumption

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::grid::{Direction, Position, in_bounds, random_cell};
use crate::consts::FRUIT_MOVE_INTERVAL;

/// Cosmetic fruit catalogue; `Fruit::kind` indexes into it
pub const FRUIT_GLYPHS: [&str; 39] = [
    "🍇", "🍈", "🍉", "🍊", "🍋", "🍋‍🟩", "🍌", "🍍", "🥭", "🍎", "🍏", "🍐", "🍑",
    "🍒", "🍓", "🫐", "🥝", "🍅", "🫒", "🥥", "🥑", "🍄", "🍆", "🥔", "🥕", "🌽",
    "🌶️", "🫑", "🥒", "🥬", "🥦", "🧄", "🧅", "🥜", "🫘", "🌰", "🫚", "🫛", "🍄‍🟫",
];

/// A fruit on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fruit {
    pub position: Position,
    /// Index into [`FRUIT_GLYPHS`]
    pub kind: u8,
    /// Wander direction
    pub direction: Direction,
    /// Ticks since the last wander step
    pub move_counter: u32,
}

impl Fruit {
    pub fn new(position: Position, kind: u8, direction: Direction) -> Self {
        Self {
            position,
            kind,
            direction,
            move_counter: 0,
        }
    }

    pub fn glyph(&self) -> &'static str {
        FRUIT_GLYPHS[self.kind as usize % FRUIT_GLYPHS.len()]
    }
}

/// How a fruit cell was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Random sampling found a free cell
    Sampled,
    /// Sampling ran out of attempts; a board scan found a free cell
    Scanned,
    /// The board is full; the cell was not checked
    Unchecked,
}

#[derive(Debug, Clone, Default)]
pub struct FruitManager {
    fruits: Vec<Fruit>,
    grid_size: i32,
}

impl FruitManager {
    pub fn new(grid_size: i32) -> Self {
        Self {
            fruits: Vec::new(),
            grid_size,
        }
    }

    pub fn fruits(&self) -> &[Fruit] {
        &self.fruits
    }

    pub fn len(&self) -> usize {
        self.fruits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fruits.is_empty()
    }

    pub fn clear(&mut self) {
        self.fruits.clear();
    }

    /// Put a fruit on the board as is (no overlap checks)
    pub fn insert(&mut self, fruit: Fruit) {
        self.fruits.push(fruit);
    }

    fn is_free(&self, pos: Position, occupied: &[Position]) -> bool {
        !occupied.contains(&pos) && !self.fruits.iter().any(|f| f.position == pos)
    }

    /// Random sampling budget before falling back to a scan
    fn placement_budget(&self) -> u32 {
        (self.grid_size * self.grid_size * 2).max(64) as u32
    }

    /// Add a fruit on a cell free of `occupied` and of other fruit
    pub fn add_fruit<R: Rng + ?Sized>(&mut self, occupied: &[Position], rng: &mut R) -> Placement {
        let mut placement = Placement::Sampled;
        let mut position = None;

        for _ in 0..self.placement_budget() {
            let candidate = random_cell(rng, self.grid_size);
            if self.is_free(candidate, occupied) {
                position = Some(candidate);
                break;
            }
        }

        if position.is_none() {
            placement = Placement::Scanned;
            position = (0..self.grid_size)
                .flat_map(|y| (0..self.grid_size).map(move |x| Position::new(x, y)))
                .find(|&cell| self.is_free(cell, occupied));
        }

        let position = position.unwrap_or_else(|| {
            placement = Placement::Unchecked;
            log::warn!("No free cell for fruit on a {0}x{0} board", self.grid_size);
            random_cell(rng, self.grid_size)
        });

        let kind = rng.random_range(0..FRUIT_GLYPHS.len()) as u8;
        let direction = Direction::random(rng);
        self.fruits.push(Fruit::new(position, kind, direction));
        placement
    }

    /// Advance every fruit's wander counter and step the ones that are due.
    ///
    /// A fruit facing a wall or an `obstacles` cell turns onto the other axis
    /// instead of moving.
    pub fn move_fruits<R: Rng + ?Sized>(&mut self, obstacles: &[Position], rng: &mut R) {
        let grid_size = self.grid_size;
        for fruit in &mut self.fruits {
            fruit.move_counter += 1;
            if fruit.move_counter < FRUIT_MOVE_INTERVAL {
                continue;
            }
            fruit.move_counter = 0;

            let next = fruit.position + fruit.direction.delta();
            if !in_bounds(next, grid_size) || obstacles.contains(&next) {
                let choices = fruit.direction.perpendicular();
                fruit.direction = choices[rng.random_range(0..choices.len())];
            } else {
                fruit.position = next;
            }
        }
    }

    /// Index of the fruit at `head`, if any
    pub fn check_fruit_eaten(&self, head: Position) -> Option<usize> {
        self.fruits.iter().position(|f| f.position == head)
    }

    pub fn remove_fruit(&mut self, index: usize) -> Option<Fruit> {
        if index < self.fruits.len() {
            Some(self.fruits.remove(index))
        } else {
            None
        }
    }
}
