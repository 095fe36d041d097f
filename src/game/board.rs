//! Pure game rules: the snake body, its heading, and the food cell.
//!
//! The board knows nothing about entities or time. The snake plugin calls
//! [`Board::step`] once per tick and mirrors the result onto the ECS world.

use rand::Rng;
use std::collections::VecDeque;

use super::{Direction, GameSettings, Position};
use crate::food::place_food;

/// What stopped the snake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    Wall,
    SelfCollision,
}

/// Result of advancing the board by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Head advanced, tail followed.
    Moved,
    /// Head landed on food and the snake grew by one cell.
    /// `next_food` is `None` when no free cell is left.
    Ate {
        eaten: Position,
        next_food: Option<Position>,
    },
    /// The move was fatal. The board is left as it was before the tick.
    Collided(Collision),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Head first
    body: VecDeque<Position>,
    direction: Direction,
    /// `None` once the snake fills every cell food may use
    food: Option<Position>,
    width: i32,
    height: i32,
    food_margin: i32,
}

impl Board {
    /// Starting layout: a two-cell snake in the middle heading right, food
    /// up and to the left of it.
    pub fn new(settings: &GameSettings) -> Self {
        let width = settings.width as i32;
        let height = settings.height as i32;
        let head = Position::new(width / 2, height / 2);
        let food = Position::new(width / 4, height / 4);

        Self {
            body: VecDeque::from([head, head.step(Direction::Left)]),
            direction: Direction::Right,
            food: Some(food),
            width,
            height,
            food_margin: settings.food_margin as i32,
        }
    }

    /// Build a board from explicit parts. `body` is head first.
    pub fn from_parts(
        body: impl IntoIterator<Item = Position>,
        direction: Direction,
        food: Position,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            body: body.into_iter().collect(),
            direction,
            food: Some(food),
            width: width as i32,
            height: height as i32,
            food_margin: 0,
        }
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    pub fn body(&self) -> impl ExactSizeIterator<Item = &Position> + '_ {
        self.body.iter()
    }

    pub fn segment(&self, index: usize) -> Option<Position> {
        self.body.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn food(&self) -> Option<Position> {
        self.food
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    /// Change heading. A 180° reversal is refused and `false` is returned.
    pub fn turn(&mut self, direction: Direction) -> bool {
        if direction == self.direction.opposite() {
            return false;
        }
        self.direction = direction;
        true
    }

    /// Advance the snake by one cell.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> StepOutcome {
        let new_head = self.head().step(self.direction);
        let grows = self.food == Some(new_head);

        if !self.in_bounds(new_head) {
            return StepOutcome::Collided(Collision::Wall);
        }

        // The tail leaves its cell on the same tick the head moves, so it
        // only blocks the head when the snake is growing.
        let blocking = if grows {
            self.body.len()
        } else {
            self.body.len() - 1
        };
        if self.body.iter().take(blocking).any(|p| *p == new_head) {
            return StepOutcome::Collided(Collision::SelfCollision);
        }

        self.body.push_front(new_head);
        if !grows {
            self.body.pop_back();
            return StepOutcome::Moved;
        }

        self.food = place_food(
            rng,
            self.width,
            self.height,
            self.food_margin,
            self.body.iter(),
        );
        StepOutcome::Ate {
            eaten: new_head,
            next_food: self.food,
        }
    }
}
