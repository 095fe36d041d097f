//! ECS components for the snake game.

use bevy::prelude::*;

/// Grid cell. `(0, 0)` is the top-left corner and `y` grows downward.
#[derive(Component, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    /// The neighbouring cell one step in `direction`.
    pub fn step(&self, direction: Direction) -> Position {
        let (dx, dy) = direction.delta();
        Position::new(self.x + dx, self.y + dy)
    }
}

/// Component to track previous position for smooth interpolation.
#[derive(Component, Clone, Copy, Debug)]
pub struct PreviousPosition {
    pub pos: Position,
}

/// Direction enum for snake movement.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Returns the opposite direction.
    pub fn opposite(&self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    /// Unit grid offset. Up is towards row 0.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
        }
    }
}

/// Component to mark the snake's head.
#[derive(Component)]
pub struct SnakeHead {
    pub direction: Direction,
}

/// Component to mark snake head eyes (children of head).
#[derive(Component)]
pub struct SnakeEye;

/// Component to mark snake body segments.
#[derive(Component)]
pub struct SnakeSegment;

/// Component to mark food entities.
#[derive(Component)]
pub struct Food;

/// Component for food pulsing animation.
#[derive(Component)]
pub struct FoodPulse {
    pub timer: Timer,
}

/// Component for entities that should flash/pulse.
#[derive(Component)]
pub struct PulseEffect {
    pub timer: Timer,
    pub start_scale: f32,
    pub end_scale: f32,
}

/// Component for animating newly grown segments.
#[derive(Component)]
pub struct GrowingSegment {
    pub timer: Timer,
}

/// Blossom shown once the finale score is reached.
#[derive(Component)]
pub struct FlowerEffect {
    pub age: f32,
}

/// Component to mark the score display UI element.
#[derive(Component)]
pub struct ScoreText;

/// Milestone banner text.
#[derive(Component)]
pub struct MilestoneText;

/// Component to mark the game over overlay UI.
#[derive(Component)]
pub struct GameOverUI;

/// Component to mark the start menu UI.
#[derive(Component)]
pub struct MenuUI;

/// "Play Snake" button on the start modal.
#[derive(Component)]
pub struct StartButton;

/// "Restart Game" button on the game over overlay.
#[derive(Component)]
pub struct RestartButton;
