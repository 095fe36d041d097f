//! Game events (messages).

use bevy::prelude::*;

use super::{GameEnding, Position};

/// Message sent when a fresh session begins (from the menu or a restart).
#[derive(Message)]
pub struct SessionStarted;

/// Message sent after every tick that moved the snake.
#[derive(Message)]
pub struct SnakeStepped;

/// Message triggered when food is eaten (for visual effects).
#[derive(Message)]
pub struct FoodEatenEvent {
    pub position: Position,
    pub next: Option<Position>,
}

/// Message sent once when the session ends.
#[derive(Message)]
pub struct GameEnded(pub GameEnding);
