use anyhow::{Result, ensure};
use bevy::prelude::*;
use std::time::Duration;

use super::{
    DEFAULT_ARENA_HEIGHT, DEFAULT_ARENA_WIDTH, DEFAULT_FINALE_SCORE, DEFAULT_FOOD_MARGIN,
    DEFAULT_SWIPE_THRESHOLD, DEFAULT_TICK_MS, MAX_ARENA_SIDE, MIN_ARENA_SIDE,
};

/// Runtime configuration for a game session.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct GameSettings {
    /// Width of the arena in cells
    pub width: u32,
    /// Height of the arena in cells
    pub height: u32,
    /// Time between two movement ticks
    pub tick_interval: Duration,
    /// Food never spawns within this many cells of the wall
    pub food_margin: u32,
    /// Score that triggers the finale
    pub finale_score: u32,
    /// Minimum swipe distance in logical pixels
    pub swipe_threshold: f32,
    /// Name shown in the birthday banner
    pub celebrant: Option<String>,
    /// Fixed RNG seed, for reproducible food placement
    pub seed: Option<u64>,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_ARENA_WIDTH,
            height: DEFAULT_ARENA_HEIGHT,
            tick_interval: Duration::from_millis(DEFAULT_TICK_MS),
            food_margin: DEFAULT_FOOD_MARGIN,
            finale_score: DEFAULT_FINALE_SCORE,
            swipe_threshold: DEFAULT_SWIPE_THRESHOLD,
            celebrant: None,
            seed: None,
        }
    }
}

impl GameSettings {
    /// Create settings with a custom arena size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Reject settings the board cannot be built from.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.width >= MIN_ARENA_SIDE && self.height >= MIN_ARENA_SIDE,
            "arena must be at least {MIN_ARENA_SIDE}x{MIN_ARENA_SIDE}, got {}x{}",
            self.width,
            self.height
        );
        ensure!(
            self.width <= MAX_ARENA_SIDE && self.height <= MAX_ARENA_SIDE,
            "arena must be at most {MAX_ARENA_SIDE}x{MAX_ARENA_SIDE}, got {}x{}",
            self.width,
            self.height
        );
        // At least one column and row must lie inside the margin
        ensure!(
            self.food_margin < self.width.min(self.height).div_ceil(2),
            "food margin {} leaves no room for food on a {}x{} arena",
            self.food_margin,
            self.width,
            self.height
        );
        ensure!(
            !self.tick_interval.is_zero(),
            "tick interval must be positive"
        );
        ensure!(self.finale_score >= 1, "finale score must be at least 1");
        ensure!(
            self.swipe_threshold.is_finite() && self.swipe_threshold > 0.0,
            "swipe threshold must be a positive number of pixels, got {}",
            self.swipe_threshold
        );
        Ok(())
    }

    /// Text of the birthday banner.
    pub fn birthday_text(&self) -> String {
        match self.celebrant.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => format!("Happy Birthday {name}!"),
            _ => "Happy Birthday!".to_string(),
        }
    }

    pub fn arena_size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32) * super::CELL_SIZE
    }

    /// Translate a grid cell to the centre of that cell in world space.
    pub fn cell_center(&self, pos: super::Position) -> Vec2 {
        let x = (pos.x as f32 - self.width as f32 / 2.0 + 0.5) * super::CELL_SIZE;
        let y = (self.height as f32 / 2.0 - pos.y as f32 - 0.5) * super::CELL_SIZE;
        Vec2::new(x, y)
    }
}
