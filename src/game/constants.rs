//! Game constants for colors, timing, and rendering layers.
//!
//! Arena size and tick length are runtime settings, see [`super::GameSettings`].

use bevy::prelude::*;
use std::time::Duration;

// Defaults for the CLI
pub const DEFAULT_ARENA_WIDTH: u32 = 20;
pub const DEFAULT_ARENA_HEIGHT: u32 = 20;
pub const DEFAULT_TICK_MS: u64 = 100;
pub const DEFAULT_FOOD_MARGIN: u32 = 1;
pub const DEFAULT_FINALE_SCORE: u32 = 10;
pub const DEFAULT_SWIPE_THRESHOLD: f32 = 16.0;

// Smallest arena that still fits the starting snake and food
pub const MIN_ARENA_SIDE: u32 = 6;
// Largest arena side; one grid sprite is spawned per cell
pub const MAX_ARENA_SIDE: u32 = 64;

// Milestones
pub const PRAISE_SCORE: u32 = 5;
pub const BIRTHDAY_SCORE: u32 = 7;
pub const PRAISE_TEXT: &str = "Giỏi quá!";
pub const FINALE_DELAY: Duration = Duration::from_secs(2);

// Effects
pub const EAT_BURST_DURATION: Duration = Duration::from_millis(300);
pub const EAT_BURST_SCALE: f32 = 2.5;
pub const GROW_DURATION: Duration = Duration::from_millis(200);
pub const CRASH_SHAKE_DURATION: Duration = Duration::from_millis(500);
/// Peak camera offset in pixels
pub const CRASH_SHAKE_INTENSITY: f32 = 8.0;

// Visual settings
pub const CELL_SIZE: f32 = 25.0;
pub const CORNER_RADIUS: f32 = 4.0;
pub const WINDOW_PADDING: f32 = 20.0;
pub const FONT_PATH: &str = "fonts/FiraSans-Bold.ttf";

// Colors
pub const SNAKE_HEAD_COLOR: Color = Color::srgba(0.9, 0.9, 0.9, 1.0);
pub const SNAKE_HEAD_GLOW_COLOR: Color = Color::srgba(0.3, 1.0, 0.3, 0.25);
pub const SNAKE_SEGMENT_COLOR: Color = Color::srgba(0.5, 0.5, 0.5, 1.0);
pub const FOOD_COLOR: Color = Color::srgba(1.0, 0.0, 0.0, 1.0);
pub const ARENA_COLOR: Color = Color::srgba(0.1, 0.1, 0.1, 1.0);
pub const ARENA_CELL_COLOR: Color = Color::srgba(0.13, 0.13, 0.13, 1.0);
pub const ARENA_BORDER_COLOR: Color = Color::srgba(0.3, 1.0, 0.3, 0.6);
pub const BACKGROUND_COLOR: Color = Color::srgba(0.04, 0.04, 0.04, 1.0);
pub const PETAL_COLOR: Color = Color::srgba(1.0, 0.72, 0.85, 1.0);
pub const BLOSSOM_HEART_COLOR: Color = Color::srgba(1.0, 0.85, 0.3, 1.0);
pub const BANNER_COLOR: Color = Color::srgba(1.0, 0.85, 0.3, 1.0);
pub const EAT_BURST_COLOR: Color = Color::srgba(1.0, 1.0, 0.3, 0.8);

// Z-index constants for rendering layers
pub const Z_BACKGROUND: f32 = 0.0;
pub const Z_GRID: f32 = 0.05;
pub const Z_FOOD: f32 = 1.0;
pub const Z_SNAKE_SEGMENT: f32 = 1.5;
pub const Z_SNAKE_HEAD: f32 = 2.0;
pub const Z_FLOWER: f32 = 5.0;
