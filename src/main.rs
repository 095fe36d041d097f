use anyhow::{Context, Result};
use bevy::{prelude::*, window::WindowResolution};
use bevy_vector_shapes::prelude::*;
use clap::Parser;
use std::time::Duration;

use snake_party::SnakeGamePlugins;
use snake_party::game::{
    BACKGROUND_COLOR, DEFAULT_ARENA_HEIGHT, DEFAULT_ARENA_WIDTH, DEFAULT_FINALE_SCORE,
    DEFAULT_FOOD_MARGIN, DEFAULT_SWIPE_THRESHOLD, DEFAULT_TICK_MS, GameSettings, WINDOW_PADDING,
};

#[derive(Parser)]
#[command(name = "snake_party")]
#[command(version, about = "Snake with score milestones and a birthday finale")]
struct Cli {
    /// Arena width in cells
    #[arg(long, default_value_t = DEFAULT_ARENA_WIDTH)]
    width: u32,

    /// Arena height in cells
    #[arg(long, default_value_t = DEFAULT_ARENA_HEIGHT)]
    height: u32,

    /// Milliseconds between movement ticks
    #[arg(long, default_value_t = DEFAULT_TICK_MS)]
    tick_ms: u64,

    /// Cells between the walls and any food
    #[arg(long, default_value_t = DEFAULT_FOOD_MARGIN)]
    food_margin: u32,

    /// Score that starts the finale
    #[arg(long, default_value_t = DEFAULT_FINALE_SCORE)]
    finale_score: u32,

    /// Minimum swipe length in pixels
    #[arg(long, default_value_t = DEFAULT_SWIPE_THRESHOLD)]
    swipe_threshold: f32,

    /// Name for the birthday banner
    #[arg(long)]
    name: Option<String>,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,
}

impl Cli {
    fn into_settings(self) -> GameSettings {
        GameSettings {
            width: self.width,
            height: self.height,
            tick_interval: Duration::from_millis(self.tick_ms),
            food_margin: self.food_margin,
            finale_score: self.finale_score,
            swipe_threshold: self.swipe_threshold,
            celebrant: self.name,
            seed: self.seed,
        }
    }
}

fn main() -> Result<()> {
    let settings = Cli::parse().into_settings();
    settings.validate().context("invalid game settings")?;

    let arena = settings.arena_size() + Vec2::splat(WINDOW_PADDING);

    App::new()
        .add_plugins((
            DefaultPlugins.set(WindowPlugin {
                primary_window: Some(Window {
                    resolution: WindowResolution::new(arena.x as u32, arena.y as u32),
                    title: "Snake Game".to_string(),
                    canvas: Some("#snake-canvas".to_string()),
                    fit_canvas_to_parent: true,
                    prevent_default_event_handling: true,
                    ..default()
                }),
                ..default()
            }),
            Shape2dPlugin::default(),
        ))
        .insert_resource(ClearColor(BACKGROUND_COLOR))
        .insert_resource(settings)
        .add_plugins(SnakeGamePlugins)
        .run();

    Ok(())
}
