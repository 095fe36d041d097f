//! Snake on a walled grid, with score milestones and a birthday finale.
//!
//! The rules live in [`game::Board`], which is plain data stepped once per
//! tick. The plugins wire it into Bevy:
//! - [`snake::SnakePlugin`]: input, the movement tick, segment entities
//! - [`food::FoodPlugin`]: food placement and the food marker
//! - [`celebration::CelebrationPlugin`]: milestone banners and the finale
//! - [`rendering::RenderingPlugin`]: interpolation and effects
//! - [`ui::UiPlugin`]: camera, arena, score, start and game over screens

pub mod celebration;
pub mod food;
pub mod game;
pub mod rendering;
pub mod snake;
pub mod ui;

use bevy::prelude::*;

/// All gameplay plugins. Expects [`game::GameSettings`] to be inserted first.
pub struct SnakeGamePlugins;

impl PluginGroup for SnakeGamePlugins {
    fn build(self) -> bevy::app::PluginGroupBuilder {
        bevy::app::PluginGroupBuilder::start::<Self>()
            .add(snake::SnakePlugin)
            .add(food::FoodPlugin)
            .add(celebration::CelebrationPlugin)
            .add(rendering::RenderingPlugin)
            .add(ui::UiPlugin)
    }
}
