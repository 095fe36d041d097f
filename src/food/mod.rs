//! Food plugin - handles food placement, the food marker, and its animation.

use bevy::prelude::*;
use bevy_vector_shapes::prelude::*;
use rand::Rng;
use std::collections::HashSet;

use crate::game::{
    CELL_SIZE, FOOD_COLOR, Food, FoodEatenEvent, FoodPulse, GameSettings, GameState, Position,
    PreviousPosition, SessionStarted, Z_FOOD,
};

/// Plugin for food-related systems.
pub struct FoodPlugin;

impl Plugin for FoodPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (spawn_food_on_start, relocate_food, food_pulse_animation).chain(),
        );
    }
}

/// Picks a random free cell for food, keeping `margin` cells away from the
/// walls. Returns `None` when every candidate cell is occupied.
pub fn place_food<'a, R: Rng + ?Sized>(
    rng: &mut R,
    width: i32,
    height: i32,
    margin: i32,
    occupied: impl IntoIterator<Item = &'a Position>,
) -> Option<Position> {
    let occupied: HashSet<Position> = occupied.into_iter().copied().collect();

    let free: Vec<Position> = (margin..height - margin)
        .flat_map(|y| (margin..width - margin).map(move |x| Position::new(x, y)))
        .filter(|pos| !occupied.contains(pos))
        .collect();

    if free.is_empty() {
        return None;
    }
    Some(free[rng.random_range(0..free.len())])
}

/// Spawns the food marker at the given cell.
pub fn spawn_food(commands: &mut Commands, settings: &GameSettings, position: Position) -> Entity {
    let center = settings.cell_center(position);

    commands
        .spawn((
            ShapeBundle::circle(
                &ShapeConfig {
                    color: FOOD_COLOR,
                    transform: Transform::from_xyz(center.x, center.y, Z_FOOD),
                    ..ShapeConfig::default_2d()
                },
                CELL_SIZE / 2.0,
            ),
            Food,
            position,
            PreviousPosition { pos: position },
            FoodPulse {
                timer: Timer::from_seconds(0.8, TimerMode::Repeating),
            },
        ))
        .id()
}

/// System to replace the food marker when a session starts.
fn spawn_food_on_start(
    mut commands: Commands,
    mut started: MessageReader<SessionStarted>,
    settings: Res<GameSettings>,
    game_state: Res<GameState>,
    food: Query<Entity, With<Food>>,
) {
    if started.read().last().is_none() {
        return;
    }

    for entity in food.iter() {
        commands.entity(entity).despawn();
    }
    if let Some(position) = game_state.board.food() {
        spawn_food(&mut commands, &settings, position);
    }
}

/// System to move the food marker after it was eaten.
fn relocate_food(
    mut commands: Commands,
    mut food_eaten_reader: MessageReader<FoodEatenEvent>,
    mut food: Query<(Entity, &mut Position, &mut PreviousPosition), With<Food>>,
) {
    for event in food_eaten_reader.read() {
        for (entity, mut position, mut previous) in food.iter_mut() {
            match event.next {
                // Food jumps, it does not slide across the board
                Some(next) => {
                    *position = next;
                    previous.pos = next;
                }
                None => commands.entity(entity).despawn(),
            }
        }
    }
}

/// System to animate food with a pulsing effect.
fn food_pulse_animation(
    time: Res<Time>,
    mut foods: Query<(&mut Transform, &mut FoodPulse), With<Food>>,
) {
    for (mut transform, mut pulse) in foods.iter_mut() {
        pulse.timer.tick(time.delta());

        // Use sine wave for smooth pulsing
        let progress = pulse.timer.fraction();
        let scale = 1.0 + (progress * std::f32::consts::PI * 2.0).sin() * 0.15;

        transform.scale = Vec3::splat(scale);
    }
}
