//! Rendering plugin - handles position interpolation, rotation, visual effects, and camera.

use bevy::math::FloatExt;
use bevy::prelude::*;
use bevy_vector_shapes::prelude::*;
use rand::prelude::*;

use crate::game::{
    CELL_SIZE, CRASH_SHAKE_DURATION, CRASH_SHAKE_INTENSITY, CameraShake, Direction,
    EAT_BURST_COLOR, EAT_BURST_DURATION, EAT_BURST_SCALE, EndReason, Food, FoodEatenEvent,
    GameEnded, GameSettings, GameState, GrowingSegment, Position, PreviousPosition, PulseEffect,
    SnakeHead, SnakeSegment, TickTimer, Z_BACKGROUND, Z_FOOD, Z_SNAKE_HEAD, Z_SNAKE_SEGMENT,
};

/// Plugin for rendering and visual effects.
pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraShake>().add_systems(
            Update,
            (
                position_translation,
                update_head_rotation,
                pulse_effect_system,
                spawn_food_eaten_effect,
                trigger_camera_shake_on_game_over,
                camera_shake_system,
                growing_segment_animation,
            )
                .chain(),
        );
    }
}

type TransformInterpolationQuery<'w, 's> = Query<
    'w,
    's,
    (
        &'static Position,
        &'static PreviousPosition,
        &'static mut Transform,
        Has<SnakeHead>,
        Has<SnakeSegment>,
        Has<Food>,
    ),
>;

/// Linear blend between two cell centres.
pub fn interpolate(settings: &GameSettings, from: Position, to: Position, progress: f32) -> Vec2 {
    let from = settings.cell_center(from);
    let to = settings.cell_center(to);
    from + (to - from) * progress.clamp(0.0, 1.0)
}

/// Head rotation for a heading. The head art faces right.
pub fn head_rotation(direction: Direction) -> f32 {
    match direction {
        Direction::Right => 0.0,
        Direction::Up => std::f32::consts::FRAC_PI_2,
        Direction::Left => std::f32::consts::PI,
        Direction::Down => -std::f32::consts::FRAC_PI_2,
    }
}

/// Quadratic ease-out over `0..=1`.
pub fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * (2.0 - t)
}

/// Camera offset for a shake that is `elapsed` of the way through.
/// Each axis stays within half the remaining intensity.
pub fn shake_offset<R: Rng + ?Sized>(rng: &mut R, intensity: f32, elapsed: f32) -> Vec2 {
    let reach = intensity * (1.0 - elapsed.clamp(0.0, 1.0)) / 2.0;
    if reach <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(rng.random_range(-reach..=reach), rng.random_range(-reach..=reach))
}

/// System to place every grid entity between its last two cells.
fn position_translation(
    mut transforms: TransformInterpolationQuery,
    settings: Res<GameSettings>,
    game_state: Res<GameState>,
    tick_timer: Res<TickTimer>,
) {
    // A stopped snake rests on its cells
    let progress = if game_state.is_playing() {
        tick_timer.progress()
    } else {
        1.0
    };

    for (pos, prev_pos, mut transform, is_head, is_segment, is_food) in transforms.iter_mut() {
        let z = match (is_head, is_segment, is_food) {
            (true, _, _) => Z_SNAKE_HEAD,
            (_, true, _) => Z_SNAKE_SEGMENT,
            (_, _, true) => Z_FOOD,
            _ => Z_BACKGROUND,
        };

        let at = interpolate(&settings, prev_pos.pos, *pos, progress);
        transform.translation = at.extend(z);
    }
}

/// System to update snake head rotation based on direction.
fn update_head_rotation(mut heads: Query<(&SnakeHead, &mut Transform)>) {
    for (head, mut transform) in heads.iter_mut() {
        transform.rotation = Quat::from_rotation_z(head_rotation(head.direction));
    }
}

/// System to grow or shrink pulse effects and drop them when done.
fn pulse_effect_system(
    mut commands: Commands,
    time: Res<Time>,
    mut effects: Query<(Entity, &mut Transform, &mut PulseEffect)>,
) {
    for (entity, mut transform, mut effect) in effects.iter_mut() {
        if effect.timer.tick(time.delta()).is_finished() {
            commands.entity(entity).despawn();
            continue;
        }

        let t = effect.timer.fraction();
        transform.scale = Vec3::splat(effect.start_scale.lerp(effect.end_scale, t));
    }
}

/// System to flash a burst where food was eaten.
fn spawn_food_eaten_effect(
    mut commands: Commands,
    mut food_eaten_reader: MessageReader<FoodEatenEvent>,
    settings: Res<GameSettings>,
) {
    for event in food_eaten_reader.read() {
        let center = settings.cell_center(event.position);

        commands.spawn((
            ShapeBundle::circle(
                &ShapeConfig {
                    color: EAT_BURST_COLOR,
                    alpha_mode: ShapeAlphaMode::Add,
                    transform: Transform::from_xyz(center.x, center.y, Z_FOOD + 0.5),
                    ..ShapeConfig::default_2d()
                },
                CELL_SIZE / 2.0,
            ),
            PulseEffect {
                timer: Timer::new(EAT_BURST_DURATION, TimerMode::Once),
                start_scale: 1.0,
                end_scale: EAT_BURST_SCALE,
            },
        ));
    }
}

/// System to start a camera shake when the snake crashes.
fn trigger_camera_shake_on_game_over(
    mut ended: MessageReader<GameEnded>,
    mut camera_shake: ResMut<CameraShake>,
) {
    // A finale is a happy ending, no shake for it
    let crashed = ended.read().any(|event| event.0.reason != EndReason::Finale);
    if crashed {
        camera_shake.start(CRASH_SHAKE_DURATION, CRASH_SHAKE_INTENSITY);
    }
}

/// System to jitter the camera while a shake is running.
fn camera_shake_system(
    time: Res<Time>,
    mut camera_shake: ResMut<CameraShake>,
    mut cameras: Query<&mut Transform, With<Camera2d>>,
) {
    if !camera_shake.is_active() {
        return;
    }
    camera_shake.timer.tick(time.delta());

    let Ok(mut camera) = cameras.single_mut() else {
        return;
    };
    let offset = if camera_shake.is_active() {
        shake_offset(
            &mut rand::rng(),
            camera_shake.intensity,
            camera_shake.timer.fraction(),
        )
    } else {
        Vec2::ZERO
    };
    camera.translation = offset.extend(camera.translation.z);
}

/// System to pop newly grown tail segments into place.
fn growing_segment_animation(
    mut commands: Commands,
    time: Res<Time>,
    mut growing: Query<(Entity, &mut Transform, &mut GrowingSegment)>,
) {
    for (entity, mut transform, mut growing_segment) in growing.iter_mut() {
        let timer = growing_segment.timer.tick(time.delta());
        transform.scale = Vec3::splat(ease_out(timer.fraction()));

        if timer.is_finished() {
            commands.entity(entity).remove::<GrowingSegment>();
        }
    }
}
