//! Celebration plugin - milestone banners, the blossom, and the finale that
//! closes a winning session.

use bevy::prelude::*;
use bevy_vector_shapes::prelude::*;
use std::f32::consts::TAU;

use crate::game::{
    BIRTHDAY_SCORE, BLOSSOM_HEART_COLOR, CELL_SIZE, EndReason, FINALE_DELAY, FlowerEffect,
    GameEnded, GameSettings, GameState, MilestoneText, PETAL_COLOR, PRAISE_SCORE, PRAISE_TEXT,
    SessionStarted, Z_FLOWER,
};

/// Plugin for milestone effects.
pub struct CelebrationPlugin;

impl Plugin for CelebrationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Celebration>().add_systems(
            Update,
            (
                reset_celebration,
                track_milestones,
                run_finale,
                update_banner,
                bloom_flower,
                animate_flower,
                wilt_flower_on_game_over,
            )
                .chain(),
        );
    }
}

/// Score thresholds, in the order they are reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Milestone {
    #[default]
    None,
    Praise,
    Birthday,
    Finale,
}

impl Milestone {
    pub fn for_score(score: u32, finale_score: u32) -> Self {
        if score >= finale_score {
            Milestone::Finale
        } else if score >= BIRTHDAY_SCORE {
            Milestone::Birthday
        } else if score >= PRAISE_SCORE {
            Milestone::Praise
        } else {
            Milestone::None
        }
    }

    /// Banner shown while this milestone is the latest one reached.
    pub fn banner(&self, settings: &GameSettings) -> Option<String> {
        match self {
            Milestone::None => None,
            Milestone::Praise => Some(PRAISE_TEXT.to_string()),
            Milestone::Birthday | Milestone::Finale => Some(settings.birthday_text()),
        }
    }
}

/// Per-session milestone progress.
#[derive(Resource, Default)]
pub struct Celebration {
    pub milestone: Milestone,
    /// Counts down to the end of the session once the finale is reached
    pub finale: Option<Timer>,
}

fn reset_celebration(
    mut started: MessageReader<SessionStarted>,
    mut celebration: ResMut<Celebration>,
) {
    if started.read().last().is_some() {
        *celebration = Celebration::default();
    }
}

/// System to record newly reached milestones and arm the finale.
fn track_milestones(
    settings: Res<GameSettings>,
    game_state: Res<GameState>,
    mut celebration: ResMut<Celebration>,
) {
    if !game_state.is_playing() {
        return;
    }

    let reached = Milestone::for_score(game_state.score, settings.finale_score);
    if reached <= celebration.milestone {
        return;
    }

    info!("Milestone {reached:?} reached at score {}", game_state.score);
    celebration.milestone = reached;
    if reached == Milestone::Finale && celebration.finale.is_none() {
        celebration.finale = Some(Timer::new(FINALE_DELAY, TimerMode::Once));
    }
}

/// System to end the session once the finale delay has run out. Play goes on
/// until then.
fn run_finale(
    time: Res<Time>,
    mut celebration: ResMut<Celebration>,
    mut game_state: ResMut<GameState>,
    mut ended_writer: MessageWriter<GameEnded>,
) {
    if !game_state.is_playing() {
        return;
    }
    let Some(timer) = celebration.finale.as_mut() else {
        return;
    };

    timer.tick(time.delta());
    if timer.just_finished()
        && let Some(ending) = game_state.end(EndReason::Finale)
    {
        info!("Game Over! You scored {} points.", ending.score);
        ended_writer.write(GameEnded(ending));
    }
}

/// System to show the banner for the current milestone while playing.
fn update_banner(
    settings: Res<GameSettings>,
    game_state: Res<GameState>,
    celebration: Res<Celebration>,
    mut banners: Query<&mut Text, With<MilestoneText>>,
) {
    if !game_state.is_changed() && !celebration.is_changed() {
        return;
    }

    let text = if game_state.is_playing() {
        celebration.milestone.banner(&settings).unwrap_or_default()
    } else {
        String::new()
    };

    for mut banner in banners.iter_mut() {
        if banner.0 != text {
            banner.0.clone_from(&text);
        }
    }
}

/// System to spawn the blossom when the finale is reached.
fn bloom_flower(
    mut commands: Commands,
    game_state: Res<GameState>,
    celebration: Res<Celebration>,
    flowers: Query<(), With<FlowerEffect>>,
) {
    if celebration.milestone != Milestone::Finale
        || !game_state.is_playing()
        || !flowers.is_empty()
    {
        return;
    }

    let petal_radius = CELL_SIZE * 0.9;
    commands
        .spawn((
            FlowerEffect { age: 0.0 },
            Transform::from_xyz(0.0, 0.0, Z_FLOWER).with_scale(Vec3::ZERO),
            Visibility::default(),
        ))
        .with_children(|parent| {
            for i in 0..5 {
                let angle = i as f32 / 5.0 * TAU;
                let offset = Vec2::from_angle(angle) * petal_radius * 1.1;
                parent.spawn(ShapeBundle::circle(
                    &ShapeConfig {
                        color: PETAL_COLOR,
                        transform: Transform::from_xyz(offset.x, offset.y, 0.0),
                        ..ShapeConfig::default_2d()
                    },
                    petal_radius,
                ));
            }
            parent.spawn(ShapeBundle::circle(
                &ShapeConfig {
                    color: BLOSSOM_HEART_COLOR,
                    transform: Transform::from_xyz(0.0, 0.0, 0.1),
                    ..ShapeConfig::default_2d()
                },
                petal_radius * 0.7,
            ));
        });
}

/// System to open the blossom and turn it slowly.
fn animate_flower(time: Res<Time>, mut flowers: Query<(&mut Transform, &mut FlowerEffect)>) {
    for (mut transform, mut flower) in flowers.iter_mut() {
        flower.age += time.delta_secs();

        let opened = (flower.age / FINALE_DELAY.as_secs_f32() * 2.0).min(1.0);
        // Ease-out so the petals pop open and then settle
        let scale = opened * (2.0 - opened) * (1.0 + (flower.age * 4.0).sin() * 0.05);

        transform.scale = Vec3::splat(scale);
        transform.rotation = Quat::from_rotation_z(flower.age * 0.8);
    }
}

fn wilt_flower_on_game_over(
    mut commands: Commands,
    mut ended: MessageReader<GameEnded>,
    mut started: MessageReader<SessionStarted>,
    flowers: Query<Entity, With<FlowerEffect>>,
) {
    let ended = ended.read().last().is_some();
    let started = started.read().last().is_some();
    if !ended && !started {
        return;
    }

    for entity in flowers.iter() {
        commands.entity(entity).despawn();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GamePhase;
    use std::time::Duration;

    #[test]
    fn test_milestones_by_score() {
        assert_eq!(Milestone::for_score(0, 10), Milestone::None);
        assert_eq!(Milestone::for_score(4, 10), Milestone::None);
        assert_eq!(Milestone::for_score(5, 10), Milestone::Praise);
        assert_eq!(Milestone::for_score(6, 10), Milestone::Praise);
        assert_eq!(Milestone::for_score(7, 10), Milestone::Birthday);
        assert_eq!(Milestone::for_score(9, 10), Milestone::Birthday);
        assert_eq!(Milestone::for_score(10, 10), Milestone::Finale);
        assert_eq!(Milestone::for_score(25, 10), Milestone::Finale);
        // A low finale score takes precedence
        assert_eq!(Milestone::for_score(3, 3), Milestone::Finale);
    }

    #[test]
    fn test_banner_text() {
        let settings = GameSettings {
            celebrant: Some("Minh".to_string()),
            ..Default::default()
        };
        assert_eq!(Milestone::None.banner(&settings), None);
        assert_eq!(
            Milestone::Praise.banner(&settings).as_deref(),
            Some("Giỏi quá!")
        );
        assert_eq!(
            Milestone::Birthday.banner(&settings).as_deref(),
            Some("Happy Birthday Minh!")
        );
        assert_eq!(
            Milestone::Finale.banner(&settings),
            Milestone::Birthday.banner(&settings)
        );
    }

    fn test_app() -> App {
        let settings = GameSettings::default();
        let mut state = GameState::new(&settings);
        state.restart(&settings);

        let mut app = App::new();
        app.insert_resource(settings)
            .insert_resource(state)
            .init_resource::<Time>()
            .init_resource::<Celebration>()
            .add_message::<GameEnded>()
            .add_systems(Update, (track_milestones, run_finale).chain());
        app
    }

    fn advance(app: &mut App, by: Duration) {
        app.world_mut().resource_mut::<Time>().advance_by(by);
        app.update();
    }

    #[test]
    fn test_finale_ends_game_after_delay() {
        let mut app = test_app();
        app.world_mut().resource_mut::<GameState>().score = 10;

        advance(&mut app, Duration::ZERO);
        let celebration = app.world().resource::<Celebration>();
        assert_eq!(celebration.milestone, Milestone::Finale);
        assert!(celebration.finale.is_some());

        advance(&mut app, Duration::from_millis(1500));
        assert!(app.world().resource::<GameState>().is_playing());

        // Scoring during the finale still counts
        app.world_mut().resource_mut::<GameState>().score = 11;
        advance(&mut app, Duration::from_millis(500));

        let state = app.world().resource::<GameState>();
        assert_eq!(state.phase, GamePhase::GameOver);
        let ending = state.ending.expect("finale should end the game");
        assert_eq!(ending.reason, EndReason::Finale);
        assert_eq!(ending.score, 11);
    }

    #[test]
    fn test_collision_during_finale_wins_over_it() {
        let mut app = test_app();
        app.world_mut().resource_mut::<GameState>().score = 10;
        advance(&mut app, Duration::ZERO);

        app.world_mut()
            .resource_mut::<GameState>()
            .end(EndReason::Wall);
        advance(&mut app, Duration::from_secs(3));

        let ending = app.world().resource::<GameState>().ending;
        assert_eq!(ending.map(|e| e.reason), Some(EndReason::Wall));
    }

    #[test]
    fn test_banner_clears_when_game_ends() {
        let mut app = test_app();
        app.add_systems(Update, update_banner.after(run_finale));
        let banner = app
            .world_mut()
            .spawn((Text::default(), MilestoneText))
            .id();
        let banner_text = |app: &App| app.world().get::<Text>(banner).map(|t| t.0.clone());

        advance(&mut app, Duration::ZERO);
        assert_eq!(banner_text(&app).as_deref(), Some(""));

        app.world_mut().resource_mut::<GameState>().score = 5;
        advance(&mut app, Duration::ZERO);
        assert_eq!(banner_text(&app).as_deref(), Some("Giỏi quá!"));

        app.world_mut()
            .resource_mut::<GameState>()
            .end(EndReason::SelfCollision);
        advance(&mut app, Duration::ZERO);
        assert_eq!(banner_text(&app).as_deref(), Some(""));
    }

    #[test]
    fn test_milestones_only_move_forward() {
        let mut app = test_app();
        app.world_mut().resource_mut::<GameState>().score = 7;
        advance(&mut app, Duration::ZERO);
        assert_eq!(
            app.world().resource::<Celebration>().milestone,
            Milestone::Birthday
        );

        app.world_mut().resource_mut::<GameState>().score = 5;
        advance(&mut app, Duration::ZERO);
        assert_eq!(
            app.world().resource::<Celebration>().milestone,
            Milestone::Birthday
        );
    }
}
