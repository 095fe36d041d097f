//! UI plugin - handles the start modal, game over screen, score display, and game flow.

use bevy::post_process::bloom::Bloom;
use bevy::prelude::*;
use bevy::render::view::Hdr;

use bevy_vector_shapes::prelude::*;

use crate::game::{
    ARENA_BORDER_COLOR, ARENA_CELL_COLOR, ARENA_COLOR, BANNER_COLOR, CELL_SIZE, EndReason,
    FONT_PATH, GameEnded, GameEnding, GamePhase, GameOverUI, GameSettings, GameState, InputBuffer,
    MenuUI, MilestoneText, Position, RestartButton, ScoreText, SessionStarted, StartButton,
    TickTimer, Z_GRID,
};

/// Plugin for UI and game flow systems.
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_system).add_systems(
            Update,
            (
                button_highlight,
                start_or_restart,
                update_score_text,
                spawn_game_over_screen_system,
            )
                .chain(),
        );
    }
}

const BUTTON_COLOR: Color = Color::srgba(0.15, 0.5, 0.15, 1.0);
const BUTTON_HOVER_COLOR: Color = Color::srgba(0.2, 0.65, 0.2, 1.0);
const BUTTON_PRESSED_COLOR: Color = Color::srgba(0.1, 0.35, 0.1, 1.0);

type OverlayQuery<'w, 's> = Query<'w, 's, Entity, Or<(With<MenuUI>, With<GameOverUI>)>>;
type StartButtonQuery<'w, 's> = Query<
    'w,
    's,
    &'static Interaction,
    (
        Changed<Interaction>,
        Or<(With<StartButton>, With<RestartButton>)>,
    ),
>;

fn text_font(asset_server: &AssetServer, font_size: f32) -> TextFont {
    TextFont {
        font: asset_server.load(FONT_PATH),
        font_size,
        ..default()
    }
}

/// Initial setup system - camera, arena, score text.
fn setup_system(
    mut commands: Commands,
    settings: Res<GameSettings>,
    game_state: Res<GameState>,
    asset_server: Res<AssetServer>,
) {
    // Setup camera with HDR and bloom for glowing effects
    commands.spawn((
        Camera2d,
        Hdr,
        Bloom {
            intensity: 0.3,
            low_frequency_boost: 0.6,
            low_frequency_boost_curvature: 0.5,
            high_pass_frequency: 0.8,
            ..default()
        },
    ));

    // Arena background
    let arena = settings.arena_size();
    commands.spawn((
        Sprite {
            color: ARENA_COLOR,
            custom_size: Some(arena),
            ..default()
        },
        Transform::from_translation(Vec3::ZERO),
    ));

    // One faint box per cell
    for y in 0..settings.height as i32 {
        for x in 0..settings.width as i32 {
            let center = settings.cell_center(Position::new(x, y));
            commands.spawn((
                Sprite {
                    color: ARENA_CELL_COLOR,
                    custom_size: Some(Vec2::splat(CELL_SIZE - 2.0)),
                    ..default()
                },
                Transform::from_xyz(center.x, center.y, Z_GRID),
            ));
        }
    }

    // Glowing arena border using hollow rectangle
    commands.spawn(ShapeBundle::rect(
        &ShapeConfig {
            color: ARENA_BORDER_COLOR,
            alpha_mode: ShapeAlphaMode::Add,
            hollow: true,
            thickness: 4.0,
            corner_radii: Vec4::splat(0.02),
            transform: Transform::from_xyz(0.0, 0.0, 0.1),
            ..ShapeConfig::default_2d()
        },
        arena + Vec2::splat(4.0),
    ));

    commands.spawn((
        Text::from("Score: 0"),
        text_font(&asset_server, 20.0),
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(10.0),
            left: Val::Px(10.0),
            ..default()
        },
        ScoreText,
    ));

    // Milestone banner, empty until a milestone is reached
    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            top: Val::Px(48.0),
            width: Val::Percent(100.0),
            justify_content: JustifyContent::Center,
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::default(),
                text_font(&asset_server, 32.0),
                TextColor(BANNER_COLOR),
                MilestoneText,
            ));
        });

    if game_state.phase == GamePhase::Menu {
        spawn_start_menu(&mut commands, &asset_server);
    }
}

fn spawn_button(
    parent: &mut ChildSpawnerCommands<'_>,
    font: TextFont,
    label: &str,
    marker: impl Bundle,
) {
    parent
        .spawn((
            Button,
            Node {
                padding: UiRect::axes(Val::Px(28.0), Val::Px(12.0)),
                margin: UiRect::top(Val::Px(10.0)),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(BUTTON_COLOR),
            marker,
        ))
        .with_children(|button| {
            button.spawn((Text::from(label), font, TextColor(Color::WHITE)));
        });
}

/// Spawns the start modal.
fn spawn_start_menu(commands: &mut Commands, asset_server: &AssetServer) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                align_items: AlignItems::Center,
                justify_content: JustifyContent::Center,
                flex_direction: FlexDirection::Column,
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.85)),
            MenuUI,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::from("SNAKE"),
                text_font(asset_server, 80.0),
                TextColor(Color::srgba(0.3, 1.0, 0.3, 1.0)),
                Node {
                    margin: UiRect::bottom(Val::Px(30.0)),
                    ..default()
                },
            ));

            for line in [
                "Arrow keys, WASD or swipe to move",
                "Eat the red apples to grow",
                "Don't hit the walls or yourself!",
            ] {
                parent.spawn((
                    Text::from(line),
                    text_font(asset_server, 18.0),
                    TextColor(Color::srgba(0.8, 0.8, 0.8, 1.0)),
                    Node {
                        margin: UiRect::bottom(Val::Px(10.0)),
                        ..default()
                    },
                ));
            }

            spawn_button(
                parent,
                text_font(asset_server, 28.0),
                "Play Snake",
                StartButton,
            );

            parent.spawn((
                Text::from("or press SPACE"),
                text_font(asset_server, 16.0),
                TextColor(Color::srgba(1.0, 1.0, 0.3, 1.0)),
                Node {
                    margin: UiRect::top(Val::Px(12.0)),
                    ..default()
                },
            ));
        });
}

/// Spawns the game over screen UI.
fn spawn_game_over_screen(commands: &mut Commands, asset_server: &AssetServer, ending: GameEnding) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                align_items: AlignItems::Center,
                justify_content: JustifyContent::Center,
                flex_direction: FlexDirection::Column,
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.7)),
            GameOverUI,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::from("Game Over!"),
                text_font(asset_server, 60.0),
                TextColor(Color::srgba(1.0, 0.3, 0.3, 1.0)),
                Node {
                    margin: UiRect::bottom(Val::Px(20.0)),
                    ..default()
                },
            ));

            parent.spawn((
                Text::from(format!("{} Points!", ending.score)),
                text_font(asset_server, 30.0),
                TextColor(Color::WHITE),
                Node {
                    margin: UiRect::bottom(Val::Px(20.0)),
                    ..default()
                },
            ));

            if ending.reason == EndReason::Finale {
                parent.spawn((
                    Text::from(format!("You scored {} points.", ending.score)),
                    text_font(asset_server, 22.0),
                    TextColor(BANNER_COLOR),
                    Node {
                        margin: UiRect::bottom(Val::Px(20.0)),
                        ..default()
                    },
                ));
            }

            spawn_button(
                parent,
                text_font(asset_server, 24.0),
                "Restart Game",
                RestartButton,
            );
        });
}

/// System to spawn game over screen when game ends.
fn spawn_game_over_screen_system(
    mut commands: Commands,
    mut ended: MessageReader<GameEnded>,
    asset_server: Res<AssetServer>,
    game_over_ui: Query<Entity, With<GameOverUI>>,
) {
    let Some(GameEnded(ending)) = ended.read().last() else {
        return;
    };

    if game_over_ui.is_empty() {
        spawn_game_over_screen(&mut commands, &asset_server, *ending);
    }
}

/// System to start a session from the modal or restart after game over.
#[allow(clippy::too_many_arguments)]
fn start_or_restart(
    mut commands: Commands,
    keyboard_input: Res<ButtonInput<KeyCode>>,
    buttons: StartButtonQuery,
    settings: Res<GameSettings>,
    mut game_state: ResMut<GameState>,
    mut input_buffer: ResMut<InputBuffer>,
    mut tick_timer: ResMut<TickTimer>,
    mut started_writer: MessageWriter<SessionStarted>,
    overlays: OverlayQuery,
) {
    if game_state.is_playing() {
        return;
    }

    let clicked = buttons
        .iter()
        .any(|interaction| *interaction == Interaction::Pressed);
    let pressed = keyboard_input.any_just_pressed([KeyCode::Space, KeyCode::Enter]);
    if !clicked && !pressed {
        return;
    }

    for entity in overlays.iter() {
        commands.entity(entity).despawn();
    }

    game_state.restart(&settings);
    input_buffer.clear();
    tick_timer.0.reset();
    started_writer.write(SessionStarted);
    info!(
        "Session started on a {}x{} arena, {:?} per tick",
        settings.width, settings.height, settings.tick_interval
    );
}

/// System to give buttons hover and press feedback.
fn button_highlight(
    mut buttons: Query<(&Interaction, &mut BackgroundColor), (Changed<Interaction>, With<Button>)>,
) {
    for (interaction, mut color) in buttons.iter_mut() {
        color.0 = match interaction {
            Interaction::Pressed => BUTTON_PRESSED_COLOR,
            Interaction::Hovered => BUTTON_HOVER_COLOR,
            Interaction::None => BUTTON_COLOR,
        };
    }
}

/// System to update the score display.
fn update_score_text(game_state: Res<GameState>, mut query: Query<&mut Text, With<ScoreText>>) {
    if !game_state.is_changed() {
        return;
    }
    if let Ok(mut text) = query.single_mut() {
        *text = Text::from(format!("Score: {}", game_state.score));
    }
}
