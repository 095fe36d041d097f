//! Snake plugin - handles input, the movement tick, collision handling, and
//! keeping the segment entities in step with the board.

pub mod input;

use bevy::input::ButtonState;
use bevy::input::keyboard::KeyboardInput;
use bevy::prelude::*;
use bevy_vector_shapes::prelude::*;

use crate::game::{
    CELL_SIZE, CORNER_RADIUS, Direction, EndReason, FoodEatenEvent, GROW_DURATION, GameEnded,
    GameRng, GameSettings, GameState, GrowingSegment, InputBuffer, Position, PreviousPosition,
    SNAKE_HEAD_COLOR, SNAKE_HEAD_GLOW_COLOR, SNAKE_SEGMENT_COLOR, SessionStarted, SnakeEye,
    SnakeHead, SnakeSegment, SnakeStepped, StepOutcome, TickTimer, Z_SNAKE_HEAD,
    Z_SNAKE_SEGMENT,
};
use input::{SwipeTracker, direction_for_key};

/// Plugin for snake-related systems.
pub struct SnakePlugin;

impl Plugin for SnakePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GameState>()
            .init_resource::<InputBuffer>()
            .init_resource::<SwipeTracker>()
            .init_resource::<TickTimer>()
            .init_resource::<GameRng>()
            .init_resource::<SnakeEntities>()
            .add_message::<SessionStarted>()
            .add_message::<SnakeStepped>()
            .add_message::<FoodEatenEvent>()
            .add_message::<GameEnded>()
            .add_systems(
                Update,
                (
                    keyboard_direction_input,
                    touch_direction_input,
                    advance_game,
                    rebuild_snake_on_start,
                    sync_snake_entities,
                )
                    .chain(),
            );
    }
}

/// Segment entities in board order, head first.
#[derive(Resource, Default)]
pub struct SnakeEntities(pub Vec<Entity>);

/// Spawns the snake head entity with eyes.
pub fn spawn_snake_head(
    commands: &mut Commands,
    settings: &GameSettings,
    position: Position,
    direction: Direction,
) -> Entity {
    let size = CELL_SIZE * 0.9;
    // Normalize corner radius relative to the shape size (0.0 to 1.0 range)
    let corner_radius_normalized = CORNER_RADIUS / (size / 2.0);
    let center = settings.cell_center(position);

    commands
        .spawn((
            ShapeBundle::rect(
                &ShapeConfig {
                    color: SNAKE_HEAD_COLOR,
                    corner_radii: Vec4::splat(corner_radius_normalized),
                    transform: Transform::from_xyz(center.x, center.y, Z_SNAKE_HEAD),
                    ..ShapeConfig::default_2d()
                },
                Vec2::splat(size),
            ),
            SnakeHead { direction },
            position,
            PreviousPosition { pos: position },
        ))
        .with_children(|parent| {
            // Glow effect behind the head
            parent.spawn(ShapeBundle::circle(
                &ShapeConfig {
                    color: SNAKE_HEAD_GLOW_COLOR,
                    alpha_mode: ShapeAlphaMode::Add,
                    transform: Transform::from_xyz(0.0, 0.0, -0.1),
                    ..ShapeConfig::default_2d()
                },
                CELL_SIZE * 0.8,
            ));

            let eye_radius = CELL_SIZE * 0.08;

            // Eyes sit on the leading edge while the head faces right; the
            // head's rotation turns them with it.
            for side in [1.0, -1.0] {
                parent.spawn((
                    ShapeBundle::circle(
                        &ShapeConfig {
                            color: Color::srgba(0.0, 0.0, 0.0, 1.0),
                            transform: Transform::from_xyz(
                                CELL_SIZE * 0.15,
                                side * CELL_SIZE * 0.15,
                                0.1,
                            ),
                            ..ShapeConfig::default_2d()
                        },
                        eye_radius,
                    ),
                    SnakeEye,
                ));
            }
        })
        .id()
}

/// Spawns a snake body segment at the given position.
pub fn spawn_snake_segment(
    commands: &mut Commands,
    settings: &GameSettings,
    position: Position,
) -> Entity {
    let size = CELL_SIZE;
    let corner_radius_normalized = CORNER_RADIUS / (size / 2.0);
    let center = settings.cell_center(position);

    commands
        .spawn((
            ShapeBundle::rect(
                &ShapeConfig {
                    color: SNAKE_SEGMENT_COLOR,
                    corner_radii: Vec4::splat(corner_radius_normalized),
                    transform: Transform::from_xyz(center.x, center.y, Z_SNAKE_SEGMENT),
                    ..ShapeConfig::default_2d()
                },
                Vec2::splat(size),
            ),
            SnakeSegment,
            position,
            PreviousPosition { pos: position },
        ))
        .id()
}

/// System to queue direction changes from key presses, in the order they
/// arrived. Auto-repeat is ignored.
fn keyboard_direction_input(
    mut keyboard_events: MessageReader<KeyboardInput>,
    mut input_buffer: ResMut<InputBuffer>,
    game_state: Res<GameState>,
) {
    if !game_state.is_playing() {
        keyboard_events.clear();
        return;
    }

    for event in keyboard_events.read() {
        if event.state == ButtonState::Pressed
            && !event.repeat
            && let Some(direction) = direction_for_key(event.key_code)
        {
            input_buffer.request(direction, game_state.board.direction());
        }
    }
}

/// System to turn swipes into direction changes.
fn touch_direction_input(
    touches: Res<Touches>,
    settings: Res<GameSettings>,
    mut tracker: ResMut<SwipeTracker>,
    mut input_buffer: ResMut<InputBuffer>,
    game_state: Res<GameState>,
) {
    if !game_state.is_playing() {
        tracker.cancel();
        return;
    }

    for touch in touches.iter_just_pressed() {
        tracker.begin(touch.id(), touch.position());
    }

    for touch in touches.iter() {
        if let Some(direction) =
            tracker.track(touch.id(), touch.position(), settings.swipe_threshold)
        {
            input_buffer.request(direction, game_state.board.direction());
        }
    }

    for touch in touches
        .iter_just_released()
        .chain(touches.iter_just_canceled())
    {
        tracker.release(touch.id());
    }
}

/// System to advance the board once per elapsed tick.
#[allow(clippy::too_many_arguments)]
fn advance_game(
    time: Res<Time>,
    mut tick_timer: ResMut<TickTimer>,
    mut game_state: ResMut<GameState>,
    mut input_buffer: ResMut<InputBuffer>,
    mut rng: ResMut<GameRng>,
    mut stepped_writer: MessageWriter<SnakeStepped>,
    mut food_eaten_writer: MessageWriter<FoodEatenEvent>,
    mut ended_writer: MessageWriter<GameEnded>,
) {
    if !game_state.is_playing() {
        return;
    }

    tick_timer.0.tick(time.delta());

    for _ in 0..tick_timer.0.times_finished_this_tick() {
        if let Some(direction) = input_buffer.pop_direction() {
            game_state.board.turn(direction);
        }

        let outcome = game_state.board.step(&mut rng.0);
        game_state.ticks += 1;

        let end_reason = match outcome {
            StepOutcome::Moved => None,
            StepOutcome::Ate { eaten, next_food } => {
                game_state.score += 1;
                debug!("Food eaten at {eaten:?}, score {}", game_state.score);
                food_eaten_writer.write(FoodEatenEvent {
                    position: eaten,
                    next: next_food,
                });
                next_food.is_none().then_some(EndReason::BoardFull)
            }
            StepOutcome::Collided(collision) => Some(EndReason::from(collision)),
        };

        if !matches!(outcome, StepOutcome::Collided(_)) {
            stepped_writer.write(SnakeStepped);
        }

        if let Some(reason) = end_reason {
            if let Some(ending) = game_state.end(reason) {
                info!("Game Over! Snake {reason}, final score: {}", ending.score);
                ended_writer.write(GameEnded(ending));
            }
            break;
        }
    }
}

/// System to replace all segment entities when a session starts.
fn rebuild_snake_on_start(
    mut commands: Commands,
    mut started: MessageReader<SessionStarted>,
    settings: Res<GameSettings>,
    game_state: Res<GameState>,
    mut entities: ResMut<SnakeEntities>,
    leftovers: Query<Entity, Or<(With<SnakeHead>, With<SnakeSegment>)>>,
) {
    if started.read().last().is_none() {
        return;
    }

    for entity in leftovers.iter() {
        commands.entity(entity).despawn();
    }
    entities.0.clear();

    let board = &game_state.board;
    let head = spawn_snake_head(&mut commands, &settings, board.head(), board.direction());
    entities.0.push(head);
    for cell in board.body().skip(1) {
        entities
            .0
            .push(spawn_snake_segment(&mut commands, &settings, *cell));
    }
}

type SegmentPositionQuery<'w, 's> = Query<
    'w,
    's,
    (&'static mut Position, &'static mut PreviousPosition),
    Or<(With<SnakeHead>, With<SnakeSegment>)>,
>;

/// System to move segment entities to their new cells and grow the tail.
fn sync_snake_entities(
    mut commands: Commands,
    mut stepped: MessageReader<SnakeStepped>,
    settings: Res<GameSettings>,
    game_state: Res<GameState>,
    mut entities: ResMut<SnakeEntities>,
    mut positions: SegmentPositionQuery,
    mut heads: Query<&mut SnakeHead>,
) {
    if stepped.read().last().is_none() || entities.0.is_empty() {
        return;
    }

    let board = &game_state.board;
    for (index, entity) in entities.0.iter().enumerate() {
        if let (Ok((mut position, mut previous)), Some(cell)) =
            (positions.get_mut(*entity), board.segment(index))
        {
            previous.pos = *position;
            *position = cell;
        }
    }

    while entities.0.len() < board.len() {
        let Some(cell) = board.segment(entities.0.len()) else {
            break;
        };
        let segment = spawn_snake_segment(&mut commands, &settings, cell);
        commands.entity(segment).insert(GrowingSegment {
            timer: Timer::new(GROW_DURATION, TimerMode::Once),
        });
        entities.0.push(segment);
    }

    for mut head in heads.iter_mut() {
        head.direction = board.direction();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Board, GamePhase};
    use bevy::input::keyboard::{Key, NativeKey};
    use bevy::input::touch::{TouchInput, TouchPhase, Touches, touch_screen_input_system};
    use rand::{SeedableRng, rngs::StdRng};
    use std::time::Duration;

    fn test_app() -> App {
        let settings = GameSettings {
            seed: Some(42),
            ..Default::default()
        };

        let mut app = App::new();
        app.insert_resource(settings)
            .init_resource::<Time>()
            .init_resource::<Touches>()
            .init_resource::<GameState>()
            .init_resource::<InputBuffer>()
            .init_resource::<SwipeTracker>()
            .init_resource::<TickTimer>()
            .init_resource::<GameRng>()
            .init_resource::<SnakeEntities>()
            .add_message::<KeyboardInput>()
            .add_message::<TouchInput>()
            .add_message::<SessionStarted>()
            .add_message::<SnakeStepped>()
            .add_message::<FoodEatenEvent>()
            .add_message::<GameEnded>()
            .add_systems(PreUpdate, touch_screen_input_system)
            .add_systems(
                Update,
                (
                    keyboard_direction_input,
                    touch_direction_input,
                    advance_game,
                    rebuild_snake_on_start,
                    sync_snake_entities,
                )
                    .chain(),
            );

        let settings = app.world().resource::<GameSettings>().clone();
        app.world_mut().resource_mut::<GameState>().restart(&settings);
        app
    }

    fn advance(app: &mut App, by: Duration) {
        app.world_mut().resource_mut::<Time>().advance_by(by);
        app.update();
    }

    fn tick(app: &mut App) {
        advance(app, Duration::from_millis(100));
    }

    fn press(app: &mut App, key_code: KeyCode) {
        app.world_mut().write_message(KeyboardInput {
            key_code,
            logical_key: Key::Unidentified(NativeKey::Unidentified),
            state: ButtonState::Pressed,
            text: None,
            repeat: false,
            window: Entity::PLACEHOLDER,
        });
    }

    fn touch(app: &mut App, phase: TouchPhase, position: Vec2) {
        app.world_mut().write_message(TouchInput {
            phase,
            position,
            window: Entity::PLACEHOLDER,
            force: None,
            id: 0,
        });
    }

    fn set_board(app: &mut App, board: Board) {
        app.world_mut().resource_mut::<GameState>().board = board;
    }

    fn head(app: &App) -> Position {
        app.world().resource::<GameState>().board.head()
    }

    fn growing_count(app: &mut App) -> usize {
        let world = app.world_mut();
        world
            .query_filtered::<Entity, With<GrowingSegment>>()
            .iter(world)
            .count()
    }

    fn assert_entities_follow_board(app: &App) {
        let world = app.world();
        let board = &world.resource::<GameState>().board;
        let entities = &world.resource::<SnakeEntities>().0;
        assert_eq!(entities.len(), board.len());

        for (index, entity) in entities.iter().enumerate() {
            assert_eq!(
                world.get::<Position>(*entity).copied(),
                board.segment(index),
                "segment {index}"
            );
        }
    }

    #[test]
    fn test_moves_only_on_tick() {
        let mut app = test_app();

        advance(&mut app, Duration::from_millis(40));
        assert_eq!(head(&app), Position::new(10, 10));

        advance(&mut app, Duration::from_millis(60));
        assert_eq!(head(&app), Position::new(11, 10));
        assert_eq!(app.world().resource::<GameState>().ticks, 1);
    }

    #[test]
    fn test_idle_in_menu() {
        let mut app = test_app();
        app.world_mut().resource_mut::<GameState>().phase = GamePhase::Menu;

        tick(&mut app);
        assert_eq!(head(&app), Position::new(10, 10));
    }

    #[test]
    fn test_keys_pressed_in_menu_are_dropped() {
        let mut app = test_app();
        app.world_mut().resource_mut::<GameState>().phase = GamePhase::Menu;
        press(&mut app, KeyCode::ArrowUp);
        advance(&mut app, Duration::ZERO);

        app.world_mut().resource_mut::<GameState>().phase = GamePhase::Playing;
        tick(&mut app);
        assert_eq!(head(&app), Position::new(11, 10));
    }

    #[test]
    fn test_arrow_key_turns_snake() {
        let mut app = test_app();
        press(&mut app, KeyCode::ArrowUp);
        tick(&mut app);

        assert_eq!(head(&app), Position::new(10, 9));
        assert_eq!(
            app.world().resource::<GameState>().board.direction(),
            Direction::Up
        );
    }

    #[test]
    fn test_reverse_key_is_ignored() {
        let mut app = test_app();
        press(&mut app, KeyCode::ArrowLeft);
        tick(&mut app);

        assert_eq!(head(&app), Position::new(11, 10));
        assert!(app.world().resource::<GameState>().is_playing());
    }

    #[test]
    fn test_two_quick_turns_cannot_reverse() {
        let mut app = test_app();

        // Up then Left inside one tick is a legal U-turn over two ticks
        press(&mut app, KeyCode::ArrowUp);
        advance(&mut app, Duration::from_millis(10));
        press(&mut app, KeyCode::ArrowLeft);
        advance(&mut app, Duration::from_millis(10));

        advance(&mut app, Duration::from_millis(80));
        assert_eq!(head(&app), Position::new(10, 9));

        tick(&mut app);
        assert_eq!(head(&app), Position::new(9, 9));
        assert!(app.world().resource::<GameState>().is_playing());
    }

    #[test]
    fn test_presses_in_one_frame_keep_their_order() {
        // Down then Left: both turns are legal in that order
        let mut app = test_app();
        press(&mut app, KeyCode::ArrowDown);
        press(&mut app, KeyCode::KeyA);
        tick(&mut app);
        tick(&mut app);
        assert_eq!(head(&app), Position::new(9, 11));

        // Left then Down: Left reverses the current heading and is dropped
        let mut app = test_app();
        press(&mut app, KeyCode::KeyA);
        press(&mut app, KeyCode::ArrowDown);
        tick(&mut app);
        tick(&mut app);
        assert_eq!(head(&app), Position::new(10, 12));
    }

    #[test]
    fn test_swipe_turns_snake() {
        let mut app = test_app();
        let start = Vec2::new(200.0, 200.0);

        touch(&mut app, TouchPhase::Started, start);
        advance(&mut app, Duration::from_millis(10));
        assert!(app.world().resource::<SwipeTracker>().is_tracking());

        // Below the threshold
        touch(&mut app, TouchPhase::Moved, start + Vec2::new(5.0, 0.0));
        advance(&mut app, Duration::from_millis(10));
        assert_eq!(app.world().resource::<InputBuffer>().last_direction(), None);

        // Screen y grows downward, so this drag points up the board
        touch(&mut app, TouchPhase::Moved, start + Vec2::new(4.0, -50.0));
        advance(&mut app, Duration::from_millis(10));
        assert_eq!(
            app.world().resource::<InputBuffer>().last_direction(),
            Some(Direction::Up)
        );
        assert!(!app.world().resource::<SwipeTracker>().is_tracking());

        touch(&mut app, TouchPhase::Ended, start + Vec2::new(4.0, -50.0));
        advance(&mut app, Duration::from_millis(70));
        assert_eq!(head(&app), Position::new(10, 9));
    }

    #[test]
    fn test_eating_scores() {
        let mut app = test_app();
        set_board(
            &mut app,
            Board::from_parts(
                [Position::new(10, 10), Position::new(9, 10)],
                Direction::Right,
                Position::new(11, 10),
                20,
                20,
            ),
        );

        tick(&mut app);

        let state = app.world().resource::<GameState>();
        assert_eq!(state.score, 1);
        assert_eq!(state.board.len(), 3);
        let food = state.board.food().expect("room for more food");
        assert_ne!(food, Position::new(11, 10));
        assert!(!state.board.contains(food));
    }

    #[test]
    fn test_filling_the_board_ends_game() {
        let mut app = test_app();
        set_board(
            &mut app,
            Board::from_parts(
                [Position::new(0, 0)],
                Direction::Right,
                Position::new(1, 0),
                2,
                1,
            ),
        );

        tick(&mut app);

        let state = app.world().resource::<GameState>();
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.score, 1);
        assert_eq!(state.board.food(), None);
        let ending = state.ending.expect("a full board ends the game");
        assert_eq!(ending.reason, EndReason::BoardFull);
        assert_eq!(ending.score, 1);
    }

    #[test]
    fn test_wall_ends_game() {
        let mut app = test_app();
        set_board(
            &mut app,
            Board::from_parts(
                [Position::new(19, 4), Position::new(18, 4)],
                Direction::Right,
                Position::new(5, 5),
                20,
                20,
            ),
        );
        app.world_mut().resource_mut::<GameState>().score = 3;

        tick(&mut app);

        let state = app.world().resource::<GameState>();
        assert_eq!(state.phase, GamePhase::GameOver);
        let ending = state.ending.expect("game should have ended");
        assert_eq!(ending.reason, EndReason::Wall);
        assert_eq!(ending.score, 3);
        assert_eq!(state.board.head(), Position::new(19, 4));

        // Nothing moves after the game is over
        tick(&mut app);
        assert_eq!(head(&app), Position::new(19, 4));
    }

    #[test]
    fn test_long_frame_catches_up() {
        let mut app = test_app();
        advance(&mut app, Duration::from_millis(300));
        assert_eq!(head(&app), Position::new(13, 10));
    }

    #[test]
    fn test_segment_entities_follow_board() {
        let mut app = test_app();
        set_board(
            &mut app,
            Board::from_parts(
                [Position::new(10, 10), Position::new(9, 10)],
                Direction::Right,
                Position::new(11, 10),
                20,
                20,
            ),
        );

        app.world_mut().write_message(SessionStarted);
        advance(&mut app, Duration::ZERO);
        assert_entities_follow_board(&app);
        let head_entity = app.world().resource::<SnakeEntities>().0[0];
        assert!(app.world().get::<SnakeHead>(head_entity).is_some());
        assert_eq!(growing_count(&mut app), 0);

        // Eating adds exactly one growing segment at the tail
        tick(&mut app);
        assert_entities_follow_board(&app);
        assert_eq!(app.world().resource::<SnakeEntities>().0.len(), 3);
        assert_eq!(growing_count(&mut app), 1);
        assert_eq!(
            app.world()
                .get::<PreviousPosition>(head_entity)
                .map(|previous| previous.pos),
            Some(Position::new(10, 10))
        );

        // Same body with the food out of the way, so the next tick is a plain move
        set_board(
            &mut app,
            Board::from_parts(
                [Position::new(11, 10), Position::new(10, 10), Position::new(9, 10)],
                Direction::Right,
                Position::new(1, 1),
                20,
                20,
            ),
        );
        press(&mut app, KeyCode::ArrowDown);
        tick(&mut app);
        assert_entities_follow_board(&app);
        assert_eq!(head(&app), Position::new(11, 11));
        assert_eq!(growing_count(&mut app), 1);
        assert_eq!(
            app.world()
                .get::<SnakeHead>(head_entity)
                .map(|head| head.direction),
            Some(Direction::Down)
        );
    }

    #[test]
    fn test_restart_replaces_segment_entities() {
        let mut app = test_app();
        app.world_mut().write_message(SessionStarted);
        advance(&mut app, Duration::ZERO);
        let first = app.world().resource::<SnakeEntities>().0.clone();

        app.world_mut().write_message(SessionStarted);
        advance(&mut app, Duration::ZERO);

        for entity in first {
            assert!(app.world().get_entity(entity).is_err());
        }
        assert_entities_follow_board(&app);
    }

    #[test]
    fn test_seeded_rng_is_deterministic() {
        let settings = GameSettings::default();
        let mut a = Board::from_parts(
            [Position::new(3, 3), Position::new(2, 3)],
            Direction::Right,
            Position::new(4, 3),
            settings.width,
            settings.height,
        );
        let mut b = a.clone();

        a.step(&mut StdRng::seed_from_u64(9));
        b.step(&mut StdRng::seed_from_u64(9));
        assert_eq!(a.food(), b.food());
    }
}
