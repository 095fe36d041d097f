//! Game resources (singleton state).

use bevy::prelude::*;
use rand::{SeedableRng, rngs::StdRng};
use std::fmt;
use std::time::Duration;

use super::{Board, Collision, Direction, GameSettings};

/// Game phase enum to track which state the game is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    #[default]
    Menu,
    Playing,
    GameOver,
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    Wall,
    SelfCollision,
    /// No free cell left for food
    BoardFull,
    /// The finale delay ran out after reaching the finale score
    Finale,
}

impl From<Collision> for EndReason {
    fn from(collision: Collision) -> Self {
        match collision {
            Collision::Wall => EndReason::Wall,
            Collision::SelfCollision => EndReason::SelfCollision,
        }
    }
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EndReason::Wall => "hit the wall",
            EndReason::SelfCollision => "ran into itself",
            EndReason::BoardFull => "filled the board",
            EndReason::Finale => "finale",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameEnding {
    pub reason: EndReason,
    pub score: u32,
}

/// Main game state resource.
#[derive(Resource, Debug)]
pub struct GameState {
    pub board: Board,
    pub score: u32,
    pub phase: GamePhase,
    /// Ticks since the session started
    pub ticks: u64,
    pub ending: Option<GameEnding>,
}

impl GameState {
    pub fn new(settings: &GameSettings) -> Self {
        GameState {
            board: Board::new(settings),
            score: 0,
            phase: GamePhase::Menu,
            ticks: 0,
            ending: None,
        }
    }

    /// Put a fresh board in place and start playing.
    pub fn restart(&mut self, settings: &GameSettings) {
        self.board = Board::new(settings);
        self.score = 0;
        self.ticks = 0;
        self.ending = None;
        self.phase = GamePhase::Playing;
    }

    /// Stop the session. Only the first ending counts.
    pub fn end(&mut self, reason: EndReason) -> Option<GameEnding> {
        if self.phase != GamePhase::Playing {
            return None;
        }
        let ending = GameEnding {
            reason,
            score: self.score,
        };
        self.phase = GamePhase::GameOver;
        self.ending = Some(ending);
        Some(ending)
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }
}

impl FromWorld for GameState {
    fn from_world(world: &mut World) -> Self {
        let settings = world.get_resource::<GameSettings>().cloned().unwrap_or_default();
        GameState::new(&settings)
    }
}

/// Input buffer to queue direction changes.
#[derive(Resource, Default, Debug)]
pub struct InputBuffer {
    queued_directions: Vec<Direction>,
}

impl InputBuffer {
    /// Queue a direction change (max 2 buffered inputs).
    pub fn queue_direction(&mut self, direction: Direction) {
        if self.queued_directions.len() < 2 {
            self.queued_directions.push(direction);
        }
    }

    /// Queue `direction` unless it repeats or reverses the heading the snake
    /// will have once the queue drains.
    pub fn request(&mut self, direction: Direction, current: Direction) -> bool {
        let last = self.last_direction().unwrap_or(current);
        if direction == last || direction == last.opposite() || self.queued_directions.len() >= 2
        {
            return false;
        }
        self.queue_direction(direction);
        true
    }

    /// Pop the next queued direction.
    pub fn pop_direction(&mut self) -> Option<Direction> {
        if !self.queued_directions.is_empty() {
            Some(self.queued_directions.remove(0))
        } else {
            None
        }
    }

    /// Get the last queued direction without removing it.
    pub fn last_direction(&self) -> Option<Direction> {
        self.queued_directions.last().copied()
    }

    /// Clear all queued directions.
    pub fn clear(&mut self) {
        self.queued_directions.clear();
    }
}

/// Drives movement ticks. Its fraction also drives interpolation.
#[derive(Resource, Debug)]
pub struct TickTimer(pub Timer);

impl TickTimer {
    pub fn new(settings: &GameSettings) -> Self {
        TickTimer(Timer::new(settings.tick_interval, TimerMode::Repeating))
    }

    /// Progress through the current tick, from 0.0 to 1.0.
    pub fn progress(&self) -> f32 {
        self.0.fraction()
    }
}

impl FromWorld for TickTimer {
    fn from_world(world: &mut World) -> Self {
        let settings = world.get_resource::<GameSettings>().cloned().unwrap_or_default();
        TickTimer::new(&settings)
    }
}

/// Source of randomness for food placement.
#[derive(Resource)]
pub struct GameRng(pub StdRng);

impl FromWorld for GameRng {
    fn from_world(world: &mut World) -> Self {
        let seed = world.get_resource::<GameSettings>().and_then(|s| s.seed);
        match seed {
            Some(seed) => GameRng(StdRng::seed_from_u64(seed)),
            None => GameRng(StdRng::from_os_rng()),
        }
    }
}

/// Resource for camera shake effect.
#[derive(Resource)]
pub struct CameraShake {
    pub timer: Timer,
    pub intensity: f32,
}

impl Default for CameraShake {
    fn default() -> Self {
        CameraShake {
            timer: Timer::from_seconds(0.0, TimerMode::Once),
            intensity: 0.0,
        }
    }
}

impl CameraShake {
    /// Start a shake that fades out over `duration`.
    pub fn start(&mut self, duration: Duration, intensity: f32) {
        self.timer = Timer::new(duration, TimerMode::Once);
        self.intensity = intensity;
    }

    pub fn is_active(&self) -> bool {
        !self.timer.is_finished()
    }
}
