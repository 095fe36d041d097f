//! Keyboard and swipe mapping onto the four headings.

use bevy::prelude::*;

use crate::game::Direction;

/// Arrow keys and WASD.
pub fn direction_for_key(key: KeyCode) -> Option<Direction> {
    match key {
        KeyCode::ArrowUp | KeyCode::KeyW => Some(Direction::Up),
        KeyCode::ArrowDown | KeyCode::KeyS => Some(Direction::Down),
        KeyCode::ArrowLeft | KeyCode::KeyA => Some(Direction::Left),
        KeyCode::ArrowRight | KeyCode::KeyD => Some(Direction::Right),
        _ => None,
    }
}

/// Maps a drag in screen space (y grows downward) to its dominant axis.
/// Ties go to the vertical axis.
pub fn swipe_direction(delta: Vec2) -> Option<Direction> {
    if delta == Vec2::ZERO {
        return None;
    }

    let direction = if delta.x.abs() > delta.y.abs() {
        if delta.x > 0.0 {
            Direction::Right
        } else {
            Direction::Left
        }
    } else if delta.y > 0.0 {
        Direction::Down
    } else {
        Direction::Up
    };
    Some(direction)
}

/// Follows one finger from touch-down until it has travelled far enough to
/// count as a swipe.
#[derive(Resource, Default, Debug)]
pub struct SwipeTracker {
    start: Option<(u64, Vec2)>,
}

impl SwipeTracker {
    pub fn begin(&mut self, id: u64, position: Vec2) {
        self.start = Some((id, position));
    }

    /// Report a swipe once touch `id` has moved at least `threshold` pixels.
    /// A reported swipe ends tracking until the next touch-down.
    pub fn track(&mut self, id: u64, position: Vec2, threshold: f32) -> Option<Direction> {
        let (start_id, start) = self.start?;
        if start_id != id {
            return None;
        }

        let delta = position - start;
        if delta.length() < threshold {
            return None;
        }
        self.start = None;
        swipe_direction(delta)
    }

    /// Forget touch `id` if it is the one being tracked.
    pub fn release(&mut self, id: u64) {
        if matches!(self.start, Some((start_id, _)) if start_id == id) {
            self.start = None;
        }
    }

    pub fn cancel(&mut self) {
        self.start = None;
    }

    pub fn is_tracking(&self) -> bool {
        self.start.is_some()
    }
}
