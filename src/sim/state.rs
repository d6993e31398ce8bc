//! Session state and runtime brick entities
//!
//! Everything one game instance knows about itself lives in `Session`. The
//! reducer is the only writer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::Viewport;
use crate::consts::*;
use crate::layout::BrickSpec;

/// Stable handle linking a brick to its physics body
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BrickId(pub u32);

/// A brick still in play
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Brick {
    pub id: BrickId,
    pub spec: BrickSpec,
}

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the layout
    Loading,
    /// Counting down before the first launch
    Countdown,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Every brick destroyed
    Won,
    /// Out of lives
    GameOver,
}

impl GamePhase {
    /// No further gameplay happens in these phases
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::Won | GamePhase::GameOver)
    }
}

/// What a pause interrupted, so resuming can pick it back up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resume {
    /// Restart the countdown from its last shown value
    Countdown,
    /// Re-arm the relaunch delay
    Relaunch,
    /// Ball was in flight
    Playing,
}

/// One game instance
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub lives: u32,
    pub score: u64,
    pub high_score: u64,
    /// True everywhere except `Playing`
    pub paused: bool,
    pub total_rows: u32,
    /// Set once a layout has produced bricks
    pub bricks_created: bool,
    /// Bricks instantiated from the layout
    pub bricks_spawned: u32,
    /// Last countdown value shown
    pub countdown: u32,
    /// Set exactly once, on Won or GameOver
    pub game_ended: bool,
    pub phase: GamePhase,
    /// Pause interrupted a countdown or relaunch
    pub resume_to: Option<Resume>,
    /// Ball is parked at the spawn point waiting for `RelaunchDue`
    pub relaunch_pending: bool,
    /// Paddle centre x
    pub paddle_x: f32,
    pub viewport: Viewport,
    /// Bricks in play, ordered by id
    pub bricks: BTreeMap<BrickId, Brick>,
    next_id: u32,
}

impl Session {
    pub fn new(viewport: Viewport, high_score: u64) -> Self {
        Self {
            lives: INITIAL_LIVES,
            score: 0,
            high_score,
            paused: true,
            total_rows: 0,
            bricks_created: false,
            bricks_spawned: 0,
            countdown: COUNTDOWN_START,
            game_ended: false,
            phase: GamePhase::Loading,
            resume_to: None,
            relaunch_pending: false,
            paddle_x: viewport.width / 2.0,
            viewport,
            bricks: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Allocate a new brick ID
    pub fn next_brick_id(&mut self) -> BrickId {
        let id = BrickId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Remaining bricks
    pub fn remaining(&self) -> usize {
        self.bricks.len()
    }

    /// Ball spawn point
    pub fn ball_spawn(&self) -> glam::Vec2 {
        glam::Vec2::new(
            self.viewport.width / 2.0,
            self.viewport.height - BALL_SPAWN_BOTTOM_OFFSET,
        )
    }

    /// Paddle centre y
    pub fn paddle_y(&self) -> f32 {
        self.viewport.height - PADDLE_BOTTOM_OFFSET
    }

    /// Clamp a paddle centre so the paddle stays inside the viewport
    pub fn clamp_paddle_x(&self, x: f32, paddle_width: f32) -> f32 {
        let half = paddle_width / 2.0;
        let max = (self.viewport.width - half).max(half);
        x.clamp(half, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_defaults() {
        let session = Session::new(Viewport::new(800.0, 600.0), 42);
        assert_eq!(session.lives, 5);
        assert_eq!(session.score, 0);
        assert_eq!(session.high_score, 42);
        assert_eq!(session.phase, GamePhase::Loading);
        assert!(session.paused);
        assert!(!session.bricks_created);
        assert_eq!(session.paddle_x, 400.0);
    }

    #[test]
    fn test_brick_ids_are_unique() {
        let mut session = Session::new(Viewport::new(800.0, 600.0), 0);
        let a = session.next_brick_id();
        let b = session.next_brick_id();
        assert_ne!(a, b);
        assert!(a < b);
    }

    #[test]
    fn test_clamp_paddle_x() {
        let session = Session::new(Viewport::new(800.0, 600.0), 0);
        assert_eq!(session.clamp_paddle_x(-10.0, 100.0), 50.0);
        assert_eq!(session.clamp_paddle_x(900.0, 100.0), 750.0);
        assert_eq!(session.clamp_paddle_x(300.0, 100.0), 300.0);
    }

    #[test]
    fn test_spawn_and_paddle_positions() {
        let session = Session::new(Viewport::new(800.0, 600.0), 0);
        assert_eq!(session.ball_spawn(), glam::Vec2::new(400.0, 520.0));
        assert_eq!(session.paddle_y(), 545.0);
    }
}
