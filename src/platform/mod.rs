//! Platform abstraction layer
//!
//! Narrow capability traits the driver talks to, so the layout engine and the
//! state machine never touch a browser API:
//! - `PhysicsWorld`: bodies, velocities and contact reporting
//! - `Renderer`: draws a frame's display list
//! - `AudioSink`: sound cues
//! - `InputSource`: queued pointer/key actions
//! - `KeyValueStore`: string persistence slots (LocalStorage on web)

pub mod input;
pub mod storage;

pub use input::{InputAction, InputQueue};
pub use storage::MemoryStore;

use glam::Vec2;

use crate::audio::SoundEffect;
use crate::error::StorageError;
use crate::layout::BrickSpec;
use crate::renderer::{DrawOp, TextureCache};
use crate::sim::BrickId;
use crate::Viewport;

/// Axis-aligned rectangle (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle of the given size centred on `center`
    pub fn centered(center: Vec2, width: f32, height: f32) -> Self {
        Self::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Closest point of the rectangle to `p`
    #[inline]
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x.clamp(self.x, self.right()), p.y.clamp(self.y, self.bottom()))
    }
}

/// Edge of the play area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Left,
    Right,
    Top,
    Bottom,
}

/// Dynamic body that touched a world bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Body {
    Ball,
    Paddle,
}

/// Contact reported by a physics step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    PaddleHit,
    BrickHit(BrickId),
    WorldBound { side: Bound, body: Body },
}

/// Arcade physics with one ball, one paddle and static bricks
pub trait PhysicsWorld {
    /// Create a static collidable rectangle for a brick
    fn add_brick(&mut self, id: BrickId, spec: &BrickSpec);
    fn remove_brick(&mut self, id: BrickId);
    /// Bricks still collidable
    fn active_bricks(&self) -> usize;

    /// `None` once the ball has been destroyed
    fn ball_position(&self) -> Option<Vec2>;
    fn ball_velocity(&self) -> Option<Vec2>;
    fn set_ball_velocity(&mut self, velocity: Vec2);
    /// Back to the spawn point, at rest
    fn reset_ball(&mut self);
    fn destroy_ball(&mut self);

    fn paddle(&self) -> Rect;
    fn set_paddle(&mut self, center_x: f32, width: f32);

    fn set_paused(&mut self, paused: bool);
    fn resize(&mut self, viewport: Viewport);

    /// Advance by `dt` seconds and report what happened
    fn step(&mut self, dt: f32) -> Vec<Contact>;
}

/// Draws a frame
pub trait Renderer {
    fn present(&mut self, ops: &[DrawOp], textures: &TextureCache);
}

/// Plays sound cues
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);
    fn set_muted(&mut self, muted: bool);
}

/// Source of player actions collected between frames
pub trait InputSource {
    fn drain(&mut self) -> Vec<InputAction>;
}

/// String key-value persistence
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}
