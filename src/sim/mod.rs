//! Deterministic simulation module
//!
//! All gameplay rules live here. This module must stay platform free:
//! - Session state changes only through `reduce`
//! - Delays are `Timers` advanced by the caller
//! - Stable iteration order (by brick ID)
//! - No rendering or browser dependencies

pub mod arcade;
pub mod collision;
pub mod reduce;
pub mod state;
pub mod timer;

pub use arcade::ArcadeWorld;
pub use collision::{CollisionResult, ball_bound_collision, ball_rect_collision, reflect_velocity};
pub use reduce::{
    Effect, GameEvent, Message, brick_points, effective_paddle_width, launch_velocity, reduce,
    rescale_velocity,
};
pub use state::{Brick, BrickId, GamePhase, Resume, Session};
pub use timer::{TimerKind, Timers};
