//! Résumé Breaker - a brick-breaker whose level is a résumé
//!
//! Core modules:
//! - `layout`: Deterministic text-to-brick layout (wrap, bucket, justify)
//! - `sim`: Session state machine, timers and the arcade physics adapter
//! - `game`: Driver that applies reducer effects to the capability traits
//! - `renderer`: Pure texture/brick visuals and the canvas backend
//! - `platform`: Capability traits (physics, renderer, audio, input, storage)
//! - `ingest`: Document blocks and `resume.json` parsing

pub mod audio;
pub mod error;
pub mod game;
pub mod highscores;
pub mod hud;
pub mod ingest;
pub mod layout;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{LoadError, StorageError};
pub use game::Game;
pub use highscores::HighScore;
pub use layout::{BrickSpec, Layout, LayoutParams, TextElement, compute_layout};
pub use settings::{Settings, Theme};

use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    pub const INITIAL_LIVES: u32 = 5;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 100.0;
    pub const PADDLE_HEIGHT: f32 = 20.0;
    pub const MIN_PADDLE_WIDTH: f32 = 40.0;
    /// Paddle centre sits this far above the bottom edge
    pub const PADDLE_BOTTOM_OFFSET: f32 = 55.0;

    /// Ball defaults
    pub const BALL_SIZE: f32 = 20.0;
    pub const BALL_RADIUS: f32 = 10.0;
    pub const BALL_INITIAL_VELOCITY: (f32, f32) = (200.0, -200.0);
    /// Magnitude used when rescaling a moving ball to a new speed setting
    pub const BALL_BASE_SPEED: f32 = 200.0;
    pub const BALL_SPAWN_BOTTOM_OFFSET: f32 = 80.0;
    pub const MIN_BALL_SPEED: f32 = 0.5;
    pub const MAX_BALL_SPEED: f32 = 2.0;

    /// Brick grid
    pub const BRICK_HEIGHT: f32 = 24.0;
    pub const BRICK_PADDING: f32 = 4.0;
    pub const BASE_BRICK_WIDTH: f32 = 10.0;
    /// Fixed width added to every brick on top of the per-character width
    pub const BRICK_TEXT_PADDING: f32 = 10.0;
    pub const MARGIN_TOP: f32 = 10.0;
    pub const MARGIN_LEFT: f32 = 10.0;
    pub const MARGIN_RIGHT: f32 = 10.0;
    /// Bricks never extend below this fraction of the viewport height
    pub const MAX_BRICK_HEIGHT_RATIO: f32 = 0.75;
    pub const POINTS_PER_ROW: u64 = 10;

    /// Timers (milliseconds)
    pub const COUNTDOWN_START: u32 = 3;
    pub const COUNTDOWN_INTERVAL_MS: u32 = 1000;
    pub const RELAUNCH_DELAY_MS: u32 = 1000;

    /// Colors (0xRRGGBB)
    pub const PADDLE_COLOR: u32 = 0xA9A9A9;
    pub const BALL_COLOR: u32 = 0xA9A9A9;
    pub const GAME_OVER_COLOR: u32 = 0xFF0000;
    pub const BRICK_COLORS: [u32; 4] = [0xf44336, 0xffc107, 0x4caf50, 0x2196f3];
}

/// Size of the play area in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Convert a 0xRRGGBB color to a CSS string (`#rrggbb`)
pub fn hex_to_css(color: u32) -> String {
    format!("#{:06x}", color & 0xFF_FFFF)
}

/// Parse a CSS `#rrggbb` color into 0xRRGGBB
pub fn parse_hex_color(css: &str) -> Option<u32> {
    let hex = css.trim().strip_prefix('#').unwrap_or(css.trim());
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}

/// Split 0xRRGGBB into its channels
#[inline]
pub fn rgb_channels(color: u32) -> [u8; 3] {
    [(color >> 16) as u8, (color >> 8) as u8, color as u8]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_to_css_pads() {
        assert_eq!(hex_to_css(0xf44336), "#f44336");
        assert_eq!(hex_to_css(0x0000ff), "#0000ff");
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#a9a9a9"), Some(0xA9A9A9));
        assert_eq!(parse_hex_color("ff0000"), Some(0xFF0000));
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
    }

    #[test]
    fn test_rgb_channels() {
        assert_eq!(rgb_channels(0x4caf50), [0x4c, 0xaf, 0x50]);
    }
}
