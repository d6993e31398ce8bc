//! Rendering module
//!
//! Everything up to the display list is pure: textures are rasterised on the
//! CPU from settings and every frame is described as a `Vec<DrawOp>`. Only
//! the canvas backend touches the browser.

pub mod scene;
pub mod shapes;
pub mod texture;
pub mod vertex;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
pub use scene::build_scene;
pub use shapes::brick_visual;
pub use texture::{RasterDescriptor, TextureCache, ball_texture, paddle_texture};
pub use vertex::Rgba;

use glam::Vec2;

use crate::platform::Rect;

/// Generated textures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKind {
    Ball,
    Paddle,
}

/// Horizontal anchor of a text op
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    /// `pos` is the top-left corner
    TopLeft,
    /// `pos` is the centre
    Center,
}

/// One drawing command, in order
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Fill the whole canvas
    Clear { color: u32 },
    FillRect { rect: Rect, color: u32, alpha: f32 },
    /// Texture drawn centred on `center`
    Image {
        texture: TextureKind,
        center: Vec2,
        size: Vec2,
    },
    Text {
        text: String,
        pos: Vec2,
        size_px: f32,
        color: u32,
        bold: bool,
        align: TextAlign,
    },
}
