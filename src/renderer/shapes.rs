//! Display-list generation for 2D primitives

use glam::Vec2;

use super::{DrawOp, TextAlign, TextureKind};
use crate::consts::*;
use crate::layout::BrickSpec;
use crate::platform::Rect;

const WHITE: u32 = 0xFFFFFF;
const BLACK: u32 = 0x000000;
const BRICK_LABEL_PX: f32 = 13.0;

#[inline]
fn fill(x: f32, y: f32, width: f32, height: f32, color: u32, alpha: f32) -> DrawOp {
    DrawOp::FillRect {
        rect: Rect::new(x, y, width, height),
        color,
        alpha,
    }
}

/// Bevelled brick with its word centred on it
pub fn brick_visual(spec: &BrickSpec) -> Vec<DrawOp> {
    let BrickSpec {
        x,
        y,
        width: w,
        height: h,
        ..
    } = *spec;

    vec![
        // Base fill
        fill(x, y, w, h, spec.color, 1.0),
        // Top highlight
        fill(x, y, w, 1.0, WHITE, 0.4),
        // Left highlight
        fill(x, y, 1.0, h, WHITE, 0.2),
        // Bottom shade
        fill(x, y + h - 2.0, w, 2.0, BLACK, 0.4),
        // Right shade
        fill(x + w - 2.0, y, 2.0, h, BLACK, 0.4),
        // Inner depth
        fill(x + 2.0, y + 2.0, (w - 4.0).max(0.0), (h - 4.0).max(0.0), BLACK, 0.1),
        DrawOp::Text {
            text: spec.text.clone(),
            pos: Vec2::new(x + w / 2.0, y + h / 2.0),
            size_px: BRICK_LABEL_PX,
            color: WHITE,
            bold: true,
            align: TextAlign::Center,
        },
    ]
}

/// Ball sprite
pub fn ball(center: Vec2) -> DrawOp {
    DrawOp::Image {
        texture: TextureKind::Ball,
        center,
        size: Vec2::splat(BALL_SIZE),
    }
}

/// Paddle sprite
pub fn paddle(rect: &Rect) -> DrawOp {
    DrawOp::Image {
        texture: TextureKind::Paddle,
        center: rect.center(),
        size: Vec2::new(rect.width, rect.height),
    }
}

/// Text op
pub fn text(
    text: impl Into<String>,
    pos: Vec2,
    size_px: f32,
    color: u32,
    align: TextAlign,
) -> DrawOp {
    DrawOp::Text {
        text: text.into(),
        pos,
        size_px,
        color,
        bold: false,
        align,
    }
}
