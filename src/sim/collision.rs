//! Collision detection and response for the ball
//!
//! The ball is a circle; everything it hits (bricks, paddle, play-area
//! edges) is an axis-aligned rectangle or a half-plane.

use glam::Vec2;

use crate::platform::{Bound, Rect};

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Collision point (if hit)
    pub point: Vec2,
    /// Surface normal at collision (pointing toward ball center, for reflection)
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check collision between a ball and a rectangle
///
/// When the centre is outside the rectangle the normal points from the
/// closest point to the centre. When the centre has tunnelled inside, the
/// ball is pushed out through the nearest face.
pub fn ball_rect_collision(ball_pos: Vec2, ball_radius: f32, rect: &Rect) -> CollisionResult {
    let closest = rect.closest_point(ball_pos);
    let delta = ball_pos - closest;
    let dist_sq = delta.length_squared();

    if dist_sq > ball_radius * ball_radius {
        return CollisionResult::miss();
    }

    if dist_sq > f32::EPSILON {
        let dist = dist_sq.sqrt();
        return CollisionResult {
            hit: true,
            point: closest,
            normal: delta / dist,
            penetration: ball_radius - dist,
        };
    }

    // Centre inside the rectangle
    let faces = [
        (ball_pos.x - rect.x, Vec2::NEG_X),
        (rect.right() - ball_pos.x, Vec2::X),
        (ball_pos.y - rect.y, Vec2::NEG_Y),
        (rect.bottom() - ball_pos.y, Vec2::Y),
    ];
    let (depth, normal) = faces
        .into_iter()
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .unwrap_or((0.0, Vec2::NEG_Y));

    CollisionResult {
        hit: true,
        point: ball_pos + normal * depth,
        normal,
        penetration: depth + ball_radius,
    }
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Check a ball against one edge of a `width × height` play area
///
/// The normal points back into the play area.
pub fn ball_bound_collision(
    ball_pos: Vec2,
    ball_radius: f32,
    width: f32,
    height: f32,
    side: Bound,
) -> CollisionResult {
    let (depth, normal, point) = match side {
        Bound::Left => (
            ball_radius - ball_pos.x,
            Vec2::X,
            Vec2::new(0.0, ball_pos.y),
        ),
        Bound::Right => (
            ball_pos.x + ball_radius - width,
            Vec2::NEG_X,
            Vec2::new(width, ball_pos.y),
        ),
        Bound::Top => (
            ball_radius - ball_pos.y,
            Vec2::Y,
            Vec2::new(ball_pos.x, 0.0),
        ),
        Bound::Bottom => (
            ball_pos.y + ball_radius - height,
            Vec2::NEG_Y,
            Vec2::new(ball_pos.x, height),
        ),
    };

    if depth < 0.0 {
        return CollisionResult::miss();
    }

    CollisionResult {
        hit: true,
        point,
        normal,
        penetration: depth,
    }
}
