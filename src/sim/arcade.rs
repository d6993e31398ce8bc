//! Minimal arcade physics
//!
//! One dynamic ball, one immovable paddle and static brick rectangles inside
//! a walled play area. Deterministic, so whole games can run headless.

use std::collections::BTreeMap;

use glam::Vec2;

use super::collision::{ball_bound_collision, ball_rect_collision, reflect_velocity};
use super::state::BrickId;
use crate::Viewport;
use crate::consts::*;
use crate::layout::BrickSpec;
use crate::platform::{Body, Bound, Contact, PhysicsWorld, Rect};

#[derive(Debug, Clone, Copy, PartialEq)]
struct BallBody {
    pos: Vec2,
    vel: Vec2,
}

/// `PhysicsWorld` backed by simple circle-vs-rectangle tests
#[derive(Debug, Clone)]
pub struct ArcadeWorld {
    viewport: Viewport,
    bricks: BTreeMap<BrickId, Rect>,
    ball: Option<BallBody>,
    paddle_x: f32,
    paddle_width: f32,
    paused: bool,
}

impl ArcadeWorld {
    pub fn new(viewport: Viewport) -> Self {
        let mut world = Self {
            viewport,
            bricks: BTreeMap::new(),
            ball: None,
            paddle_x: viewport.width / 2.0,
            paddle_width: PADDLE_WIDTH,
            paused: false,
        };
        world.reset_ball();
        world
    }

    fn spawn_point(&self) -> Vec2 {
        Vec2::new(
            self.viewport.width / 2.0,
            self.viewport.height - BALL_SPAWN_BOTTOM_OFFSET,
        )
    }

    /// Place the ball directly (tests and replays)
    pub fn place_ball(&mut self, pos: Vec2, vel: Vec2) {
        self.ball = Some(BallBody { pos, vel });
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Rectangle of a live brick
    pub fn brick_rect(&self, id: BrickId) -> Option<Rect> {
        self.bricks.get(&id).copied()
    }

    fn resolve_walls(&self, ball: &mut BallBody, contacts: &mut Vec<Contact>) {
        let Viewport { width, height } = self.viewport;
        for side in [Bound::Left, Bound::Right, Bound::Top, Bound::Bottom] {
            let result = ball_bound_collision(ball.pos, BALL_RADIUS, width, height, side);
            if !result.hit {
                continue;
            }
            ball.pos += result.normal * result.penetration;
            if ball.vel.dot(result.normal) < 0.0 {
                ball.vel = reflect_velocity(ball.vel, result.normal);
            }
            contacts.push(Contact::WorldBound {
                side,
                body: Body::Ball,
            });
        }
    }

    fn resolve_paddle(&self, ball: &mut BallBody, contacts: &mut Vec<Contact>) {
        let result = ball_rect_collision(ball.pos, BALL_RADIUS, &self.paddle());
        if !result.hit {
            return;
        }
        ball.pos += result.normal * result.penetration;
        if ball.vel.dot(result.normal) < 0.0 {
            ball.vel = reflect_velocity(ball.vel, result.normal);
        }
        contacts.push(Contact::PaddleHit);
    }

    fn resolve_bricks(&self, ball: &mut BallBody, contacts: &mut Vec<Contact>) {
        let mut deepest: Option<(f32, Vec2)> = None;

        for (id, rect) in &self.bricks {
            let result = ball_rect_collision(ball.pos, BALL_RADIUS, rect);
            if !result.hit {
                continue;
            }
            contacts.push(Contact::BrickHit(*id));
            if deepest.is_none_or(|(depth, _)| result.penetration > depth) {
                deepest = Some((result.penetration, result.normal));
            }
        }

        // One bounce per step, off the deepest overlap
        if let Some((depth, normal)) = deepest {
            ball.pos += normal * depth;
            if ball.vel.dot(normal) < 0.0 {
                ball.vel = reflect_velocity(ball.vel, normal);
            }
        }
    }
}

impl PhysicsWorld for ArcadeWorld {
    fn add_brick(&mut self, id: BrickId, spec: &BrickSpec) {
        self.bricks
            .insert(id, Rect::new(spec.x, spec.y, spec.width, spec.height));
    }

    fn remove_brick(&mut self, id: BrickId) {
        self.bricks.remove(&id);
    }

    fn active_bricks(&self) -> usize {
        self.bricks.len()
    }

    fn ball_position(&self) -> Option<Vec2> {
        self.ball.map(|b| b.pos)
    }

    fn ball_velocity(&self) -> Option<Vec2> {
        self.ball.map(|b| b.vel)
    }

    fn set_ball_velocity(&mut self, velocity: Vec2) {
        if let Some(ball) = &mut self.ball {
            ball.vel = velocity;
        }
    }

    fn reset_ball(&mut self) {
        self.ball = Some(BallBody {
            pos: self.spawn_point(),
            vel: Vec2::ZERO,
        });
    }

    fn destroy_ball(&mut self) {
        self.ball = None;
    }

    fn paddle(&self) -> Rect {
        Rect::centered(
            Vec2::new(
                self.paddle_x,
                self.viewport.height - PADDLE_BOTTOM_OFFSET,
            ),
            self.paddle_width,
            PADDLE_HEIGHT,
        )
    }

    fn set_paddle(&mut self, center_x: f32, width: f32) {
        self.paddle_x = center_x;
        self.paddle_width = width;
    }

    fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if let Some(ball) = &mut self.ball {
            ball.pos.x = ball.pos.x.clamp(BALL_RADIUS, (viewport.width - BALL_RADIUS).max(BALL_RADIUS));
            ball.pos.y = ball.pos.y.clamp(BALL_RADIUS, (viewport.height - BALL_RADIUS).max(BALL_RADIUS));
        }
    }

    fn step(&mut self, dt: f32) -> Vec<Contact> {
        if self.paused {
            return Vec::new();
        }
        let Some(mut ball) = self.ball else {
            return Vec::new();
        };
        if ball.vel == Vec2::ZERO {
            return Vec::new();
        }

        let mut contacts = Vec::new();
        ball.pos += ball.vel * dt;

        self.resolve_bricks(&mut ball, &mut contacts);
        self.resolve_paddle(&mut ball, &mut contacts);
        self.resolve_walls(&mut ball, &mut contacts);

        self.ball = Some(ball);
        contacts
    }
}
