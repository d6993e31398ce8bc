//! Frame display list

use super::{DrawOp, shapes};
use crate::hud::{Hud, hud_ops};
use crate::platform::PhysicsWorld;
use crate::settings::Settings;
use crate::sim::Session;

/// Everything visible this frame, back to front
pub fn build_scene(
    session: &Session,
    hud: &Hud,
    world: &impl PhysicsWorld,
    settings: &Settings,
) -> Vec<DrawOp> {
    let colors = settings.theme.colors();
    let mut ops = vec![DrawOp::Clear {
        color: colors.background,
    }];

    for brick in session.bricks.values() {
        ops.extend(shapes::brick_visual(&brick.spec));
    }

    ops.push(shapes::paddle(&world.paddle()));

    if let Some(pos) = world.ball_position() {
        ops.push(shapes::ball(pos));
    }

    ops.extend(hud_ops(hud, session, &colors));
    ops
}
