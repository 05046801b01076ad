//! Per-ball integration and floor handling
//!
//! Semi-implicit Euler: velocity is updated from acceleration first, then
//! position from the new velocity. The floor is at `height` (y grows down).

use super::state::Ball;
use crate::settings::{FallModel, SimSettings};

/// Advance a single ball by `dt` under the configured fall model
pub fn integrate_ball(ball: &mut Ball, settings: &SimSettings, dt: f32) {
    match settings.fall_model {
        FallModel::AccelerationDriven => {
            ball.vel += ball.acc * dt;
            ball.pos += ball.vel * dt;
        }
        FallModel::VelocityDamped => integrate_damped(ball, settings, dt),
        FallModel::PenetrationCorrection => integrate_penetration(ball, settings, dt),
    }
}

/// Clamp-and-reflect floor with rolling friction
fn integrate_damped(ball: &mut Ball, settings: &SimSettings, dt: f32) {
    ball.vel += ball.acc * dt;
    ball.pos += ball.vel * dt;

    let floor = settings.height - ball.radius;
    if ball.pos.y > floor {
        ball.pos.y = floor;
        ball.vel.y = -ball.vel.y * settings.floor_damping;
    }

    ball.vel.x *= settings.ground_friction;
}

/// Mirror floor overshoot back above the floor and snap slow balls to rest
fn integrate_penetration(ball: &mut Ball, settings: &SimSettings, dt: f32) {
    ball.vel.x += ball.acc.x * dt;
    ball.pos.x += ball.vel.x * dt;

    if ball.is_still {
        return;
    }

    let threshold = settings.height - ball.radius;
    ball.vel.y += ball.acc.y * dt;
    let new_y = ball.pos.y + ball.vel.y * dt;

    if new_y < threshold {
        ball.pos.y = new_y;
        return;
    }

    let penetration = new_y - threshold;
    ball.pos.y = threshold - penetration;

    let rest = settings.rest_threshold;
    if ball.vel.y.abs() < rest && (ball.pos.y - threshold).abs() < rest {
        ball.vel.y = 0.0;
        ball.pos.y = threshold;
        ball.is_still = true;
    } else {
        ball.vel.y *= -settings.bounce_friction;
    }
}
