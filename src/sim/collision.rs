//! Collision detection and response for balls in a rectangular world
//!
//! Two kinds of contact: a ball against the world edges (clamp and bounce)
//! and a ball against another ball (separate, then exchange an elastic
//! impulse along the impact normal).

use glam::Vec2;

use super::state::Ball;

/// Failure while resolving a ball pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionError {
    /// Centers coincide exactly, so there is no impact normal
    DegenerateGeometry { a: u32, b: u32 },
}

impl std::fmt::Display for CollisionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DegenerateGeometry { a, b } => {
                write!(f, "balls {a} and {b} share a center, no impact normal")
            }
        }
    }
}

impl std::error::Error for CollisionError {}

/// Which edges a ball touched during edge resolution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeHits {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub floor: bool,
}

impl EdgeHits {
    pub fn any(&self) -> bool {
        self.left || self.right || self.top || self.floor
    }
}

/// Keep a ball inside `[radius, extent - radius]` on both axes
///
/// A ball past an edge is clamped onto it and its velocity component is
/// turned to point back inside. Side walls and the ceiling are perfectly
/// elastic; the floor keeps `floor_restitution` of the vertical speed.
pub fn resolve_edges(
    ball: &mut Ball,
    width: f32,
    height: f32,
    floor_restitution: f32,
) -> EdgeHits {
    let mut hits = EdgeHits::default();
    let r = ball.radius;

    if ball.pos.x > width - r {
        ball.pos.x = width - r;
        ball.vel.x = -ball.vel.x.abs();
        hits.right = true;
    } else if ball.pos.x < r {
        ball.pos.x = r;
        ball.vel.x = ball.vel.x.abs();
        hits.left = true;
    }

    if ball.pos.y > height - r {
        ball.pos.y = height - r;
        ball.vel.y = -ball.vel.y.abs() * floor_restitution;
        hits.floor = true;
    } else if ball.pos.y < r {
        ball.pos.y = r;
        ball.vel.y = ball.vel.y.abs();
        hits.top = true;
    }

    hits
}

/// Check whether two balls overlap
#[inline]
pub fn balls_overlap(a: &Ball, b: &Ball) -> bool {
    a.pos.distance(b.pos) < a.radius + b.radius
}

/// Resolve a contact between two balls
///
/// Returns `Ok(false)` when they do not overlap. Otherwise both balls are
/// pushed apart by half the overlap each (not mass weighted), and an
/// equal-and-opposite elastic impulse is applied along the impact normal.
pub fn resolve_ball_pair(a: &mut Ball, b: &mut Ball) -> Result<bool, CollisionError> {
    if !balls_overlap(a, b) {
        return Ok(false);
    }

    let impact = b.pos - a.pos;
    let distance = impact.length();
    let min_dist = a.radius + b.radius;

    let normal = impact
        .try_normalize()
        .ok_or(CollisionError::DegenerateGeometry { a: a.id, b: b.id })?;

    // Separate: overlap is negative, so a moves back and b moves forward
    let overlap = distance - min_dist;
    let correction = normal * (overlap * 0.5);
    a.pos += correction;
    b.pos -= correction;

    // Impulse along the impact vector scaled to the corrected distance
    let distance = min_dist;
    let impact = normal * distance;
    apply_elastic_impulse(a, b, impact, distance);

    a.is_still = false;
    b.is_still = false;

    Ok(true)
}

/// Closed-form two-body elastic exchange along `impact` (length `distance`)
fn apply_elastic_impulse(a: &mut Ball, b: &mut Ball, impact: Vec2, distance: f32) {
    let mass_sum = a.mass + b.mass;
    let vel_diff = b.vel - a.vel;
    let num = vel_diff.dot(impact);
    let den = mass_sum * distance * distance;

    a.vel += impact * (2.0 * b.mass * num / den);
    b.vel -= impact * (2.0 * a.mass * num / den);
}

/// Mutable access to two distinct balls of a slice
pub fn pair_mut(balls: &mut [Ball], i: usize, j: usize) -> (&mut Ball, &mut Ball) {
    debug_assert_ne!(i, j);
    if i < j {
        let (head, tail) = balls.split_at_mut(j);
        (&mut head[i], &mut tail[0])
    } else {
        let (head, tail) = balls.split_at_mut(i);
        (&mut tail[0], &mut head[j])
    }
}
