//! World snapshots
//!
//! Features:
//! - Versioned JSON envelope
//! - Settings and every ball re-validated on load
//! - RNG position restored, so spawns continue the same sequence

use serde::{Deserialize, Serialize};

use crate::settings::SettingsError;
use crate::sim::{Ball, World};

/// Current snapshot format version
pub const SNAPSHOT_VERSION: u32 = 1;

/// Reasons a snapshot cannot be written or restored
#[derive(Debug)]
pub enum SnapshotError {
    Json(serde_json::Error),
    UnsupportedVersion(u32),
    InvalidSettings(SettingsError),
    /// A ball is non-finite, has no size or mass, or lies outside the world
    InvalidBall { id: u32 },
}

impl std::fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(e) => write!(f, "snapshot JSON error: {e}"),
            Self::UnsupportedVersion(v) => {
                write!(
                    f,
                    "unsupported snapshot version {v} (expected {SNAPSHOT_VERSION})"
                )
            }
            Self::InvalidSettings(e) => write!(f, "snapshot settings rejected: {e}"),
            Self::InvalidBall { id } => write!(f, "snapshot ball {id} rejected"),
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            Self::InvalidSettings(e) => Some(e),
            Self::UnsupportedVersion(_) | Self::InvalidBall { .. } => None,
        }
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(err: serde_json::Error) -> Self {
        SnapshotError::Json(err)
    }
}

impl From<SettingsError> for SnapshotError {
    fn from(err: SettingsError) -> Self {
        SnapshotError::InvalidSettings(err)
    }
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    version: u32,
    world: &'a World,
}

#[derive(Deserialize)]
struct Snapshot {
    version: u32,
    world: World,
}

/// Serialize a world into a versioned JSON envelope
pub fn save_world(world: &World) -> Result<String, SnapshotError> {
    let json = serde_json::to_string(&SnapshotRef {
        version: SNAPSHOT_VERSION,
        world,
    })?;
    log::debug!(
        "Saved snapshot: {} balls, tick {}, {} bytes",
        world.balls.len(),
        world.time_ticks,
        json.len()
    );
    Ok(json)
}

/// Restore a world from a JSON envelope produced by `save_world`
pub fn load_world(json: &str) -> Result<World, SnapshotError> {
    let snapshot: Snapshot = serde_json::from_str(json)?;
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(SnapshotError::UnsupportedVersion(snapshot.version));
    }
    snapshot.world.settings.validate()?;

    let (width, height) = (snapshot.world.settings.width, snapshot.world.settings.height);
    if let Some(ball) = snapshot
        .world
        .balls
        .iter()
        .find(|ball| !ball_fits(ball, width, height))
    {
        return Err(SnapshotError::InvalidBall { id: ball.id });
    }

    log::debug!(
        "Loaded snapshot: {} balls, tick {}",
        snapshot.world.balls.len(),
        snapshot.world.time_ticks
    );
    Ok(snapshot.world)
}

/// Whether a restored ball is something `tick` could have produced
fn ball_fits(ball: &Ball, width: f32, height: f32) -> bool {
    let finite = ball.pos.is_finite() && ball.vel.is_finite() && ball.acc.is_finite();
    let r = ball.radius;
    finite
        && r > 0.0
        && ball.mass > 0.0
        && ball.mass.is_finite()
        && 2.0 * r <= width.min(height)
        && (r..=width - r).contains(&ball.pos.x)
        && (r..=height - r).contains(&ball.pos.y)
}
