//! Ball Drop - click-to-spawn 2D ball physics
//!
//! Core modules:
//! - `sim`: Deterministic simulation (integration, wall and ball collisions)
//! - `settings`: Initialization-time constants and variant presets
//! - `renderer`: Draw sink seam and circle tessellation
//! - `platform`: Click edge detection and fixed-step frame timing
//! - `persistence`: Versioned JSON snapshots of a world

pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{Preset, SimSettings};
pub use sim::{Ball, SpawnRequest, TickInput, World, tick};

/// Simulation configuration constants
pub mod consts {
    /// Fixed simulation timestep (matches the 160 FPS frame target)
    pub const SIM_DT: f32 = 1.0 / 160.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the stepper will account for (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// World dimensions (pixels)
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 450.0;

    /// Gravity constant and the pixel scale applied to it
    pub const GRAVITY: f32 = 9.8;
    pub const GRAVITY_MULTIPLIER: f32 = 100.0;

    /// Vertical velocity kept after a floor bounce (sign flipped)
    pub const BOUNCE_FRICTION: f32 = 0.7;
    /// Speed/distance below which a ball is snapped to rest on the floor
    pub const REST_THRESHOLD: f32 = 55.0;

    /// Mass sampling range (mass-aware presets)
    pub const MIN_BALL_MASS: f32 = 1.0;
    pub const MAX_BALL_MASS: f32 = 5.0;
    /// Radius per sqrt(mass)
    pub const RADIUS_PER_SQRT_MASS: f32 = 10.0;

    /// Radius sampling range (non-mass presets)
    pub const MIN_BALL_SIZE: f32 = 5.0;
    pub const MAX_BALL_SIZE: f32 = 25.0;

    /// Spawn velocity sampling range, per component, before scaling
    pub const MIN_BALL_VEL: f32 = 1.0;
    pub const MAX_BALL_VEL: f32 = 5.0;
    pub const VELOCITY_SCALE: f32 = 100.0;

    /// Horizontal damping per step when rolling (velocity-damped preset)
    pub const GROUND_FRICTION: f32 = 0.99;
}

/// Radius of a ball of the given mass
#[inline]
pub fn radius_for_mass(mass: f32) -> f32 {
    mass.sqrt() * consts::RADIUS_PER_SQRT_MASS
}

/// Sample `min + u * (max + 1 - min)` for `u` in `[0, 1)`.
///
/// The range is widened by one on the top end, so `max` itself is reachable
/// and slightly exceeded.
#[inline]
pub fn sample_widened(min: f32, max: f32, u: f32) -> f32 {
    min + u * (max + 1.0 - min)
}
