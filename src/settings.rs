//! Simulation settings and variant presets
//!
//! Everything here is fixed at initialization; the simulation never reads
//! configuration at runtime.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// How gravity and the floor interact for a falling ball
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FallModel {
    /// Plain integration; the floor is just another wall
    #[default]
    AccelerationDriven,
    /// Clamp to the floor and reflect with damping, rolling friction every step
    VelocityDamped,
    /// Mirror floor overshoot back up, snap to rest below the rest threshold
    PenetrationCorrection,
}

/// Which ball pairs are resolved each step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PairIteration {
    /// Each unordered pair once per step
    #[default]
    UnorderedPairs,
    /// Every ordered pair `(i, j)` with `i != j`, so each contact is resolved twice
    OrderedPairs,
}

/// Named configurations for the historical variants of the demo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Preset {
    /// Size-sampled balls that drop and settle on the floor
    Settle,
    /// Size-sampled balls with a damped floor bounce and rolling friction
    Damped,
    /// Mass-aware balls dropped from rest that settle on the floor
    Drop,
    /// Mass-aware balls thrown at random, bouncing off walls and each other
    #[default]
    Elastic,
}

impl Preset {
    pub const ALL: [Preset; 4] = [
        Preset::Settle,
        Preset::Damped,
        Preset::Drop,
        Preset::Elastic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Settle => "Settle",
            Preset::Damped => "Damped",
            Preset::Drop => "Drop",
            Preset::Elastic => "Elastic",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "settle" => Some(Preset::Settle),
            "damped" => Some(Preset::Damped),
            "drop" => Some(Preset::Drop),
            "elastic" => Some(Preset::Elastic),
            _ => None,
        }
    }
}

/// Reasons a settings value is rejected
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsError {
    /// World width or height is not positive
    InvalidExtent { width: f32, height: f32 },
    /// A sampling range is empty, inverted or non-positive
    InvalidRange {
        name: &'static str,
        min: f32,
        max: f32,
    },
    /// The largest ball that can spawn does not fit inside the world
    WorldTooSmall { max_radius: f32 },
    /// A coefficient is negative or not finite
    InvalidCoefficient { name: &'static str, value: f32 },
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidExtent { width, height } => {
                write!(f, "invalid world extent: {width}x{height}")
            }
            Self::InvalidRange { name, min, max } => {
                write!(f, "invalid {name} range: {min}..{max}")
            }
            Self::WorldTooSmall { max_radius } => {
                write!(f, "world too small for balls of radius {max_radius}")
            }
            Self::InvalidCoefficient { name, value } => {
                write!(f, "invalid {name}: {value}")
            }
        }
    }
}

impl std::error::Error for SettingsError {}

/// Initialization-time simulation constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimSettings {
    // === World ===
    pub width: f32,
    pub height: f32,
    /// Gravitational constant
    pub gravity: f32,
    /// Scale from gravity units to pixels/s²
    pub gravity_multiplier: f32,

    // === Spawning ===
    /// Sample mass and derive radius; otherwise sample radius with mass 1
    pub mass_aware: bool,
    /// (min, max) mass, used when `mass_aware`
    pub mass_range: (f32, f32),
    /// (min, max) radius, used when not `mass_aware`
    pub size_range: (f32, f32),
    /// (min, max) per-component spawn speed before scaling; `None` spawns at rest
    pub spawn_velocity: Option<(f32, f32)>,
    pub velocity_scale: f32,
    /// RGBA color given to every spawned ball
    pub ball_color: [f32; 4],

    // === Floor ===
    pub fall_model: FallModel,
    /// Kept fraction of vertical speed on a penetration-corrected bounce
    pub bounce_friction: f32,
    /// Kept fraction of vertical speed on a velocity-damped bounce
    pub floor_damping: f32,
    /// Horizontal velocity multiplier per step (velocity-damped model)
    pub ground_friction: f32,
    /// Kept fraction of vertical speed when the edge pass bounces off the floor
    pub floor_restitution: f32,
    pub rest_threshold: f32,

    // === Ball-ball ===
    pub pairwise_collisions: bool,
    pub pair_iteration: PairIteration,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self::from_preset(Preset::default())
    }
}

impl SimSettings {
    /// Settings for a named variant
    pub fn from_preset(preset: Preset) -> Self {
        let base = Self {
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,
            gravity: GRAVITY,
            gravity_multiplier: GRAVITY_MULTIPLIER,
            mass_aware: true,
            mass_range: (MIN_BALL_MASS, MAX_BALL_MASS),
            size_range: (MIN_BALL_SIZE, MAX_BALL_SIZE),
            spawn_velocity: None,
            velocity_scale: VELOCITY_SCALE,
            ball_color: crate::renderer::colors::BALL,
            fall_model: FallModel::AccelerationDriven,
            bounce_friction: BOUNCE_FRICTION,
            floor_damping: BOUNCE_FRICTION,
            ground_friction: 1.0,
            floor_restitution: 1.0,
            rest_threshold: REST_THRESHOLD,
            pairwise_collisions: false,
            pair_iteration: PairIteration::UnorderedPairs,
        };

        match preset {
            Preset::Settle => Self {
                mass_aware: false,
                fall_model: FallModel::PenetrationCorrection,
                ..base
            },
            Preset::Damped => Self {
                mass_aware: false,
                fall_model: FallModel::VelocityDamped,
                ground_friction: GROUND_FRICTION,
                ..base
            },
            Preset::Drop => Self {
                fall_model: FallModel::PenetrationCorrection,
                ..base
            },
            Preset::Elastic => Self {
                spawn_velocity: Some((MIN_BALL_VEL, MAX_BALL_VEL)),
                pairwise_collisions: true,
                ..base
            },
        }
    }

    /// Constant acceleration given to every spawned ball (pixels/s², y down)
    pub fn gravity_accel(&self) -> f32 {
        self.gravity * self.gravity_multiplier
    }

    /// Largest radius a spawned ball can have
    pub fn max_spawn_radius(&self) -> f32 {
        if self.mass_aware {
            crate::radius_for_mass(self.mass_range.1 + 1.0)
        } else {
            self.size_range.1 + 1.0
        }
    }

    /// Check that every constant is usable by the simulation
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(SettingsError::InvalidExtent {
                width: self.width,
                height: self.height,
            });
        }

        check_range("mass", self.mass_range)?;
        check_range("size", self.size_range)?;
        if let Some(range) = self.spawn_velocity {
            check_range("spawn velocity", range)?;
        }

        for (name, value) in [
            ("gravity", self.gravity),
            ("gravity multiplier", self.gravity_multiplier),
            ("velocity scale", self.velocity_scale),
            ("bounce friction", self.bounce_friction),
            ("floor damping", self.floor_damping),
            ("ground friction", self.ground_friction),
            ("floor restitution", self.floor_restitution),
            ("rest threshold", self.rest_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SettingsError::InvalidCoefficient { name, value });
            }
        }

        let max_radius = self.max_spawn_radius();
        if 2.0 * max_radius > self.width.min(self.height) {
            return Err(SettingsError::WorldTooSmall { max_radius });
        }

        Ok(())
    }
}

fn check_range(name: &'static str, (min, max): (f32, f32)) -> Result<(), SettingsError> {
    if min > 0.0 && min <= max && max.is_finite() {
        Ok(())
    } else {
        Err(SettingsError::InvalidRange { name, min, max })
    }
}
