//! World state and core simulation types
//!
//! All state that must survive a snapshot lives here.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::settings::{SettingsError, SimSettings};
use crate::{radius_for_mass, sample_widened};

/// A ball entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Constant pull applied every step (gravity)
    pub acc: Vec2,
    pub radius: f32,
    pub mass: f32,
    /// RGBA draw color, fixed at spawn
    pub color: [f32; 4],
    /// Settled on the floor; vertical motion is frozen
    #[serde(default)]
    pub is_still: bool,
}

impl Ball {
    pub fn new(id: u32, pos: Vec2, radius: f32, mass: f32) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            acc: Vec2::ZERO,
            radius,
            mass,
            color: crate::renderer::colors::BALL,
            is_still: false,
        }
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn with_acceleration(mut self, acc: Vec2) -> Self {
        self.acc = acc;
        self
    }

    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.mass * self.vel.length_squared()
    }

    pub fn momentum(&self) -> Vec2 {
        self.vel * self.mass
    }
}

/// A request to add one ball at a world position (from a click edge)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnRequest {
    pub pos: Vec2,
}

impl SpawnRequest {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
        }
    }
}

/// RNG state wrapper for serialization
///
/// Stores the seed plus how many 32-bit outputs have been consumed, so a
/// restored world resumes the exact same random sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub draws: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, draws: 0 }
    }

    pub fn to_rng(&self) -> Pcg32 {
        let mut rng = Pcg32::seed_from_u64(self.seed);
        rng.advance(self.draws);
        rng
    }

    /// Draw `N` uniform samples in `[0, 1)` and record the consumption
    pub fn sample<const N: usize>(&mut self) -> [f32; N] {
        let mut rng = self.to_rng();
        let samples = std::array::from_fn(|_| rng.random::<f32>());
        self.draws += N as u64;
        samples
    }
}

/// Complete simulation state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub settings: SimSettings,
    pub rng_state: RngState,
    /// Active balls in spawn order; never shrinks
    pub balls: Vec<Ball>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Next entity ID
    next_id: u32,
}

impl World {
    /// Create an empty world after validating its settings
    pub fn new(settings: SimSettings, seed: u64) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self {
            settings,
            rng_state: RngState::new(seed),
            balls: Vec::new(),
            time_ticks: 0,
            next_id: 1,
        })
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Insert a fully specified ball (scripted scenes and tests)
    pub fn add_ball(&mut self, mut ball: Ball) -> u32 {
        ball.id = self.next_entity_id();
        let id = ball.id;
        self.balls.push(ball);
        id
    }

    /// Spawn a ball at the requested position, sampling its size and launch
    /// velocity from the settings
    pub fn spawn(&mut self, request: SpawnRequest) -> &Ball {
        let s = &self.settings;
        let (mass, radius) = if s.mass_aware {
            let [u] = self.rng_state.sample::<1>();
            let mass = sample_widened(s.mass_range.0, s.mass_range.1, u);
            (mass, radius_for_mass(mass))
        } else {
            let [u] = self.rng_state.sample::<1>();
            (1.0, sample_widened(s.size_range.0, s.size_range.1, u))
        };

        let vel = match s.spawn_velocity {
            Some((min, max)) => {
                let scale = s.velocity_scale;
                let [ux, uy] = self.rng_state.sample::<2>();
                Vec2::new(
                    sample_widened(min, max, ux) * scale,
                    sample_widened(min, max, uy) * scale,
                )
            }
            None => Vec2::ZERO,
        };

        let id = self.next_entity_id();
        let s = &self.settings;
        let mut ball = Ball::new(id, request.pos, radius, mass)
            .with_velocity(vel)
            .with_acceleration(Vec2::new(0.0, s.gravity_accel()));
        ball.color = s.ball_color;

        log::debug!(
            "Spawned ball {} at ({:.1}, {:.1}) mass={:.2} radius={:.2}",
            id,
            ball.pos.x,
            ball.pos.y,
            mass,
            radius
        );

        self.balls.push(ball);
        &self.balls[self.balls.len() - 1]
    }

    /// Number of balls that have settled on the floor
    pub fn still_count(&self) -> usize {
        self.balls.iter().filter(|b| b.is_still).count()
    }

    /// Total kinetic energy (debug overlay / tests)
    pub fn kinetic_energy(&self) -> f32 {
        self.balls.iter().map(Ball::kinetic_energy).sum()
    }
}
