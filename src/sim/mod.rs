//! Deterministic simulation module
//!
//! All physics lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only, consumed at spawn
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod integrate;
pub mod state;
pub mod tick;

pub use collision::{CollisionError, EdgeHits, resolve_ball_pair, resolve_edges};
pub use integrate::integrate_ball;
pub use state::{Ball, RngState, SpawnRequest, World};
pub use tick::{TickInput, TickStats, tick};
