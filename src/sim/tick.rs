//! Fixed timestep simulation tick
//!
//! Advances the world deterministically: spawn, integrate, edges, ball pairs.

use super::collision::{pair_mut, resolve_ball_pair, resolve_edges};
use super::integrate::integrate_ball;
use super::state::{SpawnRequest, World};
use crate::settings::PairIteration;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Spawn a ball this tick (rising click edge)
    pub spawn: Option<SpawnRequest>,
}

impl TickInput {
    pub fn spawn_at(x: f32, y: f32) -> Self {
        Self {
            spawn: Some(SpawnRequest::at(x, y)),
        }
    }
}

/// Per-tick counters, mostly for logging and tests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    pub spawned: bool,
    pub edge_hits: u32,
    pub pair_contacts: u32,
    /// Pairs skipped because their centers coincided
    pub degenerate_pairs: u32,
}

/// Advance the world by one timestep
pub fn tick(world: &mut World, input: &TickInput, dt: f32) -> TickStats {
    let mut stats = TickStats::default();

    if let Some(request) = input.spawn {
        world.spawn(request);
        stats.spawned = true;
    }

    let settings = &world.settings;
    let (width, height) = (settings.width, settings.height);
    let restitution = settings.floor_restitution;

    for ball in &mut world.balls {
        integrate_ball(ball, settings, dt);
    }

    for ball in &mut world.balls {
        if resolve_edges(ball, width, height, restitution).any() {
            stats.edge_hits += 1;
        }
    }

    if settings.pairwise_collisions {
        resolve_pairs(world, &mut stats);

        // Pair separation can push a ball past an edge
        for ball in &mut world.balls {
            resolve_edges(ball, width, height, restitution);
        }
    }

    world.time_ticks += 1;
    stats
}

/// Resolve every ball pair in index order, applying corrections immediately
fn resolve_pairs(world: &mut World, stats: &mut TickStats) {
    let iteration = world.settings.pair_iteration;
    let n = world.balls.len();

    for i in 0..n {
        let start = match iteration {
            PairIteration::UnorderedPairs => i + 1,
            PairIteration::OrderedPairs => 0,
        };
        for j in start..n {
            if i == j {
                continue;
            }
            let (a, b) = pair_mut(&mut world.balls, i, j);
            match resolve_ball_pair(a, b) {
                Ok(true) => stats.pair_contacts += 1,
                Ok(false) => {}
                Err(err) => {
                    log::trace!("Skipping pair ({i}, {j}): {err}");
                    stats.degenerate_pairs += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::settings::{Preset, SimSettings};
    use crate::sim::state::Ball;
    use glam::Vec2;

    fn world(preset: Preset) -> World {
        World::new(SimSettings::from_preset(preset), 12345).unwrap()
    }

    fn drop_ball(world: &mut World, x: f32, y: f32, mass: f32) {
        let acc = Vec2::new(0.0, world.settings.gravity_accel());
        let radius = crate::radius_for_mass(mass);
        world.add_ball(Ball::new(0, Vec2::new(x, y), radius, mass).with_acceleration(acc));
    }

    #[test]
    fn test_tick_spawns_once() {
        let mut world = world(Preset::Elastic);
        let stats = tick(&mut world, &TickInput::spawn_at(400.0, 100.0), SIM_DT);
        assert!(stats.spawned);
        assert_eq!(world.balls.len(), 1);

        tick(&mut world, &TickInput::default(), SIM_DT);
        assert_eq!(world.balls.len(), 1);
        assert_eq!(world.time_ticks, 2);
    }

    #[test]
    fn test_spawn_outside_world_is_contained_same_tick() {
        let mut world = world(Preset::Elastic);
        tick(&mut world, &TickInput::spawn_at(-50.0, 900.0), SIM_DT);
        let ball = &world.balls[0];
        assert_eq!(ball.pos.x, ball.radius);
        assert_eq!(ball.pos.y, 450.0 - ball.radius);
    }

    #[test]
    fn test_ball_settles_on_floor() {
        // 800x450 world, gravity 9.8 * 100, mass 1 ball dropped from (400, 50)
        let mut world = world(Preset::Drop);
        drop_ball(&mut world, 400.0, 50.0, 1.0);
        assert_eq!(world.balls[0].radius, 10.0);

        let mut steps = 0;
        while !world.balls[0].is_still && steps < 5_000 {
            tick(&mut world, &TickInput::default(), SIM_DT);
            steps += 1;
        }

        let ball = &world.balls[0];
        assert!(ball.is_still, "ball did not settle in {steps} steps");
        assert_eq!(ball.pos.y, 440.0);
        assert!(ball.vel.length() < 1e-3);

        // And stays put
        for _ in 0..100 {
            tick(&mut world, &TickInput::default(), SIM_DT);
        }
        assert_eq!(world.balls[0].pos.y, 440.0);
    }

    #[test]
    fn test_size_sampled_balls_settle() {
        let mut world = world(Preset::Settle);
        for x in [100.0, 300.0, 500.0, 700.0] {
            tick(&mut world, &TickInput::spawn_at(x, 60.0), SIM_DT);
        }
        for _ in 0..5_000 {
            tick(&mut world, &TickInput::default(), SIM_DT);
        }
        assert_eq!(world.still_count(), 4);
        for ball in &world.balls {
            assert_eq!(ball.pos.y, 450.0 - ball.radius);
        }
    }

    #[test]
    fn test_wall_bounce_undamped() {
        let mut world = world(Preset::Elastic);
        world.add_ball(
            Ball::new(0, Vec2::new(789.0, 200.0), 10.0, 1.0).with_velocity(Vec2::new(300.0, 0.0)),
        );

        tick(&mut world, &TickInput::default(), SIM_DT);

        let ball = &world.balls[0];
        assert_eq!(ball.pos.x, 790.0);
        assert_eq!(ball.vel.x, -300.0);
    }

    #[test]
    fn test_head_on_pair_swaps_velocities() {
        let mut world = world(Preset::Elastic);
        world.add_ball(
            Ball::new(0, Vec2::new(390.0, 200.0), 10.0, 1.0).with_velocity(Vec2::new(100.0, 0.0)),
        );
        world.add_ball(
            Ball::new(0, Vec2::new(410.0, 200.0), 10.0, 1.0).with_velocity(Vec2::new(-100.0, 0.0)),
        );

        let stats = tick(&mut world, &TickInput::default(), SIM_DT);

        assert_eq!(stats.pair_contacts, 1);
        let (a, b) = (&world.balls[0], &world.balls[1]);
        assert!(a.pos.distance(b.pos) >= 20.0 - 1e-3);
        assert!((a.vel.x - (-100.0)).abs() < 1e-2);
        assert!((b.vel.x - 100.0).abs() < 1e-2);
    }

    #[test]
    fn test_ordered_pairs_visit_each_contact_twice() {
        let mut settings = SimSettings::from_preset(Preset::Elastic);
        settings.pair_iteration = PairIteration::OrderedPairs;
        let mut world = World::new(settings, 1).unwrap();
        // Resting overlap: the first visit separates them, the second finds no contact
        world.add_ball(Ball::new(0, Vec2::new(395.0, 200.0), 10.0, 1.0));
        world.add_ball(Ball::new(0, Vec2::new(405.0, 200.0), 10.0, 1.0));

        let mut stats = TickStats::default();
        resolve_pairs(&mut world, &mut stats);
        assert_eq!(stats.pair_contacts, 1);

        // Coincident centers fail on both visits
        world.balls[0].pos = Vec2::new(100.0, 100.0);
        world.balls[1].pos = Vec2::new(100.0, 100.0);
        let mut stats = TickStats::default();
        resolve_pairs(&mut world, &mut stats);
        assert_eq!(stats.degenerate_pairs, 2);
    }

    fn three_in_a_row(iteration: PairIteration) -> World {
        let mut settings = SimSettings::from_preset(Preset::Elastic);
        settings.pair_iteration = iteration;
        let mut world = World::new(settings, 1).unwrap();
        // Resting A, struck from the left by B and from the right by C
        world.add_ball(Ball::new(0, Vec2::new(398.0, 200.0), 10.0, 1.0));
        world.add_ball(
            Ball::new(0, Vec2::new(380.0, 200.0), 10.0, 1.0).with_velocity(Vec2::new(100.0, 0.0)),
        );
        world.add_ball(
            Ball::new(0, Vec2::new(410.0, 200.0), 10.0, 1.0).with_velocity(Vec2::new(-100.0, 0.0)),
        );
        world
    }

    #[test]
    fn test_ordered_pairs_reapply_impulse_to_separating_contact() {
        let mut unordered = three_in_a_row(PairIteration::UnorderedPairs);
        let mut stats = TickStats::default();
        resolve_pairs(&mut unordered, &mut stats);
        assert_eq!(stats.pair_contacts, 2);
        let vx: Vec<f32> = unordered.balls.iter().map(|b| b.vel.x).collect();
        assert!((vx[0] - (-100.0)).abs() < 1e-3, "{vx:?}");
        assert!(vx[1].abs() < 1e-3, "{vx:?}");
        assert!((vx[2] - 100.0).abs() < 1e-3, "{vx:?}");

        // The second visits of (A, B) and (A, C) find them still overlapping
        // and kick them again, even though (C, A) is already separating
        let mut ordered = three_in_a_row(PairIteration::OrderedPairs);
        let mut stats = TickStats::default();
        resolve_pairs(&mut ordered, &mut stats);
        assert_eq!(stats.pair_contacts, 4);
        let vx: Vec<f32> = ordered.balls.iter().map(|b| b.vel.x).collect();
        assert!((vx[0] - 100.0).abs() < 1e-3, "{vx:?}");
        assert!((vx[1] - (-100.0)).abs() < 1e-3, "{vx:?}");
        assert!(vx[2].abs() < 1e-3, "{vx:?}");

        // Both orders conserve momentum, they just end in different states
        let momentum: f32 = ordered.balls.iter().map(|b| b.momentum().x).sum();
        assert!(momentum.abs() < 1e-3);
    }

    #[test]
    fn test_degenerate_pair_skipped() {
        let mut world = world(Preset::Elastic);
        world.add_ball(Ball::new(0, Vec2::new(300.0, 200.0), 10.0, 1.0));
        world.add_ball(Ball::new(0, Vec2::new(300.0, 200.0), 10.0, 1.0));

        let stats = tick(&mut world, &TickInput::default(), SIM_DT);

        assert_eq!(stats.degenerate_pairs, 1);
        assert_eq!(stats.pair_contacts, 0);
        assert_eq!(world.balls[0].pos, world.balls[1].pos);
    }

    #[test]
    fn test_collision_wakes_still_ball() {
        let mut world = world(Preset::Drop);
        world.settings.pairwise_collisions = true;
        let mut resting = Ball::new(0, Vec2::new(400.0, 440.0), 10.0, 1.0);
        resting.is_still = true;
        world.add_ball(resting);
        world.add_ball(
            Ball::new(0, Vec2::new(400.0, 421.0), 10.0, 1.0).with_velocity(Vec2::new(0.0, 200.0)),
        );

        tick(&mut world, &TickInput::default(), SIM_DT);
        assert!(!world.balls[0].is_still);
    }

    #[test]
    fn test_determinism() {
        // Two worlds with same seed should produce identical results
        let mut w1 = world(Preset::Elastic);
        let mut w2 = world(Preset::Elastic);

        let inputs = [
            TickInput::spawn_at(200.0, 100.0),
            TickInput::default(),
            TickInput::spawn_at(220.0, 110.0),
            TickInput::spawn_at(600.0, 300.0),
            TickInput::default(),
        ];

        for _ in 0..10 {
            for input in &inputs {
                tick(&mut w1, input, SIM_DT);
                tick(&mut w2, input, SIM_DT);
            }
        }

        assert_eq!(w1.time_ticks, w2.time_ticks);
        assert_eq!(w1.balls, w2.balls);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn balls_stay_inside_world(
                seed in 0u64..1000,
                clicks in proptest::collection::vec((0.0f32..800.0, 0.0f32..450.0), 1..12),
                preset_index in 0usize..4,
            ) {
                let preset = Preset::ALL[preset_index];
                let mut world = World::new(SimSettings::from_preset(preset), seed).unwrap();

                for &(x, y) in &clicks {
                    tick(&mut world, &TickInput::spawn_at(x, y), SIM_DT);
                    for _ in 0..20 {
                        tick(&mut world, &TickInput::default(), SIM_DT);
                    }
                }

                prop_assert_eq!(world.balls.len(), clicks.len());
                for ball in &world.balls {
                    prop_assert!(ball.radius > 0.0);
                    prop_assert!(ball.pos.x >= ball.radius && ball.pos.x <= 800.0 - ball.radius,
                        "x={} r={}", ball.pos.x, ball.radius);
                    prop_assert!(ball.pos.y >= ball.radius && ball.pos.y <= 450.0 - ball.radius,
                        "y={} r={}", ball.pos.y, ball.radius);
                }
            }

            #[test]
            fn resolved_pair_does_not_overlap(
                ax in 100.0f32..700.0,
                ay in 100.0f32..350.0,
                dx in -25.0f32..25.0,
                dy in -25.0f32..25.0,
                mass_a in 1.0f32..6.0,
                mass_b in 1.0f32..6.0,
            ) {
                prop_assume!(dx.abs() > 0.01 || dy.abs() > 0.01);
                let (ra, rb) = (crate::radius_for_mass(mass_a), crate::radius_for_mass(mass_b));
                let mut a = Ball::new(1, Vec2::new(ax, ay), ra, mass_a)
                    .with_velocity(Vec2::new(50.0, -20.0));
                let mut b = Ball::new(2, Vec2::new(ax + dx, ay + dy), rb, mass_b)
                    .with_velocity(Vec2::new(-40.0, 10.0));

                resolve_ball_pair(&mut a, &mut b).unwrap();

                let min_dist = a.radius + b.radius;
                prop_assert!(a.pos.distance(b.pos) >= min_dist - 1e-3,
                    "distance {} < {}", a.pos.distance(b.pos), min_dist);
            }
        }
    }
}
