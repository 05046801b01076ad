//! Ball Drop entry point
//!
//! Headless native driver: scripted clicks feed the fixed-step loop, and each
//! frame is "drawn" into a vertex mesh the way a windowed front end would.
//! Takes no arguments; the run is fixed by the constants below.

use glam::Vec2;

use ball_drop::consts::SIM_DT;
use ball_drop::persistence::save_world;
use ball_drop::platform::{ClickEdge, FixedStepper};
use ball_drop::renderer::{MeshSink, draw_world};
use ball_drop::sim::{TickInput, World, tick};
use ball_drop::{Preset, SimSettings};

/// Frame at which the scripted mouse goes down, and where
const SCRIPTED_CLICKS: [(u32, f32, f32); 6] = [
    (0, 400.0, 50.0),
    (30, 200.0, 80.0),
    (60, 600.0, 60.0),
    (90, 390.0, 120.0),
    (120, 100.0, 200.0),
    (150, 700.0, 40.0),
];

/// Simulated display refresh
const FRAME_DT: f32 = 1.0 / 60.0;

const PRESET: Preset = Preset::Elastic;
const SEED: u64 = 12345;
const FRAMES: u32 = 600;

fn main() {
    env_logger::init();

    log::info!("Ball Drop (native) starting: preset={} seed={SEED}", PRESET.as_str());

    let mut world = match World::new(SimSettings::from_preset(PRESET), SEED) {
        Ok(world) => world,
        Err(e) => {
            log::error!("Invalid settings: {e}");
            std::process::exit(1);
        }
    };

    let mut click = ClickEdge::new();
    let mut stepper = FixedStepper::default();
    let mut mesh = MeshSink::default();
    let mut pending = TickInput::default();

    for frame in 0..FRAMES {
        // Button held for two frames after each scripted press
        let press = SCRIPTED_CLICKS
            .iter()
            .find(|(at, _, _)| frame >= *at && frame < at + 2);
        let cursor = press.map_or(Vec2::ZERO, |&(_, x, y)| Vec2::new(x, y));

        if let Some(request) = click.update(press.is_some(), cursor) {
            pending.spawn = Some(request);
        }

        // A pending click is consumed by the first substep that runs
        for _ in 0..stepper.advance(FRAME_DT) {
            let stats = tick(&mut world, &pending, SIM_DT);
            if stats.degenerate_pairs > 0 {
                log::warn!("Frame {frame}: skipped {} coincident pairs", stats.degenerate_pairs);
            }
            pending.spawn = None;
        }

        mesh.clear();
        draw_world(&world, &mut mesh);

        if frame % 60 == 0 {
            log::info!(
                "Frame {frame}: {} balls ({} still), KE={:.0}, {} triangles",
                world.balls.len(),
                world.still_count(),
                world.kinetic_energy(),
                mesh.triangle_count()
            );
        }
    }

    for ball in &world.balls {
        println!(
            "ball {:>2}: pos=({:7.2}, {:7.2}) vel=({:8.2}, {:8.2}) r={:5.2} m={:4.2}{}",
            ball.id,
            ball.pos.x,
            ball.pos.y,
            ball.vel.x,
            ball.vel.y,
            ball.radius,
            ball.mass,
            if ball.is_still { " still" } else { "" }
        );
    }

    match save_world(&world) {
        Ok(json) => log::info!("Final snapshot is {} bytes", json.len()),
        Err(e) => log::error!("Snapshot failed: {e}"),
    }
}
