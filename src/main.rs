//! Planar - 2D rigid-body physics engine
//!
//! A headless demo: drops a small stack of bodies onto a static floor,
//! runs the fixed-timestep engine against simulated frame times, and
//! logs collision events and the final resting state.

mod config;

use planar_math::Vec2;
use planar_physics::{Body, Collider, ContactPhase, Engine, PhysicsWorld};

use config::SimConfig;

/// Simulated frame rate fed to the engine.
const FRAME_TIME: f32 = 1.0 / 60.0;
/// Total demo length in frames (ten seconds).
const FRAMES: u32 = 600;
/// Frame at which the explosion goes off.
const EXPLOSION_FRAME: u32 = 300;

fn main() {
    // Initialize logging
    env_logger::init();
    log::info!("Starting Planar");

    // Load configuration
    let config = SimConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config: {}. Using defaults.", e);
        SimConfig::default()
    });

    let mut world = PhysicsWorld::new(config.physics.clone());

    // Static floor spanning the scene
    world
        .attach(Body::new_static(
            Vec2::new(0.0, -2.0),
            vec![Collider::rect(Vec2::new(30.0, 1.0), Vec2::ZERO)],
        ))
        .expect("Failed to attach floor");

    // A small stack of falling bodies with mixed shapes
    let crate_box = Body::new_rigid(
        Vec2::new(-1.5, 3.0),
        vec![Collider::rect(Vec2::new(1.0, 1.0), Vec2::ZERO)],
    )
    .with_restitution(0.2);
    world.attach(crate_box).expect("Failed to attach box");

    let ball = Body::new_rigid(
        Vec2::new(0.0, 5.0),
        vec![Collider::circle(0.5, Vec2::ZERO)],
    )
    .with_restitution(0.7);
    world.attach(ball).expect("Failed to attach ball");

    let diamond = Body::new_rigid(
        Vec2::new(1.5, 4.0),
        vec![Collider::polygon(vec![
            Vec2::new(0.0, -0.7),
            Vec2::new(0.7, 0.0),
            Vec2::new(0.0, 0.7),
            Vec2::new(-0.7, 0.0),
        ])
        .expect("Diamond polygon is valid")],
    )
    .with_restitution(0.4);
    world.attach(diamond).expect("Failed to attach diamond");

    log::info!("Simulating {} bodies", world.body_count());

    let mut engine = Engine::new(config.engine.clone());
    engine.start();

    let mut total_ticks = 0;
    for frame in 0..FRAMES {
        if frame == EXPLOSION_FRAME {
            log::info!("Setting off an explosion under the stack");
            world.add_explosion_force(Vec2::new(0.0, -1.0), 12.0, 0.0, 10.0);
        }

        total_ticks += engine.update(&mut world, FRAME_TIME);

        for event in world.drain_events() {
            match event.phase {
                ContactPhase::Enter => log::info!(
                    "frame {}: {:?} contact enter, {:?} -> {:?}",
                    frame,
                    event.channel,
                    event.target,
                    event.other
                ),
                ContactPhase::Exit => log::info!(
                    "frame {}: {:?} contact exit, {:?} -> {:?}",
                    frame,
                    event.channel,
                    event.target,
                    event.other
                ),
                ContactPhase::Stay => {}
            }
        }
    }
    engine.stop();

    log::info!("Ran {} physics ticks over {} frames", total_ticks, FRAMES);
    for (_, body) in world.rigidbodies() {
        if let Some(dynamics) = body.dynamics() {
            log::info!(
                "body {}: position ({:.3}, {:.3}), velocity ({:.3}, {:.3})",
                body.id(),
                body.position().x,
                body.position().y,
                dynamics.velocity.x,
                dynamics.velocity.y
            );
        }
    }
}
