//! Fixed-timestep driver for the physics world.
//!
//! Rendering runs at whatever rate the frame loop manages; simulation
//! stability wants a constant tick. [`Engine`] bridges the two with a
//! time accumulator: feed it real frame times and it steps the world
//! zero or more whole ticks per update.

use serde::{Deserialize, Serialize};

use crate::world::PhysicsWorld;

/// Fixed-rate stepping parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seconds of simulated time per tick.
    pub fixed_timestep: f32,
    /// Cap on the real time consumed per update, bounding catch-up
    /// work after a long stall.
    pub max_frame_time: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fixed_timestep: 0.02,
            max_frame_time: 0.25,
        }
    }
}

/// Run state of the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Stopped,
    Running,
}

/// Accumulator-based fixed-rate driver.
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    state: EngineState,
    accumulator: f32,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            state: EngineState::Stopped,
            accumulator: 0.0,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Begin ticking. Starting an already running engine restarts it
    /// with a drained accumulator.
    pub fn start(&mut self) {
        if self.state == EngineState::Running {
            self.stop();
        }
        self.accumulator = 0.0;
        self.state = EngineState::Running;
        log::info!(
            "physics engine started, fixed timestep {}s",
            self.config.fixed_timestep
        );
    }

    pub fn stop(&mut self) {
        self.state = EngineState::Stopped;
        self.accumulator = 0.0;
        log::info!("physics engine stopped");
    }

    /// Advance by one frame of real time, stepping the world as many
    /// whole ticks as the accumulated time covers. Returns the number
    /// of ticks run; always zero while stopped.
    pub fn update(&mut self, world: &mut PhysicsWorld, frame_time: f32) -> u32 {
        if self.state != EngineState::Running {
            return 0;
        }

        self.accumulator += frame_time.min(self.config.max_frame_time);

        let mut ticks = 0;
        while self.accumulator >= self.config.fixed_timestep {
            world.step(self.config.fixed_timestep);
            self.accumulator -= self.config.fixed_timestep;
            ticks += 1;
        }
        ticks
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
