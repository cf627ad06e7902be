//! Planar - 2D rigid-body physics engine
//!
//! The root crate ties the workspace together: configuration loading
//! plus re-exports of the math and simulation crates.

pub mod config;

pub use planar_math;
pub use planar_physics;

pub use config::{ConfigError, SimConfig};
