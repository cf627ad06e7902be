//! 2D Mathematics Library
//!
//! This crate provides the vector, matrix and transform types for the
//! planar physics engine.
//!
//! ## Core Types
//!
//! - [`Vec2`] - 2D vector with x, y components
//! - [`Mat3`] - 3x3 affine matrix for 2D transformations
//! - [`Transform2D`] - position, rotation (degrees) and scale

mod vec2;
mod mat3;
mod transform;

pub use vec2::Vec2;
pub use mat3::Mat3;
pub use transform::Transform2D;
