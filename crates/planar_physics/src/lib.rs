//! 2D rigid-body physics for Planar
//!
//! This crate provides the simulation core:
//! - Collision shapes (convex polygons, circles) and compound colliders
//! - SAT narrow phase with clipped contact manifolds
//! - Impulse-based contact resolution with restitution and friction
//! - Layer-filtered broad phase with collision/trigger events
//! - A fixed-timestep engine driver

pub mod body;
pub mod collider;
pub mod collision;
pub mod engine;
pub mod events;
pub mod layers;
pub mod shapes;
pub mod world;

// Re-export commonly used types
pub use body::{AxisLock, Body, BodyKey, Dynamics};
pub use collider::{Collider, ColliderError, ShapeDef};
pub use collision::{detect, Manifold};
pub use engine::{Engine, EngineConfig, EngineState};
pub use events::{CollisionEvent, ContactPhase, EventChannel};
pub use layers::LayerMatrix;
pub use shapes::{Aabb2D, Circle, ConvexPolygon, Rect, Shape};
pub use world::{PhysicsConfig, PhysicsWorld, RegisterError};
