//! Collision and trigger events emitted by the world.

use crate::body::BodyKey;

/// Which overlap-set transition an event reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactPhase {
    /// The pair started overlapping this tick.
    Enter,
    /// The pair kept overlapping since last tick.
    Stay,
    /// The pair stopped overlapping this tick.
    Exit,
}

/// Solid collision or trigger overlap.
///
/// A pair routes to the trigger channel when either body is a trigger;
/// trigger pairs never reach the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventChannel {
    Collision,
    Trigger,
}

/// One overlap transition, addressed to `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionEvent {
    pub target: BodyKey,
    pub other: BodyKey,
    /// True when `other` is a rigidbody rather than a static body.
    pub other_is_rigidbody: bool,
    pub phase: ContactPhase,
    pub channel: EventChannel,
}
