//! The physics world: body registry, collision pipeline, contact
//! resolution and integration.
//!
//! [`PhysicsWorld::step`] advances the simulation one fixed tick:
//! refresh collider caches, broad-phase AABB pairing, narrow-phase
//! manifold generation, enter/stay/exit event dispatch, impulse
//! resolution, then semi-implicit Euler integration.

use std::collections::{HashSet, VecDeque};

use planar_math::Vec2;
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::body::{AxisLock, Body, BodyKey, PendingContact};
use crate::collision::{self, Manifold};
use crate::events::{CollisionEvent, ContactPhase, EventChannel};
use crate::layers::LayerMatrix;
use crate::shapes::Aabb2D;

/// Penetration depth tolerated before positional correction kicks in.
const SLOP: f32 = 0.02;
/// Fraction of the penetration corrected per tick.
const POSITION_CORRECTION_MOD: f32 = 0.2;
/// Squared speed below which a velocity snaps to zero.
const VELOCITY_CLAMP_SQ: f32 = 0.001;
/// Angular speed below which the spin snaps to zero.
const ANGULAR_VELOCITY_CLAMP: f32 = 0.001;

/// Tunables for the physics world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// World gravity, scaled per body by its gravity multiplier.
    pub gravity: Vec2,
    /// Run the narrow phase across worker threads.
    pub parallel: bool,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, -9.81),
            parallel: true,
        }
    }
}

/// Error attaching a body to the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterError {
    /// Every pooled id is in use; the body was not attached.
    IdPoolExhausted,
}

impl std::fmt::Display for RegisterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegisterError::IdPoolExhausted => {
                write!(f, "body id pool exhausted (65535 ids in use)")
            }
        }
    }
}

impl std::error::Error for RegisterError {}

/// FIFO pool of compact body ids, minted lazily in batches.
///
/// Released ids go to the back of the queue, so an id is not reused
/// until everything minted before it has been handed out.
#[derive(Debug)]
struct IdPool {
    available: VecDeque<u16>,
    next_batch: u32,
}

impl IdPool {
    const BATCH: u32 = 1000;
    const CAPACITY: u32 = 65535;

    fn new() -> Self {
        Self {
            available: VecDeque::new(),
            next_batch: 0,
        }
    }

    fn allocate(&mut self) -> Option<u16> {
        if self.available.is_empty() {
            self.refill();
        }
        self.available.pop_front()
    }

    fn refill(&mut self) {
        let end = (self.next_batch + Self::BATCH).min(Self::CAPACITY);
        for id in self.next_batch..end {
            self.available.push_back(id as u16);
        }
        self.next_batch = end;
    }

    fn release(&mut self, id: u16) {
        self.available.push_back(id);
    }
}

/// Order-independent key for a pair of body ids.
fn pair_key(a: u16, b: u16) -> u32 {
    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
    ((lo as u32) << 16) | hi as u32
}

/// Snapshot of the state the broad phase reads per body.
#[derive(Debug, Clone, Copy)]
struct BroadEntry {
    key: BodyKey,
    id: u16,
    layer: u8,
    bounds: Aabb2D,
}

/// Container and stepper for all simulated bodies.
pub struct PhysicsWorld {
    config: PhysicsConfig,
    /// Which collision layers interact. Mutate freely between steps.
    pub layers: LayerMatrix,
    bodies: SlotMap<BodyKey, Body>,
    rigid_order: Vec<BodyKey>,
    static_order: Vec<BodyKey>,
    ids: IdPool,
    tested_pairs: HashSet<u32>,
    events: Vec<CollisionEvent>,
}

impl PhysicsWorld {
    pub fn new(config: PhysicsConfig) -> Self {
        log::info!(
            "physics world created, gravity ({}, {}), parallel narrow phase {}",
            config.gravity.x,
            config.gravity.y,
            config.parallel
        );
        Self {
            config,
            layers: LayerMatrix::default(),
            bodies: SlotMap::with_key(),
            rigid_order: Vec::new(),
            static_order: Vec::new(),
            ids: IdPool::new(),
            tested_pairs: HashSet::new(),
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn gravity(&self) -> Vec2 {
        self.config.gravity
    }

    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.config.gravity = gravity;
    }

    /// Attach a body to the simulation, allocating its pooled id.
    pub fn attach(&mut self, mut body: Body) -> Result<BodyKey, RegisterError> {
        let Some(id) = self.ids.allocate() else {
            log::warn!("body id pool exhausted, attach refused");
            return Err(RegisterError::IdPoolExhausted);
        };
        body.id = id;
        body.is_valid = true;
        let is_rigid = body.is_rigidbody();
        let layer = body.layer;
        let key = self.bodies.insert(body);
        if is_rigid {
            self.rigid_order.push(key);
        } else {
            self.static_order.push(key);
        }
        log::debug!(
            "attached {} body id {} on layer {}",
            if is_rigid { "rigid" } else { "static" },
            id,
            layer
        );
        Ok(key)
    }

    /// Detach a body, firing synthetic exit events to every body it
    /// still overlaps. Returns false for unknown or stale keys.
    pub fn detach(&mut self, key: BodyKey) -> bool {
        let Some(body) = self.bodies.get_mut(key) else {
            return false;
        };
        body.is_valid = false;
        let id = body.id;
        let is_rigid = body.is_rigidbody();
        let is_trigger = body.is_trigger;
        let overlaps: Vec<BodyKey> = body.overlap_set.drain().collect();

        for other_key in overlaps {
            let (other_is_rigid, other_trigger) = {
                let Some(other) = self.bodies.get_mut(other_key) else {
                    continue;
                };
                other.overlap_set.remove(&key);
                (other.is_rigidbody(), other.is_trigger)
            };
            let channel = if is_trigger || other_trigger {
                EventChannel::Trigger
            } else {
                EventChannel::Collision
            };
            self.events.push(CollisionEvent {
                target: key,
                other: other_key,
                other_is_rigidbody: other_is_rigid,
                phase: ContactPhase::Exit,
                channel,
            });
            self.events.push(CollisionEvent {
                target: other_key,
                other: key,
                other_is_rigidbody: is_rigid,
                phase: ContactPhase::Exit,
                channel,
            });
        }

        self.ids.release(id);
        if is_rigid {
            self.rigid_order.retain(|k| *k != key);
        } else {
            self.static_order.retain(|k| *k != key);
        }
        self.bodies.remove(key);
        log::debug!("detached body id {}", id);
        true
    }

    pub fn body(&self, key: BodyKey) -> Option<&Body> {
        self.bodies.get(key)
    }

    pub fn body_mut(&mut self, key: BodyKey) -> Option<&mut Body> {
        self.bodies.get_mut(key)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Attached rigidbodies in registration order.
    pub fn rigidbodies(&self) -> impl Iterator<Item = (BodyKey, &Body)> + '_ {
        self.rigid_order
            .iter()
            .filter_map(move |k| self.bodies.get(*k).map(|b| (*k, b)))
    }

    /// Take all events queued since the last drain.
    pub fn drain_events(&mut self) -> Vec<CollisionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Push an outward radial force onto every rigidbody near `origin`.
    ///
    /// `intensity` doubles as the force scale and the full-strength
    /// radius; the force fades to nothing over `falloff_radius` beyond
    /// that. The applied force lands in the external accumulator, so it
    /// takes effect on the next step.
    pub fn add_explosion_force(
        &mut self,
        origin: Vec2,
        intensity: f32,
        _radius: f32,
        falloff_radius: f32,
    ) {
        log::debug!(
            "explosion at ({}, {}), intensity {}",
            origin.x,
            origin.y,
            intensity
        );
        for key in &self.rigid_order {
            let Some(body) = self.bodies.get_mut(*key) else {
                continue;
            };
            let rel = body.mass_point - origin;
            let falloff = ((rel.length_squared() - intensity * intensity)
                / (falloff_radius * falloff_radius))
                .clamp(0.0, 1.0);
            let force = rel.normalized() * ((1.0 - falloff) * intensity);
            if let Some(dynamics) = body.dynamics.as_mut() {
                dynamics.external_force += force;
            }
        }
    }

    /// Advance the simulation by one fixed timestep.
    pub fn step(&mut self, dt: f32) {
        self.refresh_bodies();
        let candidates = self.broad_phase();
        let results = self.narrow_phase(&candidates);
        log::trace!(
            "tick: {} candidate pairs, {} with contact",
            candidates.len(),
            results.iter().filter(|(_, _, m)| !m.is_empty()).count()
        );
        self.register_contacts(results);
        self.dispatch_transitions();
        self.resolve_phase();
        self.integrate_phase(dt);
    }

    /// Rebuild dirty colliders, re-derive bounds and snapshot per-tick
    /// state for every body, rigids first.
    fn refresh_bodies(&mut self) {
        for key in self.rigid_order.iter().chain(self.static_order.iter()) {
            if let Some(body) = self.bodies.get_mut(*key) {
                body.update_colliders();
                body.evaluate_bounds();
                body.warmup();
            }
        }
    }

    /// Collect candidate pairs whose body AABBs touch. Each rigidbody
    /// gathers its own pairs; a pair already claimed by an earlier
    /// gatherer is skipped, so every pair is tested at most once per
    /// tick.
    fn broad_phase(&mut self) -> Vec<(BodyKey, BodyKey)> {
        self.tested_pairs.clear();

        let rigid: Vec<BroadEntry> = self
            .rigid_order
            .iter()
            .filter_map(|k| self.bodies.get(*k).map(|b| Self::broad_entry(*k, b)))
            .collect();
        let statics: Vec<BroadEntry> = self
            .static_order
            .iter()
            .filter_map(|k| self.bodies.get(*k).map(|b| Self::broad_entry(*k, b)))
            .collect();

        let mut candidates = Vec::new();
        for entry in &rigid {
            for other in &rigid {
                if entry.key == other.key {
                    continue;
                }
                self.consider_pair(entry, other, &mut candidates);
            }
            for other in &statics {
                self.consider_pair(entry, other, &mut candidates);
            }
        }
        candidates
    }

    fn broad_entry(key: BodyKey, body: &Body) -> BroadEntry {
        BroadEntry {
            key,
            id: body.id,
            layer: body.layer,
            bounds: body.bounds(),
        }
    }

    fn consider_pair(
        &mut self,
        entry: &BroadEntry,
        other: &BroadEntry,
        out: &mut Vec<(BodyKey, BodyKey)>,
    ) {
        if !self.layers.allowed(entry.layer, other.layer) {
            return;
        }
        if !self.tested_pairs.insert(pair_key(entry.id, other.id)) {
            return;
        }
        if !entry.bounds.intersects(&other.bounds) {
            return;
        }
        out.push((entry.key, other.key));
    }

    /// Run collider-level detection over the candidate pairs.
    fn narrow_phase(
        &self,
        candidates: &[(BodyKey, BodyKey)],
    ) -> Vec<(BodyKey, BodyKey, Vec<Manifold>)> {
        #[cfg(feature = "parallel")]
        {
            if self.config.parallel {
                return candidates
                    .par_iter()
                    .map(|&(a, b)| (a, b, self.narrow_pair(a, b)))
                    .collect();
            }
        }
        candidates
            .iter()
            .map(|&(a, b)| (a, b, self.narrow_pair(a, b)))
            .collect()
    }

    /// Manifolds between every collider of `a` and every collider of
    /// `b` whose bounds touch.
    fn narrow_pair(&self, a: BodyKey, b: BodyKey) -> Vec<Manifold> {
        let mut manifolds = Vec::new();
        let (Some(body_a), Some(body_b)) = (self.bodies.get(a), self.bodies.get(b)) else {
            return manifolds;
        };
        for ca in body_a.colliders() {
            for cb in body_b.colliders() {
                if !ca.bounds().intersects(&cb.bounds()) {
                    continue;
                }
                if let Some(manifold) = collision::detect(ca.world_shape(), cb.world_shape()) {
                    manifolds.push(manifold);
                }
            }
        }
        manifolds
    }

    /// File each manifold with the involved bodies: the gatherer records
    /// the overlap and a pending contact, and a rigid counterpart gets
    /// the same manifold from its side. Static counterparts keep their
    /// overlap bookkeeping in the transition pass instead.
    fn register_contacts(&mut self, results: Vec<(BodyKey, BodyKey, Vec<Manifold>)>) {
        for (a_key, b_key, manifolds) in results {
            if manifolds.is_empty() {
                continue;
            }
            let b_is_rigid = self
                .bodies
                .get(b_key)
                .map_or(false, |b| b.is_rigidbody());
            for manifold in manifolds {
                let for_counterpart = if b_is_rigid { Some(manifold.clone()) } else { None };
                if let Some(body_a) = self.bodies.get_mut(a_key) {
                    body_a.current_overlaps.insert(b_key);
                    if let Some(dynamics) = body_a.dynamics.as_mut() {
                        dynamics.contacts.push(PendingContact {
                            manifold,
                            is_body_a: true,
                            other: b_key,
                        });
                    }
                }
                if let Some(manifold) = for_counterpart {
                    if let Some(body_b) = self.bodies.get_mut(b_key) {
                        body_b.current_overlaps.insert(a_key);
                        if let Some(dynamics) = body_b.dynamics.as_mut() {
                            dynamics.contacts.push(PendingContact {
                                manifold,
                                is_body_a: false,
                                other: a_key,
                            });
                        }
                    }
                }
            }
        }
    }

    /// Diff each rigidbody's overlaps against the previous tick and
    /// fire exit, enter and stay events, in that order. Static
    /// counterparts have their overlap sets and events mirrored here;
    /// rigid counterparts run their own diff.
    fn dispatch_transitions(&mut self) {
        let keys: Vec<BodyKey> = self.rigid_order.clone();
        for key in keys {
            let Some(body) = self.bodies.get(key) else {
                continue;
            };
            let self_trigger = body.is_trigger;
            let exits: Vec<BodyKey> = body
                .overlap_set
                .iter()
                .filter(|k| !body.current_overlaps.contains(k))
                .copied()
                .collect();
            let enters: Vec<BodyKey> = body
                .current_overlaps
                .iter()
                .filter(|k| !body.overlap_set.contains(k))
                .copied()
                .collect();
            let stays: Vec<BodyKey> = body
                .overlap_set
                .iter()
                .filter(|k| body.current_overlaps.contains(k))
                .copied()
                .collect();

            for other in exits {
                self.transition(key, self_trigger, other, ContactPhase::Exit);
            }
            for other in enters {
                self.transition(key, self_trigger, other, ContactPhase::Enter);
            }
            for other in stays {
                self.transition(key, self_trigger, other, ContactPhase::Stay);
            }
        }
    }

    fn transition(
        &mut self,
        key: BodyKey,
        self_trigger: bool,
        other_key: BodyKey,
        phase: ContactPhase,
    ) {
        let (other_exists, other_is_rigid, other_trigger) = match self.bodies.get(other_key) {
            Some(other) => (true, other.is_rigidbody(), other.is_trigger),
            None => (false, false, false),
        };

        if let Some(body) = self.bodies.get_mut(key) {
            match phase {
                ContactPhase::Exit => {
                    body.overlap_set.remove(&other_key);
                }
                ContactPhase::Enter => {
                    if other_exists {
                        body.overlap_set.insert(other_key);
                    }
                }
                ContactPhase::Stay => {}
            }
        }

        let channel = if self_trigger || other_trigger {
            EventChannel::Trigger
        } else {
            EventChannel::Collision
        };
        self.events.push(CollisionEvent {
            target: key,
            other: other_key,
            other_is_rigidbody: other_is_rigid,
            phase,
            channel,
        });

        if other_exists && !other_is_rigid {
            if let Some(other) = self.bodies.get_mut(other_key) {
                match phase {
                    ContactPhase::Exit => {
                        other.overlap_set.remove(&key);
                    }
                    ContactPhase::Enter => {
                        other.overlap_set.insert(key);
                    }
                    ContactPhase::Stay => {}
                }
            }
            self.events.push(CollisionEvent {
                target: other_key,
                other: key,
                other_is_rigidbody: true,
                phase,
                channel,
            });
        }
    }

    fn resolve_phase(&mut self) {
        let gravity = self.config.gravity;
        let keys: Vec<BodyKey> = self.rigid_order.clone();
        for key in keys {
            self.resolve_body(key, gravity);
        }
    }

    /// Accumulate forces for one rigidbody, drain its pending contacts
    /// most recent first, then clamp creeping velocities to zero.
    fn resolve_body(&mut self, key: BodyKey, gravity: Vec2) {
        {
            let Some(body) = self.bodies.get_mut(key) else {
                return;
            };
            let mass = body.mass();
            let Some(dynamics) = body.dynamics.as_mut() else {
                return;
            };
            dynamics.corrections.clear();
            dynamics.force += gravity.component_mul(dynamics.gravity_multiplier) * mass;
            dynamics.force += dynamics.external_force;
            dynamics.torque += dynamics.external_torque;

            // Quadratic drag opposing the current velocity.
            let speed_sq = dynamics.velocity.length_squared();
            if speed_sq > 0.0 {
                let drag = 0.5 * dynamics.volume_density * dynamics.drag_coefficient * speed_sq;
                dynamics.force -= dynamics.velocity.normalized() * drag;
            }
        }

        loop {
            let contact = match self.bodies.get_mut(key).and_then(|b| b.dynamics.as_mut()) {
                Some(dynamics) => dynamics.contacts.pop(),
                None => return,
            };
            let Some(contact) = contact else {
                break;
            };
            self.resolve_contact(key, contact);
        }

        if let Some(dynamics) = self.bodies.get_mut(key).and_then(|b| b.dynamics.as_mut()) {
            if dynamics.velocity.length_squared() <= VELOCITY_CLAMP_SQ {
                dynamics.velocity = Vec2::ZERO;
            }
            if dynamics.angular_velocity.abs() <= ANGULAR_VELOCITY_CLAMP {
                dynamics.angular_velocity = 0.0;
            }
        }
    }

    /// Apply one contact: per-point normal impulses with restitution,
    /// surface friction on the resolving body, normal force
    /// cancellation and queued positional correction.
    fn resolve_contact(&mut self, key: BodyKey, contact: PendingContact) {
        let PendingContact {
            manifold,
            is_body_a,
            other: other_key,
        } = contact;

        let (
            self_trigger,
            mass_point,
            inv_mass,
            inv_inertia,
            velocity,
            angular_velocity,
            restitution,
            roughness,
            force,
        ) = {
            let Some(body) = self.bodies.get(key) else {
                return;
            };
            let Some(dynamics) = body.dynamics() else {
                return;
            };
            (
                body.is_trigger,
                body.mass_point,
                body.inv_mass(),
                body.inv_inertia(),
                dynamics.velocity,
                dynamics.angular_velocity,
                dynamics.restitution,
                body.roughness,
                dynamics.force,
            )
        };

        // A counterpart detached mid-tick leaves a stale contact; drop it.
        let Some(other) = self.bodies.get(other_key) else {
            return;
        };
        if self_trigger || other.is_trigger {
            return;
        }

        let other_rigid = other.is_rigidbody();
        let other_mass_point = other.mass_point;
        let other_inv_mass = other.inv_mass();
        let other_inv_inertia = other.inv_inertia();
        let other_roughness = other.roughness;
        let (other_velocity, other_angular, bounce) = match other.dynamics() {
            Some(dynamics) => (
                dynamics.velocity,
                dynamics.angular_velocity,
                (restitution + dynamics.restitution) * 0.5,
            ),
            // Static surfaces contribute no restitution of their own.
            None => (Vec2::ZERO, 0.0, restitution),
        };

        let normal = manifold.resolving_normal(is_body_a);
        // Friction and force cancellation act against the counterpart's
        // surface, not the collision normal.
        let surface = if is_body_a {
            manifold.edge_normal_b
        } else {
            manifold.edge_normal_a
        };
        let friction_coef = (roughness * 0.1).min(other_roughness * 0.1);
        let normal_force = normal * force.dot(normal);

        let point_count = manifold.points.len();
        let mut delta_v = Vec2::ZERO;
        let mut delta_w = 0.0;
        let mut other_delta_v = Vec2::ZERO;
        let mut other_delta_w = 0.0;

        for point in &manifold.points {
            let rad_a = *point - mass_point;
            let rad_b = *point - other_mass_point;
            let rel_vel = velocity + rad_a.cross_scalar(angular_velocity)
                - other_velocity
                - rad_b.cross_scalar(other_angular);
            let contact_vel = rel_vel.dot(normal);
            // Only close on approaching points.
            if contact_vel >= 0.0 {
                continue;
            }

            let inv_mass_sum = inv_mass
                + other_inv_mass
                + rad_a.cross(normal).powi(2) * inv_inertia
                + rad_b.cross(normal).powi(2) * other_inv_inertia;
            if inv_mass_sum == 0.0 {
                continue;
            }

            let j = -(1.0 + bounce) * contact_vel / inv_mass_sum / point_count as f32;
            let impulse = normal * j;

            delta_v += impulse * inv_mass;
            delta_w += inv_inertia * rad_a.cross(impulse);
            if other_rigid {
                other_delta_v -= impulse * other_inv_mass;
                other_delta_w -= other_inv_inertia * rad_b.cross(impulse);
            }

            // Friction caps the post-impulse tangential speed.
            let post_impulse_vel = velocity + impulse * inv_mass;
            let tangent = surface.perp();
            let tan_speed = tangent.dot(post_impulse_vel);
            if tan_speed != 0.0 {
                let dir = tangent * tan_speed.signum();
                let friction_vel = dir * (tan_speed.abs() / point_count as f32);
                let friction_cap = dir * (friction_coef / point_count as f32);
                let applied = if friction_vel.length_squared() > friction_cap.length_squared() {
                    friction_cap
                } else {
                    friction_vel
                };
                delta_v -= applied * inv_mass;
                delta_w -= inv_inertia * rad_a.cross(applied);
            }
        }

        if let Some(body) = self.bodies.get_mut(key) {
            if let Some(dynamics) = body.dynamics.as_mut() {
                dynamics.velocity += delta_v;
                dynamics.angular_velocity += delta_w;
                // Cancel the force component pressing into the surface.
                if dynamics.force.dot(surface) < 0.0 {
                    dynamics.force -= normal_force;
                }
                if manifold.penetration > SLOP {
                    let share = if other_rigid { 0.5 } else { 1.0 };
                    dynamics.corrections.push(
                        normal * (manifold.penetration * POSITION_CORRECTION_MOD * share),
                    );
                }
            }
        }
        if other_rigid {
            if let Some(other) = self.bodies.get_mut(other_key) {
                if let Some(dynamics) = other.dynamics.as_mut() {
                    dynamics.velocity += other_delta_v;
                    dynamics.angular_velocity += other_delta_w;
                }
            }
        }
    }

    /// Semi-implicit Euler step: velocities from accumulated forces,
    /// then positions from velocities, plus the averaged positional
    /// correction. Accumulators are zeroed for the next tick.
    fn integrate_phase(&mut self, dt: f32) {
        let keys: Vec<BodyKey> = self.rigid_order.clone();
        for key in keys {
            let Some(body) = self.bodies.get_mut(key) else {
                continue;
            };
            let mass = body.mass();
            let inertia = body.inertia();
            let mut position = body.position();
            let mut rotation = body.rotation();
            {
                let Some(dynamics) = body.dynamics.as_mut() else {
                    continue;
                };

                dynamics.acceleration = if mass == 0.0 {
                    Vec2::ZERO
                } else {
                    dynamics.force / mass
                };
                dynamics.angular_acceleration = if inertia == 0.0 {
                    0.0
                } else {
                    dynamics.torque / inertia
                };

                dynamics.velocity += dynamics.acceleration * dt;
                dynamics.angular_velocity += dynamics.angular_acceleration * dt;

                if dynamics.lock_axis.contains(AxisLock::X) {
                    dynamics.velocity.x = 0.0;
                }
                if dynamics.lock_axis.contains(AxisLock::Y) {
                    dynamics.velocity.y = 0.0;
                }
                if dynamics.lock_axis.contains(AxisLock::ROTATION) {
                    dynamics.angular_velocity = 0.0;
                }

                if dynamics.velocity.length_squared() <= VELOCITY_CLAMP_SQ {
                    dynamics.velocity = Vec2::ZERO;
                }

                position += dynamics.velocity * dt;
                // Angular velocity is a per-tick rate in degrees.
                rotation += dynamics.angular_velocity;

                dynamics.force = Vec2::ZERO;
                dynamics.torque = 0.0;
                dynamics.external_force = Vec2::ZERO;
                dynamics.external_torque = 0.0;

                if !dynamics.corrections.is_empty() {
                    let sum = dynamics
                        .corrections
                        .iter()
                        .fold(Vec2::ZERO, |acc, c| acc + *c);
                    position += sum / dynamics.corrections.len() as f32;
                    dynamics.corrections.clear();
                }
            }
            body.set_position(position);
            body.set_rotation(rotation);
        }
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}
