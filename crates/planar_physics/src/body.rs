//! Bodies: static compound colliders and rigidbodies.
//!
//! A [`Body`] owns its transform and a compound of colliders. Static bodies
//! only block and report overlaps; attaching [`Dynamics`] makes a body a
//! rigidbody that accumulates forces, resolves contacts and integrates.

use std::collections::HashSet;

use bitflags::bitflags;
use planar_math::{Transform2D, Vec2};
use slotmap::new_key_type;

use crate::collider::Collider;
use crate::collision::Manifold;
use crate::shapes::Aabb2D;

new_key_type! {
    /// Registry handle for an attached body.
    pub struct BodyKey;
}

/// Moment arms with a cross product below this produce no torque.
const TORQUE_EPSILON: f32 = 0.01;

bitflags! {
    /// Velocity and rotation components zeroed during integration.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct AxisLock: u8 {
        const X = 1;
        const Y = 2;
        const ROTATION = 4;
    }
}

/// Dynamic state carried only by rigidbodies.
#[derive(Debug, Clone)]
pub struct Dynamics {
    pub velocity: Vec2,
    /// Angular velocity in degrees per tick.
    pub angular_velocity: f32,
    /// Acceleration of the last integration step, kept for inspection.
    pub acceleration: Vec2,
    pub angular_acceleration: f32,
    /// Componentwise factor on world gravity.
    pub gravity_multiplier: Vec2,
    pub density: f32,
    pub restitution: f32,
    /// Density of the medium the body moves through, for drag.
    pub volume_density: f32,
    pub drag_coefficient: f32,
    pub lock_axis: AxisLock,
    pub(crate) external_force: Vec2,
    pub(crate) external_torque: f32,
    pub(crate) force: Vec2,
    pub(crate) torque: f32,
    pub(crate) contacts: Vec<PendingContact>,
    pub(crate) corrections: Vec<Vec2>,
}

impl Default for Dynamics {
    fn default() -> Self {
        Self {
            velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            acceleration: Vec2::ZERO,
            angular_acceleration: 0.0,
            gravity_multiplier: Vec2::ONE,
            density: 1.175,
            restitution: 0.9,
            volume_density: 1.2,
            drag_coefficient: 0.45,
            lock_axis: AxisLock::empty(),
            external_force: Vec2::ZERO,
            external_torque: 0.0,
            force: Vec2::ZERO,
            torque: 0.0,
            contacts: Vec::new(),
            corrections: Vec::new(),
        }
    }
}

/// A raw contact gathered during the narrow phase, waiting for the resolver.
#[derive(Debug, Clone)]
pub(crate) struct PendingContact {
    pub manifold: Manifold,
    pub is_body_a: bool,
    pub other: BodyKey,
}

/// A simulated body.
///
/// Mass, inertia and bounds are aggregated over the colliders whenever the
/// body is refreshed; constructors refresh immediately so a body is fully
/// queryable before its first tick.
#[derive(Debug, Clone)]
pub struct Body {
    transform: Transform2D,
    colliders: Vec<Collider>,
    pub layer: u8,
    pub is_trigger: bool,
    pub roughness: f32,
    pub(crate) id: u16,
    pub(crate) is_valid: bool,
    pub(crate) mass_point: Vec2,
    pub(crate) overlap_set: HashSet<BodyKey>,
    pub(crate) current_overlaps: HashSet<BodyKey>,
    area: f32,
    mass: f32,
    inv_mass: f32,
    inertia: f32,
    inv_inertia: f32,
    bounds: Aabb2D,
    pub(crate) dynamics: Option<Dynamics>,
}

impl Body {
    /// Immovable body.
    pub fn new_static(position: Vec2, colliders: Vec<Collider>) -> Self {
        Self::construct(position, colliders, None)
    }

    /// Dynamic body with default material parameters.
    pub fn new_rigid(position: Vec2, colliders: Vec<Collider>) -> Self {
        Self::construct(position, colliders, Some(Dynamics::default()))
    }

    fn construct(position: Vec2, colliders: Vec<Collider>, dynamics: Option<Dynamics>) -> Self {
        let mut body = Self {
            transform: Transform2D::from_position(position),
            colliders,
            layer: 0,
            is_trigger: false,
            roughness: 0.5,
            id: 0,
            is_valid: false,
            mass_point: position,
            overlap_set: HashSet::new(),
            current_overlaps: HashSet::new(),
            area: 0.0,
            mass: 0.0,
            inv_mass: 0.0,
            inertia: 0.0,
            inv_inertia: 0.0,
            bounds: Aabb2D::ZERO,
            dynamics,
        };
        body.refresh();
        body
    }

    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.set_rotation(degrees);
        self.refresh();
        self
    }

    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.set_scale(scale);
        self.refresh();
        self
    }

    pub fn with_layer(mut self, layer: u8) -> Self {
        self.layer = layer;
        self
    }

    pub fn with_trigger(mut self, is_trigger: bool) -> Self {
        self.is_trigger = is_trigger;
        self
    }

    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness;
        self
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        if let Some(d) = self.dynamics.as_mut() {
            d.velocity = velocity;
        }
        self
    }

    pub fn with_restitution(mut self, restitution: f32) -> Self {
        if let Some(d) = self.dynamics.as_mut() {
            d.restitution = restitution;
        }
        self
    }

    pub fn with_density(mut self, density: f32) -> Self {
        if let Some(d) = self.dynamics.as_mut() {
            d.density = density;
            for collider in &mut self.colliders {
                collider.mark_dirty();
            }
            self.refresh();
        }
        self
    }

    pub fn with_gravity_multiplier(mut self, multiplier: Vec2) -> Self {
        if let Some(d) = self.dynamics.as_mut() {
            d.gravity_multiplier = multiplier;
        }
        self
    }

    pub fn with_drag(mut self, volume_density: f32, drag_coefficient: f32) -> Self {
        if let Some(d) = self.dynamics.as_mut() {
            d.volume_density = volume_density;
            d.drag_coefficient = drag_coefficient;
        }
        self
    }

    pub fn with_lock_axis(mut self, lock: AxisLock) -> Self {
        if let Some(d) = self.dynamics.as_mut() {
            d.lock_axis = lock;
        }
        self
    }

    pub fn position(&self) -> Vec2 {
        self.transform.position
    }

    /// Teleport the body. Colliders keep their baked rotation and scale, so
    /// no rebake is needed; world shapes catch up on the next refresh.
    pub fn set_position(&mut self, position: Vec2) {
        self.transform.position = position;
    }

    pub fn rotation(&self) -> f32 {
        self.transform.rotation
    }

    pub fn set_rotation(&mut self, degrees: f32) {
        if self.transform.rotation != degrees {
            self.transform.rotation = degrees;
            self.mark_colliders_dirty();
        }
    }

    pub fn scale(&self) -> Vec2 {
        self.transform.scale
    }

    pub fn set_scale(&mut self, scale: Vec2) {
        if self.transform.scale != scale {
            self.transform.scale = scale;
            self.mark_colliders_dirty();
        }
    }

    pub fn transform(&self) -> Transform2D {
        self.transform
    }

    pub fn id(&self) -> u16 {
        self.id
    }

    pub fn is_rigidbody(&self) -> bool {
        self.dynamics.is_some()
    }

    pub fn dynamics(&self) -> Option<&Dynamics> {
        self.dynamics.as_ref()
    }

    pub fn dynamics_mut(&mut self) -> Option<&mut Dynamics> {
        self.dynamics.as_mut()
    }

    pub fn colliders(&self) -> &[Collider] {
        &self.colliders
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn inv_mass(&self) -> f32 {
        self.inv_mass
    }

    pub fn inertia(&self) -> f32 {
        self.inertia
    }

    pub fn inv_inertia(&self) -> f32 {
        self.inv_inertia
    }

    pub fn area(&self) -> f32 {
        self.area
    }

    pub fn bounds(&self) -> Aabb2D {
        self.bounds
    }

    pub fn mass_point(&self) -> Vec2 {
        self.mass_point
    }

    /// Queue a world-space force for the next tick. An off-center application
    /// point also queues the torque it produces about the mass point.
    pub fn add_force(&mut self, force: Vec2, world_point: Vec2) {
        if let Some(d) = self.dynamics.as_mut() {
            d.external_force += force;
        }
        self.add_torque(force, world_point);
    }

    /// Queue the torque an off-center force produces about the mass point.
    /// Near-parallel moment arms produce no torque.
    pub fn add_torque(&mut self, force: Vec2, world_point: Vec2) {
        let rad = world_point - self.mass_point;
        if let Some(d) = self.dynamics.as_mut() {
            let torque = rad.cross(force);
            if torque.abs() > TORQUE_EPSILON {
                d.external_torque += torque;
            }
        }
    }

    /// Instantaneous velocity change from an impulse at a world-space point.
    pub fn add_impulse(&mut self, direction: Vec2, magnitude: f32, world_point: Vec2) {
        let rad = world_point - self.transform.position;
        self.apply_impulse(direction * magnitude, rad);
    }

    pub(crate) fn apply_impulse(&mut self, impulse: Vec2, rad: Vec2) {
        let inv_mass = self.inv_mass;
        let inv_inertia = self.inv_inertia;
        if let Some(d) = self.dynamics.as_mut() {
            d.velocity += impulse * inv_mass;
            d.angular_velocity += inv_inertia * rad.cross(impulse);
        }
    }

    fn mark_colliders_dirty(&mut self) {
        for collider in &mut self.colliders {
            collider.mark_dirty();
        }
    }

    /// Rebake dirty colliders, refresh world shapes at the current position
    /// and aggregate mass properties. Static bodies bake with zero density,
    /// leaving them with zero inverse mass.
    pub(crate) fn update_colliders(&mut self) {
        let density = self.dynamics.as_ref().map_or(0.0, |d| d.density);
        let transform = self.transform;

        self.area = 0.0;
        self.mass = 0.0;
        self.inertia = 0.0;
        for collider in &mut self.colliders {
            if collider.needs_rebuild() {
                collider.rebuild(&transform, density);
            }
            collider.refresh_world(transform.position);
            self.area += collider.area();
            self.mass += collider.mass();
            self.inertia += collider.inertia();
        }

        self.inv_mass = if self.mass == 0.0 { 0.0 } else { 1.0 / self.mass };
        self.inv_inertia = if self.inertia == 0.0 {
            0.0
        } else {
            1.0 / self.inertia
        };
    }

    /// Union of the collider bounds, or a degenerate box at the body position
    /// when there are none.
    pub(crate) fn evaluate_bounds(&mut self) {
        let mut iter = self.colliders.iter();
        self.bounds = match iter.next() {
            Some(first) => iter.fold(first.bounds(), |acc, c| acc.union(&c.bounds())),
            None => Aabb2D::from_center_half_extents(self.transform.position, Vec2::ZERO),
        };
    }

    /// Reset per-tick transient state before the broad phase.
    pub(crate) fn warmup(&mut self) {
        self.mass_point = self.transform.position;
        self.current_overlaps.clear();
    }

    pub(crate) fn refresh(&mut self) {
        self.update_colliders();
        self.evaluate_bounds();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn unit_square_rigid(position: Vec2) -> Body {
        Body::new_rigid(position, vec![Collider::rect(Vec2::ONE, Vec2::ZERO)]).with_density(1.0)
    }

    // ===== Mass aggregation =====

    #[test]
    fn test_rigid_unit_square_has_unit_mass_and_fan_inertia() {
        let body = unit_square_rigid(Vec2::ZERO);

        assert!(approx(body.mass(), 1.0));
        assert!(approx(body.inv_mass(), 1.0));
        assert!(approx(body.inertia(), 1.0 / 6.0));
        assert!(approx(body.inv_inertia(), 6.0));
        assert!(approx(body.area(), 1.0));
    }

    #[test]
    fn test_compound_colliders_sum_their_mass() {
        let body = Body::new_rigid(
            Vec2::ZERO,
            vec![
                Collider::rect(Vec2::ONE, Vec2::new(-1.0, 0.0)),
                Collider::rect(Vec2::ONE, Vec2::new(1.0, 0.0)),
            ],
        )
        .with_density(1.0);

        assert!(approx(body.mass(), 2.0));
        assert!(approx(body.area(), 2.0));
    }

    #[test]
    fn test_static_bodies_have_zero_inverse_mass() {
        let body = Body::new_static(Vec2::ZERO, vec![Collider::rect(Vec2::ONE, Vec2::ZERO)]);

        assert_eq!(body.mass(), 0.0);
        assert_eq!(body.inv_mass(), 0.0);
        assert_eq!(body.inv_inertia(), 0.0);
    }

    #[test]
    fn test_default_density_weights_the_mass() {
        let body = Body::new_rigid(Vec2::ZERO, vec![Collider::rect(Vec2::ONE, Vec2::ZERO)]);
        assert!(approx(body.mass(), 1.175));
    }

    // ===== Bounds =====

    #[test]
    fn test_bounds_are_valid_immediately_after_construction() {
        let body = Body::new_static(
            Vec2::new(3.0, 4.0),
            vec![Collider::rect(Vec2::new(2.0, 2.0), Vec2::ZERO)],
        );

        let bounds = body.bounds();
        assert!(approx(bounds.min.x, 2.0));
        assert!(approx(bounds.min.y, 3.0));
        assert!(approx(bounds.max.x, 4.0));
        assert!(approx(bounds.max.y, 5.0));
    }

    #[test]
    fn test_bounds_cover_every_collider() {
        let body = Body::new_static(
            Vec2::ZERO,
            vec![
                Collider::rect(Vec2::ONE, Vec2::new(-2.0, 0.0)),
                Collider::circle(0.5, Vec2::new(2.0, 0.0)),
            ],
        );

        let bounds = body.bounds();
        assert!(approx(bounds.min.x, -2.5));
        assert!(approx(bounds.max.x, 2.5));
    }

    #[test]
    fn test_a_body_without_colliders_gets_a_point_bound() {
        let body = Body::new_static(Vec2::new(7.0, -2.0), Vec::new());

        let bounds = body.bounds();
        assert_eq!(bounds.min, Vec2::new(7.0, -2.0));
        assert_eq!(bounds.max, Vec2::new(7.0, -2.0));
    }

    #[test]
    fn test_rotating_a_body_rebakes_its_colliders() {
        let mut body = Body::new_rigid(
            Vec2::ZERO,
            vec![Collider::rect(Vec2::new(4.0, 1.0), Vec2::ZERO)],
        );
        body.set_rotation(90.0);
        body.refresh();

        let bounds = body.bounds();
        assert!(approx(bounds.size().x, 1.0));
        assert!(approx(bounds.size().y, 4.0));
    }

    // ===== Forces and impulses =====

    #[test]
    fn test_centered_force_produces_no_torque() {
        let mut body = unit_square_rigid(Vec2::ZERO);
        body.add_force(Vec2::new(0.0, 10.0), Vec2::ZERO);

        let d = body.dynamics().unwrap();
        assert_eq!(d.external_force, Vec2::new(0.0, 10.0));
        assert_eq!(d.external_torque, 0.0);
    }

    #[test]
    fn test_off_center_force_adds_torque_about_the_mass_point() {
        let mut body = unit_square_rigid(Vec2::ZERO);
        body.add_force(Vec2::new(0.0, 10.0), Vec2::new(1.0, 0.0));

        let d = body.dynamics().unwrap();
        assert_eq!(d.external_force, Vec2::new(0.0, 10.0));
        assert!(approx(d.external_torque, 10.0));
    }

    #[test]
    fn test_negligible_moment_arms_are_skipped() {
        let mut body = unit_square_rigid(Vec2::ZERO);
        body.add_force(Vec2::new(0.0, 1.0), Vec2::new(0.005, 0.0));

        assert_eq!(body.dynamics().unwrap().external_torque, 0.0);
    }

    #[test]
    fn test_impulses_change_velocity_immediately() {
        let mut body = unit_square_rigid(Vec2::ZERO);
        body.add_impulse(Vec2::X, 2.0, Vec2::ZERO);

        let d = body.dynamics().unwrap();
        assert!(approx(d.velocity.x, 2.0));
        assert_eq!(d.angular_velocity, 0.0);
    }

    #[test]
    fn test_off_center_impulses_also_spin_the_body() {
        let mut body = unit_square_rigid(Vec2::ZERO);
        body.add_impulse(Vec2::X, 2.0, Vec2::new(0.0, 1.0));

        let d = body.dynamics().unwrap();
        assert!(approx(d.velocity.x, 2.0));
        // cross((0,1), (2,0)) = -2, times the inverse inertia of 6.
        assert!(approx(d.angular_velocity, -12.0));
    }

    #[test]
    fn test_force_apis_are_no_ops_on_static_bodies() {
        let mut body = Body::new_static(Vec2::ZERO, vec![Collider::rect(Vec2::ONE, Vec2::ZERO)]);
        body.add_force(Vec2::X, Vec2::new(0.0, 5.0));
        body.add_impulse(Vec2::X, 10.0, Vec2::ZERO);

        assert!(body.dynamics().is_none());
    }

    // ===== Warmup =====

    #[test]
    fn test_warmup_snapshots_the_mass_point() {
        let mut body = unit_square_rigid(Vec2::ZERO);
        body.set_position(Vec2::new(4.0, 2.0));
        assert_eq!(body.mass_point(), Vec2::ZERO);

        body.warmup();
        assert_eq!(body.mass_point(), Vec2::new(4.0, 2.0));
    }
}
