//! Narrow-phase collision detection between world-space shapes.
//!
//! All detectors are stateless: they take two shapes and return a contact
//! manifold, or `None` when the shapes are separated. Polygons must be convex
//! and wound counter-clockwise; every edge normal derived here points outward.

use planar_math::Vec2;

use crate::shapes::{Circle, ConvexPolygon, Shape};

/// Contact data produced by the narrow phase for one shape pair.
///
/// `normal` is stored in a detector-chosen orientation; resolvers should go
/// through [`Manifold::resolving_normal`] to get the direction that pushes
/// their own side out of the contact. `edge_normal_a` and `edge_normal_b` are
/// the outward surface normals of the contacting features of the first and
/// second argument respectively, used for friction and force cancellation.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifold {
    pub points: Vec<Vec2>,
    pub normal: Vec2,
    pub penetration: f32,
    /// Sign gauge relating `normal` to the first argument; consumed by
    /// [`Manifold::resolving_normal`].
    pub body_a_incident: bool,
    pub edge_normal_a: Vec2,
    pub edge_normal_b: Vec2,
}

impl Manifold {
    /// A registered collision with no usable contact points. Produced when
    /// clipping degenerates; the pair still counts as overlapping for event
    /// bookkeeping but generates no impulses.
    fn empty() -> Self {
        Self {
            points: Vec::new(),
            normal: Vec2::ZERO,
            penetration: 0.0,
            body_a_incident: false,
            edge_normal_a: Vec2::ZERO,
            edge_normal_b: Vec2::ZERO,
        }
    }

    /// The same contact seen from the opposite argument order.
    pub fn mirrored(self) -> Self {
        Self {
            points: self.points,
            normal: -self.normal,
            penetration: self.penetration,
            body_a_incident: self.body_a_incident,
            edge_normal_a: self.edge_normal_b,
            edge_normal_b: self.edge_normal_a,
        }
    }

    /// Collision normal oriented to push the given side out of the other body.
    pub fn resolving_normal(&self, is_body_a: bool) -> Vec2 {
        if is_body_a == self.body_a_incident {
            self.normal
        } else {
            -self.normal
        }
    }
}

/// Narrow-phase entry point, dispatching on the shape kinds.
pub fn detect(a: &Shape, b: &Shape) -> Option<Manifold> {
    match (a, b) {
        (Shape::Circle(ca), Shape::Circle(cb)) => circle_circle(ca, cb),
        (Shape::Polygon(pa), Shape::Polygon(pb)) => polygon_polygon(pa, pb),
        (Shape::Polygon(p), Shape::Circle(c)) => polygon_circle(p, c),
        (Shape::Circle(c), Shape::Polygon(p)) => polygon_circle(p, c).map(Manifold::mirrored),
    }
}

/// Circle versus circle.
///
/// The lexicographically smaller center is always treated as the reference
/// body, so the manifold is deterministic under argument order.
pub fn circle_circle(a: &Circle, b: &Circle) -> Option<Manifold> {
    let flip = b.center.x < a.center.x || (b.center.x == a.center.x && b.center.y < a.center.y);
    let (reference, other) = if flip { (b, a) } else { (a, b) };

    let rel = other.center - reference.center;
    let r_sum = reference.radius + other.radius;
    if rel.length_squared() > r_sum * r_sum {
        return None;
    }

    let (normal, penetration, point) = if rel.length_squared() == 0.0 {
        // Concentric centers leave no direction to separate along.
        (Vec2::Y, a.radius, a.center)
    } else {
        let dist = rel.length();
        let normal = rel / dist;
        (normal, r_sum - dist, reference.center + normal * reference.radius)
    };

    let (edge_normal_a, edge_normal_b) = if flip { (-normal, normal) } else { (normal, -normal) };

    Some(Manifold {
        points: vec![point],
        normal,
        penetration,
        body_a_incident: flip,
        edge_normal_a,
        edge_normal_b,
    })
}

/// Convex polygon versus convex polygon, separating-axis test with
/// reference/incident edge clipping for the contact points.
pub fn polygon_polygon(p1: &ConvexPolygon, p2: &ConvexPolygon) -> Option<Manifold> {
    let mut best = BestAxis::new();

    for i in 0..p1.len() {
        let axis = edge_normal(p1.vertices[i], p1.vertices[p1.next_index(i)]);
        if !best.consider(axis, project_polygon(p1, axis), project_polygon(p2, axis)) {
            return None;
        }
    }
    for i in 0..p2.len() {
        let axis = edge_normal(p2.vertices[i], p2.vertices[p2.next_index(i)]);
        if !best.consider(axis, project_polygon(p1, axis), project_polygon(p2, axis)) {
            return None;
        }
    }

    let axis = best.axis;
    let (mut reference, mut incident, mut ref_is_a) = if best.a_first {
        (best_edge(p1, axis), best_edge(p2, -axis), true)
    } else {
        (best_edge(p2, axis), best_edge(p1, -axis), false)
    };

    // The clip wants the edge more perpendicular to the axis as reference.
    let ref_dir = reference.b - reference.a;
    let inc_dir = incident.b - incident.a;
    if inc_dir.dot(axis).abs() < ref_dir.dot(axis).abs() {
        std::mem::swap(&mut reference, &mut incident);
        ref_is_a = !ref_is_a;
    }

    let ref_dir = (reference.b - reference.a).normalized();

    let clipped = clip(incident.a, incident.b, ref_dir, ref_dir.dot(reference.a));
    if clipped.len() < 2 {
        return Some(Manifold::empty());
    }
    let mut points = clip(clipped[0], clipped[1], -ref_dir, -ref_dir.dot(reference.b));
    if points.len() < 2 {
        return Some(Manifold::empty());
    }

    let ref_normal = edge_normal(reference.a, reference.b);
    let inc_normal = edge_normal(incident.a, incident.b);

    // Points in front of the reference face are not supporting contacts.
    if ref_normal.dot(points[1] - reference.a) > 0.0 {
        points.remove(1);
    }
    if ref_normal.dot(points[0] - reference.a) > 0.0 {
        points.remove(0);
    }

    let (edge_normal_a, edge_normal_b) = if ref_is_a {
        (ref_normal, inc_normal)
    } else {
        (inc_normal, ref_normal)
    };

    Some(Manifold {
        points,
        normal: -axis,
        penetration: best.overlap,
        body_a_incident: best.a_first,
        edge_normal_a,
        edge_normal_b,
    })
}

/// Convex polygon versus circle.
///
/// Runs the polygon's edge axes plus one axis toward the vertex nearest the
/// circle center, then picks a face or corner contact by testing the center
/// against the Voronoi regions beside the reference edge.
pub fn polygon_circle(poly: &ConvexPolygon, circle: &Circle) -> Option<Manifold> {
    let mut best = BestAxis::new();

    for i in 0..poly.len() {
        let axis = edge_normal(poly.vertices[i], poly.vertices[poly.next_index(i)]);
        if !best.consider(axis, project_polygon(poly, axis), project_circle(circle, axis)) {
            return None;
        }
    }

    // Extra axis toward the nearest vertex catches corner contacts that no
    // face normal separates.
    let mut nearest = poly.vertices[0];
    let mut nearest_dist = (circle.center - nearest).length_squared();
    for v in poly.vertices.iter().skip(1) {
        let d = (circle.center - *v).length_squared();
        if d < nearest_dist {
            nearest_dist = d;
            nearest = *v;
        }
    }
    let vertex_axis = (circle.center - nearest).normalized();
    if !best.consider(
        vertex_axis,
        project_polygon(poly, vertex_axis),
        project_circle(circle, vertex_axis),
    ) {
        return None;
    }

    let mut axis = best.axis;
    if !best.a_first {
        axis = -axis;
    }

    let reference = best_edge(poly, axis);
    let ref_normal = edge_normal(reference.a, reference.b);

    let left_vertex = poly.vertices[poly.prev_index(reference.ia)];
    let right_vertex = poly.vertices[poly.next_index(reference.ib)];
    let norm_left = edge_normal_raw(left_vertex, reference.a);
    let norm_right = edge_normal_raw(reference.b, right_vertex);
    let left_rel = circle.center - reference.a;
    let right_rel = circle.center - reference.b;

    let point = if norm_left.dot(left_rel) > 0.0 && ref_normal.dot(left_rel) > 0.0 {
        circle.center - left_rel.normalized() * circle.radius
    } else if norm_right.dot(right_rel) > 0.0 && ref_normal.dot(right_rel) > 0.0 {
        circle.center - right_rel.normalized() * circle.radius
    } else {
        circle.center - ref_normal * circle.radius
    };

    Some(Manifold {
        points: vec![point],
        normal: axis,
        penetration: best.overlap,
        body_a_incident: false,
        edge_normal_a: ref_normal,
        edge_normal_b: (point - circle.center).normalized(),
    })
}

/// Projection of a shape onto an axis.
#[derive(Debug, Clone, Copy)]
struct Projection {
    min: f32,
    max: f32,
}

impl Projection {
    fn overlaps(self, other: Projection) -> bool {
        self.min <= other.max && other.min <= self.max
    }

    fn contains(self, other: Projection) -> bool {
        other.min >= self.min && self.max >= other.max
    }
}

/// Minimum-overlap axis tracker for the separating-axis scan.
struct BestAxis {
    axis: Vec2,
    overlap: f32,
    a_first: bool,
}

impl BestAxis {
    fn new() -> Self {
        Self {
            axis: Vec2::ZERO,
            overlap: f32::MAX,
            a_first: true,
        }
    }

    /// Folds one candidate axis into the running minimum. Returns `false`
    /// when the projections are separated on this axis, which ends the scan.
    fn consider(&mut self, axis: Vec2, p1: Projection, p2: Projection) -> bool {
        if !p1.overlaps(p2) {
            return false;
        }

        let a_first = p1.min <= p2.min;
        let mut amount = if a_first { p1.max - p2.min } else { p2.max - p1.min };

        // A nested interval under-reports penetration by the plain overlap,
        // so add the smaller boundary gap back in.
        if p1.contains(p2) || p2.contains(p1) {
            amount += (p1.min - p2.min).abs().min((p1.max - p2.max).abs());
        }

        if amount < self.overlap {
            self.overlap = amount;
            self.axis = axis;
            self.a_first = a_first;
        }

        true
    }
}

fn project_polygon(poly: &ConvexPolygon, axis: Vec2) -> Projection {
    let mut min = f32::MAX;
    let mut max = f32::MIN;
    for v in &poly.vertices {
        let d = v.dot(axis);
        min = min.min(d);
        max = max.max(d);
    }
    Projection { min, max }
}

fn project_circle(circle: &Circle, axis: Vec2) -> Projection {
    let center = circle.center.dot(axis);
    Projection {
        min: center - circle.radius,
        max: center + circle.radius,
    }
}

/// A directed polygon edge with the vertex indices it spans.
#[derive(Debug, Clone, Copy)]
struct Edge {
    a: Vec2,
    b: Vec2,
    ia: usize,
    ib: usize,
}

/// The polygon edge most facing `direction`: of the two edges adjacent to the
/// extreme vertex along `direction`, the one more perpendicular to it.
fn best_edge(poly: &ConvexPolygon, direction: Vec2) -> Edge {
    let verts = &poly.vertices;

    let mut best = 0;
    let mut best_dot = verts[0].dot(direction);
    for (i, v) in verts.iter().enumerate().skip(1) {
        let d = v.dot(direction);
        if d > best_dot {
            best_dot = d;
            best = i;
        }
    }

    let prev = poly.prev_index(best);
    let next = poly.next_index(best);
    let before = Edge {
        a: verts[prev],
        b: verts[best],
        ia: prev,
        ib: best,
    };
    let after = Edge {
        a: verts[best],
        b: verts[next],
        ia: best,
        ib: next,
    };

    let into = before.b - before.a;
    let out_of = after.a - after.b;
    if direction.dot(into) <= direction.dot(out_of) {
        before
    } else {
        after
    }
}

/// Clip the segment `v1..v2` against the half-plane `normal . x >= offset`,
/// keeping points on or inside and inserting the crossing point if the
/// segment straddles the plane.
fn clip(v1: Vec2, v2: Vec2, normal: Vec2, offset: f32) -> Vec<Vec2> {
    let mut out = Vec::with_capacity(2);

    let d1 = normal.dot(v1) - offset;
    let d2 = normal.dot(v2) - offset;

    if d1 >= 0.0 {
        out.push(v1);
    }
    if d2 >= 0.0 {
        out.push(v2);
    }
    if d1 * d2 < 0.0 {
        out.push(v1 + (v2 - v1) * (d1 / (d1 - d2)));
    }

    out
}

/// Outward normal of the directed edge `a -> b` of a counter-clockwise
/// polygon.
fn edge_normal(a: Vec2, b: Vec2) -> Vec2 {
    edge_normal_raw(a, b).normalized()
}

fn edge_normal_raw(a: Vec2, b: Vec2) -> Vec2 {
    let d = b - a;
    Vec2::new(d.y, -d.x)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-3;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn approx_vec(a: Vec2, b: Vec2) -> bool {
        approx(a.x, b.x) && approx(a.y, b.y)
    }

    fn boxed(center: Vec2, half: Vec2) -> ConvexPolygon {
        ConvexPolygon::new(vec![
            center + Vec2::new(-half.x, -half.y),
            center + Vec2::new(half.x, -half.y),
            center + Vec2::new(half.x, half.y),
            center + Vec2::new(-half.x, half.y),
        ])
    }

    // ===== Circle-circle =====

    #[test]
    fn test_separated_circles_produce_no_manifold() {
        let a = Circle::new(Vec2::ZERO, 1.0);
        let b = Circle::new(Vec2::new(2.01, 0.0), 1.0);
        assert!(circle_circle(&a, &b).is_none());
    }

    #[test]
    fn test_touching_circles_collide_with_zero_penetration() {
        let a = Circle::new(Vec2::ZERO, 1.0);
        let b = Circle::new(Vec2::new(2.0, 0.0), 1.0);

        let m = circle_circle(&a, &b).unwrap();
        assert!(approx(m.penetration, 0.0));
        assert!(approx_vec(m.normal, Vec2::X));
    }

    #[test]
    fn test_overlapping_circles_report_depth_and_surface_point() {
        let a = Circle::new(Vec2::ZERO, 1.0);
        let b = Circle::new(Vec2::new(1.5, 0.0), 1.0);

        let m = circle_circle(&a, &b).unwrap();
        assert_eq!(m.points.len(), 1);
        assert!(approx(m.penetration, 0.5));
        assert!(approx_vec(m.normal, Vec2::X));
        assert!(approx_vec(m.points[0], Vec2::new(1.0, 0.0)));
        assert!(!m.body_a_incident);
        assert!(approx_vec(m.edge_normal_a, Vec2::X));
        assert!(approx_vec(m.edge_normal_b, -Vec2::X));

        // Each side gets pushed away from the other.
        assert!(approx_vec(m.resolving_normal(true), -Vec2::X));
        assert!(approx_vec(m.resolving_normal(false), Vec2::X));
    }

    #[test]
    fn test_concentric_circles_fall_back_to_up_normal() {
        let a = Circle::new(Vec2::new(3.0, -2.0), 0.75);
        let b = Circle::new(Vec2::new(3.0, -2.0), 0.5);

        let m = circle_circle(&a, &b).unwrap();
        assert!(approx_vec(m.normal, Vec2::Y));
        assert!(approx(m.penetration, 0.75));
        assert!(approx_vec(m.points[0], a.center));
    }

    #[test]
    fn test_circle_pair_is_symmetric_under_argument_order() {
        let a = Circle::new(Vec2::ZERO, 1.0);
        let b = Circle::new(Vec2::new(1.5, 0.0), 1.0);

        let ab = circle_circle(&a, &b).unwrap();
        let ba = circle_circle(&b, &a).unwrap();

        assert!(approx(ab.penetration, ba.penetration));
        assert_eq!(ab.points, ba.points);
        // The same physical body resolves along the same direction whichever
        // argument slot it occupied.
        assert!(approx_vec(ab.resolving_normal(true), ba.resolving_normal(false)));
        assert!(approx_vec(ab.resolving_normal(false), ba.resolving_normal(true)));
    }

    // ===== Polygon-polygon =====

    #[test]
    fn test_separated_boxes_produce_no_manifold() {
        let a = boxed(Vec2::ZERO, Vec2::splat(0.5));
        let b = boxed(Vec2::new(3.0, 0.0), Vec2::splat(0.5));
        assert!(polygon_polygon(&a, &b).is_none());
    }

    #[test]
    fn test_box_resting_on_ground_yields_two_contact_points() {
        let falling = boxed(Vec2::new(0.0, 0.4), Vec2::splat(0.5));
        let ground = boxed(Vec2::new(0.0, -0.5), Vec2::new(2.0, 0.5));

        let m = polygon_polygon(&falling, &ground).unwrap();
        assert_eq!(m.points.len(), 2);
        assert!(approx(m.penetration, 0.1));
        assert!(approx_vec(m.normal, Vec2::Y));
        assert!(approx_vec(m.points[0], Vec2::new(-0.5, 0.0)));
        assert!(approx_vec(m.points[1], Vec2::new(0.5, 0.0)));
        assert!(approx_vec(m.edge_normal_a, -Vec2::Y));
        assert!(approx_vec(m.edge_normal_b, Vec2::Y));

        // The box above gets pushed up, the ground down.
        assert!(approx_vec(m.resolving_normal(true), Vec2::Y));
        assert!(approx_vec(m.resolving_normal(false), -Vec2::Y));
    }

    #[test]
    fn test_box_pair_is_symmetric_under_argument_order() {
        let falling = boxed(Vec2::new(0.0, 0.4), Vec2::splat(0.5));
        let ground = boxed(Vec2::new(0.0, -0.5), Vec2::new(2.0, 0.5));

        let ab = polygon_polygon(&falling, &ground).unwrap();
        let ba = polygon_polygon(&ground, &falling).unwrap();

        assert!(approx(ab.penetration, ba.penetration));
        assert_eq!(ab.points.len(), ba.points.len());
        assert!(approx_vec(ab.resolving_normal(true), ba.resolving_normal(false)));
        assert!(approx_vec(ab.resolving_normal(false), ba.resolving_normal(true)));
        // Surface normals follow their owners across the swap.
        assert!(approx_vec(ab.edge_normal_a, ba.edge_normal_b));
        assert!(approx_vec(ab.edge_normal_b, ba.edge_normal_a));
    }

    #[test]
    fn test_corner_contact_clips_to_a_single_point() {
        // A diamond with its lower tip dipped into the ground face.
        let diamond = ConvexPolygon::new(vec![
            Vec2::new(0.0, -0.05),
            Vec2::new(1.0, 0.95),
            Vec2::new(0.0, 1.95),
            Vec2::new(-1.0, 0.95),
        ]);
        let ground = boxed(Vec2::new(0.0, -0.5), Vec2::new(2.0, 0.5));

        let m = polygon_polygon(&diamond, &ground).unwrap();
        assert_eq!(m.points.len(), 1);
        assert!(approx_vec(m.points[0], Vec2::new(0.0, -0.05)));
        assert!(approx(m.penetration, 0.05));
        assert!(approx_vec(m.resolving_normal(true), Vec2::Y));
        assert!(approx_vec(m.edge_normal_b, Vec2::Y));
    }

    #[test]
    fn test_nested_box_penetration_includes_the_containment_gap() {
        let small = boxed(Vec2::ZERO, Vec2::splat(0.5));
        let big = boxed(Vec2::ZERO, Vec2::splat(2.0));

        let m = polygon_polygon(&small, &big).unwrap();
        // Plain interval overlap would report 2.5; the nested-interval term
        // raises it by the smaller boundary gap.
        assert!(approx(m.penetration, 4.0));
        assert_eq!(m.points.len(), 2);
    }

    // ===== Polygon-circle =====

    #[test]
    fn test_separated_circle_and_box_produce_no_manifold() {
        let ground = boxed(Vec2::new(0.0, -0.5), Vec2::splat(0.5));
        let circle = Circle::new(Vec2::new(0.0, 2.0), 0.5);
        assert!(polygon_circle(&ground, &circle).is_none());
    }

    #[test]
    fn test_circle_on_face_contacts_under_its_center() {
        let ground = boxed(Vec2::new(0.0, -0.5), Vec2::splat(0.5));
        let circle = Circle::new(Vec2::new(0.0, 0.4), 0.5);

        let m = polygon_circle(&ground, &circle).unwrap();
        assert_eq!(m.points.len(), 1);
        assert!(approx(m.penetration, 0.1));
        assert!(approx_vec(m.normal, Vec2::Y));
        assert!(approx_vec(m.points[0], Vec2::new(0.0, -0.1)));
        assert!(!m.body_a_incident);
        assert!(approx_vec(m.edge_normal_a, Vec2::Y));
        assert!(approx_vec(m.edge_normal_b, -Vec2::Y));

        // Circle up, polygon down.
        assert!(approx_vec(m.resolving_normal(false), Vec2::Y));
        assert!(approx_vec(m.resolving_normal(true), -Vec2::Y));
    }

    #[test]
    fn test_circle_past_a_corner_contacts_toward_that_corner() {
        let ground = boxed(Vec2::new(0.0, -0.5), Vec2::splat(0.5));
        let circle = Circle::new(Vec2::new(0.8, 0.35), 0.5);

        let m = polygon_circle(&ground, &circle).unwrap();
        assert_eq!(m.points.len(), 1);
        // Penetration equals the radius minus the center-to-corner distance.
        assert!(approx(m.penetration, 0.039));
        assert!(approx_vec(m.normal, Vec2::new(0.6508, 0.7593)));
        assert!(approx_vec(m.points[0], Vec2::new(0.4746, -0.0296)));
    }

    // ===== Dispatch =====

    #[test]
    fn test_swapped_dispatch_mirrors_the_manifold() {
        let ground = Shape::Polygon(boxed(Vec2::new(0.0, -0.5), Vec2::splat(0.5)));
        let circle = Shape::Circle(Circle::new(Vec2::new(0.0, 0.4), 0.5));

        let pc = detect(&ground, &circle).unwrap();
        let cp = detect(&circle, &ground).unwrap();

        assert!(approx_vec(cp.normal, -pc.normal));
        assert!(approx(cp.penetration, pc.penetration));
        assert_eq!(cp.points, pc.points);
        assert!(approx_vec(cp.edge_normal_a, pc.edge_normal_b));
        assert!(approx_vec(cp.edge_normal_b, pc.edge_normal_a));
        // The circle is pushed up from either argument slot.
        assert!(approx_vec(cp.resolving_normal(true), Vec2::Y));
        assert!(approx_vec(pc.resolving_normal(false), Vec2::Y));
    }

    #[test]
    fn test_resolving_normal_flips_with_the_incidence_gauge() {
        let m = Manifold {
            points: vec![Vec2::ZERO],
            normal: Vec2::Y,
            penetration: 0.1,
            body_a_incident: true,
            edge_normal_a: -Vec2::Y,
            edge_normal_b: Vec2::Y,
        };

        assert_eq!(m.resolving_normal(true), Vec2::Y);
        assert_eq!(m.resolving_normal(false), -Vec2::Y);
    }
}
