//! Colliders attached to bodies.
//!
//! A collider keeps three representations in sync: the authored shape
//! definition, a local-space shape with the body's rotation and scale baked
//! in, and a world-space shape translated to the body position. Mass
//! properties are integrated from the local shape whenever it is rebuilt.

use planar_math::{Transform2D, Vec2};

use crate::shapes::{Aabb2D, Circle, ConvexPolygon, Rect, Shape};

/// Authoring-time description of a collider shape, in body-local space.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeDef {
    /// Rectangle centered on `offset`. The offset shifts the corners before
    /// the body rotation is applied, so it rotates with the body.
    Rect { size: Vec2, offset: Vec2 },
    /// Convex polygon wound counter-clockwise around the body origin.
    Polygon { vertices: Vec<Vec2> },
    /// Circle centered on `offset`. The offset does not rotate with the
    /// body; the radius scales by the larger scale component.
    Circle { radius: f32, offset: Vec2 },
}

/// Error constructing a collider from its shape definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColliderError {
    /// Polygon colliders need at least three vertices.
    DegeneratePolygon(usize),
}

impl std::fmt::Display for ColliderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColliderError::DegeneratePolygon(count) => {
                write!(f, "Polygon collider needs at least 3 vertices, got {}", count)
            }
        }
    }
}

impl std::error::Error for ColliderError {}

/// One collider of a body's compound shape.
#[derive(Debug, Clone)]
pub struct Collider {
    def: ShapeDef,
    local: Shape,
    world: Shape,
    bounds: Aabb2D,
    area: f32,
    mass: f32,
    inertia: f32,
    dirty: bool,
}

impl Collider {
    /// Build a collider from a shape definition, rejecting degenerate
    /// polygons.
    pub fn new(def: ShapeDef) -> Result<Self, ColliderError> {
        if let ShapeDef::Polygon { vertices } = &def {
            if vertices.len() < 3 {
                return Err(ColliderError::DegeneratePolygon(vertices.len()));
            }
        }
        Ok(Self::from_def(def))
    }

    /// Rectangle collider of the given size, centered on `offset`.
    pub fn rect(size: Vec2, offset: Vec2) -> Self {
        Self::from_def(ShapeDef::Rect { size, offset })
    }

    /// Circle collider of the given radius, centered on `offset`.
    pub fn circle(radius: f32, offset: Vec2) -> Self {
        Self::from_def(ShapeDef::Circle { radius, offset })
    }

    /// Convex polygon collider from counter-clockwise vertices.
    pub fn polygon(vertices: Vec<Vec2>) -> Result<Self, ColliderError> {
        Self::new(ShapeDef::Polygon { vertices })
    }

    fn from_def(def: ShapeDef) -> Self {
        let placeholder = match &def {
            ShapeDef::Circle { radius, offset } => Shape::Circle(Circle::new(*offset, *radius)),
            _ => Shape::Polygon(ConvexPolygon::new(Vec::new())),
        };
        Self {
            def,
            local: placeholder.clone(),
            world: placeholder,
            bounds: Aabb2D::ZERO,
            area: 0.0,
            mass: 0.0,
            inertia: 0.0,
            dirty: true,
        }
    }

    /// True when the local-space shape no longer matches the body transform.
    pub(crate) fn needs_rebuild(&self) -> bool {
        self.dirty
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Rebake the local-space shape and mass properties for the given body
    /// transform and density. Translation is ignored here; it is applied by
    /// [`Collider::refresh_world`].
    pub(crate) fn rebuild(&mut self, transform: &Transform2D, density: f32) {
        self.local = match &self.def {
            ShapeDef::Rect { size, offset } => {
                let basis = transform.basis_matrix();
                Shape::Polygon(Rect::new(*size, *offset).to_polygon(&basis))
            }
            ShapeDef::Polygon { vertices } => {
                let basis = transform.basis_matrix();
                Shape::Polygon(ConvexPolygon::new(
                    vertices.iter().map(|v| basis.transform_point(*v)).collect(),
                ))
            }
            ShapeDef::Circle { radius, offset } => Shape::Circle(Circle::new(
                *offset,
                radius * transform.scale.x.max(transform.scale.y),
            )),
        };

        let (area, mass, inertia) = mass_properties(&self.local, density);
        self.area = area;
        self.mass = mass;
        self.inertia = inertia;
        self.dirty = false;
    }

    /// Translate the local shape to the given body position and refresh the
    /// cached world bounds.
    pub(crate) fn refresh_world(&mut self, position: Vec2) {
        self.world = self.local.translated(position);
        self.bounds = self.world.bounds();
    }

    pub fn world_shape(&self) -> &Shape {
        &self.world
    }

    pub fn bounds(&self) -> Aabb2D {
        self.bounds
    }

    pub fn area(&self) -> f32 {
        self.area
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn inertia(&self) -> f32 {
        self.inertia
    }
}

/// Area, mass and moment of inertia about the body origin.
///
/// Polygons are integrated as a fan of origin triangles over their directed
/// edges; circles use the closed-form disc formulas and ignore their offset.
fn mass_properties(shape: &Shape, density: f32) -> (f32, f32, f32) {
    match shape {
        Shape::Polygon(poly) => {
            let mut area = 0.0;
            let mut mass = 0.0;
            let mut inertia = 0.0;
            for i in 0..poly.len() {
                let v0 = poly.vertices[i];
                let v1 = poly.vertices[poly.next_index(i)];
                let tri_area = v0.cross(v1).abs() * 0.5;
                let tri_mass = density * tri_area;
                area += tri_area;
                mass += tri_mass;
                inertia +=
                    tri_mass * (v0.length_squared() + v1.length_squared() + v0.dot(v1)) / 6.0;
            }
            (area, mass, inertia)
        }
        Shape::Circle(circle) => {
            let area = std::f32::consts::PI * circle.radius * circle.radius;
            let mass = density * area;
            (area, mass, mass * circle.radius * circle.radius * 0.5)
        }
    }
}
