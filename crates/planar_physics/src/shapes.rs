//! Collision shapes for 2D physics
//!
//! Lightweight world-space primitives consumed by the narrow phase:
//! circles, convex polygons, and the axis-aligned bounding boxes used
//! for broad-phase pruning.

use planar_math::{Mat3, Vec2};

/// A circle defined by center and radius
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    /// Create a new circle at the given center with the given radius
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Check if a point is inside or on the circle
    pub fn contains(&self, point: Vec2) -> bool {
        (point - self.center).length_squared() <= self.radius * self.radius
    }

    /// The bounding box of the circle
    pub fn bounds(&self) -> Aabb2D {
        let r = Vec2::splat(self.radius);
        Aabb2D::new(self.center - r, self.center + r)
    }
}

/// A convex polygon as an ordered vertex loop
///
/// Vertices are stored counter-clockwise. Winding is load-bearing: edge
/// normals are derived from it, so construction paths must preserve order.
/// Convexity is not checked; concave input produces undefined results.
#[derive(Clone, Debug, PartialEq)]
pub struct ConvexPolygon {
    pub vertices: Vec<Vec2>,
}

impl ConvexPolygon {
    /// Create a polygon from counter-clockwise vertices
    pub fn new(vertices: Vec<Vec2>) -> Self {
        Self { vertices }
    }

    /// Number of vertices
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// True if the polygon has no vertices
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Index of the vertex preceding `i` in the loop
    #[inline]
    pub fn prev_index(&self, i: usize) -> usize {
        if i == 0 {
            self.vertices.len() - 1
        } else {
            i - 1
        }
    }

    /// Index of the vertex following `i` in the loop
    #[inline]
    pub fn next_index(&self, i: usize) -> usize {
        if i + 1 == self.vertices.len() {
            0
        } else {
            i + 1
        }
    }

    /// Average of the vertices
    pub fn center(&self) -> Vec2 {
        let mut sum = Vec2::ZERO;
        for v in &self.vertices {
            sum += *v;
        }
        sum / self.vertices.len() as f32
    }

    /// The bounding box of the polygon (degenerate at origin when empty)
    pub fn bounds(&self) -> Aabb2D {
        let mut iter = self.vertices.iter();
        let Some(first) = iter.next() else {
            return Aabb2D::ZERO;
        };
        let mut min = *first;
        let mut max = *first;
        for v in iter {
            min = min.min_components(*v);
            max = max.max_components(*v);
        }
        Aabb2D::new(min, max)
    }

    /// The polygon moved by `delta`
    pub fn translated(&self, delta: Vec2) -> Self {
        Self {
            vertices: self.vertices.iter().map(|v| *v + delta).collect(),
        }
    }
}

/// Rectangle authoring shape: size and a local offset
///
/// Expanded into a 4-vertex polygon when baked; the offset is applied to
/// the corners before the transform, so it rotates and scales with the body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub size: Vec2,
    pub offset: Vec2,
}

impl Rect {
    /// Create a rectangle with the given size, centered on the offset
    pub fn new(size: Vec2, offset: Vec2) -> Self {
        Self { size, offset }
    }

    /// Expand into a counter-clockwise 4-vertex polygon under `transform`
    pub fn to_polygon(&self, transform: &Mat3) -> ConvexPolygon {
        let half = self.size * 0.5;
        let corners = [
            Vec2::new(-half.x, -half.y),
            Vec2::new(half.x, -half.y),
            Vec2::new(half.x, half.y),
            Vec2::new(-half.x, half.y),
        ];
        ConvexPolygon::new(
            corners
                .iter()
                .map(|c| transform.transform_point(*c + self.offset))
                .collect(),
        )
    }
}

/// Closed set of shape kinds the narrow phase dispatches over
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Polygon(ConvexPolygon),
    Circle(Circle),
}

impl Shape {
    /// The bounding box of the shape
    pub fn bounds(&self) -> Aabb2D {
        match self {
            Shape::Polygon(p) => p.bounds(),
            Shape::Circle(c) => c.bounds(),
        }
    }

    /// The shape moved by `delta`
    pub fn translated(&self, delta: Vec2) -> Self {
        match self {
            Shape::Polygon(p) => Shape::Polygon(p.translated(delta)),
            Shape::Circle(c) => Shape::Circle(Circle::new(c.center + delta, c.radius)),
        }
    }
}

/// A 2D axis-aligned bounding box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb2D {
    /// Minimum corner
    pub min: Vec2,
    /// Maximum corner
    pub max: Vec2,
}

impl Aabb2D {
    /// Degenerate box at the origin
    pub const ZERO: Self = Self {
        min: Vec2::ZERO,
        max: Vec2::ZERO,
    };

    /// Create a new AABB from min and max corners
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at a position with given half-extents
    pub fn from_center_half_extents(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Get the full size in each dimension
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Overlap test, inclusive at the boundary
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// Check if `other` lies entirely inside this AABB
    pub fn contains(&self, other: &Self) -> bool {
        self.min.x <= other.min.x
            && self.min.y <= other.min.y
            && self.max.x >= other.max.x
            && self.max.y >= other.max.y
    }

    /// Check if a point is inside or on the AABB
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Smallest AABB containing both inputs
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min_components(other.min),
            max: self.max.max_components(other.max),
        }
    }

    /// Translate the AABB by a delta
    pub fn translated(&self, delta: Vec2) -> Self {
        Self {
            min: self.min + delta,
            max: self.max + delta,
        }
    }
}
