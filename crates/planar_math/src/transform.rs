//! 2D Transform (position, rotation, scale)

use serde::{Serialize, Deserialize};

use crate::{Mat3, Vec2};

/// A 2D transform with position, rotation (degrees) and non-uniform scale
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    /// Position in world space
    pub position: Vec2,
    /// Rotation in degrees, counter-clockwise
    pub rotation: f32,
    /// Per-axis scale factor
    pub scale: Vec2,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform2D {
    /// Create an identity transform (no translation, rotation, or scale change)
    pub fn identity() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
        }
    }

    /// Create a transform with just a position
    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    /// The full affine matrix for this transform
    #[inline]
    pub fn matrix(&self) -> Mat3 {
        Mat3::from_trs(self.position, self.rotation, self.scale)
    }

    /// The rotation-and-scale matrix with translation left out
    ///
    /// Used when geometry is kept in local space and translated separately.
    #[inline]
    pub fn basis_matrix(&self) -> Mat3 {
        Mat3::from_trs(Vec2::ZERO, self.rotation, self.scale)
    }

    /// Transform a point from local space to world space
    #[inline]
    pub fn transform_point(&self, p: Vec2) -> Vec2 {
        self.matrix().transform_point(p)
    }
}
