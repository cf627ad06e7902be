//! 3x3 matrix for 2D affine transformations

use bytemuck::{Pod, Zeroable};
use serde::{Serialize, Deserialize};

use crate::Vec2;

/// 3x3 affine transformation matrix (row-major)
///
/// The top-left 2x2 block carries rotation and scale, the last column
/// carries translation. Points transform as column vectors with an
/// implicit homogeneous coordinate of 1.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Mat3 {
    pub m: [[f32; 3]; 3],
}

impl Mat3 {
    pub const IDENTITY: Self = Self {
        m: [
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        ],
    };

    /// Compose a translation, rotation (degrees, counter-clockwise) and
    /// non-uniform scale into a single matrix.
    ///
    /// Application order for a transformed point: scale, then rotation,
    /// then translation.
    pub fn from_trs(translation: Vec2, rotation_degrees: f32, scale: Vec2) -> Self {
        let rad = rotation_degrees.to_radians();
        let cos = rad.cos();
        let sin = rad.sin();

        Self {
            m: [
                [scale.x * cos, scale.y * -sin, translation.x],
                [scale.x * sin, scale.y * cos, translation.y],
                [0.0, 0.0, 1.0],
            ],
        }
    }

    /// Transform a point (applies the full affine transform)
    #[inline]
    pub fn transform_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            self.m[0][0] * p.x + self.m[0][1] * p.y + self.m[0][2],
            self.m[1][0] * p.x + self.m[1][1] * p.y + self.m[1][2],
        )
    }

    /// Transform a direction (rotation and scale only, no translation)
    #[inline]
    pub fn transform_direction(&self, d: Vec2) -> Vec2 {
        Vec2::new(
            self.m[0][0] * d.x + self.m[0][1] * d.y,
            self.m[1][0] * d.x + self.m[1][1] * d.y,
        )
    }

    /// Matrix product: `self * other` (applies `other` first)
    pub fn mul(&self, other: &Self) -> Self {
        let mut out = [[0.0f32; 3]; 3];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                for k in 0..3 {
                    *cell += self.m[i][k] * other.m[k][j];
                }
            }
        }
        Self { m: out }
    }
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.0001;

    fn vec_approx_eq(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < EPSILON && (a.y - b.y).abs() < EPSILON
    }

    #[test]
    fn test_identity() {
        let p = Vec2::new(3.0, -7.0);
        assert_eq!(Mat3::IDENTITY.transform_point(p), p);
    }

    #[test]
    fn test_translation() {
        let m = Mat3::from_trs(Vec2::new(10.0, 5.0), 0.0, Vec2::ONE);
        let p = m.transform_point(Vec2::new(1.0, 1.0));
        assert!(vec_approx_eq(p, Vec2::new(11.0, 6.0)));
    }

    #[test]
    fn test_rotation_ccw() {
        let m = Mat3::from_trs(Vec2::ZERO, 90.0, Vec2::ONE);
        let p = m.transform_point(Vec2::new(1.0, 0.0));
        assert!(vec_approx_eq(p, Vec2::new(0.0, 1.0)), "got {:?}", p);
    }

    #[test]
    fn test_non_uniform_scale() {
        let m = Mat3::from_trs(Vec2::ZERO, 0.0, Vec2::new(2.0, 3.0));
        let p = m.transform_point(Vec2::new(1.0, 1.0));
        assert!(vec_approx_eq(p, Vec2::new(2.0, 3.0)));
    }

    #[test]
    fn test_trs_order() {
        // Scale first, then rotate, then translate:
        // (1,0)*2 = (2,0), rotated 90 = (0,2), + (10,0) = (10,2)
        let m = Mat3::from_trs(Vec2::new(10.0, 0.0), 90.0, Vec2::splat(2.0));
        let p = m.transform_point(Vec2::new(1.0, 0.0));
        assert!(vec_approx_eq(p, Vec2::new(10.0, 2.0)), "got {:?}", p);
    }

    #[test]
    fn test_direction_ignores_translation() {
        let m = Mat3::from_trs(Vec2::new(100.0, 100.0), 0.0, Vec2::ONE);
        let d = m.transform_direction(Vec2::X);
        assert!(vec_approx_eq(d, Vec2::X));
    }

    #[test]
    fn test_mul_composes() {
        let t = Mat3::from_trs(Vec2::new(5.0, 0.0), 0.0, Vec2::ONE);
        let r = Mat3::from_trs(Vec2::ZERO, 90.0, Vec2::ONE);
        // t * r applies the rotation first
        let p = t.mul(&r).transform_point(Vec2::new(1.0, 0.0));
        assert!(vec_approx_eq(p, Vec2::new(5.0, 1.0)), "got {:?}", p);
    }
}
