// Copyright 2020 @TwoCookingMice

use super::constants::{ Float, Matrix4f, Vector3f, Vector4f };

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    matrix: Matrix4f,
    inv_matrix: Matrix4f
}

impl Default for Transform {
    fn default() -> Self {
        Self { matrix: Matrix4f::identity(),
               inv_matrix: Matrix4f::identity() }
    }
}

impl Transform {
    pub fn new(matrix: Matrix4f) -> Self {
        Self { matrix: matrix,
               inv_matrix: matrix.try_inverse().unwrap_or(Matrix4f::identity())}
    }

    /// Build from 16 floats in row-major order, the layout hosts hand over
    /// for their projection matrices.
    pub fn from_row_major(m: &[Float; 16]) -> Self {
        Self::new(Matrix4f::from_row_slice(m))
    }

    pub fn inverse(&self) -> Transform {
        Self { matrix: self.inv_matrix, inv_matrix: self.matrix }
    }

    /// Transform a homogeneous point and project it back with the perspective divide.
    pub fn apply_homogeneous(&self, p: Vector4f) -> Vector3f {
        let q = self.matrix * p;
        if q.w != 0.0 {
            Vector3f::new(q.x / q.w, q.y / q.w, q.z / q.w)
        } else {
            Vector3f::new(q.x, q.y, q.z)
        }
    }

    pub fn apply_point(&self, p: Vector3f) -> Vector3f {
        self.apply_homogeneous(Vector4f::new(p.x, p.y, p.z, 1.0))
    }
}
