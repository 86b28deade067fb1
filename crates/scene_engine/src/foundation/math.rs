//! Math utilities and types
//!
//! Thin aliases over nalgebra plus the local-space [`Transform`] value that
//! scene entities carry.

pub use nalgebra::{Matrix4, Quaternion, Unit, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Unit quaternion used for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Local transform: position, rotation and scale relative to the parent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Translation relative to the parent
    pub position: Vec3,

    /// Rotation as a unit quaternion
    pub rotation: Quat,

    /// Per-axis scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Identity transform (no translation, rotation or scaling)
    pub fn identity() -> Self {
        Self::default()
    }

    /// Transform with only a translation
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Transform from all three components
    pub const fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Builder: replace the position
    #[must_use]
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Builder: replace the rotation
    #[must_use]
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Builder: rotation from an axis and an angle in radians
    #[must_use]
    pub fn with_rotation_axis_angle(mut self, axis: Vec3, angle: f32) -> Self {
        self.rotation = Quat::from_axis_angle(&Unit::new_normalize(axis), angle);
        self
    }

    /// Builder: uniform scale
    #[must_use]
    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::new(scale, scale, scale);
        self
    }

    /// Builder: per-axis scale
    #[must_use]
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Compose into a 4x4 matrix: `translate * rotate * scale`
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }
}

/// Translation column of an affine matrix
pub fn translation_of(matrix: &Mat4) -> Vec3 {
    Vec3::new(matrix.m14, matrix.m24, matrix.m34)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    const EPSILON: f32 = 1e-6;

    #[test]
    fn test_identity_composes_to_identity_matrix() {
        assert_relative_eq!(Transform::identity().to_matrix(), Mat4::identity(), epsilon = EPSILON);
    }

    #[test]
    fn test_compose_order_is_trs() {
        // Scale first, then rotate 90° about Z, then translate
        let transform = Transform::from_position(Vec3::new(10.0, 0.0, 0.0))
            .with_rotation_axis_angle(Vec3::z(), FRAC_PI_2)
            .with_uniform_scale(2.0);

        let moved = transform.to_matrix().transform_point(&Point3::new(1.0, 0.0, 0.0));

        // (1,0,0) -> scaled (2,0,0) -> rotated (0,2,0) -> translated (10,2,0)
        assert_relative_eq!(moved, Point3::new(10.0, 2.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_translation_of_reads_last_column() {
        let matrix = Transform::from_position(Vec3::new(1.0, 2.0, 3.0)).to_matrix();
        assert_relative_eq!(translation_of(&matrix), Vec3::new(1.0, 2.0, 3.0), epsilon = EPSILON);
    }
}
