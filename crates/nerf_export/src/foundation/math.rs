//! Math utilities and types
//!
//! Double precision types matching the host scene conventions: right-handed, Z-up world,
//! cameras looking down their local -Z axis with +Y up.

pub use nalgebra::{
    Vector3,
    Matrix3, Matrix4,
    Rotation3,
    UnitQuaternion,
};

/// 3D vector type
pub type Vec3 = Vector3<f64>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f64>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f64>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f64>;

/// Quaternion type for rotations
pub type Quat = UnitQuaternion<f64>;

/// World up axis of the host scene
pub const WORLD_UP: Vec3 = Vec3::new(0.0, 0.0, 1.0);

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
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
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform from location, XYZ Euler rotation (radians) and scale
    pub fn from_euler(position: Vec3, euler: Vec3, scale: Vec3) -> Self {
        Self {
            position,
            rotation: euler_to_quat(euler),
            scale,
        }
    }

    /// Rotation as XYZ Euler angles in radians
    pub fn euler(&self) -> Vec3 {
        let (x, y, z) = self.rotation.euler_angles();
        Vec3::new(x, y, z)
    }

    /// Convert to a transformation matrix (TRS order)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Linear interpolation of position and scale, spherical interpolation of rotation
    pub fn interpolate(&self, other: &Transform, t: f64) -> Transform {
        Transform {
            position: self.position.lerp(&other.position, t),
            rotation: self.rotation.slerp(&other.rotation, t),
            scale: self.scale.lerp(&other.scale, t),
        }
    }
}

/// XYZ Euler angles (radians) to a rotation quaternion, i.e. `Rz * Ry * Rx`
pub fn euler_to_quat(euler: Vec3) -> Quat {
    Quat::from_euler_angles(euler.x, euler.y, euler.z)
}

/// XYZ Euler angles (radians) to a rotation matrix, i.e. `Rz * Ry * Rx`
pub fn euler_to_matrix(euler: Vec3) -> Mat3 {
    *Rotation3::from_euler_angles(euler.x, euler.y, euler.z).matrix()
}

/// Row-major nested array of a 4x4 matrix, the layout written to dataset manifests
pub fn matrix_rows(matrix: &Mat4) -> [[f64; 4]; 4] {
    let mut rows = [[0.0; 4]; 4];
    for (r, row) in rows.iter_mut().enumerate() {
        for (c, value) in row.iter_mut().enumerate() {
            *value = matrix[(r, c)];
        }
    }
    rows
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f64 = std::f64::consts::PI;

    /// 2 * Pi
    pub const TAU: f64 = std::f64::consts::TAU;
}

/// Math utility functions
pub mod utils {
    /// Field of view in radians of a sensor dimension behind a lens, both in millimeters
    pub fn fov_from_focal(focal_mm: f64, sensor_mm: f64) -> f64 {
        2.0 * (sensor_mm / 2.0 / focal_mm).atan()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_matrix_rows_is_row_major() {
        let matrix = Mat4::new_translation(&Vec3::new(1.0, 2.0, 3.0));
        let rows = matrix_rows(&matrix);

        assert_eq!(rows[0], [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(rows[1], [0.0, 1.0, 0.0, 2.0]);
        assert_eq!(rows[2], [0.0, 0.0, 1.0, 3.0]);
        assert_eq!(rows[3], [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_euler_round_trip() {
        let euler = Vec3::new(0.3, -0.2, 1.1);
        let transform = Transform::from_euler(Vec3::zeros(), euler, Vec3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(transform.euler(), euler, epsilon = EPSILON);
    }

    #[test]
    fn test_euler_matrix_matches_quaternion() {
        let euler = Vec3::new(0.5, 0.25, -0.75);
        let from_matrix = euler_to_matrix(euler) * Vec3::x();
        let from_quat = euler_to_quat(euler) * Vec3::x();
        assert_relative_eq!(from_matrix, from_quat, epsilon = EPSILON);
    }

    #[test]
    fn test_fov_from_focal() {
        // 36mm sensor behind a 18mm lens sees exactly 90 degrees
        assert_relative_eq!(utils::fov_from_focal(18.0, 36.0), constants::PI / 2.0, epsilon = EPSILON);
    }
}
