//! Track-to constraint evaluation

use crate::foundation::math::{Mat3, Quat, Rotation3, Vec3, WORLD_UP};

use super::TrackAxis;

/// Rotation pointing the local `axis` of an object at `position` towards `target`, with the
/// local +Y axis as close to world up as possible
///
/// Returns identity when the object sits on its target.
pub fn track_to_rotation(position: Vec3, target: Vec3, axis: TrackAxis) -> Quat {
    let to_target = target - position;
    let Some(forward) = to_target.try_normalize(1e-12) else {
        return Quat::identity();
    };

    // Local Z in world space
    let z = match axis {
        TrackAxis::NegativeZ => -forward,
        TrackAxis::PositiveZ => forward,
    };

    // Looking straight up or down: fall back to world Y as the up hint
    let up_hint = if z.cross(&WORLD_UP).norm_squared() < 1e-12 {
        Vec3::y()
    } else {
        WORLD_UP
    };

    let x = up_hint.cross(&z).normalize();
    let y = z.cross(&x);

    let basis = Mat3::from_columns(&[x, y, z]);
    Quat::from_rotation_matrix(&Rotation3::from_matrix_unchecked(basis))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_camera_looks_at_target() {
        let position = Vec3::new(4.0, -3.0, 2.0);
        let rotation = track_to_rotation(position, Vec3::zeros(), TrackAxis::NegativeZ);

        let view_direction = rotation * -Vec3::z();
        assert_relative_eq!(view_direction, (-position).normalize(), epsilon = EPSILON);

        // Camera up stays in the vertical plane through the view direction
        let right = rotation * Vec3::x();
        assert_relative_eq!(right.z, 0.0, epsilon = EPSILON);
        assert!((rotation * Vec3::y()).z > 0.0);
    }

    #[test]
    fn test_outward_axis_looks_away() {
        let position = Vec3::new(0.0, 5.0, 0.0);
        let rotation = track_to_rotation(position, Vec3::zeros(), TrackAxis::PositiveZ);
        assert_relative_eq!(rotation * -Vec3::z(), Vec3::y(), epsilon = EPSILON);
    }

    #[test]
    fn test_looking_straight_down() {
        let rotation = track_to_rotation(Vec3::new(0.0, 0.0, 3.0), Vec3::zeros(), TrackAxis::NegativeZ);
        assert_relative_eq!(rotation * -Vec3::z(), -Vec3::z(), epsilon = EPSILON);
    }

    #[test]
    fn test_degenerate_position() {
        assert_eq!(track_to_rotation(Vec3::zeros(), Vec3::zeros(), TrackAxis::NegativeZ), Quat::identity());
    }
}
