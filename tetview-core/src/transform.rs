/// 3D transformation matrices and rotation state
use std::f32::consts::TAU;

use nalgebra::{Matrix4, Vector3};

/// Rotation state around three axes (in radians, kept in `[0, 2π)`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationState {
    pub fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
        self.wrap();
    }

    /// Spin around the vertical axis at `degrees_per_second`
    pub fn advance(&mut self, seconds: f32, degrees_per_second: f32) {
        self.rotate(0.0, (seconds * degrees_per_second).to_radians(), 0.0);
    }

    fn wrap(&mut self) {
        self.x = self.x.rem_euclid(TAU);
        self.y = self.y.rem_euclid(TAU);
        self.z = self.z.rem_euclid(TAU);
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Create a rotation matrix from a rotation state
    pub fn rotation_matrix(rotation: &RotationState) -> Matrix4<f32> {
        let rx = Matrix4::new_rotation(Vector3::new(rotation.x, 0.0, 0.0));
        let ry = Matrix4::new_rotation(Vector3::new(0.0, rotation.y, 0.0));
        let rz = Matrix4::new_rotation(Vector3::new(0.0, 0.0, rotation.z));

        // Z, then Y, then X
        rz * ry * rx
    }

    pub fn mvp_matrix(
        model: &Matrix4<f32>,
        view: &Matrix4<f32>,
        projection: &Matrix4<f32>,
    ) -> Matrix4<f32> {
        projection * view * model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn test_rotation_state() {
        let mut state = RotationState::zero();
        assert_eq!(state.x, 0.0);
        assert_eq!(state.y, 0.0);
        assert_eq!(state.z, 0.0);

        state.rotate(0.1, 0.2, 0.3);
        assert!((state.x - 0.1).abs() < 1e-6);
        assert!((state.y - 0.2).abs() < 1e-6);
        assert!((state.z - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_advance_wraps_full_turns() {
        let mut state = RotationState::zero();
        // 90 degrees per second for five seconds is a turn and a quarter.
        state.advance(5.0, 90.0);
        assert!((state.y - std::f32::consts::FRAC_PI_2).abs() < 1e-4);

        state.rotate(-1.0, 0.0, 0.0);
        assert!(state.x >= 0.0 && state.x < TAU);
    }

    #[test]
    fn test_identity_rotation() {
        let rotation = RotationState::zero();
        let matrix = Transform::rotation_matrix(&rotation);
        assert!((matrix - Matrix4::identity()).norm() < 1e-6);
    }

    #[test]
    fn test_quarter_turn_about_y() {
        let mut rotation = RotationState::zero();
        rotation.advance(1.0, 90.0);
        let model = Transform::rotation_matrix(&rotation);
        let moved = model.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert!((moved - Point3::new(0.0, 0.0, -1.0)).norm() < 1e-5);
    }
}
