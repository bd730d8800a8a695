use bevy_math::Mat4;
use bevy_math::Quat;
use bevy_math::Vec3;

pub const MOVE_STEP: f32 = 0.1;

const FOV_Y: f32 = 0.25 * std::f32::consts::PI;
const NEAR_PLANE: f32 = 1.0;
const FAR_PLANE: f32 = 1000.0;

/// Free-fly camera. The basis vectors are rotated directly rather than
/// re-derived from angles, matching how the mouse deltas are applied.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub position: Vec3,
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            position: Vec3::new(0.0, 1.0, -5.0),
            forward: Vec3::Z,
            right: Vec3::X,
            up: Vec3::Y,
        }
    }

    pub fn advance(&mut self, amount: f32) {
        self.position += self.forward * amount;
    }

    pub fn strafe(&mut self, amount: f32) {
        self.position += self.right * amount;
    }

    pub fn raise(&mut self, amount: f32) {
        self.position.y += amount;
    }

    /// Pitch about the camera's right axis, then yaw about world Y.
    pub fn rotate(&mut self, yaw: f32, pitch: f32) {
        let pitch_rotation = Quat::from_axis_angle(self.right, pitch);
        self.up = pitch_rotation * self.up;
        self.forward = pitch_rotation * self.forward;

        let yaw_rotation = Quat::from_rotation_y(yaw);
        self.right = yaw_rotation * self.right;
        self.up = yaw_rotation * self.up;
        self.forward = yaw_rotation * self.forward;
    }

    pub fn view_projection(&self, aspect_ratio: f32) -> Mat4 {
        let view = Mat4::look_to_lh(self.position, self.forward, self.up);
        let projection = Mat4::perspective_lh(FOV_Y, aspect_ratio, NEAR_PLANE, FAR_PLANE);
        projection * view
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn starts_behind_origin_looking_forward() {
        let camera = Camera::new();
        assert_eq!(camera.position, Vec3::new(0.0, 1.0, -5.0));
        assert_eq!(camera.forward, Vec3::Z);
    }

    #[test]
    fn advance_moves_along_forward() {
        let mut camera = Camera::new();
        camera.advance(MOVE_STEP);
        assert!((camera.position.z - -4.9).abs() < EPSILON);
        camera.advance(-MOVE_STEP);
        assert!((camera.position.z - -5.0).abs() < EPSILON);
    }

    #[test]
    fn strafe_moves_along_right() {
        let mut camera = Camera::new();
        camera.strafe(MOVE_STEP);
        assert!((camera.position.x - MOVE_STEP).abs() < EPSILON);
    }

    #[test]
    fn rotation_preserves_orthonormal_basis() {
        let mut camera = Camera::new();
        camera.rotate(0.3, -0.2);
        assert!((camera.forward.length() - 1.0).abs() < EPSILON);
        assert!((camera.right.length() - 1.0).abs() < EPSILON);
        assert!((camera.up.length() - 1.0).abs() < EPSILON);
        assert!(camera.forward.dot(camera.right).abs() < EPSILON);
        assert!(camera.forward.dot(camera.up).abs() < EPSILON);
    }

    #[test]
    fn yaw_turns_forward_toward_right() {
        let mut camera = Camera::new();
        camera.rotate(std::f32::consts::FRAC_PI_2, 0.0);
        assert!((camera.forward - Vec3::X).length() < 1e-4);
    }

    #[test]
    fn view_projection_maps_a_point_ahead_into_clip_space() {
        let camera = Camera::new();
        let clip = camera.view_projection(800.0 / 600.0) * Vec3::new(0.0, 1.0, 5.0).extend(1.0);
        let ndc = clip / clip.w;
        assert!(ndc.x.abs() <= 1.0);
        assert!(ndc.y.abs() <= 1.0);
        assert!(ndc.z >= 0.0 && ndc.z <= 1.0);
    }
}
