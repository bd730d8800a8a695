use crate::camera::Camera;
use crate::camera::MOVE_STEP;
use crate::config::SceneConfig;
use crate::constant_data::PerScene;
use crate::input::InputState;
use crate::lights::SpotLight;
use crate::lights::MAX_SPOT_LIGHTS;

/// Degrees of rotation per pixel of mouse drag.
const DRAG_SENSITIVITY: f32 = 0.25;

/// Mutable per-frame scene state: the camera and the light set. Ticked by
/// the input layer each update and flattened into the scene constant record
/// each frame.
pub struct SceneState {
    pub camera: Camera,
    pub spot_lights: [SpotLight; MAX_SPOT_LIGHTS],
    aspect_ratio: f32,
}

impl SceneState {
    pub fn new(config: &SceneConfig) -> Self {
        Self {
            camera: Camera::new(),
            spot_lights: [default_spot_light(); MAX_SPOT_LIGHTS],
            aspect_ratio: config.aspect_ratio(),
        }
    }

    pub fn tick(&mut self, input: &InputState) {
        self.camera.advance(MOVE_STEP * input.advance_axis());
        self.camera.strafe(MOVE_STEP * input.strafe_axis());
        self.camera.raise(MOVE_STEP * input.vertical_axis());
    }

    pub fn drag(&mut self, delta_x: f32, delta_y: f32) {
        let yaw = (DRAG_SENSITIVITY * delta_x).to_radians();
        let pitch = (DRAG_SENSITIVITY * delta_y).to_radians();
        self.camera.rotate(yaw, pitch);
    }

    pub fn per_scene(&self) -> PerScene {
        PerScene::new(
            self.camera.view_projection(self.aspect_ratio),
            self.camera.position.to_array(),
            self.spot_lights,
        )
    }
}

/// The single yellow spot light shining down the +Z axis from just behind
/// the scene.
fn default_spot_light() -> SpotLight {
    SpotLight {
        colour: [1.0, 1.0, 0.0],
        range_reciprocal: 0.01,
        position: [0.0, 1.0, -3.0],
        cos_outer_cone: (std::f32::consts::PI / 2.0).cos(),
        inverted_direction: [0.0, 0.0, -1.0],
        cos_inner_cone_reciprocal: 1.0 / (std::f32::consts::PI / 4.0).cos(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use windows::Win32::UI::Input::KeyboardAndMouse::VK_W;

    fn scene() -> SceneState {
        SceneState::new(&SceneConfig::default())
    }

    #[test]
    fn tick_without_input_is_a_no_op_on_position() {
        let mut state = scene();
        let before = state.camera.position;
        state.tick(&InputState::default());
        assert_eq!(state.camera.position, before);
    }

    #[test]
    fn held_key_moves_the_camera_each_tick() {
        let mut state = scene();
        let mut input = InputState::default();
        input.set_key(VK_W, true);
        let before = state.camera.position;
        state.tick(&input);
        state.tick(&input);
        assert!((state.camera.position.z - (before.z + 2.0 * MOVE_STEP)).abs() < 1e-5);
    }

    #[test]
    fn per_scene_reflects_the_camera() {
        let mut state = scene();
        state.camera.raise(1.0);
        let record = state.per_scene();
        assert_eq!(record.camera_position, state.camera.position.to_array());
        assert_eq!(record.spot_lights[0].colour, [1.0, 1.0, 0.0]);
    }

    #[test]
    fn drag_rotates_the_view() {
        let mut state = scene();
        let before = state.camera.forward;
        state.drag(40.0, 0.0);
        assert!((state.camera.forward - before).length() > 1e-4);
    }
}
