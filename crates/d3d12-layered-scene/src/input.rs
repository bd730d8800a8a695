use windows::Win32::UI::Input::KeyboardAndMouse::VIRTUAL_KEY;
use windows::Win32::UI::Input::KeyboardAndMouse::VK_A;
use windows::Win32::UI::Input::KeyboardAndMouse::VK_D;
use windows::Win32::UI::Input::KeyboardAndMouse::VK_S;
use windows::Win32::UI::Input::KeyboardAndMouse::VK_SHIFT;
use windows::Win32::UI::Input::KeyboardAndMouse::VK_SPACE;
use windows::Win32::UI::Input::KeyboardAndMouse::VK_W;

/// Per-tick key and mouse-drag state, fed from window messages and queried
/// by the scene every update.
#[derive(Clone, Copy, Debug, Default)]
pub struct InputState {
    forward: bool,
    backward: bool,
    left: bool,
    right: bool,
    ascend: bool,
    descend: bool,
    dragging: bool,
    last_mouse: (i32, i32),
}

impl InputState {
    pub fn set_key(&mut self, key: VIRTUAL_KEY, pressed: bool) {
        match key {
            VK_W => self.forward = pressed,
            VK_S => self.backward = pressed,
            VK_A => self.left = pressed,
            VK_D => self.right = pressed,
            VK_SPACE => self.ascend = pressed,
            VK_SHIFT => self.descend = pressed,
            _ => {}
        }
    }

    /// +1 forward, -1 backward, 0 when neither or both are held.
    pub fn advance_axis(&self) -> f32 {
        axis(self.forward, self.backward)
    }

    pub fn strafe_axis(&self) -> f32 {
        axis(self.right, self.left)
    }

    pub fn vertical_axis(&self) -> f32 {
        axis(self.ascend, self.descend)
    }

    pub fn begin_drag(&mut self, x: i32, y: i32) {
        self.dragging = true;
        self.last_mouse = (x, y);
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    /// Returns the pixel delta since the last position while the button is
    /// held. The last position is tracked even outside a drag so a new drag
    /// never sees a stale jump.
    pub fn drag_to(&mut self, x: i32, y: i32) -> Option<(f32, f32)> {
        let delta = self
            .dragging
            .then(|| ((x - self.last_mouse.0) as f32, (y - self.last_mouse.1) as f32));
        self.last_mouse = (x, y);
        delta
    }
}

fn axis(positive: bool, negative: bool) -> f32 {
    (positive as i32 - negative as i32) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_toggle_axes() {
        let mut input = InputState::default();
        assert_eq!(input.advance_axis(), 0.0);
        input.set_key(VK_W, true);
        assert_eq!(input.advance_axis(), 1.0);
        input.set_key(VK_S, true);
        assert_eq!(input.advance_axis(), 0.0);
        input.set_key(VK_W, false);
        assert_eq!(input.advance_axis(), -1.0);
    }

    #[test]
    fn unmapped_keys_are_ignored() {
        let mut input = InputState::default();
        input.set_key(VIRTUAL_KEY(0x51), true); // Q
        assert_eq!(input.advance_axis(), 0.0);
        assert_eq!(input.strafe_axis(), 0.0);
        assert_eq!(input.vertical_axis(), 0.0);
    }

    #[test]
    fn drag_reports_deltas_only_while_pressed() {
        let mut input = InputState::default();
        assert_eq!(input.drag_to(10, 10), None);
        input.begin_drag(10, 10);
        assert_eq!(input.drag_to(14, 8), Some((4.0, -2.0)));
        assert_eq!(input.drag_to(14, 8), Some((0.0, 0.0)));
        input.end_drag();
        assert_eq!(input.drag_to(20, 20), None);
    }

    #[test]
    fn movement_outside_drag_still_tracks_position() {
        let mut input = InputState::default();
        input.drag_to(100, 100);
        input.begin_drag(100, 100);
        assert_eq!(input.drag_to(101, 100), Some((1.0, 0.0)));
    }
}
