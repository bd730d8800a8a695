use eyre::Result;
use windows::Win32::Foundation::HWND;
use windows::Win32::Graphics::Direct3D12::ID3D12Device;
use windows::Win32::Graphics::Dxgi::IDXGIFactory4;
use windows::Win32::Graphics::Dxgi::IDXGIInfoQueue;
use windows::Win32::UI::Input::KeyboardAndMouse::VIRTUAL_KEY;

use crate::config::SceneConfig;
use crate::dx_sample::DXSample;
use crate::dx_sample::SampleCommandLine;
use crate::input::InputState;
use crate::scene::SceneState;

use super::resources::Resources;
use super::sample_bind_to_window::bind_to_window;
use super::sample_new::new;
use super::sample_on_destroy::on_destroy;
use super::sample_render::render;

/// The renderer behind the window runner: a layered scene of procedural
/// meshes lit by one spot light.
pub struct LayeredSceneSample {
    pub config: SceneConfig,
    pub dxgi_factory: IDXGIFactory4,
    pub device: ID3D12Device,
    pub scene: SceneState,
    pub input: InputState,
    pub resources: Option<Resources>,
}

impl DXSample for LayeredSceneSample {
    fn new(command_line: &SampleCommandLine) -> Result<(Self, Option<IDXGIInfoQueue>)> {
        new(command_line)
    }

    fn bind_to_window(&mut self, hwnd: &HWND) -> Result<()> {
        bind_to_window(self, hwnd)
    }

    fn update(&mut self) {
        self.scene.tick(&self.input);
        if let Some(resources) = &mut self.resources {
            // The scheduler drained the previous frame, so nothing on the
            // GPU is still reading this buffer.
            resources.per_scene.data = self.scene.per_scene();
            resources.per_scene.update();
        }
    }

    fn render(&mut self) -> Result<()> {
        render(self)
    }

    fn on_destroy(&mut self) {
        on_destroy(self)
    }

    fn on_key_down(&mut self, key: u8) {
        self.input.set_key(VIRTUAL_KEY(key as u16), true);
    }

    fn on_key_up(&mut self, key: u8) {
        self.input.set_key(VIRTUAL_KEY(key as u16), false);
    }

    fn on_mouse_down(&mut self, x: i32, y: i32) {
        self.input.begin_drag(x, y);
    }

    fn on_mouse_up(&mut self, _x: i32, _y: i32) {
        self.input.end_drag();
    }

    fn on_mouse_move(&mut self, x: i32, y: i32) {
        if let Some((delta_x, delta_y)) = self.input.drag_to(x, y) {
            self.scene.drag(delta_x, delta_y);
        }
    }

    fn title(&self) -> String {
        "D3D12 Layered Scene".into()
    }

    fn window_size(&self) -> (i32, i32) {
        (self.config.width as i32, self.config.height as i32)
    }
}
