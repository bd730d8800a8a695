use eyre::Result;
use windows::Win32::Foundation::HWND;
use windows::Win32::Graphics::Dxgi::IDXGIInfoQueue;

/// Lifecycle hooks the window runner drives: creation, window binding, the
/// per-frame update/render pair, input events, teardown.
pub trait DXSample {
    /// Creates the sample and, in debug builds, the DXGI info queue the
    /// runner drains on render errors.
    fn new(command_line: &SampleCommandLine) -> Result<(Self, Option<IDXGIInfoQueue>)>
    where
        Self: Sized;

    /// Binds the sample to a window handle, creating every swap-chain-sized
    /// resource.
    fn bind_to_window(&mut self, hwnd: &HWND) -> Result<()>;

    /// Called once before the sample is dropped, for GPU drain and cleanup.
    fn on_destroy(&mut self);

    /// Per-tick state update, called before each render.
    fn update(&mut self) {}

    fn render(&mut self) -> Result<()> {
        Ok(())
    }

    fn on_key_down(&mut self, _key: u8) {}
    fn on_key_up(&mut self, _key: u8) {}

    fn on_mouse_down(&mut self, _x: i32, _y: i32) {}
    fn on_mouse_up(&mut self, _x: i32, _y: i32) {}
    fn on_mouse_move(&mut self, _x: i32, _y: i32) {}

    fn title(&self) -> String {
        "DXSample".into()
    }

    fn window_size(&self) -> (i32, i32) {
        (640, 480)
    }
}

/// Command line arguments for sample initialization
#[derive(Clone)]
pub struct SampleCommandLine {
    pub use_warp_device: bool,
}

/// Builds a SampleCommandLine from the process arguments
pub fn build_command_line() -> SampleCommandLine {
    let mut use_warp_device = false;

    for arg in std::env::args() {
        if arg.eq_ignore_ascii_case("-warp") || arg.eq_ignore_ascii_case("/warp") {
            use_warp_device = true;
        }
    }

    SampleCommandLine { use_warp_device }
}
