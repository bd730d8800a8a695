use eyre::Result;
use windows::Win32::Graphics::Dxgi::IDXGIInfoQueue;

use crate::config::SceneConfig;
use crate::dx_sample::SampleCommandLine;
use crate::input::InputState;
use crate::scene::SceneState;

use super::create_device::create_device;
use super::sample::LayeredSceneSample;

pub fn new(
    command_line: &SampleCommandLine,
) -> Result<(LayeredSceneSample, Option<IDXGIInfoQueue>)> {
    let config = SceneConfig::new(command_line);
    config.validate();

    let (dxgi_factory, device, info_queue) = create_device(&config)?;
    let scene = SceneState::new(&config);

    Ok((
        LayeredSceneSample {
            config,
            dxgi_factory,
            device,
            scene,
            input: InputState::default(),
            resources: None,
        },
        info_queue,
    ))
}
