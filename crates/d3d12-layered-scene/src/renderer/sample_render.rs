use eyre::Result;
use windows::core::Interface;
use windows::Win32::Graphics::Direct3D12::ID3D12CommandList;
use windows::Win32::Graphics::Dxgi::DXGI_PRESENT;

use super::populate_command_list::populate_command_list;
use super::sample::LayeredSceneSample;

/// One frame: record, submit, present, then block until the GPU retires the
/// work and the next back-buffer index is known.
pub fn render(sample: &mut LayeredSceneSample) -> Result<()> {
    let config = &sample.config;
    if let Some(resources) = &mut sample.resources {
        resources.scheduler.begin_frame();

        populate_command_list(config, resources)?;

        let command_lists = [Some(resources.command_list.cast::<ID3D12CommandList>()?)];
        unsafe { resources.command_queue.ExecuteCommandLists(&command_lists) };

        // Present with vsync.
        unsafe { resources.swap_chain.Present(1, DXGI_PRESENT(0)) }.ok()?;

        resources.frame_index = resources
            .scheduler
            .end_frame(&resources.command_queue, &resources.swap_chain)?;
    }
    Ok(())
}
