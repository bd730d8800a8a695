use tracing::debug;
use tracing::info;
use windows::core::*;
use windows::Win32::Graphics::Direct3D::*;
use windows::Win32::Graphics::Direct3D12::D3D12CreateDevice;
use windows::Win32::Graphics::Direct3D12::ID3D12Device;
use windows::Win32::Graphics::Dxgi::*;

/// Enumerates hardware adapters and returns the first one that supports
/// Direct3D 12 Feature Level 11.0, skipping software adapters.
pub fn get_hardware_adapter(factory: &IDXGIFactory4) -> Result<IDXGIAdapter1> {
    for i in 0.. {
        let adapter = match unsafe { factory.EnumAdapters1(i) } {
            Ok(a) => a,
            Err(e) if e.code() == DXGI_ERROR_NOT_FOUND => break, // No more adapters
            Err(e) => return Err(e),
        };

        let desc = unsafe { adapter.GetDesc1()? };
        let adapter_name = String::from_utf16_lossy(&desc.Description);

        // Skip software adapters; `-warp` selects one explicitly instead.
        if (DXGI_ADAPTER_FLAG(desc.Flags as i32) & DXGI_ADAPTER_FLAG_SOFTWARE)
            != DXGI_ADAPTER_FLAG_NONE
        {
            debug!("adapter {i}: {adapter_name} (software, skipping)");
            continue;
        }

        // Check for Direct3D 12 support without creating the device yet.
        if unsafe {
            D3D12CreateDevice(
                &adapter,
                D3D_FEATURE_LEVEL_11_0,
                std::ptr::null_mut::<Option<ID3D12Device>>(),
            )
        }
        .is_ok()
        {
            info!("adapter {i}: {adapter_name} (selected)");
            return Ok(adapter);
        }
        debug!("adapter {i}: {adapter_name} (no D3D12 feature level 11.0)");
    }

    Err(Error::new(
        DXGI_ERROR_NOT_FOUND,
        "No suitable D3D12 hardware adapter found.",
    ))
}
