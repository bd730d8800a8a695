use tracing::info;
use tracing::warn;
use windows::core::*;
use windows::Win32::Graphics::Direct3D::*;
use windows::Win32::Graphics::Direct3D12::*;
use windows::Win32::Graphics::Dxgi::*;

use crate::adapter_utils::get_hardware_adapter;
use crate::config::SceneConfig;

/// Creates the DXGI factory and the D3D12 device. In debug builds the debug
/// layer (with GPU-based validation when available) is enabled first —
/// enabling it after device creation would invalidate the device — and the
/// DXGI info queue is returned for the runner to drain.
pub fn create_device(
    config: &SceneConfig,
) -> Result<(IDXGIFactory4, ID3D12Device, Option<IDXGIInfoQueue>)> {
    let mut debug_flags = DXGI_CREATE_FACTORY_FLAGS(0);
    let mut info_queue: Option<IDXGIInfoQueue> = None;

    if cfg!(debug_assertions) {
        let mut debug_enabled = false;
        unsafe {
            let mut debug1: Option<ID3D12Debug1> = None;
            if D3D12GetDebugInterface::<ID3D12Debug1>(&mut debug1).is_ok() {
                let debug1 = debug1.unwrap();
                info!("D3D12 debug layer enabled (ID3D12Debug1 + GBV)");
                debug1.EnableDebugLayer();
                debug1.SetEnableGPUBasedValidation(true);
                debug_flags |= DXGI_CREATE_FACTORY_DEBUG;
                debug_enabled = true;
            } else {
                let mut debug: Option<ID3D12Debug> = None;
                if D3D12GetDebugInterface::<ID3D12Debug>(&mut debug).is_ok() {
                    let debug = debug.unwrap();
                    info!("D3D12 debug layer enabled (ID3D12Debug)");
                    debug.EnableDebugLayer();
                    debug_flags |= DXGI_CREATE_FACTORY_DEBUG;
                    debug_enabled = true;
                } else {
                    warn!("D3D12 debug layer unavailable");
                }
            }

            if debug_enabled {
                match DXGIGetDebugInterface1::<IDXGIInfoQueue>(0) {
                    Ok(queue) => info_queue = Some(queue),
                    Err(e) => warn!("failed to get DXGI info queue: {e:?}"),
                }
            }
        }
    }

    let dxgi_factory: IDXGIFactory4 = unsafe { CreateDXGIFactory2(debug_flags) }?;

    let adapter = if config.use_warp_device {
        info!("using WARP adapter");
        unsafe { dxgi_factory.EnumWarpAdapter()? }
    } else {
        get_hardware_adapter(&dxgi_factory)?
    };

    let mut device: Option<ID3D12Device> = None;
    unsafe { D3D12CreateDevice(&adapter, D3D_FEATURE_LEVEL_11_0, &mut device) }?;

    Ok((dxgi_factory, device.unwrap(), info_queue))
}
