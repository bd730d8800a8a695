use windows::core::Result;
use windows::Win32::Graphics::Direct3D12::*;
use windows::Win32::Graphics::Dxgi::Common::*;

use super::create_pipeline_states::DEPTH_STENCIL_FORMAT;

/// The main depth-stencil buffer, created ready for depth writes.
pub fn create_depth_stencil_buffer(
    device: &ID3D12Device,
    width: u32,
    height: u32,
) -> Result<ID3D12Resource> {
    create_depth_texture(device, width, height, D3D12_RESOURCE_STATE_DEPTH_WRITE)
}

/// The auxiliary channel-stencil buffer. It spends most of the frame being
/// sampled, so it lives in the generic-read state; the stencil-write pass
/// transitions it to depth-write and back.
pub fn create_channel_stencil_texture(
    device: &ID3D12Device,
    width: u32,
    height: u32,
) -> Result<ID3D12Resource> {
    create_depth_texture(device, width, height, D3D12_RESOURCE_STATE_GENERIC_READ)
}

fn create_depth_texture(
    device: &ID3D12Device,
    width: u32,
    height: u32,
    initial_state: D3D12_RESOURCE_STATES,
) -> Result<ID3D12Resource> {
    let heap_props = D3D12_HEAP_PROPERTIES {
        Type: D3D12_HEAP_TYPE_DEFAULT,
        ..Default::default()
    };
    // Typeless so the stencil plane can also be exposed through an SRV.
    let desc = D3D12_RESOURCE_DESC {
        Dimension: D3D12_RESOURCE_DIMENSION_TEXTURE2D,
        Alignment: 0,
        Width: width as u64,
        Height: height,
        DepthOrArraySize: 1,
        MipLevels: 1,
        Format: DXGI_FORMAT_R24G8_TYPELESS,
        SampleDesc: DXGI_SAMPLE_DESC {
            Count: 1,
            Quality: 0,
        },
        Layout: D3D12_TEXTURE_LAYOUT_UNKNOWN,
        Flags: D3D12_RESOURCE_FLAG_ALLOW_DEPTH_STENCIL,
    };
    let clear_value = D3D12_CLEAR_VALUE {
        Format: DEPTH_STENCIL_FORMAT,
        Anonymous: D3D12_CLEAR_VALUE_0 {
            DepthStencil: D3D12_DEPTH_STENCIL_VALUE {
                Depth: 1.0,
                Stencil: 0,
            },
        },
    };

    let mut resource: Option<ID3D12Resource> = None;
    unsafe {
        device.CreateCommittedResource(
            &heap_props,
            D3D12_HEAP_FLAG_NONE,
            &desc,
            initial_state,
            Some(&clear_value),
            &mut resource,
        )?
    };
    Ok(resource.unwrap())
}

pub fn create_depth_stencil_view(
    device: &ID3D12Device,
    resource: &ID3D12Resource,
    handle: D3D12_CPU_DESCRIPTOR_HANDLE,
) {
    let desc = D3D12_DEPTH_STENCIL_VIEW_DESC {
        Format: DEPTH_STENCIL_FORMAT,
        ViewDimension: D3D12_DSV_DIMENSION_TEXTURE2D,
        Flags: D3D12_DSV_FLAG_NONE,
        Anonymous: D3D12_DEPTH_STENCIL_VIEW_DESC_0 {
            Texture2D: D3D12_TEX2D_DSV { MipSlice: 0 },
        },
    };
    unsafe { device.CreateDepthStencilView(resource, Some(&desc), handle) };
}

/// View onto the stencil plane (plane slice 1) of the channel-stencil
/// texture, for the mask-reading pixel shader.
pub fn create_channel_stencil_srv(
    device: &ID3D12Device,
    resource: &ID3D12Resource,
    handle: D3D12_CPU_DESCRIPTOR_HANDLE,
) {
    let desc = D3D12_SHADER_RESOURCE_VIEW_DESC {
        Format: DXGI_FORMAT_X24_TYPELESS_G8_UINT,
        ViewDimension: D3D12_SRV_DIMENSION_TEXTURE2D,
        Shader4ComponentMapping: D3D12_DEFAULT_SHADER_4_COMPONENT_MAPPING,
        Anonymous: D3D12_SHADER_RESOURCE_VIEW_DESC_0 {
            Texture2D: D3D12_TEX2D_SRV {
                MostDetailedMip: 0,
                MipLevels: 1,
                PlaneSlice: 1,
                ResourceMinLODClamp: 0.0,
            },
        },
    };
    unsafe { device.CreateShaderResourceView(resource, Some(&desc), handle) };
}

/// Null colour view for the reserved heap slot; bound whenever the mask
/// texture is not.
pub fn create_null_colour_srv(device: &ID3D12Device, handle: D3D12_CPU_DESCRIPTOR_HANDLE) {
    let desc = D3D12_SHADER_RESOURCE_VIEW_DESC {
        Format: DXGI_FORMAT_R8G8B8A8_UNORM,
        ViewDimension: D3D12_SRV_DIMENSION_TEXTURE2D,
        Shader4ComponentMapping: D3D12_DEFAULT_SHADER_4_COMPONENT_MAPPING,
        Anonymous: D3D12_SHADER_RESOURCE_VIEW_DESC_0 {
            Texture2D: D3D12_TEX2D_SRV {
                MostDetailedMip: 0,
                MipLevels: 1,
                PlaneSlice: 0,
                ResourceMinLODClamp: 0.0,
            },
        },
    };
    unsafe { device.CreateShaderResourceView(None, Some(&desc), handle) };
}
