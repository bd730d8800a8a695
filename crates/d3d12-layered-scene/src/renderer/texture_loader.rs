use std::path::Path;

use eyre::Result;
use eyre::WrapErr;
use tracing::debug;
use windows::Win32::Graphics::Direct3D12::*;
use windows::Win32::Graphics::Dxgi::Common::DXGI_SAMPLE_DESC;

use crate::dds;

use super::mesh::create_upload_resource;
use super::transition_barrier::transition_barrier;

/// A loaded texture: the default-heap resource the shaders sample, plus the
/// staging buffer the copy was recorded from. The staging buffer must stay
/// alive until the enclosing command list has executed.
pub struct Texture {
    pub resource: ID3D12Resource,
    pub upload: ID3D12Resource,
}

/// Reads a DDS file, creates a default-heap texture with its full mip chain,
/// and records the staging copies plus the transition to pixel-shader
/// readable state on the given (open) command list.
pub fn load_texture(
    device: &ID3D12Device,
    command_list: &ID3D12GraphicsCommandList,
    path: &Path,
) -> Result<Texture> {
    let bytes =
        std::fs::read(path).wrap_err_with(|| format!("reading texture {}", path.display()))?;
    let image =
        dds::parse(&bytes).wrap_err_with(|| format!("parsing texture {}", path.display()))?;
    debug!(
        "texture {}: {}x{}, {} mips",
        path.display(),
        image.width,
        image.height,
        image.mip_count
    );

    let heap_props = D3D12_HEAP_PROPERTIES {
        Type: D3D12_HEAP_TYPE_DEFAULT,
        ..Default::default()
    };
    let desc = D3D12_RESOURCE_DESC {
        Dimension: D3D12_RESOURCE_DIMENSION_TEXTURE2D,
        Alignment: 0,
        Width: image.width as u64,
        Height: image.height,
        DepthOrArraySize: 1,
        MipLevels: image.mip_count as u16,
        Format: image.format,
        SampleDesc: DXGI_SAMPLE_DESC {
            Count: 1,
            Quality: 0,
        },
        Layout: D3D12_TEXTURE_LAYOUT_UNKNOWN,
        Flags: D3D12_RESOURCE_FLAG_NONE,
    };
    let mut resource: Option<ID3D12Resource> = None;
    unsafe {
        device.CreateCommittedResource(
            &heap_props,
            D3D12_HEAP_FLAG_NONE,
            &desc,
            D3D12_RESOURCE_STATE_COPY_DEST,
            None,
            &mut resource,
        )?
    };
    let resource = resource.unwrap();

    // Plan one placed footprint per mip: rows padded to the pitch alignment,
    // each subresource start padded to the placement alignment.
    struct MipCopy {
        offset: u64,
        row_pitch: u32,
        row_bytes: u32,
        rows: u32,
        width: u32,
        height: u32,
    }
    let mut copies = Vec::with_capacity(image.mip_count as usize);
    let mut upload_size: u64 = 0;
    for level in 0..image.mip_count {
        let width = dds::mip_extent(image.width, level);
        let height = dds::mip_extent(image.height, level);
        let (row_bytes, rows) = dds::surface_layout(image.format, width, height);
        let row_pitch = row_bytes.next_multiple_of(D3D12_TEXTURE_DATA_PITCH_ALIGNMENT);
        let offset = upload_size.next_multiple_of(D3D12_TEXTURE_DATA_PLACEMENT_ALIGNMENT as u64);
        upload_size = offset + row_pitch as u64 * rows as u64;
        copies.push(MipCopy {
            offset,
            row_pitch,
            row_bytes,
            rows,
            width,
            height,
        });
    }

    let upload = create_upload_resource(device, upload_size)?;

    unsafe {
        let mut mapped: *mut std::ffi::c_void = std::ptr::null_mut();
        upload.Map(0, None, Some(&mut mapped))?;
        let mapped = mapped as *mut u8;
        let mut source_offset = 0usize;
        for copy in &copies {
            for row in 0..copy.rows {
                std::ptr::copy_nonoverlapping(
                    image.data.as_ptr().add(source_offset),
                    mapped.add(copy.offset as usize + (row * copy.row_pitch) as usize),
                    copy.row_bytes as usize,
                );
                source_offset += copy.row_bytes as usize;
            }
        }
        upload.Unmap(0, None);
    }

    for (level, copy) in copies.iter().enumerate() {
        let dst = D3D12_TEXTURE_COPY_LOCATION {
            pResource: unsafe { std::mem::transmute_copy(&resource) },
            Type: D3D12_TEXTURE_COPY_TYPE_SUBRESOURCE_INDEX,
            Anonymous: D3D12_TEXTURE_COPY_LOCATION_0 {
                SubresourceIndex: level as u32,
            },
        };
        let src = D3D12_TEXTURE_COPY_LOCATION {
            pResource: unsafe { std::mem::transmute_copy(&upload) },
            Type: D3D12_TEXTURE_COPY_TYPE_PLACED_FOOTPRINT,
            Anonymous: D3D12_TEXTURE_COPY_LOCATION_0 {
                PlacedFootprint: D3D12_PLACED_SUBRESOURCE_FOOTPRINT {
                    Offset: copy.offset,
                    Footprint: D3D12_SUBRESOURCE_FOOTPRINT {
                        Format: image.format,
                        Width: copy.width,
                        Height: copy.height,
                        Depth: 1,
                        RowPitch: copy.row_pitch,
                    },
                },
            },
        };
        unsafe { command_list.CopyTextureRegion(&dst, 0, 0, 0, &src, None) };
    }

    unsafe {
        command_list.ResourceBarrier(&[transition_barrier(
            &resource,
            D3D12_RESOURCE_STATE_COPY_DEST,
            D3D12_RESOURCE_STATE_PIXEL_SHADER_RESOURCE,
        )])
    };

    Ok(Texture { resource, upload })
}
