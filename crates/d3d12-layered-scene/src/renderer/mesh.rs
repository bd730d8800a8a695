use windows::core::*;
use windows::Win32::Graphics::Direct3D12::*;
use windows::Win32::Graphics::Dxgi::Common::*;

use crate::geometry::MeshData;
use crate::geometry::VERTEX_STRIDE;

/// GPU-resident mesh: upload-heap vertex and index buffers plus their
/// views. Immutable after creation; models reference meshes without owning
/// them.
pub struct Mesh {
    pub vertex_buffer: ID3D12Resource,
    pub vertex_buffer_view: D3D12_VERTEX_BUFFER_VIEW,
    pub index_buffer: ID3D12Resource,
    pub index_buffer_view: D3D12_INDEX_BUFFER_VIEW,
    pub index_count: u32,
}

/// Uploads mesh data into freshly allocated buffers sized exactly to the
/// source arrays. Vertices are 32 bytes each, indices 32-bit.
pub fn create_mesh(device: &ID3D12Device, data: &MeshData) -> Result<Mesh> {
    let vertex_bytes: &[u8] = unsafe {
        std::slice::from_raw_parts(
            data.vertices.as_ptr() as *const u8,
            data.vertices.len() * VERTEX_STRIDE as usize,
        )
    };
    let vertex_buffer = create_upload_buffer(device, vertex_bytes, w!("MeshVertexBuffer"))?;
    let vertex_buffer_view = D3D12_VERTEX_BUFFER_VIEW {
        BufferLocation: unsafe { vertex_buffer.GetGPUVirtualAddress() },
        StrideInBytes: VERTEX_STRIDE,
        SizeInBytes: vertex_bytes.len() as u32,
    };

    let index_bytes: &[u8] = unsafe {
        std::slice::from_raw_parts(
            data.indices.as_ptr() as *const u8,
            data.indices.len() * std::mem::size_of::<u32>(),
        )
    };
    let index_buffer = create_upload_buffer(device, index_bytes, w!("MeshIndexBuffer"))?;
    let index_buffer_view = D3D12_INDEX_BUFFER_VIEW {
        BufferLocation: unsafe { index_buffer.GetGPUVirtualAddress() },
        SizeInBytes: index_bytes.len() as u32,
        Format: DXGI_FORMAT_R32_UINT,
    };

    Ok(Mesh {
        vertex_buffer,
        vertex_buffer_view,
        index_buffer,
        index_buffer_view,
        index_count: data.indices.len() as u32,
    })
}

/// Buffer description for a plain byte buffer of the given size.
pub fn buffer_desc(size: u64) -> D3D12_RESOURCE_DESC {
    D3D12_RESOURCE_DESC {
        Dimension: D3D12_RESOURCE_DIMENSION_BUFFER,
        Alignment: 0,
        Width: size,
        Height: 1,
        DepthOrArraySize: 1,
        MipLevels: 1,
        Format: DXGI_FORMAT_UNKNOWN,
        SampleDesc: DXGI_SAMPLE_DESC {
            Count: 1,
            Quality: 0,
        },
        Layout: D3D12_TEXTURE_LAYOUT_ROW_MAJOR,
        Flags: D3D12_RESOURCE_FLAG_NONE,
    }
}

pub fn create_upload_resource(device: &ID3D12Device, size: u64) -> Result<ID3D12Resource> {
    let heap_props = D3D12_HEAP_PROPERTIES {
        Type: D3D12_HEAP_TYPE_UPLOAD,
        ..Default::default()
    };
    let mut resource: Option<ID3D12Resource> = None;
    unsafe {
        device.CreateCommittedResource(
            &heap_props,
            D3D12_HEAP_FLAG_NONE,
            &buffer_desc(size),
            D3D12_RESOURCE_STATE_GENERIC_READ,
            None,
            &mut resource,
        )?
    };
    Ok(resource.unwrap())
}

fn create_upload_buffer(
    device: &ID3D12Device,
    bytes: &[u8],
    name: PCWSTR,
) -> Result<ID3D12Resource> {
    let buffer = create_upload_resource(device, bytes.len() as u64)?;
    unsafe { buffer.SetName(name) }.ok();

    unsafe {
        let mut data_ptr = std::ptr::null_mut();
        let read_range = D3D12_RANGE { Begin: 0, End: 0 }; // We do not intend to read
        buffer.Map(0, Some(&read_range), Some(&mut data_ptr))?;
        std::ptr::copy_nonoverlapping(bytes.as_ptr(), data_ptr as *mut u8, bytes.len());
        buffer.Unmap(0, None);
    }

    Ok(buffer)
}
