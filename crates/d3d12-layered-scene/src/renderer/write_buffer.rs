use windows::core::Result;
use windows::Win32::Graphics::Direct3D12::*;

use crate::constant_data::align_to_256;

use super::descriptor_arena::DescriptorArena;
use super::mesh::create_upload_resource;

/// A CPU-writable, GPU-readable constant buffer holding one record. The
/// upload allocation is rounded up to the 256-byte constant-buffer alignment
/// and stays persistently mapped for the buffer's lifetime — upload-heap
/// memory needs no unmap-before-read handshake.
pub struct WriteBuffer<T> {
    pub data: T,
    resource: ID3D12Resource,
    mapped: *mut u8,
    gpu_address: u64,
}

impl<T: Copy> WriteBuffer<T> {
    /// Pushes the current CPU record to GPU-visible memory. This is a raw
    /// overwrite with no synchronization against in-flight reads; the frame
    /// scheduler's blocking wait is what makes calling it between frames
    /// safe.
    pub fn update(&self) {
        unsafe {
            std::ptr::copy_nonoverlapping(
                &self.data as *const T as *const u8,
                self.mapped,
                std::mem::size_of::<T>(),
            );
        }
    }

    pub fn gpu_virtual_address(&self) -> u64 {
        self.gpu_address
    }
}

/// Allocates the buffer, records its view at the next constant-buffer heap
/// slot, and maps it permanently.
pub fn create_constant_buffer<T: Copy + Default>(
    device: &ID3D12Device,
    cbv_heap: &mut DescriptorArena,
) -> Result<WriteBuffer<T>> {
    let size = align_to_256(std::mem::size_of::<T>()) as u32;
    let resource = create_upload_resource(device, size as u64)?;
    let gpu_address = unsafe { resource.GetGPUVirtualAddress() };

    unsafe {
        device.CreateConstantBufferView(
            Some(&D3D12_CONSTANT_BUFFER_VIEW_DESC {
                BufferLocation: gpu_address,
                SizeInBytes: size,
            }),
            cbv_heap.allocate(),
        );
    }

    let mut mapped = std::ptr::null_mut();
    let read_range = D3D12_RANGE { Begin: 0, End: 0 };
    unsafe { resource.Map(0, Some(&read_range), Some(&mut mapped))? };

    Ok(WriteBuffer {
        data: T::default(),
        resource,
        mapped: mapped as *mut u8,
        gpu_address,
    })
}
