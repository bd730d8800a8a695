use windows::core::Result;
use windows::Win32::Graphics::Direct3D12::*;

/// A descriptor heap sized exactly to a known maximum, with append-only
/// slot allocation. Slots are never freed individually; exceeding the
/// capacity is a logic defect, not a runtime condition.
pub struct DescriptorArena {
    heap: ID3D12DescriptorHeap,
    increment: u32,
    capacity: u32,
    len: u32,
}

impl DescriptorArena {
    pub fn new(
        device: &ID3D12Device,
        heap_type: D3D12_DESCRIPTOR_HEAP_TYPE,
        capacity: u32,
        shader_visible: bool,
    ) -> Result<Self> {
        let flags = if shader_visible {
            D3D12_DESCRIPTOR_HEAP_FLAG_SHADER_VISIBLE
        } else {
            D3D12_DESCRIPTOR_HEAP_FLAG_NONE
        };
        let heap: ID3D12DescriptorHeap = unsafe {
            device.CreateDescriptorHeap(&D3D12_DESCRIPTOR_HEAP_DESC {
                NumDescriptors: capacity,
                Type: heap_type,
                Flags: flags,
                ..Default::default()
            })?
        };
        let increment = unsafe { device.GetDescriptorHandleIncrementSize(heap_type) };
        Ok(Self {
            heap,
            increment,
            capacity,
            len: 0,
        })
    }

    /// Hands out the next free slot.
    pub fn allocate(&mut self) -> D3D12_CPU_DESCRIPTOR_HANDLE {
        assert!(
            self.len < self.capacity,
            "descriptor heap exhausted ({} slots)",
            self.capacity
        );
        let handle = self.cpu_at(self.len);
        self.len += 1;
        handle
    }

    pub fn cpu_at(&self, index: u32) -> D3D12_CPU_DESCRIPTOR_HANDLE {
        let start = unsafe { self.heap.GetCPUDescriptorHandleForHeapStart() };
        D3D12_CPU_DESCRIPTOR_HANDLE {
            ptr: start.ptr + (index * self.increment) as usize,
        }
    }

    /// Only valid for shader-visible heaps.
    pub fn gpu_at(&self, index: u32) -> D3D12_GPU_DESCRIPTOR_HANDLE {
        let start = unsafe { self.heap.GetGPUDescriptorHandleForHeapStart() };
        D3D12_GPU_DESCRIPTOR_HANDLE {
            ptr: start.ptr + (index * self.increment) as u64,
        }
    }

    pub fn heap(&self) -> &ID3D12DescriptorHeap {
        &self.heap
    }

    pub fn len(&self) -> u32 {
        self.len
    }
}
