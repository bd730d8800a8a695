use windows::core::Result;
use windows::Win32::Foundation::CloseHandle;
use windows::Win32::Foundation::HANDLE;
use windows::Win32::Graphics::Direct3D12::*;
use windows::Win32::Graphics::Dxgi::IDXGISwapChain3;
use windows::Win32::System::Threading::CreateEventA;
use windows::Win32::System::Threading::WaitForSingleObjectEx;
use windows::Win32::System::Threading::INFINITE;

/// The CPU/GPU fence handshake. Deliberately fully synchronous: every
/// `end_frame` signals a fresh target value and blocks until the GPU reaches
/// it, so at most one frame of work is ever in flight and the single command
/// allocator and every upload buffer are free by the time the CPU touches
/// them again. A pipelined variant would keep one target per frame slot;
/// that is out of scope here.
pub struct FrameScheduler {
    fence: ID3D12Fence,
    fence_event: HANDLE,
    /// Next value to signal; strictly monotonically increasing.
    next_value: u64,
    in_flight: bool,
}

impl FrameScheduler {
    pub fn new(device: &ID3D12Device) -> Result<Self> {
        let fence: ID3D12Fence = unsafe { device.CreateFence(0, D3D12_FENCE_FLAG_NONE)? };
        let fence_event = unsafe { CreateEventA(None, false, false, None)? };
        Ok(Self {
            fence,
            fence_event,
            next_value: 1,
            in_flight: false,
        })
    }

    /// Marks the start of frame recording. The prior submission has always
    /// fully retired here because `end_frame` blocks.
    pub fn begin_frame(&mut self) {
        debug_assert!(!self.in_flight, "previous frame was never resolved");
        self.in_flight = true;
    }

    /// Signals the queue, blocks until the GPU has caught up, and reads the
    /// swap chain's new back-buffer index.
    pub fn end_frame(
        &mut self,
        queue: &ID3D12CommandQueue,
        swap_chain: &IDXGISwapChain3,
    ) -> Result<u32> {
        self.signal_and_wait(queue)?;
        self.in_flight = false;
        Ok(unsafe { swap_chain.GetCurrentBackBufferIndex() })
    }

    /// Drains all submitted work. Used after the initial upload command list
    /// and before teardown.
    pub fn flush(&mut self, queue: &ID3D12CommandQueue) -> Result<()> {
        self.signal_and_wait(queue)?;
        self.in_flight = false;
        Ok(())
    }

    fn signal_and_wait(&mut self, queue: &ID3D12CommandQueue) -> Result<()> {
        let target = self.next_value;
        unsafe { queue.Signal(&self.fence, target)? };
        self.next_value += 1;

        if unsafe { self.fence.GetCompletedValue() } < target {
            unsafe {
                self.fence.SetEventOnCompletion(target, self.fence_event)?;
                WaitForSingleObjectEx(self.fence_event, INFINITE, false);
            }
        }
        Ok(())
    }
}

impl Drop for FrameScheduler {
    fn drop(&mut self) {
        unsafe {
            if !self.fence_event.is_invalid() {
                CloseHandle(self.fence_event).ok();
            }
        }
    }
}
