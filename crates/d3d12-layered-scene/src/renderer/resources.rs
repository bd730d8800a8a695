use windows::Win32::Foundation::RECT;
use windows::Win32::Graphics::Direct3D12::*;
use windows::Win32::Graphics::Dxgi::IDXGISwapChain3;

use crate::config::FRAME_COUNT;
use crate::constant_data::PerScene;
use crate::geometry::MESH_KIND_COUNT;

use super::create_pipeline_states::PipelineCatalog;
use super::descriptor_arena::DescriptorArena;
use super::frame_sync::FrameScheduler;
use super::mesh::Mesh;
use super::model::Model;
use super::texture_loader::Texture;
use super::write_buffer::WriteBuffer;

/// SRV heap slot of the channel-stencil mask view.
pub const MASK_SRV_SLOT: u32 = 0;
/// SRV heap slot of the reserved null view.
pub const NULL_SRV_SLOT: u32 = 1;
/// First SRV heap slot of the material textures.
pub const MATERIAL_SRV_BASE: u32 = 2;

/// DSV heap slot of the main depth buffer.
pub const DEPTH_DSV_SLOT: u32 = 0;
/// DSV heap slot of the channel-stencil buffer.
pub const MASK_DSV_SLOT: u32 = 1;

/// Everything created against a window: swap chain, heaps, pipelines, and
/// the loaded scene. Dropped as a unit after a final GPU drain.
pub struct Resources {
    pub command_queue: ID3D12CommandQueue,
    pub swap_chain: IDXGISwapChain3,
    pub frame_index: u32,
    pub render_targets: [ID3D12Resource; FRAME_COUNT],
    pub rtv_heap: DescriptorArena,
    pub dsv_heap: DescriptorArena,
    pub cbv_heap: DescriptorArena,
    pub srv_heap: DescriptorArena,
    pub viewport: D3D12_VIEWPORT,
    pub scissor_rect: RECT,
    pub command_allocator: ID3D12CommandAllocator,
    pub command_list: ID3D12GraphicsCommandList,
    pub root_signature: ID3D12RootSignature,
    pub pipelines: PipelineCatalog,
    pub meshes: [Mesh; MESH_KIND_COUNT],
    pub models: Vec<Model>,
    pub per_scene: WriteBuffer<PerScene>,
    pub depth_stencil: ID3D12Resource,
    pub channel_stencil: ID3D12Resource,
    pub material_textures: Vec<Texture>,
    pub scheduler: FrameScheduler,
}
