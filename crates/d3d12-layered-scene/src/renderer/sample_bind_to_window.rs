use eyre::Result;
use windows::core::Interface;
use windows::Win32::Foundation::HWND;
use windows::Win32::Foundation::RECT;
use windows::Win32::Graphics::Direct3D12::*;
use windows::Win32::Graphics::Dxgi::Common::*;
use windows::Win32::Graphics::Dxgi::*;

use crate::config::FRAME_COUNT;

use super::create_pipeline_states::BACK_BUFFER_FORMAT;
use super::descriptor_arena::DescriptorArena;
use super::load_assets::load_assets;
use super::resources::Resources;
use super::sample::LayeredSceneSample;

/// Creates the queue, swap chain, descriptor heaps, and render-target views,
/// then loads the scene's assets. Finishes by executing the open upload
/// command list and draining the queue, so the first rendered frame sees
/// fully resident resources.
pub fn bind_to_window(sample: &mut LayeredSceneSample, hwnd: &HWND) -> Result<()> {
    let device = &sample.device;
    let config = &sample.config;

    let command_queue: ID3D12CommandQueue = unsafe {
        device.CreateCommandQueue(&D3D12_COMMAND_QUEUE_DESC {
            Type: D3D12_COMMAND_LIST_TYPE_DIRECT,
            ..Default::default()
        })?
    };

    let swap_chain_desc = DXGI_SWAP_CHAIN_DESC1 {
        BufferCount: FRAME_COUNT as u32,
        Width: config.width,
        Height: config.height,
        Format: BACK_BUFFER_FORMAT,
        BufferUsage: DXGI_USAGE_RENDER_TARGET_OUTPUT,
        SwapEffect: DXGI_SWAP_EFFECT_FLIP_DISCARD,
        SampleDesc: DXGI_SAMPLE_DESC {
            Count: 1,
            Quality: 0,
        },
        ..Default::default()
    };

    let swap_chain_base: IDXGISwapChain1 = unsafe {
        sample
            .dxgi_factory
            .CreateSwapChainForHwnd(&command_queue, *hwnd, &swap_chain_desc, None, None)?
    };
    let swap_chain: IDXGISwapChain3 = swap_chain_base.cast()?;

    // Fullscreen transitions are not supported.
    unsafe {
        sample
            .dxgi_factory
            .MakeWindowAssociation(*hwnd, DXGI_MWA_NO_ALT_ENTER)?
    };

    let frame_index = unsafe { swap_chain.GetCurrentBackBufferIndex() };

    let mut rtv_heap = DescriptorArena::new(
        device,
        D3D12_DESCRIPTOR_HEAP_TYPE_RTV,
        config.rtv_heap_capacity(),
        false,
    )?;
    let render_targets: [ID3D12Resource; FRAME_COUNT] =
        array_init::try_array_init(|i| -> windows::core::Result<ID3D12Resource> {
            let buffer: ID3D12Resource = unsafe { swap_chain.GetBuffer(i as u32)? };
            unsafe { device.CreateRenderTargetView(&buffer, None, rtv_heap.allocate()) };
            Ok(buffer)
        })?;

    let mut dsv_heap = DescriptorArena::new(
        device,
        D3D12_DESCRIPTOR_HEAP_TYPE_DSV,
        config.dsv_heap_capacity(),
        false,
    )?;
    let mut cbv_heap = DescriptorArena::new(
        device,
        D3D12_DESCRIPTOR_HEAP_TYPE_CBV_SRV_UAV,
        config.cbv_heap_capacity(),
        true,
    )?;
    let mut srv_heap = DescriptorArena::new(
        device,
        D3D12_DESCRIPTOR_HEAP_TYPE_CBV_SRV_UAV,
        config.srv_heap_capacity(),
        true,
    )?;

    let command_allocator: ID3D12CommandAllocator =
        unsafe { device.CreateCommandAllocator(D3D12_COMMAND_LIST_TYPE_DIRECT)? };

    let viewport = D3D12_VIEWPORT {
        TopLeftX: 0.0,
        TopLeftY: 0.0,
        Width: config.width as f32,
        Height: config.height as f32,
        MinDepth: D3D12_MIN_DEPTH,
        MaxDepth: D3D12_MAX_DEPTH,
    };
    let scissor_rect = RECT {
        left: 0,
        top: 0,
        right: config.width as i32,
        bottom: config.height as i32,
    };

    let assets = load_assets(
        device,
        config,
        &sample.scene,
        &command_allocator,
        &mut cbv_heap,
        &mut srv_heap,
        &mut dsv_heap,
    )?;
    // Loading populates every heap exactly to its sized capacity.
    debug_assert_eq!(cbv_heap.len(), config.cbv_heap_capacity());
    debug_assert_eq!(srv_heap.len(), config.srv_heap_capacity());
    debug_assert_eq!(dsv_heap.len(), config.dsv_heap_capacity());

    let mut resources = Resources {
        command_queue,
        swap_chain,
        frame_index,
        render_targets,
        rtv_heap,
        dsv_heap,
        cbv_heap,
        srv_heap,
        viewport,
        scissor_rect,
        command_allocator,
        command_list: assets.command_list,
        root_signature: assets.root_signature,
        pipelines: assets.pipelines,
        meshes: assets.meshes,
        models: assets.models,
        per_scene: assets.per_scene,
        depth_stencil: assets.depth_stencil,
        channel_stencil: assets.channel_stencil,
        material_textures: assets.material_textures,
        scheduler: assets.scheduler,
    };

    // The list carries the texture staging copies; run it and wait before
    // the first frame is recorded.
    unsafe { resources.command_list.Close()? };
    let command_lists = [Some(resources.command_list.cast::<ID3D12CommandList>()?)];
    unsafe { resources.command_queue.ExecuteCommandLists(&command_lists) };
    resources.scheduler.flush(&resources.command_queue)?;
    resources.frame_index = unsafe { resources.swap_chain.GetCurrentBackBufferIndex() };

    sample.resources = Some(resources);

    Ok(())
}
