use windows::core::Result;
use windows::Win32::Graphics::Direct3D::D3D_PRIMITIVE_TOPOLOGY_TRIANGLELIST;
use windows::Win32::Graphics::Direct3D12::*;

use crate::config::SceneConfig;

use super::model::RenderLayer;
use super::resources::Resources;
use super::resources::DEPTH_DSV_SLOT;
use super::resources::MASK_DSV_SLOT;
use super::resources::MASK_SRV_SLOT;
use super::resources::MATERIAL_SRV_BASE;
use super::resources::NULL_SRV_SLOT;
use super::transition_barrier::transition_barrier;

const CLEAR_COLOUR: [f32; 4] = [0.0, 0.2, 0.4, 1.0];

/// Records the frame's command list: state transitions, bindings, clears,
/// and the per-layer draw submission in ascending layer order. Legal only
/// because the scheduler guarantees the previous frame has fully retired
/// before the allocator is reset.
pub fn populate_command_list(config: &SceneConfig, resources: &Resources) -> Result<()> {
    let command_allocator = &resources.command_allocator;
    unsafe { command_allocator.Reset()? };

    let command_list = &resources.command_list;
    unsafe {
        command_list.Reset(
            command_allocator,
            resources.pipelines.state(RenderLayer::Opaque),
        )?
    };

    // Root signature, constant-buffer heap, and the full-window raster state.
    unsafe {
        command_list.SetGraphicsRootSignature(&resources.root_signature);
        command_list.SetDescriptorHeaps(&[Some(resources.cbv_heap.heap().clone())]);
        command_list.RSSetViewports(&[resources.viewport]);
        command_list.RSSetScissorRects(&[resources.scissor_rect]);
    }

    // The back buffer leaves present state for the duration of the frame.
    let barrier_to_render_target = transition_barrier(
        &resources.render_targets[resources.frame_index as usize],
        D3D12_RESOURCE_STATE_PRESENT,
        D3D12_RESOURCE_STATE_RENDER_TARGET,
    );
    unsafe { command_list.ResourceBarrier(&[barrier_to_render_target]) };

    unsafe {
        command_list.IASetPrimitiveTopology(D3D_PRIMITIVE_TOPOLOGY_TRIANGLELIST);
        command_list.SetGraphicsRootDescriptorTable(0, resources.cbv_heap.gpu_at(0));
        command_list.SetDescriptorHeaps(&[Some(resources.srv_heap.heap().clone())]);
        command_list
            .SetGraphicsRootDescriptorTable(3, resources.srv_heap.gpu_at(MATERIAL_SRV_BASE));
    }

    let rtv_handle = resources.rtv_heap.cpu_at(resources.frame_index);
    let dsv_handle = resources.dsv_heap.cpu_at(DEPTH_DSV_SLOT);
    unsafe {
        command_list.OMSetRenderTargets(1, Some(&rtv_handle), false, Some(&dsv_handle));
        command_list.ClearRenderTargetView(rtv_handle, &CLEAR_COLOUR, None);
        command_list.ClearDepthStencilView(
            dsv_handle,
            D3D12_CLEAR_FLAG_DEPTH | D3D12_CLEAR_FLAG_STENCIL,
            1.0,
            0,
            &[],
        );
        command_list.SetPipelineState(resources.pipelines.state(RenderLayer::Opaque));
        command_list.SetGraphicsRootDescriptorTable(2, resources.srv_heap.gpu_at(NULL_SRV_SLOT));
    }

    draw_layer(resources, RenderLayer::Opaque);

    if config.stencil_pass_enabled {
        record_mask_passes(resources, rtv_handle, dsv_handle);
    }

    let barrier_to_present = transition_barrier(
        &resources.render_targets[resources.frame_index as usize],
        D3D12_RESOURCE_STATE_RENDER_TARGET,
        D3D12_RESOURCE_STATE_PRESENT,
    );
    unsafe { command_list.ResourceBarrier(&[barrier_to_present]) };

    unsafe { command_list.Close() }
}

/// Issues one indexed draw per model in the given layer. The model list is
/// layer-sorted at load, so each pass touches one contiguous run.
fn draw_layer(resources: &Resources, layer: RenderLayer) {
    let command_list = &resources.command_list;
    for model in resources.models.iter().filter(|model| model.layer == layer) {
        let mesh = &resources.meshes[model.mesh as usize];
        unsafe {
            command_list.SetGraphicsRootConstantBufferView(1, model.buffer.gpu_virtual_address());
            command_list.IASetVertexBuffers(0, Some(&[mesh.vertex_buffer_view]));
            command_list.IASetIndexBuffer(Some(&mesh.index_buffer_view));
            command_list.DrawIndexedInstanced(mesh.index_count, 1, 0, 0, 0);
        }
    }
}

/// The stencil-write → stencil-read → transparent tail of the frame.
/// Masked and transparent models are first rasterized into the auxiliary
/// stencil buffer with per-draw reference values, then the readers sample
/// that buffer while the transparent layer blends over the top.
fn record_mask_passes(
    resources: &Resources,
    rtv_handle: D3D12_CPU_DESCRIPTOR_HANDLE,
    dsv_handle: D3D12_CPU_DESCRIPTOR_HANDLE,
) {
    let command_list = &resources.command_list;

    let mask_to_depth_write = transition_barrier(
        &resources.channel_stencil,
        D3D12_RESOURCE_STATE_GENERIC_READ,
        D3D12_RESOURCE_STATE_DEPTH_WRITE,
    );
    let mask_dsv_handle = resources.dsv_heap.cpu_at(MASK_DSV_SLOT);
    unsafe {
        command_list.ResourceBarrier(&[mask_to_depth_write]);
        command_list.OMSetRenderTargets(0, None, false, Some(&mask_dsv_handle));
        command_list.ClearDepthStencilView(
            mask_dsv_handle,
            D3D12_CLEAR_FLAG_DEPTH | D3D12_CLEAR_FLAG_STENCIL,
            1.0,
            0,
            &[],
        );
        command_list.SetPipelineState(resources.pipelines.state(RenderLayer::StencilWrite));
    }
    for (index, model) in resources.models.iter().enumerate() {
        if !matches!(
            model.layer,
            RenderLayer::Transparent | RenderLayer::StencilRead
        ) {
            continue;
        }
        let mesh = &resources.meshes[model.mesh as usize];
        unsafe {
            // Spread the reference bits so each colour channel gets its own
            // stencil plane.
            command_list.OMSetStencilRef(1 << ((index % 3) * 2));
            command_list.SetGraphicsRootConstantBufferView(1, model.buffer.gpu_virtual_address());
            command_list.IASetVertexBuffers(0, Some(&[mesh.vertex_buffer_view]));
            command_list.IASetIndexBuffer(Some(&mesh.index_buffer_view));
            command_list.DrawIndexedInstanced(mesh.index_count, 1, 0, 0, 0);
        }
    }
    let mask_to_generic_read = transition_barrier(
        &resources.channel_stencil,
        D3D12_RESOURCE_STATE_DEPTH_WRITE,
        D3D12_RESOURCE_STATE_GENERIC_READ,
    );
    unsafe { command_list.ResourceBarrier(&[mask_to_generic_read]) };

    unsafe {
        command_list.SetPipelineState(resources.pipelines.state(RenderLayer::StencilRead));
        command_list.SetGraphicsRootDescriptorTable(2, resources.srv_heap.gpu_at(MASK_SRV_SLOT));
        command_list.OMSetRenderTargets(1, Some(&rtv_handle), false, Some(&dsv_handle));
        command_list.ClearRenderTargetView(rtv_handle, &CLEAR_COLOUR, None);
        command_list.ClearDepthStencilView(
            dsv_handle,
            D3D12_CLEAR_FLAG_DEPTH | D3D12_CLEAR_FLAG_STENCIL,
            1.0,
            0,
            &[],
        );
    }
    draw_layer(resources, RenderLayer::StencilRead);

    unsafe {
        command_list.SetPipelineState(resources.pipelines.state(RenderLayer::Transparent));
        command_list.SetGraphicsRootDescriptorTable(2, resources.srv_heap.gpu_at(NULL_SRV_SLOT));
    }
    draw_layer(resources, RenderLayer::Transparent);
}
