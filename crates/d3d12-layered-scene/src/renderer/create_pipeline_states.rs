use std::path::Path;

use windows::core::*;
use windows::Win32::Foundation::*;
use windows::Win32::Graphics::Direct3D::*;
use windows::Win32::Graphics::Direct3D12::*;
use windows::Win32::Graphics::Dxgi::Common::*;

use super::compile_shader::compile_shader;
use super::model::RenderLayer;
use super::model::RENDER_LAYER_COUNT;

pub const BACK_BUFFER_FORMAT: DXGI_FORMAT = DXGI_FORMAT_R8G8B8A8_UNORM;
pub const DEPTH_STENCIL_FORMAT: DXGI_FORMAT = DXGI_FORMAT_D24_UNORM_S8_UINT;

/// The four pipeline-state variants, indexed by render layer. All share the
/// vertex stage and input layout; they differ in pixel stage and
/// fixed-function state. Built once at load; shader or state-object failures
/// are fatal and there is no runtime recompilation.
pub struct PipelineCatalog {
    states: [ID3D12PipelineState; RENDER_LAYER_COUNT],
}

impl PipelineCatalog {
    pub fn state(&self, layer: RenderLayer) -> &ID3D12PipelineState {
        &self.states[layer.index()]
    }
}

pub fn create_pipeline_states(
    device: &ID3D12Device,
    root_signature: &ID3D12RootSignature,
    hlsl_path: &Path,
) -> Result<PipelineCatalog> {
    let vertex_shader = compile_shader(hlsl_path, None, s!("Vertex"), s!("vs_5_1"))?;

    let light_count_defines = [
        D3D_SHADER_MACRO {
            Name: s!("MAX_NUMBER_SPOT_LIGHTS"),
            Definition: s!("1"),
        },
        D3D_SHADER_MACRO {
            Name: PCSTR::null(),
            Definition: PCSTR::null(),
        },
    ];
    let lit_pixel_shader = compile_shader(
        hlsl_path,
        Some(&light_count_defines),
        s!("LitPixel"),
        s!("ps_5_1"),
    )?;
    let channel_stencil_pixel_shader =
        compile_shader(hlsl_path, None, s!("ChannelStencilPixel"), s!("ps_5_1"))?;

    let input_layout = [
        D3D12_INPUT_ELEMENT_DESC {
            SemanticName: s!("POSITION"),
            Format: DXGI_FORMAT_R32G32B32_FLOAT,
            InputSlotClass: D3D12_INPUT_CLASSIFICATION_PER_VERTEX_DATA,
            ..Default::default()
        },
        D3D12_INPUT_ELEMENT_DESC {
            SemanticName: s!("NORMAL"),
            Format: DXGI_FORMAT_R32G32B32_FLOAT,
            AlignedByteOffset: 12,
            InputSlotClass: D3D12_INPUT_CLASSIFICATION_PER_VERTEX_DATA,
            ..Default::default()
        },
        D3D12_INPUT_ELEMENT_DESC {
            SemanticName: s!("UV"),
            Format: DXGI_FORMAT_R32G32_FLOAT,
            AlignedByteOffset: 24,
            InputSlotClass: D3D12_INPUT_CLASSIFICATION_PER_VERTEX_DATA,
            ..Default::default()
        },
    ];

    let opaque_desc = |pixel_shader: &ID3DBlob| D3D12_GRAPHICS_PIPELINE_STATE_DESC {
        pRootSignature: unsafe { std::mem::transmute_copy(root_signature) },
        VS: bytecode(&vertex_shader),
        PS: bytecode(pixel_shader),
        InputLayout: D3D12_INPUT_LAYOUT_DESC {
            pInputElementDescs: input_layout.as_ptr(),
            NumElements: input_layout.len() as u32,
        },
        RasterizerState: default_rasterizer(),
        BlendState: default_blend(),
        DepthStencilState: default_depth_stencil(),
        SampleMask: u32::MAX,
        PrimitiveTopologyType: D3D12_PRIMITIVE_TOPOLOGY_TYPE_TRIANGLE,
        NumRenderTargets: 1,
        RTVFormats: [
            BACK_BUFFER_FORMAT,
            DXGI_FORMAT_UNKNOWN,
            DXGI_FORMAT_UNKNOWN,
            DXGI_FORMAT_UNKNOWN,
            DXGI_FORMAT_UNKNOWN,
            DXGI_FORMAT_UNKNOWN,
            DXGI_FORMAT_UNKNOWN,
            DXGI_FORMAT_UNKNOWN,
        ],
        DSVFormat: DEPTH_STENCIL_FORMAT,
        SampleDesc: DXGI_SAMPLE_DESC {
            Count: 1,
            Quality: 0,
        },
        ..Default::default()
    };

    let opaque = unsafe { device.CreateGraphicsPipelineState(&opaque_desc(&lit_pixel_shader))? };

    // Stencil write: no colour output, stencil replace-on-pass with a
    // not-equal comparison so per-draw reference values accumulate.
    let stencil_face = D3D12_DEPTH_STENCILOP_DESC {
        StencilFailOp: D3D12_STENCIL_OP_ZERO,
        StencilDepthFailOp: D3D12_STENCIL_OP_KEEP,
        StencilPassOp: D3D12_STENCIL_OP_REPLACE,
        StencilFunc: D3D12_COMPARISON_FUNC_NOT_EQUAL,
    };
    let mut stencil_write_desc = opaque_desc(&lit_pixel_shader);
    stencil_write_desc.NumRenderTargets = 0;
    stencil_write_desc.RTVFormats[0] = DXGI_FORMAT_UNKNOWN;
    stencil_write_desc.DepthStencilState = D3D12_DEPTH_STENCIL_DESC {
        StencilEnable: TRUE,
        FrontFace: stencil_face,
        BackFace: stencil_face,
        ..default_depth_stencil()
    };
    let stencil_write = unsafe { device.CreateGraphicsPipelineState(&stencil_write_desc)? };

    let stencil_read_desc = opaque_desc(&channel_stencil_pixel_shader);
    let stencil_read = unsafe { device.CreateGraphicsPipelineState(&stencil_read_desc)? };

    let mut transparent_desc = opaque_desc(&lit_pixel_shader);
    transparent_desc.BlendState.RenderTarget[0] = D3D12_RENDER_TARGET_BLEND_DESC {
        BlendEnable: TRUE,
        SrcBlend: D3D12_BLEND_SRC_ALPHA,
        DestBlend: D3D12_BLEND_INV_SRC_ALPHA,
        BlendOp: D3D12_BLEND_OP_ADD,
        SrcBlendAlpha: D3D12_BLEND_ONE,
        DestBlendAlpha: D3D12_BLEND_ZERO,
        BlendOpAlpha: D3D12_BLEND_OP_ADD,
        RenderTargetWriteMask: D3D12_COLOR_WRITE_ENABLE_ALL.0 as u8,
        ..disabled_blend_target()
    };
    let transparent = unsafe { device.CreateGraphicsPipelineState(&transparent_desc)? };

    // Indexed by RenderLayer ordinal.
    Ok(PipelineCatalog {
        states: [opaque, stencil_write, stencil_read, transparent],
    })
}

fn bytecode(blob: &ID3DBlob) -> D3D12_SHADER_BYTECODE {
    unsafe {
        D3D12_SHADER_BYTECODE {
            pShaderBytecode: blob.GetBufferPointer(),
            BytecodeLength: blob.GetBufferSize(),
        }
    }
}

// The zeroed structs `Default` produces are not the D3D12 defaults; these
// spell out what CD3DX12's *_DEFAULT initializers would have written.

fn default_rasterizer() -> D3D12_RASTERIZER_DESC {
    D3D12_RASTERIZER_DESC {
        FillMode: D3D12_FILL_MODE_SOLID,
        CullMode: D3D12_CULL_MODE_BACK,
        FrontCounterClockwise: FALSE,
        DepthBias: 0,
        DepthBiasClamp: 0.0,
        SlopeScaledDepthBias: 0.0,
        DepthClipEnable: TRUE,
        MultisampleEnable: FALSE,
        AntialiasedLineEnable: FALSE,
        ForcedSampleCount: 0,
        ConservativeRaster: D3D12_CONSERVATIVE_RASTERIZATION_MODE_OFF,
    }
}

fn default_depth_stencil() -> D3D12_DEPTH_STENCIL_DESC {
    let keep = D3D12_DEPTH_STENCILOP_DESC {
        StencilFailOp: D3D12_STENCIL_OP_KEEP,
        StencilDepthFailOp: D3D12_STENCIL_OP_KEEP,
        StencilPassOp: D3D12_STENCIL_OP_KEEP,
        StencilFunc: D3D12_COMPARISON_FUNC_ALWAYS,
    };
    D3D12_DEPTH_STENCIL_DESC {
        DepthEnable: TRUE,
        DepthWriteMask: D3D12_DEPTH_WRITE_MASK_ALL,
        DepthFunc: D3D12_COMPARISON_FUNC_LESS,
        StencilEnable: FALSE,
        StencilReadMask: 0xff,
        StencilWriteMask: 0xff,
        FrontFace: keep,
        BackFace: keep,
    }
}

fn disabled_blend_target() -> D3D12_RENDER_TARGET_BLEND_DESC {
    D3D12_RENDER_TARGET_BLEND_DESC {
        BlendEnable: FALSE,
        LogicOpEnable: FALSE,
        SrcBlend: D3D12_BLEND_ONE,
        DestBlend: D3D12_BLEND_ZERO,
        BlendOp: D3D12_BLEND_OP_ADD,
        SrcBlendAlpha: D3D12_BLEND_ONE,
        DestBlendAlpha: D3D12_BLEND_ZERO,
        BlendOpAlpha: D3D12_BLEND_OP_ADD,
        LogicOp: D3D12_LOGIC_OP_NOOP,
        RenderTargetWriteMask: D3D12_COLOR_WRITE_ENABLE_ALL.0 as u8,
    }
}

fn default_blend() -> D3D12_BLEND_DESC {
    D3D12_BLEND_DESC {
        AlphaToCoverageEnable: FALSE,
        IndependentBlendEnable: FALSE,
        RenderTarget: [disabled_blend_target(); 8],
    }
}
