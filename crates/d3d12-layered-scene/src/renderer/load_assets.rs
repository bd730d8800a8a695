use std::path::Path;
use std::path::PathBuf;

use bevy_math::Mat4;
use bevy_math::Vec3;
use bevy_math::Vec4;
use eyre::eyre;
use eyre::Result;
use tracing::debug;
use tracing::info;
use windows::Win32::Graphics::Direct3D12::*;

use crate::config::SceneConfig;
use crate::constant_data::PerModel;
use crate::constant_data::PerScene;
use crate::geometry::create_box;
use crate::geometry::create_grid;
use crate::geometry::MeshKind;
use crate::geometry::MESH_KIND_COUNT;
use crate::mesh_file::load_mesh_text;
use crate::scene::SceneState;

use super::create_pipeline_states::create_pipeline_states;
use super::create_pipeline_states::PipelineCatalog;
use super::create_root_signature::create_root_signature;
use super::depth_stencil::create_channel_stencil_srv;
use super::depth_stencil::create_channel_stencil_texture;
use super::depth_stencil::create_depth_stencil_buffer;
use super::depth_stencil::create_depth_stencil_view;
use super::depth_stencil::create_null_colour_srv;
use super::descriptor_arena::DescriptorArena;
use super::frame_sync::FrameScheduler;
use super::mesh::create_mesh;
use super::mesh::Mesh;
use super::model::Model;
use super::model::RenderLayer;
use super::texture_loader::load_texture;
use super::texture_loader::Texture;
use super::write_buffer::create_constant_buffer;
use super::write_buffer::WriteBuffer;

const MATERIAL_TEXTURE_FILES: [&str; 3] = [
    "textures/tile.dds",
    "textures/bricks2.dds",
    "textures/checkboard.dds",
];

/// Everything `load_assets` produces. The command list is returned still
/// open — the texture staging copies are recorded on it and the caller
/// closes, executes, and drains it.
pub struct Assets {
    pub root_signature: ID3D12RootSignature,
    pub pipelines: PipelineCatalog,
    pub command_list: ID3D12GraphicsCommandList,
    pub meshes: [Mesh; MESH_KIND_COUNT],
    pub models: Vec<Model>,
    pub per_scene: WriteBuffer<PerScene>,
    pub depth_stencil: ID3D12Resource,
    pub channel_stencil: ID3D12Resource,
    pub material_textures: Vec<Texture>,
    pub scheduler: FrameScheduler,
}

pub fn load_assets(
    device: &ID3D12Device,
    config: &SceneConfig,
    scene: &SceneState,
    command_allocator: &ID3D12CommandAllocator,
    cbv_heap: &mut DescriptorArena,
    srv_heap: &mut DescriptorArena,
    dsv_heap: &mut DescriptorArena,
) -> Result<Assets> {
    let root_signature = create_root_signature(device)?;
    let shader_path = locate_asset("lit.hlsl", "src/lit.hlsl")?;
    let pipelines = create_pipeline_states(device, &root_signature, &shader_path)?;

    let command_list: ID3D12GraphicsCommandList = unsafe {
        device.CreateCommandList(0, D3D12_COMMAND_LIST_TYPE_DIRECT, command_allocator, None)?
    };

    let mut material_textures = Vec::with_capacity(config.texture_count);
    for file in MATERIAL_TEXTURE_FILES {
        let path = locate_asset(file, file)?;
        material_textures.push(load_texture(device, &command_list, &path)?);
    }
    debug_assert_eq!(material_textures.len(), config.texture_count);

    let gem_path = locate_asset("models/gem.txt", "models/gem.txt")?;
    let meshes = [
        create_mesh(device, &create_grid(3.0, 3.0, 2, 2))?,
        create_mesh(device, &create_box(1.0, 1.0, 1.0))?,
        create_mesh(device, &load_mesh_text(&gem_path)?)?,
    ];

    let mut per_scene: WriteBuffer<PerScene> = create_constant_buffer(device, cbv_heap)?;
    per_scene.data = scene.per_scene();
    per_scene.update();

    let mut models = Vec::with_capacity(config.model_count());
    for placement in scene_layout() {
        let buffer = create_constant_buffer::<PerModel>(device, cbv_heap)?;
        let mut model = Model {
            layer: placement.layer,
            mesh: placement.mesh,
            buffer,
        };
        let mut record = PerModel::default();
        record.model = placement.transform;
        record.diffuse_colour = placement.diffuse;
        record.specular_exponent = 100.0;
        record.specular_intensity = 10.0;
        model.buffer.data = record;
        model.buffer.update();
        models.push(model);
    }
    // Classified once here; the recorder relies on this order ever after.
    models.sort_by_key(|model| model.layer);
    for layer in [
        RenderLayer::Opaque,
        RenderLayer::StencilWrite,
        RenderLayer::StencilRead,
        RenderLayer::Transparent,
    ] {
        debug_assert_eq!(
            models.iter().filter(|model| model.layer == layer).count(),
            config.models_in_layer(layer),
        );
    }

    // SRV heap order is load-bearing: mask view, reserved null view, then
    // the material textures.
    let channel_stencil = create_channel_stencil_texture(device, config.width, config.height)?;
    create_channel_stencil_srv(device, &channel_stencil, srv_heap.allocate());
    create_null_colour_srv(device, srv_heap.allocate());
    for texture in &material_textures {
        let resource_desc = unsafe { texture.resource.GetDesc() };
        let srv_desc = D3D12_SHADER_RESOURCE_VIEW_DESC {
            Format: resource_desc.Format,
            ViewDimension: D3D12_SRV_DIMENSION_TEXTURE2D,
            Shader4ComponentMapping: D3D12_DEFAULT_SHADER_4_COMPONENT_MAPPING,
            Anonymous: D3D12_SHADER_RESOURCE_VIEW_DESC_0 {
                Texture2D: D3D12_TEX2D_SRV {
                    MostDetailedMip: 0,
                    MipLevels: resource_desc.MipLevels as u32,
                    PlaneSlice: 0,
                    ResourceMinLODClamp: 0.0,
                },
            },
        };
        unsafe {
            device.CreateShaderResourceView(
                &texture.resource,
                Some(&srv_desc),
                srv_heap.allocate(),
            )
        };
    }

    let depth_stencil = create_depth_stencil_buffer(device, config.width, config.height)?;
    create_depth_stencil_view(device, &depth_stencil, dsv_heap.allocate());
    create_depth_stencil_view(device, &channel_stencil, dsv_heap.allocate());

    let scheduler = FrameScheduler::new(device)?;

    info!(
        "assets loaded: {} models over {} meshes, {} textures",
        models.len(),
        meshes.len(),
        material_textures.len()
    );

    Ok(Assets {
        root_signature,
        pipelines,
        command_list,
        meshes,
        models,
        per_scene,
        depth_stencil,
        channel_stencil,
        material_textures,
        scheduler,
    })
}

/// One model's load-time description.
pub struct ModelPlacement {
    pub mesh: MeshKind,
    pub layer: RenderLayer,
    pub transform: Mat4,
    pub diffuse: Vec4,
}

/// The fixed scene: six grid panels forming the faces of an open box pushed
/// ten units down +Z, three half-scale cubes masked through the channel
/// stencil, and one small opaque cube at the origin.
pub fn scene_layout() -> Vec<ModelPlacement> {
    use std::f32::consts::FRAC_PI_2;
    use std::f32::consts::PI;

    let panel = |transform: Mat4| ModelPlacement {
        mesh: MeshKind::Grid,
        layer: RenderLayer::Transparent,
        transform,
        diffuse: Vec4::new(1.0, 1.0, 1.0, 0.5),
    };
    let cube = |transform: Mat4, diffuse: Vec4| ModelPlacement {
        mesh: MeshKind::Box,
        layer: RenderLayer::StencilRead,
        transform,
        diffuse,
    };

    vec![
        panel(Mat4::from_translation(Vec3::new(0.0, 1.5, 10.0))),
        panel(
            Mat4::from_translation(Vec3::new(1.5, 0.0, 10.0)) * Mat4::from_rotation_z(-FRAC_PI_2),
        ),
        panel(
            Mat4::from_translation(Vec3::new(0.0, 0.0, 11.5)) * Mat4::from_rotation_x(FRAC_PI_2),
        ),
        panel(Mat4::from_translation(Vec3::new(0.0, -1.5, 10.0)) * Mat4::from_rotation_z(PI)),
        panel(
            Mat4::from_translation(Vec3::new(-1.5, 0.0, 10.0)) * Mat4::from_rotation_z(FRAC_PI_2),
        ),
        panel(
            Mat4::from_translation(Vec3::new(0.0, 0.0, 8.5)) * Mat4::from_rotation_x(-FRAC_PI_2),
        ),
        cube(
            Mat4::from_translation(Vec3::new(-1.0, 0.0, 10.0)) * Mat4::from_scale(Vec3::splat(0.5)),
            Vec4::new(1.0, 0.0, 0.0, 1.0),
        ),
        cube(
            Mat4::from_translation(Vec3::new(0.0, 0.0, 10.0)) * Mat4::from_scale(Vec3::splat(0.5)),
            Vec4::new(0.0, 1.0, 0.0, 1.0),
        ),
        cube(
            Mat4::from_translation(Vec3::new(1.0, 0.0, 10.0)) * Mat4::from_scale(Vec3::splat(0.5)),
            Vec4::new(0.0, 0.0, 1.0, 1.0),
        ),
        ModelPlacement {
            mesh: MeshKind::Box,
            layer: RenderLayer::Opaque,
            transform: Mat4::from_scale(Vec3::splat(0.3)),
            diffuse: Vec4::ONE,
        },
    ]
}

/// Assets live next to the executable; during development they are picked
/// up from the crate directory instead.
fn locate_asset(exe_relative: &str, crate_relative: &str) -> Result<PathBuf> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let candidate = exe_dir.join(exe_relative);
            if candidate.exists() {
                return Ok(candidate);
            }
        }
    }
    let fallback = Path::new(env!("CARGO_MANIFEST_DIR")).join(crate_relative);
    if fallback.exists() {
        debug!("asset {exe_relative} not found next to the executable, using {}", fallback.display());
        return Ok(fallback);
    }
    Err(eyre!(
        "asset {exe_relative} not found next to the executable or in the crate directory"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneConfig;
    use crate::renderer::model::RENDER_LAYER_COUNT;

    #[test]
    fn layout_matches_configured_allocations() {
        let config = SceneConfig::default();
        let layout = scene_layout();
        assert_eq!(layout.len(), config.model_count());

        let mut per_mesh = [0usize; MESH_KIND_COUNT];
        let mut per_layer = [0usize; RENDER_LAYER_COUNT];
        for placement in &layout {
            per_mesh[placement.mesh as usize] += 1;
            per_layer[placement.layer.index()] += 1;
        }
        assert_eq!(per_mesh, config.models_per_mesh);
        assert_eq!(per_layer, config.models_per_layer);
    }

    #[test]
    fn sorted_layout_is_layer_monotonic() {
        let mut layers: Vec<RenderLayer> = scene_layout().iter().map(|p| p.layer).collect();
        layers.sort();
        assert!(layers.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(layers[0], RenderLayer::Opaque);
        assert_eq!(*layers.last().unwrap(), RenderLayer::Transparent);
    }

    #[test]
    fn transparent_panels_carry_half_alpha() {
        for placement in scene_layout() {
            match placement.layer {
                RenderLayer::Transparent => assert_eq!(placement.diffuse.w, 0.5),
                _ => assert_eq!(placement.diffuse.w, 1.0),
            }
        }
    }

    #[test]
    fn opaque_cube_sits_at_the_origin() {
        let layout = scene_layout();
        let opaque = layout
            .iter()
            .find(|p| p.layer == RenderLayer::Opaque)
            .unwrap();
        let origin = opaque.transform.transform_point3(Vec3::ZERO);
        assert_eq!(origin, Vec3::ZERO);
    }
}
