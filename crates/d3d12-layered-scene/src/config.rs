use crate::dx_sample::SampleCommandLine;
use crate::geometry::MESH_KIND_COUNT;
use crate::renderer::model::RenderLayer;
use crate::renderer::model::RENDER_LAYER_COUNT;

/// Back buffers in the swap chain. Also sizes the render-target-view heap.
pub const FRAME_COUNT: usize = 2;

/// Immutable scene/render configuration, built once at startup and threaded
/// through the component constructors. Heap capacities derive from it so the
/// descriptor heaps are sized exactly to their known maxima.
#[derive(Clone, Debug)]
pub struct SceneConfig {
    pub width: u32,
    pub height: u32,
    /// Models referencing each mesh kind, in `MeshKind` order.
    pub models_per_mesh: [usize; MESH_KIND_COUNT],
    /// Models assigned to each render layer, in `RenderLayer` order.
    pub models_per_layer: [usize; RENDER_LAYER_COUNT],
    pub texture_count: usize,
    /// Records the stencil-write/stencil-read/transparent passes when set.
    pub stencil_pass_enabled: bool,
    pub use_warp_device: bool,
}

impl SceneConfig {
    pub fn new(command_line: &SampleCommandLine) -> Self {
        Self {
            use_warp_device: command_line.use_warp_device,
            ..Self::default()
        }
    }

    pub fn model_count(&self) -> usize {
        self.models_per_mesh.iter().sum()
    }

    pub fn models_in_layer(&self, layer: RenderLayer) -> usize {
        self.models_per_layer[layer.index()]
    }

    pub fn rtv_heap_capacity(&self) -> u32 {
        FRAME_COUNT as u32
    }

    /// Main depth buffer plus the auxiliary channel-stencil buffer.
    pub fn dsv_heap_capacity(&self) -> u32 {
        2
    }

    /// One view per model plus the scene-global buffer.
    pub fn cbv_heap_capacity(&self) -> u32 {
        self.model_count() as u32 + 1
    }

    /// Channel-stencil view, one reserved slot, then the material textures.
    pub fn srv_heap_capacity(&self) -> u32 {
        self.texture_count as u32 + 2
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// The per-mesh and per-layer allocations both describe the same model
    /// set; a mismatch is a configuration defect, not a runtime condition.
    pub fn validate(&self) {
        let per_layer: usize = self.models_per_layer.iter().sum();
        assert_eq!(
            per_layer,
            self.model_count(),
            "per-layer allocation must cover every model"
        );
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            // 6 grid panels, 4 boxes; the gem stays resident but unused.
            models_per_mesh: [6, 4, 0],
            // 1 opaque, 3 stencil readers, 6 transparent; nothing lives
            // permanently in the stencil-write layer.
            models_per_layer: [1, 0, 3, 6],
            texture_count: 3,
            stencil_pass_enabled: false,
            use_warp_device: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scene_has_ten_models() {
        let config = SceneConfig::default();
        config.validate();
        assert_eq!(config.model_count(), 10);
    }

    #[test]
    fn heap_capacities_derive_from_counts() {
        let config = SceneConfig::default();
        assert_eq!(config.rtv_heap_capacity(), 2);
        assert_eq!(config.dsv_heap_capacity(), 2);
        assert_eq!(config.cbv_heap_capacity(), 11);
        assert_eq!(config.srv_heap_capacity(), 5);
    }

    #[test]
    fn layer_lookup_follows_declaration_order() {
        let config = SceneConfig::default();
        assert_eq!(config.models_in_layer(RenderLayer::Opaque), 1);
        assert_eq!(config.models_in_layer(RenderLayer::StencilWrite), 0);
        assert_eq!(config.models_in_layer(RenderLayer::StencilRead), 3);
        assert_eq!(config.models_in_layer(RenderLayer::Transparent), 6);
    }

    #[test]
    #[should_panic]
    fn mismatched_allocation_is_rejected() {
        let config = SceneConfig {
            models_per_layer: [1, 0, 3, 7],
            ..SceneConfig::default()
        };
        config.validate();
    }
}
