use crate::constant_data::PerModel;
use crate::geometry::MeshKind;

use super::write_buffer::WriteBuffer;

/// Draw-ordering / material category. The ordinal is both the pipeline-state
/// index and the load-time sort key; declaration order is the draw order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum RenderLayer {
    Opaque,
    StencilWrite,
    StencilRead,
    Transparent,
}

pub const RENDER_LAYER_COUNT: usize = 4;

impl RenderLayer {
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// One drawable instance: a layer tag, a non-owning reference to a resident
/// mesh, and its own constant buffer. Created once at load time, sorted once
/// by layer, never resorted.
pub struct Model {
    pub layer: RenderLayer,
    pub mesh: MeshKind,
    pub buffer: WriteBuffer<PerModel>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_order_is_the_draw_order() {
        assert!(RenderLayer::Opaque < RenderLayer::StencilWrite);
        assert!(RenderLayer::StencilWrite < RenderLayer::StencilRead);
        assert!(RenderLayer::StencilRead < RenderLayer::Transparent);
    }

    #[test]
    fn sorting_by_layer_is_non_decreasing() {
        let mut layers = vec![
            RenderLayer::Transparent,
            RenderLayer::Opaque,
            RenderLayer::StencilRead,
            RenderLayer::Transparent,
            RenderLayer::Opaque,
        ];
        layers.sort();
        assert!(layers.windows(2).all(|pair| pair[0] <= pair[1]));
    }
}
