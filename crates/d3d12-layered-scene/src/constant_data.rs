use bevy_math::Mat4;
use bevy_math::Vec4;

use crate::lights::SpotLight;
use crate::lights::MAX_SPOT_LIGHTS;

/// Hardware constant buffers must start on 256-byte boundaries; buffer
/// allocations and view sizes are rounded up with this.
pub const CONSTANT_BUFFER_ALIGNMENT: usize = 256;

pub const fn align_to_256(size: usize) -> usize {
    (size + CONSTANT_BUFFER_ALIGNMENT - 1) & !(CONSTANT_BUFFER_ALIGNMENT - 1)
}

/// Scene-global constant record: register b0 in `lit.hlsl`. Matrices are
/// stored column-major and the shader multiplies `mul(matrix, vector)`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PerScene {
    pub view_projection: Mat4,
    pub camera_position: [f32; 3],
    _pad: f32,
    pub spot_lights: [SpotLight; MAX_SPOT_LIGHTS],
}

impl PerScene {
    pub fn new(
        view_projection: Mat4,
        camera_position: [f32; 3],
        spot_lights: [SpotLight; MAX_SPOT_LIGHTS],
    ) -> Self {
        Self {
            view_projection,
            camera_position,
            _pad: 0.0,
            spot_lights,
        }
    }
}

impl Default for PerScene {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY, [0.0; 3], [SpotLight::default(); MAX_SPOT_LIGHTS])
    }
}

/// Per-model constant record: inline root descriptor b1 in `lit.hlsl`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PerModel {
    pub model: Mat4,
    pub texture_transform: Mat4,
    pub diffuse_colour: Vec4,
    pub specular_exponent: f32,
    pub specular_intensity: f32,
    _pad: [f32; 2],
}

impl Default for PerModel {
    fn default() -> Self {
        Self {
            model: Mat4::IDENTITY,
            texture_transform: Mat4::IDENTITY,
            diffuse_colour: Vec4::ONE,
            specular_exponent: 1.0,
            specular_intensity: 1.0,
            _pad: [0.0; 2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes_of<T: Copy>(value: &T) -> Vec<u8> {
        let ptr = value as *const T as *const u8;
        unsafe { std::slice::from_raw_parts(ptr, std::mem::size_of::<T>()) }.to_vec()
    }

    #[test]
    fn alignment_rounding() {
        assert_eq!(align_to_256(0), 0);
        assert_eq!(align_to_256(1), 256);
        assert_eq!(align_to_256(256), 256);
        assert_eq!(align_to_256(257), 512);
    }

    #[test]
    fn records_fit_one_aligned_slot() {
        assert_eq!(std::mem::size_of::<PerScene>(), 128);
        assert_eq!(std::mem::size_of::<PerModel>(), 160);
        assert_eq!(align_to_256(std::mem::size_of::<PerScene>()), 256);
        assert_eq!(align_to_256(std::mem::size_of::<PerModel>()), 256);
    }

    #[test]
    fn repeated_serialization_is_byte_stable() {
        // The GPU-visible copy is a raw overwrite; pushing an unchanged
        // record twice must produce identical bytes.
        let record = PerModel {
            specular_exponent: 100.0,
            specular_intensity: 10.0,
            ..Default::default()
        };
        let first = bytes_of(&record);
        let second = bytes_of(&record);
        assert_eq!(first, second);
    }

    #[test]
    fn per_scene_padding_keeps_lights_on_a_row_boundary() {
        let record = PerScene::default();
        let base = &record as *const _ as usize;
        let lights = &record.spot_lights as *const _ as usize;
        assert_eq!((lights - base) % 16, 0);
    }
}
