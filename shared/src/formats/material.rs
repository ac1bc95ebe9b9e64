use bytemuck::{Pod, Zeroable};

/// Per-material uniform block (176 bytes, POD)
///
/// Immutable for the duration of a draw. Scalars are folded into the `w`
/// slot of the preceding `vec3` to keep 16-byte rows.
///
/// | Offset | Field                                   |
/// |--------|-----------------------------------------|
/// | 0      | diffuse_color (rgba)                    |
/// | 16     | ambient_color (rgb) + specular_strength |
/// | 32     | specular_color (rgb) + env_blend_mode   |
/// | 48     | light_color (rgb) + pad                 |
/// | 64     | light_direction (xyz) + pad             |
/// | 80     | texture tint mul / add                  |
/// | 112    | environment tint mul / add              |
/// | 144    | toon tint mul / add                     |
///
/// Tint factors: `rgb` is the tint color, `a` is the blend strength.
/// `env_blend_mode`: 0 = disabled, 1 = multiply, 2 = additive,
/// 3 = additional-UV driven (multiplicative).
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct MaterialUniforms {
    pub diffuse_color: [f32; 4],

    pub ambient_color: [f32; 3],
    pub specular_strength: f32,

    pub specular_color: [f32; 3],
    pub env_blend_mode: u32,

    pub light_color: [f32; 3],
    pub _pad0: f32,

    pub light_direction: [f32; 3],
    pub _pad1: f32,

    pub texture_tint_mul: [f32; 4],
    pub texture_tint_add: [f32; 4],
    pub env_tint_mul: [f32; 4],
    pub env_tint_add: [f32; 4],
    pub toon_tint_mul: [f32; 4],
    pub toon_tint_add: [f32; 4],
}

impl Default for MaterialUniforms {
    fn default() -> Self {
        Self {
            diffuse_color: [1.0, 1.0, 1.0, 1.0],
            ambient_color: [0.0, 0.0, 0.0],
            specular_strength: 0.0,
            specular_color: [0.0, 0.0, 0.0],
            env_blend_mode: 0,
            light_color: [1.0, 1.0, 1.0],
            _pad0: 0.0,
            light_direction: [0.0, -1.0, 0.0],
            _pad1: 0.0,
            // Neutral tints: multiply by white at full strength, add nothing
            texture_tint_mul: [1.0, 1.0, 1.0, 1.0],
            texture_tint_add: [0.0, 0.0, 0.0, 0.0],
            env_tint_mul: [1.0, 1.0, 1.0, 1.0],
            env_tint_add: [0.0, 0.0, 0.0, 0.0],
            toon_tint_mul: [1.0, 1.0, 1.0, 1.0],
            toon_tint_add: [0.0, 0.0, 0.0, 0.0],
        }
    }
}
