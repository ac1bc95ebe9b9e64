use glam::{Vec3, Vec4};
use morphlit_shared::{EnvBlendMode, MaterialUniforms};

/// Multiply/add tint factors for one textured term
///
/// `rgb` is the tint color and `a` the blend strength for both factors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TintPair {
    pub mul: Vec4,
    pub add: Vec4,
}

impl TintPair {
    /// Leaves samples unchanged
    pub const NEUTRAL: Self = Self {
        mul: Vec4::ONE,
        add: Vec4::ZERO,
    };
}

impl Default for TintPair {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// Directional light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub color: Vec3,
    /// Direction the light travels (surface-to-light is `-direction`)
    pub direction: Vec3,
}

impl Light {
    /// Directional light; the direction is normalized
    pub fn directional(color: Vec3, direction: Vec3) -> Self {
        Self {
            color,
            direction: direction.normalize_or_zero(),
        }
    }
}

impl Default for Light {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            direction: Vec3::NEG_Y,
        }
    }
}

/// Typed view of the material uniform block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub diffuse_color: Vec4,
    pub ambient_color: Vec3,
    pub specular_color: Vec3,
    /// Blinn exponent; `<= 0` disables the specular term
    pub specular_strength: f32,
    pub light: Light,
    pub env_blend_mode: EnvBlendMode,
    pub texture_tint: TintPair,
    pub environment_tint: TintPair,
    pub toon_tint: TintPair,
}

impl Material {
    pub fn from_uniforms(uniforms: &MaterialUniforms) -> Self {
        Self {
            diffuse_color: Vec4::from_array(uniforms.diffuse_color),
            ambient_color: Vec3::from_array(uniforms.ambient_color),
            specular_color: Vec3::from_array(uniforms.specular_color),
            specular_strength: uniforms.specular_strength,
            light: Light {
                color: Vec3::from_array(uniforms.light_color),
                direction: Vec3::from_array(uniforms.light_direction),
            },
            env_blend_mode: EnvBlendMode::from_u32(uniforms.env_blend_mode),
            texture_tint: TintPair {
                mul: Vec4::from_array(uniforms.texture_tint_mul),
                add: Vec4::from_array(uniforms.texture_tint_add),
            },
            environment_tint: TintPair {
                mul: Vec4::from_array(uniforms.env_tint_mul),
                add: Vec4::from_array(uniforms.env_tint_add),
            },
            toon_tint: TintPair {
                mul: Vec4::from_array(uniforms.toon_tint_mul),
                add: Vec4::from_array(uniforms.toon_tint_add),
            },
        }
    }

    pub fn to_uniforms(&self) -> MaterialUniforms {
        MaterialUniforms {
            diffuse_color: self.diffuse_color.to_array(),
            ambient_color: self.ambient_color.to_array(),
            specular_strength: self.specular_strength,
            specular_color: self.specular_color.to_array(),
            env_blend_mode: self.env_blend_mode.as_u32(),
            light_color: self.light.color.to_array(),
            _pad0: 0.0,
            light_direction: self.light.direction.to_array(),
            _pad1: 0.0,
            texture_tint_mul: self.texture_tint.mul.to_array(),
            texture_tint_add: self.texture_tint.add.to_array(),
            env_tint_mul: self.environment_tint.mul.to_array(),
            env_tint_add: self.environment_tint.add.to_array(),
            toon_tint_mul: self.toon_tint.mul.to_array(),
            toon_tint_add: self.toon_tint.add.to_array(),
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::from_uniforms(&MaterialUniforms::default())
    }
}
