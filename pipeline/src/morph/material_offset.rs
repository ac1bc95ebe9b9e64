use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::shading::Material;

/// How a material morph combines with the base material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MaterialOffsetMode {
    /// `value = lerp(value, value * offset, weight)`, unclamped
    #[default]
    Multiply,
    /// `value += offset * weight`
    Additive,
}

/// One material-morph element
///
/// The tint offsets scale the tint-multiply factors in multiply mode and
/// offset the tint-add factors in additive mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialMorphOffset {
    /// Target material, or every material when `None`
    pub material_index: Option<u32>,
    pub mode: MaterialOffsetMode,
    pub diffuse_color: Vec4,
    pub specular_color: Vec3,
    pub specular_strength: f32,
    pub ambient_color: Vec3,
    pub texture_tint: Vec4,
    pub environment_tint: Vec4,
    pub toon_tint: Vec4,
}

impl MaterialMorphOffset {
    /// An offset that leaves the material unchanged in `mode`
    pub fn identity(mode: MaterialOffsetMode) -> Self {
        let (color3, color4, scalar) = match mode {
            MaterialOffsetMode::Multiply => (Vec3::ONE, Vec4::ONE, 1.0),
            MaterialOffsetMode::Additive => (Vec3::ZERO, Vec4::ZERO, 0.0),
        };
        Self {
            material_index: None,
            mode,
            diffuse_color: color4,
            specular_color: color3,
            specular_strength: scalar,
            ambient_color: color3,
            texture_tint: color4,
            environment_tint: color4,
            toon_tint: color4,
        }
    }

    /// Whether this element targets `material_index`
    #[inline]
    pub fn targets(&self, material_index: u32) -> bool {
        self.material_index.is_none_or(|index| index == material_index)
    }

    /// Fold this offset into `material` at `weight`
    pub fn apply(&self, material: &mut Material, weight: f32) {
        match self.mode {
            MaterialOffsetMode::Multiply => {
                let m = material;
                m.diffuse_color = m
                    .diffuse_color
                    .lerp(m.diffuse_color * self.diffuse_color, weight);
                m.specular_color = m
                    .specular_color
                    .lerp(m.specular_color * self.specular_color, weight);
                m.specular_strength = lerp(
                    m.specular_strength,
                    m.specular_strength * self.specular_strength,
                    weight,
                );
                m.ambient_color = m
                    .ambient_color
                    .lerp(m.ambient_color * self.ambient_color, weight);
                m.texture_tint.mul = m
                    .texture_tint
                    .mul
                    .lerp(m.texture_tint.mul * self.texture_tint, weight);
                m.environment_tint.mul = m
                    .environment_tint
                    .mul
                    .lerp(m.environment_tint.mul * self.environment_tint, weight);
                m.toon_tint.mul = m.toon_tint.mul.lerp(m.toon_tint.mul * self.toon_tint, weight);
            }
            MaterialOffsetMode::Additive => {
                material.diffuse_color += self.diffuse_color * weight;
                material.specular_color += self.specular_color * weight;
                material.specular_strength += self.specular_strength * weight;
                material.ambient_color += self.ambient_color * weight;
                material.texture_tint.add += self.texture_tint * weight;
                material.environment_tint.add += self.environment_tint * weight;
                material.toon_tint.add += self.toon_tint * weight;
            }
        }
    }
}

impl Default for MaterialMorphOffset {
    fn default() -> Self {
        Self::identity(MaterialOffsetMode::Multiply)
    }
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
