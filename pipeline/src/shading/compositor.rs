//! Per-fragment lighting composition
//!
//! Each step is a free function so it can be checked on its own; [`shade`]
//! chains them in order under the draw's feature flags.

use glam::{Vec2, Vec3, Vec3Swizzles, Vec4, Vec4Swizzles};
use morphlit_shared::EnvBlendMode;

use super::features::ShadingFeatures;
use super::material::{Light, Material, TintPair};
use super::tint::apply_tint;
use crate::texture::TextureBindings;

/// Interpolated fragment-stage inputs
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FragmentInput {
    pub world_position: Vec3,
    pub world_normal: Vec3,
    /// Drives the matcap-style environment lookup
    pub view_normal: Vec3,
    pub uv: Vec2,
    pub additional_uv: Vec4,
}

/// Draw-constant state the compositor reads
#[derive(Debug, Clone, Copy)]
pub struct ShadingContext<'a> {
    pub material: &'a Material,
    pub textures: &'a TextureBindings,
    pub camera_position: Vec3,
    pub features: ShadingFeatures,
}

// ============================================================================
// Steps
// ============================================================================

/// `clamp(dot(n, -light_direction) + 0.5, 0, 1)`, only used for the toon ramp
#[inline]
pub fn half_lambert(normal: Vec3, light_direction: Vec3) -> f32 {
    let n = normal.normalize_or_zero();
    let l = (-light_direction).normalize_or_zero();
    (n.dot(l) + 0.5).clamp(0.0, 1.0)
}

/// Clamped `ambient + diffuse * light_color`; alpha starts at diffuse alpha
#[inline]
pub fn ambient_diffuse(material: &Material) -> Vec4 {
    let rgb = (material.ambient_color + material.diffuse_color.xyz() * material.light.color)
        .clamp(Vec3::ZERO, Vec3::ONE);
    rgb.extend(material.diffuse_color.w)
}

/// Multiply a tinted base-texture sample into `color`, including alpha
#[inline]
pub fn texture_term(color: Vec4, sample: Vec4, tint: &TintPair) -> Vec4 {
    (color.xyz() * apply_tint(sample.xyz(), tint)).extend(color.w * sample.w)
}

/// Map a view-space normal onto `[0, 1]^2`
#[inline]
pub fn matcap_uv(view_normal: Vec3) -> Vec2 {
    view_normal.xy() * 0.5 + Vec2::splat(0.5)
}

/// Where the environment map is sampled, or `None` when the term is off
#[inline]
pub fn environment_uv(mode: EnvBlendMode, view_normal: Vec3, additional_uv: Vec4) -> Option<Vec2> {
    match mode {
        EnvBlendMode::Disabled => None,
        EnvBlendMode::AdditionalUv => Some(additional_uv.xy()),
        EnvBlendMode::Multiply | EnvBlendMode::Additive => Some(matcap_uv(view_normal)),
    }
}

/// Combine a tinted environment sample into `color`
///
/// Additive mode adds; every other enabled mode multiplies.
#[inline]
pub fn environment_term(color: Vec3, mode: EnvBlendMode, sample: Vec4, tint: &TintPair) -> Vec3 {
    let env = apply_tint(sample.xyz(), tint);
    match mode {
        EnvBlendMode::Disabled => color,
        EnvBlendMode::Additive => color + env,
        EnvBlendMode::Multiply | EnvBlendMode::AdditionalUv => color * env,
    }
}

/// Ramp coordinate for a half-Lambert value: fixed `u`, inverted `v`
#[inline]
pub fn toon_uv(half_lambert: f32) -> Vec2 {
    Vec2::new(0.5, 1.0 - half_lambert)
}

#[inline]
pub fn toon_term(color: Vec3, sample: Vec4, tint: &TintPair) -> Vec3 {
    color * apply_tint(sample.xyz(), tint)
}

/// Blinn specular; exactly zero when `strength <= 0`
///
/// `eye_direction` points from the surface toward the camera.
pub fn specular_term(
    normal: Vec3,
    light: &Light,
    eye_direction: Vec3,
    specular_color: Vec3,
    strength: f32,
) -> Vec3 {
    if strength <= 0.0 {
        return Vec3::ZERO;
    }
    let n = normal.normalize_or_zero();
    let l = (-light.direction).normalize_or_zero();
    let half = (l + eye_direction.normalize_or_zero()).normalize_or_zero();
    specular_color * light.color * n.dot(half).max(0.0).powf(strength)
}

// ============================================================================
// Composition
// ============================================================================

/// Final RGBA for one fragment
///
/// Alpha is `diffuse.a * texture.a`; the environment and toon terms never
/// touch it. Color is not clamped after the additive terms.
pub fn shade(fragment: &FragmentInput, context: &ShadingContext<'_>) -> Vec4 {
    let material = context.material;
    let features = context.features;
    let textures = context.textures;

    if !features.lit() && !features.textured() {
        return material.diffuse_color;
    }

    let mut color = if features.lit() {
        ambient_diffuse(material)
    } else {
        material.diffuse_color
    };

    if features.textured()
        && let Some(base) = &textures.base
    {
        color = texture_term(color, base.sample(fragment.uv), &material.texture_tint);
    }

    let alpha = color.w;
    let mut rgb = color.xyz();

    let mode = material.env_blend_mode;
    if features.environment()
        && let Some(uv) = environment_uv(mode, fragment.view_normal, fragment.additional_uv)
        && let Some(environment) = &textures.environment
    {
        rgb = environment_term(rgb, mode, environment.sample(uv), &material.environment_tint);
    }

    if features.toon()
        && let Some(toon) = &textures.toon
    {
        let ln = half_lambert(fragment.world_normal, material.light.direction);
        rgb = toon_term(rgb, toon.sample(toon_uv(ln)), &material.toon_tint);
    }

    if features.lit() {
        let eye_direction = context.camera_position - fragment.world_position;
        rgb += specular_term(
            fragment.world_normal,
            &material.light,
            eye_direction,
            material.specular_color,
            material.specular_strength,
        );
    }

    rgb.extend(alpha)
}
