//! Lighting compositor
//!
//! Combines ambient, diffuse, base texture, environment map, toon ramp and
//! Blinn specular into one RGBA value per fragment.

mod compositor;
mod features;
mod material;
mod tint;


pub use compositor::{
    FragmentInput, ShadingContext, ambient_diffuse, environment_term, environment_uv,
    half_lambert, matcap_uv, shade, specular_term, texture_term, toon_term, toon_uv,
};
pub use features::{
    FEATURE_ALL, FEATURE_ENV, FEATURE_LIT, FEATURE_MORPH, FEATURE_SECONDARY_UV, FEATURE_TEXTURE,
    FEATURE_TOON, ShadingConfig, ShadingFeatures,
};
pub use material::{Light, Material, TintPair};
pub use tint::{apply_tint, mix, tint_add, tint_multiply};
