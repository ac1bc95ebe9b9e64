//! Shading variant and environment blend mode tags
//!
//! These are the values the material side hands to the pipeline. They are
//! plain tags; the pipeline maps each variant onto its feature flags.

use serde::{Deserialize, Serialize};

/// Shading configuration selected per material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[repr(u8)]
pub enum ShadingVariant {
    /// Position and color pass-through, no lighting
    Minimal = 0,
    /// Ambient/diffuse, base texture and specular; no morphs
    Textured = 1,
    /// Textured plus morphs and additional UV; no toon or environment
    StandardSubset = 2,
    /// Every term
    #[default]
    StandardFull = 3,
}

impl ShadingVariant {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(ShadingVariant::Minimal),
            1 => Some(ShadingVariant::Textured),
            2 => Some(ShadingVariant::StandardSubset),
            3 => Some(ShadingVariant::StandardFull),
            _ => None,
        }
    }

    /// Human-readable name for debugging
    pub const fn name(self) -> &'static str {
        match self {
            ShadingVariant::Minimal => "minimal",
            ShadingVariant::Textured => "textured",
            ShadingVariant::StandardSubset => "standard-subset",
            ShadingVariant::StandardFull => "standard-full",
        }
    }
}

/// Environment (sphere map) blend mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[repr(u32)]
pub enum EnvBlendMode {
    /// Environment term absent
    #[default]
    Disabled = 0,
    /// `color *= env`, sampled with the view-space normal
    Multiply = 1,
    /// `color += env`, sampled with the view-space normal
    Additive = 2,
    /// `color *= env`, sampled with the additional UV
    AdditionalUv = 3,
}

impl EnvBlendMode {
    /// Decode the uniform value. Unknown values behave as multiply, matching
    /// the "every other non-zero mode" rule of the compositor.
    pub fn from_u32(value: u32) -> Self {
        match value {
            0 => EnvBlendMode::Disabled,
            2 => EnvBlendMode::Additive,
            3 => EnvBlendMode::AdditionalUv,
            _ => EnvBlendMode::Multiply,
        }
    }

    pub const fn as_u32(self) -> u32 {
        self as u32
    }
}
