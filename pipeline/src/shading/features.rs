//! Capability flags selecting which evaluation steps run
//!
//! The four shading variants are one evaluator with different flag sets,
//! so every variant shares the same per-step math.

use morphlit_shared::ShadingVariant;
use serde::{Deserialize, Serialize};

use crate::morph::MorphAccumulation;
use crate::transform::NormalTransform;

// ============================================================================
// Feature Bits
// ============================================================================

/// Ambient/diffuse lighting and the specular term
pub const FEATURE_LIT: u32 = 1 << 0;
/// Base color texture
pub const FEATURE_TEXTURE: u32 = 1 << 1;
/// Morph tables are read per vertex
pub const FEATURE_MORPH: u32 = 1 << 2;
/// Half-Lambert toon ramp
pub const FEATURE_TOON: u32 = 1 << 3;
/// Environment (sphere map) term
pub const FEATURE_ENV: u32 = 1 << 4;
/// The additional UV channel is carried to the fragment stage
pub const FEATURE_SECONDARY_UV: u32 = 1 << 5;

pub const FEATURE_ALL: u32 =
    FEATURE_LIT | FEATURE_TEXTURE | FEATURE_MORPH | FEATURE_TOON | FEATURE_ENV | FEATURE_SECONDARY_UV;

/// A set of `FEATURE_*` bits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShadingFeatures(u32);

impl ShadingFeatures {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(FEATURE_ALL);

    /// Unknown bits are dropped
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits & FEATURE_ALL)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn contains(self, bits: u32) -> bool {
        self.0 & bits == bits
    }

    pub const fn with(self, bits: u32) -> Self {
        Self::from_bits(self.0 | bits)
    }

    pub const fn without(self, bits: u32) -> Self {
        Self(self.0 & !bits)
    }

    pub const fn for_variant(variant: ShadingVariant) -> Self {
        match variant {
            ShadingVariant::Minimal => Self::NONE,
            ShadingVariant::Textured => Self(FEATURE_LIT | FEATURE_TEXTURE),
            ShadingVariant::StandardSubset => {
                Self(FEATURE_LIT | FEATURE_TEXTURE | FEATURE_MORPH | FEATURE_SECONDARY_UV)
            }
            ShadingVariant::StandardFull => Self::ALL,
        }
    }

    #[inline]
    pub const fn lit(self) -> bool {
        self.contains(FEATURE_LIT)
    }

    #[inline]
    pub const fn textured(self) -> bool {
        self.contains(FEATURE_TEXTURE)
    }

    #[inline]
    pub const fn morph(self) -> bool {
        self.contains(FEATURE_MORPH)
    }

    #[inline]
    pub const fn toon(self) -> bool {
        self.contains(FEATURE_TOON)
    }

    #[inline]
    pub const fn environment(self) -> bool {
        self.contains(FEATURE_ENV)
    }

    #[inline]
    pub const fn secondary_uv(self) -> bool {
        self.contains(FEATURE_SECONDARY_UV)
    }
}

// ============================================================================
// Shading Configuration
// ============================================================================

/// Everything that selects *how* a draw is evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadingConfig {
    pub features: ShadingFeatures,
    pub normal_transform: NormalTransform,
    pub morph_accumulation: MorphAccumulation,
}

impl ShadingConfig {
    /// Defaults for a variant
    ///
    /// The minimal path accumulates morphs unconditionally; every other
    /// variant applies the skip threshold.
    pub fn for_variant(variant: ShadingVariant) -> Self {
        let morph_accumulation = match variant {
            ShadingVariant::Minimal => MorphAccumulation::Unconditional,
            _ => MorphAccumulation::Thresholded,
        };
        Self {
            features: ShadingFeatures::for_variant(variant),
            normal_transform: NormalTransform::InverseModel,
            morph_accumulation,
        }
    }

    pub fn with_features(mut self, features: ShadingFeatures) -> Self {
        self.features = features;
        self
    }

    pub fn with_normal_transform(mut self, normal_transform: NormalTransform) -> Self {
        self.normal_transform = normal_transform;
        self
    }

    pub fn with_morph_accumulation(mut self, morph_accumulation: MorphAccumulation) -> Self {
        self.morph_accumulation = morph_accumulation;
        self
    }
}

impl Default for ShadingConfig {
    fn default() -> Self {
        Self::for_variant(ShadingVariant::default())
    }
}
