use glam::{Vec2, Vec3, Vec4};
use morphlit_shared::{
    MORPH_SKIP_THRESHOLD, MorphVertexAttributes, UV_MORPH_TARGET_PRIMARY,
    UV_MORPH_TARGET_SECONDARY,
};
use serde::{Deserialize, Serialize};

use super::coefficients::MorphCoefficients;
use super::table::MorphTableSet;

/// Whether near-zero coefficients are skipped during accumulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MorphAccumulation {
    /// Skip entries whose coefficient is below `MORPH_SKIP_THRESHOLD`.
    /// Note this also drops every negative coefficient.
    #[default]
    Thresholded,
    /// Accumulate every entry regardless of its coefficient.
    Unconditional,
}

impl MorphAccumulation {
    #[inline]
    fn accepts(self, coefficient: f32) -> bool {
        match self {
            MorphAccumulation::Thresholded => coefficient >= MORPH_SKIP_THRESHOLD,
            MorphAccumulation::Unconditional => true,
        }
    }
}

/// Which UV channel a UV morph entry displaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[repr(u32)]
pub enum UvMorphTarget {
    Primary = UV_MORPH_TARGET_PRIMARY,
    /// The additional (secondary) UV
    Secondary = UV_MORPH_TARGET_SECONDARY,
}

impl UvMorphTarget {
    /// Decode the index-table kind channel. Unknown kinds displace nothing.
    pub fn from_channel(value: u32) -> Option<Self> {
        match value {
            UV_MORPH_TARGET_PRIMARY => Some(UvMorphTarget::Primary),
            UV_MORPH_TARGET_SECONDARY => Some(UvMorphTarget::Secondary),
            _ => None,
        }
    }
}

/// Position and UVs after morphing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MorphedVertex {
    pub position: Vec3,
    pub uv: Vec2,
    pub additional_uv: Vec4,
}

/// Accumulate vertex-position morphs
///
/// For each of the vertex's `vertex_morph_count` entries: read
/// `(coefficient index, displacement row)` from the index table, look up the
/// coefficient, and add `coefficient * displacement`.
pub fn morph_position(
    position: Vec3,
    attributes: &MorphVertexAttributes,
    tables: &MorphTableSet<'_>,
    coefficients: &MorphCoefficients,
    accumulation: MorphAccumulation,
) -> Vec3 {
    let mut position = position;
    for i in 0..attributes.vertex_morph_count {
        let entry = tables
            .vertex_index
            .fetch(attributes.vertex_morph_index_start.wrapping_add(i));
        let coefficient = coefficients.get(entry.x);
        if !accumulation.accepts(coefficient) {
            continue;
        }
        position += coefficient * tables.vertex_displacement.fetch(entry.y);
    }
    position
}

/// Accumulate UV morphs into the primary and additional UVs
///
/// Index entries are `(target kind, coefficient index, displacement row)`.
/// Primary targets take the displacement's `xy`; secondary targets take all
/// four components.
pub fn morph_uvs(
    uv: Vec2,
    additional_uv: Vec4,
    attributes: &MorphVertexAttributes,
    tables: &MorphTableSet<'_>,
    coefficients: &MorphCoefficients,
    accumulation: MorphAccumulation,
) -> (Vec2, Vec4) {
    let mut uv = uv;
    let mut additional_uv = additional_uv;
    for i in 0..attributes.uv_morph_count {
        let entry = tables
            .uv_index
            .fetch(attributes.uv_morph_index_start.wrapping_add(i));
        let coefficient = coefficients.get(entry.y);
        if !accumulation.accepts(coefficient) {
            continue;
        }
        let Some(target) = UvMorphTarget::from_channel(entry.x) else {
            continue;
        };
        let displacement = coefficient * tables.uv_displacement.fetch(entry.z);
        match target {
            UvMorphTarget::Primary => uv += displacement.truncate().truncate(),
            UvMorphTarget::Secondary => additional_uv += displacement,
        }
    }
    (uv, additional_uv)
}

/// Run both morph passes for one vertex
pub fn morph_vertex(
    position: Vec3,
    uv: Vec2,
    additional_uv: Vec4,
    attributes: &MorphVertexAttributes,
    tables: &MorphTableSet<'_>,
    coefficients: &MorphCoefficients,
    accumulation: MorphAccumulation,
) -> MorphedVertex {
    let position = morph_position(position, attributes, tables, coefficients, accumulation);
    let (uv, additional_uv) = morph_uvs(
        uv,
        additional_uv,
        attributes,
        tables,
        coefficients,
        accumulation,
    );
    MorphedVertex {
        position,
        uv,
        additional_uv,
    }
}
