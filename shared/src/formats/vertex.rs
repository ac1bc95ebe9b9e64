use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Morph reference fields of a vertex (16 bytes, POD)
///
/// Each pair addresses a contiguous run in the shared morph index table:
/// entries `[start, start + count)` belong to this vertex.
#[repr(C)]
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize,
)]
pub struct MorphVertexAttributes {
    pub vertex_morph_index_start: u32,
    pub vertex_morph_count: u32,
    pub uv_morph_index_start: u32,
    pub uv_morph_count: u32,
}

impl MorphVertexAttributes {
    /// No morph entries
    pub const NONE: Self = Self {
        vertex_morph_index_start: 0,
        vertex_morph_count: 0,
        uv_morph_index_start: 0,
        uv_morph_count: 0,
    };

    /// Check if this vertex references any morph entries
    #[inline]
    pub const fn has_morphs(&self) -> bool {
        self.vertex_morph_count != 0 || self.uv_morph_count != 0
    }
}

/// Full per-vertex attribute record (64 bytes, POD)
///
/// Shader locations:
/// - Location 0: position (Float32x3)
/// - Location 1: normal (Float32x3)
/// - Location 2: uv (Float32x2)
/// - Location 3: additional uv (Float32x4)
/// - Location 4: morph references (Uint32x4)
///
/// Layouts without morphing stop after location 2 or 3.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct VertexRecord {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub additional_uv: [f32; 4],
    pub morph: MorphVertexAttributes,
}
