//! Morph target evaluation
//!
//! Vertex-position and UV displacement is resolved through indirect tables:
//! each vertex names a contiguous range of index-table entries, each entry
//! names a coefficient slot and a displacement row.
//!
//! - [`TexelTable`] / [`PackedTable`]: table access and its buffer-backed form
//! - [`morph_vertex`]: the per-vertex accumulation passes
//! - [`MorphTableBuilder`]: packs sparse offsets into tables (loading side)
//! - [`MorphController`]: owns named weights and derives the coefficient table

mod builder;
mod coefficients;
mod controller;
mod evaluator;
mod material_offset;
mod table;

#[cfg(test)]
mod tests;

pub use builder::{MorphTableBuilder, MorphTableBundle};
pub use coefficients::MorphCoefficients;
pub use controller::{GroupMorphElement, MorphController, MorphDefinition, MorphKind};
pub use evaluator::{
    MorphAccumulation, MorphedVertex, UvMorphTarget, morph_position, morph_uvs, morph_vertex,
};
pub use material_offset::{MaterialMorphOffset, MaterialOffsetMode};
pub use table::{MorphTableSet, MorphTables, PackedTable, TexelTable, unwrap_index};
