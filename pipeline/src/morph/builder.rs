use glam::{UVec2, UVec3, Vec3, Vec4};
use hashbrown::HashMap;
use morphlit_shared::{DEFAULT_MORPH_TABLE_WIDTH, MAX_MORPH_COUNT, MorphVertexAttributes};

use super::evaluator::UvMorphTarget;
use super::table::{MorphTables, PackedTable};
use crate::error::{Result, ShadeError};

/// Packed tables plus the per-vertex ranges that index into them
#[derive(Debug, Clone, PartialEq)]
pub struct MorphTableBundle {
    pub tables: MorphTables,
    /// One entry per vertex, in vertex order
    pub attributes: Vec<MorphVertexAttributes>,
}

/// Packs sparse per-morph vertex and UV offsets into indirect morph tables
///
/// Every vertex's entries end up contiguous in the index tables. Offsets
/// repeated for the same (morph, vertex, target) share one displacement row
/// and are summed.
#[derive(Debug, Clone)]
pub struct MorphTableBuilder {
    vertex_count: u32,
    width: u32,
    /// Per vertex: `(morph, displacement row)`
    vertex_entries: Vec<Vec<UVec2>>,
    vertex_displacements: Vec<Vec3>,
    vertex_rows: HashMap<(u32, u32), u32>,
    /// Per vertex: `(target kind, morph, displacement row)`
    uv_entries: Vec<Vec<UVec3>>,
    uv_displacements: Vec<Vec4>,
    uv_rows: HashMap<(u32, u32, UvMorphTarget), u32>,
}

impl MorphTableBuilder {
    pub fn new(vertex_count: u32) -> Self {
        Self {
            vertex_count,
            width: DEFAULT_MORPH_TABLE_WIDTH,
            vertex_entries: vec![Vec::new(); vertex_count as usize],
            vertex_displacements: Vec::new(),
            vertex_rows: HashMap::new(),
            uv_entries: vec![Vec::new(); vertex_count as usize],
            uv_displacements: Vec::new(),
            uv_rows: HashMap::new(),
        }
    }

    /// Row width of every packed table. Zero is rejected by [`Self::build`].
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    /// Add a vertex-position morph's sparse offsets
    pub fn add_vertex_morph(
        &mut self,
        morph_index: u32,
        offsets: impl IntoIterator<Item = (u32, Vec3)>,
    ) -> Result<()> {
        check_morph_index(morph_index)?;
        for (vertex, displacement) in offsets {
            let slot = self.check_vertex(vertex)?;
            match self.vertex_rows.get(&(morph_index, vertex)) {
                Some(&row) => self.vertex_displacements[row as usize] += displacement,
                None => {
                    let row = self.vertex_displacements.len() as u32;
                    self.vertex_displacements.push(displacement);
                    self.vertex_rows.insert((morph_index, vertex), row);
                    self.vertex_entries[slot].push(UVec2::new(morph_index, row));
                }
            }
        }
        Ok(())
    }

    /// Add a UV morph's sparse offsets
    pub fn add_uv_morph(
        &mut self,
        morph_index: u32,
        offsets: impl IntoIterator<Item = (u32, UvMorphTarget, Vec4)>,
    ) -> Result<()> {
        check_morph_index(morph_index)?;
        for (vertex, target, displacement) in offsets {
            let slot = self.check_vertex(vertex)?;
            match self.uv_rows.get(&(morph_index, vertex, target)) {
                Some(&row) => self.uv_displacements[row as usize] += displacement,
                None => {
                    let row = self.uv_displacements.len() as u32;
                    self.uv_displacements.push(displacement);
                    self.uv_rows.insert((morph_index, vertex, target), row);
                    self.uv_entries[slot].push(UVec3::new(target as u32, morph_index, row));
                }
            }
        }
        Ok(())
    }

    pub fn build(self) -> Result<MorphTableBundle> {
        if self.width == 0 {
            return Err(ShadeError::ZeroTableWidth);
        }

        let mut vertex_index = Vec::new();
        let mut uv_index = Vec::new();
        let mut attributes = Vec::with_capacity(self.vertex_count as usize);
        for (vertex_entries, uv_entries) in self.vertex_entries.iter().zip(&self.uv_entries) {
            attributes.push(MorphVertexAttributes {
                vertex_morph_index_start: vertex_index.len() as u32,
                vertex_morph_count: vertex_entries.len() as u32,
                uv_morph_index_start: uv_index.len() as u32,
                uv_morph_count: uv_entries.len() as u32,
            });
            vertex_index.extend_from_slice(vertex_entries);
            uv_index.extend_from_slice(uv_entries);
        }

        let tables = MorphTables {
            vertex_index: PackedTable::from_entries(self.width, vertex_index)?,
            vertex_displacement: PackedTable::from_entries(self.width, self.vertex_displacements)?,
            uv_index: PackedTable::from_entries(self.width, uv_index)?,
            uv_displacement: PackedTable::from_entries(self.width, self.uv_displacements)?,
        };

        tracing::debug!(
            vertices = self.vertex_count,
            width = self.width,
            vertex_rows = self.vertex_rows.len(),
            uv_rows = self.uv_rows.len(),
            vertex_index_height = tables.vertex_index.height(),
            uv_index_height = tables.uv_index.height(),
            "packed morph tables"
        );

        Ok(MorphTableBundle { tables, attributes })
    }

    fn check_vertex(&self, vertex: u32) -> Result<usize> {
        if vertex >= self.vertex_count {
            return Err(ShadeError::VertexIndexOutOfRange {
                index: vertex,
                vertex_count: self.vertex_count,
            });
        }
        Ok(vertex as usize)
    }
}

fn check_morph_index(morph_index: u32) -> Result<()> {
    if morph_index as usize >= MAX_MORPH_COUNT {
        return Err(ShadeError::CoefficientIndexOutOfRange { index: morph_index });
    }
    Ok(())
}
