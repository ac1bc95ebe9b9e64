//! JSON report of an evaluated draw

use morphlit_pipeline::{MorphController, VertexOutput};
use morphlit_shared::ShadingVariant;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DrawReport {
    pub variant: ShadingVariant,
    pub features: u32,
    pub instances: usize,
    pub vertices: usize,
    /// Non-zero final coefficients by morph name
    pub coefficients: Vec<CoefficientEntry>,
    pub outputs: Vec<VertexReport>,
}

#[derive(Debug, Serialize)]
pub struct CoefficientEntry {
    pub name: String,
    pub index: u32,
    pub value: f32,
}

#[derive(Debug, Serialize)]
pub struct VertexReport {
    pub instance: usize,
    pub vertex: usize,
    pub clip_position: [f32; 4],
    pub world_position: [f32; 3],
    pub world_normal: [f32; 3],
    pub uv: [f32; 2],
    pub additional_uv: [f32; 4],
    pub color: [f32; 4],
}

impl VertexReport {
    pub fn new(output: &VertexOutput, color: glam::Vec4) -> Self {
        Self {
            instance: output.instance,
            vertex: output.vertex,
            clip_position: output.clip_position.to_array(),
            world_position: output.world_position.to_array(),
            world_normal: output.world_normal.to_array(),
            uv: output.uv.to_array(),
            additional_uv: output.additional_uv.to_array(),
            color: color.to_array(),
        }
    }
}

/// Active coefficients in slot order
pub fn active_coefficients(controller: &MorphController, names: &[String]) -> Vec<CoefficientEntry> {
    names
        .iter()
        .filter_map(|name| {
            let index = controller.morph_index(name)?;
            let value = controller.final_coefficient(index);
            (value != 0.0).then(|| CoefficientEntry {
                name: name.clone(),
                index,
                value,
            })
        })
        .collect()
}
