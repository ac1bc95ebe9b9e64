//! Draw evaluation
//!
//! A draw borrows every input immutably and fans invocations out with rayon.
//! Each (instance, vertex) pair and each fragment is independent; results
//! are collected by index so output order never depends on scheduling.

use glam::{Vec2, Vec3, Vec4, Vec4Swizzles};
use morphlit_shared::{EnvBlendMode, MAX_MORPH_COUNT, MorphVertexAttributes, VertexRecord};
use rayon::prelude::*;

use crate::error::{Result, ShadeError};
use crate::morph::{MorphCoefficients, MorphTableSet, morph_vertex};
use crate::shading::{FragmentInput, Material, ShadingConfig, ShadingContext, shade};
use crate::texture::TextureBindings;
use crate::transform::{FrameState, InstanceTransform, NormalTransform, resolve_vertex};

// ============================================================================
// Vertex Data
// ============================================================================

/// Typed per-vertex attributes
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
    pub additional_uv: Vec4,
    pub morph: MorphVertexAttributes,
}

impl Vertex {
    /// A vertex with no morph references and no additional UV
    pub fn new(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self {
            position,
            normal,
            uv,
            additional_uv: Vec4::ZERO,
            morph: MorphVertexAttributes::NONE,
        }
    }

    pub fn with_morph(mut self, morph: MorphVertexAttributes) -> Self {
        self.morph = morph;
        self
    }

    pub fn with_additional_uv(mut self, additional_uv: Vec4) -> Self {
        self.additional_uv = additional_uv;
        self
    }
}

impl From<&VertexRecord> for Vertex {
    fn from(record: &VertexRecord) -> Self {
        Self {
            position: Vec3::from_array(record.position),
            normal: Vec3::from_array(record.normal),
            uv: Vec2::from_array(record.uv),
            additional_uv: Vec4::from_array(record.additional_uv),
            morph: record.morph,
        }
    }
}

/// What one vertex invocation hands to rasterization
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexOutput {
    pub instance: usize,
    pub vertex: usize,
    pub clip_position: Vec4,
    pub world_position: Vec3,
    pub world_normal: Vec3,
    pub view_normal: Vec3,
    pub uv: Vec2,
    pub additional_uv: Vec4,
}

impl VertexOutput {
    /// Fragment inputs at this vertex (no interpolation)
    pub fn fragment(&self) -> FragmentInput {
        FragmentInput {
            world_position: self.world_position,
            world_normal: self.world_normal,
            view_normal: self.view_normal,
            uv: self.uv,
            additional_uv: self.additional_uv,
        }
    }
}

// ============================================================================
// Draw Inputs
// ============================================================================

/// Everything bound for one draw
#[derive(Debug, Clone, Copy)]
pub struct DrawInputs<'a> {
    pub frame: &'a FrameState,
    pub config: ShadingConfig,
    pub material: &'a Material,
    pub instances: &'a [InstanceTransform],
    pub vertices: &'a [Vertex],
    pub morph_tables: Option<MorphTableSet<'a>>,
    pub coefficients: &'a MorphCoefficients,
    pub textures: &'a TextureBindings,
}

impl DrawInputs<'_> {
    /// Check the caller contracts the evaluator itself does not
    ///
    /// Evaluation never fails: a violated contract produces wrong output
    /// rather than an error, so this is where they are caught.
    pub fn validate(&self) -> Result<()> {
        let features = self.config.features;

        if features.morph() {
            let tables = self.morph_tables.ok_or(ShadeError::MissingMorphTables)?;
            self.validate_morph_ranges(&tables)?;
        }

        if features.lit() && self.config.normal_transform == NormalTransform::InverseModel {
            if let Some(instance) = self.instances.iter().position(|i| i.inverse_model.is_none()) {
                return Err(ShadeError::MissingInverseModel { instance });
            }
        }

        if features.textured() && self.textures.base.is_none() {
            return Err(ShadeError::MissingTexture("base"));
        }
        if features.toon() && self.textures.toon.is_none() {
            return Err(ShadeError::MissingTexture("toon"));
        }

        let env_mode = self.material.env_blend_mode;
        if features.environment() && env_mode != EnvBlendMode::Disabled {
            if self.textures.environment.is_none() {
                return Err(ShadeError::MissingTexture("environment"));
            }
            if env_mode == EnvBlendMode::AdditionalUv && !features.secondary_uv() {
                return Err(ShadeError::AdditionalUvRequired);
            }
        }

        Ok(())
    }

    fn validate_morph_ranges(&self, tables: &MorphTableSet<'_>) -> Result<()> {
        let vertex_capacity = tables.vertex_index.capacity();
        let uv_capacity = tables.uv_index.capacity();

        for (vertex, v) in self.vertices.iter().enumerate() {
            let m = &v.morph;
            check_range(
                vertex,
                m.vertex_morph_index_start,
                m.vertex_morph_count,
                vertex_capacity,
                "vertex index",
            )?;
            check_range(
                vertex,
                m.uv_morph_index_start,
                m.uv_morph_count,
                uv_capacity,
                "uv index",
            )?;

            for i in 0..m.vertex_morph_count {
                let entry = tables.vertex_index.fetch(m.vertex_morph_index_start.wrapping_add(i));
                check_coefficient(entry.x)?;
            }
            for i in 0..m.uv_morph_count {
                let entry = tables.uv_index.fetch(m.uv_morph_index_start.wrapping_add(i));
                check_coefficient(entry.y)?;
            }
        }
        Ok(())
    }
}

fn check_range(
    vertex: usize,
    start: u32,
    count: u32,
    capacity: u64,
    table: &'static str,
) -> Result<()> {
    if count > 0 && u64::from(start) + u64::from(count) > capacity {
        return Err(ShadeError::MorphEntryOutOfRange {
            vertex,
            entry: start.saturating_add(count - 1),
            table,
        });
    }
    Ok(())
}

fn check_coefficient(index: u32) -> Result<()> {
    if index as usize >= MAX_MORPH_COUNT {
        return Err(ShadeError::CoefficientIndexOutOfRange { index });
    }
    Ok(())
}

// ============================================================================
// Evaluation
// ============================================================================

/// One vertex invocation: morph, then transform
pub fn evaluate_vertex(
    inputs: &DrawInputs<'_>,
    instance_index: usize,
    vertex_index: usize,
) -> VertexOutput {
    let config = &inputs.config;
    let instance = &inputs.instances[instance_index];
    let vertex = &inputs.vertices[vertex_index];

    let additional_uv = if config.features.secondary_uv() {
        vertex.additional_uv
    } else {
        Vec4::ZERO
    };

    let (position, uv, additional_uv) = match (config.features.morph(), &inputs.morph_tables) {
        (true, Some(tables)) => {
            let morphed = morph_vertex(
                vertex.position,
                vertex.uv,
                additional_uv,
                &vertex.morph,
                tables,
                inputs.coefficients,
                config.morph_accumulation,
            );
            (morphed.position, morphed.uv, morphed.additional_uv)
        }
        _ => (vertex.position, vertex.uv, additional_uv),
    };

    let resolved = resolve_vertex(
        inputs.frame,
        instance,
        config.normal_transform,
        position,
        vertex.normal,
    );

    VertexOutput {
        instance: instance_index,
        vertex: vertex_index,
        clip_position: resolved.clip_position,
        world_position: resolved.world_position.xyz(),
        world_normal: resolved.world_normal,
        view_normal: resolved.view_normal,
        uv,
        additional_uv,
    }
}

/// A validated draw
#[derive(Debug, Clone, Copy)]
pub struct Draw<'a> {
    inputs: DrawInputs<'a>,
}

impl<'a> Draw<'a> {
    pub fn new(inputs: DrawInputs<'a>) -> Result<Self> {
        inputs.validate()?;
        Ok(Self { inputs })
    }

    pub fn inputs(&self) -> &DrawInputs<'a> {
        &self.inputs
    }

    fn shading_context(&self) -> ShadingContext<'a> {
        ShadingContext {
            material: self.inputs.material,
            textures: self.inputs.textures,
            camera_position: self.inputs.frame.camera_position,
            features: self.inputs.config.features,
        }
    }

    /// Every (instance, vertex) pair, instance-major
    pub fn run(&self) -> Vec<VertexOutput> {
        let vertex_count = self.inputs.vertices.len();
        let instance_count = self.inputs.instances.len();
        tracing::debug!(
            instances = instance_count,
            vertices = vertex_count,
            features = self.inputs.config.features.bits(),
            normal_transform = ?self.inputs.config.normal_transform,
            "running draw"
        );

        if vertex_count == 0 {
            return Vec::new();
        }
        (0..instance_count * vertex_count)
            .into_par_iter()
            .map(|i| evaluate_vertex(&self.inputs, i / vertex_count, i % vertex_count))
            .collect()
    }

    /// Shade fragment inputs in parallel
    pub fn shade_fragments(&self, fragments: &[FragmentInput]) -> Vec<Vec4> {
        let context = self.shading_context();
        tracing::debug!(fragments = fragments.len(), "shading fragments");
        fragments
            .par_iter()
            .map(|fragment| shade(fragment, &context))
            .collect()
    }

    /// Shade each vertex output as if it were a fragment
    pub fn shade_vertices(&self, outputs: &[VertexOutput]) -> Vec<Vec4> {
        let context = self.shading_context();
        outputs
            .par_iter()
            .map(|output| shade(&output.fragment(), &context))
            .collect()
    }
}
