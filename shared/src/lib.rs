//! Shared types for the morphlit shading pipeline.
//!
//! This crate holds what the loading side and the evaluation side must agree
//! on, without pulling in the pipeline itself:
//!
//! - [`constants`] - morph table limits and thresholds
//! - [`math`] - POD matrix storage
//! - [`formats`] - `#[repr(C)]` binding layouts (frame, instance, material, vertex)
//! - [`variant`] - shading variant and environment blend mode tags

pub mod constants;
pub mod formats;
pub mod math;
pub mod variant;

pub use constants::{
    DEFAULT_MORPH_TABLE_WIDTH, MAX_MORPH_COUNT, MORPH_CHANGE_EPSILON, MORPH_SKIP_THRESHOLD,
    UV_MORPH_TARGET_PRIMARY, UV_MORPH_TARGET_SECONDARY,
};
pub use formats::{
    FrameUniforms, InstanceColumns, MaterialUniforms, MorphVertexAttributes, VertexRecord,
};
pub use math::ColumnMatrix4;
pub use variant::{EnvBlendMode, ShadingVariant};
