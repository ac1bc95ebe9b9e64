//! Binding layouts for the per-draw inputs
//!
//! Every type here is `#[repr(C)]` and `Pod`, grouped by binding lifetime:
//! - [`frame`] - frame-global uniform block (camera, view)
//! - [`instance`] - per-instance attribute columns
//! - [`material`] - per-material uniform block
//! - [`vertex`] - per-vertex attribute record including morph references

pub mod frame;
pub mod instance;
pub mod material;
pub mod vertex;

pub use frame::FrameUniforms;
pub use instance::InstanceColumns;
pub use material::MaterialUniforms;
pub use vertex::{MorphVertexAttributes, VertexRecord};
