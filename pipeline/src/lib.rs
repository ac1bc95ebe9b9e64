//! CPU reference evaluator for morph-animated, instanced toon shading
//!
//! Per vertex: morph displacement through indirect tables, then the
//! world/clip/view transform. Per fragment: ambient, diffuse, base texture,
//! environment map, toon ramp and Blinn specular, composited under a small
//! set of feature flags.
//!
//! Every stage is a plain function over borrowed, read-only inputs.
//! [`Draw`] validates the bound inputs once and fans invocations out with
//! rayon.

pub mod draw;
pub mod error;
pub mod morph;
pub mod shading;
pub mod texture;
pub mod transform;

pub use draw::{Draw, DrawInputs, Vertex, VertexOutput, evaluate_vertex};
pub use error::{Result, ShadeError};
pub use morph::{
    MorphAccumulation, MorphCoefficients, MorphController, MorphDefinition, MorphKind,
    MorphTableBuilder, MorphTableBundle, MorphTableSet, MorphTables, PackedTable, TexelTable,
};
pub use shading::{FragmentInput, Light, Material, ShadingConfig, ShadingFeatures, TintPair};
pub use texture::{AddressMode, BoundTexture, FilterMode, Sampler, Texture, TextureBindings};
pub use transform::{FrameState, InstanceTransform, NormalTransform};

pub use morphlit_shared as shared;
