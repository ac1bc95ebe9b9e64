use bytemuck::{Pod, Zeroable};

use crate::math::ColumnMatrix4;

/// Per-instance attribute columns (128 bytes, POD)
///
/// Bound as 8 consecutive `Float32x4` instance attributes: four model
/// columns followed by four inverse-model columns. Layouts that only bind
/// the model (the legacy normal path) use the first 64 bytes.
///
/// The inverse-model is expected to be the exact inverse of the model; it is
/// never re-derived or checked on the evaluation side.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct InstanceColumns {
    pub model: ColumnMatrix4,
    pub inverse_model: ColumnMatrix4,
}

impl InstanceColumns {
    /// Number of `Float32x4` attributes when only the model is bound.
    pub const MODEL_ONLY_ATTRIBUTE_COUNT: u32 = 4;
    /// Number of `Float32x4` attributes with the inverse-model bound.
    pub const FULL_ATTRIBUTE_COUNT: u32 = 8;

    pub const fn new(model: ColumnMatrix4, inverse_model: ColumnMatrix4) -> Self {
        Self {
            model,
            inverse_model,
        }
    }
}
