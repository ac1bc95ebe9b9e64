//! Math types for morphlit
//!
//! Provides POD (Plain Old Data) math types that can be uploaded or
//! serialized without requiring glam as a dependency.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// 4x4 matrix stored as four column vectors (column-major, POD type)
///
/// This is the layout used by instanced attributes and uniform blocks: each
/// column occupies one 16-byte slot.
///
/// Memory layout (64 bytes):
/// - col0: X axis + w
/// - col1: Y axis + w
/// - col2: Z axis + w
/// - col3: translation + w
///
/// The pipeline converts this to `glam::Mat4` by plain column concatenation.
#[derive(
    Clone, Copy, Debug, PartialEq, Serialize, Deserialize, Pod, Zeroable,
)]
#[repr(C)]
pub struct ColumnMatrix4 {
    pub cols: [[f32; 4]; 4],
}

impl ColumnMatrix4 {
    /// Identity matrix
    pub const IDENTITY: Self = Self {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Create from column arrays
    pub const fn from_cols(
        col0: [f32; 4],
        col1: [f32; 4],
        col2: [f32; 4],
        col3: [f32; 4],
    ) -> Self {
        Self {
            cols: [col0, col1, col2, col3],
        }
    }

    /// Convert to flat f32 array (column-major)
    pub fn to_array(&self) -> [f32; 16] {
        let mut out = [0.0; 16];
        for (i, col) in self.cols.iter().enumerate() {
            out[i * 4..i * 4 + 4].copy_from_slice(col);
        }
        out
    }

    /// Create from flat f32 array (column-major)
    pub fn from_array(arr: [f32; 16]) -> Self {
        Self {
            cols: [
                [arr[0], arr[1], arr[2], arr[3]],
                [arr[4], arr[5], arr[6], arr[7]],
                [arr[8], arr[9], arr[10], arr[11]],
                [arr[12], arr[13], arr[14], arr[15]],
            ],
        }
    }
}

impl Default for ColumnMatrix4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}
