use bytemuck::{Pod, Zeroable};

use crate::math::ColumnMatrix4;

/// Frame-global uniform block (144 bytes, POD)
///
/// Written once per frame/view and read by every invocation of every draw.
///
/// | Offset | Field           | Notes                          |
/// |--------|-----------------|--------------------------------|
/// | 0      | camera          | view-projection, column-major  |
/// | 64     | view            | view only, column-major        |
/// | 128    | camera_position | xyz world position, w unused   |
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct FrameUniforms {
    pub camera: ColumnMatrix4,
    pub view: ColumnMatrix4,
    pub camera_position: [f32; 4],
}

impl Default for FrameUniforms {
    fn default() -> Self {
        Self {
            camera: ColumnMatrix4::IDENTITY,
            view: ColumnMatrix4::IDENTITY,
            camera_position: [0.0, 0.0, 0.0, 1.0],
        }
    }
}
