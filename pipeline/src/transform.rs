//! Transform resolver
//!
//! Rebuilds instance and camera matrices from packed columns and maps a
//! (morphed) vertex into world, clip and view space. Pure math, no state.
//!
//! Matrices are assembled by plain column concatenation. Nothing here
//! re-derives or validates them: the caller guarantees the columns form a
//! valid affine transform and that a supplied inverse-model really is the
//! inverse of the model.

use glam::{Mat3, Mat4, Vec3, Vec4};
use morphlit_shared::{ColumnMatrix4, FrameUniforms, InstanceColumns};
use serde::{Deserialize, Serialize};

/// How world-space normals are derived for a material
///
/// Content authored against the legacy output depends on it; the legacy
/// path is never rewritten to the corrected one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NormalTransform {
    /// Normal multiplied by the model matrix's linear part.
    /// Wrong under non-uniform scale.
    Legacy,
    /// Normal multiplied by the supplied inverse-model's linear part,
    /// taken as-is (not transposed).
    #[default]
    InverseModel,
}

/// Build a 4x4 matrix from four column vectors
#[inline]
pub fn matrix_from_columns(c0: Vec4, c1: Vec4, c2: Vec4, c3: Vec4) -> Mat4 {
    Mat4::from_cols(c0, c1, c2, c3)
}

/// Build a 4x4 matrix from its POD column storage
#[inline]
pub fn matrix_from_packed(packed: &ColumnMatrix4) -> Mat4 {
    let [c0, c1, c2, c3] = packed.cols;
    matrix_from_columns(
        Vec4::from_array(c0),
        Vec4::from_array(c1),
        Vec4::from_array(c2),
        Vec4::from_array(c3),
    )
}

/// Pack a matrix into POD column storage
#[inline]
pub fn matrix_to_packed(matrix: &Mat4) -> ColumnMatrix4 {
    ColumnMatrix4::from_array(matrix.to_cols_array())
}

/// Per-instance transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstanceTransform {
    pub model: Mat4,
    /// `None` when only the four model columns are bound
    pub inverse_model: Option<Mat4>,
}

impl InstanceTransform {
    /// Instance with only the model bound
    pub fn from_model(model: Mat4) -> Self {
        Self {
            model,
            inverse_model: None,
        }
    }

    /// Instance with model and a caller-computed inverse
    pub fn with_inverse(model: Mat4, inverse_model: Mat4) -> Self {
        Self {
            model,
            inverse_model: Some(inverse_model),
        }
    }

    /// Decode the 8-column instance attribute block
    pub fn from_columns(columns: &InstanceColumns) -> Self {
        Self::with_inverse(
            matrix_from_packed(&columns.model),
            matrix_from_packed(&columns.inverse_model),
        )
    }

    /// Encode into the 8-column instance attribute block
    ///
    /// A missing inverse is written as the model itself, which is what the
    /// normal path falls back to anyway.
    pub fn to_columns(&self) -> InstanceColumns {
        InstanceColumns::new(
            matrix_to_packed(&self.model),
            matrix_to_packed(&self.inverse_model.unwrap_or(self.model)),
        )
    }

    /// Matrix whose linear part transforms normals for the given path
    ///
    /// The corrected path falls back to the model when no inverse is bound.
    #[inline]
    pub fn normal_matrix(&self, path: NormalTransform) -> Mat3 {
        match path {
            NormalTransform::Legacy => Mat3::from_mat4(self.model),
            NormalTransform::InverseModel => {
                Mat3::from_mat4(self.inverse_model.unwrap_or(self.model))
            }
        }
    }
}

impl Default for InstanceTransform {
    fn default() -> Self {
        Self::with_inverse(Mat4::IDENTITY, Mat4::IDENTITY)
    }
}

/// Camera/view state shared by every invocation of a frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameState {
    /// View-projection
    pub camera: Mat4,
    pub camera_position: Vec3,
    pub view: Mat4,
}

impl FrameState {
    pub fn from_uniforms(uniforms: &FrameUniforms) -> Self {
        Self {
            camera: matrix_from_packed(&uniforms.camera),
            camera_position: Vec4::from_array(uniforms.camera_position).truncate(),
            view: matrix_from_packed(&uniforms.view),
        }
    }

    pub fn to_uniforms(&self) -> FrameUniforms {
        FrameUniforms {
            camera: matrix_to_packed(&self.camera),
            view: matrix_to_packed(&self.view),
            camera_position: self.camera_position.extend(1.0).to_array(),
        }
    }

    /// Right-handed perspective camera looking from `eye` at `target`
    pub fn look_at(
        eye: Vec3,
        target: Vec3,
        up: Vec3,
        fov_y_radians: f32,
        aspect: f32,
        near: f32,
        far: f32,
    ) -> Self {
        let view = Mat4::look_at_rh(eye, target, up);
        let projection = Mat4::perspective_rh(fov_y_radians, aspect, near, far);
        Self {
            camera: projection * view,
            camera_position: eye,
            view,
        }
    }
}

impl Default for FrameState {
    fn default() -> Self {
        Self {
            camera: Mat4::IDENTITY,
            camera_position: Vec3::ZERO,
            view: Mat4::IDENTITY,
        }
    }
}

/// `model · (position, 1)`
#[inline]
pub fn world_position(model: &Mat4, position: Vec3) -> Vec4 {
    *model * position.extend(1.0)
}

/// `camera · world_position`
#[inline]
pub fn clip_position(camera: &Mat4, world_position: Vec4) -> Vec4 {
    *camera * world_position
}

/// World-space normal for the selected path, renormalized
#[inline]
pub fn world_normal(instance: &InstanceTransform, normal: Vec3, path: NormalTransform) -> Vec3 {
    (instance.normal_matrix(path) * normal).normalize_or_zero()
}

/// View-space normal: `transpose(view) · n` over the upper-left 3x3, renormalized
#[inline]
pub fn view_normal(view: &Mat4, world_normal: Vec3) -> Vec3 {
    (Mat3::from_mat4(*view).transpose() * world_normal).normalize_or_zero()
}

/// Every space a vertex is resolved into
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedVertex {
    pub world_position: Vec4,
    pub clip_position: Vec4,
    pub world_normal: Vec3,
    pub view_normal: Vec3,
}

/// Map an already-morphed local position and normal through an instance
pub fn resolve_vertex(
    frame: &FrameState,
    instance: &InstanceTransform,
    path: NormalTransform,
    position: Vec3,
    normal: Vec3,
) -> ResolvedVertex {
    let world_position = world_position(&instance.model, position);
    let world_normal = world_normal(instance, normal, path);
    ResolvedVertex {
        world_position,
        clip_position: clip_position(&frame.camera, world_position),
        world_normal,
        view_normal: view_normal(&frame.view, world_normal),
    }
}
