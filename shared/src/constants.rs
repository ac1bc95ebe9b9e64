//! Centralized constants for the morphlit pipeline.
//!
//! Single source of truth for values that both the table-packing side and
//! the evaluation side must agree on.

/// Number of entries in the morph coefficient table bound per draw.
///
/// Coefficient indices stored in the morph index tables must be below this.
pub const MAX_MORPH_COUNT: usize = 128;

/// Coefficients below this value are skipped by the thresholded morph path.
///
/// Reference renders were produced with this exact value; changing it changes
/// output, since near-zero but nonzero deformation is dropped.
pub const MORPH_SKIP_THRESHOLD: f32 = 0.001;

/// Coefficient changes smaller than this are ignored by the controller.
pub const MORPH_CHANGE_EPSILON: f32 = 0.001;

/// Default row width for packed morph tables.
pub const DEFAULT_MORPH_TABLE_WIDTH: u32 = 1024;

/// Index-table channel value routing a UV morph to the primary UV.
pub const UV_MORPH_TARGET_PRIMARY: u32 = 0;
/// Index-table channel value routing a UV morph to the additional UV.
pub const UV_MORPH_TARGET_SECONDARY: u32 = 1;
