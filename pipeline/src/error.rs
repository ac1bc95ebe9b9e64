use morphlit_shared::MAX_MORPH_COUNT;

/// Contract violations detected before a draw, or while packing morph tables
///
/// Evaluation itself never fails; these are reported by the loading-side
/// helpers ([`MorphTableBuilder`](crate::morph::MorphTableBuilder),
/// [`MorphController`](crate::morph::MorphController),
/// [`DrawInputs::validate`](crate::draw::DrawInputs::validate)).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ShadeError {
    #[error("table width must be non-zero")]
    ZeroTableWidth,

    #[error("{len} texels is not a whole number of {width}-wide rows")]
    TableSizeMismatch { len: usize, width: u32 },

    #[error("{count} morphs exceed the coefficient table size ({max})", max = MAX_MORPH_COUNT)]
    TooManyMorphs { count: usize },

    #[error("coefficient index {index} is out of range (must be < {max})", max = MAX_MORPH_COUNT)]
    CoefficientIndexOutOfRange { index: u32 },

    #[error("group morph {group} references morph {member}, which does not exist")]
    GroupMemberOutOfRange { group: usize, member: u32 },

    #[error("vertex index {index} is out of range for {vertex_count} vertices")]
    VertexIndexOutOfRange { index: u32, vertex_count: u32 },

    #[error("morph entry {entry} of vertex {vertex} points past the end of the `{table}` table")]
    MorphEntryOutOfRange {
        vertex: usize,
        entry: u32,
        table: &'static str,
    },

    #[error("instance {instance} has no inverse-model but the corrected normal path is selected")]
    MissingInverseModel { instance: usize },

    #[error("morphing is enabled but no morph tables are bound")]
    MissingMorphTables,

    #[error("a {width}x{height} texture needs a non-zero size and {width}x{height} texels, got {len}")]
    TextureSizeMismatch { width: u32, height: u32, len: usize },

    #[error("the `{0}` texture is required by the shading configuration but not bound")]
    MissingTexture(&'static str),

    #[error("environment blend mode 3 needs the additional UV channel enabled")]
    AdditionalUvRequired,
}

pub type Result<T> = std::result::Result<T, ShadeError>;
