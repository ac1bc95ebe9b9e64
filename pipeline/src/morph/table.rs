use std::num::NonZeroU32;

use glam::{UVec2, UVec3, Vec3, Vec4};

use crate::error::{Result, ShadeError};

/// Row-major unwrap of a flat index onto a table of the given width
///
/// `unwrap(n, w) = (n mod w, n div w)`. The width is always the live width of
/// the bound table; tables for different meshes are packed at different
/// widths.
#[inline]
pub fn unwrap_index(index: u32, width: NonZeroU32) -> UVec2 {
    let width = width.get();
    UVec2::new(index % width, index / width)
}

/// A 2D table addressed by texel coordinates
///
/// This is the abstraction the morph evaluator reads through. A GPU backend
/// maps it onto `textureLoad`; [`PackedTable`] backs it with a plain buffer.
/// Out-of-bounds loads return `T::default()` (robust access).
pub trait TexelTable<T>: Send + Sync {
    /// Live row width. Non-zero by construction.
    fn width(&self) -> NonZeroU32;

    /// Number of rows
    fn height(&self) -> u32;

    /// Addressable texels (`width * height`)
    #[inline]
    fn capacity(&self) -> u64 {
        u64::from(self.width().get()) * u64::from(self.height())
    }

    /// Load the texel at `coord`
    fn load(&self, coord: UVec2) -> T;

    /// Load the texel a flat row-major index unwraps to
    #[inline]
    fn fetch(&self, index: u32) -> T {
        self.load(unwrap_index(index, self.width()))
    }
}

/// Buffer-backed table with a runtime width
#[derive(Debug, Clone, PartialEq)]
pub struct PackedTable<T> {
    width: NonZeroU32,
    height: u32,
    texels: Vec<T>,
}

impl<T: Copy + Default> PackedTable<T> {
    /// Wrap texels that already fill whole rows
    ///
    /// # Errors
    ///
    /// `ZeroTableWidth` if `width` is 0, `TableSizeMismatch` if the texel
    /// count is not a multiple of `width`.
    pub fn new(width: u32, texels: Vec<T>) -> Result<Self> {
        let width = NonZeroU32::new(width).ok_or(ShadeError::ZeroTableWidth)?;
        if texels.len() % width.get() as usize != 0 {
            return Err(ShadeError::TableSizeMismatch {
                len: texels.len(),
                width: width.get(),
            });
        }
        let height = (texels.len() / width.get() as usize) as u32;
        Ok(Self {
            width,
            height,
            texels,
        })
    }

    /// Pack a flat entry list, padding the last row with `T::default()`
    ///
    /// An empty list still produces one row so the table can be bound.
    pub fn from_entries(width: u32, mut entries: Vec<T>) -> Result<Self> {
        let row = NonZeroU32::new(width).ok_or(ShadeError::ZeroTableWidth)?.get() as usize;
        let padded = entries.len().div_ceil(row).max(1) * row;
        entries.resize(padded, T::default());
        Self::new(width, entries)
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of texels (`width * height`)
    #[inline]
    pub fn len(&self) -> usize {
        self.texels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.texels.is_empty()
    }

    pub fn texels(&self) -> &[T] {
        &self.texels
    }
}

impl<T: Copy + Default + Send + Sync> TexelTable<T> for PackedTable<T> {
    #[inline]
    fn width(&self) -> NonZeroU32 {
        self.width
    }

    #[inline]
    fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn load(&self, coord: UVec2) -> T {
        if coord.x >= self.width.get() || coord.y >= self.height {
            return T::default();
        }
        self.texels[coord.y as usize * self.width.get() as usize + coord.x as usize]
    }
}

/// Borrowed view of the four morph tables bound to a draw
#[derive(Clone, Copy)]
pub struct MorphTableSet<'a> {
    /// `(coefficient index, displacement row)`
    pub vertex_index: &'a dyn TexelTable<UVec2>,
    pub vertex_displacement: &'a dyn TexelTable<Vec3>,
    /// `(target kind, coefficient index, displacement row)`
    pub uv_index: &'a dyn TexelTable<UVec3>,
    pub uv_displacement: &'a dyn TexelTable<Vec4>,
}

impl std::fmt::Debug for MorphTableSet<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MorphTableSet")
            .field("vertex_index_width", &self.vertex_index.width())
            .field("vertex_displacement_width", &self.vertex_displacement.width())
            .field("uv_index_width", &self.uv_index.width())
            .field("uv_displacement_width", &self.uv_displacement.width())
            .finish()
    }
}

/// Owned, buffer-backed morph tables
#[derive(Debug, Clone, PartialEq)]
pub struct MorphTables {
    pub vertex_index: PackedTable<UVec2>,
    pub vertex_displacement: PackedTable<Vec3>,
    pub uv_index: PackedTable<UVec3>,
    pub uv_displacement: PackedTable<Vec4>,
}

impl MorphTables {
    pub fn as_set(&self) -> MorphTableSet<'_> {
        MorphTableSet {
            vertex_index: &self.vertex_index,
            vertex_displacement: &self.vertex_displacement,
            uv_index: &self.uv_index,
            uv_displacement: &self.uv_displacement,
        }
    }
}
