//! Decoded RGBA textures and the samplers the compositor reads them through
//!
//! Texture decoding happens elsewhere; these hold linear float texels.

use std::num::NonZeroU32;

use glam::{Vec2, Vec4};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ShadeError};

/// Texel filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterMode {
    Nearest,
    #[default]
    Linear,
}

/// How coordinates outside `[0, 1)` are resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AddressMode {
    #[default]
    Repeat,
    ClampToEdge,
}

impl AddressMode {
    /// Resolve an integer texel coordinate onto `[0, size)`
    #[inline]
    fn resolve(self, coord: i64, size: u32) -> u32 {
        let size = i64::from(size);
        match self {
            AddressMode::Repeat => coord.rem_euclid(size) as u32,
            AddressMode::ClampToEdge => coord.clamp(0, size - 1) as u32,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Sampler {
    pub filter: FilterMode,
    pub address: AddressMode,
}

impl Sampler {
    /// Tiling textures
    pub const REPEAT_LINEAR: Self = Self {
        filter: FilterMode::Linear,
        address: AddressMode::Repeat,
    };

    /// Every material texture. Matcap and toon lookups reach exactly 0 and 1
    /// and must not blend in the opposite edge.
    pub const CLAMP_LINEAR: Self = Self {
        filter: FilterMode::Linear,
        address: AddressMode::ClampToEdge,
    };

    pub const REPEAT_NEAREST: Self = Self {
        filter: FilterMode::Nearest,
        address: AddressMode::Repeat,
    };
}

/// Row-major RGBA texture
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    width: NonZeroU32,
    height: NonZeroU32,
    texels: Vec<Vec4>,
}

impl Texture {
    pub fn new(width: u32, height: u32, texels: Vec<Vec4>) -> Result<Self> {
        let mismatch = || ShadeError::TextureSizeMismatch {
            width,
            height,
            len: texels.len(),
        };
        let (Some(w), Some(h)) = (NonZeroU32::new(width), NonZeroU32::new(height)) else {
            return Err(mismatch());
        };
        if texels.len() != width as usize * height as usize {
            return Err(mismatch());
        }
        Ok(Self {
            width: w,
            height: h,
            texels,
        })
    }

    /// A 1x1 texture of one color
    pub fn solid(color: Vec4) -> Self {
        Self {
            width: NonZeroU32::MIN,
            height: NonZeroU32::MIN,
            texels: vec![color],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width.get()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height.get()
    }

    #[inline]
    pub fn texel(&self, x: u32, y: u32) -> Vec4 {
        self.texels[y as usize * self.width.get() as usize + x as usize]
    }

    /// Sample at normalized coordinates
    pub fn sample(&self, sampler: &Sampler, uv: Vec2) -> Vec4 {
        let (w, h) = (self.width.get(), self.height.get());
        let scaled = uv * Vec2::new(w as f32, h as f32);
        match sampler.filter {
            FilterMode::Nearest => {
                let x = sampler.address.resolve(scaled.x.floor() as i64, w);
                let y = sampler.address.resolve(scaled.y.floor() as i64, h);
                self.texel(x, y)
            }
            FilterMode::Linear => {
                // Texel centers sit at half-integer coordinates. The float to
                // integer casts saturate, so the neighbor uses saturating_add.
                let p = scaled - Vec2::splat(0.5);
                let base = p.floor();
                let t = p - base;
                let (x0, y0) = (base.x as i64, base.y as i64);
                let xs = [
                    sampler.address.resolve(x0, w),
                    sampler.address.resolve(x0.saturating_add(1), w),
                ];
                let ys = [
                    sampler.address.resolve(y0, h),
                    sampler.address.resolve(y0.saturating_add(1), h),
                ];
                let top = blend(self.texel(xs[0], ys[0]), self.texel(xs[1], ys[0]), t.x);
                let bottom = blend(self.texel(xs[0], ys[1]), self.texel(xs[1], ys[1]), t.x);
                blend(top, bottom, t.y)
            }
        }
    }
}

/// `a + (b - a) * t`, which returns `a` exactly when both texels match
#[inline]
fn blend(a: Vec4, b: Vec4, t: f32) -> Vec4 {
    a + (b - a) * t
}

/// A texture paired with the sampler it is read through
#[derive(Debug, Clone, PartialEq)]
pub struct BoundTexture {
    pub texture: Texture,
    pub sampler: Sampler,
}

impl BoundTexture {
    pub fn new(texture: Texture, sampler: Sampler) -> Self {
        Self { texture, sampler }
    }

    #[inline]
    pub fn sample(&self, uv: Vec2) -> Vec4 {
        self.texture.sample(&self.sampler, uv)
    }
}

/// The resource-group textures of a draw
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextureBindings {
    pub base: Option<BoundTexture>,
    pub toon: Option<BoundTexture>,
    pub environment: Option<BoundTexture>,
}

impl TextureBindings {
    pub fn with_base(mut self, texture: Texture) -> Self {
        self.base = Some(BoundTexture::new(texture, Sampler::CLAMP_LINEAR));
        self
    }

    pub fn with_toon(mut self, texture: Texture) -> Self {
        self.toon = Some(BoundTexture::new(texture, Sampler::CLAMP_LINEAR));
        self
    }

    pub fn with_environment(mut self, texture: Texture) -> Self {
        self.environment = Some(BoundTexture::new(texture, Sampler::CLAMP_LINEAR));
        self
    }
}
