//! Tint operators shared by the texture, environment and toon terms
//!
//! Every factor's `a` channel is the blend strength; `rgb` is the color.

use glam::{Vec3, Vec4, Vec4Swizzles};

use super::material::TintPair;

/// `a * (1 - t) + b * t`
///
/// Written in this form so `t = 0` and `t = 1` return the endpoints exactly.
#[inline]
pub fn mix(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a * (1.0 - t) + b * t
}

/// `mix(1, color * factor.rgb, factor.a)`
///
/// Alpha 0 fades the sample to white, so the term it feeds multiplies by
/// one; alpha 1 is a plain multiply.
#[inline]
pub fn tint_multiply(color: Vec3, factor: Vec4) -> Vec3 {
    mix(Vec3::ONE, color * factor.xyz(), factor.w)
}

/// `clamp(color + (color - 1) * factor.a, 0, 1) + factor.rgb`
///
/// The alpha-scaled contrast step pulls non-white values toward black; the
/// additive offset is applied after the clamp.
#[inline]
pub fn tint_add(color: Vec3, factor: Vec4) -> Vec3 {
    (color + (color - Vec3::ONE) * factor.w).clamp(Vec3::ZERO, Vec3::ONE) + factor.xyz()
}

/// Tint-multiply then tint-add
#[inline]
pub fn apply_tint(color: Vec3, tint: &TintPair) -> Vec3 {
    tint_add(tint_multiply(color, tint.mul), tint.add)
}
