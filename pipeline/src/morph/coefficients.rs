use morphlit_shared::MAX_MORPH_COUNT;

use crate::error::{Result, ShadeError};

/// The fixed-size coefficient table bound per draw
///
/// Coefficients are stored as given: no clamping, no normalization.
/// Negative and greater-than-one weights are valid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MorphCoefficients([f32; MAX_MORPH_COUNT]);

impl MorphCoefficients {
    /// All weights zero
    pub const ZERO: Self = Self([0.0; MAX_MORPH_COUNT]);

    pub fn from_array(values: [f32; MAX_MORPH_COUNT]) -> Self {
        Self(values)
    }

    /// Copy up to `MAX_MORPH_COUNT` leading values; the rest stay zero
    pub fn from_slice(values: &[f32]) -> Result<Self> {
        if values.len() > MAX_MORPH_COUNT {
            return Err(ShadeError::TooManyMorphs {
                count: values.len(),
            });
        }
        let mut table = Self::ZERO;
        table.0[..values.len()].copy_from_slice(values);
        Ok(table)
    }

    /// Read a weight. Out-of-range indices read as 0.0 (robust buffer
    /// access), so a bad index contributes nothing instead of panicking.
    #[inline]
    pub fn get(&self, index: u32) -> f32 {
        self.0.get(index as usize).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, index: u32, value: f32) -> Result<()> {
        let slot = self
            .0
            .get_mut(index as usize)
            .ok_or(ShadeError::CoefficientIndexOutOfRange { index })?;
        *slot = value;
        Ok(())
    }

    pub fn as_array(&self) -> &[f32; MAX_MORPH_COUNT] {
        &self.0
    }

    /// Raw bytes for upload into the storage buffer
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.0[..])
    }
}

impl Default for MorphCoefficients {
    fn default() -> Self {
        Self::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_reads_zero() {
        let mut table = MorphCoefficients::ZERO;
        table.set(127, 0.5).unwrap();
        assert_eq!(table.get(127), 0.5);
        assert_eq!(table.get(128), 0.0);
        assert_eq!(table.get(u32::MAX), 0.0);
    }

    #[test]
    fn test_set_out_of_range_errors() {
        let mut table = MorphCoefficients::ZERO;
        assert_eq!(
            table.set(128, 1.0),
            Err(ShadeError::CoefficientIndexOutOfRange { index: 128 })
        );
    }

    #[test]
    fn test_from_slice_pads_with_zero() {
        let table = MorphCoefficients::from_slice(&[1.0, -2.0]).unwrap();
        assert_eq!(table.get(0), 1.0);
        assert_eq!(table.get(1), -2.0);
        assert_eq!(table.get(2), 0.0);
        assert!(MorphCoefficients::from_slice(&[0.0; 129]).is_err());
    }

    #[test]
    fn test_byte_size() {
        assert_eq!(MorphCoefficients::ZERO.as_bytes().len(), 512);
    }
}
