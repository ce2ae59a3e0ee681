//! Precomputed sine table used in place of per-pixel `sin` calls.

use std::f32::consts::TAU;

/// Default number of table entries.
pub const DEFAULT_TABLE_SIZE: usize = 2048;

/// Sine values sampled over one full period.
///
/// The length is always a power of two so wrapping an index is a single mask.
#[derive(Debug, Clone)]
pub struct SineTable {
    values: Box<[f32]>,
    mask: usize,
}

impl Default for SineTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SineTable {
    /// Build a table with [`DEFAULT_TABLE_SIZE`] entries.
    pub fn new() -> Self {
        Self::with_size(DEFAULT_TABLE_SIZE)
    }

    /// Build a table with at least `size` entries, rounded up to a power of two.
    pub fn with_size(size: usize) -> Self {
        let len = size.max(2).next_power_of_two();
        let values: Box<[f32]> = (0..len)
            .map(|i| (std::f64::consts::TAU * i as f64 / len as f64).sin() as f32)
            .collect();
        Self {
            values,
            mask: len - 1,
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false; a table has at least two entries.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw entry at `index`, wrapped into range.
    pub fn get(&self, index: usize) -> f32 {
        self.values[index & self.mask]
    }

    /// Table index for phase `x` in radians.
    ///
    /// Negative phases wrap with a Euclidean remainder. NaN and infinities map
    /// to index 0.
    #[inline]
    pub fn index_of(&self, x: f32) -> usize {
        let turn = x.rem_euclid(TAU) / TAU;
        // Float to usize casts saturate and send NaN to 0.
        (turn * self.values.len() as f32) as usize & self.mask
    }

    /// Approximate `sin(x)`.
    #[inline]
    pub fn lookup(&self, x: f32) -> f32 {
        self.values[self.index_of(x)]
    }
}
