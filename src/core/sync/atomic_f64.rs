/*!
 * Atomic f64
 * Floating-point cell stored as its bit pattern in an `AtomicU64`
 */

use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic `f64` built on `AtomicU64`
///
/// There is no native atomic float, so values travel as raw bits.
/// `compare_exchange` compares bit patterns, not float equality: `0.0` and
/// `-0.0` differ, and a stored NaN still matches the NaN that was loaded.
#[repr(C, align(64))]
pub struct AtomicF64 {
    bits: AtomicU64,
}

impl AtomicF64 {
    #[inline]
    pub const fn from_bits(bits: u64) -> Self {
        Self {
            bits: AtomicU64::new(bits),
        }
    }

    #[inline]
    pub fn new(value: f64) -> Self {
        Self::from_bits(value.to_bits())
    }

    #[inline(always)]
    pub fn load(&self, order: Ordering) -> f64 {
        f64::from_bits(self.bits.load(order))
    }

    #[inline(always)]
    pub fn store(&self, value: f64, order: Ordering) {
        self.bits.store(value.to_bits(), order);
    }

    /// Replace with `new` if the stored bits still equal `current`'s
    ///
    /// On failure returns the value actually stored.
    #[inline]
    pub fn compare_exchange(
        &self,
        current: f64,
        new: f64,
        success: Ordering,
        failure: Ordering,
    ) -> Result<f64, f64> {
        self.bits
            .compare_exchange(current.to_bits(), new.to_bits(), success, failure)
            .map(f64::from_bits)
            .map_err(f64::from_bits)
    }

    #[inline]
    pub fn into_inner(self) -> f64 {
        f64::from_bits(self.bits.into_inner())
    }
}

impl Default for AtomicF64 {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl std::fmt::Debug for AtomicF64 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("AtomicF64")
            .field(&self.load(Ordering::Relaxed))
            .finish()
    }
}
