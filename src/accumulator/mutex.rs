/*!
 * Mutex Accumulation
 * Exclusive lock around a single add
 */

use super::Accumulator;
use crate::core::types::Strategy;
use crate::trial::phase::Phase;
use crate::trial::{TrialConfig, WorkerContext};
use parking_lot::Mutex;

/// Shared total guarded by an exclusive lock
///
/// The critical section is one float add and never takes another lock, so
/// acquisition always eventually succeeds. The guard releases on every exit
/// path, unwinding included.
pub struct MutexAccumulator {
    total: Mutex<f64>,
}

impl MutexAccumulator {
    pub fn new() -> Self {
        Self {
            total: Mutex::new(0.0),
        }
    }
}

impl Default for MutexAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Accumulator for MutexAccumulator {
    fn for_trial(_workers: usize, _config: &TrialConfig) -> Self {
        Self::new()
    }

    #[inline]
    fn add_partial(&self, partial: f64, worker: &WorkerContext<'_>) {
        worker.mark(Phase::AccumulateEnter);
        let mut total = self.total.lock();
        *total += partial;
    }

    fn total(&self) -> f64 {
        *self.total.lock()
    }

    fn strategy(&self) -> Strategy {
        Strategy::Mutex
    }
}
