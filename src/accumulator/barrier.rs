/*!
 * Barrier + Mutex Accumulation
 *
 * Separates the compute phase from the accumulation phase: every worker
 * parks at a rendezvous sized to the fan-out, and only once all partial sums
 * exist do they contend for the lock. Contention is then measured on the
 * short accumulation phase alone, independent of how long each compute
 * phase took.
 */

use super::Accumulator;
use crate::core::sync::PhaseBarrier;
use crate::core::types::Strategy;
use crate::trial::phase::Phase;
use crate::trial::{TrialConfig, WorkerContext};
use parking_lot::Mutex;
use tracing::warn;

/// Shared total guarded by a lock, entered only after a full rendezvous
pub struct BarrierMutexAccumulator {
    total: Mutex<f64>,
    barrier: PhaseBarrier,
}

impl BarrierMutexAccumulator {
    /// Accumulator for exactly `workers` participants
    ///
    /// Fewer callers than `workers` park forever unless the accumulator is
    /// abandoned.
    pub fn new(workers: usize) -> Self {
        Self {
            total: Mutex::new(0.0),
            barrier: PhaseBarrier::new(workers),
        }
    }

    #[inline]
    pub fn barrier(&self) -> &PhaseBarrier {
        &self.barrier
    }
}

impl Accumulator for BarrierMutexAccumulator {
    fn for_trial(workers: usize, _config: &TrialConfig) -> Self {
        Self::new(workers)
    }

    fn add_partial(&self, partial: f64, worker: &WorkerContext<'_>) {
        if self.barrier.wait().is_broken() {
            // A peer will never arrive; still contribute so nothing is lost
            warn!(worker = worker.id(), "barrier broken, accumulating without rendezvous");
        }

        worker.mark(Phase::AccumulateEnter);
        let mut total = self.total.lock();
        *total += partial;
    }

    fn total(&self) -> f64 {
        *self.total.lock()
    }

    fn strategy(&self) -> Strategy {
        Strategy::BarrierMutex
    }

    fn abandon(&self) {
        self.barrier.break_barrier();
    }
}
