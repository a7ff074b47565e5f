/*!
 * Compare-and-Swap Accumulation
 *
 * Lock-free: no worker ever blocks another. Each attempt reads the total,
 * adds its partial sum, and publishes the candidate only if the total is
 * still the value it read. A failed attempt means another worker won the
 * race, so the loop retries from a fresh read.
 *
 * Retries are unbounded; livelock under adversarial scheduling is possible
 * in theory and not handled. The retry count is kept for diagnostics only.
 */

use super::Accumulator;
use crate::core::sync::AtomicF64;
use crate::core::types::Strategy;
use crate::trial::phase::Phase;
use crate::trial::{TrialConfig, WorkerContext};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Pause between failed compare-and-swap attempts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Backoff {
    /// Retry immediately
    #[default]
    None,
    /// Exponential `spin_loop` hints, doubling per failure up to `max_spins`
    Spin { max_spins: u32 },
}

impl Backoff {
    #[inline]
    fn pause(&self, failures: u32) {
        if let Backoff::Spin { max_spins } = *self {
            let spins = (1u32 << failures.min(31)).min(max_spins);
            for _ in 0..spins {
                std::hint::spin_loop();
            }
        }
    }
}

/// Shared total updated through a compare-and-swap retry loop
pub struct CasAccumulator {
    total: AtomicF64,
    retries: AtomicU64,
    backoff: Backoff,
}

impl CasAccumulator {
    pub fn new(backoff: Backoff) -> Self {
        Self {
            total: AtomicF64::new(0.0),
            retries: AtomicU64::new(0),
            backoff,
        }
    }
}

impl Default for CasAccumulator {
    fn default() -> Self {
        Self::new(Backoff::None)
    }
}

impl Accumulator for CasAccumulator {
    fn for_trial(_workers: usize, config: &TrialConfig) -> Self {
        Self::new(config.backoff)
    }

    fn add_partial(&self, partial: f64, worker: &WorkerContext<'_>) {
        worker.mark(Phase::AccumulateEnter);

        let mut failures = 0u32;
        loop {
            let current = self.total.load(Ordering::Acquire);
            let candidate = current + partial;
            match self
                .total
                .compare_exchange(current, candidate, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => break,
                Err(_) => {
                    failures = failures.saturating_add(1);
                    self.backoff.pause(failures);
                }
            }
        }

        // One shared write per worker keeps the counter off the hot loop
        if failures > 0 {
            self.retries.fetch_add(u64::from(failures), Ordering::Relaxed);
        }
    }

    fn total(&self) -> f64 {
        self.total.load(Ordering::Acquire)
    }

    fn strategy(&self) -> Strategy {
        Strategy::Cas
    }

    fn retries(&self) -> u64 {
        self.retries.load(Ordering::Relaxed)
    }
}
