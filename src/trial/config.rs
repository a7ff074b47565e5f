/*!
 * Trial Configuration
 *
 * Fan-out and per-strategy tuning for a trial runner
 */

use crate::accumulator::Backoff;
use crate::core::limits::{
    DEFAULT_WORKER_COUNT, DEFAULT_WORKER_STACK_SIZE, HIGH_CONTENTION_WORKER_COUNT,
};
use serde::{Deserialize, Serialize};

/// Trial configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialConfig {
    /// Workers spawned per trial; sizes the completion signal and barrier
    pub worker_count: usize,
    /// Pause between failed compare-and-swap attempts
    pub backoff: Backoff,
    /// Stack size of each worker thread
    pub stack_size: usize,
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self::with_workers(DEFAULT_WORKER_COUNT)
    }
}

impl TrialConfig {
    pub const fn with_workers(worker_count: usize) -> Self {
        Self {
            worker_count,
            backoff: Backoff::None,
            stack_size: DEFAULT_WORKER_STACK_SIZE,
        }
    }

    /// Configuration for the 256-worker contention scenario
    pub const fn high_contention() -> Self {
        Self::with_workers(HIGH_CONTENTION_WORKER_COUNT)
    }

    pub const fn backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    pub const fn stack_size(mut self, stack_size: usize) -> Self {
        self.stack_size = stack_size;
        self
    }
}
