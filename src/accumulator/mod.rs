/*!
 * Accumulation Strategies
 *
 * Three ways to fold concurrently computed partial sums into one shared
 * total:
 * - Mutex: lock, add, unlock
 * - Barrier + mutex: rendezvous after the compute phase, then lock and add
 * - CAS: lock-free compare-and-swap retry loop
 *
 * # Design: One Capability, Three Protocols
 *
 * Each strategy owns its trial-scoped shared state (the total plus any
 * synchronization object) and exposes `add_partial`. The trial runner is
 * generic over [`Accumulator`] and never inspects which protocol it drives.
 */

mod barrier;
mod cas;
mod mutex;

pub use barrier::BarrierMutexAccumulator;
pub use cas::{Backoff, CasAccumulator};
pub use mutex::MutexAccumulator;

use crate::core::types::Strategy;
use crate::trial::{TrialConfig, WorkerContext};

/// Shared total that tolerates concurrent `add_partial` calls
///
/// Implementations must apply every contribution exactly once: after all
/// workers return from `add_partial`, `total()` equals the sum of their
/// partial sums, up to float rounding from the unspecified order.
pub trait Accumulator: Send + Sync {
    /// Fresh zeroed state for one trial
    ///
    /// `workers` is the exact number of workers that will call `add_partial`.
    fn for_trial(workers: usize, config: &TrialConfig) -> Self
    where
        Self: Sized;

    /// Add one worker's partial sum into the shared total
    fn add_partial(&self, partial: f64, worker: &WorkerContext<'_>);

    /// Current total
    fn total(&self) -> f64;

    fn strategy(&self) -> Strategy;

    /// A worker will never call `add_partial`
    ///
    /// Strategies that wait on peers must release them here.
    fn abandon(&self) {}

    /// Failed compare-and-swap attempts so far (diagnostics)
    fn retries(&self) -> u64 {
        0
    }
}
