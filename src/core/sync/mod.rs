/*!
 * Synchronization Primitives
 *
 * Building blocks the accumulation strategies and the trial runner share:
 * - Completion latch for the coordinator
 * - Breakable rendezvous barrier for phase separation
 * - Atomic f64 for the lock-free total
 */

mod atomic_f64;
mod barrier;
mod completion;

pub use atomic_f64::AtomicF64;
pub use barrier::{BarrierWait, PhaseBarrier};
pub use completion::{CompletionSignal, CompletionToken};
