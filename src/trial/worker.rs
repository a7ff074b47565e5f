/*!
 * Worker
 * Body of one spawned worker thread
 */

use super::phase::{Phase, PhaseLog};
use crate::accumulator::Accumulator;
use crate::core::sync::CompletionSignal;
use crate::core::types::WorkerId;
use crate::workload::Workload;
use std::thread;
use tracing::trace;

/// Identity and instrumentation handed to an accumulator
pub struct WorkerContext<'a> {
    id: WorkerId,
    phase_log: Option<&'a PhaseLog>,
}

impl<'a> WorkerContext<'a> {
    #[inline]
    pub fn new(id: WorkerId, phase_log: Option<&'a PhaseLog>) -> Self {
        Self { id, phase_log }
    }

    /// Context with no instrumentation
    #[inline]
    pub fn detached(id: WorkerId) -> Self {
        Self::new(id, None)
    }

    #[inline(always)]
    pub fn id(&self) -> WorkerId {
        self.id
    }

    /// Record a phase boundary, if instrumented
    #[inline(always)]
    pub fn mark(&self, phase: Phase) {
        if let Some(log) = self.phase_log {
            log.record(self.id, phase);
        }
    }
}

/// Abandons the accumulator if the worker unwinds before contributing
struct AbandonOnUnwind<'a, A: Accumulator>(&'a A);

impl<A: Accumulator> Drop for AbandonOnUnwind<'_, A> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.0.abandon();
        }
    }
}

/// Compute one partial sum, hand it to the accumulator, then signal
pub(crate) fn run_worker<A: Accumulator>(
    id: WorkerId,
    workers: usize,
    workload: &Workload,
    accumulator: &A,
    completion: &CompletionSignal,
    phase_log: Option<&PhaseLog>,
) {
    // Dropped last: completion is signalled after the contribution, or on unwind
    let _token = completion.token();
    let _abandon = AbandonOnUnwind(accumulator);

    let context = WorkerContext::new(id, phase_log);
    let partial = workload.partial_sum(id, workers);
    context.mark(Phase::ComputeDone);

    accumulator.add_partial(partial, &context);
    trace!(worker = id, partial, "partial sum contributed");
}
