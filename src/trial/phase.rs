/*!
 * Phase Instrumentation
 *
 * Records when each worker finishes its compute phase and when it enters
 * its accumulation phase.
 *
 * # Ordering
 *
 * Every event draws a ticket from one `SeqCst` counter. A happens-before edge
 * between two events (for example through a barrier) therefore shows up as
 * ticket order, which makes phase separation checkable without relying on
 * clock resolution. Wall-clock instants are kept alongside for reporting.
 */

use crate::core::types::WorkerId;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Partial sum computed
    ComputeDone,
    /// About to mutate the shared total
    AccumulateEnter,
}

#[derive(Debug, Clone, Copy)]
pub struct PhaseEvent {
    pub worker: WorkerId,
    pub phase: Phase,
    pub ticket: u64,
    pub at: Instant,
}

/// Append-only log of phase events for one trial
pub struct PhaseLog {
    next_ticket: AtomicU64,
    events: Mutex<Vec<PhaseEvent>>,
    epoch: Instant,
}

impl PhaseLog {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Pre-size for `workers` participants (two events each)
    pub fn with_capacity(workers: usize) -> Self {
        Self {
            next_ticket: AtomicU64::new(0),
            events: Mutex::new(Vec::with_capacity(workers * 2)),
            epoch: Instant::now(),
        }
    }

    pub fn record(&self, worker: WorkerId, phase: Phase) {
        let ticket = self.next_ticket.fetch_add(1, Ordering::SeqCst);
        let event = PhaseEvent {
            worker,
            phase,
            ticket,
            at: Instant::now(),
        };
        self.events.lock().push(event);
    }

    /// Events sorted by ticket
    pub fn events(&self) -> Vec<PhaseEvent> {
        let mut events = self.events.lock().clone();
        events.sort_by_key(|event| event.ticket);
        events
    }

    pub fn count(&self, phase: Phase) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|event| event.phase == phase)
            .count()
    }

    /// Highest ticket recorded for `phase`
    pub fn last_ticket(&self, phase: Phase) -> Option<u64> {
        self.events
            .lock()
            .iter()
            .filter(|event| event.phase == phase)
            .map(|event| event.ticket)
            .max()
    }

    /// Lowest ticket recorded for `phase`
    pub fn first_ticket(&self, phase: Phase) -> Option<u64> {
        self.events
            .lock()
            .iter()
            .filter(|event| event.phase == phase)
            .map(|event| event.ticket)
            .min()
    }

    /// True when every compute phase ended before any accumulation began
    pub fn compute_precedes_accumulate(&self) -> bool {
        match (
            self.last_ticket(Phase::ComputeDone),
            self.first_ticket(Phase::AccumulateEnter),
        ) {
            (Some(last_compute), Some(first_accumulate)) => last_compute < first_accumulate,
            _ => false,
        }
    }

    /// Offset of an event from log creation
    #[inline]
    pub fn offset(&self, event: &PhaseEvent) -> Duration {
        event.at.saturating_duration_since(self.epoch)
    }
}

impl Default for PhaseLog {
    fn default() -> Self {
        Self::new()
    }
}
