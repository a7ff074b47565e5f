/*!
 * Phase Barrier
 *
 * Rendezvous point that holds every participant until all have arrived.
 *
 * # Design: Generation Counter
 *
 * Arrivals are counted under a `parking_lot::Mutex`; the last arrival bumps
 * the generation and wakes everyone. Waiters compare generations instead of
 * the arrival count, so spurious condvar wakeups are harmless.
 *
 * Unlike `std::sync::Barrier` the barrier can be broken: a participant that
 * will never arrive (panic, failed spawn) releases its peers instead of
 * leaving them parked forever.
 */

use parking_lot::{Condvar, Mutex};

/// Outcome of [`PhaseBarrier::wait`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarrierWait {
    /// Last participant to arrive
    Leader,
    /// Released by the leader
    Follower,
    /// Released because the barrier was broken
    Broken,
}

impl BarrierWait {
    #[inline(always)]
    pub fn is_leader(&self) -> bool {
        matches!(self, BarrierWait::Leader)
    }

    #[inline(always)]
    pub fn is_broken(&self) -> bool {
        matches!(self, BarrierWait::Broken)
    }
}

struct BarrierState {
    arrived: usize,
    generation: u64,
    broken: bool,
}

/// Reusable rendezvous for a fixed number of parties
#[repr(C, align(64))]
pub struct PhaseBarrier {
    state: Mutex<BarrierState>,
    condvar: Condvar,
    parties: usize,
}

impl PhaseBarrier {
    /// Create a barrier for `parties` participants
    ///
    /// A zero-party barrier behaves like a one-party barrier.
    pub fn new(parties: usize) -> Self {
        Self {
            state: Mutex::new(BarrierState {
                arrived: 0,
                generation: 0,
                broken: false,
            }),
            condvar: Condvar::new(),
            parties: parties.max(1),
        }
    }

    /// Arrive and block until every party has arrived or the barrier breaks
    pub fn wait(&self) -> BarrierWait {
        let mut state = self.state.lock();
        if state.broken {
            return BarrierWait::Broken;
        }

        let generation = state.generation;
        state.arrived += 1;

        if state.arrived == self.parties {
            state.arrived = 0;
            state.generation = state.generation.wrapping_add(1);
            self.condvar.notify_all();
            return BarrierWait::Leader;
        }

        while state.generation == generation && !state.broken {
            self.condvar.wait(&mut state);
        }

        if state.generation == generation {
            BarrierWait::Broken
        } else {
            BarrierWait::Follower
        }
    }

    /// Release all current and future waiters
    pub fn break_barrier(&self) {
        let mut state = self.state.lock();
        if !state.broken {
            state.broken = true;
            self.condvar.notify_all();
        }
    }

    #[inline]
    pub fn is_broken(&self) -> bool {
        self.state.lock().broken
    }

    #[inline]
    pub fn parties(&self) -> usize {
        self.parties
    }

    /// Parties currently parked in the active generation
    #[inline]
    pub fn arrived(&self) -> usize {
        self.state.lock().arrived
    }
}
