/*!
 * Completion Signal
 *
 * Countdown latch letting one coordinator block until N workers finish.
 *
 * # Design: Mutex + Condvar Over Spinning
 *
 * The coordinator may wait for the whole trial, which can be long relative
 * to a spin budget, so it parks on a `parking_lot::Condvar`. Workers only
 * take the mutex once, to decrement.
 */

use parking_lot::{Condvar, Mutex};
use std::time::{Duration, Instant};
use tracing::warn;

/// Countdown latch sized at creation
///
/// Reaches zero exactly once. Counting down past zero is a caller bug and is
/// ignored (logged), never wrapped.
#[repr(C, align(64))]
pub struct CompletionSignal {
    remaining: Mutex<usize>,
    condvar: Condvar,
    initial: usize,
}

impl CompletionSignal {
    pub fn new(count: usize) -> Self {
        Self {
            remaining: Mutex::new(count),
            condvar: Condvar::new(),
            initial: count,
        }
    }

    /// Record one participant as finished
    ///
    /// Returns `true` for the call that brought the count to zero.
    pub fn count_down(&self) -> bool {
        let mut remaining = self.remaining.lock();
        if *remaining == 0 {
            warn!(initial = self.initial, "completion signal counted down past zero");
            return false;
        }

        *remaining -= 1;
        if *remaining == 0 {
            self.condvar.notify_all();
            true
        } else {
            false
        }
    }

    /// Token that counts down when dropped, including during unwind
    #[inline]
    pub fn token(&self) -> CompletionToken<'_> {
        CompletionToken { signal: self }
    }

    /// Block until the count reaches zero
    pub fn wait(&self) {
        let mut remaining = self.remaining.lock();
        while *remaining > 0 {
            self.condvar.wait(&mut remaining);
        }
    }

    /// Block until the count reaches zero or `timeout` elapses
    ///
    /// Returns `true` if the signal completed.
    pub fn wait_for(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut remaining = self.remaining.lock();
        while *remaining > 0 {
            if self.condvar.wait_until(&mut remaining, deadline).timed_out() {
                return *remaining == 0;
            }
        }
        true
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        *self.remaining.lock()
    }

    #[inline]
    pub fn initial(&self) -> usize {
        self.initial
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.remaining() == 0
    }
}

/// Drop guard returned by [`CompletionSignal::token`]
pub struct CompletionToken<'a> {
    signal: &'a CompletionSignal,
}

impl Drop for CompletionToken<'_> {
    fn drop(&mut self) {
        self.signal.count_down();
    }
}
