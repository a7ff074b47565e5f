/*!
 * Trial Runner
 *
 * Drives one trial through `Idle -> Spawning -> WaitingForCompletion -> Done`:
 * builds fresh per-trial state, spawns the fan-out on scoped OS threads,
 * blocks on the completion signal and returns the final total.
 *
 * # Failure Handling
 *
 * Workers are assumed not to fail, but the runner never hangs if one does:
 * - A worker that unwinds still counts down (drop token) and abandons the
 *   accumulator so barrier peers are released
 * - A spawn failure abandons the accumulator and counts down for every
 *   worker that was never started
 *
 * Both cases are reported as errors once all started workers have drained.
 */

use super::config::TrialConfig;
use super::phase::PhaseLog;
use super::worker::run_worker;
use crate::accumulator::{Accumulator, BarrierMutexAccumulator, CasAccumulator, MutexAccumulator};
use crate::core::errors::TrialError;
use crate::core::limits::{MAX_WORKER_COUNT, TOTAL_RELATIVE_TOLERANCE};
use crate::core::sync::CompletionSignal;
use crate::core::types::{totals_match, Strategy, TrialResult};
use crate::monitoring::{span_trial, MetricsCollector};
use crate::workload::{Workload, WorkloadShape};
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, error};

/// Lifecycle of a single trial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrialState {
    /// No workers exist
    Idle,
    /// Per-trial state allocated, workers being launched
    Spawning,
    /// Blocked on the completion signal
    WaitingForCompletion,
    /// Total returned, per-trial state dropped
    Done,
}

/// Outcome of one trial
#[derive(Debug, Clone, Serialize)]
pub struct TrialReport {
    pub trace_id: String,
    pub strategy: Strategy,
    pub workers: usize,
    pub total: f64,
    pub elapsed_us: u64,
    pub cas_retries: u64,
    pub workload: WorkloadShape,
}

impl TrialReport {
    #[inline]
    pub fn elapsed(&self) -> Duration {
        Duration::from_micros(self.elapsed_us)
    }

    /// Whether the total matches a sequential sum of the same workload
    pub fn verify(&self, workload: &Workload) -> bool {
        totals_match(
            self.total,
            workload.expected_total(self.workers),
            TOTAL_RELATIVE_TOLERANCE,
        )
    }
}

/// Runs trials one at a time with a fixed fan-out
///
/// A runner may be reused; every trial starts from fresh state. Concurrent
/// `run` calls on one runner are allowed but interleave `state()`.
pub struct TrialRunner {
    config: TrialConfig,
    state: Mutex<TrialState>,
    metrics: Option<Arc<MetricsCollector>>,
}

impl TrialRunner {
    pub fn new(config: TrialConfig) -> Self {
        Self {
            config,
            state: Mutex::new(TrialState::Idle),
            metrics: None,
        }
    }

    /// Record every finished trial into `metrics`
    pub fn with_metrics(mut self, metrics: Arc<MetricsCollector>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    #[inline]
    pub fn config(&self) -> &TrialConfig {
        &self.config
    }

    #[inline]
    pub fn state(&self) -> TrialState {
        *self.state.lock()
    }

    /// Run one trial with accumulator `A`
    pub fn run<A: Accumulator>(&self, workload: &Workload) -> TrialResult<TrialReport> {
        self.execute::<A>(workload, None)
    }

    /// Run one trial, recording phase boundaries into `phase_log`
    pub fn run_instrumented<A: Accumulator>(
        &self,
        workload: &Workload,
        phase_log: &PhaseLog,
    ) -> TrialResult<TrialReport> {
        self.execute::<A>(workload, Some(phase_log))
    }

    /// Run one trial with the accumulator selected by `strategy`
    pub fn run_strategy(&self, strategy: Strategy, workload: &Workload) -> TrialResult<TrialReport> {
        match strategy {
            Strategy::Mutex => self.run::<MutexAccumulator>(workload),
            Strategy::BarrierMutex => self.run::<BarrierMutexAccumulator>(workload),
            Strategy::Cas => self.run::<CasAccumulator>(workload),
        }
    }

    fn transition(&self, next: TrialState) {
        let mut state = self.state.lock();
        debug!(from = ?*state, to = ?next, "trial state transition");
        *state = next;
    }

    fn execute<A: Accumulator>(
        &self,
        workload: &Workload,
        phase_log: Option<&PhaseLog>,
    ) -> TrialResult<TrialReport> {
        let workers = self.config.worker_count;
        if workers == 0 || workers > MAX_WORKER_COUNT {
            return Err(TrialError::InvalidWorkerCount {
                requested: workers,
                max: MAX_WORKER_COUNT,
            });
        }

        self.transition(TrialState::Idle);
        self.transition(TrialState::Spawning);

        // Signal and barrier are both sized from `workers`
        let accumulator = A::for_trial(workers, &self.config);
        let completion = CompletionSignal::new(workers);
        let strategy = accumulator.strategy();
        let span = span_trial(strategy, workers);
        let stack_size = self.config.stack_size;
        let start = Instant::now();

        let outcome = thread::scope(|scope| {
            let mut handles = Vec::with_capacity(workers);
            let mut spawn_error = None;

            for id in 0..workers {
                let accumulator = &accumulator;
                let completion = &completion;
                let worker_span = span.span().clone();

                let spawned = thread::Builder::new()
                    .name(format!("{}-worker-{}", strategy, id))
                    .stack_size(stack_size)
                    .spawn_scoped(scope, move || {
                        let _entered = worker_span.enter();
                        run_worker(id, workers, workload, accumulator, completion, phase_log);
                    });

                match spawned {
                    Ok(handle) => handles.push(handle),
                    Err(e) => {
                        error!(worker = id, error = %e, "failed to spawn worker");
                        accumulator.abandon();
                        for _ in id..workers {
                            completion.count_down();
                        }
                        spawn_error = Some(TrialError::SpawnFailed {
                            worker: id,
                            reason: e.to_string(),
                        });
                        break;
                    }
                }
            }

            self.transition(TrialState::WaitingForCompletion);
            completion.wait();

            let mut panicked = None;
            for (id, handle) in handles.into_iter().enumerate() {
                if handle.join().is_err() && panicked.is_none() {
                    error!(worker = id, "worker panicked");
                    panicked = Some(id);
                }
            }

            match (spawn_error, panicked) {
                (Some(err), _) => Err(err),
                (None, Some(worker)) => Err(TrialError::WorkerPanicked { worker }),
                (None, None) => Ok(()),
            }
        });

        let elapsed = start.elapsed();
        self.transition(TrialState::Done);

        if let Err(err) = outcome {
            span.record_error(&err.to_string());
            if let Some(metrics) = &self.metrics {
                metrics.record_failure(strategy);
            }
            return Err(err);
        }

        let total = accumulator.total();
        let cas_retries = accumulator.retries();
        span.record_total(total, cas_retries);
        if let Some(metrics) = &self.metrics {
            metrics.record_trial(strategy, elapsed, cas_retries);
        }

        Ok(TrialReport {
            trace_id: span.trace_id().to_string(),
            strategy,
            workers,
            total,
            elapsed_us: elapsed.as_micros() as u64,
            cas_retries,
            workload: workload.shape(),
        })
    }
}

impl Default for TrialRunner {
    fn default() -> Self {
        Self::new(TrialConfig::default())
    }
}

/// Run one trial of `strategy` with `worker_count` workers and return the total
///
/// This is the operation an external timing harness calls repeatedly.
pub fn run_trial(strategy: Strategy, worker_count: usize, workload: &Workload) -> TrialResult<f64> {
    TrialRunner::new(TrialConfig::with_workers(worker_count))
        .run_strategy(strategy, workload)
        .map(|report| report.total)
}
