/*!
 * Trial Runner Tests
 * State machine, phase separation and metrics integration
 */

use contention_bench::trial::Phase;
use contention_bench::{
    Accumulator, BarrierMutexAccumulator, CasAccumulator, MetricsCollector, MutexAccumulator,
    PhaseLog, RandomSource, Strategy, TrialConfig, TrialError, TrialRunner, TrialState,
    WorkerContext, Workload,
};
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[test]
fn test_runner_reaches_done_for_every_strategy() {
    let runner = TrialRunner::new(TrialConfig::with_workers(8));
    assert_eq!(runner.state(), TrialState::Idle);

    for strategy in Strategy::ALL {
        let report = runner
            .run_strategy(strategy, &Workload::constant(0.5))
            .unwrap();
        assert_eq!(runner.state(), TrialState::Done);
        assert_eq!(report.total, 4.0);
        assert_eq!(report.workers, 8);
    }
}

#[test]
fn test_barrier_separates_compute_and_accumulate() {
    // Uneven chunk sizes give workers different compute times
    let mut source = RandomSource::with_seed(-1.0, 1.0, 11).unwrap();
    let workload = Workload::random_partitioned(200_003, &mut source);
    let runner = TrialRunner::new(TrialConfig::with_workers(32));

    for _ in 0..10 {
        let log = PhaseLog::with_capacity(32);
        runner
            .run_instrumented::<BarrierMutexAccumulator>(&workload, &log)
            .unwrap();

        assert_eq!(log.count(Phase::ComputeDone), 32);
        assert_eq!(log.count(Phase::AccumulateEnter), 32);
        assert!(
            log.compute_precedes_accumulate(),
            "a worker accumulated before the last compute phase finished"
        );
    }
}

#[test]
fn test_every_worker_records_both_phases() {
    let runner = TrialRunner::new(TrialConfig::with_workers(16));

    let log = PhaseLog::new();
    runner
        .run_instrumented::<MutexAccumulator>(&Workload::constant(1.0), &log)
        .unwrap();
    let log_cas = PhaseLog::new();
    runner
        .run_instrumented::<CasAccumulator>(&Workload::constant(1.0), &log_cas)
        .unwrap();

    for log in [&log, &log_cas] {
        let mut workers: Vec<usize> = log
            .events()
            .iter()
            .filter(|e| e.phase == Phase::AccumulateEnter)
            .map(|e| e.worker)
            .collect();
        workers.sort_unstable();
        assert_eq!(workers, (0..16).collect::<Vec<_>>());
    }
}

#[test]
fn test_each_worker_accumulates_after_its_own_compute() {
    let runner = TrialRunner::new(TrialConfig::with_workers(8));
    let log = PhaseLog::new();
    runner
        .run_instrumented::<CasAccumulator>(&Workload::constant(3.0), &log)
        .unwrap();

    let events = log.events();
    for worker in 0..8 {
        let compute = events
            .iter()
            .find(|e| e.worker == worker && e.phase == Phase::ComputeDone)
            .unwrap();
        let accumulate = events
            .iter()
            .find(|e| e.worker == worker && e.phase == Phase::AccumulateEnter)
            .unwrap();
        assert!(compute.ticket < accumulate.ticket);
        assert!(log.offset(compute) <= log.offset(accumulate));
    }
}

#[test]
fn test_invalid_worker_count() {
    let runner = TrialRunner::new(TrialConfig::with_workers(0));
    let err = runner
        .run_strategy(Strategy::BarrierMutex, &Workload::constant(1.0))
        .unwrap_err();
    assert!(matches!(err, TrialError::InvalidWorkerCount { requested: 0, .. }));
}

#[test]
fn test_metrics_collected_per_strategy() {
    let metrics = Arc::new(MetricsCollector::new());
    let runner = TrialRunner::new(TrialConfig::with_workers(4)).with_metrics(metrics.clone());

    for strategy in Strategy::ALL {
        for _ in 0..3 {
            runner
                .run_strategy(strategy, &Workload::constant(1.0))
                .unwrap();
        }
    }

    let snapshot = metrics.snapshot();
    for strategy in Strategy::ALL {
        let key = format!("trials.{}", strategy);
        assert_eq!(snapshot.counters.get(&key), Some(&3.0));
        assert_eq!(
            snapshot.histograms[&format!("trial_duration_us.{}", strategy)].count,
            3
        );
    }
}

/// Delays its add so the coordinator is observably waiting
struct SlowAccumulator {
    inner: MutexAccumulator,
    calls: AtomicUsize,
}

impl Accumulator for SlowAccumulator {
    fn for_trial(workers: usize, config: &TrialConfig) -> Self {
        Self {
            inner: MutexAccumulator::for_trial(workers, config),
            calls: AtomicUsize::new(0),
        }
    }

    fn add_partial(&self, partial: f64, worker: &WorkerContext<'_>) {
        thread::sleep(Duration::from_millis(100));
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.inner.add_partial(partial, worker);
    }

    fn total(&self) -> f64 {
        self.inner.total()
    }

    fn strategy(&self) -> Strategy {
        Strategy::Mutex
    }
}

#[test]
fn test_coordinator_waits_for_completion() {
    let runner = Arc::new(TrialRunner::new(TrialConfig::with_workers(2)));
    let runner_clone = runner.clone();

    let handle =
        thread::spawn(move || runner_clone.run::<SlowAccumulator>(&Workload::constant(5.0)));

    thread::sleep(Duration::from_millis(40));
    assert_eq!(runner.state(), TrialState::WaitingForCompletion);

    let report = handle.join().unwrap().unwrap();
    assert_eq!(report.total, 10.0);
    assert_eq!(runner.state(), TrialState::Done);
}

/// CAS accumulator that also reports one extra retry per worker
struct RetryingCas {
    inner: CasAccumulator,
    extra: std::sync::atomic::AtomicU64,
}

impl Accumulator for RetryingCas {
    fn for_trial(workers: usize, config: &TrialConfig) -> Self {
        Self {
            inner: CasAccumulator::for_trial(workers, config),
            extra: std::sync::atomic::AtomicU64::new(0),
        }
    }

    fn add_partial(&self, partial: f64, worker: &WorkerContext<'_>) {
        self.extra.fetch_add(1, Ordering::Relaxed);
        self.inner.add_partial(partial, worker);
    }

    fn total(&self) -> f64 {
        self.inner.total()
    }

    fn strategy(&self) -> Strategy {
        Strategy::Cas
    }

    fn retries(&self) -> u64 {
        self.inner.retries() + self.extra.load(Ordering::Relaxed)
    }
}

#[test]
fn test_cas_retries_reach_report_and_metrics() {
    let metrics = Arc::new(MetricsCollector::new());
    let runner = TrialRunner::new(TrialConfig::with_workers(8)).with_metrics(metrics.clone());

    let report = runner.run::<RetryingCas>(&Workload::constant(1.0)).unwrap();
    assert!(report.cas_retries >= 8);
    assert_eq!(
        metrics.snapshot().counters.get("cas.retries"),
        Some(&(report.cas_retries as f64))
    );
}

#[test]
fn test_contended_cas_retries_match_metrics() {
    let metrics = Arc::new(MetricsCollector::new());
    let runner =
        TrialRunner::new(TrialConfig::high_contention()).with_metrics(metrics.clone());
    let mut source = RandomSource::with_seed(-1.0, 1.0, 5).unwrap();
    let workload = Workload::random_partitioned(4096, &mut source);

    let mut reported = 0u64;
    for _ in 0..20 {
        let report = runner.run::<CasAccumulator>(&workload).unwrap();
        assert_eq!(report.strategy, Strategy::Cas);
        reported += report.cas_retries;
    }

    assert_eq!(
        metrics.snapshot().counters.get("cas.retries").copied(),
        Some(reported as f64)
    );
}
