/*!
 * Accumulator Tests
 * Totals, isolation and lost-update checks across all three strategies
 */

use contention_bench::core::limits::TOTAL_RELATIVE_TOLERANCE;
use contention_bench::core::types::totals_match;
use contention_bench::{
    run_trial, Backoff, BarrierMutexAccumulator, CasAccumulator, MutexAccumulator, RandomSource,
    Strategy, TrialConfig, TrialRunner, Workload,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn test_four_workers_constant() {
    let workload = Workload::constant(42.0);
    for strategy in Strategy::ALL {
        let total = run_trial(strategy, 4, &workload).unwrap();
        assert_eq!(total, 168.0, "strategy {}", strategy);
    }
}

#[test]
fn test_256_workers_constant_reproducible() {
    let workload = Workload::constant(42.0);
    for strategy in Strategy::ALL {
        for _ in 0..5 {
            let total = run_trial(strategy, 256, &workload).unwrap();
            assert_eq!(total, 10752.0, "strategy {}", strategy);
        }
    }
}

#[test]
fn test_single_worker() {
    let workload = Workload::constant(-3.5);
    for strategy in Strategy::ALL {
        assert_eq!(run_trial(strategy, 1, &workload).unwrap(), -3.5);
    }
}

#[test]
fn test_back_to_back_trials_are_isolated() {
    let workload = Workload::constant(1.0);
    let runner = TrialRunner::new(TrialConfig::with_workers(32));

    for strategy in Strategy::ALL {
        let first = runner.run_strategy(strategy, &workload).unwrap();
        let second = runner.run_strategy(strategy, &workload).unwrap();

        // Each trial starts from zero, so nothing carries over
        assert_eq!(first.total, 32.0);
        assert_eq!(second.total, 32.0);
        assert_ne!(first.trace_id, second.trace_id);
    }
}

#[test]
fn test_random_shared_workload() {
    let mut source = RandomSource::with_seed(-9999.0, 9999.0, 2024).unwrap();
    let workload = Workload::random(10_000, &mut source);
    let expected = workload.expected_total(4);

    for strategy in Strategy::ALL {
        let total = run_trial(strategy, 4, &workload).unwrap();
        assert!(
            totals_match(total, expected, TOTAL_RELATIVE_TOLERANCE),
            "{}: {} != {}",
            strategy,
            total,
            expected
        );
    }
}

#[test]
fn test_random_partitioned_workload() {
    let mut source = RandomSource::with_seed(-1.0, 1.0, 5).unwrap();
    let workload = Workload::random_partitioned(1_001, &mut source);
    let expected = workload.expected_total(16);

    for strategy in Strategy::ALL {
        let report = TrialRunner::new(TrialConfig::with_workers(16))
            .run_strategy(strategy, &workload)
            .unwrap();
        assert!(report.verify(&workload));
        assert!(totals_match(report.total, expected, TOTAL_RELATIVE_TOLERANCE));
    }
}

#[test]
fn test_no_lost_updates_under_contention() {
    // Integer-valued partials sum exactly, so any lost update is visible
    let workload = Workload::constant(1.0);
    let runner = TrialRunner::new(TrialConfig::with_workers(128));

    for _ in 0..20 {
        assert_eq!(runner.run::<MutexAccumulator>(&workload).unwrap().total, 128.0);
        assert_eq!(
            runner.run::<BarrierMutexAccumulator>(&workload).unwrap().total,
            128.0
        );
        assert_eq!(runner.run::<CasAccumulator>(&workload).unwrap().total, 128.0);
    }
}

#[test]
fn test_cas_with_spin_backoff() {
    let runner =
        TrialRunner::new(TrialConfig::high_contention().backoff(Backoff::Spin { max_spins: 64 }));
    let report = runner.run::<CasAccumulator>(&Workload::constant(42.0)).unwrap();
    assert_eq!(report.total, 10752.0);
    assert_eq!(report.strategy, Strategy::Cas);
}

#[test]
fn test_mutex_variants_report_no_retries() {
    let runner = TrialRunner::new(TrialConfig::with_workers(64));
    let workload = Workload::constant(2.0);

    assert_eq!(runner.run::<MutexAccumulator>(&workload).unwrap().cas_retries, 0);
    assert_eq!(
        runner.run::<BarrierMutexAccumulator>(&workload).unwrap().cas_retries,
        0
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_total_is_sum_of_partials(workers in 1usize..24, partial in -1.0e6f64..1.0e6) {
        let workload = Workload::constant(partial);
        let expected = workload.expected_total(workers);

        for strategy in Strategy::ALL {
            let total = run_trial(strategy, workers, &workload).unwrap();
            prop_assert!(
                totals_match(total, expected, TOTAL_RELATIVE_TOLERANCE),
                "{}: {} != {}", strategy, total, expected
            );
        }
    }
}
