/*!
 * Contention Bench - Main Entry Point
 *
 * Runs repeated trials per strategy with the configured fan-out:
 * - Configuration from BENCH_* environment variables
 * - Per-trial results through structured tracing
 * - Aggregated metrics printed as JSON on exit
 */

use contention_bench::core::limits::{RANDOM_RANGE_MAX, RANDOM_RANGE_MIN, TOTAL_RELATIVE_TOLERANCE};
use contention_bench::core::types::totals_match;
use contention_bench::{
    init_tracing, BenchConfig, MetricsCollector, RandomSource, TrialConfig, TrialRunner, Workload,
};
use miette::IntoDiagnostic;
use std::sync::Arc;
use tracing::{info, warn};

fn main() -> miette::Result<()> {
    init_tracing();

    info!("Contention bench starting...");
    let config = BenchConfig::from_env()?;
    info!(
        workers = config.workers,
        input_len = config.input_len,
        trials = config.trials,
        strategies = ?config.strategies,
        "Configuration loaded"
    );

    let workload = if config.input_len == 0 {
        Workload::constant(config.constant)
    } else {
        let mut source = match config.seed {
            Some(seed) => RandomSource::with_seed(RANDOM_RANGE_MIN, RANDOM_RANGE_MAX, seed)?,
            None => RandomSource::default_range(),
        };
        Workload::random(config.input_len, &mut source)
    };
    let expected = workload.expected_total(config.workers);

    let metrics = Arc::new(MetricsCollector::new());
    let runner =
        TrialRunner::new(TrialConfig::with_workers(config.workers)).with_metrics(metrics.clone());

    for &strategy in &config.strategies {
        for trial in 0..config.trials {
            let report = runner.run_strategy(strategy, &workload)?;

            if !totals_match(report.total, expected, TOTAL_RELATIVE_TOLERANCE) {
                warn!(
                    strategy = %strategy,
                    trial,
                    total = report.total,
                    expected,
                    "total differs from sequential sum"
                );
            }

            info!(
                strategy = %strategy,
                trial,
                total = report.total,
                elapsed_us = report.elapsed_us,
                cas_retries = report.cas_retries,
                "Trial finished"
            );
        }
    }

    let snapshot = metrics.snapshot();
    println!("{}", serde_json::to_string_pretty(&snapshot).into_diagnostic()?);

    info!("Contention bench complete");
    Ok(())
}
