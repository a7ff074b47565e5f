/*!
 * Harness Limits and Constants
 *
 * Centralized location for fan-out sizes, input ranges and thresholds.
 * Organized by domain for discoverability.
 */

use std::time::Duration;

// =============================================================================
// WORKER FAN-OUT
// =============================================================================

/// Low-contention fan-out, one worker per typical core cluster
pub const DEFAULT_WORKER_COUNT: usize = 4;

/// High-contention fan-out used to stress the accumulation phase
pub const HIGH_CONTENTION_WORKER_COUNT: usize = 256;

/// Upper bound on workers per trial
/// Each worker is a dedicated OS thread
pub const MAX_WORKER_COUNT: usize = 4096;

/// Stack size for worker threads (256KB)
/// Workers only sum a slice, so a small stack keeps 256-way trials cheap
pub const DEFAULT_WORKER_STACK_SIZE: usize = 256 * 1024;

// =============================================================================
// WORKLOAD
// =============================================================================

/// Fixed per-worker contribution for constant workloads
pub const DEFAULT_PARTIAL_SUM: f64 = 42.0;

/// Lower bound (inclusive) of generated input values
pub const RANDOM_RANGE_MIN: f64 = -9999.0;

/// Upper bound (exclusive) of generated input values
pub const RANDOM_RANGE_MAX: f64 = 9999.0;

/// Default trials per strategy for the driver binary
pub const DEFAULT_TRIAL_COUNT: usize = 10;

// =============================================================================
// OBSERVABILITY
// =============================================================================

/// Trials slower than this are logged at warn level
pub const SLOW_TRIAL_THRESHOLD: Duration = Duration::from_millis(100);

/// Histogram buckets for trial duration, in microseconds
pub const TRIAL_DURATION_BUCKETS_US: [f64; 12] = [
    10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1_000.0, 2_500.0, 5_000.0, 10_000.0, 50_000.0,
    100_000.0,
];

/// Relative tolerance when comparing a total against its expected sum
/// Addition order is unspecified, so float rounding may differ per trial
pub const TOTAL_RELATIVE_TOLERANCE: f64 = 1e-9;
