/*!
 * Contention Bench Library
 * Mutex, barrier + mutex, and compare-and-swap accumulation under a fixed
 * fan-out of concurrent workers
 */

pub mod accumulator;
pub mod config;
pub mod core;
pub mod monitoring;
pub mod trial;
pub mod workload;

// Re-exports
pub use accumulator::{
    Accumulator, Backoff, BarrierMutexAccumulator, CasAccumulator, MutexAccumulator,
};
pub use config::BenchConfig;
pub use crate::core::errors::{ConfigError, SourceError, TrialError};
pub use crate::core::types::{Strategy, TrialResult, WorkerId};
pub use monitoring::{init_tracing, MetricsCollector, MetricsSnapshot};
pub use trial::{
    run_trial, PhaseLog, TrialConfig, TrialReport, TrialRunner, TrialState, WorkerContext,
};
pub use workload::{RandomSource, Workload};
