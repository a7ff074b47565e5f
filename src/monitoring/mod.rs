/*!
 * Performance Monitoring
 * Trial metrics and structured tracing
 */

mod metrics;
mod tracer;

pub use metrics::{HistogramStats, MetricsCollector, MetricsSnapshot};
pub use tracer::{generate_trace_id, init_tracing, span_trial, TrialSpan};
