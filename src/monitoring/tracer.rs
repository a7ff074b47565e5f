/*!
 * Structured Tracing
 * Trial spans and subscriber setup using the tracing crate
 *
 * Features:
 * - Trace ID per trial for log correlation
 * - JSON-formatted logs for structured parsing
 * - Duration and outcome recorded on the trial span
 */

use crate::core::limits::SLOW_TRIAL_THRESHOLD;
use crate::core::types::Strategy;
use std::time::Instant;
use tracing::{debug, info, span, warn, Level};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};
use uuid::Uuid;

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - BENCH_TRACE_JSON: Enable JSON output (default: false)
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var("BENCH_TRACE_JSON")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_names(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .init();
        info!("Structured tracing initialized with JSON output");
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_names(true)
                    .compact(),
            )
            .init();
        info!("Structured tracing initialized");
    }
}

/// Generate a unique trace ID for trial correlation
pub fn generate_trace_id() -> String {
    Uuid::new_v4().to_string()
}

/// Span covering one trial, from spawning to the returned total
pub struct TrialSpan {
    span: tracing::Span,
    start: Instant,
    strategy: Strategy,
    trace_id: String,
}

impl TrialSpan {
    pub fn new(strategy: Strategy, workers: usize) -> Self {
        let trace_id = generate_trace_id();

        let span = span!(
            Level::DEBUG,
            "trial",
            trace_id = %trace_id,
            strategy = strategy.as_str(),
            workers = workers,
            duration_us = tracing::field::Empty,
            total = tracing::field::Empty,
            cas_retries = tracing::field::Empty,
            result = tracing::field::Empty,
            error = tracing::field::Empty,
        );

        span.in_scope(|| debug!(strategy = strategy.as_str(), workers, "trial started"));

        Self {
            span,
            start: Instant::now(),
            strategy,
            trace_id,
        }
    }

    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    /// Record a successful outcome
    pub fn record_total(&self, total: f64, cas_retries: u64) {
        self.span.record("total", total);
        self.span.record("cas_retries", cas_retries);
        self.span.record("result", "success");
    }

    pub fn record_error(&self, error: &str) {
        self.span.record("error", error);
        self.span.record("result", "error");
    }

    /// Enter the span context
    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }

    /// Span handle for propagating into worker threads
    pub fn span(&self) -> &tracing::Span {
        &self.span
    }
}

impl Drop for TrialSpan {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        let _entered = self.span.enter();
        self.span.record("duration_us", duration.as_micros() as u64);

        if duration > SLOW_TRIAL_THRESHOLD {
            warn!(
                trace_id = %self.trace_id,
                strategy = self.strategy.as_str(),
                duration_ms = duration.as_millis() as u64,
                slow = true,
                "slow trial detected"
            );
        } else {
            debug!(
                trace_id = %self.trace_id,
                duration_us = duration.as_micros() as u64,
                "trial completed"
            );
        }
    }
}

/// Helper to create a trial span
#[inline]
pub fn span_trial(strategy: Strategy, workers: usize) -> TrialSpan {
    TrialSpan::new(strategy, workers)
}
