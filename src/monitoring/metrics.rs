/*!
 * Metrics Collection
 * Lightweight per-strategy trial metrics
 */

use crate::core::limits::TRIAL_DURATION_BUCKETS_US;
use crate::core::types::Strategy;
use ahash::RandomState;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Bucketed histogram with cumulative counts
#[derive(Debug, Clone)]
struct Histogram {
    buckets: Vec<f64>,
    counts: Vec<u64>,
    sum: f64,
    count: u64,
    max: f64,
}

impl Histogram {
    fn new(buckets: Vec<f64>) -> Self {
        let counts = vec![0; buckets.len()];
        Self {
            buckets,
            counts,
            sum: 0.0,
            count: 0,
            max: 0.0,
        }
    }

    fn observe(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
        self.max = self.max.max(value);

        for (i, &bucket) in self.buckets.iter().enumerate() {
            if value <= bucket {
                self.counts[i] += 1;
            }
        }
    }

    fn percentile(&self, p: f64) -> f64 {
        if self.count == 0 {
            return 0.0;
        }

        let target = (self.count as f64 * p).ceil() as u64;
        for (i, &count) in self.counts.iter().enumerate() {
            if count >= target {
                return self.buckets[i];
            }
        }
        // Past the last bucket
        self.max
    }

    fn stats(&self) -> HistogramStats {
        HistogramStats {
            count: self.count,
            sum: self.sum,
            avg: if self.count > 0 {
                self.sum / self.count as f64
            } else {
                0.0
            },
            p50: self.percentile(0.50),
            p95: self.percentile(0.95),
            p99: self.percentile(0.99),
            max: self.max,
        }
    }
}

/// Metrics collector
///
/// # Performance
/// - Cache-line aligned; updated once per trial, never from workers
#[repr(C, align(64))]
pub struct MetricsCollector {
    counters: DashMap<String, f64, RandomState>,
    histograms: DashMap<String, Histogram, RandomState>,
    start_time: Instant,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            counters: DashMap::with_hasher(RandomState::new()),
            histograms: DashMap::with_hasher(RandomState::new()),
            start_time: Instant::now(),
        }
    }

    /// Increment a counter
    pub fn inc_counter(&self, name: &str, value: f64) {
        self.counters
            .entry(name.to_string())
            .and_modify(|v| *v += value)
            .or_insert(value);
    }

    /// Observe a value in a histogram using the trial duration buckets
    pub fn observe_histogram(&self, name: &str, value: f64) {
        self.histograms
            .entry(name.to_string())
            .and_modify(|hist| hist.observe(value))
            .or_insert_with(|| {
                let mut hist = Histogram::new(TRIAL_DURATION_BUCKETS_US.to_vec());
                hist.observe(value);
                hist
            });
    }

    /// Record one finished trial
    pub fn record_trial(&self, strategy: Strategy, elapsed: Duration, cas_retries: u64) {
        self.inc_counter(&format!("trials.{}", strategy), 1.0);
        self.observe_histogram(
            &format!("trial_duration_us.{}", strategy),
            elapsed.as_secs_f64() * 1_000_000.0,
        );
        if strategy == Strategy::Cas {
            self.inc_counter("cas.retries", cas_retries as f64);
        }
    }

    /// Record one failed trial
    pub fn record_failure(&self, strategy: Strategy) {
        self.inc_counter(&format!("failures.{}", strategy), 1.0);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        let counters: HashMap<String, f64> = self
            .counters
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect();

        let histograms: HashMap<String, HistogramStats> = self
            .histograms
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().stats()))
            .collect();

        MetricsSnapshot {
            counters,
            histograms,
            uptime_secs: self.start_time.elapsed().as_secs(),
        }
    }

    /// Reset all metrics
    pub fn reset(&self) {
        self.counters.clear();
        self.histograms.clear();
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Histogram statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct HistogramStats {
    pub count: u64,
    pub sum: f64,
    pub avg: f64,
    pub p50: f64,
    pub p95: f64,
    pub p99: f64,
    pub max: f64,
}

/// Snapshot of all metrics at a point in time
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MetricsSnapshot {
    #[serde(skip_serializing_if = "HashMap::is_empty", default)]
    pub counters: HashMap<String, f64>,
    #[serde(skip_serializing_if = "HashMap::is_empty", default)]
    pub histograms: HashMap<String, HistogramStats>,
    pub uptime_secs: u64,
}
