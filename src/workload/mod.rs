/*!
 * Workload
 *
 * What each worker sums during its compute phase. The accumulation
 * strategies never see the workload, only the resulting partial sum.
 */

mod random;

pub use random::RandomSource;

use crate::core::types::WorkerId;
use serde::Serialize;
use std::ops::Range;
use std::sync::Arc;

/// Per-worker input shape
#[derive(Debug, Clone)]
pub enum Workload {
    /// Every worker contributes the same fixed value
    Constant(f64),
    /// Every worker sums the whole array
    Shared(Arc<[f64]>),
    /// The array is split into one contiguous chunk per worker
    Partitioned(Arc<[f64]>),
}

/// Serializable summary of a workload, for reports
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WorkloadShape {
    Constant { value: f64 },
    Shared { len: usize },
    Partitioned { len: usize },
}

impl Workload {
    #[inline]
    pub fn constant(value: f64) -> Self {
        Workload::Constant(value)
    }

    /// Shared array of `len` values drawn from `source`
    pub fn random(len: usize, source: &mut RandomSource) -> Self {
        Workload::Shared(source.fill(len).into())
    }

    /// Partitioned array of `len` values drawn from `source`
    pub fn random_partitioned(len: usize, source: &mut RandomSource) -> Self {
        Workload::Partitioned(source.fill(len).into())
    }

    /// Compute phase of one worker
    pub fn partial_sum(&self, worker: WorkerId, workers: usize) -> f64 {
        match self {
            Workload::Constant(value) => *value,
            Workload::Shared(values) => values.iter().sum(),
            Workload::Partitioned(values) => {
                values[chunk_range(values.len(), worker, workers)].iter().sum()
            }
        }
    }

    /// Sum of every worker's partial sum, computed sequentially
    pub fn expected_total(&self, workers: usize) -> f64 {
        (0..workers)
            .map(|worker| self.partial_sum(worker, workers))
            .sum()
    }

    pub fn shape(&self) -> WorkloadShape {
        match self {
            Workload::Constant(value) => WorkloadShape::Constant { value: *value },
            Workload::Shared(values) => WorkloadShape::Shared { len: values.len() },
            Workload::Partitioned(values) => WorkloadShape::Partitioned { len: values.len() },
        }
    }
}

/// Contiguous chunk of `len` items owned by `worker`
///
/// The first `len % workers` workers take one extra item, so every item is
/// covered exactly once.
pub fn chunk_range(len: usize, worker: WorkerId, workers: usize) -> Range<usize> {
    if workers == 0 || worker >= workers {
        return 0..0;
    }

    let base = len / workers;
    let extra = len % workers;
    let start = worker * base + worker.min(extra);
    let end = start + base + usize::from(worker < extra);
    start..end
}
