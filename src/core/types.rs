/*!
 * Core Types
 * Common types used across the harness
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Worker index within a trial, `0..worker_count`
pub type WorkerId = usize;

/// Result type for trial operations
pub type TrialResult<T> = Result<T, super::errors::TrialError>;

/// Accumulation strategy selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Lock, add, unlock
    Mutex,
    /// Rendezvous at a barrier, then lock, add, unlock
    BarrierMutex,
    /// Lock-free compare-and-swap retry loop
    Cas,
}

impl Strategy {
    /// Every strategy, in benchmark order
    pub const ALL: [Strategy; 3] = [Strategy::Mutex, Strategy::BarrierMutex, Strategy::Cas];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Strategy::Mutex => "mutex",
            Strategy::BarrierMutex => "barrier_mutex",
            Strategy::Cas => "cas",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mutex" => Ok(Strategy::Mutex),
            "barrier_mutex" | "barrier-mutex" | "barrier" => Ok(Strategy::BarrierMutex),
            "cas" => Ok(Strategy::Cas),
            other => Err(format!("unknown strategy '{}'", other)),
        }
    }
}

/// Compare two totals with a relative tolerance
///
/// Summation order across workers is unspecified, so exact equality only
/// holds for inputs whose partial sums are exactly representable.
#[inline]
pub fn totals_match(actual: f64, expected: f64, relative_tolerance: f64) -> bool {
    if actual == expected {
        return true;
    }
    let scale = actual.abs().max(expected.abs()).max(1.0);
    (actual - expected).abs() <= relative_tolerance * scale
}
