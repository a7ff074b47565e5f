/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use super::types::WorkerId;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Trial-related errors with serialization support
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum TrialError {
    #[error("Invalid worker count {requested} (expected 1..={max})")]
    #[diagnostic(
        code(trial::invalid_worker_count),
        help("A trial needs at least one worker. Completion signal and barrier are sized from this count.")
    )]
    InvalidWorkerCount { requested: usize, max: usize },

    #[error("Failed to spawn worker {worker}: {reason}")]
    #[diagnostic(
        code(trial::spawn_failed),
        help("The OS refused a new thread. Lower the worker count or the stack size.")
    )]
    SpawnFailed { worker: WorkerId, reason: String },

    #[error("Worker {worker} panicked before contributing its partial sum")]
    #[diagnostic(
        code(trial::worker_panicked),
        help("The reported total is incomplete. Check worker logs for the panic message.")
    )]
    WorkerPanicked { worker: WorkerId },
}

/// Random input source errors
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum SourceError {
    #[error("Invalid range [{min}, {max})")]
    #[diagnostic(
        code(source::invalid_range),
        help("Bounds must be finite and min must be strictly less than max.")
    )]
    InvalidRange { min: f64, max: f64 },
}

/// Driver configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {var}: {reason}")]
    #[diagnostic(
        code(config::invalid_value),
        help("Unset the variable to use its default, or fix its value.")
    )]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("{var} selects no strategy")]
    #[diagnostic(
        code(config::no_strategies),
        help("Use a comma separated list of mutex, barrier_mutex, cas.")
    )]
    NoStrategies { var: &'static str },
}
