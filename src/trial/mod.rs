/*!
 * Trials
 * Orchestration of one measurement trial and its instrumentation
 */

mod config;
pub mod phase;
mod runner;
mod worker;

pub use config::TrialConfig;
pub use phase::{Phase, PhaseEvent, PhaseLog};
pub use runner::{run_trial, TrialReport, TrialRunner, TrialState};
pub use worker::WorkerContext;
