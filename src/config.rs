/*!
 * Driver Configuration
 *
 * Environment-driven settings for the benchmark binary
 */

use crate::core::errors::ConfigError;
use crate::core::limits::{DEFAULT_PARTIAL_SUM, DEFAULT_TRIAL_COUNT, DEFAULT_WORKER_COUNT};
use crate::core::types::Strategy;
use serde::Serialize;
use std::str::FromStr;

const ENV_WORKERS: &str = "BENCH_WORKERS";
const ENV_INPUT_LEN: &str = "BENCH_INPUT_LEN";
const ENV_CONSTANT: &str = "BENCH_CONSTANT";
const ENV_TRIALS: &str = "BENCH_TRIALS";
const ENV_SEED: &str = "BENCH_SEED";
const ENV_STRATEGIES: &str = "BENCH_STRATEGIES";

/// Benchmark driver configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchConfig {
    pub workers: usize,
    /// Random input length per worker; 0 selects the constant workload
    pub input_len: usize,
    pub constant: f64,
    pub trials: usize,
    pub seed: Option<u64>,
    pub strategies: Vec<Strategy>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKER_COUNT,
            input_len: 0,
            constant: DEFAULT_PARTIAL_SUM,
            trials: DEFAULT_TRIAL_COUNT,
            seed: None,
            strategies: Strategy::ALL.to_vec(),
        }
    }
}

impl BenchConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let strategies = match lookup(ENV_STRATEGIES) {
            Some(raw) => parse_strategies(&raw)?,
            None => defaults.strategies,
        };

        Ok(Self {
            workers: parse_var(&lookup, ENV_WORKERS)?.unwrap_or(defaults.workers),
            input_len: parse_var(&lookup, ENV_INPUT_LEN)?.unwrap_or(defaults.input_len),
            constant: parse_var(&lookup, ENV_CONSTANT)?.unwrap_or(defaults.constant),
            trials: parse_var(&lookup, ENV_TRIALS)?.unwrap_or(defaults.trials),
            seed: parse_var(&lookup, ENV_SEED)?,
            strategies,
        })
    }
}

fn parse_var<T, F>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidValue {
                var,
                value: raw.clone(),
                reason: e.to_string(),
            }),
    }
}

fn parse_strategies(raw: &str) -> Result<Vec<Strategy>, ConfigError> {
    let mut strategies = Vec::new();
    for part in raw.split(',').filter(|p| !p.trim().is_empty()) {
        let strategy = part
            .parse::<Strategy>()
            .map_err(|reason| ConfigError::InvalidValue {
                var: ENV_STRATEGIES,
                value: raw.to_string(),
                reason,
            })?;
        if !strategies.contains(&strategy) {
            strategies.push(strategy);
        }
    }

    if strategies.is_empty() {
        return Err(ConfigError::NoStrategies {
            var: ENV_STRATEGIES,
        });
    }
    Ok(strategies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = BenchConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, BenchConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = BenchConfig::from_lookup(lookup_from(&[
            ("BENCH_WORKERS", "256"),
            ("BENCH_INPUT_LEN", "1000"),
            ("BENCH_TRIALS", " 3 "),
            ("BENCH_SEED", "17"),
            ("BENCH_STRATEGIES", "cas, mutex,cas"),
        ]))
        .unwrap();

        assert_eq!(config.workers, 256);
        assert_eq!(config.input_len, 1000);
        assert_eq!(config.trials, 3);
        assert_eq!(config.seed, Some(17));
        assert_eq!(config.strategies, vec![Strategy::Cas, Strategy::Mutex]);
    }

    #[test]
    fn test_invalid_number() {
        let err = BenchConfig::from_lookup(lookup_from(&[("BENCH_WORKERS", "many")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                var: "BENCH_WORKERS",
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_strategy_lists() {
        assert!(matches!(
            BenchConfig::from_lookup(lookup_from(&[("BENCH_STRATEGIES", "cas,ticket")])),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            BenchConfig::from_lookup(lookup_from(&[("BENCH_STRATEGIES", " , ")])),
            Err(ConfigError::NoStrategies { .. })
        ));
    }
}
