//! # Configuration
//!
//! Environment-first configuration for both the orchestrator and the
//! worker, following this codebase's convention of a `Default` impl plus an
//! environment-overlay loader. Invalid values fail fast at startup rather
//! than silently falling back (§4.9).
//!
//! ## Example
//!
//! ```text
//! TIME_ADDITION_MS=500
//! POWER=4
//! REDIS_URL=redis://localhost:6379
//! ```

use std::env;

use serde::{Deserialize, Serialize};

use crate::dispatch::OperationTimings;

/// Orchestrator-side configuration (§6 env table).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    pub bind_addr: String,
    pub timings: TimingsConfig,
    pub redis_url: Option<String>,
}

/// Serializable mirror of [`OperationTimings`] (kept separate so the core
/// dispatch type has no serde dependency of its own).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TimingsConfig {
    pub addition_ms: u64,
    pub subtraction_ms: u64,
    pub multiplication_ms: u64,
    pub division_ms: u64,
}

impl From<TimingsConfig> for OperationTimings {
    fn from(t: TimingsConfig) -> Self {
        OperationTimings {
            addition_ms: t.addition_ms,
            subtraction_ms: t.subtraction_ms,
            multiplication_ms: t.multiplication_ms,
            division_ms: t.division_ms,
        }
    }
}

impl Default for TimingsConfig {
    fn default() -> Self {
        let defaults = OperationTimings::default();
        Self {
            addition_ms: defaults.addition_ms,
            subtraction_ms: defaults.subtraction_ms,
            multiplication_ms: defaults.multiplication_ms,
            division_ms: defaults.division_ms,
        }
    }
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:9090".to_string(),
            timings: TimingsConfig::default(),
            redis_url: None,
        }
    }
}

fn env_u64(key: &str, default: u64) -> Result<u64, String> {
    match env::var(key) {
        Ok(raw) => raw
            .parse::<u64>()
            .map_err(|e| format!("{key} must be a non-negative integer: {e}")),
        Err(_) => Ok(default),
    }
}

impl OrchestratorConfig {
    /// Load from environment, falling back to documented defaults.
    /// `.env` is loaded once via `dotenvy::dotenv()` before this is called.
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();
        Ok(Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            timings: TimingsConfig {
                addition_ms: env_u64("TIME_ADDITION_MS", defaults.timings.addition_ms)?,
                subtraction_ms: env_u64("TIME_SUBTRACTION_MS", defaults.timings.subtraction_ms)?,
                multiplication_ms: env_u64(
                    "TIME_MULTIPLICATIONS_MS",
                    defaults.timings.multiplication_ms,
                )?,
                division_ms: env_u64("TIME_DIVISIONS_MS", defaults.timings.division_ms)?,
            },
            redis_url: env::var("REDIS_URL").ok(),
        })
    }
}

/// Worker-side configuration (§6 env table).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    pub api_url: String,
    pub power: u32,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:9090/internal/task".to_string(),
            power: 1,
        }
    }
}

impl WorkerConfig {
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();
        let power = match env::var("POWER") {
            Ok(raw) => raw
                .parse::<u32>()
                .map_err(|e| format!("POWER must be a positive integer: {e}"))?,
            Err(_) => defaults.power,
        };
        if power == 0 {
            return Err("POWER must be at least 1".to_string());
        }
        Ok(Self {
            api_url: env::var("API_URL").unwrap_or(defaults.api_url),
            power,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // std::env is process-global; serialize the tests that mutate it so
    // they don't stomp on each other when the test binary runs threaded.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn orchestrator_config_default_values() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.bind_addr, "0.0.0.0:9090");
        assert_eq!(config.timings.addition_ms, 1000);
        assert!(config.redis_url.is_none());
    }

    #[test]
    fn worker_config_default_values() {
        let config = WorkerConfig::default();
        assert_eq!(config.api_url, "http://localhost:9090/internal/task");
        assert_eq!(config.power, 1);
    }

    #[test]
    fn orchestrator_config_reads_env_overrides() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::set_var("TIME_ADDITION_MS", "250");
        std::env::set_var("BIND_ADDR", "127.0.0.1:8080");
        let config = OrchestratorConfig::from_env().unwrap();
        assert_eq!(config.timings.addition_ms, 250);
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        std::env::remove_var("TIME_ADDITION_MS");
        std::env::remove_var("BIND_ADDR");
    }

    #[test]
    fn orchestrator_config_rejects_non_numeric_timing() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::set_var("TIME_ADDITION_MS", "not-a-number");
        let result = OrchestratorConfig::from_env();
        assert!(result.is_err());
        std::env::remove_var("TIME_ADDITION_MS");
    }

    #[test]
    fn worker_config_rejects_zero_power() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::set_var("POWER", "0");
        let result = WorkerConfig::from_env();
        assert!(result.is_err());
        std::env::remove_var("POWER");
    }
}
