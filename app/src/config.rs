//! Configuration management for the todo timer.
//!
//! Loads configuration from environment variables with sensible defaults.
//! A variable that is missing or does not parse falls back to its default.

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use todo_timer_runtime::StoreConfig;

/// Time between two timer ticks, in milliseconds
pub const TICK_MS_VAR: &str = "TODO_TIMER_TICK_MS";
/// How long shutdown waits for running effects, in milliseconds
pub const SHUTDOWN_TIMEOUT_MS_VAR: &str = "TODO_TIMER_SHUTDOWN_TIMEOUT_MS";
/// Capacity of the action broadcast channel
pub const BROADCAST_CAPACITY_VAR: &str = "TODO_TIMER_BROADCAST_CAPACITY";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Time between two timer ticks (default: one minute)
    pub tick_period: Duration,
    /// Graceful shutdown timeout (default: 5 seconds)
    pub shutdown_timeout: Duration,
    /// Action broadcast capacity (default: 64)
    pub broadcast_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_period: Duration::from_millis(60_000),
            shutdown_timeout: Duration::from_millis(5_000),
            broadcast_capacity: 64,
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            tick_period: lookup(TICK_MS_VAR)
                .and_then(|s| s.trim().parse().ok())
                .filter(|&ms: &u64| ms > 0)
                .map_or(defaults.tick_period, Duration::from_millis),
            shutdown_timeout: lookup(SHUTDOWN_TIMEOUT_MS_VAR)
                .and_then(|s| s.trim().parse().ok())
                .map_or(defaults.shutdown_timeout, Duration::from_millis),
            broadcast_capacity: lookup(BROADCAST_CAPACITY_VAR)
                .and_then(|s| s.trim().parse().ok())
                .filter(|&capacity: &usize| capacity > 0)
                .unwrap_or(defaults.broadcast_capacity),
        }
    }

    /// Runtime configuration for the store
    #[must_use]
    pub const fn store_config(&self) -> StoreConfig {
        StoreConfig::new(self.broadcast_capacity, self.shutdown_timeout)
    }
}
