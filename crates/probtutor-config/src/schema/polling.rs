//! Run polling configuration.

use serde::{Deserialize, Serialize};

/// What to do when a run asks the client to fulfil a tool call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RequiresActionPolicy {
    /// Keep polling as if the run were still in progress.
    #[default]
    Wait,
    /// Stop polling and fail the turn.
    FailFast,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// First sleep between status fetches, in milliseconds.
    pub interval_ms: u64,
    /// Client-side wait budget in seconds. The remote run is never cancelled.
    pub max_wait_secs: u64,
    /// Interval multiplier applied after every sleep (1.0 = fixed interval).
    pub backoff_factor: f64,
    /// Upper bound for the grown interval, in milliseconds.
    pub max_interval_ms: u64,
    pub requires_action: RequiresActionPolicy,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: 2000,
            max_wait_secs: 60,
            backoff_factor: 1.0,
            max_interval_ms: 10_000,
            requires_action: RequiresActionPolicy::Wait,
        }
    }
}
