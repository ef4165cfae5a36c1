//! Cross-service coordination settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How the booking side reaches the sessions side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinationConfig {
    /// Base URL of the sessions service. Required when the role is `bookings`.
    #[serde(default)]
    pub sessions_base_url: Option<String>,
    /// Per-attempt timeout for internal RPC calls, in milliseconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
    /// Attempts per idempotent downstream call (including the first).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Initial backoff between attempts, in milliseconds.
    #[serde(default = "default_retry_base_delay")]
    pub retry_base_delay_ms: u64,
    /// Backoff ceiling, in milliseconds.
    #[serde(default = "default_retry_max_delay")]
    pub retry_max_delay_ms: u64,
    /// Whether the periodic reconciliation sweep runs.
    #[serde(default = "default_true")]
    pub reconcile_enabled: bool,
    /// Seconds between reconciliation sweeps.
    #[serde(default = "default_reconcile_interval")]
    pub reconcile_interval_seconds: u64,
}

impl CoordinationConfig {
    /// Per-attempt RPC timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Delay between reconciliation sweeps.
    pub fn reconcile_interval(&self) -> Duration {
        Duration::from_secs(self.reconcile_interval_seconds.max(1))
    }
}

impl Default for CoordinationConfig {
    fn default() -> Self {
        Self {
            sessions_base_url: None,
            request_timeout_ms: default_request_timeout(),
            max_attempts: default_max_attempts(),
            retry_base_delay_ms: default_retry_base_delay(),
            retry_max_delay_ms: default_retry_max_delay(),
            reconcile_enabled: true,
            reconcile_interval_seconds: default_reconcile_interval(),
        }
    }
}

fn default_request_timeout() -> u64 {
    3000
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_base_delay() -> u64 {
    100
}

fn default_retry_max_delay() -> u64 {
    1000
}

fn default_true() -> bool {
    true
}

fn default_reconcile_interval() -> u64 {
    60
}
