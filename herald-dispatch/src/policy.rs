//! Retry policy shared by the dispatch and status-report ladders.
//!
//! Both ladders use the same shape: up to `retry_count` extra attempts, with
//! a passive wait of `retry_backoff ^ attempt` seconds before attempt
//! `attempt` (1-based). They are configured independently and never interact.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Bounded exponential backoff configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts after the initial one.
    ///
    /// Default: 3
    #[serde(default = "defaults::retry_count")]
    pub retry_count: u32,

    /// Base of the exponential backoff, in seconds.
    ///
    /// Default: 3
    #[serde(default = "defaults::retry_backoff")]
    pub retry_backoff: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retry_count: defaults::retry_count(),
            retry_backoff: defaults::retry_backoff(),
        }
    }
}

impl RetryPolicy {
    /// Whether `attempt` (1-based) is past the retry ceiling.
    #[must_use]
    pub const fn exhausted(&self, attempt: u32) -> bool {
        attempt > self.retry_count
    }

    /// Passive wait before the given retry attempt (1-based).
    #[must_use]
    pub const fn delay(&self, attempt: u32) -> Duration {
        Duration::from_secs(self.retry_backoff.saturating_pow(attempt))
    }
}

mod defaults {
    pub const fn retry_count() -> u32 {
        3
    }

    pub const fn retry_backoff() -> u64 {
        3
    }
}
