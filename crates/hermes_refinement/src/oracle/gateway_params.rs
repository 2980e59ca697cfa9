use jiff::SignedDuration;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PollingParams {
    pub poll_interval: SignedDuration,

    /// Time after which a job still processing counts as failed submission.
    pub max_wait: SignedDuration,

    /// Minimum spacing between any two consecutive oracle calls.
    pub min_call_spacing: SignedDuration,
}

impl Default for PollingParams {
    fn default() -> Self {
        Self {
            poll_interval: SignedDuration::from_secs(10),
            max_wait: SignedDuration::from_mins(10),
            min_call_spacing: SignedDuration::from_secs(1),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RetryParams {
    /// Attempts per oracle call, the first one included.
    pub max_attempts: u32,

    /// Doubled after every failed attempt.
    pub initial_backoff: SignedDuration,
}

impl Default for RetryParams {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: SignedDuration::from_secs(2),
        }
    }
}
