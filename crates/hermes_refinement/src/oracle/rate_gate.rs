use jiff::{SignedDuration, Timestamp};
use tracing::debug;

use super::clock::Clock;

/// Keeps consecutive calls at least `min_spacing` apart.
#[derive(Debug, Clone)]
pub struct RateGate {
    min_spacing: SignedDuration,
    last_call: Option<Timestamp>,
}

impl RateGate {
    pub fn new(min_spacing: SignedDuration) -> Self {
        RateGate {
            min_spacing,
            last_call: None,
        }
    }

    /// Waits until a call is allowed and marks it as made.
    pub async fn acquire<C: Clock>(&mut self, clock: &C) {
        if let Some(last_call) = self.last_call {
            let remaining = self.min_spacing - clock.now().duration_since(last_call);
            if remaining.is_positive() {
                debug!("RateGate: Waiting {:?} before next call", remaining);
                clock.sleep(remaining).await;
            }
        }

        self.last_call = Some(clock.now());
    }
}
