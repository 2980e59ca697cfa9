use std::sync::Arc;

use jiff::{SignedDuration, Timestamp};
use parking_lot::Mutex;

/// Source of time for polling, backoff and call spacing.
pub trait Clock {
    fn now(&self) -> Timestamp;

    /// Non-positive durations return immediately.
    fn sleep(&self, duration: SignedDuration) -> impl Future<Output = ()>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }

    async fn sleep(&self, duration: SignedDuration) {
        if duration.is_positive() {
            tokio::time::sleep(duration.unsigned_abs()).await;
        }
    }
}

#[derive(Debug)]
struct ManualClockState {
    now: Timestamp,
    sleeps: Vec<SignedDuration>,
}

/// Clock that only moves when slept on. Every sleep advances `now` by the
/// requested duration and is recorded, so waiting logic runs instantly.
#[derive(Debug, Clone)]
pub struct ManualClock {
    state: Arc<Mutex<ManualClockState>>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        ManualClock {
            state: Arc::new(Mutex::new(ManualClockState {
                now: start,
                sleeps: Vec::new(),
            })),
        }
    }

    pub fn advance(&self, duration: SignedDuration) {
        let mut state = self.state.lock();
        state.now = state.now.checked_add(duration).unwrap_or(Timestamp::MAX);
    }

    pub fn sleeps(&self) -> Vec<SignedDuration> {
        self.state.lock().sleeps.clone()
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        ManualClock::new(Timestamp::UNIX_EPOCH)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.state.lock().now
    }

    async fn sleep(&self, duration: SignedDuration) {
        if duration.is_positive() {
            self.state.lock().sleeps.push(duration);
            self.advance(duration);
        }
    }
}
