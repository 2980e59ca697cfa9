use jiff::SignedDuration;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A `[start, end]` pair expressed in seconds, the instance time unit.
#[derive(Deserialize, Debug, Serialize, Clone, Copy, PartialEq, Eq, JsonSchema)]
pub struct TimeWindow(i64, i64);

impl TimeWindow {
    pub const fn new(start: i64, end: i64) -> Self {
        TimeWindow(start, end)
    }

    pub fn start(&self) -> i64 {
        self.0
    }

    pub fn end(&self) -> i64 {
        self.1
    }

    pub fn is_valid(&self) -> bool {
        self.0 < self.1
    }

    /// Moves the start earlier and the end later by `relaxation`.
    pub fn widened(&self, relaxation: SignedDuration) -> Self {
        let seconds = relaxation.as_secs();
        TimeWindow(
            self.0.saturating_sub(seconds),
            self.1.saturating_add(seconds),
        )
    }

    /// Smallest window covering every window of the iterator.
    pub fn envelope<'a>(windows: impl IntoIterator<Item = &'a TimeWindow>) -> Option<TimeWindow> {
        windows.into_iter().fold(None, |acc, window| match acc {
            None => Some(*window),
            Some(TimeWindow(start, end)) => {
                Some(TimeWindow(start.min(window.0), end.max(window.1)))
            }
        })
    }
}
