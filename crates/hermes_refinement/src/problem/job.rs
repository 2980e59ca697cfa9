use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::time_window::TimeWindow;

pub type JobId = u64;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct Job {
    id: JobId,

    #[serde(default)]
    delivery: Vec<f64>,

    /// Alternative windows, any one of them may be used.
    #[serde(default)]
    time_windows: Vec<TimeWindow>,

    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Job {
    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn delivery(&self) -> &[f64] {
        &self.delivery
    }

    pub fn time_windows(&self) -> &[TimeWindow] {
        &self.time_windows
    }

    pub(crate) fn time_windows_mut(&mut self) -> &mut Vec<TimeWindow> {
        &mut self.time_windows
    }
}

#[derive(Default)]
pub struct JobBuilder {
    id: Option<JobId>,
    delivery: Option<Vec<f64>>,
    time_windows: Option<Vec<TimeWindow>>,
}

impl JobBuilder {
    pub fn set_id(&mut self, id: JobId) -> &mut JobBuilder {
        self.id = Some(id);
        self
    }

    pub fn set_delivery(&mut self, delivery: Vec<f64>) -> &mut JobBuilder {
        self.delivery = Some(delivery);
        self
    }

    pub fn set_time_windows(&mut self, time_windows: Vec<TimeWindow>) -> &mut JobBuilder {
        self.time_windows = Some(time_windows);
        self
    }

    pub fn build(self) -> Job {
        Job {
            id: self.id.unwrap_or(0),
            delivery: self.delivery.unwrap_or_default(),
            time_windows: self.time_windows.unwrap_or_default(),
            extra: Map::new(),
        }
    }
}
