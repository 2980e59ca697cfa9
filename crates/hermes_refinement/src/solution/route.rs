use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::problem::{job::JobId, vehicle::VehicleId};

#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StepType {
    Start,
    Job,
    Pickup,
    Delivery,
    Break,
    End,
}

#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct Step {
    #[serde(rename = "type")]
    step_type: StepType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<JobId>,

    #[serde(default)]
    load: Vec<f64>,

    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Step {
    pub fn new(step_type: StepType, id: Option<JobId>, load: Vec<f64>) -> Self {
        Step {
            step_type,
            id,
            load,
            extra: Map::new(),
        }
    }

    pub fn job(id: JobId, load: f64) -> Self {
        Step::new(StepType::Job, Some(id), vec![load])
    }

    pub fn step_type(&self) -> StepType {
        self.step_type
    }

    pub fn id(&self) -> Option<JobId> {
        self.id
    }

    /// First load dimension, zero when the step carries none.
    pub fn load_amount(&self) -> f64 {
        self.load.first().copied().unwrap_or(0.0)
    }
}

#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, Copy, PartialEq, Default)]
pub struct RouteSummary {
    #[serde(default)]
    pub distance: f64,

    #[serde(default)]
    pub duration: f64,
}

#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct Route {
    vehicle: VehicleId,

    #[serde(default)]
    steps: Vec<Step>,

    #[serde(default)]
    summary: RouteSummary,

    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Route {
    pub fn new(vehicle: VehicleId, steps: Vec<Step>, summary: RouteSummary) -> Self {
        Route {
            vehicle,
            steps,
            summary,
            extra: Map::new(),
        }
    }

    pub fn vehicle_id(&self) -> VehicleId {
        self.vehicle
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn summary(&self) -> &RouteSummary {
        &self.summary
    }

    pub fn job_steps(&self) -> impl Iterator<Item = &Step> {
        self.steps
            .iter()
            .filter(|step| step.step_type() == StepType::Job)
    }

    /// Sum of the load carried by job steps. Negative amounts do not count.
    pub fn load(&self) -> f64 {
        self.job_steps()
            .map(|step| step.load_amount().max(0.0))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_only_counts_job_steps() {
        let route = Route::new(
            1,
            vec![
                Step::new(StepType::Start, None, vec![9000.0]),
                Step::job(1, 4000.0),
                Step::new(StepType::Break, None, vec![1000.0]),
                Step::job(2, 5000.0),
                Step::new(StepType::End, None, vec![0.0]),
            ],
            RouteSummary::default(),
        );

        assert_eq!(route.load(), 9000.0);
    }

    #[test]
    fn test_route_without_jobs_has_zero_load() {
        let route = Route::new(
            1,
            vec![
                Step::new(StepType::Start, None, vec![]),
                Step::new(StepType::End, None, vec![]),
            ],
            RouteSummary::default(),
        );

        assert_eq!(route.load(), 0.0);
    }

    #[test]
    fn test_step_without_load_counts_as_zero() {
        let step: Step = serde_json::from_str(r#"{ "type": "job", "id": 4 }"#).unwrap();
        assert_eq!(step.load_amount(), 0.0);
    }
}
