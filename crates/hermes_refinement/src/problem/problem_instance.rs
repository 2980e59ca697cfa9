use std::io::Read;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{
    job::Job,
    objective::Objective,
    vehicle::{Vehicle, VehicleId},
};

/// Global constraint fields of `options.constraint`.
///
/// Durations are expressed in seconds like the rest of the instance.
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, PartialEq, Default)]
pub struct InstanceConstraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_load_per_route: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_balance_weight: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_vehicle_overtime: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_visit_lateness: Option<i64>,
}

#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, PartialEq, Default)]
pub struct ProblemOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objective: Option<Objective>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint: Option<InstanceConstraints>,

    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, PartialEq)]
#[serde(rename = "ProblemInstance")]
pub struct ProblemInstance {
    vehicles: Vec<Vehicle>,

    jobs: Vec<Job>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    locations: Option<Value>,

    #[serde(default)]
    options: ProblemOptions,

    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl ProblemInstance {
    pub fn from_reader(reader: impl Read) -> Result<Self, serde_json::Error> {
        serde_json::from_reader(reader)
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn locations(&self) -> Option<&Value> {
        self.locations.as_ref()
    }

    pub fn objective(&self) -> Option<&Objective> {
        self.options.objective.as_ref()
    }

    pub fn constraints(&self) -> Option<&InstanceConstraints> {
        self.options.constraint.as_ref()
    }

    pub fn max_vehicle_id(&self) -> Option<VehicleId> {
        self.vehicles.iter().map(|vehicle| vehicle.id()).max()
    }

    pub(crate) fn vehicles_mut(&mut self) -> &mut Vec<Vehicle> {
        &mut self.vehicles
    }

    pub(crate) fn jobs_mut(&mut self) -> &mut Vec<Job> {
        &mut self.jobs
    }

    pub(crate) fn set_objective(&mut self, objective: Objective) {
        self.options.objective = Some(objective);
    }

    pub(crate) fn constraints_mut(&mut self) -> &mut InstanceConstraints {
        self.options.constraint.get_or_insert_default()
    }
}

#[derive(Default)]
pub struct ProblemInstanceBuilder {
    vehicles: Vec<Vehicle>,
    jobs: Vec<Job>,
    locations: Option<Value>,
    objective: Option<Objective>,
    constraint: Option<InstanceConstraints>,
}

impl ProblemInstanceBuilder {
    pub fn set_vehicles(&mut self, vehicles: Vec<Vehicle>) -> &mut ProblemInstanceBuilder {
        self.vehicles = vehicles;
        self
    }

    pub fn set_jobs(&mut self, jobs: Vec<Job>) -> &mut ProblemInstanceBuilder {
        self.jobs = jobs;
        self
    }

    pub fn set_locations(&mut self, locations: Value) -> &mut ProblemInstanceBuilder {
        self.locations = Some(locations);
        self
    }

    pub fn set_objective(&mut self, objective: Objective) -> &mut ProblemInstanceBuilder {
        self.objective = Some(objective);
        self
    }

    pub fn set_constraint(&mut self, constraint: InstanceConstraints) -> &mut ProblemInstanceBuilder {
        self.constraint = Some(constraint);
        self
    }

    pub fn build(self) -> ProblemInstance {
        ProblemInstance {
            vehicles: self.vehicles,
            jobs: self.jobs,
            locations: self.locations,
            options: ProblemOptions {
                objective: self.objective,
                constraint: self.constraint,
                extra: Map::new(),
            },
            extra: Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::problem::time_window::TimeWindow;

    use super::*;

    #[test]
    fn test_parse_instance() {
        let value = json!({
            "vehicles": [
                { "id": 1, "capacity": [14000.0], "time_window": [28800, 64800] },
                { "id": 4, "capacity": [12000.0] }
            ],
            "jobs": [
                { "id": 10, "delivery": [3000.0], "time_windows": [[30000, 36000], [50000, 54000]] }
            ],
            "locations": { "coordinates": [[4.35, 50.85]] },
            "options": {
                "objective": { "type": "minimize-vehicles" },
                "constraint": { "max_vehicle_overtime": 1800 }
            }
        });

        let instance: ProblemInstance = serde_json::from_value(value.clone()).unwrap();

        assert_eq!(instance.vehicles().len(), 2);
        assert_eq!(instance.max_vehicle_id(), Some(4));
        assert_eq!(
            instance.jobs()[0].time_windows(),
            &[TimeWindow::new(30000, 36000), TimeWindow::new(50000, 54000)]
        );
        assert_eq!(instance.objective(), Some(&Objective::MinimizeVehicles));
        assert_eq!(
            instance.constraints().and_then(|c| c.max_vehicle_overtime),
            Some(1800)
        );

        assert_eq!(serde_json::to_value(&instance).unwrap(), value);
    }

    #[test]
    fn test_constraints_mut_creates_map() {
        let mut instance = ProblemInstanceBuilder::default().build();
        assert!(instance.constraints().is_none());

        instance.constraints_mut().min_load_per_route = Some(12000.0);

        assert_eq!(
            instance.constraints().and_then(|c| c.min_load_per_route),
            Some(12000.0)
        );
    }
}
