use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::time_window::TimeWindow;

pub type VehicleId = u64;

pub const LOAD_BALANCING_DESCRIPTION: &str = "load-balancing";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct Vehicle {
    id: VehicleId,

    #[serde(default)]
    capacity: Vec<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    time_window: Option<TimeWindow>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,

    /// Fields the refinement loop does not interpret, passed through untouched.
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Vehicle {
    pub fn id(&self) -> VehicleId {
        self.id
    }

    pub fn capacity(&self) -> &[f64] {
        &self.capacity
    }

    pub fn time_window(&self) -> Option<&TimeWindow> {
        self.time_window.as_ref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_load_balancing_addition(&self) -> bool {
        self.description.as_deref() == Some(LOAD_BALANCING_DESCRIPTION)
    }

    pub(crate) fn set_time_window(&mut self, time_window: TimeWindow) {
        self.time_window = Some(time_window);
    }
}

#[derive(Default)]
pub struct VehicleBuilder {
    id: Option<VehicleId>,
    capacity: Option<Vec<f64>>,
    time_window: Option<TimeWindow>,
    description: Option<String>,
}

impl VehicleBuilder {
    pub fn set_id(&mut self, id: VehicleId) -> &mut VehicleBuilder {
        self.id = Some(id);
        self
    }

    pub fn set_capacity(&mut self, capacity: Vec<f64>) -> &mut VehicleBuilder {
        self.capacity = Some(capacity);
        self
    }

    pub fn set_time_window(&mut self, time_window: TimeWindow) -> &mut VehicleBuilder {
        self.time_window = Some(time_window);
        self
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> &mut VehicleBuilder {
        self.description = Some(description.into());
        self
    }

    pub fn build(self) -> Vehicle {
        Vehicle {
            id: self.id.unwrap_or(0),
            capacity: self.capacity.unwrap_or_default(),
            time_window: self.time_window,
            description: self.description,
            extra: Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_unknown_fields_are_preserved() {
        let value = json!({
            "id": 3,
            "capacity": [12000.0],
            "time_window": [28800, 64800],
            "start": [4.35, 50.85],
            "skills": [1, 2]
        });

        let vehicle: Vehicle = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(vehicle.id(), 3);
        assert_eq!(vehicle.capacity(), &[12000.0]);
        assert_eq!(vehicle.time_window(), Some(&TimeWindow::new(28800, 64800)));

        let serialized = serde_json::to_value(&vehicle).unwrap();
        assert_eq!(serialized["start"], value["start"]);
        assert_eq!(serialized["skills"], value["skills"]);
    }

    #[test]
    fn test_builder() {
        let mut builder = VehicleBuilder::default();
        builder
            .set_id(7)
            .set_capacity(vec![14000.0])
            .set_description(LOAD_BALANCING_DESCRIPTION);
        let vehicle = builder.build();

        assert_eq!(vehicle.id(), 7);
        assert!(vehicle.is_load_balancing_addition());
        assert!(vehicle.time_window().is_none());
    }
}
