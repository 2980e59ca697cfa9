use serde::{Deserialize, Serialize};

use crate::problem::time_window::TimeWindow;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StrategyParams {
    /// Capacity the load gap is divided by to size a vehicle addition.
    pub reference_capacity: f64,

    /// Lower reference used by the relaxed set, yields more vehicles.
    pub relaxed_reference_capacity: f64,

    pub relaxed_vehicle_capacity: f64,

    pub default_vehicle_time_window: Option<TimeWindow>,

    /// When set, every normal strategy set also pins the target as a
    /// minimum load constraint with this balance weight.
    pub load_balance_weight: Option<f64>,
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            reference_capacity: 12000.0,
            relaxed_reference_capacity: 8000.0,
            relaxed_vehicle_capacity: 12000.0,
            default_vehicle_time_window: None,
            load_balance_weight: None,
        }
    }
}
