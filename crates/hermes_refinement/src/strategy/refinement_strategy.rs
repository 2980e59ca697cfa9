use std::fmt::Display;

use jiff::SignedDuration;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::problem::{objective::Objective, time_window::TimeWindow};

#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StrategyPriority {
    Low,
    Medium,
    High,
}

#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RefinementStrategy {
    ObjectiveChange {
        objective: Objective,
    },
    VehicleAddition {
        count: usize,
        capacity: f64,
        /// Falls back to the envelope of the existing vehicle windows.
        time_window: Option<TimeWindow>,
    },
    /// Widens the explicit vehicle and job windows.
    TimeWindowRelaxation {
        relaxation: SignedDuration,
    },
    /// Allows overtime and lateness instead of touching the windows.
    TimeWindowSoftening {
        relaxation: SignedDuration,
    },
    LoadConstraintAddition {
        min_load: f64,
        balance_weight: f64,
    },
}

impl Display for RefinementStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RefinementStrategy::ObjectiveChange { objective } => {
                write!(f, "objective_change({objective})")
            }
            RefinementStrategy::VehicleAddition {
                count, capacity, ..
            } => write!(f, "vehicle_addition({count} x {capacity})"),
            RefinementStrategy::TimeWindowRelaxation { relaxation } => {
                write!(f, "time_window_relaxation({}min)", relaxation.as_mins())
            }
            RefinementStrategy::TimeWindowSoftening { relaxation } => {
                write!(f, "time_window_softening({}min)", relaxation.as_mins())
            }
            RefinementStrategy::LoadConstraintAddition {
                min_load,
                balance_weight,
            } => write!(f, "load_constraint_addition({min_load}, weight {balance_weight})"),
        }
    }
}

#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct PrioritizedStrategy {
    pub priority: StrategyPriority,
    pub strategy: RefinementStrategy,
}

impl PrioritizedStrategy {
    pub fn new(priority: StrategyPriority, strategy: RefinementStrategy) -> Self {
        PrioritizedStrategy { priority, strategy }
    }
}

/// Highest priority first, generation order kept between equal priorities.
pub fn sort_by_priority(strategies: &mut [PrioritizedStrategy]) {
    strategies.sort_by(|a, b| b.priority.cmp(&a.priority));
}
