use std::fmt::Display;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Objective descriptor understood by the oracle (`options.objective`).
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Objective {
    MinimizeVehicles,
    MinimizeDistance,
    MinimizeDuration,
    BalanceTasks,
    MinimizeVehiclesWithLoadConstraint { min_load: f64 },
}

impl Display for Objective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Objective::MinimizeVehicles => write!(f, "minimize-vehicles"),
            Objective::MinimizeDistance => write!(f, "minimize-distance"),
            Objective::MinimizeDuration => write!(f, "minimize-duration"),
            Objective::BalanceTasks => write!(f, "balance-tasks"),
            Objective::MinimizeVehiclesWithLoadConstraint { min_load } => {
                write!(f, "minimize-vehicles-with-load-constraint({min_load})")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_tagged_serialization() {
        let objective = Objective::MinimizeVehiclesWithLoadConstraint { min_load: 12000.0 };
        assert_eq!(
            serde_json::to_value(&objective).unwrap(),
            json!({ "type": "minimize-vehicles-with-load-constraint", "min_load": 12000.0 })
        );

        let parsed: Objective = serde_json::from_value(json!({ "type": "balance-tasks" })).unwrap();
        assert_eq!(parsed, Objective::BalanceTasks);
    }
}
