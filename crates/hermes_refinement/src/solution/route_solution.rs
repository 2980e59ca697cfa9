use std::io::Read;

use fxhash::FxHashSet;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::problem::{job::JobId, vehicle::VehicleId};

use super::route::Route;

#[derive(Debug, Error)]
pub enum SolutionParseError {
    #[error("invalid solution json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("vehicle {0} appears in more than one route")]
    DuplicateVehicle(VehicleId),
}

#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum UnassignedJob {
    Id(JobId),
    Detailed {
        id: JobId,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
}

impl UnassignedJob {
    pub fn id(&self) -> JobId {
        match self {
            UnassignedJob::Id(id) => *id,
            UnassignedJob::Detailed { id, .. } => *id,
        }
    }
}

#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, PartialEq, Default)]
#[serde(rename = "RouteSolution")]
pub struct RouteSolution {
    #[serde(default)]
    routes: Vec<Route>,

    #[serde(default)]
    unassigned: Vec<UnassignedJob>,

    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl RouteSolution {
    pub fn new(routes: Vec<Route>, unassigned: Vec<JobId>) -> Self {
        RouteSolution {
            routes,
            unassigned: unassigned.into_iter().map(UnassignedJob::Id).collect(),
            extra: Map::new(),
        }
    }

    pub fn empty() -> Self {
        RouteSolution::default()
    }

    /// Parses and checks that each vehicle drives at most one route.
    pub fn from_reader(reader: impl Read) -> Result<Self, SolutionParseError> {
        let solution: RouteSolution = serde_json::from_reader(reader)?;
        solution.check_vehicles()?;
        Ok(solution)
    }

    pub fn from_value(value: Value) -> Result<Self, SolutionParseError> {
        let solution: RouteSolution = serde_json::from_value(value)?;
        solution.check_vehicles()?;
        Ok(solution)
    }

    pub fn check_vehicles(&self) -> Result<(), SolutionParseError> {
        let mut seen = FxHashSet::default();
        for route in &self.routes {
            if !seen.insert(route.vehicle_id()) {
                return Err(SolutionParseError::DuplicateVehicle(route.vehicle_id()));
            }
        }

        Ok(())
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    pub fn is_degenerate(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn unassigned_job_ids(&self) -> impl Iterator<Item = JobId> + '_ {
        self.unassigned.iter().map(UnassignedJob::id)
    }

    pub fn unassigned_count(&self) -> usize {
        self.unassigned.len()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_solution() {
        let solution = RouteSolution::from_value(json!({
            "routes": [
                {
                    "vehicle": 1,
                    "steps": [
                        { "type": "start", "load": [0] },
                        { "type": "job", "id": 3, "load": [4000] },
                        { "type": "end", "load": [4000] }
                    ],
                    "summary": { "distance": 1200.5, "duration": 3600 }
                }
            ],
            "unassigned": [7, { "id": 8, "reason": "capacity" }]
        }))
        .unwrap();

        assert_eq!(solution.route_count(), 1);
        assert_eq!(solution.routes()[0].load(), 4000.0);
        assert_eq!(solution.routes()[0].summary().duration, 3600.0);
        assert_eq!(solution.unassigned_job_ids().collect::<Vec<_>>(), vec![7, 8]);
    }

    #[test]
    fn test_duplicate_vehicle_is_rejected() {
        let result = RouteSolution::from_value(json!({
            "routes": [
                { "vehicle": 1, "steps": [] },
                { "vehicle": 1, "steps": [] }
            ]
        }));

        assert!(matches!(result, Err(SolutionParseError::DuplicateVehicle(1))));
    }

    #[test]
    fn test_empty_routes_is_degenerate() {
        let solution = RouteSolution::from_value(json!({ "routes": [], "unassigned": [1, 2] })).unwrap();
        assert!(solution.is_degenerate());
        assert_eq!(solution.unassigned_count(), 2);
    }
}
