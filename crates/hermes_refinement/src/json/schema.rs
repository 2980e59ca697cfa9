use schemars::schema_for;

use crate::{problem::problem_instance::ProblemInstance, solution::route_solution::RouteSolution};

pub fn generate_problem_schema() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&schema_for!(ProblemInstance))
}

pub fn generate_solution_schema() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&schema_for!(RouteSolution))
}
