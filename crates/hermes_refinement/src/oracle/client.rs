use std::fmt::Display;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{problem::problem_instance::ProblemInstance, solution::route_solution::RouteSolution};

use super::error::OracleError;

/// Opaque identifier of a job submitted to the oracle.
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct JobHandle(String);

impl JobHandle {
    pub fn new(id: impl Into<String>) -> Self {
        JobHandle(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for JobHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Processing,
    Completed,
    Failed,
    Cancelled,
}

impl Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                JobStatus::Processing => "processing",
                JobStatus::Completed => "completed",
                JobStatus::Failed => "failed",
                JobStatus::Cancelled => "cancelled",
            }
        )
    }
}

/// External route optimizer solving problem instances asynchronously.
///
/// A job is submitted once, polled until its status is terminal and, when
/// completed, its solution is fetched.
pub trait Oracle {
    fn submit(
        &self,
        instance: &ProblemInstance,
    ) -> impl Future<Output = Result<JobHandle, OracleError>>;

    fn poll_status(&self, handle: &JobHandle) -> impl Future<Output = Result<JobStatus, OracleError>>;

    fn fetch_result(
        &self,
        handle: &JobHandle,
    ) -> impl Future<Output = Result<RouteSolution, OracleError>>;
}
