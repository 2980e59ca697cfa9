use hermes_refinement::{
    oracle::{
        client::{JobHandle, JobStatus},
        error::{OracleError, RejectionCode},
    },
    solution::route_solution::RouteSolution,
};
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
pub(crate) struct SubmitResponse {
    pub job_id: String,
}

#[derive(Deserialize)]
pub(crate) struct JobResponse {
    pub status: String,
    #[serde(default)]
    pub solution: Option<Value>,
}

#[derive(Deserialize, Default)]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

pub(crate) fn parse_job_status(status: &str) -> Result<JobStatus, OracleError> {
    match status {
        "waiting" | "processing" => Ok(JobStatus::Processing),
        "finished" => Ok(JobStatus::Completed),
        "failed" => Ok(JobStatus::Failed),
        "cancelled" => Ok(JobStatus::Cancelled),
        other => Err(OracleError::MalformedResponse(format!(
            "unknown job status {other:?}"
        ))),
    }
}

/// Reads the solution of a finished job. A solution that does not parse is
/// returned again on every fetch, so it is never a transient error.
pub(crate) fn solution_from_job(
    handle: &JobHandle,
    job: JobResponse,
) -> Result<RouteSolution, OracleError> {
    match parse_job_status(&job.status)? {
        JobStatus::Completed => {
            let solution = job.solution.ok_or_else(|| {
                OracleError::InvalidSolution(format!("job {handle} finished without a solution"))
            })?;

            RouteSolution::from_value(solution)
                .map_err(|error| OracleError::InvalidSolution(error.to_string()))
        }
        status => Err(OracleError::MalformedResponse(format!(
            "job {handle} is {status}, no solution available"
        ))),
    }
}

/// Maps a non-success response to an error. Client errors reject the
/// instance, except timeouts and rate limiting which are worth retrying.
pub(crate) fn classify_error(status: u16, body: &str) -> OracleError {
    let retryable = status == 408 || status == 429 || !(400..500).contains(&status);
    if retryable {
        return OracleError::Server {
            status,
            message: body.to_string(),
        };
    }

    let error: ErrorBody = serde_json::from_str(body).unwrap_or_default();

    OracleError::Rejected {
        code: error
            .code
            .as_deref()
            .map_or(RejectionCode::Other, RejectionCode::from_code),
        message: error.message.unwrap_or_else(|| body.to_string()),
    }
}
